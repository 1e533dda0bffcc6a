use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "acta",
    about = "Acta: register documents by content hash and vote on them",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the ledger and vote files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: <data-dir>/acta.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the SHA-256 digest of a document without registering it
    Hash(HashArgs),
    /// Register a document under an owner
    Register(RegisterArgs),
    /// Check whether a document has been registered
    Verify(ContentArgs),
    /// Show recent registrations, newest first
    Log(LogArgs),
    /// Vote on a registered digest
    Vote(VoteArgs),
    /// List every vote line, malformed ones included
    Votes,
    /// Count votes for one digest or across the whole store
    Tally(TallyArgs),
    /// Generate a toy keypair
    Keygen,
    /// Copy a raw store file to stdout or a path
    Export(ExportArgs),
    /// Print the effective configuration
    Config,
    /// Start an interactive session holding one keypair
    Shell,
}

/// A document given inline or read from a file.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct ContentArgs {
    /// Document text
    #[arg(long)]
    pub content: Option<String>,
    /// Read the document from a UTF-8 file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashArgs {
    #[command(flatten)]
    pub source: ContentArgs,
    /// Fail unless the document hashes to this hex digest
    #[arg(long)]
    pub expect: Option<String>,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub owner: String,
    #[command(flatten)]
    pub source: ContentArgs,
}

#[derive(Args)]
pub struct LogArgs {
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
    /// List every line, including ones that failed to parse
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct VoteArgs {
    /// 64-character hex digest
    pub hash: String,
    /// affirmative | negative (also yes/no, si/no)
    pub choice: String,
    /// Public key recorded with the vote
    #[arg(long, conflicts_with = "private_key")]
    pub voter: Option<String>,
    /// Private key whose derived public key is recorded with the vote
    #[arg(long)]
    pub private_key: Option<String>,
}

#[derive(Args)]
pub struct TallyArgs {
    /// Digest to count; omit for the whole store
    pub hash: Option<String>,
    /// One line per voted digest
    #[arg(long, conflicts_with = "hash")]
    pub by_hash: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    Ledger,
    Votes,
}

#[derive(Args)]
pub struct ExportArgs {
    pub store: StoreKind,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn register_requires_exactly_one_source() {
        assert!(Cli::try_parse_from(["acta", "register", "--owner", "Ana"]).is_err());
        assert!(Cli::try_parse_from([
            "acta", "register", "--owner", "Ana", "--content", "x", "--file", "f"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["acta", "register", "--owner", "Ana", "--content", "x"]).is_ok());
    }

    #[test]
    fn hash_accepts_expected_digest() {
        let cli = Cli::try_parse_from(["acta", "hash", "--content", "x", "--expect", "abc"]).unwrap();
        match cli.command {
            Command::Hash(args) => {
                assert_eq!(args.source.content.as_deref(), Some("x"));
                assert_eq!(args.expect.as_deref(), Some("abc"));
            }
            _ => panic!("expected hash command"),
        }
    }

    #[test]
    fn vote_key_flags_conflict() {
        let hash = "0".repeat(64);
        assert!(Cli::try_parse_from([
            "acta", "vote", hash.as_str(), "yes", "--voter", "a", "--private-key", "b"
        ])
        .is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["acta", "tally", "--format", "json", "--data-dir", "/tmp/x"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Command::Tally(TallyArgs { hash: None, by_hash: false })));
    }
}
