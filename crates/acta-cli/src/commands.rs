use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use acta_sdk::{
    Acta, ActaConfig, ContentDigest, EpochSeconds, RegistrationRecord, ScanItem, Tally,
    ToyKeypair, Verdict, VoteChoice, VoteRecord,
};
use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use crate::cli::*;
use crate::shell;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = ActaConfig::resolve(cli.config.as_deref(), cli.data_dir.as_deref())?;
    debug!(data_dir = %config.data_dir.display(), "configuration resolved");
    let acta = Acta::open(&config);
    let format = cli.format;

    match cli.command {
        Command::Hash(args) => cmd_hash(&acta, args, format),
        Command::Register(args) => cmd_register(&acta, args, format),
        Command::Verify(args) => cmd_verify(&acta, args, format),
        Command::Log(args) => cmd_log(&acta, args, format),
        Command::Vote(args) => cmd_vote(&acta, args, format),
        Command::Votes => cmd_votes(&acta, format),
        Command::Tally(args) => cmd_tally(&acta, args, format),
        Command::Keygen => cmd_keygen(&acta, format),
        Command::Export(args) => cmd_export(&acta, args),
        Command::Config => cmd_config(&config, format),
        Command::Shell => {
            let stdin = io::stdin();
            shell::run(&acta, stdin.lock(), io::stdout().lock())
        }
    }
}

/// Document text from `--content` or `--file`.
pub fn read_content(args: &ContentArgs) -> anyhow::Result<String> {
    match (&args.content, &args.file) {
        (Some(content), _) => Ok(content.clone()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("cannot read document {}", path.display())),
        (None, None) => anyhow::bail!("either --content or --file is required"),
    }
}

/// Human-readable UTC rendering of a stored timestamp.
pub fn format_time(time: EpochSeconds) -> String {
    let (secs, nanos) = time.split();
    match chrono::DateTime::from_timestamp(secs, nanos) {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => time.to_string(),
    }
}

pub fn verdict_label(verdict: Verdict) -> colored::ColoredString {
    match verdict {
        Verdict::Valid => "valid".green().bold(),
        Verdict::Invalid => "invalid".red().bold(),
        Verdict::Tied => "tied".yellow(),
        Verdict::NoVotes => "no votes".dimmed(),
    }
}

pub fn tally_line(tally: &Tally) -> String {
    format!(
        "{} affirmative, {} negative ({})",
        tally.affirmative.to_string().green(),
        tally.negative.to_string().red(),
        verdict_label(tally.verdict())
    )
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_hash(acta: &Acta, args: HashArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = read_content(&args.source)?;
    let digest = acta.hash(&content);
    let matches = match &args.expect {
        Some(expected) => Some(acta.hash_matches(&content, expected)?),
        None => None,
    };
    match format {
        OutputFormat::Json => print_json(&json!({ "hash": digest, "matches": matches }))?,
        OutputFormat::Text => {
            println!("{}", digest.to_string().yellow());
            match matches {
                Some(true) => println!("{} Matches expected digest", "✓".green().bold()),
                Some(false) => println!("{} Does not match expected digest", "✗".red().bold()),
                None => {}
            }
        }
    }
    if matches == Some(false) {
        anyhow::bail!("digest mismatch");
    }
    Ok(())
}

fn cmd_register(acta: &Acta, args: RegisterArgs, format: OutputFormat) -> anyhow::Result<()> {
    let content = read_content(&args.source)?;
    let record = acta.register(&args.owner, &content)?;
    match format {
        OutputFormat::Json => print_json(&record),
        OutputFormat::Text => {
            println!("{} Document registered", "✓".green().bold());
            println!("  Owner: {}", record.owner.bold());
            println!("  Hash:  {}", record.hash.to_string().yellow());
            println!("  Time:  {}", format_time(record.time));
            Ok(())
        }
    }
}

fn cmd_verify(acta: &Acta, args: ContentArgs, format: OutputFormat) -> anyhow::Result<()> {
    let report = acta.inspect(&read_content(&args)?)?;
    match format {
        OutputFormat::Json => print_json(&json!({
            "hash": report.digest,
            "registered": report.is_registered(),
            "registrations": report.registrations,
        })),
        OutputFormat::Text => {
            match report.first() {
                Some(first) => {
                    println!("{} Registered", "✓".green().bold());
                    println!("  Hash:  {}", report.digest.to_string().yellow());
                    println!(
                        "  First: {} at {}",
                        first.owner.bold(),
                        format_time(first.time)
                    );
                    if report.registrations.len() > 1 {
                        println!("  Registrations: {}", report.registrations.len());
                    }
                }
                None => {
                    println!("{} Not registered", "✗".red().bold());
                    println!("  Hash:  {}", report.digest.to_string().dimmed());
                }
            }
            Ok(())
        }
    }
}

fn registration_line(record: &RegistrationRecord) -> String {
    format!(
        "{}  {}  {}",
        record.hash.short_hex().yellow(),
        format_time(record.time).dimmed(),
        record.owner
    )
}

fn cmd_log(acta: &Acta, args: LogArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.all {
        let entries = acta.ledger_entries()?;
        let recent: Vec<_> = entries.into_iter().rev().take(args.limit).collect();
        return match format {
            OutputFormat::Json => print_json(&entries_json(&recent)),
            OutputFormat::Text => {
                for entry in &recent {
                    match entry {
                        ScanItem::Record(record) => println!("{}", registration_line(record)),
                        ScanItem::Corrupt { line, raw } => println!("{}", corrupt_line(*line, raw)),
                    }
                }
                Ok(())
            }
        };
    }

    let records = acta.list_recent(args.limit)?;
    match format {
        OutputFormat::Json => print_json(&records),
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No registrations.");
            }
            for record in &records {
                println!("{}", registration_line(record));
            }
            Ok(())
        }
    }
}

fn corrupt_line(line: usize, raw: &str) -> String {
    format!("{} {}", format!("line {line} (unparsable):").red(), raw)
}

fn entries_json<T: serde::Serialize>(entries: &[ScanItem<T>]) -> serde_json::Value {
    let items: Vec<_> = entries
        .iter()
        .map(|entry| match entry {
            ScanItem::Record(record) => json!({ "record": record }),
            ScanItem::Corrupt { line, raw } => json!({ "corrupt": { "line": line, "raw": raw } }),
        })
        .collect();
    serde_json::Value::Array(items)
}

fn cmd_vote(acta: &Acta, args: VoteArgs, format: OutputFormat) -> anyhow::Result<()> {
    let choice: VoteChoice = args.choice.parse()?;
    let voter = match &args.private_key {
        Some(private) => Some(ToyKeypair::from_private_hex(private)?.public_hex()),
        None => args.voter.clone(),
    };
    let vote = acta.cast_vote(&args.hash, choice, voter.as_deref())?;
    match format {
        OutputFormat::Json => print_json(&vote),
        OutputFormat::Text => {
            print_vote_receipt(&vote);
            Ok(())
        }
    }
}

pub fn print_vote_receipt(vote: &VoteRecord) {
    println!("{} Vote recorded", "✓".green().bold());
    println!("  Hash:  {}", vote.hash.to_string().yellow());
    println!("  Vote:  {}", vote.vote);
    if let Some(voter) = &vote.voter {
        println!("  Voter: {}", voter.cyan());
    }
}

fn cmd_votes(acta: &Acta, format: OutputFormat) -> anyhow::Result<()> {
    let entries = acta.vote_entries()?;
    match format {
        OutputFormat::Json => print_json(&entries_json(&entries)),
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("No votes.");
            }
            for entry in &entries {
                match entry {
                    ScanItem::Record(vote) => println!(
                        "{}  {}  {:<11} {}",
                        vote.hash.short_hex().yellow(),
                        format_time(vote.time).dimmed(),
                        vote.vote.to_string(),
                        vote.voter.as_deref().unwrap_or("-").cyan()
                    ),
                    ScanItem::Corrupt { line, raw } => println!("{}", corrupt_line(*line, raw)),
                }
            }
            Ok(())
        }
    }
}

fn cmd_tally(acta: &Acta, args: TallyArgs, format: OutputFormat) -> anyhow::Result<()> {
    if args.by_hash {
        let tallies = acta.tally_by_hash()?;
        return match format {
            OutputFormat::Json => {
                let rows: Vec<_> = tallies
                    .iter()
                    .map(|(hash, tally)| tally_json(Some(hash), tally))
                    .collect();
                print_json(&rows)
            }
            OutputFormat::Text => {
                if tallies.is_empty() {
                    println!("No votes.");
                }
                for (hash, tally) in &tallies {
                    println!("{}  {}", hash.short_hex().yellow(), tally_line(tally));
                }
                Ok(())
            }
        };
    }

    let tally = acta.tally(args.hash.as_deref())?;
    match format {
        OutputFormat::Json => {
            let digest = args.hash.as_deref().map(str::trim).map(str::parse).transpose()?;
            print_json(&tally_json(digest.as_ref(), &tally))
        }
        OutputFormat::Text => {
            let scope = match &args.hash {
                Some(hash) => hash.trim().to_lowercase(),
                None => "all documents".to_string(),
            };
            println!("{}", scope.bold());
            println!("  {}", tally_line(&tally));
            Ok(())
        }
    }
}

fn tally_json(hash: Option<&ContentDigest>, tally: &Tally) -> serde_json::Value {
    json!({
        "hash": hash,
        "affirmative": tally.affirmative,
        "negative": tally.negative,
        "total": tally.total(),
        "verdict": tally.verdict(),
    })
}

fn cmd_keygen(acta: &Acta, format: OutputFormat) -> anyhow::Result<()> {
    let keypair = acta.generate_keypair();
    match format {
        OutputFormat::Json => print_json(&json!({
            "private_key": keypair.private_hex(),
            "public_key": keypair.public_key(),
        })),
        OutputFormat::Text => {
            println!("{} Keypair generated", "✓".green().bold());
            println!("  Private: {}", keypair.private_hex().red());
            println!("  Public:  {}", keypair.public_hex().cyan());
            println!(
                "  {}",
                "Toy key: the public key is a hash of the private key, not a signature scheme."
                    .dimmed()
            );
            Ok(())
        }
    }
}

fn cmd_export(acta: &Acta, args: ExportArgs) -> anyhow::Result<()> {
    match &args.output {
        Some(path) => {
            let bytes = export_to_path(acta, args.store, path)?;
            eprintln!(
                "{} Exported {} bytes to {}",
                "✓".green().bold(),
                bytes,
                path.display().to_string().bold()
            );
        }
        None => {
            let mut out = io::stdout().lock();
            export_store(acta, args.store, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn export_store(acta: &Acta, store: StoreKind, out: &mut dyn Write) -> anyhow::Result<u64> {
    Ok(match store {
        StoreKind::Ledger => acta.export_ledger(out)?,
        StoreKind::Votes => acta.export_votes(out)?,
    })
}

pub fn export_to_path(acta: &Acta, store: StoreKind, path: &Path) -> anyhow::Result<u64> {
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let bytes = export_store(acta, store, &mut out)?;
    out.flush()
        .with_context(|| format!("cannot write {}", path.display()))?;
    Ok(bytes)
}

fn cmd_config(config: &ActaConfig, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(config),
        OutputFormat::Text => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        fs::write(&path, "hola mundo").unwrap();
        let args = ContentArgs {
            content: None,
            file: Some(path),
        };
        assert_eq!(read_content(&args).unwrap(), "hola mundo");
    }

    #[test]
    fn missing_document_file_is_an_error() {
        let args = ContentArgs {
            content: None,
            file: Some(PathBuf::from("/definitely/not/here.txt")),
        };
        let err = read_content(&args).unwrap_err();
        assert!(err.to_string().contains("cannot read document"));
    }

    #[test]
    fn time_formatting() {
        assert_eq!(
            format_time(EpochSeconds::new(0.0)),
            "1970-01-01 00:00:00 UTC"
        );
        assert_eq!(
            format_time(EpochSeconds::new(1_700_000_000.25)),
            "2023-11-14 22:13:20 UTC"
        );
    }

    #[test]
    fn export_writes_raw_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let config = ActaConfig::with_data_dir(dir.path().join("data"));
        let acta = Acta::open(&config);
        acta.register("Ana", "hola mundo").unwrap();

        let target = dir.path().join("copy.jsonl");
        let bytes = export_to_path(&acta, StoreKind::Ledger, &target).unwrap();
        let original = fs::read(config.ledger_path()).unwrap();
        assert_eq!(bytes as usize, original.len());
        assert_eq!(fs::read(&target).unwrap(), original);

        let empty = dir.path().join("votes.jsonl");
        assert_eq!(export_to_path(&acta, StoreKind::Votes, &empty).unwrap(), 0);
    }

    #[test]
    fn tally_json_shape() {
        let value = tally_json(None, &Tally::new(3, 1));
        assert_eq!(value["total"], 4);
        assert_eq!(value["verdict"], "valid");
        assert!(value["hash"].is_null());
    }
}
