//! Line-oriented interactive session.
//!
//! The session owns one [`Session`], so a keypair generated here is used for
//! every `vote` until it is replaced, forgotten, or the shell exits. Documents
//! are single lines of text.

use std::io::{BufRead, Lines, Write};

use acta_sdk::{Acta, Session, VoteChoice};
use colored::Colorize;
use tracing::debug;

use crate::commands::{format_time, tally_line};

const HELP: &str = "\
commands:
  keygen                 generate a session keypair
  restore <private-hex>  adopt an existing private key
  whoami                 show the session public key
  forget                 drop the session keypair
  hash <text>            digest of a document
  register               register a document (prompts for owner and text)
  verify <text>          check whether a document is registered
  log [n]                recent registrations
  vote <hash> <choice>   vote with the session key (yes/no)
  tally [hash]           count votes for one digest or for all
  help                   this text
  exit                   leave the shell";

/// Run the shell until `exit` or end of input.
pub fn run<R: BufRead, W: Write>(acta: &Acta, input: R, out: W) -> anyhow::Result<()> {
    let mut shell = Shell {
        acta,
        session: Session::new(),
        lines: input.lines(),
        out,
    };
    shell.run()
}

struct Shell<'a, R, W> {
    acta: &'a Acta,
    session: Session,
    lines: Lines<R>,
    out: W,
}

enum Flow {
    Continue,
    Exit,
}

impl<R: BufRead, W: Write> Shell<'_, R, W> {
    fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.out, "Acta shell. Type {} for commands.", "help".bold())?;
        while let Some(line) = self.prompt("acta> ")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (command, rest) = line
                .split_once(char::is_whitespace)
                .map(|(c, r)| (c, r.trim()))
                .unwrap_or((line, ""));
            debug!(command, "shell command");
            match self.dispatch(command, rest) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => writeln!(self.out, "{} {e}", "error:".red().bold())?,
            }
        }
        self.session.forget();
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> anyhow::Result<Option<String>> {
        write!(self.out, "{label}")?;
        self.out.flush()?;
        Ok(self.lines.next().transpose()?)
    }

    /// Free text from the rest of the line, or a follow-up prompt when empty.
    fn text_or_prompt(&mut self, rest: &str, label: &str) -> anyhow::Result<Option<String>> {
        if rest.is_empty() {
            self.prompt(label)
        } else {
            Ok(Some(rest.to_string()))
        }
    }

    fn dispatch(&mut self, command: &str, rest: &str) -> anyhow::Result<Flow> {
        match command {
            "exit" | "quit" => return Ok(Flow::Exit),
            "help" => writeln!(self.out, "{HELP}")?,
            "keygen" => {
                let keypair = self.session.generate_keypair().clone();
                writeln!(self.out, "{} Session keypair generated", "✓".green().bold())?;
                writeln!(self.out, "  Private: {}", keypair.private_hex().red())?;
                writeln!(self.out, "  Public:  {}", keypair.public_hex().cyan())?;
            }
            "restore" => {
                let public = self.session.restore_keypair(rest)?.public_hex();
                writeln!(self.out, "{} Session key restored", "✓".green().bold())?;
                writeln!(self.out, "  Public:  {}", public.cyan())?;
            }
            "whoami" => {
                let public = self.session.require_voter()?;
                writeln!(self.out, "{}", public.cyan())?;
            }
            "forget" => {
                self.session.forget();
                writeln!(self.out, "Session keypair dropped.")?;
            }
            "hash" => {
                if let Some(text) = self.text_or_prompt(rest, "text> ")? {
                    writeln!(self.out, "{}", self.acta.hash(&text).to_string().yellow())?;
                }
            }
            "register" => self.register()?,
            "verify" => {
                if let Some(text) = self.text_or_prompt(rest, "text> ")? {
                    self.verify(&text)?;
                }
            }
            "log" => {
                let limit = if rest.is_empty() { 10 } else { rest.parse()? };
                for record in self.acta.list_recent(limit)? {
                    writeln!(
                        self.out,
                        "{}  {}  {}",
                        record.hash.short_hex().yellow(),
                        format_time(record.time).dimmed(),
                        record.owner
                    )?;
                }
            }
            "vote" => self.vote(rest)?,
            "tally" => {
                let hash = (!rest.is_empty()).then_some(rest);
                let tally = self.acta.tally(hash)?;
                writeln!(self.out, "{}", tally_line(&tally))?;
            }
            other => writeln!(
                self.out,
                "unknown command {}; type {} for commands",
                other.bold(),
                "help".bold()
            )?,
        }
        Ok(Flow::Continue)
    }

    fn register(&mut self) -> anyhow::Result<()> {
        let Some(owner) = self.prompt("owner> ")? else {
            return Ok(());
        };
        let Some(text) = self.prompt("text> ")? else {
            return Ok(());
        };
        let record = self.acta.register(&owner, &text)?;
        writeln!(self.out, "{} Document registered", "✓".green().bold())?;
        writeln!(self.out, "  Hash:  {}", record.hash.to_string().yellow())?;
        Ok(())
    }

    fn verify(&mut self, text: &str) -> anyhow::Result<()> {
        let report = self.acta.inspect(text)?;
        match report.first() {
            Some(first) => writeln!(
                self.out,
                "{} Registered by {} at {}",
                "✓".green().bold(),
                first.owner.bold(),
                format_time(first.time)
            )?,
            None => writeln!(self.out, "{} Not registered", "✗".red().bold())?,
        }
        Ok(())
    }

    fn vote(&mut self, rest: &str) -> anyhow::Result<()> {
        let mut parts = rest.split_whitespace();
        let (Some(hash), Some(choice), None) = (parts.next(), parts.next(), parts.next()) else {
            anyhow::bail!("usage: vote <hash> <choice>");
        };
        let choice: VoteChoice = choice.parse()?;
        let vote = self.acta.cast_vote_as(&self.session, hash, choice)?;
        writeln!(self.out, "{} Vote recorded ({})", "✓".green().bold(), vote.vote)?;
        if vote.voter.is_none() {
            writeln!(
                self.out,
                "  {}",
                "anonymous; run keygen to attach a public key".dimmed()
            )?;
        }
        Ok(())
    }
}
