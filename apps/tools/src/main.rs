use std::{fs, io::Read, process::ExitCode};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use parser::lexer::tokenize;

/// Offline helpers for the literal grammar; no server needed.
#[derive(Parser, Debug)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one token per line: kind, byte offset, lexeme.
    Tokens(Source),
    /// Print the parsed item tree as JSON, or the error with a caret.
    Parse {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// Sentence text; reads stdin when omitted.
    text: Option<String>,
    /// Read the sentence from a file instead.
    #[arg(long, conflicts_with = "text")]
    file: Option<std::path::PathBuf>,
}

impl Source {
    fn read(self) -> Result<String> {
        if let Some(text) = self.text {
            return Ok(text);
        }
        if let Some(path) = self.file {
            return fs::read_to_string(&path)
                .with_context(|| format!("failed to read '{}'", path.display()));
        }
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        Ok(text)
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Command::Tokens(source) => {
            let text = source.read()?;
            for token in tokenize(&text) {
                println!("{:<4} {:>6} {}", token.kind.to_string(), token.pos, token.lexeme);
            }
        }
        Command::Parse { source, pretty } => {
            let text = source.read()?;
            match parser::parse(&text) {
                Ok(items) => {
                    let json = if pretty {
                        serde_json::to_string_pretty(&items)?
                    } else {
                        serde_json::to_string(&items)?
                    };
                    println!("{json}");
                }
                Err(err) => {
                    eprintln!("{}", err.render(&text));
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
