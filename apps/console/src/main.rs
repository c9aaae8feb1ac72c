use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use clap::Parser;
use client_core::{ClientError, Page, ParseClient, ParseHandler};
use shared::protocol::{PARSE_RESULT_ID, SENTENCE_INPUT_ID};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Sends sentences to a literal parse server and prints each JSON answer.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "PARSE_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Parse this sentence and exit instead of reading stdin line by line.
    #[arg(long)]
    sentence: Option<String>,
}

/// Stdin line in, stdout line out.
#[derive(Default)]
struct TerminalPage {
    sentence: Mutex<String>,
}

impl TerminalPage {
    fn type_sentence(&self, sentence: String) {
        *self.sentence.lock().unwrap_or_else(PoisonError::into_inner) = sentence;
    }
}

impl Page for TerminalPage {
    fn input_value(&self, element_id: &str) -> Option<String> {
        (element_id == SENTENCE_INPUT_ID)
            .then(|| self.sentence.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set_text_content(&self, element_id: &str, text: String) -> Result<(), ClientError> {
        if element_id != PARSE_RESULT_ID {
            return Err(ClientError::MissingElement(element_id.to_string()));
        }
        println!("{text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let client = ParseClient::new(&args.server_url)?;
    info!(endpoint = %client.endpoint(), "using parse endpoint");
    let page = Arc::new(TerminalPage::default());
    let handler = ParseHandler::new(client, page.clone());

    if let Some(sentence) = args.sentence {
        page.type_sentence(sentence);
        handler.handle().await;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = Vec::new();
    while let Some(line) = lines.next_line().await? {
        page.type_sentence(line);
        pending.push(handler.trigger());
    }
    for result in futures::future::join_all(pending).await {
        result?;
    }
    Ok(())
}
