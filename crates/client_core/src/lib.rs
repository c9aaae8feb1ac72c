//! Client side of the literal parse service.
//!
//! [`ParseHandler`] is the function a UI binds to its "parse" button: it reads
//! the sentence input, posts it to `/parse`, and renders whatever JSON comes
//! back into the result element. It never retries and never surfaces errors to
//! its caller; failures go to the page's diagnostic log and leave the result
//! element untouched.

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::protocol::{ParseRequest, PARSE_RESULT_ID, PARSE_ROUTE, SENTENCE_INPUT_ID};
use tokio::task::JoinHandle;
use tracing::debug;
use url::Url;

pub mod error;
pub mod page;

pub use error::ClientError;
pub use page::{FormPage, Page};

/// HTTP client for the `/parse` endpoint.
#[derive(Debug, Clone)]
pub struct ParseClient {
    http: Client,
    endpoint: Url,
}

impl ParseClient {
    /// `server_url` is the page origin; the endpoint path replaces any path it
    /// carries.
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        let endpoint = Url::parse(server_url)?.join(PARSE_ROUTE)?;
        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts `{"sentence": ...}` and returns the response body as opaque JSON.
    /// Transport errors, non-2xx answers and non-JSON bodies are all errors.
    /// Any nesting depth the server produces is accepted, and numbers keep
    /// their original text.
    pub async fn parse(&self, sentence: &str) -> Result<Value, ClientError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&ParseRequest::new(sentence))
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: self.endpoint.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status });
        }
        let body = response.bytes().await.map_err(ClientError::Body)?;
        decode_opaque(&body)
    }
}

fn decode_opaque(body: &[u8]) -> Result<Value, ClientError> {
    let mut json = serde_json::Deserializer::from_slice(body);
    json.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))
        .map_err(ClientError::Decode)?;
    json.end().map_err(ClientError::Decode)?;
    Ok(value)
}

#[derive(Clone)]
pub struct ParseHandler {
    client: ParseClient,
    page: Arc<dyn Page>,
}

impl ParseHandler {
    pub fn new(client: ParseClient, page: Arc<dyn Page>) -> Self {
        Self { client, page }
    }

    /// UI entry point. Reads the sentence now, then runs the request on the
    /// current tokio runtime and returns without waiting for it. Overlapping
    /// triggers are not serialized: whichever response lands last owns the
    /// result element.
    pub fn trigger(&self) -> JoinHandle<()> {
        let sentence = self.page.input_value(SENTENCE_INPUT_ID);
        let handler = self.clone();
        tokio::spawn(async move { handler.complete(sentence).await })
    }

    /// Runs one full cycle in place.
    pub async fn handle(&self) {
        let sentence = self.page.input_value(SENTENCE_INPUT_ID);
        self.complete(sentence).await;
    }

    async fn complete(&self, sentence: Option<String>) {
        if let Err(err) = self.round_trip(sentence).await {
            self.page.log_error(&format!("Error: {err}"));
        }
    }

    async fn round_trip(&self, sentence: Option<String>) -> Result<(), ClientError> {
        let sentence =
            sentence.ok_or_else(|| ClientError::MissingElement(SENTENCE_INPUT_ID.to_string()))?;
        debug!(
            endpoint = %self.client.endpoint(),
            sentence_len = sentence.len(),
            "posting sentence"
        );
        let value = self.client.parse(&sentence).await?;
        self.page.set_text_content(PARSE_RESULT_ID, value.to_string())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
