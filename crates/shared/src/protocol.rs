use serde::{Deserialize, Serialize};

use crate::domain::DataItem;

pub const PARSE_ROUTE: &str = "/parse";

/// DOM id of the text input the handler reads.
pub const SENTENCE_INPUT_ID: &str = "sentenceInput";
/// DOM id of the element the handler renders into.
pub const PARSE_RESULT_ID: &str = "parseResult";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    pub sentence: String,
}

impl ParseRequest {
    pub fn new(sentence: impl Into<String>) -> Self {
        Self {
            sentence: sentence.into(),
        }
    }
}

/// Body of a `/parse` answer for text that is not a well-formed sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    pub error: String,
}

/// Server-side answer to `/parse`. Serialize only: clients treat the body as
/// opaque JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParseResponse {
    Items(Vec<DataItem>),
    Failure(ParseFailure),
}
