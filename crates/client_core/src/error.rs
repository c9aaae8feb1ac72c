use reqwest::StatusCode;
use thiserror::Error;

/// Why one handler cycle did not render. Callers of the handler never see
/// these; they are written to the page's diagnostic log.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server answered {status}")]
    Status { status: StatusCode },
    #[error("reading response body failed: {0}")]
    Body(#[source] reqwest::Error),
    #[error("response body is not JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
