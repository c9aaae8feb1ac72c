use shared::protocol::{ParseFailure, ParseRequest, ParseResponse};
use tracing::{debug, info};

/// Runs the literal parser over a request's sentence. Syntax errors are part
/// of the answer, not a failure of the call.
pub fn parse_sentence(request: &ParseRequest) -> ParseResponse {
    debug!(sentence_len = request.sentence.len(), "parsing sentence");
    match parser::parse(&request.sentence) {
        Ok(items) => {
            debug!(items = items.len(), "sentence parsed");
            ParseResponse::Items(items)
        }
        Err(error) => {
            let location = error.location();
            info!(
                line = location.line,
                column = location.column,
                %error,
                "sentence rejected"
            );
            ParseResponse::Failure(ParseFailure {
                error: error.to_string(),
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
