use thiserror::Error;

use crate::lexer::TokenKind;

/// Where an error points in the source text. `line` and `column` are 1-based;
/// `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Resolves the token offset `pos` against `text`. A position at end of
    /// input or on a newline is pulled back onto the previous character so the
    /// caret lands under something visible.
    pub fn resolve(text: &str, pos: usize) -> Self {
        let mut offset = pos.min(text.len());
        if offset >= text.len() || text[offset..].starts_with('\n') {
            offset = text[..offset]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        }
        let line_start = text[..offset].rfind('\n').map_or(0, |i| i + 1);
        Self {
            offset,
            line: text[..offset].matches('\n').count() + 1,
            column: text[line_start..offset].chars().count() + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expecting '{expected}' but got '{found}'")]
    Unexpected {
        expected: TokenKind,
        found: TokenKind,
        location: Location,
    },
    #[error("integer literal '{lexeme}' is out of range")]
    IntegerOutOfRange { lexeme: String, location: Location },
    #[error("nesting exceeds {limit} levels")]
    TooDeep { limit: usize, location: Location },
}

impl ParseError {
    pub fn location(&self) -> Location {
        match self {
            Self::Unexpected { location, .. }
            | Self::IntegerOutOfRange { location, .. }
            | Self::TooDeep { location, .. } => *location,
        }
    }

    /// Formats the error the way a terminal tool reports it: the message, the
    /// offending source line, then a caret under the offending column.
    pub fn render(&self, text: &str) -> String {
        let location = self.location();
        let line_start = text[..location.offset].rfind('\n').map_or(0, |i| i + 1);
        let line_end = text[location.offset..]
            .find('\n')
            .map_or(text.len(), |i| location.offset + i);
        format!(
            "error: {self}\n{}\n{}^",
            &text[line_start..line_end],
            " ".repeat(location.column - 1)
        )
    }
}
