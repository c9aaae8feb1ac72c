//! Parser for Elixir-flavoured data literals.
//!
//! A sentence is a sequence of items: lists `[..]`, tuples `{..}`, maps
//! `%{..}`, integers, atoms (`:name`) and booleans. Map entries are either
//! `name: item` or `item => item`.

use shared::domain::DataItem;

mod error;
pub mod lexer;

pub use error::{Location, ParseError};
use lexer::{tokenize, Token, TokenKind};

/// Deepest container nesting accepted before the parser gives up.
pub const MAX_NESTING: usize = 128;

pub fn parse(text: &str) -> Result<Vec<DataItem>, ParseError> {
    let mut parser = Parser::new(text);
    let items = parser.items()?;
    parser.expect_end()?;
    Ok(items)
}

struct Parser<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    index: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            tokens: tokenize(text),
            index: 0,
            depth: 0,
        }
    }

    fn current(&self) -> Token<'a> {
        self.tokens[self.index]
    }

    fn peek(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token<'a>, ParseError> {
        let token = self.current();
        if token.kind != kind {
            return Err(ParseError::Unexpected {
                expected: kind,
                found: token.kind,
                location: self.location(),
            });
        }
        // The trailing EOF token is never consumed, so this stays in bounds.
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        Ok(token)
    }

    fn location(&self) -> Location {
        Location::resolve(self.text, self.current().pos)
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        self.consume(TokenKind::Eof).map(|_| ())
    }

    fn is_item_start(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Atom
                | TokenKind::Int
                | TokenKind::Bool
                | TokenKind::Char('[')
                | TokenKind::Char('{')
                | TokenKind::PercentBrace
        )
    }

    fn items(&mut self) -> Result<Vec<DataItem>, ParseError> {
        let mut items = Vec::new();
        while self.is_item_start() {
            items.push(self.item()?);
        }
        Ok(items)
    }

    fn item(&mut self) -> Result<DataItem, ParseError> {
        match self.current().kind {
            TokenKind::Char('[') => self.nested(|p| p.sequence('[', ']').map(DataItem::List)),
            TokenKind::Char('{') => self.nested(|p| p.sequence('{', '}').map(DataItem::Tuple)),
            TokenKind::PercentBrace => self.nested(Self::map),
            _ => self.primitive(),
        }
    }

    fn nested(
        &mut self,
        container: impl FnOnce(&mut Self) -> Result<DataItem, ParseError>,
    ) -> Result<DataItem, ParseError> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::TooDeep {
                limit: MAX_NESTING,
                location: self.location(),
            });
        }
        self.depth += 1;
        let item = container(self);
        self.depth -= 1;
        item
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<DataItem>, ParseError> {
        self.consume(TokenKind::Char(open))?;
        let mut items = Vec::new();
        if self.is_item_start() {
            items.push(self.item()?);
            while self.peek(TokenKind::Char(',')) {
                self.consume(TokenKind::Char(','))?;
                items.push(self.item()?);
            }
        }
        self.consume(TokenKind::Char(close))?;
        Ok(items)
    }

    fn map(&mut self) -> Result<DataItem, ParseError> {
        self.consume(TokenKind::PercentBrace)?;
        let mut pairs = Vec::new();
        if self.is_item_start() || self.peek(TokenKind::Key) {
            pairs.push(self.key_value()?);
            while self.peek(TokenKind::Char(',')) {
                self.consume(TokenKind::Char(','))?;
                pairs.push(self.key_value()?);
            }
        }
        self.consume(TokenKind::Char('}'))?;
        Ok(DataItem::Map(pairs))
    }

    fn key_value(&mut self) -> Result<(DataItem, DataItem), ParseError> {
        let key = if self.peek(TokenKind::Key) {
            let token = self.consume(TokenKind::Key)?;
            DataItem::atom_from_key(token.lexeme.trim_end_matches(':'))
        } else {
            let key = self.item()?;
            self.consume(TokenKind::Arrow)?;
            key
        };
        let value = self.item()?;
        Ok((key, value))
    }

    fn primitive(&mut self) -> Result<DataItem, ParseError> {
        if self.peek(TokenKind::Int) {
            let location = self.location();
            let token = self.consume(TokenKind::Int)?;
            let digits: String = token.lexeme.chars().filter(|c| *c != '_').collect();
            return digits
                .parse::<u64>()
                .map(DataItem::Int)
                .map_err(|_| ParseError::IntegerOutOfRange {
                    lexeme: token.lexeme.to_string(),
                    location,
                });
        }
        if self.peek(TokenKind::Atom) {
            let token = self.consume(TokenKind::Atom)?;
            return Ok(DataItem::Atom(token.lexeme.to_string()));
        }
        let token = self.consume(TokenKind::Bool)?;
        Ok(DataItem::Bool(token.lexeme == "true"))
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
