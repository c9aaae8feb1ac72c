//! Tokenizer for data-literal sentences.
//!
//! Whitespace and `#` line comments are skipped between tokens. Anything that
//! is not one of the named token kinds becomes a single-character token whose
//! kind is the character itself, so punctuation needs no table of its own.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Int,
    Atom,
    Key,
    Bool,
    Arrow,
    PercentBrace,
    Char(char),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => f.write_str("INT"),
            Self::Atom => f.write_str("ATOM"),
            Self::Key => f.write_str("KEY"),
            Self::Bool => f.write_str("BOOL"),
            Self::Arrow => f.write_str("=>"),
            Self::PercentBrace => f.write_str("%{"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Eof => f.write_str("EOF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    /// Byte offset of the lexeme in the source text.
    pub pos: usize,
}

pub const EOF_LEXEME: &str = "<EOF>";

/// Splits `text` into tokens. The result always ends with a single `Eof`
/// token positioned at `text.len()`.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    loop {
        pos = skip_trivia(text, pos);
        if pos >= text.len() {
            break;
        }
        let (kind, len) = scan(text, pos);
        tokens.push(Token {
            kind,
            lexeme: &text[pos..pos + len],
            pos,
        });
        pos += len;
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        lexeme: EOF_LEXEME,
        pos: text.len(),
    });
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn skip_trivia(text: &str, mut pos: usize) -> usize {
    loop {
        let rest = &text[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if !trimmed.starts_with('#') {
            return pos;
        }
        pos += trimmed.find('\n').unwrap_or(trimmed.len());
    }
}

fn scan(text: &str, pos: usize) -> (TokenKind, usize) {
    let rest = &text[pos..];
    if let Some(len) = scan_int(rest) {
        return (TokenKind::Int, len);
    }
    if let Some(len) = rest.strip_prefix(':').and_then(scan_identifier) {
        return (TokenKind::Atom, len + 1);
    }
    if let Some(len) = scan_identifier(rest).filter(|&len| rest[len..].starts_with(':')) {
        return (TokenKind::Key, len + 1);
    }
    if let Some(len) = scan_bool(text, pos) {
        return (TokenKind::Bool, len);
    }
    if rest.starts_with("=>") {
        return (TokenKind::Arrow, 2);
    }
    if rest.starts_with("%{") {
        return (TokenKind::PercentBrace, 2);
    }
    // `pos` always sits on a char boundary below `text.len()` here.
    let c = rest.chars().next().unwrap_or_default();
    (TokenKind::Char(c), c.len_utf8())
}

/// A digit, then any number of digit groups each optionally led by `_`.
/// A trailing or doubled underscore ends the literal before it.
fn scan_int(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if !bytes.first()?.is_ascii_digit() {
        return None;
    }
    let mut end = 1;
    loop {
        let start = if bytes.get(end) == Some(&b'_') { end + 1 } else { end };
        let digits = bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if digits == 0 {
            return Some(end);
        }
        end = start + digits;
    }
}

/// `[_a-zA-Z]` followed by word characters.
fn scan_identifier(rest: &str) -> Option<usize> {
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    Some(
        chars
            .find(|(_, c)| !is_word_char(*c))
            .map_or(rest.len(), |(i, _)| i),
    )
}

fn scan_bool(text: &str, pos: usize) -> Option<usize> {
    let boundary_before = text[..pos]
        .chars()
        .next_back()
        .map_or(true, |c| !is_word_char(c));
    if !boundary_before {
        return None;
    }
    let rest = &text[pos..];
    ["true", "false"].into_iter().find_map(|literal| {
        let after = rest.strip_prefix(literal)?;
        let boundary_after = after.chars().next().map_or(true, |c| !is_word_char(c));
        boundary_after.then_some(literal.len())
    })
}
