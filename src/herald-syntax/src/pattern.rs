//! Pattern structure and parsing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur when parsing a pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    /// A catch-all token appeared before the end of the pattern.
    #[error("catch-all token `{0}...` must be the last token of the pattern")]
    CatchAllNotLast(String),

    /// Two tokens capture under the same name.
    #[error("capture name `{0}` is used more than once")]
    DuplicateName(String),

    /// A capture, selector or catch-all token has no name.
    #[error("token `{0}` has an empty name")]
    EmptyName(String),
}

/// One token of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A word that must appear verbatim in the input (compared
    /// case-insensitively).
    Literal(String),

    /// `[name]` — captures exactly one input token.
    Capture(String),

    /// `[name?]` — captures zero or one input token. Consumes greedily: when
    /// both consuming and skipping would match, the token is consumed.
    OptionalCapture(String),

    /// `{name}` — captures one input token that must equal one of the values
    /// supplied for `name` at match time.
    Selector(String),

    /// `name...` — captures all remaining input tokens (at least one) joined
    /// by single spaces. Only valid in trailing position.
    CatchAll(String),
}

impl Token {
    /// The capture name of this token, if it captures anything.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Capture(name)
            | Token::OptionalCapture(name)
            | Token::Selector(name)
            | Token::CatchAll(name) => Some(name),
        }
    }
}

/// A parsed syntax pattern.
///
/// Patterns are whitespace-separated token grammars:
///
/// ```text
/// world                literal
/// world [name]         literal + required capture
/// [name?]              optional capture
/// {color} level        selector + literal
/// echo text...         literal + trailing catch-all
/// ```
///
/// The empty pattern is valid and matches only empty input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    tokens: Vec<Token>,
}

impl Pattern {
    /// Parse a pattern from its textual form.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let mut tokens: Vec<Token> = Vec::new();

        let words: Vec<&str> = pattern.split_whitespace().collect();

        for (position, word) in words.iter().enumerate() {
            let token = classify(word)?;

            if let Token::CatchAll(name) = &token
                && position + 1 != words.len()
            {
                return Err(PatternError::CatchAllNotLast(name.clone()));
            }

            if let Some(name) = token.name()
                && tokens.iter().any(|t| t.name() == Some(name))
            {
                return Err(PatternError::DuplicateName(name.to_string()));
            }

            tokens.push(token);
        }

        Ok(Self {
            raw: words.join(" "),
            tokens,
        })
    }

    /// The tokens of this pattern, in order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The normalized textual form of this pattern.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The capture names declared by this pattern, in order.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().filter_map(Token::name)
    }

    /// Whether this pattern contains no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Classify a single pattern word into a token.
fn classify(word: &str) -> Result<Token, PatternError> {
    if let Some(inner) = word.strip_prefix('[').and_then(|w| w.strip_suffix(']')) {
        return if let Some(name) = inner.strip_suffix('?') {
            require_name(name, word).map(Token::OptionalCapture)
        } else {
            require_name(inner, word).map(Token::Capture)
        };
    }

    if let Some(inner) = word.strip_prefix('{').and_then(|w| w.strip_suffix('}')) {
        return require_name(inner, word).map(Token::Selector);
    }

    if let Some(name) = word.strip_suffix("...") {
        return require_name(name, word).map(Token::CatchAll);
    }

    Ok(Token::Literal(word.to_lowercase()))
}

fn require_name(name: &str, word: &str) -> Result<String, PatternError> {
    if name.is_empty() {
        Err(PatternError::EmptyName(word.to_string()))
    } else {
        Ok(name.to_string())
    }
}
