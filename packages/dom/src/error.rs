//! Error types for markup parsing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),

    #[error("unexpected character {ch:?} at byte {at}")]
    UnexpectedChar { ch: char, at: usize },

    #[error("unterminated attribute value starting at byte {0}")]
    UnterminatedValue(usize),

    #[error("mismatched closing tag </{found}> at byte {at}, expected </{expected}>")]
    MismatchedClose {
        found: String,
        expected: String,
        at: usize,
    },

    #[error("closing tag </{tag}> at byte {at} without matching open tag")]
    UnexpectedClose { tag: String, at: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;
