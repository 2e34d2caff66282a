//! Error types for markup parsing
//!
//! Parsing is all-or-nothing: any of these errors aborts the parse and no
//! partial tree is returned.

use crate::node::Position;
use thiserror::Error;

/// Result type for markup operations
pub type MarkupResult<T> = Result<T, MarkupError>;

/// Errors produced while parsing a markup document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A character that cannot start or continue the current construct
    #[error("{position}: unexpected character `{found}`, expected {expected}")]
    Unexpected {
        found: char,
        expected: &'static str,
        position: Position,
    },

    /// Input ended in the middle of a construct
    #[error("{position}: unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: &'static str,
        position: Position,
    },

    /// An element was opened but never closed
    #[error("{position}: element `<{name}>` is never closed")]
    UnclosedElement { name: String, position: Position },

    /// A closing tag does not match the innermost open element
    #[error("{position}: closing tag `</{found}>` does not match `<{expected}>`")]
    MismatchedClosingTag {
        expected: String,
        found: String,
        position: Position,
    },

    /// A closing tag with no open element
    #[error("{position}: unexpected closing tag `</{name}>`")]
    StrayClosingTag { name: String, position: Position },

    /// A quoted attribute value without its closing quote
    #[error("{position}: unterminated string in attribute `{name}`")]
    UnterminatedAttribute { name: String, position: Position },

    /// A `{` without a matching `}`
    #[error("{position}: unterminated expression")]
    UnterminatedExpression { position: Position },

    /// An attribute expression `{...}` that is not a spread
    #[error("{position}: attribute expression must be a spread (`{{...value}}`)")]
    InvalidSpread { position: Position },
}

impl MarkupError {
    /// Position at which the error was detected
    pub fn position(&self) -> Position {
        match self {
            MarkupError::Unexpected { position, .. }
            | MarkupError::UnexpectedEof { position, .. }
            | MarkupError::UnclosedElement { position, .. }
            | MarkupError::MismatchedClosingTag { position, .. }
            | MarkupError::StrayClosingTag { position, .. }
            | MarkupError::UnterminatedAttribute { position, .. }
            | MarkupError::UnterminatedExpression { position }
            | MarkupError::InvalidSpread { position } => *position,
        }
    }
}
