//! Parse error types.
//!
//! Parse errors capture what went wrong and where, enabling good error messages.
//! The lexer and parser both record errors and keep going, so one pass over a
//! program reports every problem it can find.

use crate::ast::Span;
use thiserror::Error;

/// Broad classification of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed characters, strings or continuations.
    Lexical,
    /// Tokens that do not form a valid statement or expression.
    Syntax,
    /// A block construct never saw its terminator.
    UnterminatedBlock,
    /// The diagnostic limit was reached and later reports were dropped.
    Limit,
}

/// A parse error with location and description.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    // ==================== Lexical ====================
    /// A character that cannot start any token.
    #[error("invalid character {ch:?}")]
    InvalidCharacter { ch: char, span: Span },

    /// A string literal with no closing delimiter before the end of the line.
    #[error("unterminated string literal")]
    UnterminatedString {
        /// Location where the string started.
        span: Span,
    },

    /// `&` that is not immediately followed by a line break.
    #[error("`&` must be followed by a line break")]
    UnterminatedContinuation { span: Span },

    // ==================== Syntax ====================
    /// Expected a specific token but found something else.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What we expected to find.
        expected: String,
        /// What we actually found.
        found: String,
        /// Location of the unexpected token.
        span: Span,
    },

    /// Reached end of input unexpectedly.
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEof {
        /// What we expected to find.
        expected: String,
        /// Zero-width span at the end of the input.
        span: Span,
    },

    /// A token that cannot begin an expression where one is required.
    #[error("invalid expression: {message}")]
    InvalidExpression { span: Span, message: String },

    /// A statement without a clause it requires.
    #[error("{statement} requires {clause}")]
    MissingClause {
        /// Leading keyword of the statement, e.g. `OPEN`.
        statement: String,
        /// Description of the missing clause.
        clause: String,
        span: Span,
    },

    /// A block terminator with no open block it could close.
    #[error("{terminator} without a matching {opener}")]
    UnexpectedTerminator {
        terminator: String,
        opener: String,
        span: Span,
    },

    // ==================== Blocks ====================
    /// A block construct that was never closed.
    #[error("{construct} is missing its {expected}")]
    UnterminatedBlock {
        /// Opening keyword sequence, e.g. `FOR`.
        construct: String,
        /// The terminator that was never found, e.g. `NEXT`.
        expected: String,
        /// Location of the opening keyword.
        span: Span,
    },

    // ==================== Limits ====================
    /// Emitted once when the diagnostic limit is exceeded.
    #[error("too many diagnostics; only the first {limit} are reported")]
    TooManyDiagnostics { limit: usize, span: Span },
}

impl ParseError {
    /// Returns the span of this error.
    pub fn span(&self) -> Span {
        match self {
            ParseError::InvalidCharacter { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::UnterminatedContinuation { span }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnexpectedEof { span, .. }
            | ParseError::InvalidExpression { span, .. }
            | ParseError::MissingClause { span, .. }
            | ParseError::UnexpectedTerminator { span, .. }
            | ParseError::UnterminatedBlock { span, .. }
            | ParseError::TooManyDiagnostics { span, .. } => *span,
        }
    }

    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::InvalidCharacter { .. }
            | ParseError::UnterminatedString { .. }
            | ParseError::UnterminatedContinuation { .. } => ErrorKind::Lexical,
            ParseError::UnterminatedBlock { .. } => ErrorKind::UnterminatedBlock,
            ParseError::TooManyDiagnostics { .. } => ErrorKind::Limit,
            _ => ErrorKind::Syntax,
        }
    }

    /// Creates an "unexpected token" error.
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    /// Creates an "unexpected EOF" error.
    pub fn eof(expected: impl Into<String>, span: Span) -> Self {
        ParseError::UnexpectedEof {
            expected: expected.into(),
            span,
        }
    }

    /// Creates an "unterminated block" error pointing at the opening keyword.
    pub fn unterminated(
        construct: impl Into<String>,
        expected: impl Into<String>,
        span: Span,
    ) -> Self {
        ParseError::UnterminatedBlock {
            construct: construct.into(),
            expected: expected.into(),
            span,
        }
    }
}

/// Errors that stop parsing before it starts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FatalError {
    /// The input bytes are not valid UTF-8.
    #[error("source is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidEncoding { valid_up_to: usize },
}

impl From<std::str::Utf8Error> for FatalError {
    fn from(err: std::str::Utf8Error) -> Self {
        FatalError::InvalidEncoding {
            valid_up_to: err.valid_up_to(),
        }
    }
}
