//! Diagnostics reported by a parse.
//!
//! Lexical and syntax errors are both turned into [`Diagnostic`]s carrying
//! the original [`ParseError`], a severity and a resolved line/column. The
//! collector enforces [`ParseOptions::max_diagnostics`](crate::ParseOptions).

use std::fmt;

use crate::ast::{LineIndex, Position, Span};
use crate::parser::{ErrorKind, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub error: ParseError,
    pub span: Span,
    /// Line and column of `span.start`.
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.message)
    }
}

/// Accumulates diagnostics up to a limit.
///
/// Once the limit is reached, further reports are dropped and a single
/// warning records that the list was cut short.
pub(crate) struct Diagnostics<'a> {
    line_index: &'a LineIndex,
    items: Vec<Diagnostic>,
    limit: usize,
    truncated: bool,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(line_index: &'a LineIndex, limit: usize) -> Self {
        Self {
            line_index,
            items: Vec::new(),
            limit,
            truncated: false,
        }
    }

    pub(crate) fn report(&mut self, error: ParseError) {
        if self.truncated {
            return;
        }
        if self.items.len() >= self.limit {
            self.truncated = true;
            let notice = ParseError::TooManyDiagnostics {
                limit: self.limit,
                span: error.span(),
            };
            self.push(Severity::Warning, notice);
            return;
        }
        self.push(Severity::Error, error);
    }

    pub(crate) fn extend(&mut self, errors: impl IntoIterator<Item = ParseError>) {
        for error in errors {
            self.report(error);
        }
    }

    pub(crate) fn finish(self) -> Vec<Diagnostic> {
        self.items
    }

    fn push(&mut self, severity: Severity, error: ParseError) {
        let span = error.span();
        self.items.push(Diagnostic {
            severity,
            span,
            position: self.line_index.position(span.start),
            message: error.to_string(),
            error,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax_error(at: usize) -> ParseError {
        ParseError::unexpected("expression", "`)`", Span::new(at, at + 1))
    }

    #[test]
    fn test_positions_resolved() {
        let index = LineIndex::new("A\nBC");
        let mut diagnostics = Diagnostics::new(&index, 10);
        diagnostics.report(syntax_error(3));
        let items = diagnostics.finish();
        assert_eq!(items[0].line(), 2);
        assert_eq!(items[0].column(), 2);
        assert_eq!(items[0].to_string(), "2:2: error: expected expression, found `)`");
    }

    #[test]
    fn test_limit_appends_single_warning() {
        let index = LineIndex::new("ABCDEFGH");
        let mut diagnostics = Diagnostics::new(&index, 2);
        diagnostics.extend((0..5).map(syntax_error));
        let items = diagnostics.finish();
        assert_eq!(items.len(), 3);
        assert!(items[..2].iter().all(Diagnostic::is_error));
        assert_eq!(items[2].severity, Severity::Warning);
        assert_eq!(items[2].kind(), ErrorKind::Limit);
    }
}
