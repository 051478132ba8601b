//! Syntax tree definitions for Pick BASIC.
//!
//! The tree represents one program unit (a main program or a subroutine)
//! after parsing. Every node owns its children and carries its source span.
//!
//! # Structure
//!
//! ```text
//! Program
//! └── Vec<Item>
//!     ├── Statement { kind: StatementKind, span }
//!     │   ├── For { variable, start, end, step, body: Vec<Item>, ... }
//!     │   ├── If { condition, then_branch, else_branch, ... }
//!     │   └── ...
//!     ├── Label { name }
//!     └── Comment { text }
//! ```
//!
//! Node kinds have stable public names (see [`Statement::kind_name`] and
//! [`ExprKind::kind_name`]) and the whole tree can be rendered as an
//! S-expression with [`Program::to_sexp`].

mod expr;
mod sexp;
mod stmt;

pub use expr::*;
pub use stmt::*;

/// A span representing a range in the source text.
///
/// Spans are byte offsets from the start of the source, matching the lexer's spans.
///
/// # Example
///
/// ```
/// use pickbasic::ast::Span;
///
/// let span = Span::new(0, 5);
/// assert_eq!(span.start, 0);
/// assert_eq!(span.end, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the start of the span (inclusive).
    pub start: usize,
    /// Byte offset of the end of the span (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span from start to end byte offsets.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a span that covers both `self` and `other`.
    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for a zero-width span.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A 1-based line/column position.
///
/// Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
    source: String,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            source: source.to_string(),
        }
    }

    /// Resolves a byte offset. Offsets past the end clamp to the end of input.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(offset - line_start);
        Position {
            line: line + 1,
            column: column + 1,
        }
    }
}

/// A numeric statement label, the target of `GOTO`/`GOSUB`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// The label digits as written.
    pub name: String,
    pub span: Span,
}

/// How a comment was introduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `* text`
    Star,
    /// `! text`
    Bang,
    /// `REM text`
    Rem,
}

/// A comment that occupies statement position.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub style: CommentStyle,
    /// Full comment text including its opener.
    pub text: String,
    pub span: Span,
}

/// One entry of a statement list.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Statement(Statement),
    Label(Label),
    Comment(Comment),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Statement(stmt) => stmt.span,
            Item::Label(label) => label.span,
            Item::Comment(comment) => comment.span,
        }
    }

    /// Returns the statement if this item is one.
    pub fn as_statement(&self) -> Option<&Statement> {
        match self {
            Item::Statement(stmt) => Some(stmt),
            _ => None,
        }
    }
}

/// A complete Pick BASIC program unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level items in source order.
    pub items: Vec<Item>,
}

impl Program {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    /// Iterates over the top-level statements, skipping labels and comments.
    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.items.iter().filter_map(Item::as_statement)
    }
}
