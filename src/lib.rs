//! # pickbasic
//!
//! A disambiguating parser for the 1985 Pick BASIC dialect used on
//! multi-value database platforms.
//!
//! ## Architecture
//!
//! ```text
//! Source → Lexer → Parser → Program (syntax tree) + Diagnostics
//! ```
//!
//! - [`lexer`] - Tokenizes source code and classifies context-sensitive tokens
//! - [`parser`] - Builds the syntax tree, resolving the dialect's ambiguities
//! - [`ast`] - Syntax tree type definitions
//! - [`diagnostics`] - Errors and warnings with resolved line/column positions
//!
//! Parsing never stops at the first problem: every call returns a tree
//! together with all diagnostics found.
//!
//! ## Example
//!
//! ```
//! use pickbasic::ast::StatementKind;
//!
//! let source = "
//! * totals
//! FOR I = 1 TO 10
//!    TOTAL = TOTAL + REC<I>
//! NEXT I
//! ";
//!
//! let result = pickbasic::parse(source);
//! assert!(!result.has_errors());
//!
//! let stmt = result.program.statements().next().unwrap();
//! assert!(matches!(stmt.kind, StatementKind::For { .. }));
//! ```

pub mod ast;
pub mod diagnostics;
pub mod lexer;
mod options;
pub mod parser;

pub use diagnostics::{Diagnostic, Severity};
pub use options::ParseOptions;
pub use parser::{FatalError, ParseError};

use log::debug;

use ast::Program;
use diagnostics::Diagnostics;
use lexer::lex;
use parser::Parser;

/// The outcome of a parse: a tree and everything that went wrong building it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub program: Program,
    /// Lexical diagnostics first, then syntactic ones, each in source order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// True if any diagnostic is an error (warnings alone do not count).
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Parses source text with default options.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, &ParseOptions::default())
}

/// Parses source text.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> ParseResult {
    let lexed = lex(source);

    let comments = if options.keep_comments {
        lexed.comments.as_slice()
    } else {
        &[]
    };
    let mut parser = Parser::new(&lexed.tokens, comments);
    let program = parser.parse();

    let mut diagnostics = Diagnostics::new(&lexed.line_index, options.max_diagnostics);
    diagnostics.extend(lexed.errors);
    let mut syntax_errors = parser.take_errors();
    // Block errors are recorded when the block ends, after the errors inside it
    syntax_errors.sort_by_key(|error| error.span().start);
    diagnostics.extend(syntax_errors);
    let diagnostics = diagnostics.finish();

    debug!(
        "parsed {} tokens into {} items with {} diagnostics",
        lexed.tokens.len(),
        program.items.len(),
        diagnostics.len()
    );

    ParseResult {
        program,
        diagnostics,
    }
}

/// Parses raw bytes, which must be valid UTF-8.
///
/// ```
/// let err = pickbasic::parse_bytes(b"X = 1\n\xff").unwrap_err();
/// assert!(matches!(err, pickbasic::FatalError::InvalidEncoding { valid_up_to: 6 }));
/// ```
pub fn parse_bytes(bytes: &[u8]) -> Result<ParseResult, FatalError> {
    let source = std::str::from_utf8(bytes)?;
    Ok(parse(source))
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::ast::{Expr, ExprKind, Item, Program, Span, Statement, StatementKind};
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::lexer::{Keyword, Lexer, Token, TokenKind, lex};
    pub use crate::parser::{ParseError, Parser};
    pub use crate::{ParseOptions, ParseResult, parse, parse_with_options};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ErrorKind;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_results_are_send_and_sync() {
        assert_send_sync::<ParseResult>();
        assert_send_sync::<Diagnostic>();
        assert_send_sync::<FatalError>();
    }

    #[test]
    fn test_lexical_diagnostics_come_first() {
        let result = parse("X = = 1\nY = 'open");
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[0].kind(), ErrorKind::Lexical);
        assert_eq!(result.diagnostics[1].kind(), ErrorKind::Syntax);
        assert_eq!(result.diagnostics[1].line(), 1);
    }

    #[test]
    fn test_syntax_diagnostics_in_source_order() {
        let result = parse("FOR I = 1 TO 2\n X = = 1\n");
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[0].kind(), ErrorKind::UnterminatedBlock);
        assert_eq!(result.diagnostics[0].line(), 1);
        assert_eq!(result.diagnostics[1].kind(), ErrorKind::Syntax);
        assert_eq!(result.diagnostics[1].line(), 2);
    }

    #[test]
    fn test_keep_comments_option() {
        let source = "* note\nX = 1";
        assert_eq!(parse(source).program.items.len(), 2);

        let options = ParseOptions::default().keep_comments(false);
        assert_eq!(parse_with_options(source, &options).program.items.len(), 1);
    }

    #[test]
    fn test_diagnostic_limit() {
        let source = "X = =\n".repeat(5);
        let options = ParseOptions::default().max_diagnostics(2);
        let result = parse_with_options(&source, &options);
        assert_eq!(result.diagnostics.len(), 3);
        assert_eq!(result.diagnostics[2].severity, Severity::Warning);
        assert!(result.has_errors());
    }

    #[test]
    fn test_parse_bytes_accepts_utf8() {
        let result = parse_bytes(b"PRINT 'HI'").unwrap();
        assert!(!result.has_errors());
        assert_eq!(result.program.statements().count(), 1);
    }
}
