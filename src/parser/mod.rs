//! Parser for Pick BASIC.
//!
//! The parser transforms a stream of tokens into a syntax tree. It uses
//! recursive descent for statements and precedence climbing for expressions.
//!
//! # Example
//!
//! ```
//! use pickbasic::lexer::lex;
//! use pickbasic::parser::Parser;
//!
//! let source = r#"
//!     PRINT "Hello, World!"
//!     X = 1 + 2
//! "#;
//!
//! let lexed = lex(source);
//! let mut parser = Parser::new(&lexed.tokens, &lexed.comments);
//! let program = parser.parse();
//!
//! assert!(parser.errors().is_empty());
//! assert_eq!(program.statements().count(), 2);
//! ```
//!
//! # Module Structure
//!
//! The parser is split into focused modules:
//! - [`tokens`] - Token navigation utilities (peek, advance, match, expect)
//! - [`expressions`] - Precedence climbing for expressions
//! - [`statements`] - Statement dispatcher and simple statements
//! - [`control_flow`] - IF/BEGIN CASE/FOR/LOOP and THEN/ELSE clauses
//! - [`files`] - File and record statements
//! - [`terminal`] - PRINT/INPUT and other terminal statements
//! - [`error`] - Parse error types
//!
//! # Error Recovery
//!
//! The parser never stops at the first error. A failed statement records its
//! error and the statement loop skips ahead to the next statement boundary.
//! A block that never sees its terminator is reported once, at its opening
//! keyword, and the partial construct is kept in the tree.

mod control_flow;
mod error;
mod expressions;
mod files;
mod statements;
mod terminal;
mod tokens;

pub use error::{ErrorKind, FatalError, ParseError};

use crate::ast::{Comment, Item, Program};
use crate::lexer::Token;

use control_flow::BlockKind;

/// Parser for Pick BASIC source code.
///
/// The parser consumes a slice of tokens and produces a syntax tree.
/// Errors are collected and can be read after parsing rather than failing immediately.
pub struct Parser<'a> {
    /// The tokens to parse.
    tokens: &'a [Token],
    /// Statement-position comments, in source order.
    comments: &'a [Comment],
    /// Current position in the token stream.
    current: usize,
    /// Position of the first token of the statement being parsed.
    statement_start: usize,
    /// Next comment not yet placed in the tree.
    next_comment: usize,
    /// Blocks currently open, innermost last.
    blocks: Vec<BlockKind>,
    /// Inside `NAME<...>`, where a bare `>` closes the reference.
    in_angle: bool,
    /// Collected parse errors.
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given tokens.
    ///
    /// `comments` are placed in the tree as [`Item::Comment`] nodes; pass an
    /// empty slice to leave them out.
    pub fn new(tokens: &'a [Token], comments: &'a [Comment]) -> Self {
        Self {
            tokens,
            comments,
            current: 0,
            statement_start: 0,
            next_comment: 0,
            blocks: Vec::new(),
            in_angle: false,
            errors: Vec::new(),
        }
    }

    /// Parses the token stream into a program.
    ///
    /// A program is always produced; check [`Parser::errors`] for problems.
    pub fn parse(&mut self) -> Program {
        Program::new(self.parse_program())
    }

    /// Errors recorded so far, in the order they were found.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Takes the recorded errors, leaving the parser's list empty.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Parses a complete program (sequence of items).
    fn parse_program(&mut self) -> Vec<Item> {
        let mut items = Vec::new();

        loop {
            self.drain_comments(&mut items);
            if self.skip_separator() {
                continue;
            }
            if self.is_at_end() {
                break;
            }
            self.parse_item(&mut items);
        }

        items
    }
}

/// Operator precedence levels for precedence climbing.
///
/// Higher values mean higher precedence (bind tighter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub(crate) enum Precedence {
    Lowest = 0,
    Or = 1,             // OR
    And = 2,            // AND
    Relational = 3,     // = <> # < > <= >= EQ NE LT GT LE GE MATCH
    Additive = 4,       // +, -
    Concat = 5,         // :, CAT
    Multiplicative = 6, // *, /
    Power = 7,          // ^, **
    Unary = 8,          // -, +, NOT
}

impl Precedence {
    pub(crate) fn from_u8(val: u8) -> Self {
        match val {
            0 => Precedence::Lowest,
            1 => Precedence::Or,
            2 => Precedence::And,
            3 => Precedence::Relational,
            4 => Precedence::Additive,
            5 => Precedence::Concat,
            6 => Precedence::Multiplicative,
            7 => Precedence::Power,
            _ => Precedence::Unary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        BinaryOp, ClauseForm, ExprKind, LoopConditionKind, ReadMode, Statement, StatementKind,
        TargetKind, UnaryOp,
    };
    use crate::lexer::lex;

    fn parse(source: &str) -> (Program, Vec<ParseError>) {
        let lexed = lex(source);
        let mut parser = Parser::new(&lexed.tokens, &lexed.comments);
        let program = parser.parse();
        let mut errors = lexed.errors;
        errors.extend(parser.take_errors());
        (program, errors)
    }

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        program
    }

    fn first_statement(source: &str) -> Statement {
        parse_ok(source)
            .statements()
            .next()
            .cloned()
            .expect("no statement")
    }

    fn assigned_value(source: &str) -> ExprKind {
        match first_statement(source).kind {
            StatementKind::Assignment { value, .. } => value.kind,
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_assignment() {
        let stmt = first_statement("X = 5");
        assert!(matches!(
            stmt.kind,
            StatementKind::Assignment { ref target, .. }
                if matches!(target.kind, ExprKind::Identifier(ref n) if n == "X")
        ));
    }

    #[test]
    fn test_parse_precedence() {
        // 2 + 3 * 4 should parse as 2 + (3 * 4)
        let ExprKind::Binary { op, right, .. } = assigned_value("X = 2 + 3 * 4") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn test_power_is_right_associative() {
        let ExprKind::Binary { op, left, right } = assigned_value("X = 2^3^2") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert!(matches!(left.kind, ExprKind::Number(ref n) if n == "2"));
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Pow, .. }));
    }

    #[test]
    fn test_unary_binds_tighter_than_power() {
        let ExprKind::Binary { op, left, .. } = assigned_value("X = -2^2") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Pow);
        assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        let ExprKind::Binary { op, right, .. } = assigned_value("X = A OR B AND C") else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinaryOp::Or);
        assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn test_double_star_is_power() {
        assert!(matches!(
            assigned_value("X = 2 ** 3"),
            ExprKind::Binary { op: BinaryOp::Pow, .. }
        ));
    }

    #[test]
    fn test_compound_relational_operators() {
        for (source, expected) in [
            ("X = A <> B", BinaryOp::Ne),
            ("X = A # B", BinaryOp::Ne),
            ("X = A <= B", BinaryOp::Le),
            ("X = A =< B", BinaryOp::Le),
            ("X = A >= B", BinaryOp::Ge),
            ("X = A => B", BinaryOp::Ge),
            ("X = A MATCHES '3N'", BinaryOp::Match),
            ("X = A CAT B", BinaryOp::Concat),
        ] {
            assert!(
                matches!(assigned_value(source), ExprKind::Binary { op, .. } if op == expected),
                "{source}"
            );
        }
    }

    #[test]
    fn test_dynamic_array_ref() {
        let ExprKind::DynamicArrayRef {
            name,
            value,
            sub_value,
            ..
        } = assigned_value("X = REC<1,2>")
        else {
            panic!("expected dynamic array reference");
        };
        assert_eq!(name, "REC");
        assert!(value.is_some());
        assert!(sub_value.is_none());
    }

    #[test]
    fn test_spaced_less_is_comparison() {
        assert!(matches!(
            assigned_value("X = A < 1"),
            ExprKind::Binary { op: BinaryOp::Lt, .. }
        ));
    }

    #[test]
    fn test_adjacent_less_without_close_backtracks() {
        assert!(matches!(
            assigned_value("X = A<1"),
            ExprKind::Binary { op: BinaryOp::Lt, .. }
        ));
    }

    #[test]
    fn test_dynamic_array_assignment_before_equals() {
        let stmt = first_statement("REC<1>=X");
        let StatementKind::Assignment { target, value } = stmt.kind else {
            panic!("expected assignment");
        };
        assert!(matches!(target.kind, ExprKind::DynamicArrayRef { .. }));
        assert!(matches!(value.kind, ExprKind::Identifier(_)));
    }

    #[test]
    fn test_function_call_needs_adjacent_paren() {
        assert!(matches!(
            assigned_value("X = LEN(Y)"),
            ExprKind::FunctionCall { ref args, .. } if args.len() == 1
        ));
        let (_, errors) = parse("X = LEN (Y)");
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_substring_ref() {
        assert!(matches!(
            assigned_value("X = NAME[1,3]"),
            ExprKind::SubstringRef { length: Some(_), .. }
        ));
        assert!(matches!(
            assigned_value("X = NAME[2]"),
            ExprKind::SubstringRef { length: None, .. }
        ));
    }

    #[test]
    fn test_at_forms() {
        assert!(matches!(
            assigned_value("X = @(5,10)"),
            ExprKind::AtExpression { row: Some(_), .. }
        ));
        assert!(matches!(
            assigned_value("X = @AM"),
            ExprKind::AtVariable(ref n) if n == "AM"
        ));
    }

    #[test]
    fn test_string_delimiters_stripped() {
        for source in ["X = 'abc'", "X = \"abc\"", "X = \\abc\\"] {
            assert!(
                matches!(assigned_value(source), ExprKind::String { ref value, .. } if value == "abc"),
                "{source}"
            );
        }
    }

    #[test]
    fn test_label_then_goto() {
        let program = parse_ok("100\nGOTO 100");
        assert!(matches!(program.items[0], Item::Label(ref l) if l.name == "100"));
        let goto = program.statements().next().unwrap();
        assert!(matches!(
            goto.kind,
            StatementKind::Goto { ref target } if target.kind == TargetKind::Number
        ));
    }

    #[test]
    fn test_label_followed_by_statement_on_same_line() {
        let program = parse_ok("100 PRINT X");
        assert_eq!(program.items.len(), 2);
        assert!(matches!(program.items[0], Item::Label(_)));
    }

    #[test]
    fn test_number_followed_by_operator_is_expression() {
        let program = parse_ok("100 + 1");
        assert!(matches!(
            program.items[0],
            Item::Statement(Statement {
                kind: StatementKind::Expression(_),
                ..
            })
        ));
    }

    #[test]
    fn test_if_block_without_else() {
        let stmt = first_statement("IF X THEN\n PRINT 1\nEND");
        let StatementKind::If { then_else, .. } = stmt.kind else {
            panic!("expected IF");
        };
        assert_eq!(then_else.form, ClauseForm::Block);
        assert!(then_else.else_branch.is_none());
        assert_eq!(then_else.then_branch.map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_if_inline_with_else() {
        let stmt = first_statement("IF X THEN Y = 1 ELSE Y = 2");
        let StatementKind::If { then_else, .. } = stmt.kind else {
            panic!("expected IF");
        };
        assert_eq!(then_else.form, ClauseForm::Inline);
        assert!(then_else.then_branch.is_some());
        assert!(then_else.else_branch.is_some());
    }

    #[test]
    fn test_end_else_form() {
        let program = parse_ok("IF X THEN\n A = 1\nEND ELSE\n A = 2\nEND\nSTOP");
        let kinds: Vec<_> = program.statements().map(Statement::kind_name).collect();
        assert_eq!(kinds, vec!["if_statement", "stop_statement"]);
    }

    #[test]
    fn test_for_loop() {
        let stmt = first_statement("FOR I = 1 TO 10 STEP 2\n PRINT I\nNEXT I");
        let StatementKind::For {
            variable,
            step,
            body,
            next_variable,
            ..
        } = stmt.kind
        else {
            panic!("expected FOR");
        };
        assert_eq!(variable, "I");
        assert!(step.is_some());
        assert_eq!(body.len(), 1);
        assert_eq!(next_variable.as_deref(), Some("I"));
    }

    #[test]
    fn test_loop_body_split() {
        let stmt = first_statement("LOOP\n A = 1\nWHILE A < 5 DO\n B = 2\n C = 3\nREPEAT");
        let StatementKind::Loop {
            body_before,
            condition,
            body_after,
        } = stmt.kind
        else {
            panic!("expected LOOP");
        };
        assert_eq!(body_before.len(), 1);
        assert_eq!(condition.map(|c| c.kind), Some(LoopConditionKind::While));
        assert_eq!(body_after.len(), 2);
    }

    #[test]
    fn test_loop_on_one_line() {
        let stmt = first_statement("LOOP X = X + 1 UNTIL X > 3 REPEAT");
        assert!(matches!(
            stmt.kind,
            StatementKind::Loop { ref body_before, condition: Some(_), ref body_after }
                if body_before.len() == 1 && body_after.is_empty()
        ));
    }

    #[test]
    fn test_begin_case() {
        let stmt = first_statement(
            "BEGIN CASE\n CASE X = 1\n  PRINT 'ONE'\n CASE 1\n  PRINT 'OTHER'\nEND CASE",
        );
        let StatementKind::BeginCase { cases } = stmt.kind else {
            panic!("expected BEGIN CASE");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].body.len(), 1);
    }

    #[test]
    fn test_read_operand_split() {
        let stmt = first_statement("READ REC FROM F, ID ELSE STOP");
        let StatementKind::Read {
            mode,
            address,
            then_else,
            ..
        } = stmt.kind
        else {
            panic!("expected READ");
        };
        assert_eq!(mode, ReadMode::Read);
        assert!(address.file.is_some());
        assert!(address.attribute.is_none());
        assert!(then_else.is_some_and(|c| c.else_branch.is_some()));

        let stmt = first_statement("READV X FROM ID, 3 ELSE X = ''");
        let StatementKind::Read { address, .. } = stmt.kind else {
            panic!("expected READV");
        };
        assert!(address.file.is_none());
        assert!(address.attribute.is_some());
    }

    #[test]
    fn test_open_requires_then_or_else() {
        let (_, errors) = parse("OPEN 'CUSTOMERS' TO F");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::MissingClause { .. }));
    }

    #[test]
    fn test_unterminated_for_reported_once() {
        let (program, errors) = parse("X = 1\nFOR I = 1 TO 5");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::UnterminatedBlock { .. }));
        assert_eq!(errors[0].span().start, 6);
        assert_eq!(program.statements().count(), 2);
    }

    #[test]
    fn test_stray_next_is_unexpected_terminator() {
        let (program, errors) = parse("NEXT I\nX = 1");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::UnexpectedTerminator { .. }));
        assert_eq!(program.statements().count(), 1);
    }

    #[test]
    fn test_recovery_continues_after_error() {
        let (program, errors) = parse("X = = 1\nPRINT 2\nY = 3");
        assert_eq!(errors.len(), 1);
        assert_eq!(program.statements().count(), 2);
    }

    #[test]
    fn test_comment_items() {
        let program = parse_ok("* header\nX = 3 * 4");
        assert!(matches!(program.items[0], Item::Comment(_)));
        assert_eq!(program.statements().count(), 1);
    }

    #[test]
    fn test_semicolon_separates_statements() {
        let program = parse_ok("A = 1; B = 2;; C = 3");
        assert_eq!(program.statements().count(), 3);
    }
}
