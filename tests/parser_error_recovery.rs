//! The parser reports every problem and keeps going.

use pickbasic::ast::StatementKind;
use pickbasic::parser::{ErrorKind, ParseError};
use pickbasic::{ParseResult, parse};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_with_errors(src: &str) -> ParseResult {
    init_logging();
    let result = parse(src);
    assert!(result.has_errors(), "expected errors for {src:?}");
    result
}

fn unterminated_constructs(result: &ParseResult) -> Vec<&str> {
    result
        .diagnostics
        .iter()
        .filter_map(|d| match &d.error {
            ParseError::UnterminatedBlock { construct, .. } => Some(construct.as_str()),
            _ => None,
        })
        .collect()
}

// ==================== Unterminated Blocks ====================

#[test]
fn for_interrupted_by_enclosing_end() {
    let src = "IF X THEN\n  FOR I = 1 TO 3\n    PRINT I\nEND\nY = 1";
    let result = parse_with_errors(src);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(unterminated_constructs(&result), vec!["FOR"]);

    let diag = &result.diagnostics[0];
    assert_eq!(diag.kind(), ErrorKind::UnterminatedBlock);
    assert_eq!((diag.line(), diag.column()), (2, 3));
    assert_eq!(result.program.statements().count(), 2);
}

#[test]
fn unterminated_if_block_keeps_its_body() {
    let result = parse_with_errors("IF X THEN\n  PRINT 1\n  PRINT 2\n");
    assert_eq!(unterminated_constructs(&result), vec!["IF"]);

    let stmt = result.program.statements().next().expect("IF");
    let StatementKind::If { ref then_else, .. } = stmt.kind else {
        panic!("expected IF");
    };
    assert_eq!(then_else.then_branch.as_ref().map(Vec::len), Some(2));
}

#[test]
fn unterminated_else_block() {
    let result = parse_with_errors("READ R FROM F, K ELSE\n  R = ''\n");
    assert_eq!(unterminated_constructs(&result), vec!["READ"]);
}

#[test]
fn begin_case_without_end_case() {
    let src = "BEGIN CASE\n  CASE X = 1\n    PRINT 1\n";
    let result = parse_with_errors(src);
    assert_eq!(unterminated_constructs(&result), vec!["BEGIN CASE"]);

    let stmt = result.program.statements().next().expect("BEGIN CASE");
    assert!(matches!(stmt.kind, StatementKind::BeginCase { ref cases } if cases.len() == 1));
}

#[test]
fn loop_without_repeat() {
    let src = "LOOP\n  X = X + 1\nWHILE X < 10 DO\n  PRINT X\n";
    let result = parse_with_errors(src);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(unterminated_constructs(&result), vec!["LOOP"]);

    let stmt = result.program.statements().next().expect("LOOP");
    assert!(matches!(
        stmt.kind,
        StatementKind::Loop { condition: Some(_), ref body_after, .. } if body_after.len() == 1
    ));
}

#[test]
fn for_without_next_at_end_of_input() {
    let result = parse_with_errors("FOR I = 1 TO 10\n  PRINT I\n");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(unterminated_constructs(&result), vec!["FOR"]);
}

// ==================== Stray Terminators ====================

#[test]
fn stray_repeat() {
    let result = parse_with_errors("REPEAT\nX = 1");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::UnexpectedTerminator { ref terminator, .. } if terminator == "REPEAT"
    ));
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn stray_end_case() {
    let result = parse_with_errors("END CASE\nX = 1");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::UnexpectedTerminator { ref terminator, .. } if terminator == "END CASE"
    ));
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn stray_else() {
    // Recovery stops at PRINT, so the rest of the line still parses
    let result = parse_with_errors("ELSE PRINT 1\nX = 1");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.program.statements().count(), 2);
}

// ==================== Statement Recovery ====================

#[test]
fn each_bad_line_reports_once() {
    let result = parse_with_errors("X = = 1\nY = )\nZ = 3");
    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.diagnostics[0].line(), 1);
    assert_eq!(result.diagnostics[1].line(), 2);
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn recovery_after_semicolon() {
    let result = parse_with_errors("X = ); Y = 2");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn trailing_tokens_reported_at_their_position() {
    let result = parse_with_errors("X = 1\n  PRINT )");
    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.kind(), ErrorKind::Syntax);
    assert_eq!((diag.line(), diag.column()), (2, 9));
    assert_eq!(result.program.statements().count(), 2);
}

#[test]
fn open_requires_then_or_else() {
    let result = parse_with_errors("OPEN 'CUSTOMERS' TO F\nX = 1");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::MissingClause { ref statement, .. } if statement == "OPEN"
    ));
    assert_eq!(
        result.diagnostics[0].message,
        "OPEN requires THEN or ELSE"
    );
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn if_requires_then_or_else() {
    let result = parse_with_errors("IF X = 1\nPRINT 'NEXT'");
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::MissingClause { ref statement, .. } if statement == "IF"
    ));
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn error_inside_block_does_not_close_it() {
    let src = "FOR I = 1 TO 3\n  X = )\n  PRINT I\nNEXT I";
    let result = parse_with_errors(src);
    assert_eq!(result.diagnostics.len(), 1);
    let stmt = result.program.statements().next().expect("FOR");
    assert!(matches!(
        stmt.kind,
        StatementKind::For { ref body, ref next_variable, .. }
            if body.len() == 1 && next_variable.as_deref() == Some("I")
    ));
}

// ==================== Lexical Errors ====================

#[test]
fn unterminated_string_still_parses() {
    let result = parse_with_errors("X = 'abc");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].kind(), ErrorKind::Lexical);
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn invalid_character_is_skipped() {
    let result = parse_with_errors("X = 1 ~");
    assert_eq!(result.diagnostics.len(), 1);
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::InvalidCharacter { ch: '~', .. }
    ));
    assert_eq!(result.program.statements().count(), 1);
}

#[test]
fn ampersand_without_line_break() {
    let result = parse_with_errors("X = 1 & 2");
    assert_eq!(result.diagnostics.len(), 2);
    assert!(matches!(
        result.diagnostics[0].error,
        ParseError::UnterminatedContinuation { .. }
    ));
    assert_eq!(result.diagnostics[1].kind(), ErrorKind::Syntax);
}

#[test]
fn diagnostics_render_with_position() {
    let result = parse_with_errors("X = 1\nNEXT");
    assert_eq!(
        result.diagnostics[0].to_string(),
        "2:1: error: NEXT without a matching FOR"
    );
}
