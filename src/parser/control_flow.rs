//! Control flow statement parsing.
//!
//! This module handles parsing of block constructs and the clauses that
//! other statements share:
//! - IF/THEN/ELSE/END, inline or block, including `END ELSE`
//! - BEGIN CASE/CASE/END CASE
//! - FOR/NEXT loops with optional WHILE/UNTIL
//! - LOOP/WHILE|UNTIL/DO/REPEAT
//! - `ON ERROR` and `LOCKED` clauses
//!
//! Every block body is parsed by [`Parser::parse_block`], which stops at the
//! block's own terminator or at a terminator belonging to an enclosing block.
//! In the second case the inner block is reported once as unterminated and
//! the partial construct is kept.

use log::trace;

use crate::ast::{
    CaseClause, ClauseForm, Item, LoopCondition, LoopConditionKind, Span, Statement,
    StatementKind, ThenElse,
};
use crate::lexer::{Keyword, Token, TokenKind};

use super::{ParseError, Parser};

/// The kinds of statement lists that are closed by a terminator keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockKind {
    /// THEN block, closed by `ELSE` or `END`
    Then,
    /// ELSE block, closed by `END`
    Else,
    /// FOR body, closed by `NEXT`
    For,
    /// LOOP body before the condition, closed by `WHILE`, `UNTIL` or `REPEAT`
    LoopBefore,
    /// LOOP body after the condition, closed by `REPEAT`
    LoopAfter,
    /// CASE clause body, closed by the next `CASE` or `END CASE`
    CaseClause,
}

/// How a block body stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BlockEnd {
    /// At its own terminator, which is left unconsumed.
    Closed,
    /// At a terminator of an enclosing block.
    Interrupted,
    /// At the end of input.
    Eof,
}

impl<'a> Parser<'a> {
    // ==================== Blocks ====================

    /// Parses statements until the block's terminator.
    ///
    /// The terminator itself is not consumed.
    pub(super) fn parse_block(&mut self, kind: BlockKind) -> (Vec<Item>, BlockEnd) {
        trace!("open {:?} block at token {}", kind, self.current);
        self.blocks.push(kind);

        let mut items = Vec::new();
        let end = loop {
            self.drain_comments(&mut items);
            if self.skip_separator() {
                continue;
            }
            if self.is_at_end() {
                break BlockEnd::Eof;
            }
            if self.terminates(kind) {
                break BlockEnd::Closed;
            }
            let enclosing = &self.blocks[..self.blocks.len() - 1];
            if enclosing.iter().any(|&outer| self.terminates(outer)) {
                break BlockEnd::Interrupted;
            }
            self.parse_item(&mut items);
        };

        self.blocks.pop();
        trace!("close {:?} block: {:?}", kind, end);
        (items, end)
    }

    /// True when the current token ends a block of the given kind.
    fn terminates(&self, kind: BlockKind) -> bool {
        let Some(kw) = self.peek().and_then(Token::keyword) else {
            return false;
        };
        match kind {
            BlockKind::Then => kw == Keyword::Else || self.at_bare_end(),
            BlockKind::Else => self.at_bare_end(),
            BlockKind::For => kw == Keyword::Next,
            BlockKind::LoopBefore => {
                matches!(kw, Keyword::While | Keyword::Until | Keyword::Repeat)
            }
            BlockKind::LoopAfter => kw == Keyword::Repeat,
            BlockKind::CaseClause => {
                kw == Keyword::Case || (kw == Keyword::End && !self.at_bare_end())
            }
        }
    }

    /// True while a block that a bare `END` closes is open.
    fn inside_end_block(&self) -> bool {
        self.blocks
            .iter()
            .any(|kind| matches!(kind, BlockKind::Then | BlockKind::Else))
    }

    fn report_unterminated(&mut self, construct: &str, expected: &str, span: Span) {
        self.errors
            .push(ParseError::unterminated(construct, expected, span));
    }

    // ==================== IF Statement ====================

    /// Parses an IF statement.
    pub(super) fn parse_if(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume IF

        let condition = self.parse_expression()?;
        let Some(then_else) = self.parse_then_else("IF", keyword.span)? else {
            self.missing_clause("IF", keyword.span.start);
            return Err(());
        };

        Ok(Statement::new(
            StatementKind::If {
                condition,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    /// Records that `statement` lacks its THEN/ELSE clause.
    pub(super) fn missing_clause(&mut self, statement: &str, start: usize) {
        let span = self.span_from(start);
        self.errors.push(ParseError::MissingClause {
            statement: statement.to_string(),
            clause: "THEN or ELSE".to_string(),
            span,
        });
    }

    // ==================== THEN/ELSE Clauses ====================

    /// Parses an optional THEN/ELSE clause on the current line.
    ///
    /// `owner` and `owner_span` name the statement the clause belongs to;
    /// they are used when a block form is never closed.
    pub(super) fn parse_then_else(
        &mut self,
        owner: &str,
        owner_span: Span,
    ) -> Result<Option<ThenElse>, ()> {
        if self.match_keyword(Keyword::Then) {
            if self.at_line_end() {
                return Ok(Some(self.parse_then_block(owner, owner_span)?));
            }

            let then_branch = vec![self.parse_inline_statement()?];
            let (else_branch, else_form) = if self.match_keyword(Keyword::Else) {
                let (items, form) = self.parse_else_part(owner, owner_span)?;
                (Some(items), form)
            } else {
                (None, ClauseForm::Inline)
            };

            let mut then_else = ThenElse {
                then_branch: Some(then_branch),
                else_branch,
                form: else_form,
            };
            self.prefer_block_end(&mut then_else);
            return Ok(Some(then_else));
        }

        if self.match_keyword(Keyword::Else) {
            let (items, form) = self.parse_else_part(owner, owner_span)?;
            let mut then_else = ThenElse {
                then_branch: None,
                else_branch: Some(items),
                form,
            };
            self.prefer_block_end(&mut then_else);
            return Ok(Some(then_else));
        }

        Ok(None)
    }

    /// Parses a THEN block and whatever closes it: `END`, `END ELSE ...` or `ELSE ... END`.
    fn parse_then_block(&mut self, owner: &str, owner_span: Span) -> Result<ThenElse, ()> {
        let (then_items, end) = self.parse_block(BlockKind::Then);

        if end != BlockEnd::Closed {
            self.report_unterminated(owner, "END", owner_span);
            return Ok(ThenElse {
                then_branch: Some(then_items),
                else_branch: None,
                form: ClauseForm::Block,
            });
        }

        let else_branch = if self.at_bare_end() {
            self.advance(); // consume END
            if self.match_keyword(Keyword::Else) {
                Some(self.parse_else_part(owner, owner_span)?.0)
            } else {
                None
            }
        } else {
            self.advance(); // consume ELSE
            Some(self.parse_else_block(owner, owner_span))
        };

        Ok(ThenElse {
            then_branch: Some(then_items),
            else_branch,
            form: ClauseForm::Block,
        })
    }

    /// Parses what follows `ELSE`: a block at end of line, otherwise one statement.
    fn parse_else_part(
        &mut self,
        owner: &str,
        owner_span: Span,
    ) -> Result<(Vec<Item>, ClauseForm), ()> {
        if self.at_line_end() {
            Ok((self.parse_else_block(owner, owner_span), ClauseForm::Block))
        } else {
            Ok((vec![self.parse_inline_statement()?], ClauseForm::Inline))
        }
    }

    /// Parses an ELSE block and consumes its `END`.
    fn parse_else_block(&mut self, owner: &str, owner_span: Span) -> Vec<Item> {
        let (items, end) = self.parse_block(BlockKind::Else);
        if end == BlockEnd::Closed {
            self.advance(); // consume END
        } else {
            self.report_unterminated(owner, "END", owner_span);
        }
        items
    }

    /// An inline clause directly followed by a bare `END` takes the block form.
    ///
    /// Inside a THEN or ELSE block the `END` belongs to that block instead.
    fn prefer_block_end(&mut self, then_else: &mut ThenElse) {
        if then_else.form == ClauseForm::Inline && self.at_bare_end() && !self.inside_end_block()
        {
            trace!("inline clause closed by END at token {}", self.current);
            self.advance(); // consume END
            then_else.form = ClauseForm::Block;
        }
    }

    /// Parses the single statement of an inline clause.
    fn parse_inline_statement(&mut self) -> Result<Item, ()> {
        Ok(Item::Statement(self.parse_clause_statement()?))
    }

    /// Parses one statement that must begin on the current line.
    fn parse_clause_statement(&mut self) -> Result<Statement, ()> {
        if self.at_line_end() {
            self.error_expected("statement");
            return Err(());
        }
        self.statement_start = self.current;
        self.parse_statement()
    }

    // ==================== ON ERROR / LOCKED ====================

    /// Parses an optional `ON ERROR statement` clause.
    pub(super) fn parse_on_error(&mut self) -> Result<Option<Box<Statement>>, ()> {
        let is_on_error = self.on_same_line()
            && self.check_keyword(Keyword::On)
            && self
                .peek_ahead(1)
                .is_some_and(|t| !t.line_start && t.is_keyword(Keyword::Error));
        if !is_on_error {
            return Ok(None);
        }

        self.advance(); // consume ON
        self.advance(); // consume ERROR
        Ok(Some(Box::new(self.parse_clause_statement()?)))
    }

    /// Parses an optional `LOCKED statement` clause.
    pub(super) fn parse_locked(&mut self) -> Result<Option<Box<Statement>>, ()> {
        if self.match_keyword(Keyword::Locked) {
            Ok(Some(Box::new(self.parse_clause_statement()?)))
        } else {
            Ok(None)
        }
    }

    // ==================== BEGIN CASE Statement ====================

    /// Parses a BEGIN CASE statement.
    pub(super) fn parse_begin_case(&mut self) -> Result<Statement, ()> {
        let begin = self.advance().ok_or(())?; // consume BEGIN
        let case = self.expect_keyword(Keyword::Case)?;
        let opening = begin.span.merge(&case.span);

        // Comments outside any clause belong to the clause that follows them
        let mut leading: Vec<Item> = Vec::new();
        let mut cases = Vec::new();

        loop {
            leading.extend(self.skip_comments().into_iter().map(Item::Comment));
            if self.skip_separator() {
                continue;
            }
            if self.is_at_end() {
                self.report_unterminated("BEGIN CASE", "END CASE", opening);
                break;
            }

            if self.check_keyword(Keyword::End) && !self.at_bare_end() {
                self.advance(); // consume END
                self.advance(); // consume CASE
                break;
            }

            if self.check_keyword(Keyword::Case) {
                let case_start = self.current;
                let clause_start = self.advance().ok_or(())?.span.start; // consume CASE
                self.statement_start = case_start;

                let condition = self.parse_expression();
                if condition.is_err() {
                    self.synchronize(case_start);
                }

                let (body, end) = self.parse_block(BlockKind::CaseClause);
                if let Ok(condition) = condition {
                    let body = leading.drain(..).chain(body).collect();
                    cases.push(CaseClause {
                        condition,
                        body,
                        span: self.span_from(clause_start),
                    });
                }

                if end != BlockEnd::Closed {
                    self.report_unterminated("BEGIN CASE", "END CASE", opening);
                    break;
                }
                continue;
            }

            if self.blocks.iter().any(|&outer| self.terminates(outer)) {
                self.report_unterminated("BEGIN CASE", "END CASE", opening);
                break;
            }

            // Statements before the first CASE
            let start = self.current;
            self.statement_start = start;
            self.error_expected("CASE");
            self.synchronize(start);
        }

        Ok(Statement::new(
            StatementKind::BeginCase { cases },
            self.span_from(begin.span.start),
        ))
    }

    // ==================== FOR Loop ====================

    /// Parses a FOR loop.
    pub(super) fn parse_for(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume FOR

        let variable = self.expect_name("loop variable")?;
        self.expect(TokenKind::Equals, "`=`")?;
        let start_expr = self.parse_expression()?;

        self.expect_keyword(Keyword::To)?;
        let end_expr = self.parse_expression()?;

        let step = if self.match_keyword(Keyword::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let condition = if self.on_same_line() && self.loop_condition_kind().is_some() {
            Some(self.parse_loop_condition()?)
        } else {
            None
        };

        let (body, end) = self.parse_block(BlockKind::For);

        // Optional variable name after NEXT
        let next_variable = if end == BlockEnd::Closed {
            self.advance(); // consume NEXT
            match self.peek() {
                Some(token) if !token.line_start && Self::is_name(token) => {
                    self.advance();
                    Some(token.text.clone())
                }
                _ => None,
            }
        } else {
            self.report_unterminated("FOR", "NEXT", keyword.span);
            None
        };

        Ok(Statement::new(
            StatementKind::For {
                variable,
                start: start_expr,
                end: end_expr,
                step,
                condition,
                body,
                next_variable,
            },
            self.span_from(keyword.span.start),
        ))
    }

    /// The condition kind if the current token is `WHILE` or `UNTIL`.
    fn loop_condition_kind(&self) -> Option<LoopConditionKind> {
        match self.peek().and_then(Token::keyword)? {
            Keyword::While => Some(LoopConditionKind::While),
            Keyword::Until => Some(LoopConditionKind::Until),
            _ => None,
        }
    }

    /// Parses `WHILE cond` or `UNTIL cond` at the current token.
    ///
    /// The keyword may begin its own line; the condition must follow it on
    /// that line.
    fn parse_loop_condition(&mut self) -> Result<LoopCondition, ()> {
        let Some(kind) = self.loop_condition_kind() else {
            self.error_expected("WHILE or UNTIL");
            return Err(());
        };
        self.advance(); // consume WHILE or UNTIL

        let condition = self.parse_expression()?;
        Ok(LoopCondition { kind, condition })
    }

    // ==================== LOOP Statement ====================

    /// Parses `LOOP ... [WHILE|UNTIL cond [DO]] ... REPEAT`.
    pub(super) fn parse_loop(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume LOOP

        let (body_before, end) = self.parse_block(BlockKind::LoopBefore);
        let mut condition = None;
        let mut body_after = Vec::new();

        if end != BlockEnd::Closed {
            self.report_unterminated("LOOP", "REPEAT", keyword.span);
        } else if self.check_keyword(Keyword::Repeat) {
            self.advance(); // consume REPEAT
        } else {
            let condition_start = self.current;
            self.statement_start = condition_start;
            match self.parse_loop_condition() {
                Ok(parsed) => condition = Some(parsed),
                Err(()) => self.synchronize(condition_start),
            }
            self.match_keyword(Keyword::Do);

            let (items, end) = self.parse_block(BlockKind::LoopAfter);
            body_after = items;
            if end == BlockEnd::Closed {
                self.advance(); // consume REPEAT
            } else {
                self.report_unterminated("LOOP", "REPEAT", keyword.span);
            }
        }

        Ok(Statement::new(
            StatementKind::Loop {
                body_before,
                condition,
                body_after,
            },
            self.span_from(keyword.span.start),
        ))
    }
}
