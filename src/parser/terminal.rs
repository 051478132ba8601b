//! Terminal I/O statement parsing.
//!
//! PRINT and CRT share one print list. A `:` between two operands is
//! concatenation; only a `:` or `,` with nothing after it on the line is
//! kept as a trailing separator.

use crate::ast::{Expr, PrintItem, PrintSeparator, Statement, StatementKind, Switch};
use crate::lexer::{Keyword, TokenKind};

use super::Parser;

impl<'a> Parser<'a> {
    // ==================== PRINT / CRT ====================

    /// Parses `PRINT [ON channel] [items]`.
    pub(super) fn parse_print(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume PRINT

        let channel = if self.match_keyword(Keyword::On) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let items = self.parse_print_list()?;

        Ok(Statement::new(
            StatementKind::Print { channel, items },
            self.span_from(start),
        ))
    }

    /// Parses `CRT [items]`.
    pub(super) fn parse_crt(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume CRT
        let items = self.parse_print_list()?;
        Ok(Statement::new(
            StatementKind::Crt { items },
            self.span_from(start),
        ))
    }

    fn parse_print_list(&mut self) -> Result<Vec<PrintItem>, ()> {
        let mut items = Vec::new();

        while self.expression_follows() {
            let expr = self.parse_expression()?;
            let separator = if self.match_on_line(TokenKind::Comma) {
                Some(PrintSeparator::Comma)
            } else if self.match_on_line(TokenKind::Colon) {
                Some(PrintSeparator::Colon)
            } else {
                None
            };

            items.push(PrintItem { expr, separator });
            if separator.is_none() {
                break;
            }
        }

        Ok(items)
    }

    // ==================== INPUT ====================

    /// Parses `INPUT var [, length [:]]` or `INPUT @(column, row), var ...`.
    pub(super) fn parse_input(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume INPUT

        if self.on_same_line() && self.check(TokenKind::At) {
            return self.parse_input_at(keyword.span.start);
        }

        let variable = self.expect_name("input variable")?;
        let (length, suppress_newline) = self.parse_input_length()?;
        let then_else = self.parse_then_else("INPUT", keyword.span)?;

        Ok(Statement::new(
            StatementKind::Input {
                variable,
                length,
                suppress_newline,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    fn parse_input_at(&mut self, start: usize) -> Result<Statement, ()> {
        self.advance(); // consume @
        self.expect(TokenKind::LeftParen, "`(`")?;
        let column = self.parse_expression()?;
        self.expect(TokenKind::Comma, "`,`")?;
        let row = self.parse_expression()?;
        self.expect(TokenKind::RightParen, "`)`")?;
        self.match_on_line(TokenKind::Comma);

        let variable = self.expect_name("input variable")?;
        let (length, suppress_newline) = self.parse_input_length()?;
        let owner_span = self.span_from(start);
        let then_else = self.parse_then_else("INPUT@", owner_span)?;

        Ok(Statement::new(
            StatementKind::InputAt {
                column,
                row,
                variable,
                length,
                suppress_newline,
                then_else,
            },
            self.span_from(start),
        ))
    }

    /// Parses the optional `, length` and trailing `:` of INPUT.
    fn parse_input_length(&mut self) -> Result<(Option<Expr>, bool), ()> {
        let length = if self.match_on_line(TokenKind::Comma) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        let suppress_newline = self.match_on_line(TokenKind::Colon);
        Ok((length, suppress_newline))
    }

    pub(super) fn parse_inputerr(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume INPUTERR
        let message = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::InputErr { message },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_inputnull(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume INPUTNULL
        let value = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::InputNull { value },
            self.span_from(start),
        ))
    }

    /// Parses `INPUTTRAP keys [, target]`.
    pub(super) fn parse_inputtrap(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume INPUTTRAP
        let keys = self.parse_expression()?;
        let target = if self.match_on_line(TokenKind::Comma) {
            Some(self.parse_target()?)
        } else {
            None
        };
        Ok(Statement::new(
            StatementKind::InputTrap { keys, target },
            self.span_from(start),
        ))
    }

    /// Parses `DATA expr, ...`.
    pub(super) fn parse_data(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume DATA
        let mut values = Vec::new();
        loop {
            values.push(self.parse_expression()?);
            if !self.match_on_line(TokenKind::Comma) {
                break;
            }
        }
        Ok(Statement::new(
            StatementKind::Data { values },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_prompt(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume PROMPT
        let value = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Prompt { value },
            self.span_from(start),
        ))
    }

    // ==================== Page Control ====================

    pub(super) fn parse_heading(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume HEADING
        let text = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Heading { text },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_footing(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume FOOTING
        let text = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Footing { text },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_page(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume PAGE
        let number = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Page { number },
            self.span_from(start),
        ))
    }

    /// Parses `PRINTER|BREAK|ECHO ON|OFF`.
    pub(super) fn parse_switch_statement(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start;

        let state = if self.match_keyword(Keyword::On) {
            Switch::On
        } else if self.match_keyword(Keyword::Off) {
            Switch::Off
        } else {
            self.error_expected("ON or OFF");
            return Err(());
        };

        let kind = match kw {
            Keyword::Printer => StatementKind::Printer { state },
            Keyword::Break => StatementKind::Break { state },
            _ => StatementKind::Echo { state },
        };
        Ok(Statement::new(kind, self.span_from(start)))
    }
}
