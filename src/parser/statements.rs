//! Statement parsing for the parser.
//!
//! This module contains the statement-list entry point, the main statement
//! dispatcher and parsing for simple statements: declarations, assignment,
//! branching, program linkage and the one-word statements.
//!
//! Block statements, file operations and terminal I/O are handled in their
//! respective modules.

use crate::ast::{
    BranchMode, DimSpec, EquateForm, Expr, Item, Label, Statement, StatementKind, Target,
    TargetKind,
};
use crate::lexer::{Keyword, TokenKind};

use super::{ParseError, Parser, Precedence};

impl<'a> Parser<'a> {
    // ==================== Statement Lists ====================

    /// Parses one label or statement and appends it to `items`.
    ///
    /// On failure the error is recorded and the parser skips to the next
    /// statement boundary.
    pub(super) fn parse_item(&mut self, items: &mut Vec<Item>) {
        // A number that is not the left operand of an infix operator is a label
        if let Some(token) = self.peek()
            && token.kind == TokenKind::Number
            && self.infix_at(self.current + 1).is_none()
        {
            self.advance();
            items.push(Item::Label(Label {
                name: token.text.clone(),
                span: token.span,
            }));
            return;
        }

        let start = self.current;
        self.statement_start = start;

        match self.parse_statement() {
            Ok(stmt) => {
                items.push(Item::Statement(stmt));
                if !self.at_statement_end() {
                    self.error_expected("end of statement");
                    self.synchronize(start);
                }
            }
            Err(()) => self.synchronize(start),
        }
    }

    /// True when the current token may follow a complete statement.
    pub(super) fn at_statement_end(&self) -> bool {
        match self.peek() {
            None => true,
            Some(token) => {
                token.line_start
                    || token.kind == TokenKind::Semicolon
                    || token.keyword().is_some_and(|kw| kw.is_block_terminator())
            }
        }
    }

    // ==================== Statement Dispatcher ====================

    /// Parses a single statement.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, ()> {
        let Some(token) = self.peek() else {
            self.error_expected("statement");
            return Err(());
        };

        let Some(kw) = token.keyword().filter(|kw| !kw.is_soft()) else {
            return self.parse_assignment_or_expression();
        };

        match kw {
            // Program structure and declarations
            Keyword::Subroutine => self.parse_subroutine(),
            Keyword::End => self.parse_end(),
            Keyword::Dim | Keyword::Dimension => self.parse_dim(),
            Keyword::Common | Keyword::Com => self.parse_common(),
            Keyword::Equate | Keyword::Equ => self.parse_equate(),
            Keyword::Mat => self.parse_mat(),

            // Control flow (delegated to control_flow.rs)
            Keyword::If => self.parse_if(),
            Keyword::Begin => self.parse_begin_case(),
            Keyword::For => self.parse_for(),
            Keyword::Loop => self.parse_loop(),
            Keyword::Goto => self.parse_goto(),
            Keyword::Go => self.parse_go(),
            Keyword::Gosub => self.parse_gosub(),
            Keyword::On => self.parse_on_goto(),
            Keyword::Return => self.parse_return(),
            Keyword::Stop => self.parse_stop(),
            Keyword::Abort => self.parse_abort(),

            // Terminal I/O (delegated to terminal.rs)
            Keyword::Print => self.parse_print(),
            Keyword::Crt => self.parse_crt(),
            Keyword::Input => self.parse_input(),
            Keyword::InputErr => self.parse_inputerr(),
            Keyword::InputNull => self.parse_inputnull(),
            Keyword::InputTrap => self.parse_inputtrap(),
            Keyword::Data => self.parse_data(),
            Keyword::Prompt => self.parse_prompt(),
            Keyword::Heading => self.parse_heading(),
            Keyword::Footing => self.parse_footing(),
            Keyword::Page => self.parse_page(),
            Keyword::Printer | Keyword::Break | Keyword::Echo => self.parse_switch_statement(kw),

            // Files (delegated to files.rs)
            Keyword::Open => self.parse_open(),
            Keyword::Read | Keyword::ReadU | Keyword::ReadV | Keyword::ReadVU => {
                self.parse_read(kw)
            }
            Keyword::Write | Keyword::WriteU | Keyword::WriteV | Keyword::WriteVU => {
                self.parse_write(kw)
            }
            Keyword::Delete => self.parse_delete(),
            Keyword::ReadNext | Keyword::ReadT | Keyword::ProcRead => self.parse_read_into(kw),
            Keyword::WriteT => self.parse_writet(),
            Keyword::Select => self.parse_select(),
            Keyword::Lock => self.parse_lock(),
            Keyword::Unlock => self.parse_unlock(),
            Keyword::Release => self.parse_release(),
            Keyword::ClearFile => self.parse_clearfile(),
            Keyword::MatRead | Keyword::MatReadU => self.parse_matread(kw),
            Keyword::MatWrite | Keyword::MatWriteU => self.parse_matwrite(kw),
            Keyword::Locate => self.parse_locate(),
            Keyword::ProcWrite => self.parse_procwrite(),
            Keyword::Rewind => self.parse_rewind(),
            Keyword::Weof => self.parse_weof(),

            // Program linkage
            Keyword::Execute => self.parse_execute(),
            Keyword::Chain => self.parse_chain(),
            Keyword::Enter => self.parse_enter(),
            Keyword::Call => self.parse_call(),

            // Miscellaneous
            Keyword::Precision => self.parse_precision(),
            Keyword::Sleep => self.parse_sleep(),
            Keyword::Rqm => self.parse_word_statement(StatementKind::Rqm),
            Keyword::Null => self.parse_word_statement(StatementKind::Null),
            Keyword::Clear => self.parse_word_statement(StatementKind::Clear),

            // Terminators with no open block to close
            Keyword::Next => self.unexpected_terminator("NEXT", "FOR"),
            Keyword::Repeat => self.unexpected_terminator("REPEAT", "LOOP"),
            Keyword::While | Keyword::Until => self.unexpected_terminator(kw.as_str(), "LOOP"),
            Keyword::Else => self.unexpected_terminator("ELSE", "IF"),
            Keyword::Case => self.unexpected_terminator("CASE", "BEGIN CASE"),

            _ if Self::starts_expression(token) => self.parse_assignment_or_expression(),
            _ => {
                self.error_expected("statement");
                Err(())
            }
        }
    }

    fn unexpected_terminator(&mut self, terminator: &str, opener: &str) -> Result<Statement, ()> {
        let span = self.peek().map_or_else(|| self.eof_span(), |t| t.span);
        self.errors.push(ParseError::UnexpectedTerminator {
            terminator: terminator.to_string(),
            opener: opener.to_string(),
            span,
        });
        Err(())
    }

    /// Parses a statement that is a single keyword.
    fn parse_word_statement(&mut self, kind: StatementKind) -> Result<Statement, ()> {
        let span = self.advance().ok_or(())?.span;
        Ok(Statement::new(kind, span))
    }

    // ==================== Assignment ====================

    /// Parses `lvalue = expr`, or any other expression used as a statement.
    fn parse_assignment_or_expression(&mut self) -> Result<Statement, ()> {
        let Some(token) = self.peek() else {
            self.error_expected("statement");
            return Err(());
        };
        let start = token.span.start;

        if !Self::starts_expression(token) {
            self.error_expected("statement");
            return Err(());
        }

        let is_prefixed = matches!(
            token.kind,
            TokenKind::Minus | TokenKind::Plus | TokenKind::Keyword(Keyword::Not)
        );
        let expr = if is_prefixed {
            self.parse_expression()?
        } else {
            let target = self.parse_primary()?;
            if target.is_lvalue() && self.on_same_line() && self.check(TokenKind::Equals) {
                self.advance(); // consume =
                let value = self.parse_expression()?;
                return Ok(Statement::new(
                    StatementKind::Assignment { target, value },
                    self.span_from(start),
                ));
            }
            self.parse_infix_chain(target, Precedence::Lowest)?
        };

        Ok(Statement::new(
            StatementKind::Expression(expr),
            self.span_from(start),
        ))
    }

    /// Parses `MAT name = expr`.
    fn parse_mat(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume MAT
        let array = self.expect_name("array name")?;
        self.expect(TokenKind::Equals, "`=`")?;
        let value = self.parse_expression()?;

        Ok(Statement::new(
            StatementKind::Mat { array, value },
            self.span_from(start),
        ))
    }

    // ==================== Program Structure ====================

    /// Parses `SUBROUTINE [name [(param, ...)]]`.
    fn parse_subroutine(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume SUBROUTINE
        let mut name = None;
        let mut params = Vec::new();

        if self.on_same_line() && self.peek().is_some_and(Self::is_name) {
            name = Some(self.expect_name("subroutine name")?);

            if self.match_on_line(TokenKind::LeftParen) && !self.match_token(TokenKind::RightParen)
            {
                loop {
                    params.push(self.expect_name("parameter name")?);
                    if !self.match_on_line(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RightParen, "`)`")?;
            }
        }

        Ok(Statement::new(
            StatementKind::Subroutine { name, params },
            self.span_from(start),
        ))
    }

    /// Parses a bare `END` that closes no block.
    fn parse_end(&mut self) -> Result<Statement, ()> {
        if !self.at_bare_end() {
            let span = match (self.peek(), self.peek_ahead(1)) {
                (Some(end), Some(case)) => end.span.merge(&case.span),
                _ => self.eof_span(),
            };
            self.errors.push(ParseError::UnexpectedTerminator {
                terminator: "END CASE".to_string(),
                opener: "BEGIN CASE".to_string(),
                span,
            });
            self.advance(); // consume END
            self.advance(); // consume CASE
            return Err(());
        }

        let span = self.advance().ok_or(())?.span;
        Ok(Statement::new(StatementKind::End, span))
    }

    // ==================== Declarations ====================

    /// Parses `DIM name(rows[, columns]), ...`.
    fn parse_dim(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume DIM
        let mut arrays = Vec::new();

        loop {
            arrays.push(self.parse_dim_spec()?);
            if !self.match_on_line(TokenKind::Comma) {
                break;
            }
        }

        Ok(Statement::new(
            StatementKind::Dim { arrays },
            self.span_from(start),
        ))
    }

    fn parse_dim_spec(&mut self) -> Result<DimSpec, ()> {
        let start = self.peek().map_or(0, |t| t.span.start);
        let name = self.expect_name("array name")?;
        self.expect(TokenKind::LeftParen, "`(`")?;

        let rows = self.parse_expression()?;
        let columns = if self.match_on_line(TokenKind::Comma) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(TokenKind::RightParen, "`)`")?;

        Ok(DimSpec {
            name,
            rows,
            columns,
            span: self.span_from(start),
        })
    }

    /// Parses `COMMON [/name/] var, ...`.
    fn parse_common(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume COMMON
        let mut block = None;

        if self.match_on_line(TokenKind::Slash) {
            block = Some(self.expect_name("common block name")?);
            if !self.match_on_line(TokenKind::Slash) {
                self.error_expected("`/`");
                return Err(());
            }
        }

        let mut names = Vec::new();
        loop {
            names.push(self.expect_name("variable name")?);
            if !self.match_on_line(TokenKind::Comma) {
                break;
            }
        }

        Ok(Statement::new(
            StatementKind::Common { block, names },
            self.span_from(start),
        ))
    }

    /// Parses `EQUATE name TO|LITERALLY expr`.
    fn parse_equate(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume EQUATE
        let name = self.expect_name("symbol name")?;

        let form = if self.match_keyword(Keyword::To) {
            EquateForm::To
        } else if self.match_keyword(Keyword::Literally) {
            EquateForm::Literally
        } else {
            self.error_expected("TO or LITERALLY");
            return Err(());
        };
        let value = self.parse_expression()?;

        Ok(Statement::new(
            StatementKind::Equate { name, form, value },
            self.span_from(start),
        ))
    }

    // ==================== Branching ====================

    /// Parses a branch target: one identifier or number token.
    pub(super) fn parse_target(&mut self) -> Result<Target, ()> {
        match self.peek() {
            Some(token)
                if !token.line_start
                    && (token.kind == TokenKind::Number || Self::is_name(token)) =>
            {
                self.advance();
                let kind = if token.kind == TokenKind::Number {
                    TargetKind::Number
                } else {
                    TargetKind::Identifier
                };
                Ok(Target {
                    name: token.text.clone(),
                    kind,
                    span: token.span,
                })
            }
            _ => {
                self.error_expected("label");
                Err(())
            }
        }
    }

    /// Parses `GOTO target`.
    fn parse_goto(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume GOTO
        let target = self.parse_target()?;
        Ok(Statement::new(
            StatementKind::Goto { target },
            self.span_from(start),
        ))
    }

    /// Parses `GOSUB target`.
    fn parse_gosub(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume GOSUB
        let target = self.parse_target()?;
        Ok(Statement::new(
            StatementKind::Gosub { target },
            self.span_from(start),
        ))
    }

    /// Parses `GO [TO] target` and `GO SUB target`.
    fn parse_go(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume GO
        let mode = self.parse_go_mode();
        let target = self.parse_target()?;

        let kind = match mode {
            BranchMode::Goto => StatementKind::Goto { target },
            BranchMode::Gosub => StatementKind::Gosub { target },
        };
        Ok(Statement::new(kind, self.span_from(start)))
    }

    /// The word after `GO`: `SUB` selects GOSUB, an optional `TO` selects GOTO.
    fn parse_go_mode(&mut self) -> BranchMode {
        if self.match_keyword(Keyword::Sub) {
            BranchMode::Gosub
        } else {
            self.match_keyword(Keyword::To);
            BranchMode::Goto
        }
    }

    /// Parses `ON expr GOTO|GOSUB target, ...`.
    fn parse_on_goto(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume ON
        let selector = self.parse_expression()?;

        let mode = if self.match_keyword(Keyword::Goto) {
            BranchMode::Goto
        } else if self.match_keyword(Keyword::Gosub) {
            BranchMode::Gosub
        } else if self.match_keyword(Keyword::Go) {
            self.parse_go_mode()
        } else {
            self.error_expected("GOTO or GOSUB");
            return Err(());
        };

        let mut targets = Vec::new();
        loop {
            targets.push(self.parse_target()?);
            if !self.match_on_line(TokenKind::Comma) {
                break;
            }
        }

        Ok(Statement::new(
            StatementKind::OnGoto {
                selector,
                mode,
                targets,
            },
            self.span_from(start),
        ))
    }

    /// Parses `RETURN [TO target]`.
    fn parse_return(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume RETURN
        let target = if self.match_keyword(Keyword::To) {
            Some(self.parse_target()?)
        } else {
            None
        };
        Ok(Statement::new(
            StatementKind::Return { target },
            self.span_from(start),
        ))
    }

    /// Parses `STOP [message]`.
    fn parse_stop(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume STOP
        let message = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Stop { message },
            self.span_from(start),
        ))
    }

    /// Parses `ABORT [message]`.
    fn parse_abort(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume ABORT
        let message = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Abort { message },
            self.span_from(start),
        ))
    }

    /// Parses an expression only if one begins on the current line.
    pub(super) fn parse_optional_expression(&mut self) -> Result<Option<Expr>, ()> {
        if self.expression_follows() {
            Ok(Some(self.parse_expression()?))
        } else {
            Ok(None)
        }
    }

    // ==================== Program Linkage ====================

    /// Parses `EXECUTE expr [CAPTURING var] [RETURNING var]`.
    fn parse_execute(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume EXECUTE
        let command = self.parse_expression()?;

        let capturing = if self.match_keyword(Keyword::Capturing) {
            Some(self.expect_name("variable name")?)
        } else {
            None
        };
        let returning = if self.match_keyword(Keyword::Returning) {
            Some(self.expect_name("variable name")?)
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::Execute {
                command,
                capturing,
                returning,
            },
            self.span_from(start),
        ))
    }

    fn parse_chain(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume CHAIN
        let command = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Chain { command },
            self.span_from(start),
        ))
    }

    fn parse_enter(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume ENTER
        let program = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Enter { program },
            self.span_from(start),
        ))
    }

    /// Parses `CALL name [(args)]` or `CALL @var [(args)]`.
    ///
    /// Unlike a function call, the argument list may be separated from the
    /// name by spaces.
    fn parse_call(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume CALL

        let (name, indirect) = match self.peek() {
            Some(token) if !token.line_start && token.kind == TokenKind::AtVariable => {
                self.advance();
                (token.text.trim_start_matches('@').to_string(), true)
            }
            _ => (self.expect_name("subroutine name")?, false),
        };

        let args = if self.match_on_line(TokenKind::LeftParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };

        Ok(Statement::new(
            StatementKind::Call {
                name,
                indirect,
                args,
            },
            self.span_from(start),
        ))
    }

    // ==================== Miscellaneous ====================

    fn parse_precision(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume PRECISION
        let digits = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Precision { digits },
            self.span_from(start),
        ))
    }

    fn parse_sleep(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume SLEEP
        let duration = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Sleep { duration },
            self.span_from(start),
        ))
    }
}
