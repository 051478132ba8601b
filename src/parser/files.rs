//! File and record statement parsing.
//!
//! OPEN, the READ and WRITE families, DELETE, SELECT/READNEXT, locking,
//! MATREAD/MATWRITE, LOCATE and the tape and proc statements.
//!
//! Record operations share one operand list, `[file,] key [, attribute]`.
//! Which operand is which depends on how many were written:
//!
//! | Operands | READ/WRITE/DELETE | READV/WRITEV |
//! |----------|-------------------|--------------|
//! | 1        | key               | key          |
//! | 2        | file, key         | key, attribute |
//! | 3        | file, key, attribute | file, key, attribute |

use crate::ast::{ReadMode, RecordAddress, Statement, StatementKind, WriteMode};
use crate::lexer::{Keyword, TokenKind};

use super::Parser;

impl<'a> Parser<'a> {
    // ==================== Operands ====================

    /// Parses `[file,] key [, attribute]`.
    ///
    /// With `attribute_form`, two operands are read as key and attribute.
    fn parse_record_address(&mut self, attribute_form: bool) -> Result<RecordAddress, ()> {
        let first = self.parse_expression()?;
        if !self.match_on_line(TokenKind::Comma) {
            return Ok(RecordAddress {
                file: None,
                key: first,
                attribute: None,
            });
        }

        let second = self.parse_expression()?;
        if !self.match_on_line(TokenKind::Comma) {
            return Ok(if attribute_form {
                RecordAddress {
                    file: None,
                    key: first,
                    attribute: Some(second),
                }
            } else {
                RecordAddress {
                    file: Some(first),
                    key: second,
                    attribute: None,
                }
            });
        }

        let third = self.parse_expression()?;
        Ok(RecordAddress {
            file: Some(first),
            key: second,
            attribute: Some(third),
        })
    }

    /// Consumes the `ON` or `TO` between a value and its destination.
    fn expect_destination(&mut self) -> Result<(), ()> {
        if self.match_keyword(Keyword::On) || self.match_keyword(Keyword::To) {
            Ok(())
        } else {
            self.error_expected("ON or TO");
            Err(())
        }
    }

    // ==================== OPEN ====================

    /// Parses `OPEN [dict,] name [TO var] [ON ERROR stmt] THEN|ELSE ...`.
    pub(super) fn parse_open(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume OPEN

        let first = self.parse_expression()?;
        let (dictionary, file_name) = if self.match_on_line(TokenKind::Comma) {
            (Some(first), self.parse_expression()?)
        } else {
            (None, first)
        };

        let variable = if self.match_keyword(Keyword::To) {
            Some(self.expect_name("file variable")?)
        } else {
            None
        };
        let on_error = self.parse_on_error()?;

        let Some(then_else) = self.parse_then_else("OPEN", keyword.span)? else {
            self.missing_clause("OPEN", keyword.span.start);
            return Err(());
        };

        Ok(Statement::new(
            StatementKind::Open {
                dictionary,
                file_name,
                variable,
                on_error,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    // ==================== READ / WRITE ====================

    /// Parses `READ[U|V|VU] var FROM operands [ON ERROR s] [LOCKED s] [THEN|ELSE ...]`.
    pub(super) fn parse_read(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume READ
        let mode = match kw {
            Keyword::ReadU => ReadMode::ReadU,
            Keyword::ReadV => ReadMode::ReadV,
            Keyword::ReadVU => ReadMode::ReadVU,
            _ => ReadMode::Read,
        };

        let variable = self.expect_name("variable name")?;
        self.expect_keyword(Keyword::From)?;
        let address = self.parse_record_address(mode.is_attribute_read())?;
        let on_error = self.parse_on_error()?;
        let locked = self.parse_locked()?;
        let then_else = self.parse_then_else(kw.as_str(), keyword.span)?;

        Ok(Statement::new(
            StatementKind::Read {
                mode,
                variable,
                address,
                on_error,
                locked,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    /// Parses `WRITE[U|V|VU] expr ON|TO operands [ON ERROR s]`.
    pub(super) fn parse_write(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume WRITE
        let mode = match kw {
            Keyword::WriteU => WriteMode::WriteU,
            Keyword::WriteV => WriteMode::WriteV,
            Keyword::WriteVU => WriteMode::WriteVU,
            _ => WriteMode::Write,
        };

        let value = self.parse_expression()?;
        self.expect_destination()?;
        let address = self.parse_record_address(mode.is_attribute_write())?;
        let on_error = self.parse_on_error()?;

        Ok(Statement::new(
            StatementKind::Write {
                mode,
                value,
                address,
                on_error,
            },
            self.span_from(start),
        ))
    }

    /// Parses `DELETE operands [ON ERROR s] [THEN|ELSE ...]`.
    pub(super) fn parse_delete(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume DELETE

        let address = self.parse_record_address(false)?;
        let on_error = self.parse_on_error()?;
        let then_else = self.parse_then_else("DELETE", keyword.span)?;

        Ok(Statement::new(
            StatementKind::Delete {
                address,
                on_error,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    /// Parses `READNEXT var`, `READT var` and `PROCREAD var`, each with an
    /// optional THEN/ELSE clause.
    pub(super) fn parse_read_into(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?;

        let variable = self.expect_name("variable name")?;
        let then_else = self.parse_then_else(kw.as_str(), keyword.span)?;

        let kind = match kw {
            Keyword::ReadT => StatementKind::ReadT {
                variable,
                then_else,
            },
            Keyword::ProcRead => StatementKind::ProcRead {
                variable,
                then_else,
            },
            _ => StatementKind::ReadNext {
                variable,
                then_else,
            },
        };
        Ok(Statement::new(kind, self.span_from(keyword.span.start)))
    }

    /// Parses `WRITET expr ON|TO expr`.
    pub(super) fn parse_writet(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume WRITET

        let value = self.parse_expression()?;
        self.expect_destination()?;
        let unit = self.parse_expression()?;

        Ok(Statement::new(
            StatementKind::WriteT { value, unit },
            self.span_from(start),
        ))
    }

    // ==================== Select Lists ====================

    /// Parses `SELECT [expr] [TO var]`.
    pub(super) fn parse_select(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume SELECT

        let source = self.parse_optional_expression()?;
        let list = if self.match_keyword(Keyword::To) {
            Some(self.expect_name("list variable")?)
        } else {
            None
        };

        Ok(Statement::new(
            StatementKind::Select { source, list },
            self.span_from(start),
        ))
    }

    // ==================== Locks ====================

    /// Parses `LOCK expr [LOCKED s] [THEN|ELSE ...]`.
    pub(super) fn parse_lock(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume LOCK

        let lock = self.parse_expression()?;
        let locked = self.parse_locked()?;
        let then_else = self.parse_then_else("LOCK", keyword.span)?;

        Ok(Statement::new(
            StatementKind::Lock {
                lock,
                locked,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    pub(super) fn parse_unlock(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume UNLOCK
        let lock = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Unlock { lock },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_release(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume RELEASE
        let target = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Release { target },
            self.span_from(start),
        ))
    }

    /// Parses `CLEARFILE expr [ON ERROR s]`.
    pub(super) fn parse_clearfile(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume CLEARFILE
        let file = self.parse_expression()?;
        let on_error = self.parse_on_error()?;
        Ok(Statement::new(
            StatementKind::ClearFile { file, on_error },
            self.span_from(start),
        ))
    }

    // ==================== Dimensioned Arrays ====================

    /// Parses `MATREAD[U] array FROM operands [ON ERROR s] [LOCKED s] [THEN|ELSE ...]`.
    pub(super) fn parse_matread(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume MATREAD

        let array = self.expect_name("array name")?;
        self.expect_keyword(Keyword::From)?;
        let address = self.parse_record_address(false)?;
        let on_error = self.parse_on_error()?;
        let locked = self.parse_locked()?;
        let then_else = self.parse_then_else(kw.as_str(), keyword.span)?;

        Ok(Statement::new(
            StatementKind::MatRead {
                update_lock: kw == Keyword::MatReadU,
                array,
                address,
                on_error,
                locked,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    /// Parses `MATWRITE[U] array ON|TO operands [ON ERROR s]`.
    pub(super) fn parse_matwrite(&mut self, kw: Keyword) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume MATWRITE

        let array = self.expect_name("array name")?;
        self.expect_destination()?;
        let address = self.parse_record_address(false)?;
        let on_error = self.parse_on_error()?;

        Ok(Statement::new(
            StatementKind::MatWrite {
                update_lock: kw == Keyword::MatWriteU,
                array,
                address,
                on_error,
            },
            self.span_from(start),
        ))
    }

    // ==================== LOCATE ====================

    /// Parses `LOCATE value IN dynamic_array [SETTING var] [THEN|ELSE ...]`.
    pub(super) fn parse_locate(&mut self) -> Result<Statement, ()> {
        let keyword = self.advance().ok_or(())?; // consume LOCATE

        let value = self.parse_expression()?;
        self.expect_keyword(Keyword::In)?;
        let dynamic_array = self.parse_expression()?;
        let setting = if self.match_keyword(Keyword::Setting) {
            Some(self.expect_name("variable name")?)
        } else {
            None
        };
        let then_else = self.parse_then_else("LOCATE", keyword.span)?;

        Ok(Statement::new(
            StatementKind::Locate {
                value,
                dynamic_array,
                setting,
                then_else,
            },
            self.span_from(keyword.span.start),
        ))
    }

    // ==================== Procs and Tape ====================

    pub(super) fn parse_procwrite(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume PROCWRITE
        let value = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::ProcWrite { value },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_rewind(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume REWIND
        let unit = self.parse_optional_expression()?;
        Ok(Statement::new(
            StatementKind::Rewind { unit },
            self.span_from(start),
        ))
    }

    pub(super) fn parse_weof(&mut self) -> Result<Statement, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume WEOF
        let unit = self.parse_expression()?;
        Ok(Statement::new(
            StatementKind::Weof { unit },
            self.span_from(start),
        ))
    }
}
