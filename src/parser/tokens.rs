//! Token navigation utilities for the parser.
//!
//! This module provides the low-level token stream operations that form
//! the foundation of the recursive descent parser:
//! - Peeking at tokens without consuming them
//! - Advancing through the token stream
//! - Layout queries (same logical line, adjacency)
//! - Matching and expecting specific tokens
//! - Checkpoints for speculative parsing
//! - Error recovery (synchronization)

use log::{debug, trace};

use crate::ast::{Comment, Item, Span};
use crate::lexer::{Keyword, Token, TokenKind};

use super::{ParseError, Parser};

/// A saved parser position for speculative parsing.
#[derive(Debug, Clone, Copy)]
pub(super) struct Checkpoint {
    current: usize,
    errors: usize,
}

impl<'a> Parser<'a> {
    // ==================== Token Navigation ====================

    /// Returns the current token without consuming it.
    pub(super) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.current)
    }

    /// Returns the kind of the current token.
    pub(super) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// Looks ahead n tokens (0 = current token).
    pub(super) fn peek_ahead(&self, n: usize) -> Option<&'a Token> {
        self.tokens.get(self.current + n)
    }

    /// Consumes and returns the current token.
    pub(super) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.current);
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    /// The most recently consumed token.
    pub(super) fn previous(&self) -> Option<&'a Token> {
        self.current
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
    }

    /// Returns true if we've reached the end of the token stream.
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    /// Checks if the current token matches the expected kind.
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, kw: Keyword) -> bool {
        self.check(TokenKind::Keyword(kw))
    }

    /// Consumes the current token if it matches, returns true if consumed.
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches and is on the current line.
    pub(super) fn match_on_line(&mut self, kind: TokenKind) -> bool {
        self.on_same_line() && self.match_token(kind)
    }

    /// Consumes the keyword if it is next on the current line.
    pub(super) fn match_keyword(&mut self, kw: Keyword) -> bool {
        self.match_on_line(TokenKind::Keyword(kw))
    }

    // ==================== Layout ====================

    /// True when the current token continues the current logical line.
    pub(super) fn on_same_line(&self) -> bool {
        self.peek().is_some_and(|t| !t.line_start)
    }

    /// True when nothing more follows on the current logical line.
    pub(super) fn at_line_end(&self) -> bool {
        !self.on_same_line()
    }

    /// True when the current token is on this line and can begin an expression.
    pub(super) fn expression_follows(&self) -> bool {
        self.on_same_line() && self.peek().is_some_and(Self::starts_expression)
    }

    /// Tokens that can begin an expression.
    pub(super) fn starts_expression(token: &Token) -> bool {
        match token.kind {
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::String(_)
            | TokenKind::AtVariable
            | TokenKind::At
            | TokenKind::LeftParen
            | TokenKind::Minus
            | TokenKind::Plus => true,
            TokenKind::Keyword(kw) => kw == Keyword::Not || kw.is_soft(),
            _ => false,
        }
    }

    /// A bare `END`, as opposed to `END CASE`.
    pub(super) fn at_bare_end(&self) -> bool {
        self.check_keyword(Keyword::End)
            && !self
                .peek_ahead(1)
                .is_some_and(|t| !t.line_start && t.is_keyword(Keyword::Case))
    }

    // ==================== Expectations ====================

    /// Expects the current token to match on the current line, or records an error.
    pub(super) fn expect(&mut self, kind: TokenKind, expected_desc: &str) -> Result<&'a Token, ()> {
        if self.on_same_line() && self.check(kind) {
            self.advance().ok_or(())
        } else {
            self.error_expected(expected_desc);
            Err(())
        }
    }

    /// Expects a keyword on the current line, or records an error.
    pub(super) fn expect_keyword(&mut self, kw: Keyword) -> Result<&'a Token, ()> {
        if self.on_same_line() && self.check_keyword(kw) {
            self.advance().ok_or(())
        } else {
            self.error_expected(kw.as_str());
            Err(())
        }
    }

    /// Expects a name: an identifier, or a soft keyword used as one.
    pub(super) fn expect_name(&mut self, expected_desc: &str) -> Result<String, ()> {
        match self.peek() {
            Some(token) if !token.line_start && Self::is_name(token) => {
                self.advance();
                Ok(token.text.clone())
            }
            _ => {
                self.error_expected(expected_desc);
                Err(())
            }
        }
    }

    pub(super) fn is_name(token: &Token) -> bool {
        match token.kind {
            TokenKind::Identifier => true,
            TokenKind::Keyword(kw) => kw.is_soft(),
            _ => false,
        }
    }

    /// Records "expected X, found Y" for the current token.
    pub(super) fn error_expected(&mut self, expected_desc: &str) {
        let error = match self.peek() {
            Some(token) if token.line_start && self.current > self.statement_start => {
                ParseError::unexpected(expected_desc, "end of line", self.line_end_span(token))
            }
            Some(token) => ParseError::unexpected(expected_desc, describe(token), token.span),
            None => ParseError::eof(expected_desc, self.eof_span()),
        };
        self.errors.push(error);
    }

    /// Zero-width span just after the previous token.
    fn line_end_span(&self, fallback: &Token) -> Span {
        self.previous()
            .map(|t| Span::new(t.span.end, t.span.end))
            .unwrap_or(fallback.span)
    }

    /// Zero-width span at the end of the last token.
    pub(super) fn eof_span(&self) -> Span {
        let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
        Span::new(end, end)
    }

    // ==================== Speculation ====================

    pub(super) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            current: self.current,
            errors: self.errors.len(),
        }
    }

    /// Rewinds to a checkpoint, dropping errors recorded since.
    pub(super) fn restore(&mut self, checkpoint: Checkpoint) {
        trace!(
            "backtracking from token {} to {}",
            self.current, checkpoint.current
        );
        self.current = checkpoint.current;
        self.errors.truncate(checkpoint.errors);
    }

    // ==================== Statement Boundaries ====================

    /// Skips one `;` separator, returning true if one was consumed.
    pub(super) fn skip_separator(&mut self) -> bool {
        self.match_token(TokenKind::Semicolon)
    }

    /// Moves statement-position comments that precede the current token into `items`.
    pub(super) fn drain_comments(&mut self, items: &mut Vec<Item>) {
        let before = self.peek().map_or(usize::MAX, |t| t.span.start);
        while let Some(comment) = self.comments.get(self.next_comment)
            && comment.span.start < before
        {
            items.push(Item::Comment(comment.clone()));
            self.next_comment += 1;
        }
    }

    /// Drops comments that precede the current token without placing them.
    pub(super) fn skip_comments(&mut self) -> Vec<Comment> {
        let mut skipped = Vec::new();
        let before = self.peek().map_or(usize::MAX, |t| t.span.start);
        while let Some(comment) = self.comments.get(self.next_comment)
            && comment.span.start < before
        {
            skipped.push(comment.clone());
            self.next_comment += 1;
        }
        skipped
    }

    /// Attempts to recover from an error by skipping to a synchronization point.
    ///
    /// `start` is the position where the failed statement began. At least one
    /// token is consumed unless the failed statement already made progress.
    ///
    /// Synchronization points are:
    /// - The first token of a logical line
    /// - `;` separators
    /// - Statement keywords and block terminators
    pub(super) fn synchronize(&mut self, start: usize) {
        if self.current == start {
            self.advance();
        }
        let mut skipped = 0;

        while let Some(token) = self.peek() {
            if token.line_start || token.kind == TokenKind::Semicolon {
                break;
            }
            if let Some(kw) = token.keyword()
                && (kw.starts_statement() || kw.is_block_terminator())
            {
                break;
            }
            self.advance();
            skipped += 1;
        }

        debug!(
            "recovered at token {} after skipping {} tokens",
            self.current, skipped
        );
    }

    /// Creates a span from start to current position.
    pub(super) fn span_from(&self, start: usize) -> Span {
        let end = self.previous().map(|t| t.span.end).unwrap_or(start);
        Span::new(start, end.max(start))
    }
}

/// Describes a token for error messages.
pub(super) fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Keyword(_) | TokenKind::Identifier | TokenKind::Number => {
            format!("`{}`", token.text)
        }
        kind => kind.to_string(),
    }
}
