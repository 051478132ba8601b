//! Expression parsing using precedence climbing.
//!
//! Handles:
//! - Binary operators with correct precedence and associativity
//! - Unary prefix operators (`-`, `+`, `NOT`)
//! - Parenthesized expressions and `@(column, row)`
//! - Function calls, dynamic array references and substring references
//!
//! # Precedence Levels (lowest to highest)
//!
//! 1. `OR`
//! 2. `AND`
//! 3. Relational and `MATCH`/`MATCHES`
//! 4. Addition (`+`, `-`)
//! 5. Concatenation (`:`, `CAT`)
//! 6. Multiplication (`*`, `/`)
//! 7. Power (`^`, `**`), right-associative
//! 8. Unary (`-`, `+`, `NOT`)
//!
//! # Layout
//!
//! An expression never continues onto the next logical line. An operator is
//! consumed only when the token after it is on the same line and can begin
//! an operand, so a trailing `:` or `,` is left for PRINT and INPUT.
//!
//! # Angle Brackets
//!
//! `NAME<` with no space opens a dynamic array reference. Inside the
//! reference a bare `>` closes it instead of comparing. When no closing `>`
//! is found, the parser rewinds and reads the `<` as "less than".

use log::trace;

use crate::ast::{BinaryOp, Expr, ExprKind, Quote, Span, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

use super::tokens::describe;
use super::{ParseError, Parser, Precedence};

type AngleSubscripts = (Box<Expr>, Option<Box<Expr>>, Option<Box<Expr>>);

impl<'a> Parser<'a> {
    // ==================== Expression Parsing ====================

    /// Parses an expression.
    ///
    /// Returns `Err(())` on parse failure; actual errors are accumulated in `self.errors`.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ()> {
        self.parse_expr_precedence(Precedence::Lowest)
    }

    /// Parses an expression with the given minimum precedence.
    pub(super) fn parse_expr_precedence(&mut self, min_prec: Precedence) -> Result<Expr, ()> {
        let left = self.parse_prefix()?;
        self.parse_infix_chain(left, min_prec)
    }

    /// Continues an expression whose left operand is already parsed.
    pub(super) fn parse_infix_chain(&mut self, mut left: Expr, min_prec: Precedence) -> Result<Expr, ()> {
        while let Some((op, width)) = self.infix_at(self.current) {
            let op_prec = Self::precedence_of(op);
            if op_prec <= min_prec {
                break;
            }

            left = self.parse_infix(left, op, width, op_prec)?;
        }

        Ok(left)
    }

    /// Parses a prefix expression (unary operator or primary).
    fn parse_prefix(&mut self) -> Result<Expr, ()> {
        match self.peek_kind() {
            Some(TokenKind::Minus) => self.parse_unary(UnaryOp::Neg),
            Some(TokenKind::Plus) => self.parse_unary(UnaryOp::Plus),
            Some(TokenKind::Keyword(Keyword::Not)) => self.parse_unary(UnaryOp::Not),
            _ => self.parse_primary(),
        }
    }

    /// Parses a unary operator and its operand.
    ///
    /// The operand is parsed above power precedence, so `-2^2` is `(-2)^2`.
    fn parse_unary(&mut self, op: UnaryOp) -> Result<Expr, ()> {
        let start = self.advance().ok_or(())?.span.start;
        let operand = self.parse_expr_precedence(Precedence::Unary)?;
        let span = Span::new(start, operand.span.end);

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// Parses an infix expression (binary operation).
    fn parse_infix(
        &mut self,
        left: Expr,
        op: BinaryOp,
        width: usize,
        precedence: Precedence,
    ) -> Result<Expr, ()> {
        // Two-character operators are two adjacent tokens
        for _ in 0..width {
            self.advance();
        }

        // For right-associative operators, use lower precedence for right side
        let right_prec = if op.is_right_associative() {
            Precedence::from_u8(precedence as u8 - 1)
        } else {
            precedence
        };

        let right = self.parse_expr_precedence(right_prec)?;

        let span = left.span.merge(&right.span);

        Ok(Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        ))
    }

    /// Recognizes a binary operator starting at `index`.
    ///
    /// Returns the operator and how many tokens spell it.
    pub(super) fn infix_at(&self, index: usize) -> Option<(BinaryOp, usize)> {
        let token = self.tokens.get(index)?;
        if token.line_start {
            return None;
        }

        let next = self.tokens.get(index + 1);
        let adjacent = |kind: TokenKind| next.is_some_and(|t| !t.spaced && t.kind == kind);

        let (op, width) = match token.kind {
            TokenKind::Plus => (BinaryOp::Add, 1),
            TokenKind::Minus => (BinaryOp::Sub, 1),
            TokenKind::Star if adjacent(TokenKind::Star) => (BinaryOp::Pow, 2),
            TokenKind::Star => (BinaryOp::Mul, 1),
            TokenKind::Slash => (BinaryOp::Div, 1),
            TokenKind::Caret => (BinaryOp::Pow, 1),
            TokenKind::Colon => (BinaryOp::Concat, 1),
            TokenKind::Hash => (BinaryOp::Ne, 1),
            TokenKind::Equals if adjacent(TokenKind::Less) => (BinaryOp::Le, 2),
            TokenKind::Equals if adjacent(TokenKind::Greater) => (BinaryOp::Ge, 2),
            TokenKind::Equals => (BinaryOp::Eq, 1),
            TokenKind::Less if adjacent(TokenKind::Greater) => (BinaryOp::Ne, 2),
            TokenKind::Less if adjacent(TokenKind::Equals) => (BinaryOp::Le, 2),
            TokenKind::Less => (BinaryOp::Lt, 1),
            TokenKind::Greater if self.in_angle => return None,
            TokenKind::Greater if adjacent(TokenKind::Equals) => (BinaryOp::Ge, 2),
            TokenKind::Greater => (BinaryOp::Gt, 1),
            TokenKind::Keyword(kw) => (Self::word_operator(kw)?, 1),
            _ => return None,
        };

        let operand = self.tokens.get(index + width)?;
        if operand.line_start || !Self::starts_expression(operand) {
            return None;
        }

        Some((op, width))
    }

    fn word_operator(kw: Keyword) -> Option<BinaryOp> {
        let op = match kw {
            Keyword::Or => BinaryOp::Or,
            Keyword::And => BinaryOp::And,
            Keyword::Eq => BinaryOp::Eq,
            Keyword::Ne => BinaryOp::Ne,
            Keyword::Lt => BinaryOp::Lt,
            Keyword::Gt => BinaryOp::Gt,
            Keyword::Le => BinaryOp::Le,
            Keyword::Ge => BinaryOp::Ge,
            Keyword::Match | Keyword::Matches => BinaryOp::Match,
            Keyword::Cat => BinaryOp::Concat,
            _ => return None,
        };
        Some(op)
    }

    /// Gets the precedence of a binary operator.
    fn precedence_of(op: BinaryOp) -> Precedence {
        match op {
            BinaryOp::Or => Precedence::Or,
            BinaryOp::And => Precedence::And,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::Le
            | BinaryOp::Ge
            | BinaryOp::Match => Precedence::Relational,
            BinaryOp::Add | BinaryOp::Sub => Precedence::Additive,
            BinaryOp::Concat => Precedence::Concat,
            BinaryOp::Mul | BinaryOp::Div => Precedence::Multiplicative,
            BinaryOp::Pow => Precedence::Power,
        }
    }

    // ==================== Primary Expressions ====================

    /// Parses a primary expression (literal, name, call, reference or group).
    pub(super) fn parse_primary(&mut self) -> Result<Expr, ()> {
        let Some(token) = self.peek() else {
            self.error_expected("expression");
            return Err(());
        };
        if token.line_start && self.current > self.statement_start {
            self.error_expected("expression");
            return Err(());
        }

        match token.kind {
            TokenKind::Number => {
                self.advance();
                Ok(Expr::new(ExprKind::Number(token.text.clone()), token.span))
            }
            TokenKind::String(quote) => {
                self.advance();
                let value = string_value(&token.text, quote);
                Ok(Expr::new(ExprKind::String { value, quote }, token.span))
            }
            TokenKind::AtVariable => {
                self.advance();
                let name = token.text.trim_start_matches('@').to_string();
                Ok(Expr::new(ExprKind::AtVariable(name), token.span))
            }
            TokenKind::At => self.parse_at_expression(),
            TokenKind::LeftParen => self.parse_grouped(),
            TokenKind::Identifier => self.parse_name_primary(),
            TokenKind::Keyword(kw) if kw.is_soft() => self.parse_name_primary(),
            // Intrinsics spelled like statements: DELETE(X, 1), ...
            TokenKind::Keyword(kw)
                if !kw.is_word_operator()
                    && self
                        .peek_ahead(1)
                        .is_some_and(|t| t.is_adjacent() && t.kind == TokenKind::LeftParen) =>
            {
                self.parse_name_primary()
            }
            _ => {
                self.errors.push(ParseError::InvalidExpression {
                    span: token.span,
                    message: format!("expected expression, found {}", describe(token)),
                });
                Err(())
            }
        }
    }

    /// Parses a name and whatever is attached to it: `(args)`, `<a,v,s>` or `[s,l]`.
    fn parse_name_primary(&mut self) -> Result<Expr, ()> {
        let token = self.advance().ok_or(())?;
        let name = token.text.clone();

        match self.peek() {
            Some(next) if next.kind == TokenKind::LeftParen && !next.spaced => {
                self.advance();
                let args = self.parse_arguments()?;
                let span = self.span_from(token.span.start);
                Ok(Expr::new(ExprKind::FunctionCall { name, args }, span))
            }
            Some(next)
                if next.kind == TokenKind::Less
                    && next.is_adjacent()
                    && !self.fused_comparison_at(self.current) =>
            {
                Ok(self.parse_dynamic_array_or_name(name, token.span))
            }
            Some(next) if next.kind == TokenKind::LeftBracket && !next.line_start => {
                self.parse_substring(name, token.span.start)
            }
            _ => Ok(Expr::new(ExprKind::Identifier(name), token.span)),
        }
    }

    /// True when the `<` at `index` is the first half of `<>` or `<=`.
    fn fused_comparison_at(&self, index: usize) -> bool {
        self.tokens.get(index + 1).is_some_and(|t| {
            t.is_adjacent() && matches!(t.kind, TokenKind::Greater | TokenKind::Equals)
        })
    }

    /// Parses a comma-separated argument list after its `(` has been consumed.
    pub(super) fn parse_arguments(&mut self) -> Result<Vec<Expr>, ()> {
        self.with_angle(false, |p| {
            let mut args = Vec::new();
            if p.match_token(TokenKind::RightParen) {
                return Ok(args);
            }
            loop {
                args.push(p.parse_expression()?);
                if !p.match_on_line(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::RightParen, "`)`")?;
            Ok(args)
        })
    }

    /// Speculatively parses `NAME<attribute[, value[, sub_value]]>`.
    ///
    /// Falls back to a plain identifier, leaving the `<` unconsumed, when the
    /// closing `>` is missing or is directly followed by another operand
    /// (`X<Y AND Z>W` compares rather than subscripts).
    fn parse_dynamic_array_or_name(&mut self, name: String, name_span: Span) -> Expr {
        let checkpoint = self.checkpoint();
        self.advance(); // consume `<`

        let subscripts = self.with_angle(true, |p| p.parse_angle_subscripts());
        if let Ok((attribute, value, sub_value)) = subscripts
            && self.on_same_line()
            && self.match_token(TokenKind::Greater)
            && !self.operand_follows()
        {
            let span = self.span_from(name_span.start);
            return Expr::new(
                ExprKind::DynamicArrayRef {
                    name,
                    attribute,
                    value,
                    sub_value,
                },
                span,
            );
        }

        trace!("`{name}<` is not a dynamic array reference");
        self.restore(checkpoint);
        Expr::new(ExprKind::Identifier(name), name_span)
    }

    fn parse_angle_subscripts(&mut self) -> Result<AngleSubscripts, ()> {
        let attribute = Box::new(self.parse_expression()?);
        let mut value = None;
        let mut sub_value = None;
        if self.match_on_line(TokenKind::Comma) {
            value = Some(Box::new(self.parse_expression()?));
            if self.match_on_line(TokenKind::Comma) {
                sub_value = Some(Box::new(self.parse_expression()?));
            }
        }
        Ok((attribute, value, sub_value))
    }

    /// An operand token right after a closed reference on the same line.
    fn operand_follows(&self) -> bool {
        self.on_same_line()
            && matches!(
                self.peek_kind(),
                Some(
                    TokenKind::Identifier
                        | TokenKind::Number
                        | TokenKind::String(_)
                        | TokenKind::AtVariable
                        | TokenKind::At
                        | TokenKind::LeftParen
                )
            )
    }

    /// Parses `NAME[start[, length]]`.
    fn parse_substring(&mut self, name: String, start: usize) -> Result<Expr, ()> {
        self.advance(); // consume `[`

        let (substring_start, length) = self.with_angle(false, |p| {
            let substring_start = p.parse_expression()?;
            let length = if p.match_on_line(TokenKind::Comma) {
                Some(Box::new(p.parse_expression()?))
            } else {
                None
            };
            p.expect(TokenKind::RightBracket, "`]`")?;
            Ok((substring_start, length))
        })?;

        Ok(Expr::new(
            ExprKind::SubstringRef {
                name,
                start: Box::new(substring_start),
                length,
            },
            self.span_from(start),
        ))
    }

    /// Parses `@(column[, row])`.
    fn parse_at_expression(&mut self) -> Result<Expr, ()> {
        let start = self.advance().ok_or(())?.span.start;
        self.expect(TokenKind::LeftParen, "`(` after `@`")?;

        let (column, row) = self.with_angle(false, |p| {
            let column = p.parse_expression()?;
            let row = if p.match_on_line(TokenKind::Comma) {
                Some(Box::new(p.parse_expression()?))
            } else {
                None
            };
            p.expect(TokenKind::RightParen, "`)`")?;
            Ok((column, row))
        })?;

        Ok(Expr::new(
            ExprKind::AtExpression {
                column: Box::new(column),
                row,
            },
            self.span_from(start),
        ))
    }

    /// Parses a parenthesized expression.
    fn parse_grouped(&mut self) -> Result<Expr, ()> {
        let start = self.advance().ok_or(())?.span.start; // consume (

        let inner = self.with_angle(false, |p| {
            let inner = p.parse_expression()?;
            p.expect(TokenKind::RightParen, "`)`")?;
            Ok(inner)
        })?;

        Ok(Expr::new(
            ExprKind::Parenthesized(Box::new(inner)),
            self.span_from(start),
        ))
    }

    /// Runs `f` with the angle-bracket context set to `in_angle`, restoring it afterwards.
    fn with_angle<T>(
        &mut self,
        in_angle: bool,
        f: impl FnOnce(&mut Self) -> Result<T, ()>,
    ) -> Result<T, ()> {
        let saved = std::mem::replace(&mut self.in_angle, in_angle);
        let result = f(self);
        self.in_angle = saved;
        result
    }
}

/// Strips the delimiters from a string token. An unterminated string has
/// only its opening delimiter.
fn string_value(text: &str, quote: Quote) -> String {
    let delimiter = quote.as_char();
    let inner = text.strip_prefix(delimiter).unwrap_or(text);
    inner.strip_suffix(delimiter).unwrap_or(inner).to_string()
}
