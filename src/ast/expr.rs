//! Expression nodes.
//!
//! # Expression Precedence
//!
//! From lowest to highest (as implemented in the parser):
//!
//! 1. `OR`
//! 2. `AND`
//! 3. Relational: `=`, `<>`, `#`, `<=`, `=<`, `>=`, `=>`, `<`, `>`,
//!    `EQ`, `NE`, `LT`, `GT`, `LE`, `GE`, and `MATCH`/`MATCHES`
//! 4. Additive: `+`, `-`
//! 5. Concatenation: `:`, `CAT`
//! 6. Multiplicative: `*`, `/`
//! 7. Exponentiation: `^`, `**` (right-associative)
//! 8. Unary prefix: `-`, `+`, `NOT`

use super::Span;

/// An expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true for the node kinds that may appear on the left of `=`.
    ///
    /// `FunctionCall` covers dimensioned array elements such as `A(1) = 2`.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Identifier(_)
                | ExprKind::DynamicArrayRef { .. }
                | ExprKind::SubstringRef { .. }
                | ExprKind::FunctionCall { .. }
        )
    }
}

/// Delimiter used by a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quote {
    /// `'text'`
    Single,
    /// `"text"`
    Double,
    /// `\text\`
    Backslash,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Quote> {
        match c {
            '\'' => Some(Quote::Single),
            '"' => Some(Quote::Double),
            '\\' => Some(Quote::Backslash),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Quote::Single => '\'',
            Quote::Double => '"',
            Quote::Backslash => '\\',
        }
    }
}

/// The different kinds of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `op operand`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Variable reference: `X`, `REC.ID`, `NAME$`
    Identifier(String),

    /// Numeric literal, kept as written (`1`, `1.`, `.5`).
    Number(String),

    /// String literal without its delimiters.
    String { value: String, quote: Quote },

    /// `NAME(arg, ...)`; the `(` is adjacent to the name.
    ///
    /// Dimensioned array element access has the same shape.
    FunctionCall { name: String, args: Vec<Expr> },

    /// `NAME<attribute[, value[, sub_value]]>`; the `<` is adjacent to the name.
    DynamicArrayRef {
        name: String,
        attribute: Box<Expr>,
        value: Option<Box<Expr>>,
        sub_value: Option<Box<Expr>>,
    },

    /// `NAME[start, length]`
    ///
    /// A single subscript (`NAME[n]`) leaves `length` empty.
    SubstringRef {
        name: String,
        start: Box<Expr>,
        length: Option<Box<Expr>>,
    },

    /// Cursor function `@(column[, row])`.
    AtExpression {
        column: Box<Expr>,
        row: Option<Box<Expr>>,
    },

    /// System variable such as `@AM`; the name excludes the `@`.
    AtVariable(String),

    /// `(expr)`
    Parenthesized(Box<Expr>),
}

impl ExprKind {
    /// Stable node name used by downstream tools and the S-expression dump.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ExprKind::Binary { .. } => "binary_expression",
            ExprKind::Unary { .. } => "unary_expression",
            ExprKind::Identifier(_) => "identifier",
            ExprKind::Number(_) => "number",
            ExprKind::String { .. } => "string",
            ExprKind::FunctionCall { .. } => "function_call",
            ExprKind::DynamicArrayRef { .. } => "dynamic_array_ref",
            ExprKind::SubstringRef { .. } => "substring_ref",
            ExprKind::AtExpression { .. } => "at_expression",
            ExprKind::AtVariable(_) => "at_variable",
            ExprKind::Parenthesized(_) => "paren_expression",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `OR`
    Or,
    /// `AND`
    And,
    /// `=`, `EQ`
    Eq,
    /// `<>`, `#`, `NE`
    Ne,
    /// `<`, `LT`
    Lt,
    /// `>`, `GT`
    Gt,
    /// `<=`, `=<`, `LE`
    Le,
    /// `>=`, `=>`, `GE`
    Ge,
    /// `MATCH`, `MATCHES` (pattern match)
    Match,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `:`, `CAT`
    Concat,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^`, `**`
    Pow,
}

impl BinaryOp {
    /// Only exponentiation is right-associative: `2^3^2` is `2^(3^2)`.
    pub fn is_right_associative(&self) -> bool {
        matches!(self, BinaryOp::Pow)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Gt
                | BinaryOp::Le
                | BinaryOp::Ge
                | BinaryOp::Match
        )
    }

    /// Canonical spelling for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Or => "OR",
            BinaryOp::And => "AND",
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "#",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Match => "MATCHES",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Concat => ":",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Plus,
    /// `NOT`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "NOT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_right_associative() {
        assert!(BinaryOp::Pow.is_right_associative());
        assert!(!BinaryOp::Add.is_right_associative());
        assert!(!BinaryOp::Concat.is_right_associative());
    }

    #[test]
    fn test_relational_classification() {
        assert!(BinaryOp::Ne.is_relational());
        assert!(BinaryOp::Match.is_relational());
        assert!(!BinaryOp::And.is_relational());
    }

    #[test]
    fn test_lvalue_kinds() {
        let name = Expr::new(ExprKind::Identifier("X".into()), Span::new(0, 1));
        assert!(name.is_lvalue());

        let element = Expr::new(
            ExprKind::FunctionCall {
                name: "A".into(),
                args: Vec::new(),
            },
            Span::new(0, 3),
        );
        assert!(element.is_lvalue());

        let number = Expr::new(ExprKind::Number("1".into()), Span::new(0, 1));
        assert!(!number.is_lvalue());
    }

    #[test]
    fn test_quote_round_trip_chars() {
        for c in ['\'', '"', '\\'] {
            assert_eq!(Quote::from_char(c).map(|q| q.as_char()), Some(c));
        }
        assert_eq!(Quote::from_char('x'), None);
    }
}
