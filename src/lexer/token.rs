//! Token definitions for the Pick BASIC lexer.
//!
//! This module defines:
//! - [`RawToken`], the `logos`-generated scanner alphabet
//! - [`Token`] and [`TokenKind`], what the lexer hands to the parser
//!
//! ## Design Notes
//!
//! Words are scanned by one pattern and classified afterwards through the
//! keyword table, so keywords cost a single hash lookup rather than one
//! DFA branch per spelling.
//!
//! Compound comparison spellings (`<>`, `<=`, `>=`, `=<`, `=>`) are left as
//! separate one-character tokens. The parser fuses adjacent pairs, which lets
//! `REC<1>=X` close the dynamic array reference before the `=`.

use logos::Logos;
use std::fmt;

use super::keywords::Keyword;
use crate::ast::{Quote, Span};

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range of the token in the source.
    pub span: Span,
    /// The original text; keyword casing is preserved.
    pub text: String,
    /// 1-based line of the first byte.
    pub line: usize,
    /// 1-based column of the first character.
    pub column: usize,
    /// Whitespace or trivia separates this token from the previous one.
    pub spaced: bool,
    /// First significant token of a logical line.
    ///
    /// `&` continuations join physical lines, so the token after one is
    /// not a line start.
    pub line_start: bool,
}

impl Token {
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// Immediately follows the previous token with nothing in between.
    pub fn is_adjacent(&self) -> bool {
        !self.spaced
    }
}

/// Classified token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A word found in the keyword table.
    Keyword(Keyword),
    /// `[A-Za-z][A-Za-z0-9.$]*` not found in the keyword table.
    Identifier,
    /// `\d+(\.\d*)?` or `.\d+`
    Number,
    /// Quoted text, including its delimiters.
    String(Quote),
    /// `@` immediately followed by a word: `@AM`, `@VM`
    AtVariable,

    /// `@`
    At,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `^`
    Caret,
    /// `:`
    Colon,
    /// `=`
    Equals,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `#`
    Hash,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(kw) => write!(f, "{kw}"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::String(_) => write!(f, "string"),
            TokenKind::AtVariable => write!(f, "@variable"),
            TokenKind::At => write!(f, "`@`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Minus => write!(f, "`-`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Slash => write!(f, "`/`"),
            TokenKind::Caret => write!(f, "`^`"),
            TokenKind::Colon => write!(f, "`:`"),
            TokenKind::Equals => write!(f, "`=`"),
            TokenKind::Less => write!(f, "`<`"),
            TokenKind::Greater => write!(f, "`>`"),
            TokenKind::Hash => write!(f, "`#`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Semicolon => write!(f, "`;`"),
            TokenKind::LeftParen => write!(f, "`(`"),
            TokenKind::RightParen => write!(f, "`)`"),
            TokenKind::LeftBracket => write!(f, "`[`"),
            TokenKind::RightBracket => write!(f, "`]`"),
        }
    }
}

/// The scanner alphabet generated by `logos`.
///
/// Trivia (whitespace, newlines, continuations, `!` comments) is scanned
/// rather than skipped so the lexer can record it and track line starts.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RawToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("\n")]
    Newline,

    /// `&` immediately followed by a line break
    #[regex(r"&\r?\n")]
    Continuation,

    /// `&` anywhere else
    #[token("&")]
    Ampersand,

    #[regex(r"![^\n]*")]
    BangComment,

    #[regex(r"[A-Za-z][A-Za-z0-9.$]*")]
    Word,

    #[regex(r"@[A-Za-z][A-Za-z0-9.]*")]
    AtVariable,

    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+")]
    Number,

    #[regex(r"'[^'\n]*'")]
    SingleQuoted,

    #[regex(r#""[^"\n]*""#)]
    DoubleQuoted,

    #[regex(r"\\[^\\\n]*\\")]
    BackslashQuoted,

    /// An opening delimiter with no closing one before the line break.
    #[regex(r"'[^'\r\n]*")]
    #[regex(r#""[^"\r\n]*"#)]
    #[regex(r"\\[^\\\r\n]*")]
    UnterminatedString,

    #[token("@")]
    At,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token(":")]
    Colon,
    #[token("=")]
    Equals,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("#")]
    Hash,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
}

impl RawToken {
    /// Maps punctuation to its public kind; `None` for everything the lexer
    /// wrapper classifies itself.
    pub(super) fn symbol_kind(self) -> Option<TokenKind> {
        let kind = match self {
            RawToken::At => TokenKind::At,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Equals => TokenKind::Equals,
            RawToken::Less => TokenKind::Less,
            RawToken::Greater => TokenKind::Greater,
            RawToken::Hash => TokenKind::Hash,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::LeftParen => TokenKind::LeftParen,
            RawToken::RightParen => TokenKind::RightParen,
            RawToken::LeftBracket => TokenKind::LeftBracket,
            RawToken::RightBracket => TokenKind::RightBracket,
            _ => return None,
        };
        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to collect all raw tokens from source, skipping whitespace.
    fn lex_raw(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source)
            .filter_map(|r| r.ok())
            .filter(|t| *t != RawToken::Whitespace)
            .collect()
    }

    #[test]
    fn test_words_and_numbers() {
        assert_eq!(
            lex_raw("REC.ID NAME$ 10 1.5 .5 1."),
            vec![
                RawToken::Word,
                RawToken::Word,
                RawToken::Number,
                RawToken::Number,
                RawToken::Number,
                RawToken::Number,
            ]
        );
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(
            lex_raw(r#"'abc' "abc" \abc\"#),
            vec![
                RawToken::SingleQuoted,
                RawToken::DoubleQuoted,
                RawToken::BackslashQuoted,
            ]
        );
    }

    #[test]
    fn test_string_may_hold_other_delimiters() {
        assert_eq!(lex_raw(r#"'say "hi"'"#), vec![RawToken::SingleQuoted]);
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        assert_eq!(
            lex_raw("'abc\nX"),
            vec![RawToken::UnterminatedString, RawToken::Newline, RawToken::Word]
        );
    }

    #[test]
    fn test_continuation_and_ampersand() {
        assert_eq!(
            lex_raw("A &\nB & C"),
            vec![
                RawToken::Word,
                RawToken::Continuation,
                RawToken::Word,
                RawToken::Ampersand,
                RawToken::Word,
            ]
        );
    }

    #[test]
    fn test_at_forms() {
        assert_eq!(lex_raw("@AM"), vec![RawToken::AtVariable]);
        assert_eq!(
            lex_raw("@(1)"),
            vec![
                RawToken::At,
                RawToken::LeftParen,
                RawToken::Number,
                RawToken::RightParen,
            ]
        );
    }

    #[test]
    fn test_compound_comparisons_stay_split() {
        assert_eq!(
            lex_raw("<>>="),
            vec![
                RawToken::Less,
                RawToken::Greater,
                RawToken::Greater,
                RawToken::Equals,
            ]
        );
    }

    #[test]
    fn test_bang_comment_runs_to_end_of_line() {
        assert_eq!(
            lex_raw("X ! note + 1\nY"),
            vec![
                RawToken::Word,
                RawToken::BangComment,
                RawToken::Newline,
                RawToken::Word,
            ]
        );
    }
}
