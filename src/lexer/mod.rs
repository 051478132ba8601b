//! Lexical analysis for Pick BASIC.
//!
//! This module converts source text into a stream of [`Token`]s plus a
//! record of the trivia between them. It handles:
//!
//! - Case-insensitive keyword recognition through one shared table
//! - Numbers, the three string delimiters and `@` system variables
//! - Comments: `!` and `REM` anywhere, `*` only where a statement may begin
//! - Line continuations (`&` at the end of a line)
//!
//! ## Example
//!
//! ```
//! use pickbasic::lexer::{Lexer, TokenKind, Keyword};
//!
//! let mut lexer = Lexer::new("PRINT 42");
//!
//! let token = lexer.next_token().unwrap();
//! assert_eq!(token.kind, TokenKind::Keyword(Keyword::Print));
//! assert_eq!(lexer.next_token().unwrap().text, "42");
//! assert!(lexer.next_token().is_none());
//! ```
//!
//! ## Design Notes
//!
//! The scanner alphabet is generated by [`logos`](https://docs.rs/logos). We
//! wrap it in our own [`Lexer`] because two decisions depend on the tokens
//! already produced:
//!
//! - whether `*` opens a comment or multiplies
//! - whether a token begins a new logical line
//!
//! Lexical errors never stop the scan. Invalid characters are skipped and an
//! unterminated string still yields a string token.

mod keywords;
mod token;

pub use keywords::{Keyword, lookup_keyword};
pub use token::{Token, TokenKind};

use log::trace;
use logos::Logos;

use crate::ast::{Comment, CommentStyle, LineIndex, Quote, Span};
use crate::parser::ParseError;
use token::RawToken;

/// Non-significant source text between tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaKind {
    Whitespace,
    Newline,
    /// `&` followed by a line break.
    Continuation,
    Comment(CommentStyle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub span: Span,
}

/// Everything the lexer produces for one source buffer.
#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    /// Whitespace, newlines, continuations and comments in source order.
    pub trivia: Vec<Trivia>,
    /// Comments that sit where a statement could begin.
    ///
    /// Trailing comments such as `X = 1 ! note` appear only in `trivia`.
    pub comments: Vec<Comment>,
    pub errors: Vec<ParseError>,
    pub line_index: LineIndex,
}

/// The lexer for Pick BASIC source code.
///
/// Wraps a `logos` lexer and yields [`Token`]s with their positions and
/// layout flags. Trivia, comments and errors are collected on the side and
/// returned by [`Lexer::tokenize`].
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, RawToken>,
    line_index: LineIndex,
    trivia: Vec<Trivia>,
    comments: Vec<Comment>,
    errors: Vec<ParseError>,
    /// Kind of the last significant token.
    previous: Option<TokenKind>,
    /// End offset of the last significant token.
    previous_end: Option<usize>,
    /// A newline (not a continuation) was seen since the last token.
    at_line_start: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: RawToken::lexer(source),
            line_index: LineIndex::new(source),
            trivia: Vec::new(),
            comments: Vec::new(),
            errors: Vec::new(),
            previous: None,
            previous_end: None,
            at_line_start: true,
        }
    }

    /// Get the original source code.
    pub fn source(&self) -> &'source str {
        self.inner.source()
    }

    /// Get the next significant token, if any.
    ///
    /// Returns `None` when the end of input is reached.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            let raw = self.inner.next()?;
            let span: Span = self.inner.span().into();

            let raw = match raw {
                Ok(raw) => raw,
                Err(()) => {
                    let ch = self.inner.slice().chars().next().unwrap_or('\u{fffd}');
                    self.errors.push(ParseError::InvalidCharacter { ch, span });
                    continue;
                }
            };

            let kind = match raw {
                RawToken::Whitespace => {
                    self.push_trivia(TriviaKind::Whitespace, span);
                    continue;
                }
                RawToken::Newline => {
                    self.at_line_start = true;
                    self.push_trivia(TriviaKind::Newline, span);
                    continue;
                }
                RawToken::Continuation => {
                    self.push_trivia(TriviaKind::Continuation, span);
                    continue;
                }
                RawToken::Ampersand => {
                    self.errors
                        .push(ParseError::UnterminatedContinuation { span });
                    continue;
                }
                RawToken::BangComment => {
                    self.push_comment(CommentStyle::Bang, span);
                    continue;
                }
                RawToken::Star if self.at_statement_position() => {
                    let span = self.bump_to_line_end(span);
                    self.push_comment(CommentStyle::Star, span);
                    continue;
                }
                RawToken::Word => match lookup_keyword(self.inner.slice()) {
                    Some(Keyword::Rem) if self.rem_opens_comment() => {
                        let span = self.bump_to_line_end(span);
                        self.push_comment(CommentStyle::Rem, span);
                        continue;
                    }
                    Some(kw) => TokenKind::Keyword(kw),
                    None => TokenKind::Identifier,
                },
                RawToken::AtVariable => TokenKind::AtVariable,
                RawToken::Number => TokenKind::Number,
                RawToken::SingleQuoted => TokenKind::String(Quote::Single),
                RawToken::DoubleQuoted => TokenKind::String(Quote::Double),
                RawToken::BackslashQuoted => TokenKind::String(Quote::Backslash),
                RawToken::UnterminatedString => {
                    self.errors.push(ParseError::UnterminatedString { span });
                    let quote = self
                        .inner
                        .slice()
                        .chars()
                        .next()
                        .and_then(Quote::from_char)
                        .unwrap_or(Quote::Double);
                    TokenKind::String(quote)
                }
                other => match other.symbol_kind() {
                    Some(kind) => kind,
                    None => continue,
                },
            };

            return Some(self.make_token(kind, span));
        }
    }

    /// Lexes the remaining input and returns tokens together with the trivia,
    /// comments and errors collected along the way.
    pub fn tokenize(mut self) -> LexOutput {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        LexOutput {
            tokens,
            trivia: self.trivia,
            comments: self.comments,
            errors: self.errors,
            line_index: self.line_index,
        }
    }

    fn make_token(&mut self, kind: TokenKind, span: Span) -> Token {
        let position = self.line_index.position(span.start);
        let spaced = match self.previous_end {
            Some(end) => end != span.start,
            None => span.start > 0,
        };
        let token = Token {
            kind,
            span,
            text: self.inner.slice().to_string(),
            line: position.line,
            column: position.column,
            spaced,
            line_start: self.at_line_start,
        };
        self.previous = Some(kind);
        self.previous_end = Some(span.end);
        self.at_line_start = false;
        token
    }

    /// True where a new statement could begin.
    ///
    /// That is the start of input, after `;` or a keyword that opens a
    /// statement list, or the first token of any logical line. Expressions
    /// never span logical lines, so a line start always begins a statement.
    fn at_statement_position(&self) -> bool {
        match self.previous {
            None => true,
            Some(TokenKind::Semicolon) => true,
            Some(TokenKind::Keyword(
                Keyword::Then
                | Keyword::Else
                | Keyword::Loop
                | Keyword::Do
                | Keyword::Repeat
                | Keyword::End,
            )) => true,
            Some(_) => self.at_line_start,
        }
    }

    /// `REM` starts a comment only when followed by whitespace or the end of
    /// the line, so `REMAINDER` and `REM.COUNT` stay identifiers.
    fn rem_opens_comment(&self) -> bool {
        matches!(
            self.inner.remainder().chars().next(),
            None | Some(' ' | '\t' | '\r' | '\n')
        )
    }

    /// Extends the current token to the end of its line.
    fn bump_to_line_end(&mut self, span: Span) -> Span {
        let rest = self.inner.remainder();
        let len = rest.find('\n').unwrap_or(rest.len());
        self.inner.bump(len);
        Span::new(span.start, span.end + len)
    }

    fn push_trivia(&mut self, kind: TriviaKind, span: Span) {
        self.trivia.push(Trivia { kind, span });
    }

    fn push_comment(&mut self, style: CommentStyle, span: Span) {
        let raw = &self.inner.source()[span.start..span.end];
        let text = raw.trim_end_matches('\r');
        let span = Span::new(span.start, span.start + text.len());
        self.push_trivia(TriviaKind::Comment(style), span);
        if self.at_statement_position() {
            self.comments.push(Comment {
                style,
                text: text.to_string(),
                span,
            });
        } else {
            trace!("trailing comment at {}..{} kept as trivia", span.start, span.end);
        }
    }
}

/// Implement Iterator so the lexer can be used with for loops and iterator adapters.
impl<'source> Iterator for Lexer<'source> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Convenience function to lex source code directly.
///
/// # Example
///
/// ```
/// use pickbasic::lexer::{lex, Keyword, TokenKind};
///
/// let output = lex("* header\nPRINT 42");
/// assert_eq!(output.tokens[0].kind, TokenKind::Keyword(Keyword::Print));
/// assert_eq!(output.comments.len(), 1);
/// assert!(output.errors.is_empty());
/// ```
pub fn lex(source: &str) -> LexOutput {
    Lexer::new(source).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lexer_iterator() {
        let tokens: Vec<_> = Lexer::new("PRINT 42").collect();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_token_spans() {
        let tokens = lex("PRINT 42").tokens;

        // PRINT should span bytes 0..5
        assert_eq!(tokens[0].span, Span::new(0, 5));
        assert_eq!(tokens[0].text, "PRINT");

        // 42 should span bytes 6..8
        assert_eq!(tokens[1].span, Span::new(6, 8));
        assert_eq!(tokens[1].text, "42");
    }

    #[test]
    fn test_keyword_case_preserved() {
        let tokens = lex("print Print").tokens;
        assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Print));
        assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::Print));
        assert_eq!(tokens[0].text, "print");
        assert_eq!(tokens[1].text, "Print");
    }

    #[test]
    fn test_star_comment_at_start() {
        let output = lex("* just a comment");
        assert!(output.tokens.is_empty());
        assert_eq!(output.comments.len(), 1);
        assert_eq!(output.comments[0].style, CommentStyle::Star);
        assert_eq!(output.comments[0].text, "* just a comment");
    }

    #[test]
    fn test_star_is_multiplication_mid_expression() {
        assert_eq!(
            kinds("X = 3 * 4"),
            vec![
                TokenKind::Identifier,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn test_star_comment_after_semicolon_and_then() {
        let output = lex("X = 1 ; * note\nIF X THEN * note");
        assert_eq!(output.comments.len(), 2);
        assert!(!output.tokens.iter().any(|t| t.kind == TokenKind::Star));
    }

    #[test]
    fn test_star_comment_on_following_line() {
        let output = lex("X = Y\n* comment\nZ = 1");
        assert_eq!(output.comments.len(), 1);
        assert_eq!(output.tokens.len(), 6);
    }

    #[test]
    fn test_star_after_pending_operator_multiplies() {
        // The continuation joins the lines, so `*` follows `3` on one line.
        assert!(kinds("X = 3 &\n* 4").contains(&TokenKind::Star));
    }

    #[test]
    fn test_star_comment_after_complete_lines() {
        for src in [
            "NAME = REC<1>\n* get the address\nADDR = REC<2>",
            "PRINT \"Name\":\n* don't break the line\nPRINT X",
            "PRINT X,\n* next column\nPRINT Y",
        ] {
            let output = lex(src);
            assert_eq!(output.comments.len(), 1, "{src:?}");
            assert!(output.errors.is_empty(), "{src:?}");
            assert!(!output.tokens.iter().any(|t| t.kind == TokenKind::Star));
        }
    }

    #[test]
    fn test_rem_comment_and_rem_prefix_words() {
        let output = lex("REM a remark\nREMAINDER = 1");
        assert_eq!(output.comments.len(), 1);
        assert_eq!(output.comments[0].style, CommentStyle::Rem);
        assert_eq!(output.tokens[0].kind, TokenKind::Identifier);
        assert_eq!(output.tokens[0].text, "REMAINDER");
    }

    #[test]
    fn test_trailing_bang_comment_is_not_standalone() {
        let output = lex("X = 1 ! trailing\n! standalone");
        assert_eq!(output.comments.len(), 1);
        assert_eq!(output.comments[0].text, "! standalone");
        let comment_trivia = output
            .trivia
            .iter()
            .filter(|t| matches!(t.kind, TriviaKind::Comment(_)))
            .count();
        assert_eq!(comment_trivia, 2);
    }

    #[test]
    fn test_line_start_flags() {
        let tokens = lex("A = 1\nB = 2").tokens;
        assert!(tokens[0].line_start);
        assert!(!tokens[1].line_start);
        assert!(tokens[3].line_start);
        assert_eq!(tokens[3].line, 2);
        assert_eq!(tokens[3].column, 1);
    }

    #[test]
    fn test_continuation_joins_lines() {
        let output = lex("A = 1 + &\n  2");
        assert!(output.errors.is_empty());
        let last = output.tokens.last().unwrap();
        assert_eq!(last.text, "2");
        assert!(!last.line_start);
        assert_eq!(last.line, 2);
    }

    #[test]
    fn test_lone_ampersand_is_error() {
        let output = lex("A = B & C");
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(
            output.errors[0],
            ParseError::UnterminatedContinuation { .. }
        ));
        assert_eq!(output.tokens.len(), 4);
    }

    #[test]
    fn test_adjacency_flags() {
        let tokens = lex("A<1> B <2").tokens;
        assert!(!tokens[1].spaced);
        assert!(!tokens[2].spaced);
        assert!(!tokens[3].spaced);
        assert!(tokens[4].spaced);
        assert!(tokens[5].spaced);
        assert!(!tokens[6].spaced);
    }

    #[test]
    fn test_unterminated_string_still_yields_token() {
        let output = lex("PRINT 'abc\nX = 1");
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(output.errors[0], ParseError::UnterminatedString { .. }));
        assert_eq!(output.tokens[1].kind, TokenKind::String(Quote::Single));
        assert_eq!(output.tokens[1].text, "'abc");
        assert!(output.tokens[2].line_start);
    }

    #[test]
    fn test_invalid_character_skipped() {
        let output = lex("X = 1 ~ 2");
        assert_eq!(output.errors.len(), 1);
        assert!(matches!(
            output.errors[0],
            ParseError::InvalidCharacter { ch: '~', .. }
        ));
        assert_eq!(output.tokens.len(), 4);
    }

    #[test]
    fn test_at_variable_and_at_symbol() {
        assert_eq!(
            kinds("@AM @(1)"),
            vec![
                TokenKind::AtVariable,
                TokenKind::At,
                TokenKind::LeftParen,
                TokenKind::Number,
                TokenKind::RightParen,
            ]
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let output = lex("* note\r\nX = 1\r\n");
        assert_eq!(output.comments[0].text, "* note");
        assert_eq!(output.tokens.len(), 3);
        assert!(output.tokens[0].line_start);
        assert!(output.errors.is_empty());
    }
}
