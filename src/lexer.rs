use logos::Logos;
use tracing::trace;

use crate::token::{Span, Token, TokenKind};

fn string_content(slice: &str) -> &str {
    let content = &slice[1..];
    content.strip_suffix('"').unwrap_or(content)
}

#[derive(Logos, Clone, Copy, Debug, PartialEq, Eq)]
#[logos(skip r"([ \t\r\n\f]|#[^\n]*)+")]
enum Lexeme {
    #[token("=")]
    Assign,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("!")]
    Bang,

    #[token("*")]
    Asterisk,

    #[token("/")]
    Slash,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("==")]
    Eq,

    #[token("!=")]
    NotEq,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("fn")]
    Function,

    #[token("let")]
    Let,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("return")]
    Return,

    #[token("for")]
    For,

    #[token("in")]
    In,

    #[token("while")]
    While,

    #[token("break")]
    Break,

    #[token("continue")]
    Continue,

    // No escapes: the first quote after the opening one ends the literal.
    #[regex(r#""[^"]*"?"#)]
    String,

    #[regex(r"[0-9]+")]
    Int,

    #[regex(r"[\p{L}_]+")]
    Ident,
}

impl Lexeme {
    fn kind(self) -> TokenKind {
        match self {
            Lexeme::Assign => TokenKind::Assign,
            Lexeme::Plus => TokenKind::Plus,
            Lexeme::Minus => TokenKind::Minus,
            Lexeme::Bang => TokenKind::Bang,
            Lexeme::Asterisk => TokenKind::Asterisk,
            Lexeme::Slash => TokenKind::Slash,
            Lexeme::Lt => TokenKind::Lt,
            Lexeme::Gt => TokenKind::Gt,
            Lexeme::Eq => TokenKind::Eq,
            Lexeme::NotEq => TokenKind::NotEq,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Semicolon => TokenKind::Semicolon,
            Lexeme::Colon => TokenKind::Colon,
            Lexeme::LParen => TokenKind::LParen,
            Lexeme::RParen => TokenKind::RParen,
            Lexeme::LBrace => TokenKind::LBrace,
            Lexeme::RBrace => TokenKind::RBrace,
            Lexeme::LBracket => TokenKind::LBracket,
            Lexeme::RBracket => TokenKind::RBracket,
            Lexeme::Function => TokenKind::Function,
            Lexeme::Let => TokenKind::Let,
            Lexeme::True => TokenKind::True,
            Lexeme::False => TokenKind::False,
            Lexeme::If => TokenKind::If,
            Lexeme::Else => TokenKind::Else,
            Lexeme::Return => TokenKind::Return,
            Lexeme::For => TokenKind::For,
            Lexeme::In => TokenKind::In,
            Lexeme::While => TokenKind::While,
            Lexeme::Break => TokenKind::Break,
            Lexeme::Continue => TokenKind::Continue,
            Lexeme::String => TokenKind::String,
            Lexeme::Int => TokenKind::Int,
            Lexeme::Ident => TokenKind::Ident,
        }
    }
}

/// Pull-based scanner: one [`Token`] per call to [`Lexer::next_token`].
///
/// Once the input is exhausted every further call yields an `EOF` token.
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Lexeme>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source,
            inner: Lexeme::lexer(source),
        }
    }

    pub fn next_token(&mut self) -> Token {
        let token = match self.inner.next() {
            Some(lexeme) => {
                let range = self.inner.span();
                let span = Span(range.start, range.end);
                let slice = self.inner.slice();

                match lexeme {
                    Ok(Lexeme::String) => Token::new(TokenKind::String, string_content(slice), span),
                    Ok(lexeme) => Token::new(lexeme.kind(), slice, span),
                    Err(()) => Token::new(TokenKind::Illegal, slice, span),
                }
            }
            None => {
                let end = self.source.len();
                Token::new(TokenKind::Eof, "", Span(end, end))
            }
        };

        trace!(kind = %token.kind, literal = %token.literal, start = token.span.0, end = token.span.1, "token");

        token
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();

        if token.is(TokenKind::Eof) {
            None
        } else {
            Some(token)
        }
    }
}
