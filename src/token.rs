use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Illegal,
  Eof,

  Ident,
  Int,
  String,

  Assign,
  Plus,
  Minus,
  Bang,
  Asterisk,
  Slash,
  Lt,
  Gt,
  Eq,
  NotEq,

  Comma,
  Semicolon,
  Colon,

  LParen,
  RParen,
  LBrace,
  RBrace,
  LBracket,
  RBracket,

  Function,
  Let,
  True,
  False,
  If,
  Else,
  Return,
  For,
  In,
  While,
  Break,
  Continue,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TokenKind::Illegal => "ILLEGAL",
      TokenKind::Eof => "EOF",
      TokenKind::Ident => "IDENT",
      TokenKind::Int => "INT",
      TokenKind::String => "STRING",
      TokenKind::Assign => "=",
      TokenKind::Plus => "+",
      TokenKind::Minus => "-",
      TokenKind::Bang => "!",
      TokenKind::Asterisk => "*",
      TokenKind::Slash => "/",
      TokenKind::Lt => "<",
      TokenKind::Gt => ">",
      TokenKind::Eq => "==",
      TokenKind::NotEq => "!=",
      TokenKind::Comma => ",",
      TokenKind::Semicolon => ";",
      TokenKind::Colon => ":",
      TokenKind::LParen => "(",
      TokenKind::RParen => ")",
      TokenKind::LBrace => "{",
      TokenKind::RBrace => "}",
      TokenKind::LBracket => "[",
      TokenKind::RBracket => "]",
      TokenKind::Function => "FUNCTION",
      TokenKind::Let => "LET",
      TokenKind::True => "TRUE",
      TokenKind::False => "FALSE",
      TokenKind::If => "IF",
      TokenKind::Else => "ELSE",
      TokenKind::Return => "RETURN",
      TokenKind::For => "FOR",
      TokenKind::In => "IN",
      TokenKind::While => "WHILE",
      TokenKind::Break => "BREAK",
      TokenKind::Continue => "CONTINUE",
    };

    f.write_str(name)
  }
}

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span(pub usize, pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub literal: String,
  pub span: Span,
}

impl Token {
  pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Token {
    Token {
      kind,
      literal: literal.into(),
      span,
    }
  }

  pub fn is(&self, kind: TokenKind) -> bool {
    self.kind == kind
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {:?}", self.kind, self.literal)
  }
}
