//! Token types for lexical analysis
//!
//! Defines all token types recognized by the Quill lexer.

use crate::span::Span;
use serde::{Deserialize, Serialize};

/// Parsed value carried by literal tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenLiteral {
    /// Numeric literal, always double precision
    Number(f64),
    /// String literal contents without the quotes
    String(String),
}

/// Token type produced by the lexer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The source text of this token
    pub lexeme: String,
    /// Parsed literal value (numbers and strings only)
    pub literal: Option<TokenLiteral>,
    /// Line the token starts on (1-based)
    pub line: u32,
    /// Column the token starts at (1-based)
    pub column: u32,
    /// Source location
    pub span: Span,
}

impl Token {
    /// Create a new token without a literal value
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            column: 1,
            span,
        }
    }

    /// Attach a literal value
    pub fn with_literal(mut self, literal: TokenLiteral) -> Self {
        self.literal = Some(literal);
        self
    }

    /// Set the starting column
    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }
}

/// Classification of token types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    /// Number literal (42, 3.14)
    Number,
    /// String literal ("hello")
    String,
    /// Identifier
    Identifier,

    // Keywords
    /// `var` keyword
    Var,
    /// `if` keyword
    If,
    /// `else` keyword
    Else,
    /// `while` keyword
    While,
    /// `for` keyword
    For,
    /// `print` keyword
    Print,
    /// `true` keyword
    True,
    /// `false` keyword
    False,
    /// `nil` keyword
    Nil,
    /// `and` keyword
    And,
    /// `or` keyword
    Or,

    // Reserved for future
    /// `fun` keyword (reserved, functions are not supported)
    Fun,
    /// `return` keyword (reserved, functions are not supported)
    Return,

    // Operators
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `!`
    Bang,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&` (same as `and`)
    AmpAmp,
    /// `||` (same as `or`)
    PipePipe,

    // Punctuation
    /// `=`
    Equal,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `.`
    Dot,

    // Special
    /// End of file
    Eof,
    /// Lexer error
    Error,
}

impl TokenKind {
    /// Check if a string is a keyword and return its token kind
    pub fn is_keyword(s: &str) -> Option<TokenKind> {
        match s {
            "var" => Some(TokenKind::Var),
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "for" => Some(TokenKind::For),
            "print" => Some(TokenKind::Print),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            "nil" => Some(TokenKind::Nil),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "fun" => Some(TokenKind::Fun),
            "return" => Some(TokenKind::Return),
            _ => None,
        }
    }

    /// Whether this kind is produced from the keyword table
    pub fn is_keyword_kind(&self) -> bool {
        matches!(
            self,
            TokenKind::Var
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Print
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Fun
                | TokenKind::Return
        )
    }

    /// Get the string representation of this token kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Identifier => "identifier",
            TokenKind::Var => "var",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Print => "print",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Nil => "nil",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Fun => "fun",
            TokenKind::Return => "return",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Bang => "!",
            TokenKind::EqualEqual => "==",
            TokenKind::BangEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Equal => "=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Eof => "EOF",
            TokenKind::Error => "error",
        }
    }
}
