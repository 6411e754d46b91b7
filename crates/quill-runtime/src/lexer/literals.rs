//! Literal scanning for the lexer

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind, TokenLiteral};

impl Lexer {
    /// Scan a string literal
    ///
    /// Strings have no escape sequences and may span lines.
    pub(super) fn string(&mut self) -> Token {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != '"' {
            let c = self.advance();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            }
            value.push(c);
        }

        if self.is_at_end() {
            return self.error_unterminated_string();
        }

        self.advance(); // Closing "

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        self.make_token(TokenKind::String, &lexeme)
            .with_literal(TokenLiteral::String(value))
    }

    /// Scan a number literal (digits with an optional fractional part)
    pub(super) fn number(&mut self) -> Token {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        // Only take the dot when a digit follows, so `1.` is `1` then `.`
        if self.peek() == '.' && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume .

            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        match lexeme.parse::<f64>() {
            Ok(value) => self
                .make_token(TokenKind::Number, &lexeme)
                .with_literal(TokenLiteral::Number(value)),
            Err(_) => self.error_token(&format!("Invalid number literal '{}'", lexeme)),
        }
    }

    /// Scan an identifier or keyword
    pub(super) fn identifier(&mut self) -> Token {
        while !self.is_at_end() {
            let c = self.peek();
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let lexeme: String = self.chars[self.start_pos..self.current].iter().collect();
        let kind = TokenKind::is_keyword(&lexeme).unwrap_or(TokenKind::Identifier);

        self.make_token(kind, &lexeme)
    }
}
