//! Parsing (tokens to AST)
//!
//! Recursive descent with one function per precedence level. A statement that
//! fails to parse records a diagnostic, is dropped, and the parser
//! synchronizes at the next statement boundary.

mod expr;
mod stmt;

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Parser state for building AST from tokens
pub struct Parser {
    pub(super) tokens: Vec<Token>,
    pub(super) current: usize,
    pub(super) diagnostics: Vec<Diagnostic>,
}

impl Parser {
    /// Create a new parser for the given tokens
    ///
    /// Lexer error tokens are skipped (their diagnostics were already
    /// reported) and a trailing `Eof` is guaranteed.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Error)
            .collect();

        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, end) = tokens
                .last()
                .map(|t| (t.line, t.span.end))
                .unwrap_or((1, 0));
            tokens.push(Token::new(TokenKind::Eof, "", line, Span::new(end, end)));
        }

        Self {
            tokens,
            current: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse tokens into an AST
    pub fn parse(&mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let start = self.current;
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(start),
            }
        }

        log::debug!(
            "parsed {} statements with {} diagnostics",
            statements.len(),
            self.diagnostics.len()
        );
        (Program { statements }, std::mem::take(&mut self.diagnostics))
    }

    /// Skip to the next statement boundary after a syntax error
    ///
    /// Stops once the previous token is `;`, or before a statement keyword
    /// or a `}`. If the failed statement consumed nothing, one token is
    /// skipped first so recovery always makes progress.
    pub(super) fn synchronize(&mut self, start: usize) {
        if self.current == start {
            self.advance();
        }

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                break;
            }

            match self.peek().kind {
                TokenKind::Var
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Print
                | TokenKind::Fun
                | TokenKind::Return
                | TokenKind::RightBrace => break,
                _ => {}
            }

            self.advance();
        }

        log::trace!(
            "synchronized at token {} ({:?})",
            self.current,
            self.peek().kind
        );
    }

    // === Helper methods ===

    /// Advance to next token and return reference to previous
    pub(super) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    /// Peek at current token
    pub(super) fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Most recently consumed token
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    /// Check if current token matches kind
    pub(super) fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Match and consume token if it matches
    pub(super) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume token of given kind or error
    pub(super) fn consume(&mut self, kind: TokenKind, message: &str) -> Result<&Token, ()> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            self.error(message);
            Err(())
        }
    }

    /// Consume a statement-ending `;`
    ///
    /// A missing terminator is reported just after the previous token, so
    /// the error lands on the line of the unfinished statement.
    pub(super) fn consume_semicolon(&mut self, message: &str) -> Result<Span, ()> {
        if self.check(TokenKind::Semicolon) {
            Ok(self.advance().span)
        } else {
            self.error_after_previous(message);
            Err(())
        }
    }

    /// Consume an identifier, rejecting keywords with a dedicated error
    pub(super) fn consume_identifier(&mut self, context: &str) -> Result<Identifier, ()> {
        if self.check(TokenKind::Identifier) {
            let token = self.advance();
            return Ok(Identifier {
                name: token.lexeme.clone(),
                line: token.line,
                span: token.span,
            });
        }

        if self.peek().kind.is_keyword_kind() {
            let message = format!(
                "Cannot use reserved keyword '{}' as {}",
                self.peek().lexeme,
                context
            );
            self.error_at_current(error_codes::RESERVED_KEYWORD, &message);
        } else {
            self.error(&format!("Expected {}", context));
        }
        Err(())
    }

    /// Check if at end of token stream
    pub(super) fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len() || self.tokens[self.current].kind == TokenKind::Eof
    }

    // === Error reporting ===

    /// Record a syntax error at the current token
    pub(super) fn error(&mut self, message: &str) {
        self.error_at_current(error_codes::SYNTAX_ERROR, message);
    }

    /// Record an error with a specific code at the current token
    pub(super) fn error_at_current(&mut self, code: &str, message: &str) {
        let token = self.peek();
        let label = if token.kind == TokenKind::Eof {
            "found end of input".to_string()
        } else {
            format!("found '{}'", token.lexeme)
        };
        let diagnostic = Diagnostic::error_with_code(code, message, token.span)
            .with_line(token.line as usize)
            .with_column(token.column as usize)
            .with_label(label);
        self.push_syntax_diagnostic(diagnostic);
    }

    /// Record a syntax error at the position right after the previous token
    pub(super) fn error_after_previous(&mut self, message: &str) {
        let token = self.previous();
        let column = token.column as usize + token.lexeme.chars().count();
        let diagnostic = Diagnostic::error_with_code(
            error_codes::SYNTAX_ERROR,
            message,
            Span::new(token.span.end, token.span.end + 1),
        )
        .with_line(token.line as usize)
        .with_column(column)
        .with_label("expected here");
        self.push_syntax_diagnostic(diagnostic);
    }

    fn push_syntax_diagnostic(&mut self, diagnostic: Diagnostic) {
        let help = match diagnostic.code.as_str() {
            error_codes::RESERVED_KEYWORD => "choose a different name",
            error_codes::INVALID_ASSIGNMENT_TARGET => "only variables can be assigned to",
            _ => "check your syntax for typos or missing tokens",
        };
        self.diagnostics.push(diagnostic.with_help(help));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
        let mut lexer = Lexer::new(source);
        let (tokens, _) = lexer.tokenize();
        let mut parser = Parser::new(tokens);
        parser.parse()
    }

    #[test]
    fn test_empty_program() {
        let (program, diagnostics) = parse("");
        assert!(program.statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_eof_is_added() {
        let mut parser = Parser::new(Vec::new());
        let (program, diagnostics) = parser.parse();
        assert!(program.statements.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_error_tokens_are_skipped() {
        let (program, diagnostics) = parse("print 1 @;");
        assert!(diagnostics.is_empty());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_recovery_keeps_following_statements() {
        let (program, diagnostics) = parse("var = 1; print 2;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.statements.len(), 1);
        assert_eq!(program.statements[0].to_string(), "(print 2)");
    }

    #[test]
    fn test_stray_token_makes_progress() {
        let (program, diagnostics) = parse(") ) print 1;");
        assert!(!diagnostics.is_empty());
        assert_eq!(program.statements.len(), 1);
    }

    #[test]
    fn test_synchronize_stops_before_closing_brace() {
        let (program, diagnostics) = parse("{ print ; } print 3;");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(program.statements.len(), 2);
        assert_eq!(program.statements[0].to_string(), "(block)");
    }
}
