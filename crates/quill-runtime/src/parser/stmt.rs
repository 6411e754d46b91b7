//! Statement parsing

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::parser::Parser;
use crate::span::Span;
use crate::token::TokenKind;

impl Parser {
    /// Parse a declaration (`var`) or any other statement
    pub(super) fn parse_declaration(&mut self) -> Result<Stmt, ()> {
        if self.check(TokenKind::Var) {
            self.parse_var_decl()
        } else {
            self.parse_statement()
        }
    }

    /// Parse a statement
    pub(super) fn parse_statement(&mut self) -> Result<Stmt, ()> {
        match self.peek().kind {
            TokenKind::Print => self.parse_print(),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block()?)),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Fun | TokenKind::Return => {
                let message = format!(
                    "'{}' is a reserved keyword; functions are not supported",
                    self.peek().lexeme
                );
                self.error_at_current(error_codes::RESERVED_KEYWORD, &message);
                Err(())
            }
            _ => self.parse_expr_stmt(),
        }
    }

    /// Parse `var name (= init)? ;`
    fn parse_var_decl(&mut self) -> Result<Stmt, ()> {
        let var_span = self.consume(TokenKind::Var, "Expected 'var'")?.span;
        let name = self.consume_identifier("a variable name")?;

        let init = if self.match_token(TokenKind::Equal) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let end_span = self.consume_semicolon("Expected ';' after variable declaration")?;

        Ok(Stmt::VarDecl(VarDecl {
            name,
            init,
            span: var_span.merge(end_span),
        }))
    }

    /// Parse `print expr ;`
    fn parse_print(&mut self) -> Result<Stmt, ()> {
        let print_span = self.consume(TokenKind::Print, "Expected 'print'")?.span;
        let expr = self.parse_expression()?;
        let end_span = self.consume_semicolon("Expected ';' after value")?;

        Ok(Stmt::Print(PrintStmt {
            expr,
            span: print_span.merge(end_span),
        }))
    }

    /// Parse `expr ;`
    fn parse_expr_stmt(&mut self) -> Result<Stmt, ()> {
        let expr = self.parse_expression()?;
        let end_span = self.consume_semicolon("Expected ';' after expression")?;
        let span = expr.span().merge(end_span);

        Ok(Stmt::Expr(ExprStmt { expr, span }))
    }

    /// Parse `{ declaration* }`
    ///
    /// Errors inside the block are recovered here so the rest of the block
    /// still parses.
    pub(super) fn parse_block(&mut self) -> Result<Block, ()> {
        let open_span = self.consume(TokenKind::LeftBrace, "Expected '{'")?.span;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            let start = self.current;
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(_) => self.synchronize(start),
            }
        }

        let close_span = self
            .consume(TokenKind::RightBrace, "Expected '}' after block")?
            .span;

        Ok(Block {
            statements,
            span: open_span.merge(close_span),
        })
    }

    /// Parse `if ( cond ) stmt (else stmt)?`
    ///
    /// `else` binds to the nearest unmatched `if`.
    fn parse_if(&mut self) -> Result<Stmt, ()> {
        let if_span = self.consume(TokenKind::If, "Expected 'if'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'if'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after if condition")?;

        let then_branch = Box::new(self.parse_statement()?);
        let else_branch = if self.match_token(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let end_span = else_branch
            .as_ref()
            .map(|s| s.span())
            .unwrap_or_else(|| then_branch.span());

        Ok(Stmt::If(IfStmt {
            cond,
            then_branch,
            else_branch,
            span: if_span.merge(end_span),
        }))
    }

    /// Parse `while ( cond ) stmt`
    fn parse_while(&mut self) -> Result<Stmt, ()> {
        let while_span = self.consume(TokenKind::While, "Expected 'while'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'while'")?;
        let cond = self.parse_expression()?;
        self.consume(TokenKind::RightParen, "Expected ')' after while condition")?;
        let body = Box::new(self.parse_statement()?);
        let span = while_span.merge(body.span());

        Ok(Stmt::While(WhileStmt { cond, body, span }))
    }

    /// Parse `for ( init ; cond ; incr ) stmt` into blocks and a `while`
    ///
    /// The result is `{ init; while (cond) { body; incr; } }`, with a missing
    /// condition treated as `true`.
    fn parse_for(&mut self) -> Result<Stmt, ()> {
        let for_span = self.consume(TokenKind::For, "Expected 'for'")?.span;
        self.consume(TokenKind::LeftParen, "Expected '(' after 'for'")?;

        let init = if self.match_token(TokenKind::Semicolon) {
            None
        } else if self.check(TokenKind::Var) {
            Some(self.parse_var_decl()?)
        } else {
            Some(self.parse_expr_stmt()?)
        };

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let cond_end = self.consume_semicolon("Expected ';' after loop condition")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume(TokenKind::RightParen, "Expected ')' after for clauses")?;

        let mut body = self.parse_statement()?;
        let span = for_span.merge(body.span());

        if let Some(increment) = increment {
            let incr_span = increment.span();
            body = Stmt::Block(Block {
                statements: vec![
                    body,
                    Stmt::Expr(ExprStmt {
                        expr: increment,
                        span: incr_span,
                    }),
                ],
                span,
            });
        }

        let cond = cond.unwrap_or_else(|| {
            Expr::Literal(Literal::Bool(true), Span::new(cond_end.start, cond_end.start))
        });
        let mut statements = Vec::with_capacity(2);
        statements.extend(init);
        statements.push(Stmt::While(WhileStmt {
            cond,
            body: Box::new(body),
            span,
        }));

        Ok(Stmt::Block(Block { statements, span }))
    }
}
