//! Expression parsing (recursive descent, one level per precedence)

use crate::ast::*;
use crate::diagnostic::error_codes;
use crate::parser::Parser;
use crate::token::{TokenKind, TokenLiteral};

impl Parser {
    /// Parse an expression
    pub(super) fn parse_expression(&mut self) -> Result<Expr, ()> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative, lowest precedence)
    fn parse_assignment(&mut self) -> Result<Expr, ()> {
        let target = self.parse_or()?;

        if !self.check(TokenKind::Equal) {
            return Ok(target);
        }

        // Remember the `=` so an invalid target is reported there
        let equals_index = self.current;
        self.advance();
        let value = self.parse_assignment()?;

        match target {
            Expr::Variable(name) => {
                let span = name.span.merge(value.span());
                Ok(Expr::Assign(AssignExpr {
                    name,
                    value: Box::new(value),
                    span,
                }))
            }
            _ => {
                let resume = self.current;
                self.current = equals_index;
                self.error_at_current(
                    error_codes::INVALID_ASSIGNMENT_TARGET,
                    "Invalid assignment target",
                );
                self.current = resume;
                Err(())
            }
        }
    }

    /// Parse `or` / `||`
    fn parse_or(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_and()?;

        while let Some(line) = self.match_logical(TokenKind::Or, TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = logical(LogicalOp::Or, left, right, line);
        }

        Ok(left)
    }

    /// Parse `and` / `&&`
    fn parse_and(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_equality()?;

        while let Some(line) = self.match_logical(TokenKind::And, TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = logical(LogicalOp::And, left, right, line);
        }

        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_comparison()?;

        while let Some((op, line)) = self.match_binary(&[
            (TokenKind::BangEqual, BinaryOp::Ne),
            (TokenKind::EqualEqual, BinaryOp::Eq),
        ]) {
            let right = self.parse_comparison()?;
            left = binary(op, left, right, line);
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_term()?;

        while let Some((op, line)) = self.match_binary(&[
            (TokenKind::Greater, BinaryOp::Gt),
            (TokenKind::GreaterEqual, BinaryOp::Ge),
            (TokenKind::Less, BinaryOp::Lt),
            (TokenKind::LessEqual, BinaryOp::Le),
        ]) {
            let right = self.parse_term()?;
            left = binary(op, left, right, line);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_factor()?;

        while let Some((op, line)) = self.match_binary(&[
            (TokenKind::Minus, BinaryOp::Sub),
            (TokenKind::Plus, BinaryOp::Add),
        ]) {
            let right = self.parse_factor()?;
            left = binary(op, left, right, line);
        }

        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, ()> {
        let mut left = self.parse_unary()?;

        while let Some((op, line)) = self.match_binary(&[
            (TokenKind::Slash, BinaryOp::Div),
            (TokenKind::Star, BinaryOp::Mul),
        ]) {
            let right = self.parse_unary()?;
            left = binary(op, left, right, line);
        }

        Ok(left)
    }

    /// Parse prefix `!` and `-`
    fn parse_unary(&mut self) -> Result<Expr, ()> {
        let op = match self.peek().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Negate,
            _ => return self.parse_primary(),
        };

        let op_token = self.advance();
        let (line, op_span) = (op_token.line, op_token.span);
        let operand = self.parse_unary()?;
        let span = op_span.merge(operand.span());

        Ok(Expr::Unary(UnaryExpr {
            op,
            expr: Box::new(operand),
            line,
            span,
        }))
    }

    fn parse_primary(&mut self) -> Result<Expr, ()> {
        match self.peek().kind {
            TokenKind::Number => {
                let token = self.advance();
                let (literal, span) = (token.literal.clone(), token.span);
                match literal {
                    Some(TokenLiteral::Number(n)) => Ok(Expr::Literal(Literal::Number(n), span)),
                    _ => {
                        self.error("Malformed number literal");
                        Err(())
                    }
                }
            }
            TokenKind::String => {
                let token = self.advance();
                let (literal, span) = (token.literal.clone(), token.span);
                match literal {
                    Some(TokenLiteral::String(s)) => Ok(Expr::Literal(Literal::String(s), span)),
                    _ => {
                        self.error("Malformed string literal");
                        Err(())
                    }
                }
            }
            TokenKind::True | TokenKind::False => {
                let token = self.advance();
                let value = token.kind == TokenKind::True;
                Ok(Expr::Literal(Literal::Bool(value), token.span))
            }
            TokenKind::Nil => {
                let span = self.advance().span;
                Ok(Expr::Literal(Literal::Nil, span))
            }
            TokenKind::Identifier => {
                let token = self.advance();
                Ok(Expr::Variable(Identifier {
                    name: token.lexeme.clone(),
                    line: token.line,
                    span: token.span,
                }))
            }
            TokenKind::LeftParen => {
                let open_span = self.advance().span;
                let inner = self.parse_expression()?;
                let close_span = self
                    .consume(TokenKind::RightParen, "Expected ')' after expression")?
                    .span;
                Ok(Expr::Grouping(GroupExpr {
                    expr: Box::new(inner),
                    span: open_span.merge(close_span),
                }))
            }
            _ => {
                self.error("Expected expression");
                Err(())
            }
        }
    }

    // === Operator matching ===

    /// Consume a binary operator from `table`, returning it with its line
    fn match_binary(&mut self, table: &[(TokenKind, BinaryOp)]) -> Option<(BinaryOp, u32)> {
        let kind = self.peek().kind;
        let op = table
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, op)| *op)?;
        let line = self.advance().line;
        Some((op, line))
    }

    /// Consume either spelling of a logical operator, returning its line
    fn match_logical(&mut self, word: TokenKind, symbol: TokenKind) -> Option<u32> {
        if self.check(word) || self.check(symbol) {
            Some(self.advance().line)
        } else {
            None
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr, line: u32) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        line,
        span,
    })
}

fn logical(op: LogicalOp, left: Expr, right: Expr, line: u32) -> Expr {
    let span = left.span().merge(right.span());
    Expr::Logical(LogicalExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
        line,
        span,
    })
}
