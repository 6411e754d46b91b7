//! Expression evaluation

use crate::ast::*;
use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Evaluate an expression
    pub(super) fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(lit, _) => Ok(eval_literal(lit)),
            Expr::Variable(id) => self.environment.get(&id.name, id.line, id.span),
            Expr::Grouping(group) => self.eval_expr(&group.expr),
            Expr::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                self.environment.assign(
                    &assign.name.name,
                    value.clone(),
                    assign.name.line,
                    assign.name.span,
                )?;
                Ok(value)
            }
            Expr::Unary(unary) => self.eval_unary(unary),
            Expr::Binary(binary) => self.eval_binary(binary),
            Expr::Logical(logical) => self.eval_logical(logical),
        }
    }

    fn eval_unary(&mut self, unary: &UnaryExpr) -> Result<Value, RuntimeError> {
        let operand = self.eval_expr(&unary.expr)?;

        match unary.op {
            UnaryOp::Negate => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(RuntimeError::TypeError {
                    msg: format!(
                        "Operand of unary '-' must be a number, found {}",
                        other.type_name()
                    ),
                    line: unary.line,
                    span: unary.span,
                }),
            },
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        }
    }

    /// Short-circuit `and` / `or`, yielding the deciding operand
    fn eval_logical(&mut self, logical: &LogicalExpr) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(&logical.left)?;

        let decided = match logical.op {
            LogicalOp::Or => left.is_truthy(),
            LogicalOp::And => !left.is_truthy(),
        };

        if decided {
            Ok(left)
        } else {
            self.eval_expr(&logical.right)
        }
    }

    fn eval_binary(&mut self, binary: &BinaryExpr) -> Result<Value, RuntimeError> {
        let left = self.eval_expr(&binary.left)?;
        let right = self.eval_expr(&binary.right)?;
        let (line, span) = (binary.line, binary.span);

        match binary.op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
                _ => Err(operand_error(
                    "Operands of '+' must be two numbers or two strings",
                    &left,
                    &right,
                    line,
                    span,
                )),
            },
            BinaryOp::Sub => numeric_op(binary.op, &left, &right, line, span, |a, b| a - b),
            BinaryOp::Mul => numeric_op(binary.op, &left, &right, line, span, |a, b| a * b),
            BinaryOp::Div => {
                let (a, b) = numbers(binary.op, &left, &right, line, span)?;
                if b == 0.0 {
                    return Err(RuntimeError::DivideByZero { line, span });
                }
                Ok(Value::Number(a / b))
            }
            BinaryOp::Lt => compare_op(binary.op, &left, &right, line, span, |a, b| a < b),
            BinaryOp::Le => compare_op(binary.op, &left, &right, line, span, |a, b| a <= b),
            BinaryOp::Gt => compare_op(binary.op, &left, &right, line, span, |a, b| a > b),
            BinaryOp::Ge => compare_op(binary.op, &left, &right, line, span, |a, b| a >= b),
            BinaryOp::Eq => Ok(Value::Bool(left == right)),
            BinaryOp::Ne => Ok(Value::Bool(left != right)),
        }
    }
}

/// Evaluate a literal
fn eval_literal(lit: &Literal) -> Value {
    match lit {
        Literal::Number(n) => Value::Number(*n),
        Literal::String(s) => Value::string(s.clone()),
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Nil => Value::Nil,
    }
}

/// Extract two number operands or fail with a type error naming `op`
fn numbers(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    line: u32,
    span: Span,
) -> Result<(f64, f64), RuntimeError> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(operand_error(
            &format!("Operands of '{}' must be numbers", op.as_str()),
            left,
            right,
            line,
            span,
        )),
    }
}

fn numeric_op(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    line: u32,
    span: Span,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    let (a, b) = numbers(op, left, right, line, span)?;
    Ok(Value::Number(f(a, b)))
}

fn compare_op(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    line: u32,
    span: Span,
    f: impl Fn(f64, f64) -> bool,
) -> Result<Value, RuntimeError> {
    let (a, b) = numbers(op, left, right, line, span)?;
    Ok(Value::Bool(f(a, b)))
}

fn operand_error(message: &str, left: &Value, right: &Value, line: u32, span: Span) -> RuntimeError {
    RuntimeError::TypeError {
        msg: format!(
            "{}, found {} and {}",
            message,
            left.type_name(),
            right.type_name()
        ),
        line,
        span,
    }
}
