//! Runtime value representation
//!
//! Values are plain data copied on assignment. Runtime errors carry the line
//! of the token that raised them.

use crate::diagnostic::{error_codes, Diagnostic};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime value type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    /// String value
    String(String),
    /// Boolean value
    Bool(bool),
    /// Nil value
    Nil,
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// `nil` and `false` are falsy, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
        }
    }

    /// Text written by `print`
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Nil => "nil".to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

/// Format a number, dropping the fractional part when it is integral
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Runtime error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    /// Operand of the wrong type for an operator
    #[error("{msg}")]
    TypeError { msg: String, line: u32, span: Span },
    /// Read or assignment of a name with no binding
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, line: u32, span: Span },
    /// Division by zero
    #[error("Division by zero")]
    DivideByZero { line: u32, span: Span },
}

impl RuntimeError {
    /// Line of the token that raised the error
    pub fn line(&self) -> u32 {
        match self {
            RuntimeError::TypeError { line, .. } => *line,
            RuntimeError::UndefinedVariable { line, .. } => *line,
            RuntimeError::DivideByZero { line, .. } => *line,
        }
    }

    /// Get the span associated with this error
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::TypeError { span, .. } => *span,
            RuntimeError::UndefinedVariable { span, .. } => *span,
            RuntimeError::DivideByZero { span, .. } => *span,
        }
    }

    /// Diagnostic code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::TypeError { .. } => error_codes::TYPE_MISMATCH,
            RuntimeError::UndefinedVariable { .. } => error_codes::UNDEFINED_VARIABLE,
            RuntimeError::DivideByZero { .. } => error_codes::DIVIDE_BY_ZERO,
        }
    }

    /// Convert into a diagnostic; the caller attaches column and snippet
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error_with_code(self.code(), self.to_string(), self.span())
            .with_line(self.line() as usize)
            .with_label("runtime error");

        match self {
            RuntimeError::UndefinedVariable { name, .. } => {
                diagnostic.with_help(format!("declare '{}' with 'var' before using it", name))
            }
            RuntimeError::DivideByZero { .. } => {
                diagnostic.with_help("check that the divisor is not zero")
            }
            RuntimeError::TypeError { .. } => diagnostic,
        }
    }
}
