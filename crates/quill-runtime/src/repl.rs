//! REPL core logic (UI-agnostic)

use crate::ast::Stmt;
use crate::diagnostic::Diagnostic;
use crate::interpreter::Interpreter;
use crate::output::CaptureSink;
use crate::runtime::{compile_interactive, runtime_error_to_diagnostic};
use crate::value::Value;

const REPL_NAME: &str = "<repl>";

/// REPL result type
#[derive(Debug, Clone, PartialEq)]
pub struct ReplResult {
    /// Value of the last expression statement (None for other statements or on error)
    pub value: Option<Value>,
    /// Diagnostics from all phases
    pub diagnostics: Vec<Diagnostic>,
    /// Output printed while evaluating this line, one `\n`-terminated line per print
    pub stdout: String,
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - Global variables persist
/// - Errors do not reset state
pub struct ReplCore {
    interpreter: Interpreter,
    capture: CaptureSink,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        let capture = CaptureSink::new();
        Self {
            interpreter: Interpreter::with_output(Box::new(capture.clone())),
            capture,
        }
    }

    /// Evaluate a line of input
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        let program = match compile_interactive(input, REPL_NAME) {
            Ok(program) => program,
            Err(diagnostics) => {
                return ReplResult {
                    value: None,
                    diagnostics,
                    stdout: String::new(),
                }
            }
        };

        let has_expression = program
            .statements
            .iter()
            .any(|stmt| matches!(stmt, Stmt::Expr(_)));

        let (value, diagnostics) = match self.interpreter.eval(&program) {
            Ok(value) if has_expression => (Some(value), Vec::new()),
            Ok(_) => (None, Vec::new()),
            Err(error) => (
                None,
                vec![runtime_error_to_diagnostic(&error, input, REPL_NAME)],
            ),
        };

        // Output printed before a runtime error is still reported
        let stdout: String = self
            .capture
            .take()
            .into_iter()
            .map(|line| line + "\n")
            .collect();

        ReplResult {
            value,
            diagnostics,
            stdout,
        }
    }

    /// Reset REPL state, dropping every variable
    pub fn reset(&mut self) {
        self.capture.take();
        self.interpreter = Interpreter::with_output(Box::new(self.capture.clone()));
    }

    /// Sorted names of the global variables
    pub fn globals(&self) -> Vec<String> {
        self.interpreter.environment().global_names()
    }

    /// Number of live scopes (1 between lines)
    pub fn scope_depth(&self) -> usize {
        self.interpreter.environment().depth()
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
