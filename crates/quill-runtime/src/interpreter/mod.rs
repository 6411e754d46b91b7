//! AST interpreter (tree-walking)
//!
//! Direct AST evaluation over a chained lexical environment. Supports:
//! - Expression evaluation (literals, unary/binary/logical ops, assignment)
//! - Statement execution (declarations, print, blocks, if, while)
//! - Block scoping with shadowing, restored on every exit path

mod expr;
mod stmt;

use crate::ast::{Program, Stmt};
use crate::environment::Environment;
use crate::output::{OutputSink, StdoutSink};
use crate::value::{RuntimeError, Value};

/// Interpreter state
pub struct Interpreter {
    /// Variable scopes, rooted at the globals
    pub(super) environment: Environment,
    /// Destination for `print`
    pub(super) output: Box<dyn OutputSink>,
}

impl Interpreter {
    /// Create a new interpreter printing to stdout
    pub fn new() -> Self {
        Self::with_output(Box::new(StdoutSink))
    }

    /// Create a new interpreter printing to the given sink
    pub fn with_output(output: Box<dyn OutputSink>) -> Self {
        Self {
            environment: Environment::new(),
            output,
        }
    }

    /// Execute a program, stopping at the first runtime error
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.eval(program).map(|_| ())
    }

    /// Execute a program and return the value of its last top-level
    /// expression statement (`nil` if there is none)
    pub fn eval(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        let mut last_value = Value::Nil;

        for stmt in &program.statements {
            let value = self.eval_statement(stmt)?;
            if let Stmt::Expr(_) = stmt {
                last_value = value;
            }
        }

        Ok(last_value)
    }

    /// Define a global variable (for testing/REPL)
    pub fn define_global(&mut self, name: impl Into<String>, value: Value) {
        // Globals live in the outermost scope, which is current between runs
        self.environment.define(name, value);
    }

    /// Read-only access to the variable scopes
    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
