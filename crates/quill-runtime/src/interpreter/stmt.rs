//! Statement execution

use crate::ast::*;
use crate::interpreter::Interpreter;
use crate::value::{RuntimeError, Value};

impl Interpreter {
    /// Execute a statement
    ///
    /// Expression statements yield their value; every other statement
    /// yields `nil`.
    pub(super) fn eval_statement(&mut self, stmt: &Stmt) -> Result<Value, RuntimeError> {
        match stmt {
            Stmt::Expr(expr_stmt) => self.eval_expr(&expr_stmt.expr),
            Stmt::Print(print) => {
                let value = self.eval_expr(&print.expr)?;
                self.output.print(&value.to_display_string());
                Ok(Value::Nil)
            }
            Stmt::VarDecl(var) => self.eval_var_decl(var),
            Stmt::Block(block) => {
                self.execute_block(&block.statements)?;
                Ok(Value::Nil)
            }
            Stmt::If(if_stmt) => self.eval_if(if_stmt),
            Stmt::While(while_stmt) => self.eval_while(while_stmt),
        }
    }

    /// Evaluate a variable declaration into the innermost scope
    fn eval_var_decl(&mut self, var: &VarDecl) -> Result<Value, RuntimeError> {
        let value = match &var.init {
            Some(init) => self.eval_expr(init)?,
            None => Value::Nil,
        };
        self.environment.define(var.name.name.clone(), value);
        Ok(Value::Nil)
    }

    /// Run statements in a fresh scope
    ///
    /// The scope is popped whether the statements finish or fail.
    pub(super) fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        self.environment.push_scope();
        let result = statements
            .iter()
            .try_for_each(|stmt| self.eval_statement(stmt).map(|_| ()));
        self.environment.pop_scope();
        result
    }

    fn eval_if(&mut self, if_stmt: &IfStmt) -> Result<Value, RuntimeError> {
        let cond = self.eval_expr(&if_stmt.cond)?;

        if cond.is_truthy() {
            self.eval_statement(&if_stmt.then_branch)?;
        } else if let Some(else_branch) = &if_stmt.else_branch {
            self.eval_statement(else_branch)?;
        }

        Ok(Value::Nil)
    }

    fn eval_while(&mut self, while_stmt: &WhileStmt) -> Result<Value, RuntimeError> {
        while self.eval_expr(&while_stmt.cond)?.is_truthy() {
            self.eval_statement(&while_stmt.body)?;
        }

        Ok(Value::Nil)
    }
}
