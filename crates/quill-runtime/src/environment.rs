//! Lexical environment
//!
//! Scopes live in an arena rooted at the global scope (index 0). Each scope
//! points at its enclosing scope by index, so lookups walk outward without
//! copying bindings.

use crate::span::Span;
use crate::value::{RuntimeError, Value};
use std::collections::HashMap;

/// Index of a scope in the arena
pub type ScopeId = usize;

/// Index of the global scope
pub const GLOBAL_SCOPE: ScopeId = 0;

#[derive(Debug, Clone, Default)]
struct Scope {
    values: HashMap<String, Value>,
    enclosing: Option<ScopeId>,
}

/// Chain of lexical scopes mapping names to values
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Environment {
    /// Create an environment holding only the global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            current: GLOBAL_SCOPE,
        }
    }

    /// Enter a new innermost scope
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope {
            values: HashMap::new(),
            enclosing: Some(self.current),
        });
        self.current = self.scopes.len() - 1;
        log::debug!("entered scope, depth {}", self.depth());
    }

    /// Leave the innermost scope, dropping its bindings
    ///
    /// The global scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.current == GLOBAL_SCOPE {
            return;
        }
        if let Some(scope) = self.scopes.pop() {
            self.current = scope.enclosing.unwrap_or(GLOBAL_SCOPE);
        }
        log::debug!("left scope, depth {}", self.depth());
    }

    /// Number of live scopes (1 = global only)
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut id = self.current;
        while let Some(parent) = self.scopes[id].enclosing {
            depth += 1;
            id = parent;
        }
        depth
    }

    /// Bind `name` in the innermost scope, overwriting only there
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.scopes[self.current].values.insert(name.into(), value);
    }

    /// Look up `name` from the innermost scope outward
    pub fn get(&self, name: &str, line: u32, span: Span) -> Result<Value, RuntimeError> {
        let mut id = Some(self.current);
        while let Some(current) = id {
            let scope = &self.scopes[current];
            if let Some(value) = scope.values.get(name) {
                return Ok(value.clone());
            }
            id = scope.enclosing;
        }

        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            line,
            span,
        })
    }

    /// Update the nearest existing binding of `name`
    ///
    /// Never creates a binding: assigning an undeclared name is an error.
    pub fn assign(
        &mut self,
        name: &str,
        value: Value,
        line: u32,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let mut id = Some(self.current);
        while let Some(current) = id {
            let scope = &mut self.scopes[current];
            if let Some(slot) = scope.values.get_mut(name) {
                *slot = value;
                return Ok(());
            }
            id = scope.enclosing;
        }

        Err(RuntimeError::UndefinedVariable {
            name: name.to_string(),
            line,
            span,
        })
    }

    /// Names bound in the global scope, sorted
    pub fn global_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scopes[GLOBAL_SCOPE].values.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(env: &Environment, name: &str) -> Result<Value, RuntimeError> {
        env.get(name, 1, Span::dummy())
    }

    #[test]
    fn test_define_and_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        assert_eq!(get(&env, "x"), Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_undefined_variable() {
        let env = Environment::new();
        let err = get(&env, "missing").unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { ref name, .. } if name == "missing"));
    }

    #[test]
    fn test_lookup_walks_outward() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.push_scope();
        assert_eq!(get(&env, "x"), Ok(Value::Number(1.0)));
        assert_eq!(env.depth(), 3);
    }

    #[test]
    fn test_shadowing_restored_on_pop() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.define("x", Value::Number(2.0));
        assert_eq!(get(&env, "x"), Ok(Value::Number(2.0)));
        env.pop_scope();
        assert_eq!(get(&env, "x"), Ok(Value::Number(1.0)));
    }

    #[test]
    fn test_assign_updates_nearest_binding() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.push_scope();
        env.assign("x", Value::Number(5.0), 1, Span::dummy()).unwrap();
        env.pop_scope();
        assert_eq!(get(&env, "x"), Ok(Value::Number(5.0)));
    }

    #[test]
    fn test_assign_never_creates_binding() {
        let mut env = Environment::new();
        env.push_scope();
        assert!(env.assign("y", Value::Nil, 3, Span::dummy()).is_err());
        env.pop_scope();
        assert!(get(&env, "y").is_err());
    }

    #[test]
    fn test_block_local_dropped_on_pop() {
        let mut env = Environment::new();
        env.push_scope();
        env.define("inner", Value::Bool(true));
        env.pop_scope();
        assert!(get(&env, "inner").is_err());
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut env = Environment::new();
        env.define("g", Value::Nil);
        env.pop_scope();
        assert_eq!(env.depth(), 1);
        assert_eq!(env.global_names(), vec!["g".to_string()]);
    }
}
