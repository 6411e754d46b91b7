//! Quill Runtime - Core language implementation
//!
//! This library provides the complete Quill pipeline:
//! - Lexical analysis and recursive-descent parsing
//! - A tree-walking interpreter over chained lexical scopes
//! - Structured diagnostics for scan, syntax and runtime errors

/// Quill runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod interpreter;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod repl;
pub mod runtime;
pub mod span;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, sort_diagnostics, Diagnostic, DiagnosticLevel, DIAG_VERSION};
pub use environment::Environment;
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use output::{CaptureSink, OutputSink, StdoutSink};
pub use parser::Parser;
pub use repl::{ReplCore, ReplResult};
pub use runtime::{compile, Quill, RuntimeResult, INPUT_NAME};
pub use span::Span;
pub use token::{Token, TokenKind, TokenLiteral};
pub use value::{format_number, RuntimeError, Value};
