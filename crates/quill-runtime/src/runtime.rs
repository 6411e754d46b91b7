//! Quill runtime API for embedding

use crate::ast::Program;
use crate::diagnostic::{sort_diagnostics, source_line, Diagnostic};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::output::OutputSink;
use crate::parser::Parser;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::path::Path;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// File name used in diagnostics for source that did not come from a file
pub const INPUT_NAME: &str = "<input>";

/// Quill runtime instance
///
/// Globals persist across calls to [`Quill::eval`] on the same instance.
///
/// # Examples
///
/// ```
/// use quill_runtime::{Quill, Value};
///
/// let runtime = Quill::new();
/// runtime.eval("var x = 40;").unwrap();
/// assert_eq!(runtime.eval("x + 2"), Ok(Value::Number(42.0)));
/// ```
pub struct Quill {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
}

impl Quill {
    /// Create a runtime that prints to stdout
    pub fn new() -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::new()),
        }
    }

    /// Create a runtime that prints to the given sink
    pub fn with_output(output: Box<dyn OutputSink>) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::with_output(output)),
        }
    }

    /// Evaluate Quill source code
    ///
    /// A trailing expression may omit its `;`, so `1 + 2` evaluates to `3`.
    /// Returns the value of the last top-level expression statement (`nil`
    /// if there is none), or every scan and syntax error, or the first
    /// runtime error.
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        let program = compile_interactive(source, INPUT_NAME)?;
        self.run(&program, source, INPUT_NAME)
    }

    /// Evaluate a Quill source file
    pub fn eval_file(&self, path: impl AsRef<Path>) -> RuntimeResult<Value> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            vec![Diagnostic::error(
                format!("Failed to read file '{}': {}", path.display(), e),
                Span::dummy(),
            )
            .with_file(path.display().to_string())]
        })?;
        self.eval_named(&source, &path.display().to_string())
    }

    /// Evaluate a whole program, naming `file` in any diagnostics
    ///
    /// Every statement must be terminated, exactly as [`compile`] requires.
    pub fn eval_named(&self, source: &str, file: &str) -> RuntimeResult<Value> {
        let program = compile(source, file)?;
        self.run(&program, source, file)
    }

    fn run(&self, program: &Program, source: &str, file: &str) -> RuntimeResult<Value> {
        let mut interpreter = self.interpreter.borrow_mut();
        interpreter
            .eval(program)
            .map_err(|error| vec![runtime_error_to_diagnostic(&error, source, file)])
    }

    /// Define a global variable visible to later evaluations
    pub fn define_global(&self, name: impl Into<String>, value: Value) {
        self.interpreter.borrow_mut().define_global(name, value);
    }

    /// Number of live scopes in the interpreter (1 between runs)
    pub fn scope_depth(&self) -> usize {
        self.interpreter.borrow().environment().depth()
    }
}

impl Default for Quill {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan and parse source without running it
///
/// All scan and syntax errors are returned together, sorted by position.
pub fn compile(source: &str, file: &str) -> RuntimeResult<Program> {
    compile_tokens(source, file, false)
}

/// Like [`compile`], but a trailing expression may omit its `;`
pub(crate) fn compile_interactive(source: &str, file: &str) -> RuntimeResult<Program> {
    compile_tokens(source, file, true)
}

fn compile_tokens(source: &str, file: &str, terminate: bool) -> RuntimeResult<Program> {
    let mut lexer = Lexer::new(source);
    let (mut tokens, mut diagnostics) = lexer.tokenize();
    if terminate {
        terminate_trailing_expression(&mut tokens);
    }

    let mut parser = Parser::new(tokens);
    let (program, parse_diagnostics) = parser.parse();
    diagnostics.extend(parse_diagnostics);

    if diagnostics.is_empty() {
        return Ok(program);
    }

    let mut diagnostics: Vec<Diagnostic> = diagnostics
        .into_iter()
        .map(|diagnostic| attach_source(diagnostic, source, file))
        .collect();
    sort_diagnostics(&mut diagnostics);
    log::debug!("compilation of {} failed with {} errors", file, diagnostics.len());
    Err(diagnostics)
}

/// Insert a `;` before `Eof` when the last real token is not `;` or `}`
///
/// Comments never produce tokens, so a trailing comment leaves the input
/// unchanged and comment-only input stays empty.
fn terminate_trailing_expression(tokens: &mut Vec<Token>) {
    let Some(last) = tokens
        .iter()
        .rev()
        .find(|t| !matches!(t.kind, TokenKind::Eof | TokenKind::Error))
    else {
        return;
    };
    if matches!(last.kind, TokenKind::Semicolon | TokenKind::RightBrace) {
        return;
    }

    let end = last.span.end;
    let column = last.column + last.lexeme.chars().count() as u32;
    let terminator =
        Token::new(TokenKind::Semicolon, ";", last.line, Span::new(end, end)).with_column(column);

    let eof = tokens
        .iter()
        .rposition(|t| t.kind == TokenKind::Eof)
        .unwrap_or(tokens.len());
    tokens.insert(eof, terminator);
}

fn attach_source(diagnostic: Diagnostic, source: &str, file: &str) -> Diagnostic {
    let diagnostic = diagnostic.with_file(file);
    if diagnostic.snippet.is_empty() {
        let snippet = source_line(source, diagnostic.line);
        diagnostic.with_snippet(snippet)
    } else {
        diagnostic
    }
}

/// Convert a RuntimeError to a Diagnostic located in `source`
pub(crate) fn runtime_error_to_diagnostic(
    error: &RuntimeError,
    source: &str,
    file: &str,
) -> Diagnostic {
    let column = column_at(source, error.span().start);
    let diagnostic = error.to_diagnostic().with_column(column);
    attach_source(diagnostic, source, file)
}

/// 1-based column of a character offset
fn column_at(source: &str, offset: usize) -> usize {
    let prefix: Vec<char> = source.chars().take(offset).collect();
    prefix.iter().rev().take_while(|c| **c != '\n').count() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticLevel;
    use crate::output::CaptureSink;

    #[test]
    fn test_eval_expression_without_semicolon() {
        let runtime = Quill::new();
        assert_eq!(runtime.eval("1 + 2"), Ok(Value::Number(3.0)));
    }

    #[test]
    fn test_trailing_comment_does_not_swallow_terminator() {
        let runtime = Quill::new();
        assert_eq!(runtime.eval("4 // four"), Ok(Value::Number(4.0)));
    }

    #[test]
    fn test_trailing_comment_after_statement() {
        let capture = CaptureSink::new();
        let runtime = Quill::with_output(Box::new(capture.clone()));
        assert_eq!(runtime.eval("print 1; // done"), Ok(Value::Nil));
        assert_eq!(capture.lines(), vec!["1"]);
    }

    #[test]
    fn test_comment_only_source_is_empty() {
        let runtime = Quill::new();
        assert_eq!(runtime.eval("// only a comment"), Ok(Value::Nil));
        assert_eq!(runtime.eval("\n  // one\n// two\n"), Ok(Value::Nil));
    }

    #[test]
    fn test_compile_accepts_trailing_comment_line() {
        let program = compile("var x = 1;\n// trailing comment\n", INPUT_NAME).unwrap();
        assert_eq!(program.statements.len(), 1);
        assert!(compile("// nothing here", INPUT_NAME).unwrap().statements.is_empty());
    }

    #[test]
    fn test_compile_requires_final_semicolon() {
        let diagnostics = compile("print 1;\nprint 2\n", INPUT_NAME).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Expected ';' after value");
        assert_eq!(diagnostics[0].line, 2);
    }

    #[test]
    fn test_eval_named_requires_final_semicolon() {
        let runtime = Quill::new();
        let diagnostics = runtime.eval_named("1 + 2", "main.ql").unwrap_err();
        assert_eq!(diagnostics[0].code, "AT1000");
        assert_eq!(diagnostics[0].file, "main.ql");
    }

    #[test]
    fn test_inserted_terminator_sits_after_last_token() {
        let mut lexer = Lexer::new("a + b // tail");
        let (mut tokens, _) = lexer.tokenize();
        terminate_trailing_expression(&mut tokens);

        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Plus,
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[3].span, Span::new(5, 5));
        assert_eq!(tokens[3].column, 6);
    }

    #[test]
    fn test_globals_persist_between_evals() {
        let runtime = Quill::new();
        runtime.eval("var counter = 1;").unwrap();
        runtime.eval("counter = counter + 1;").unwrap();
        assert_eq!(runtime.eval("counter"), Ok(Value::Number(2.0)));
    }

    #[test]
    fn test_scan_and_syntax_errors_reported_together() {
        let runtime = Quill::new();
        let diagnostics = runtime.eval("var a = @;\nprint ;").unwrap_err();
        let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["AT1001", "AT1000", "AT1000"]);
        assert!(diagnostics.iter().all(|d| d.level == DiagnosticLevel::Error));
    }

    #[test]
    fn test_errors_prevent_evaluation() {
        let capture = CaptureSink::new();
        let runtime = Quill::with_output(Box::new(capture.clone()));
        assert!(runtime.eval("print 1;\nprint 2").is_ok());
        capture.take();
        assert!(runtime.eval("print 1;\nprint (;").is_err());
        assert!(capture.lines().is_empty());
    }

    #[test]
    fn test_runtime_error_has_location() {
        let runtime = Quill::new();
        let diagnostics = runtime.eval("var a = 1;\nprint a + b;").unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "AT0002");
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].column, 11);
        assert_eq!(diagnostics[0].snippet, "print a + b;");
        assert_eq!(diagnostics[0].file, INPUT_NAME);
    }

    #[test]
    fn test_eval_file_missing() {
        let runtime = Quill::new();
        let diagnostics = runtime.eval_file("/definitely/not/here.ql").unwrap_err();
        assert!(diagnostics[0].message.starts_with("Failed to read file"));
    }

    #[test]
    fn test_compile_without_running() {
        let program = compile("print 1; print 2;", INPUT_NAME).unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_column_at() {
        assert_eq!(column_at("abc", 0), 1);
        assert_eq!(column_at("abc", 2), 3);
        assert_eq!(column_at("ab\ncd", 4), 2);
    }
}
