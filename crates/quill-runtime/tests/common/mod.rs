//! Shared test utilities
//!
//! Helpers for running Quill source in tests with less boilerplate.

#![allow(dead_code)]

use quill_runtime::ast::Program;
use quill_runtime::{CaptureSink, Diagnostic, Lexer, Parser, Quill, Value};

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Assert that source code evaluates to a number
///
/// # Example
/// ```
/// assert_eval_number("1 + 2", 3.0);
/// ```
pub fn assert_eval_number(source: &str, expected: f64) {
    let runtime = Quill::new();
    match runtime.eval(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "Expected {}, got {}", expected, n),
        other => panic!("Expected Number({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    let runtime = Quill::new();
    match runtime.eval(source) {
        Ok(Value::String(s)) => assert_eq!(s, expected),
        other => panic!("Expected String({:?}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    let runtime = Quill::new();
    match runtime.eval(source) {
        Ok(Value::Bool(b)) => assert_eq!(b, expected),
        other => panic!("Expected Bool({}), got {:?}", expected, other),
    }
}

/// Assert that source code evaluates to nil
pub fn assert_eval_nil(source: &str) {
    let runtime = Quill::new();
    match runtime.eval(source) {
        Ok(Value::Nil) => {}
        other => panic!("Expected Nil, got {:?}", other),
    }
}

/// Assert that source code produces an error whose first diagnostic has a specific code
///
/// # Example
/// ```
/// assert_error_code("5 / 0", "AT0005");
/// ```
pub fn assert_error_code(source: &str, expected_code: &str) {
    let runtime = Quill::new();
    match runtime.eval(source) {
        Err(diags) => {
            assert!(!diags.is_empty(), "Expected error, got success");
            assert_eq!(
                diags[0].code, expected_code,
                "Expected error code {}, got {}",
                expected_code, diags[0].code
            );
        }
        Ok(val) => panic!("Expected error {}, got success: {:?}", expected_code, val),
    }
}

/// Assert that source code evaluates successfully (no errors)
pub fn assert_no_error(source: &str) {
    let runtime = Quill::new();
    if let Err(diags) = runtime.eval(source) {
        panic!("Expected success, got errors: {:?}", diags);
    }
}

/// Run source, returning the result and every printed line
pub fn run_capture(source: &str) -> (Result<Value, Vec<Diagnostic>>, Vec<String>) {
    let capture = CaptureSink::new();
    let runtime = Quill::with_output(Box::new(capture.clone()));
    let result = runtime.eval(source);
    (result, capture.lines())
}

/// Run source that must succeed, returning its printed lines
pub fn output_of(source: &str) -> Vec<String> {
    match run_capture(source) {
        (Ok(_), lines) => lines,
        (Err(diags), _) => panic!("Expected success, got errors: {:?}", diags),
    }
}

/// Scan and parse source, returning the program and all front-end diagnostics
pub fn parse_source(source: &str) -> (Program, Vec<Diagnostic>) {
    let mut lexer = Lexer::new(source);
    let (tokens, mut diagnostics) = lexer.tokenize();

    let mut parser = Parser::new(tokens);
    let (program, parse_diags) = parser.parse();
    diagnostics.extend(parse_diags);
    (program, diagnostics)
}

/// Parse source that must be valid and print each statement in prefix form
pub fn printed_ast(source: &str) -> String {
    let (program, diagnostics) = parse_source(source);
    assert!(
        diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        diagnostics
    );
    program.to_string()
}
