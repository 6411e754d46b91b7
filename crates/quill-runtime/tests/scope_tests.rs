//! Scoping tests: shadowing, assignment through scopes and cleanup on errors

mod common;

use common::*;
use common::assert_eq;
use quill_runtime::{error_codes, CaptureSink, Quill, Value};

#[test]
fn test_inner_shadow_leaves_outer_binding() {
    let lines = output_of("{ var x = 1; { var x = 2; print x; } print x; }");
    assert_eq!(lines, vec!["2", "1"]);
}

#[test]
fn test_shadowing_global_is_restored() {
    let lines = output_of("var x = \"global\"; { var x = \"local\"; print x; } print x;");
    assert_eq!(lines, vec!["local", "global"]);
}

#[test]
fn test_assignment_reaches_enclosing_scope() {
    let lines = output_of("var x = 1; { { x = 2; } } print x;");
    assert_eq!(lines, vec!["2"]);
}

#[test]
fn test_assignment_targets_nearest_shadow() {
    let lines = output_of("var x = 1; { var x = 2; x = 3; print x; } print x;");
    assert_eq!(lines, vec!["3", "1"]);
}

#[test]
fn test_block_locals_are_not_visible_after_block() {
    assert_error_code("{ var inner = 1; } print inner;", error_codes::UNDEFINED_VARIABLE);
}

#[test]
fn test_redeclaration_overwrites_in_same_scope() {
    assert_eval_number("var a = 1; var a = a + 1; a", 2.0);
}

#[test]
fn test_initializer_sees_outer_binding() {
    let lines = output_of("var a = 1; { var a = a + 10; print a; } print a;");
    assert_eq!(lines, vec!["11", "1"]);
}

#[test]
fn test_assignment_in_block_does_not_create_global() {
    let runtime = Quill::new();
    assert!(runtime.eval("{ fresh = 1; }").is_err());
    assert!(runtime.eval("fresh").is_err());
}

#[test]
fn test_loop_body_scope_is_fresh_each_iteration() {
    let lines = output_of(
        "var i = 0; while (i < 2) { var seen; print seen; seen = i; i = i + 1; }",
    );
    assert_eq!(lines, vec!["nil", "nil"]);
}

#[test]
fn test_for_variable_is_scoped_to_loop() {
    assert_error_code(
        "for (var k = 0; k < 1; k = k + 1) {} print k;",
        error_codes::UNDEFINED_VARIABLE,
    );
}

#[test]
fn test_error_inside_nested_blocks_restores_depth() {
    let capture = CaptureSink::new();
    let runtime = Quill::with_output(Box::new(capture.clone()));
    runtime.eval("var x = 1;").unwrap();

    let result = runtime.eval("{ var x = 2; { var y = 3; print y / 0; } }");
    assert!(result.is_err());
    assert_eq!(runtime.scope_depth(), 1);

    // The shadowing binding from the failed block is gone
    assert_eq!(runtime.eval("x"), Ok(Value::Number(1.0)));
}

#[test]
fn test_error_inside_loop_restores_depth() {
    let runtime = Quill::new();
    let result = runtime.eval("var i = 0; while (true) { i = i + 1; if (i > 2) missing; }");
    assert!(result.is_err());
    assert_eq!(runtime.scope_depth(), 1);
    assert_eq!(runtime.eval("i"), Ok(Value::Number(3.0)));
}
