pub mod ast;
pub mod check;
pub mod repl;
pub mod run;

use quill_runtime::Diagnostic;
use std::io::Write;

/// Write diagnostics in human (caret) or JSON form
///
/// JSON output is a single array so tools can parse it in one read.
pub fn write_diagnostics(
    out: &mut dyn Write,
    diagnostics: &[Diagnostic],
    json: bool,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(diagnostics)?)?;
    } else {
        for diag in diagnostics {
            write!(out, "{}", diag.to_human_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_runtime::Span;

    #[test]
    fn test_json_diagnostics_are_an_array() {
        let diag = Diagnostic::error_with_code("AT0005", "Division by zero", Span::new(0, 1));
        let mut out = Vec::new();
        write_diagnostics(&mut out, &[diag], true).unwrap();

        let parsed: Vec<Diagnostic> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].code, "AT0005");
    }

    #[test]
    fn test_human_diagnostics_use_caret_format() {
        let diag = Diagnostic::error_with_code("AT0002", "Undefined variable 'x'", Span::new(6, 7))
            .with_line(1)
            .with_column(7)
            .with_snippet("print x;");
        let mut out = Vec::new();
        write_diagnostics(&mut out, &[diag], false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("error[AT0002]: Undefined variable 'x'"));
        assert!(text.contains("      ^"));
    }
}
