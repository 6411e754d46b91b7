//! Check command - scan and parse Quill source files without executing

use anyhow::{Context, Result};
use std::fs;
use std::io;

use super::write_diagnostics;

/// Check a Quill source file for scan and syntax errors
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    match quill_runtime::compile(&source, file_path) {
        Ok(program) => {
            log::debug!("{}: {} statements", file_path, program.statements.len());
            if json {
                println!("[]");
            } else {
                println!("{}: No errors found", file_path);
            }
            Ok(())
        }
        Err(diagnostics) => {
            if json {
                write_diagnostics(&mut io::stdout().lock(), &diagnostics, true)?;
            } else {
                write_diagnostics(&mut io::stderr().lock(), &diagnostics, false)?;
            }
            Err(anyhow::anyhow!(
                "{} has {} error(s)",
                file_path,
                diagnostics.len()
            ))
        }
    }
}
