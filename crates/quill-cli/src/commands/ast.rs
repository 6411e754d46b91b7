//! AST dump command - output AST as JSON

use anyhow::{Context, Result};
use quill_runtime::VersionedProgram;
use std::fs;
use std::io;

use super::write_diagnostics;

/// Dump the AST of a source file to stdout as JSON
///
/// Diagnostics are printed as JSON to stderr when the file does not parse.
pub fn run(file_path: &str) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    match quill_runtime::compile(&source, file_path) {
        Ok(program) => {
            let json = VersionedProgram::new(program).to_json()?;
            println!("{}", json);
            Ok(())
        }
        Err(diagnostics) => {
            write_diagnostics(&mut io::stderr().lock(), &diagnostics, true)?;
            Err(anyhow::anyhow!("Parse errors in {}", file_path))
        }
    }
}
