//! Run command - execute Quill source files

use anyhow::{Context, Result};
use quill_runtime::Quill;
use std::fs;
use std::io;

use super::write_diagnostics;

/// Run a Quill source file
///
/// `print` output goes to stdout. Diagnostics go to stderr, or to stdout as
/// JSON when `json` is set.
pub fn run(file_path: &str, json: bool) -> Result<()> {
    let source = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read source file: {}", file_path))?;

    log::debug!("running {} ({} bytes)", file_path, source.len());

    let runtime = Quill::new();
    match runtime.eval_named(&source, file_path) {
        Ok(_) => Ok(()),
        Err(diagnostics) => {
            if json {
                write_diagnostics(&mut io::stdout().lock(), &diagnostics, true)?;
            } else {
                write_diagnostics(&mut io::stderr().lock(), &diagnostics, false)?;
            }
            Err(anyhow::anyhow!(
                "{} failed with {} error(s)",
                file_path,
                diagnostics.len()
            ))
        }
    }
}
