//! REPL command implementation
//!
//! Reads one line at a time from stdin; there is no line editing.

use anyhow::Result;
use quill_runtime::{ReplCore, Value};
use std::io::{self, BufRead, IsTerminal, Write};

use super::write_diagnostics;

/// Run the REPL on stdin
///
/// The banner and prompt are only shown when stdin is a terminal.
pub fn run(json: bool) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let stdout = io::stdout();
    let stderr = io::stderr();

    run_session(
        &mut stdin.lock(),
        &mut stdout.lock(),
        &mut stderr.lock(),
        interactive,
        json,
    )
}

/// Drive a REPL session until `:quit` or end of input
pub fn run_session(
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
    interactive: bool,
    json: bool,
) -> Result<()> {
    let mut repl = ReplCore::new();

    if interactive {
        writeln!(out, "Quill v{} REPL", quill_runtime::VERSION)?;
        writeln!(out, "Type statements or expressions, :help for commands, :quit to exit")?;
    }

    let mut line = String::new();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim();
        match trimmed {
            "" => continue,
            ":quit" | ":q" => break,
            ":reset" => {
                repl.reset();
                writeln!(out, "REPL state reset")?;
                continue;
            }
            ":help" | ":h" => {
                print_help(out)?;
                continue;
            }
            ":vars" | ":v" => {
                for name in repl.globals() {
                    writeln!(out, "{}", name)?;
                }
                continue;
            }
            command if command.starts_with(':') => {
                writeln!(err, "Unknown command '{}', try :help", command)?;
                continue;
            }
            _ => {}
        }

        let result = repl.eval_line(&line);

        out.write_all(result.stdout.as_bytes())?;
        if let Some(value) = &result.value {
            if !matches!(value, Value::Nil) {
                writeln!(out, "{}", value)?;
            }
        }
        if !result.diagnostics.is_empty() {
            write_diagnostics(err, &result.diagnostics, json)?;
        }
        out.flush()?;
    }

    Ok(())
}

fn print_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "Commands:")?;
    writeln!(out, "  :help, :h     Show this help")?;
    writeln!(out, "  :quit, :q     Exit the REPL")?;
    writeln!(out, "  :reset        Forget all variables")?;
    writeln!(out, "  :vars, :v     List global variables")
}
