use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;

/// Quill language interpreter.
///
/// Quill is a small imperative scripting language with numbers, strings,
/// booleans, variables, blocks and loops. This CLI runs, checks and
/// inspects Quill programs.
///
/// EXAMPLES:
///     quill run main.ql           Run a Quill program
///     quill check main.ql         Scan and parse without running
///     quill ast main.ql           Dump the syntax tree as JSON
///     quill repl                  Start interactive REPL
///
/// ENVIRONMENT VARIABLES:
///     QUILL_JSON          Set to 'true' for JSON diagnostics on run and check
///     QUILL_DIAGNOSTICS   Set to 'json' for JSON diagnostics everywhere
///     QUILL_LOG           Log filter, e.g. 'debug' or 'quill_runtime=trace'
///     NO_COLOR            Set to disable colored log output
#[derive(Parser)]
#[command(name = "quill")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Quill source file
    ///
    /// Scans, parses and executes the file. Nothing runs if the file has
    /// scan or syntax errors.
    ///
    /// EXAMPLES:
    ///     quill run main.ql              Run a program
    ///     quill run main.ql --json       Output diagnostics as JSON
    #[command(visible_alias = "r")]
    Run {
        /// Path to the Quill source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "QUILL_JSON")]
        json: bool,
    },

    /// Check a Quill source file without running
    ///
    /// Reports every scan and syntax error in the file.
    ///
    /// EXAMPLES:
    ///     quill check main.ql         Check for errors
    ///     quill check main.ql --json  Output as JSON
    #[command(visible_alias = "c")]
    Check {
        /// Path to the Quill source file
        file: String,
        /// Output diagnostics in JSON format
        #[arg(long, env = "QUILL_JSON")]
        json: bool,
    },

    /// Start an interactive REPL
    ///
    /// Each line is evaluated against the same global scope.
    ///
    /// REPL COMMANDS:
    ///     :help, :h      Show help
    ///     :quit, :q      Exit REPL
    ///     :reset         Clear all variables
    ///     :vars, :v      List defined variables
    Repl,

    /// Dump AST to JSON
    ///
    /// Parses the source file and outputs the syntax tree in JSON format
    /// for tooling or debugging purposes.
    ///
    /// EXAMPLES:
    ///     quill ast main.ql              Print AST
    ///     quill ast main.ql > ast.json   Save to file
    Ast {
        /// Path to the Quill source file
        file: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cli_config = config::Config::from_env();
    cli_config.init_logging();

    match cli.command {
        Commands::Run { file, json } => {
            // Command-line flag overrides environment variable
            let use_json = json || cli_config.default_json;
            commands::run::run(&file, use_json)?;
        }
        Commands::Check { file, json } => {
            let use_json = json || cli_config.default_json;
            commands::check::run(&file, use_json)?;
        }
        Commands::Repl => {
            commands::repl::run(cli_config.default_json)?;
        }
        Commands::Ast { file } => {
            commands::ast::run(&file)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_smoke() {
        let cli = Cli::parse_from(["quill", "repl"]);
        assert!(matches!(cli.command, Commands::Repl));
    }

    #[test]
    fn test_cli_json_flag() {
        let cli = Cli::parse_from(["quill", "check", "file.ql", "--json"]);
        match cli.command {
            Commands::Check { json, .. } => assert!(json),
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_alias_r_for_run() {
        let cli = Cli::parse_from(["quill", "r", "main.ql"]);
        match cli.command {
            Commands::Run { file, .. } => assert_eq!(file, "main.ql"),
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_alias_c_for_check() {
        let cli = Cli::parse_from(["quill", "c", "main.ql"]);
        assert!(matches!(cli.command, Commands::Check { .. }));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
