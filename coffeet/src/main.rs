//! Coffeet CLI - command-line front-end for the coffee-lex lexer.
//!
//! Reads CoffeeScript source from a file or stdin and either prints the
//! classified tokens as JSON (`lex`) or just validates that the input
//! lexes (`check`).

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::check::{run_check, CheckArgs};
use commands::lex::{run_lex, LexArgs};
use error::{CoffeetError, Result};

/// Coffeet - lex CoffeeScript source at byte precision
#[derive(Parser, Debug)]
#[command(name = "coffeet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lex CoffeeScript source at byte precision", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, env = "COFFEET_VERBOSE")]
    verbose: bool,

    /// Disable color output
    #[arg(long, global = true, env = "COFFEET_NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the coffeet CLI.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one `[kind, start, literal]` JSON triple per token
    Lex(LexCommand),

    /// Validate that the input lexes, without printing tokens
    Check(CheckCommand),
}

/// Arguments for the lex subcommand.
#[derive(Parser, Debug)]
struct LexCommand {
    /// File to lex (stdin when omitted)
    file: Option<PathBuf>,

    /// Recognize `# …` comments inside heregexes (CoffeeScript 2)
    #[arg(long)]
    cs2: bool,
}

/// Arguments for the check subcommand.
#[derive(Parser, Debug)]
struct CheckCommand {
    /// File to check (stdin when omitted)
    file: Option<PathBuf>,

    /// Recognize `# …` comments inside heregexes (CoffeeScript 2)
    #[arg(long)]
    cs2: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(cli.verbose, cli.no_color) {
        eprintln!("coffeet: {err}");
        return ExitCode::FAILURE;
    }

    match execute_command(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("coffeet: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize the logging system.
fn init_logging(verbose: bool, no_color: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let subscriber = fmt::layer()
        .with_ansi(!no_color)
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| CoffeetError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

/// Execute the selected command.
fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Lex(args) => run_lex(LexArgs {
            file: args.file,
            cs2: args.cs2,
        }),
        Commands::Check(args) => run_check(CheckArgs {
            file: args.file,
            cs2: args.cs2,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::parse_from(["coffeet", "lex"]);
        assert!(matches!(cli.command, Commands::Lex(_)));
    }

    #[test]
    fn test_cli_parse_lex_with_file() {
        let cli = Cli::parse_from(["coffeet", "lex", "input.coffee"]);
        if let Commands::Lex(args) = cli.command {
            assert_eq!(args.file, Some(PathBuf::from("input.coffee")));
            assert!(!args.cs2);
        } else {
            panic!("Expected Lex command");
        }
    }

    #[test]
    fn test_cli_parse_lex_with_cs2() {
        let cli = Cli::parse_from(["coffeet", "lex", "--cs2"]);
        if let Commands::Lex(args) = cli.command {
            assert!(args.cs2);
        } else {
            panic!("Expected Lex command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::parse_from(["coffeet", "check", "input.coffee"]);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_cli_parse_global_verbose() {
        let cli = Cli::parse_from(["coffeet", "--verbose", "check"]);
        assert!(cli.verbose);
    }
}
