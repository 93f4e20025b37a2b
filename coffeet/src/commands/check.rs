//! The `check` command: lex only, report success or the failure.

use std::path::PathBuf;

use coffee_lex::{lex_with_options, LexOptions};
use tracing::debug;

use crate::commands::common::read_source;
use crate::error::Result;

/// Arguments for the check command.
#[derive(Debug)]
pub struct CheckArgs {
    /// File to check; stdin when absent.
    pub file: Option<PathBuf>,
    /// Recognize CS2 heregex comments.
    pub cs2: bool,
}

/// Lexes the input and prints a one-line summary.
pub fn run_check(args: CheckArgs) -> Result<()> {
    let source = read_source(args.file.as_deref())?;
    let options = LexOptions { use_cs2: args.cs2 };
    let tokens = lex_with_options(&source, options)?;
    debug!(token_count = tokens.len(), "input is well-formed");
    println!("ok: {} tokens", tokens.len());
    Ok(())
}
