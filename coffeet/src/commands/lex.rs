//! The `lex` command: print one JSON triple per token.

use std::io::Write;
use std::path::PathBuf;

use coffee_lex::{lex_with_options, LexOptions};
use tracing::debug;

use crate::commands::common::read_source;
use crate::error::Result;

/// Arguments for the lex command.
#[derive(Debug)]
pub struct LexArgs {
    /// File to lex; stdin when absent.
    pub file: Option<PathBuf>,
    /// Recognize CS2 heregex comments.
    pub cs2: bool,
}

/// Lexes the input and writes a JSON array of `[kind, start, literal]`
/// triples to stdout.
pub fn run_lex(args: LexArgs) -> Result<()> {
    let source = read_source(args.file.as_deref())?;
    let options = LexOptions { use_cs2: args.cs2 };
    let tokens = lex_with_options(&source, options)?;
    debug!(token_count = tokens.len(), "lexed input");

    let triples: Vec<(&'static str, usize, &str)> = tokens
        .iter()
        .map(|token| (token.kind.name(), token.start, token.literal(&source)))
        .collect();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &triples)?;
    writeln!(out)?;
    Ok(())
}
