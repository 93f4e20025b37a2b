//! Shared helpers for coffeet commands.

use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Reads the source to lex: the given file, or stdin when no file was
/// named.
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}
