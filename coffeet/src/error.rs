//! Error handling for the coffeet CLI.

use thiserror::Error;

/// Errors surfaced by coffeet commands.
#[derive(Error, Debug)]
pub enum CoffeetError {
    /// Reading the input file or stdin failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input did not lex.
    #[error("lex error: {0}")]
    Lex(#[from] coffee_lex::LexError),

    /// Serializing the token output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Logging could not be initialized.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias used throughout the CLI.
pub type Result<T> = std::result::Result<T, CoffeetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_message_passthrough() {
        let err = CoffeetError::from(coffee_lex::LexError::UnclosedRegex);
        assert_eq!(err.to_string(), "lex error: missing / (unclosed regex)");
    }

    #[test]
    fn test_io_error_wraps() {
        let err = CoffeetError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing.coffee",
        ));
        assert!(err.to_string().contains("missing.coffee"));
    }
}
