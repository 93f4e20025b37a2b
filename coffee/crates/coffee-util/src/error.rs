//! Error types shared by the lexer crates.
//!
//! All ill-formed-input failures surface as a single [`LexError`]. The
//! message texts are part of the public contract: downstream tools match on
//! them, so the exact wording (including the inconsistent capitalization
//! inherited from the reference implementation) must not change.

use thiserror::Error;

/// A fatal lexing failure.
///
/// The lexer never recovers: the first ill-formed construct aborts the run
/// and no token list is produced. API misuse (cross-list token indexes,
/// out-of-order tokens) is reported by panicking at the misuse site instead
/// and is not represented here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A `}` appeared in code context with no interpolation or brace open.
    #[error("Unexpected '}}' found in string at {0}")]
    UnexpectedCloseBrace(usize),

    /// Input ended while a string, interpolation, paren, or markup
    /// construct was still open. The payload names the innermost context,
    /// e.g. `DSTRING` or `INTERPOLATION`.
    #[error("unexpected EOF while in context {0}")]
    UnexpectedEof(&'static str),

    /// A regex literal started but its closing `/` never appeared.
    #[error("missing / (unclosed regex)")]
    UnclosedRegex,

    /// A `)` appeared with no matching open paren.
    #[error("unexpected ')' at {0}")]
    UnexpectedCloseParen(usize),

    /// A padding pass asked for a byte to be both padding and a line
    /// separator, which the padding tracker refuses.
    #[error("Illegal padding state: byte {0} is both padding and line separator")]
    IllegalPaddingState(usize),
}

/// Result type alias used throughout the lexer crates.
pub type Result<T> = std::result::Result<T, LexError>;
