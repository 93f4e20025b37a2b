//! coffee-lex - a source-preserving lexer for CoffeeScript.
//!
//! Unlike a lexer feeding an AST parser, this one accounts for *every*
//! byte of its input: whitespace, comments, and the interior structure of
//! quoted strings all land in exactly one classified span, so
//! source-to-source tools can reason about the original text at byte
//! precision.
//!
//! The pipeline:
//!
//! ```text
//! source bytes
//!   -> location stream          (context-dependent scanner, §stream)
//!   -> buffered stream          (lookahead + splice buffer, §buffered)
//!   -> padding passes           (string/herestring/heregex, §padding)
//!      + negation combiner      (`not in` and friends, §combiner)
//!   -> pair and filter          (§assembler)
//!   -> token list               (byte-indexed queries, §list)
//! ```
//!
//! # Examples
//!
//! ```
//! use coffee_lex::{lex, SourceKind};
//!
//! let tokens = lex("a + b").unwrap();
//! let kinds: Vec<SourceKind> = tokens.iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![SourceKind::Identifier, SourceKind::Operator, SourceKind::Identifier]
//! );
//! ```
//!
//! Input must be UTF-8 with LF line terminators; CR is neither an error
//! nor normalized. Ill-formed constructs (unterminated strings, stray
//! braces, unclosed regexes) fail the whole lex with a [`LexError`] -
//! there is no recovery and no partial output.

pub mod assembler;
pub mod buffered;
pub mod combiner;
pub mod context;
pub mod cursor;
mod edge_cases;
pub mod kind;
pub mod list;
pub mod padding;
pub mod patterns;
pub mod stream;

pub use coffee_util::{LexError, Result, Span};

pub use buffered::BufferedSourceLocationStream;
pub use kind::{keyword_from_word, SourceKind};
pub use list::{SourceToken, SourceTokenIndex, SourceTokenList};
pub use stream::{LexOptions, SourceLocationMarker, SourceLocationStream};

/// Lexes `source` to completion with default options.
///
/// # Errors
///
/// Fails on the first ill-formed construct; see [`LexError`].
pub fn lex(source: &str) -> Result<SourceTokenList> {
    lex_with_options(source, LexOptions::default())
}

/// Lexes `source` to completion.
pub fn lex_with_options(source: &str, options: LexOptions) -> Result<SourceTokenList> {
    assembler::assemble(SourceLocationStream::with_options(source, 0, options))
}

/// A raw location stream over `source` with default options.
pub fn stream(source: &str) -> SourceLocationStream<'_> {
    SourceLocationStream::new(source)
}

/// A raw location stream starting at byte `start`.
pub fn stream_from(source: &str, start: usize, options: LexOptions) -> SourceLocationStream<'_> {
    SourceLocationStream::with_options(source, start, options)
}

/// Drains a stream into a vector of markers, up to and including the
/// `EOF` marker.
pub fn consume_stream(mut stream: SourceLocationStream<'_>) -> Result<Vec<SourceLocationMarker>> {
    let mut markers = Vec::new();
    loop {
        let marker = stream.next()?;
        markers.push(marker);
        if marker.kind == SourceKind::Eof {
            return Ok(markers);
        }
    }
}
