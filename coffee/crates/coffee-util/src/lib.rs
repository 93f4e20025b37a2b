//! coffee-util - shared leaf types for the coffee-lex workspace.
//!
//! This crate holds the two concerns every other crate needs and nothing
//! else: byte-range spans and the lexer's error type. It has no knowledge
//! of tokens or source kinds; those live in `coffee-lex`.

pub mod error;
pub mod span;

pub use error::{LexError, Result};
pub use span::Span;
