//! Edge case tests for coffee-lex
