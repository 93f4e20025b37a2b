//! The location stream - a pull-based producer of source-location markers.
//!
//! A marker is a `(kind, byte index)` pair meaning: starting at that byte,
//! the source is of the named kind until the next marker. The stream holds
//! a context stack (what construct we are inside) and the history of
//! markers it has emitted (several tokenizer decisions depend on what came
//! before: division vs. regex, call-paren vs. grouping-paren, keyword vs.
//! property name, markup-open vs. less-than).
//!
//! `next()` loops internally until the classification changes. Each inner
//! step either re-anchors the pending marker (a new classification begins
//! at this byte) or just advances the scan position (a string, comment, or
//! embedded-JS body swallowing one more byte). `NORMAL` is a resting state
//! that is never emitted, and a step that changed nothing keeps looping,
//! so callers only ever see real classification changes.

mod code;
mod csx;
mod string;

use coffee_util::{LexError, Result};

use crate::context::{Context, ContextStack};
use crate::cursor::Cursor;
use crate::kind::SourceKind;

/// Options controlling dialect-dependent scanning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexOptions {
    /// When true, `# …` comments inside heregexes are recognized
    /// (CoffeeScript 2 behavior).
    pub use_cs2: bool,
}

/// A point in the source where the classification changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocationMarker {
    /// Classification of the source starting at `index`.
    pub kind: SourceKind,
    /// Byte offset where this classification begins.
    pub index: usize,
}

impl SourceLocationMarker {
    pub fn new(kind: SourceKind, index: usize) -> Self {
        Self { kind, index }
    }
}

/// The pull-based scanner over one source string.
///
/// Construct with [`SourceLocationStream::new`] (or `with_options` to set
/// a start offset and dialect options), then call [`next`] repeatedly.
/// After the `EOF` marker has been emitted the stream stays at `EOF`; it
/// is not restartable.
///
/// [`next`]: SourceLocationStream::next
///
/// # Example
///
/// ```
/// use coffee_lex::{stream, SourceKind};
///
/// let mut s = stream("a");
/// let marker = s.next().unwrap();
/// assert_eq!(marker.kind, SourceKind::Identifier);
/// assert_eq!(marker.index, 0);
/// assert_eq!(s.next().unwrap().kind, SourceKind::Eof);
/// assert_eq!(s.next().unwrap().kind, SourceKind::Eof);
/// ```
pub struct SourceLocationStream<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) options: LexOptions,
    /// The marker currently being grown; becomes the next emission the
    /// moment the classification changes.
    pub(crate) location: SourceLocationMarker,
    pub(crate) stack: ContextStack,
    pub(crate) history: Vec<SourceLocationMarker>,
    /// Body kind to resume after an `interpolation_end`.
    pub(crate) resume: SourceKind,
    /// Set once `next()` has returned an error; the stream is dead.
    pub(crate) failed: bool,
}

impl<'a> SourceLocationStream<'a> {
    /// Creates a stream over `source` starting at byte 0 with default
    /// options.
    pub fn new(source: &'a str) -> Self {
        Self::with_options(source, 0, LexOptions::default())
    }

    /// Creates a stream starting at `start` with the given options.
    pub fn with_options(source: &'a str, start: usize, options: LexOptions) -> Self {
        Self {
            cursor: Cursor::at(source, start),
            options,
            location: SourceLocationMarker::new(SourceKind::Normal, start),
            stack: ContextStack::new(),
            history: Vec::new(),
            resume: SourceKind::StringContent,
            failed: false,
        }
    }

    /// The source this stream scans.
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Returns the next source-location marker.
    ///
    /// Markers are strictly non-decreasing in byte index. Once `EOF` has
    /// been emitted, every further call returns the same `EOF` marker.
    ///
    /// # Errors
    ///
    /// Fails on ill-formed input: a stray `}` or `)`, an unclosed regex,
    /// or end of input while a construct is still open. After an error
    /// the stream must not be used again.
    pub fn next(&mut self) -> Result<SourceLocationMarker> {
        if self.location.kind == SourceKind::Eof {
            return Ok(self.location);
        }
        loop {
            let start = self.cursor.position();
            let before = self.location;

            if self.cursor.is_at_end() {
                if let Some(context) = self.stack.last().map(|frame| frame.name()) {
                    self.failed = true;
                    return Err(LexError::UnexpectedEof(context));
                }
                self.set_kind(SourceKind::Eof, start);
            } else if let Err(err) = self.dispatch(start) {
                self.failed = true;
                return Err(err);
            }

            let now = self.location;
            let step_again = now.kind == SourceKind::Normal
                || (now == before && now.kind != SourceKind::Eof);
            if !step_again {
                self.history.push(now);
                return Ok(now);
            }
        }
    }

    /// Re-anchors the pending marker: a run of `kind` begins at `start`.
    pub(crate) fn set_kind(&mut self, kind: SourceKind, start: usize) {
        self.location = SourceLocationMarker::new(kind, start);
    }

    /// Routes one scan step based on the pending marker's kind.
    fn dispatch(&mut self, start: usize) -> Result<()> {
        match self.location.kind {
            SourceKind::StringContent => self.dispatch_string_body(start),
            kind if kind.is_string_start() => {
                self.set_kind(SourceKind::StringContent, start);
                Ok(())
            }
            SourceKind::InterpolationEnd => {
                self.set_kind(self.resume, start);
                Ok(())
            }
            SourceKind::HeregexpEnd => {
                self.consume_regexp_flags();
                self.set_kind(SourceKind::Normal, start);
                Ok(())
            }
            SourceKind::Js => self.dispatch_js_body(start, "`"),
            SourceKind::Herejs => self.dispatch_js_body(start, "```"),
            SourceKind::Comment => self.dispatch_comment_body(start),
            SourceKind::Herecomment => self.dispatch_herecomment_body(start),
            SourceKind::HeregexpComment => self.dispatch_heregexp_comment_body(start),
            SourceKind::CsxBody => self.dispatch_csx_body(start),
            SourceKind::CsxOpenTagEnd
            | SourceKind::CsxSelfClosingTagEnd
            | SourceKind::CsxCloseTagEnd => {
                if matches!(self.stack.last(), Some(Context::CsxBody)) {
                    self.set_kind(SourceKind::CsxBody, start);
                    Ok(())
                } else {
                    self.dispatch_code(start)
                }
            }
            _ => self.dispatch_code(start),
        }
    }

    /// Consumes any trailing regex flag letters at the cursor.
    pub(crate) fn consume_regexp_flags(&mut self) {
        while let Some(b) = self.cursor.byte_at(0) {
            if crate::patterns::is_regexp_flag(b) {
                self.cursor.advance(1);
            } else {
                break;
            }
        }
    }

    /// The kind of the most recently emitted marker, if any.
    pub(crate) fn last_emitted_kind(&self) -> Option<SourceKind> {
        self.history.last().map(|m| m.kind)
    }

    /// Division-vs-regex test on the preceding markers: a single space
    /// marker is looked through, and a spaced callable or anything in the
    /// not-regexp set means a following `/` is division.
    pub(crate) fn regexp_allowed_by_prev(&self) -> bool {
        let mut prev = self.history.last();
        let mut spaced = false;
        if let Some(marker) = prev {
            if marker.kind == SourceKind::Space {
                spaced = true;
                prev = self
                    .history
                    .len()
                    .checked_sub(2)
                    .and_then(|i| self.history.get(i));
            }
        }
        if let Some(marker) = prev {
            if spaced && marker.kind.is_callable() {
                return false;
            }
            if marker.kind.excludes_regexp() {
                return false;
            }
        }
        true
    }

    /// Keyword-vs-property test for a just-matched word: `a.if`, `a::if`,
    /// and `@if` (with `@` immediately adjacent) are property names, not
    /// keywords.
    pub(crate) fn identifier_forced_by_prev(&self) -> bool {
        let mut immediate = true;
        for marker in self.history.iter().rev() {
            match marker.kind {
                SourceKind::Space | SourceKind::Newline => immediate = false,
                SourceKind::Dot | SourceKind::Proto => return true,
                SourceKind::At => return immediate,
                _ => return false,
            }
        }
        false
    }
}

impl<'a> Iterator for SourceLocationStream<'a> {
    type Item = Result<SourceLocationMarker>;

    /// Yields markers up to and including the first `EOF`, then `None`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.location.kind == SourceKind::Eof {
            return None;
        }
        Some(SourceLocationStream::next(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::SourceKind::*;

    fn markers(source: &str) -> Vec<(SourceKind, usize)> {
        let mut stream = SourceLocationStream::new(source);
        let mut out = Vec::new();
        loop {
            let m = stream.next().expect("lex failure");
            out.push((m.kind, m.index));
            if m.kind == Eof {
                break;
            }
        }
        out
    }

    fn lex_err(source: &str) -> LexError {
        let mut stream = SourceLocationStream::new(source);
        loop {
            match stream.next() {
                Ok(m) if m.kind == Eof => panic!("expected error for {source:?}"),
                Ok(_) => {}
                Err(err) => return err,
            }
        }
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(markers(""), vec![(Eof, 0)]);
    }

    #[test]
    fn test_simple_expression() {
        assert_eq!(
            markers("a + b"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 3),
                (Identifier, 4),
                (Eof, 5),
            ]
        );
    }

    #[test]
    fn test_stream_stays_at_eof() {
        let mut stream = SourceLocationStream::new("a");
        stream.next().unwrap();
        assert_eq!(stream.next().unwrap().kind, Eof);
        assert_eq!(stream.next().unwrap().kind, Eof);
        assert_eq!(stream.next().unwrap().index, 1);
    }

    #[test]
    fn test_adjacent_operators_get_separate_markers() {
        assert_eq!(
            markers("a+-b"),
            vec![
                (Identifier, 0),
                (Operator, 1),
                (Operator, 2),
                (Identifier, 3),
                (Eof, 4),
            ]
        );
    }

    #[test]
    fn test_interpolated_string() {
        assert_eq!(
            markers("\"b#{c}d\""),
            vec![
                (DstringStart, 0),
                (StringContent, 1),
                (InterpolationStart, 2),
                (Identifier, 4),
                (InterpolationEnd, 5),
                (StringContent, 6),
                (DstringEnd, 7),
                (Eof, 8),
            ]
        );
    }

    #[test]
    fn test_empty_content_between_interpolations() {
        assert_eq!(
            markers("\"#{a}#{b}\""),
            vec![
                (DstringStart, 0),
                (StringContent, 1),
                (InterpolationStart, 1),
                (Identifier, 3),
                (InterpolationEnd, 4),
                (StringContent, 5),
                (InterpolationStart, 5),
                (Identifier, 7),
                (InterpolationEnd, 8),
                (StringContent, 9),
                (DstringEnd, 9),
                (Eof, 10),
            ]
        );
    }

    #[test]
    fn test_single_quote_has_no_interpolation() {
        assert_eq!(
            markers("'#{a}'"),
            vec![(SstringStart, 0), (StringContent, 1), (SstringEnd, 5), (Eof, 6)]
        );
    }

    #[test]
    fn test_string_escape_hides_quote() {
        assert_eq!(
            markers(r#""a\"b""#),
            vec![(DstringStart, 0), (StringContent, 1), (DstringEnd, 5), (Eof, 6)]
        );
    }

    #[test]
    fn test_call_paren_vs_grouping_paren() {
        assert_eq!(
            markers("a(b)"),
            vec![
                (Identifier, 0),
                (CallStart, 1),
                (Identifier, 2),
                (CallEnd, 3),
                (Eof, 4),
            ]
        );
        assert_eq!(
            markers("a (b)"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (LParen, 2),
                (Identifier, 3),
                (RParen, 4),
                (Eof, 5),
            ]
        );
    }

    #[test]
    fn test_regex_vs_division() {
        assert_eq!(
            markers("a = /b/"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 3),
                (Regexp, 4),
                (Eof, 7),
            ]
        );
        assert_eq!(
            markers("a / b"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 3),
                (Identifier, 4),
                (Eof, 5),
            ]
        );
        // No space: division against the identifier directly.
        assert_eq!(
            markers("a/b/c"),
            vec![
                (Identifier, 0),
                (Operator, 1),
                (Identifier, 2),
                (Operator, 3),
                (Identifier, 4),
                (Eof, 5),
            ]
        );
    }

    #[test]
    fn test_regex_flags_consumed() {
        assert_eq!(
            markers("x = /ab/gim"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 3),
                (Regexp, 4),
                (Eof, 11),
            ]
        );
    }

    #[test]
    fn test_division_after_number() {
        assert_eq!(
            markers("1 / 2"),
            vec![
                (Number, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 3),
                (Number, 4),
                (Eof, 5),
            ]
        );
    }

    #[test]
    fn test_floor_division_operator() {
        assert_eq!(
            markers("a // b"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Operator, 2),
                (Space, 4),
                (Identifier, 5),
                (Eof, 6),
            ]
        );
    }

    #[test]
    fn test_heregex_markers() {
        assert_eq!(
            markers("///a#{b}c///"),
            vec![
                (HeregexpStart, 0),
                (StringContent, 3),
                (InterpolationStart, 4),
                (Identifier, 6),
                (InterpolationEnd, 7),
                (StringContent, 8),
                (HeregexpEnd, 9),
                (Eof, 12),
            ]
        );
    }

    #[test]
    fn test_heregex_trailing_flags() {
        assert_eq!(
            markers("///a///img"),
            vec![
                (HeregexpStart, 0),
                (StringContent, 3),
                (HeregexpEnd, 4),
                (Eof, 10),
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            markers("a # rest\nb"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Comment, 2),
                (Newline, 8),
                (Identifier, 9),
                (Eof, 10),
            ]
        );
        assert_eq!(
            markers("### block ###x"),
            vec![(Herecomment, 0), (Identifier, 13), (Eof, 14)]
        );
    }

    #[test]
    fn test_herecomment_requires_non_hash_fourth_byte() {
        // `####` runs as a line comment instead.
        assert_eq!(markers("####\n"), vec![(Comment, 0), (Newline, 4), (Eof, 5)]);
    }

    #[test]
    fn test_embedded_js() {
        assert_eq!(
            markers("`a + b`"),
            vec![(Js, 0), (Eof, 7)]
        );
        assert_eq!(
            markers("```\nvar x;\n```"),
            vec![(Herejs, 0), (Eof, 14)]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            markers("if x then y"),
            vec![
                (If, 0),
                (Space, 2),
                (Identifier, 3),
                (Space, 4),
                (Then, 5),
                (Space, 9),
                (Identifier, 10),
                (Eof, 11),
            ]
        );
        assert_eq!(markers("unless")[0], (If, 0));
        assert_eq!(markers("until")[0], (While, 0));
    }

    #[test]
    fn test_keyword_after_dot_is_identifier() {
        assert_eq!(
            markers("s.else"),
            vec![(Identifier, 0), (Dot, 1), (Identifier, 2), (Eof, 6)]
        );
        assert_eq!(
            markers("s::if"),
            vec![(Identifier, 0), (Proto, 1), (Identifier, 3), (Eof, 5)]
        );
    }

    #[test]
    fn test_keyword_after_adjacent_at_is_identifier() {
        assert_eq!(
            markers("@for"),
            vec![(At, 0), (Identifier, 1), (Eof, 4)]
        );
        // With a space between, the `@` rule no longer applies.
        assert_eq!(
            markers("@ for"),
            vec![(At, 0), (Space, 1), (For, 2), (Eof, 5)]
        );
    }

    #[test]
    fn test_object_key_keyword_is_identifier() {
        assert_eq!(
            markers("then: 1"),
            vec![
                (Identifier, 0),
                (Colon, 4),
                (Space, 5),
                (Number, 6),
                (Eof, 7),
            ]
        );
    }

    #[test]
    fn test_yield_from() {
        assert_eq!(
            markers("yield from x"),
            vec![
                (YieldFrom, 0),
                (Space, 10),
                (Identifier, 11),
                (Eof, 12),
            ]
        );
        assert_eq!(markers("yield x")[0], (Yield, 0));
    }

    #[test]
    fn test_range_and_dot() {
        assert_eq!(
            markers("1..2"),
            vec![(Number, 0), (Range, 1), (Number, 3), (Eof, 4)]
        );
        assert_eq!(
            markers("a...b"),
            vec![(Identifier, 0), (Range, 1), (Identifier, 4), (Eof, 5)]
        );
        assert_eq!(
            markers("a.b"),
            vec![(Identifier, 0), (Dot, 1), (Identifier, 2), (Eof, 3)]
        );
    }

    #[test]
    fn test_increment_decrement_existence() {
        assert_eq!(
            markers("a++"),
            vec![(Identifier, 0), (Increment, 1), (Eof, 3)]
        );
        assert_eq!(
            markers("--b"),
            vec![(Decrement, 0), (Identifier, 2), (Eof, 3)]
        );
        assert_eq!(
            markers("b?"),
            vec![(Identifier, 0), (Existence, 1), (Eof, 2)]
        );
    }

    #[test]
    fn test_arrows() {
        assert_eq!(markers("->"), vec![(Function, 0), (Eof, 2)]);
        assert_eq!(markers("=>"), vec![(Function, 0), (Eof, 2)]);
    }

    #[test]
    fn test_continuation() {
        assert_eq!(
            markers("a \\\nb"),
            vec![
                (Identifier, 0),
                (Space, 1),
                (Continuation, 2),
                (Newline, 3),
                (Identifier, 4),
                (Eof, 5),
            ]
        );
    }

    #[test]
    fn test_braces_and_interpolation_nesting() {
        assert_eq!(
            markers("\"#{ {a: 1} }\""),
            vec![
                (DstringStart, 0),
                (StringContent, 1),
                (InterpolationStart, 1),
                (Space, 3),
                (LBrace, 4),
                (Identifier, 5),
                (Colon, 6),
                (Space, 7),
                (Number, 8),
                (RBrace, 9),
                (Space, 10),
                (InterpolationEnd, 11),
                (StringContent, 12),
                (DstringEnd, 12),
                (Eof, 13),
            ]
        );
    }

    #[test]
    fn test_unknown_consumes_rest() {
        let got = markers("a \u{0} b");
        assert_eq!(got[0], (Identifier, 0));
        assert_eq!(got[1], (Space, 1));
        assert_eq!(got[2], (Unknown, 2));
        assert_eq!(got[3], (Eof, 5));
    }

    #[test]
    fn test_error_stray_close_brace() {
        assert_eq!(lex_err("a}"), LexError::UnexpectedCloseBrace(1));
    }

    #[test]
    fn test_error_stray_close_paren() {
        assert_eq!(lex_err("a)"), LexError::UnexpectedCloseParen(1));
    }

    #[test]
    fn test_error_unclosed_regex() {
        assert_eq!(lex_err("x = /ab"), LexError::UnclosedRegex);
    }

    #[test]
    fn test_error_eof_in_interpolation() {
        assert_eq!(
            lex_err("a = \"#{"),
            LexError::UnexpectedEof("INTERPOLATION")
        );
    }

    #[test]
    fn test_error_eof_in_string() {
        assert_eq!(lex_err("\"abc"), LexError::UnexpectedEof("DSTRING"));
        assert_eq!(lex_err("'abc"), LexError::UnexpectedEof("SSTRING"));
        assert_eq!(lex_err("'''abc"), LexError::UnexpectedEof("TSSTRING"));
        assert_eq!(lex_err("\"\"\"abc"), LexError::UnexpectedEof("TDSTRING"));
        assert_eq!(lex_err("///abc"), LexError::UnexpectedEof("HEREGEXP"));
    }

    #[test]
    fn test_error_eof_in_paren() {
        assert_eq!(lex_err("f(a"), LexError::UnexpectedEof("CALL_START"));
        assert_eq!(lex_err("(a"), LexError::UnexpectedEof("LPAREN"));
    }

    #[test]
    fn test_iterator_yields_through_eof() {
        let stream = SourceLocationStream::new("a b");
        let kinds: Vec<SourceKind> = stream.map(|m| m.unwrap().kind).collect();
        assert_eq!(kinds, vec![Identifier, Space, Identifier, Eof]);
    }
}
