//! String, comment, and embedded-JS body dispatch.
//!
//! Body states consume one byte per step without re-anchoring the pending
//! marker, so a whole run of content collapses into a single marker. Only
//! a boundary (closing delimiter, interpolation, comment edge) re-anchors.

use coffee_util::Result;

use crate::context::Context;
use crate::kind::SourceKind;

use super::SourceLocationStream;

impl<'a> SourceLocationStream<'a> {
    /// One step inside a quoted construct (string, herestring, heregex).
    pub(super) fn dispatch_string_body(&mut self, start: usize) -> Result<()> {
        let frame = match self.stack.top_string() {
            Some(frame) => *frame,
            None => unreachable!("string body scanned with no string frame on the stack"),
        };

        if self.cursor.byte_at(0) == Some(b'\\') {
            // Escape: the next character is opaque.
            self.cursor.advance(1);
            self.cursor.advance_char();
        } else if self.cursor.starts_with(frame.end_delimiter) {
            self.stack.pop();
            self.cursor.advance(frame.end_delimiter.len());
            self.set_kind(frame.end_kind, start);
        } else if frame.allow_interpolations && self.cursor.starts_with("#{") {
            self.stack.push(Context::Interpolation {
                outer: SourceKind::StringContent,
            });
            self.cursor.advance(2);
            self.set_kind(SourceKind::InterpolationStart, start);
        } else if frame.allow_comments
            && self.options.use_cs2
            && self.cursor.byte_at(0) == Some(b'#')
            && self.cursor.byte_at(1) != Some(b'{')
            && start > 0
            && matches!(
                self.cursor.byte_at_absolute(start - 1),
                Some(b' ') | Some(b'\t') | Some(b'\n')
            )
        {
            self.cursor.advance(1);
            self.set_kind(SourceKind::HeregexpComment, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }

    /// One step inside embedded JavaScript; `delimiter` is the closing
    /// backtick run.
    pub(super) fn dispatch_js_body(&mut self, start: usize, delimiter: &str) -> Result<()> {
        if self.cursor.byte_at(0) == Some(b'\\') {
            self.cursor.advance(1);
            self.cursor.advance_char();
        } else if self.cursor.starts_with(delimiter) {
            self.cursor.advance(delimiter.len());
            self.set_kind(SourceKind::Normal, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }

    /// One step inside a line comment; the terminating newline is left
    /// for the code rules.
    pub(super) fn dispatch_comment_body(&mut self, start: usize) -> Result<()> {
        if self.cursor.byte_at(0) == Some(b'\n') {
            self.set_kind(SourceKind::Normal, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }

    /// One step inside a `###…###` block comment.
    pub(super) fn dispatch_herecomment_body(&mut self, start: usize) -> Result<()> {
        if self.cursor.starts_with("###") {
            self.cursor.advance(3);
            self.set_kind(SourceKind::Normal, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }

    /// One step inside a CS2 heregex comment; ends before the newline,
    /// which belongs to the heregex body.
    pub(super) fn dispatch_heregexp_comment_body(&mut self, start: usize) -> Result<()> {
        if self.cursor.byte_at(0) == Some(b'\n') {
            self.set_kind(SourceKind::StringContent, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::kind::SourceKind::{self, *};
    use crate::stream::{LexOptions, SourceLocationStream};

    fn markers_cs2(source: &str) -> Vec<(SourceKind, usize)> {
        let mut stream =
            SourceLocationStream::with_options(source, 0, LexOptions { use_cs2: true });
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

    #[test]
    fn test_cs2_heregex_comment() {
        // `# c` after whitespace becomes a comment marker; the newline
        // stays in the body.
        assert_eq!(
            markers_cs2("///a # c\nb///"),
            vec![
                (HeregexpStart, 0),
                (StringContent, 3),
                (HeregexpComment, 5),
                (StringContent, 8),
                (HeregexpEnd, 10),
                (Eof, 13),
            ]
        );
    }

    #[test]
    fn test_cs2_hash_without_whitespace_is_content() {
        assert_eq!(
            markers_cs2("///a# c///"),
            vec![
                (HeregexpStart, 0),
                (StringContent, 3),
                (HeregexpEnd, 7),
                (Eof, 10),
            ]
        );
    }

    #[test]
    fn test_cs2_hash_brace_is_interpolation() {
        assert_eq!(
            markers_cs2("/// #{a}///"),
            vec![
                (HeregexpStart, 0),
                (StringContent, 3),
                (InterpolationStart, 4),
                (Identifier, 6),
                (InterpolationEnd, 7),
                (StringContent, 8),
                (HeregexpEnd, 8),
                (Eof, 11),
            ]
        );
    }

    #[test]
    fn test_cs1_hash_stays_in_content() {
        let mut stream = SourceLocationStream::new("///a # c///");
        let mut kinds = Vec::new();
        loop {
            let m = stream.next().unwrap();
            kinds.push(m.kind);
            if m.kind == Eof {
                break;
            }
        }
        assert_eq!(
            kinds,
            vec![HeregexpStart, StringContent, HeregexpEnd, Eof]
        );
    }
}
