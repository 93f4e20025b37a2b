//! Padding for triple-quoted herestrings.
//!
//! Herestrings keep their newlines but shed shared indentation: the
//! smallest whitespace prefix common to the indented content lines is
//! padding at the start of every line carrying it, and a blank first or
//! last line disappears entirely. Escaped newlines are elided together
//! with the whitespace that follows them.
//!
//! Two quirks of the reference compiler are load-bearing for downstream
//! tools and are reproduced exactly: a first full line with content at
//! column zero disables indent stripping altogether, and a string of
//! exactly two whitespace-only lines loses only the first of them.

use coffee_util::Result;

use crate::buffered::BufferedSourceLocationStream;
use crate::kind::SourceKind;
use crate::stream::SourceLocationMarker;

use super::escaping_backslash_before_newline;
use super::tracker::{Fragment, PaddingTracker};

/// One line of herestring content. A line can span fragments when an
/// interpolation interrupts it; `pieces` are `(fragment, start, end)`
/// byte ranges and `newline` locates the unescaped `\n` that ended it.
#[derive(Debug)]
struct Line {
    pieces: Vec<(usize, usize, usize)>,
    newline: Option<(usize, usize)>,
}

impl Line {
    fn first_piece(&self) -> (usize, usize, usize) {
        self.pieces[0]
    }

    /// Leading space/tab run of the line's first piece.
    fn indent_len(&self, contents: &[&[u8]]) -> usize {
        let (fragment, start, end) = self.first_piece();
        let bytes = &contents[fragment][start..end];
        bytes
            .iter()
            .take_while(|&&b| matches!(b, b' ' | b'\t'))
            .count()
    }

    /// True when the line is whitespace throughout. A line interrupted
    /// by an interpolation is never whitespace-only.
    fn is_whitespace_only(&self, contents: &[&[u8]]) -> bool {
        self.pieces.len() == 1 && {
            let (fragment, start, end) = self.first_piece();
            contents[fragment][start..end]
                .iter()
                .all(|&b| matches!(b, b' ' | b'\t'))
        }
    }

    /// True when the line has any bytes or an interpolation at all.
    fn is_nonempty(&self) -> bool {
        self.pieces.len() > 1 || {
            let (_, start, end) = self.first_piece();
            end > start
        }
    }
}

/// Computes padding markers for a herestring at the stream head. Returns
/// an empty vector (consuming nothing) when the head is not a
/// triple-quoted start.
pub fn triple_quoted_padding(
    source: &str,
    stream: &mut BufferedSourceLocationStream<'_>,
) -> Result<Vec<SourceLocationMarker>> {
    let end_kind = match stream.peek()?.kind {
        SourceKind::TsstringStart => SourceKind::TsstringEnd,
        SourceKind::TdstringStart => SourceKind::TdstringEnd,
        _ => return Ok(Vec::new()),
    };

    let mut tracker = PaddingTracker::new(stream, end_kind)?;
    let contents: Vec<&[u8]> = tracker
        .fragments()
        .iter()
        .map(|f| {
            let (start, end) = (f.start, f.end);
            &source.as_bytes()[start..end]
        })
        .collect();
    let lines = split_lines(&contents);

    // Two whitespace-only lines and nothing else: only the first line
    // (and its newline) is removed.
    if lines.len() == 2
        && lines[0].is_whitespace_only(&contents)
        && lines[1].is_whitespace_only(&contents)
    {
        if let Some((fragment, pos)) = lines[0].newline {
            tracker.fragments()[fragment].mark_padding(0, pos + 1);
        }
        return tracker.compute_source_locations();
    }

    // Blank first line: the leading whitespace and its newline vanish.
    if lines.len() > 1 && lines[0].is_whitespace_only(&contents) {
        if let Some((fragment, pos)) = lines[0].newline {
            tracker.fragments()[fragment].mark_padding(0, pos + 1);
        }
    }

    // Blank last line: the closing newline and trailing whitespace vanish.
    if lines.len() > 1 && lines[lines.len() - 1].is_whitespace_only(&contents) {
        if let Some((fragment, pos)) = lines[lines.len() - 2].newline {
            let fragment_len = contents[fragment].len();
            tracker.fragments()[fragment].mark_padding(pos, fragment_len);
        }
    }

    mark_escaped_newlines(&contents, tracker.fragments());

    let shared = shared_indent(&contents, &lines);
    if !shared.is_empty() {
        for line in &lines[1..] {
            let (fragment, start, end) = line.first_piece();
            if contents[fragment][start..end].starts_with(shared) {
                tracker.fragments()[fragment].mark_padding(start, start + shared.len());
            }
        }
    }

    tracker.compute_source_locations()
}

/// Splits fragment contents into lines on unescaped newlines. Lines span
/// fragment boundaries; the first returned line is the partial line
/// between the opening delimiter and the first newline.
fn split_lines(contents: &[&[u8]]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line {
        pieces: Vec::new(),
        newline: None,
    };
    for (fragment, bytes) in contents.iter().enumerate() {
        let mut piece_start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' && escaping_backslash_before_newline(bytes, i).is_none() {
                current.pieces.push((fragment, piece_start, i));
                current.newline = Some((fragment, i));
                lines.push(current);
                current = Line {
                    pieces: Vec::new(),
                    newline: None,
                };
                piece_start = i + 1;
            }
        }
        current.pieces.push((fragment, piece_start, bytes.len()));
    }
    lines.push(current);
    lines
}

/// The whitespace prefix shared by every indented, non-blank full line.
///
/// Zero-indent lines and whitespace-only lines are ignored, except that
/// a first full line with content at column zero forces the shared
/// indent to be empty (nothing is stripped).
fn shared_indent<'c>(contents: &[&'c [u8]], lines: &[Line]) -> &'c [u8] {
    if lines.len() < 2 {
        return b"";
    }
    let first_full = &lines[1];
    if first_full.indent_len(contents) == 0 && first_full.is_nonempty() {
        return b"";
    }

    let mut shared: Option<&[u8]> = None;
    for line in &lines[1..] {
        let indent_len = line.indent_len(contents);
        if indent_len == 0 || line.is_whitespace_only(contents) {
            continue;
        }
        let (fragment, start, _) = line.first_piece();
        let indent = &contents[fragment][start..start + indent_len];
        shared = Some(match shared {
            None => indent,
            Some(prefix) => {
                let common = prefix
                    .iter()
                    .zip(indent.iter())
                    .take_while(|(a, b)| a == b)
                    .count();
                &prefix[..common]
            }
        });
    }
    shared.unwrap_or(b"")
}

/// Marks each escaped newline, together with the whitespace that follows
/// it, as padding from the escaping backslash on.
fn mark_escaped_newlines(contents: &[&[u8]], fragments: &mut [Fragment]) {
    for (index, bytes) in contents.iter().enumerate() {
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\n' {
                if let Some(backslash) = escaping_backslash_before_newline(bytes, i) {
                    let mut end = i + 1;
                    while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b'\n') {
                        end += 1;
                    }
                    fragments[index].mark_padding(backslash, end);
                    i = end;
                    continue;
                }
            }
            i += 1;
        }
    }
}
