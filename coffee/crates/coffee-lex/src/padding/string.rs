//! Padding for ordinary single- and double-quoted strings.
//!
//! A newline in a normal string joins its two lines with a single space:
//! trailing whitespace on the first line and leading whitespace on the
//! second become padding and the newline itself becomes a line separator.
//! A newline escaped with a backslash is elided entirely, as is a
//! whitespace run touching the very start or very end of the string.

use coffee_util::Result;

use crate::buffered::BufferedSourceLocationStream;
use crate::kind::SourceKind;
use crate::stream::SourceLocationMarker;

use super::escaping_backslash_before_newline;
use super::tracker::PaddingTracker;

/// Computes padding markers for a normal string at the stream head.
/// Returns an empty vector (consuming nothing) when the head is not a
/// normal-string start.
pub fn normal_string_padding(
    source: &str,
    stream: &mut BufferedSourceLocationStream<'_>,
) -> Result<Vec<SourceLocationMarker>> {
    let end_kind = match stream.peek()?.kind {
        SourceKind::SstringStart => SourceKind::SstringEnd,
        SourceKind::DstringStart => SourceKind::DstringEnd,
        _ => return Ok(Vec::new()),
    };

    let mut tracker = PaddingTracker::new(stream, end_kind)?;
    let fragment_count = tracker.fragment_count();
    for (fragment_index, fragment) in tracker.fragments().iter_mut().enumerate() {
        let bytes = fragment.content(source).as_bytes().to_vec();
        let len = bytes.len();
        let first = fragment_index == 0;
        let last = fragment_index + 1 == fragment_count;

        let mut i = 0;
        while i < len {
            if bytes[i] != b'\n' {
                i += 1;
                continue;
            }

            // Walk back over the preceding line's trailing whitespace.
            let mut pad_start = i;
            while pad_start > 0 && matches!(bytes[pad_start - 1], b' ' | b'\t') {
                pad_start -= 1;
            }

            // Walk forward over whitespace and escaped newlines to the
            // next content byte.
            let mut pad_end = i;
            while pad_end < len {
                match bytes[pad_end] {
                    b' ' | b'\t' | b'\n' => pad_end += 1,
                    b'\\' if bytes.get(pad_end + 1) == Some(&b'\n') => pad_end += 2,
                    _ => break,
                }
            }

            if let Some(backslash) = escaping_backslash_before_newline(&bytes, i) {
                // Escaped newline: elide from the backslash on.
                fragment.mark_padding(backslash, pad_end);
            } else if (first && pad_start == 0) || (last && pad_end == len) {
                // Whitespace touching the string's outer edge vanishes.
                fragment.mark_padding(pad_start, pad_end);
            } else {
                fragment.mark_padding(pad_start, i);
                fragment.mark_line_separator(i);
                fragment.mark_padding(i + 1, pad_end);
            }
            i = pad_end.max(i + 1);
        }
    }

    tracker.compute_source_locations()
}
