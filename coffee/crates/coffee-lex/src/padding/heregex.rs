//! Padding for heregexes.
//!
//! Inside `///…///` every unescaped whitespace byte is insignificant and
//! becomes padding; an escaped whitespace byte stays, but its backslash
//! becomes padding instead. A `#` at the start of a fragment or after
//! whitespace opens a comment running to the end of the line, all of it
//! padding. (In CS2 mode most comments never reach this pass: the
//! scanner splits them out as `HEREGEXP_COMMENT` markers.)

use coffee_util::Result;

use crate::buffered::BufferedSourceLocationStream;
use crate::kind::SourceKind;
use crate::stream::SourceLocationMarker;

use super::{escaping_backslash_before, escaping_backslash_before_newline};
use super::tracker::PaddingTracker;

/// Computes padding markers for a heregex at the stream head. Returns an
/// empty vector (consuming nothing) when the head is not a heregex start.
pub fn heregex_padding(
    source: &str,
    stream: &mut BufferedSourceLocationStream<'_>,
) -> Result<Vec<SourceLocationMarker>> {
    if stream.peek()?.kind != SourceKind::HeregexpStart {
        return Ok(Vec::new());
    }

    let mut tracker = PaddingTracker::new(stream, SourceKind::HeregexpEnd)?;
    for fragment in tracker.fragments().iter_mut() {
        let bytes = fragment.content(source).as_bytes().to_vec();
        let len = bytes.len();
        let mut i = 0;
        while i < len {
            match bytes[i] {
                b' ' | b'\t' | b'\n' => {
                    let escaping = if bytes[i] == b'\n' {
                        escaping_backslash_before_newline(&bytes, i)
                    } else {
                        escaping_backslash_before(&bytes, i)
                    };
                    match escaping {
                        // Escaped: the whitespace byte itself survives,
                        // the backslash does not.
                        Some(backslash) => fragment.mark_padding(backslash, backslash + 1),
                        None => fragment.mark_padding(i, i + 1),
                    }
                    i += 1;
                }
                b'#' if i == 0 || matches!(bytes[i - 1], b' ' | b'\t' | b'\n') => {
                    let mut end = i;
                    while end < len && bytes[end] != b'\n' {
                        end += 1;
                    }
                    fragment.mark_padding(i, end);
                    i = end;
                }
                _ => i += 1,
            }
        }
    }

    tracker.compute_source_locations()
}
