//! Negated-operator combining.
//!
//! `not in`, `not of`, and `not instanceof` (and their `!`-prefixed
//! spellings) read as single two-word operators downstream, so the
//! assembler merges their markers: the relation words stay `RELATION`,
//! `instanceof` stays `OPERATOR`, and the merged marker sits at the
//! `not`/`!` position. Anything else is pushed back untouched.

use coffee_util::Result;

use crate::buffered::BufferedSourceLocationStream;
use crate::kind::SourceKind;
use crate::stream::SourceLocationMarker;

/// Merges a negated-operator marker sequence at the stream head. Returns
/// the single replacement marker, or an empty vector (with the stream
/// unchanged) when the head is not a negated operator.
pub fn combine_negated_operators(
    source: &str,
    stream: &mut BufferedSourceLocationStream<'_>,
) -> Result<Vec<SourceLocationMarker>> {
    if stream.peek()?.kind != SourceKind::Operator {
        return Ok(Vec::new());
    }

    let first = stream.shift()?;
    let bytes = source.as_bytes();

    if bytes.get(first.index) == Some(&b'!') {
        // `!in`, `!of`, `!instanceof`: the word follows immediately.
        let second = stream.shift()?;
        if second.index == first.index + 1 {
            if let Some(kind) = negated_kind(source, second) {
                return Ok(vec![SourceLocationMarker::new(kind, first.index)]);
            }
        }
        stream.unshift(&[first, second]);
        return Ok(Vec::new());
    }

    if source[first.index..].starts_with("not") {
        let second = stream.shift()?;
        // The `not` marker must be exactly the word, then one space run.
        if second.kind == SourceKind::Space && second.index == first.index + 3 {
            let third = stream.shift()?;
            if let Some(kind) = negated_kind(source, third) {
                return Ok(vec![SourceLocationMarker::new(kind, first.index)]);
            }
            stream.unshift(&[first, second, third]);
            return Ok(Vec::new());
        }
        stream.unshift(&[first, second]);
        return Ok(Vec::new());
    }

    stream.unshift(&[first]);
    Ok(Vec::new())
}

/// The merged kind for the marker naming the negated word, if it is one
/// of the three negatable operators.
fn negated_kind(source: &str, marker: SourceLocationMarker) -> Option<SourceKind> {
    let rest = &source[marker.index..];
    match marker.kind {
        SourceKind::Relation if rest.starts_with("in") || rest.starts_with("of") => {
            Some(SourceKind::Relation)
        }
        SourceKind::Operator if rest.starts_with("instanceof") => Some(SourceKind::Operator),
        _ => None,
    }
}
