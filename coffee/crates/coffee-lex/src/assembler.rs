//! Token assembly.
//!
//! Drains the buffered marker stream, letting the padding passes and the
//! negated-operator combiner splice denser markers in front of it, and
//! pairs each marker with its successor to form half-open tokens. `SPACE`
//! markers are dropped (their positions still bound the neighboring
//! tokens) and `EOF` only terminates the loop.

use coffee_util::Result;

use crate::buffered::BufferedSourceLocationStream;
use crate::combiner::combine_negated_operators;
use crate::kind::SourceKind;
use crate::list::{SourceToken, SourceTokenList};
use crate::padding::{heregex_padding, normal_string_padding, triple_quoted_padding};
use crate::stream::SourceLocationStream;

/// Runs the full pipeline behind a location stream and builds the token
/// list.
pub fn assemble(stream: SourceLocationStream<'_>) -> Result<SourceTokenList> {
    let source = stream.source();
    let mut stream = BufferedSourceLocationStream::new(stream);
    let mut tokens = Vec::new();
    let mut previous = None;

    loop {
        let spliced = normal_string_padding(source, &mut stream)?;
        stream.unshift(&spliced);
        let spliced = triple_quoted_padding(source, &mut stream)?;
        stream.unshift(&spliced);
        let spliced = heregex_padding(source, &mut stream)?;
        stream.unshift(&spliced);
        let spliced = combine_negated_operators(source, &mut stream)?;
        stream.unshift(&spliced);

        let current = stream.shift()?;
        if let Some(marker) = previous {
            let (kind, index): (SourceKind, usize) = marker;
            if kind != SourceKind::Space {
                tokens.push(SourceToken::new(kind, index, current.index));
            }
        }
        if current.kind == SourceKind::Eof {
            break;
        }
        previous = Some((current.kind, current.index));
    }

    Ok(SourceTokenList::new(tokens))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::SourceKind::{self, *};
    use crate::stream::SourceLocationStream;

    fn tokens(source: &str) -> Vec<(SourceKind, usize, usize)> {
        assemble(SourceLocationStream::new(source))
            .unwrap()
            .iter()
            .map(|t| (t.kind, t.start, t.end))
            .collect()
    }

    #[test]
    fn test_empty_input_has_no_tokens() {
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_spaces_are_dropped_but_bound_tokens() {
        assert_eq!(
            tokens("a + b"),
            vec![(Identifier, 0, 1), (Operator, 2, 3), (Identifier, 4, 5)]
        );
    }

    #[test]
    fn test_last_token_ends_at_eof() {
        assert_eq!(tokens("ab"), vec![(Identifier, 0, 2)]);
    }

    #[test]
    fn test_trailing_space_is_not_a_token() {
        assert_eq!(tokens("ab  "), vec![(Identifier, 0, 2)]);
    }

    #[test]
    fn test_comment_token_extends_to_newline() {
        assert_eq!(
            tokens("a # note\nb"),
            vec![
                (Identifier, 0, 1),
                (Comment, 2, 8),
                (Newline, 8, 9),
                (Identifier, 9, 10),
            ]
        );
    }

    #[test]
    fn test_interpolated_string_tokens() {
        assert_eq!(
            tokens("\"b#{c}d\""),
            vec![
                (DstringStart, 0, 1),
                (StringContent, 1, 2),
                (InterpolationStart, 2, 4),
                (Identifier, 4, 5),
                (InterpolationEnd, 5, 6),
                (StringContent, 6, 7),
                (DstringEnd, 7, 8),
            ]
        );
    }

    #[test]
    fn test_padding_pass_is_spliced() {
        assert_eq!(
            tokens("\"a\nb\""),
            vec![
                (DstringStart, 0, 1),
                (StringContent, 1, 2),
                (StringLineSeparator, 2, 3),
                (StringContent, 3, 4),
                (DstringEnd, 4, 5),
            ]
        );
    }

    #[test]
    fn test_nested_string_in_interpolation_is_padded_too() {
        // The inner string's own newline gets a separator even though
        // the outer pass replays it untouched.
        assert_eq!(
            tokens("\"x#{\"a\nb\"}y\""),
            vec![
                (DstringStart, 0, 1),
                (StringContent, 1, 2),
                (InterpolationStart, 2, 4),
                (DstringStart, 4, 5),
                (StringContent, 5, 6),
                (StringLineSeparator, 6, 7),
                (StringContent, 7, 8),
                (DstringEnd, 8, 9),
                (InterpolationEnd, 9, 10),
                (StringContent, 10, 11),
                (DstringEnd, 11, 12),
            ]
        );
    }

    #[test]
    fn test_negated_operator_is_combined() {
        assert_eq!(
            tokens("a not instanceof b"),
            vec![(Identifier, 0, 1), (Operator, 2, 16), (Identifier, 17, 18)]
        );
    }

    #[test]
    fn test_regexp_token_includes_flags() {
        assert_eq!(
            tokens("x = /a/gi"),
            vec![(Identifier, 0, 1), (Operator, 2, 3), (Regexp, 4, 9)]
        );
    }

    #[test]
    fn test_heregex_padding_spliced() {
        assert_eq!(
            tokens("///a b///"),
            vec![
                (HeregexpStart, 0, 3),
                (StringContent, 3, 4),
                (StringPadding, 4, 5),
                (StringContent, 5, 6),
                (HeregexpEnd, 6, 9),
            ]
        );
    }
}
