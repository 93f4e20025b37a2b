//! Compiled lexical prefix patterns.
//!
//! All patterns are anchored with `^` and matched against the remaining
//! input, so a match length is always a prefix length. They are compiled
//! once on first use.
//!
//! The identifier patterns accept `$`, ASCII letters/digits/underscore,
//! and every character from U+007F up, and reject a leading digit. Inside
//! CSX tags the continue set additionally allows `.` and `-` so that
//! namespaced tags (`<Foo.Bar>`) and dashed attributes lex as one word.

use once_cell::sync::Lazy;
use regex::Regex;

/// A run of horizontal whitespace: any whitespace except `\n` and `\r`.
pub static SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\S\r\n]+").expect("space pattern"));

/// Number literals: binary, octal, and hex integers, plus decimal
/// integers/floats with an optional exponent. Case-insensitive.
pub static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:0b[01]+|0o[0-7]+|0x[0-9a-f]+|[0-9]*\.?[0-9]+(?:e[+-]?[0-9]+)?)")
        .expect("number pattern")
});

/// Standard identifier: no leading digit, then word characters.
pub static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[$A-Za-z_\x7f-\x{10FFFF}][$0-9A-Za-z_\x7f-\x{10FFFF}]*")
        .expect("identifier pattern")
});

/// CSX identifier: like [`IDENTIFIER`] but `.` and `-` may continue it.
pub static CSX_IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[$A-Za-z_\x7f-\x{10FFFF}][-.$0-9A-Za-z_\x7f-\x{10FFFF}]*")
        .expect("csx identifier pattern")
});

/// `yield from`, with any run of spaces/tabs between the words.
pub static YIELD_FROM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^yield[ \t]+from").expect("yield from pattern"));

/// Regex literal body after the opening `/`: escapes and character
/// classes are opaque, a bare `/` or newline ends the body. The closing
/// slash is capture group 2 and may be absent (an unclosed regex).
///
/// The caller must reject a `/` that is immediately followed by another
/// `/` before using this (that prefix is `//` division or `///`).
pub static REGEXP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/((?:[^\[/\\\n]|\\[^\n]|\[(?:\\[^\n]|[^\]\\\n])*\])*)(/)?")
        .expect("regexp pattern")
});

/// Returns true if `byte` can begin a CSX identifier.
#[inline]
pub fn is_csx_ident_start(byte: u8) -> bool {
    byte == b'$' || byte == b'_' || byte.is_ascii_alphabetic() || byte >= 0x7f
}

/// Returns true if `byte` is a regex flag letter.
#[inline]
pub fn is_regexp_flag(byte: u8) -> bool {
    matches!(byte, b'i' | b'g' | b'm' | b'u' | b'y')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_len(re: &Regex, input: &str) -> Option<usize> {
        re.find(input).map(|m| m.end())
    }

    #[test]
    fn test_space_pattern() {
        assert_eq!(prefix_len(&SPACE, "  \tx"), Some(3));
        assert_eq!(prefix_len(&SPACE, "\nx"), None);
        assert_eq!(prefix_len(&SPACE, "\r\n"), None);
        assert_eq!(prefix_len(&SPACE, "x "), None);
    }

    #[test]
    fn test_number_pattern() {
        assert_eq!(prefix_len(&NUMBER, "42"), Some(2));
        assert_eq!(prefix_len(&NUMBER, "3.14 + x"), Some(4));
        assert_eq!(prefix_len(&NUMBER, ".5"), Some(2));
        assert_eq!(prefix_len(&NUMBER, "0xFF"), Some(4));
        assert_eq!(prefix_len(&NUMBER, "0b1010"), Some(6));
        assert_eq!(prefix_len(&NUMBER, "0o777"), Some(5));
        assert_eq!(prefix_len(&NUMBER, "1e10"), Some(4));
        assert_eq!(prefix_len(&NUMBER, "2.5E-3"), Some(6));
        assert_eq!(prefix_len(&NUMBER, "x"), None);
    }

    #[test]
    fn test_number_stops_before_range() {
        // `1..2` must lex the number as just `1`.
        assert_eq!(prefix_len(&NUMBER, "1..2"), Some(1));
        assert_eq!(prefix_len(&NUMBER, "1.5..2"), Some(3));
    }

    #[test]
    fn test_identifier_pattern() {
        assert_eq!(prefix_len(&IDENTIFIER, "foo bar"), Some(3));
        assert_eq!(prefix_len(&IDENTIFIER, "$x"), Some(2));
        assert_eq!(prefix_len(&IDENTIFIER, "_private9"), Some(9));
        assert_eq!(prefix_len(&IDENTIFIER, "9abc"), None);
        assert_eq!(prefix_len(&IDENTIFIER, "café"), Some("café".len()));
    }

    #[test]
    fn test_csx_identifier_pattern() {
        assert_eq!(prefix_len(&CSX_IDENTIFIER, "Foo.Bar>"), Some(7));
        assert_eq!(prefix_len(&CSX_IDENTIFIER, "data-id="), Some(7));
        assert_eq!(prefix_len(&IDENTIFIER, "data-id="), Some(4));
    }

    #[test]
    fn test_yield_from_pattern() {
        assert_eq!(prefix_len(&YIELD_FROM, "yield from x"), Some(10));
        assert_eq!(prefix_len(&YIELD_FROM, "yield  \tfrom"), Some(12));
        assert_eq!(prefix_len(&YIELD_FROM, "yield x"), None);
        assert_eq!(prefix_len(&YIELD_FROM, "yield\nfrom"), None);
    }

    #[test]
    fn test_regexp_pattern() {
        let caps = REGEXP.captures("/ab+c/ rest").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "ab+c");
        assert!(caps.get(2).is_some());

        // Character class hides a slash.
        let caps = REGEXP.captures("/a[/]b/").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), "a[/]b");

        // Escaped slash does not close the body.
        let caps = REGEXP.captures(r"/a\/b/").unwrap();
        assert_eq!(caps.get(1).unwrap().as_str(), r"a\/b");

        // Unclosed: body matches, group 2 absent.
        let caps = REGEXP.captures("/abc").unwrap();
        assert!(caps.get(2).is_none());
    }

    #[test]
    fn test_regexp_flags() {
        assert!(is_regexp_flag(b'i'));
        assert!(is_regexp_flag(b'y'));
        assert!(!is_regexp_flag(b's'));
        assert!(!is_regexp_flag(b'/'));
    }

    #[test]
    fn test_csx_ident_start() {
        assert!(is_csx_ident_start(b'd'));
        assert!(is_csx_ident_start(b'$'));
        assert!(!is_csx_ident_start(b'3'));
        assert!(!is_csx_ident_start(b'>'));
        assert!(!is_csx_ident_start(b'/'));
    }
}
