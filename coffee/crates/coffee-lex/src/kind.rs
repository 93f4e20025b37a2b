//! Source kinds - the closed set of classifications a byte can carry.
//!
//! Every marker and token is tagged with exactly one [`SourceKind`]. The
//! set is closed: downstream tools exhaustively match on it, and the
//! canonical SCREAMING_SNAKE names (used in serialized output and error
//! messages) are part of the public contract.

use std::fmt;

use serde::Serialize;

/// Classification tag for a run of source bytes.
///
/// Grouped by role. `NORMAL` never escapes the location stream (it is an
/// internal resting state), and `SPACE`/`EOF` markers never become tokens,
/// but all three are public because the raw marker stream exposes them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    // Structural
    Normal,
    Space,
    Newline,
    Eof,
    Unknown,

    // Punctuation
    #[serde(rename = "LPAREN")]
    LParen,
    #[serde(rename = "RPAREN")]
    RParen,
    #[serde(rename = "LBRACE")]
    LBrace,
    #[serde(rename = "RBRACE")]
    RBrace,
    #[serde(rename = "LBRACKET")]
    LBracket,
    #[serde(rename = "RBRACKET")]
    RBracket,
    Comma,
    Colon,
    Semicolon,
    Dot,
    At,
    Range,

    // Call brackets, distinct from grouping parens
    CallStart,
    CallEnd,

    // Literals
    Number,
    Bool,
    Null,
    Undefined,
    Identifier,

    // Operators and related
    Operator,
    Increment,
    Decrement,
    Existence,
    Proto,
    Function,
    Relation,
    Continuation,

    // Keywords (`If` also covers `unless`, `While` also covers `until`)
    If,
    Else,
    Then,
    For,
    Own,
    While,
    Loop,
    Switch,
    When,
    Try,
    Catch,
    Finally,
    Class,
    New,
    Return,
    Break,
    Continue,
    This,
    Super,
    Delete,
    Do,
    Yield,
    #[serde(rename = "YIELDFROM")]
    YieldFrom,
    Throw,
    Extends,
    Import,
    Export,
    Default,

    // Comments
    Comment,
    Herecomment,
    HeregexpComment,

    // String / regex framing
    SstringStart,
    SstringEnd,
    DstringStart,
    DstringEnd,
    TsstringStart,
    TsstringEnd,
    TdstringStart,
    TdstringEnd,
    HeregexpStart,
    HeregexpEnd,
    Regexp,

    // String interior
    StringContent,
    StringPadding,
    StringLineSeparator,

    // Interpolation framing
    InterpolationStart,
    InterpolationEnd,

    // Embedded JavaScript
    Js,
    Herejs,

    // Markup (CSX)
    CsxOpenTagStart,
    CsxOpenTagEnd,
    CsxSelfClosingTagEnd,
    CsxCloseTagStart,
    CsxCloseTagEnd,
    CsxBody,
}

impl SourceKind {
    /// The canonical name, matching the serialized form.
    pub const fn name(self) -> &'static str {
        use SourceKind::*;
        match self {
            Normal => "NORMAL",
            Space => "SPACE",
            Newline => "NEWLINE",
            Eof => "EOF",
            Unknown => "UNKNOWN",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            LBracket => "LBRACKET",
            RBracket => "RBRACKET",
            Comma => "COMMA",
            Colon => "COLON",
            Semicolon => "SEMICOLON",
            Dot => "DOT",
            At => "AT",
            Range => "RANGE",
            CallStart => "CALL_START",
            CallEnd => "CALL_END",
            Number => "NUMBER",
            Bool => "BOOL",
            Null => "NULL",
            Undefined => "UNDEFINED",
            Identifier => "IDENTIFIER",
            Operator => "OPERATOR",
            Increment => "INCREMENT",
            Decrement => "DECREMENT",
            Existence => "EXISTENCE",
            Proto => "PROTO",
            Function => "FUNCTION",
            Relation => "RELATION",
            Continuation => "CONTINUATION",
            If => "IF",
            Else => "ELSE",
            Then => "THEN",
            For => "FOR",
            Own => "OWN",
            While => "WHILE",
            Loop => "LOOP",
            Switch => "SWITCH",
            When => "WHEN",
            Try => "TRY",
            Catch => "CATCH",
            Finally => "FINALLY",
            Class => "CLASS",
            New => "NEW",
            Return => "RETURN",
            Break => "BREAK",
            Continue => "CONTINUE",
            This => "THIS",
            Super => "SUPER",
            Delete => "DELETE",
            Do => "DO",
            Yield => "YIELD",
            YieldFrom => "YIELDFROM",
            Throw => "THROW",
            Extends => "EXTENDS",
            Import => "IMPORT",
            Export => "EXPORT",
            Default => "DEFAULT",
            Comment => "COMMENT",
            Herecomment => "HERECOMMENT",
            HeregexpComment => "HEREGEXP_COMMENT",
            SstringStart => "SSTRING_START",
            SstringEnd => "SSTRING_END",
            DstringStart => "DSTRING_START",
            DstringEnd => "DSTRING_END",
            TsstringStart => "TSSTRING_START",
            TsstringEnd => "TSSTRING_END",
            TdstringStart => "TDSTRING_START",
            TdstringEnd => "TDSTRING_END",
            HeregexpStart => "HEREGEXP_START",
            HeregexpEnd => "HEREGEXP_END",
            Regexp => "REGEXP",
            StringContent => "STRING_CONTENT",
            StringPadding => "STRING_PADDING",
            StringLineSeparator => "STRING_LINE_SEPARATOR",
            InterpolationStart => "INTERPOLATION_START",
            InterpolationEnd => "INTERPOLATION_END",
            Js => "JS",
            Herejs => "HEREJS",
            CsxOpenTagStart => "CSX_OPEN_TAG_START",
            CsxOpenTagEnd => "CSX_OPEN_TAG_END",
            CsxSelfClosingTagEnd => "CSX_SELF_CLOSING_TAG_END",
            CsxCloseTagStart => "CSX_CLOSE_TAG_START",
            CsxCloseTagEnd => "CSX_CLOSE_TAG_END",
            CsxBody => "CSX_BODY",
        }
    }

    /// Kinds whose immediate successor `(` opens a call instead of a
    /// grouping paren. A following `<` can also never open CSX.
    pub const fn is_callable(self) -> bool {
        use SourceKind::*;
        matches!(
            self,
            Identifier | CallEnd | RParen | RBracket | Existence | At | This | Super
        )
    }

    /// Kinds after which a `[` indexes rather than starting an array.
    pub const fn is_indexable(self) -> bool {
        use SourceKind::*;
        self.is_callable()
            || matches!(
                self,
                Number
                    | Regexp
                    | HeregexpEnd
                    | Bool
                    | Null
                    | Undefined
                    | RBrace
                    | Proto
                    | SstringEnd
                    | DstringEnd
                    | TsstringEnd
                    | TdstringEnd
            )
    }

    /// Kinds after which a `/` must be division, never a regex literal.
    pub const fn excludes_regexp(self) -> bool {
        use SourceKind::*;
        self.is_indexable() || matches!(self, Increment | Decrement)
    }

    /// True for the string-framing start kinds that open a body scan.
    pub const fn is_string_start(self) -> bool {
        use SourceKind::*;
        matches!(
            self,
            SstringStart | DstringStart | TsstringStart | TdstringStart | HeregexpStart
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps a word to its keyword, word-operator, or literal kind.
///
/// Returns `None` for plain identifiers. `unless` folds into `IF` and
/// `until` into `WHILE`; the boolean spellings (`yes`/`no`/`on`/`off`)
/// all map to `BOOL`.
pub fn keyword_from_word(word: &str) -> Option<SourceKind> {
    use SourceKind::*;
    let kind = match word {
        "if" | "unless" => If,
        "else" => Else,
        "then" => Then,
        "for" => For,
        "own" => Own,
        "while" | "until" => While,
        "loop" => Loop,
        "switch" => Switch,
        "when" => When,
        "try" => Try,
        "catch" => Catch,
        "finally" => Finally,
        "class" => Class,
        "new" => New,
        "return" => Return,
        "break" => Break,
        "continue" => Continue,
        "this" => This,
        "super" => Super,
        "delete" => Delete,
        "do" => Do,
        "yield" => Yield,
        "throw" => Throw,
        "extends" => Extends,
        "import" => Import,
        "export" => Export,
        "default" => Default,
        "and" | "or" | "not" | "is" | "isnt" | "instanceof" => Operator,
        "in" | "of" => Relation,
        "true" | "false" | "yes" | "no" | "on" | "off" => Bool,
        "null" => Null,
        "undefined" => Undefined,
        _ => return None,
    };
    Some(kind)
}

/// Symbolic operators, longest first so a greedy prefix scan finds the
/// longest match. `?`, `++`, and `--` get their own kinds; everything
/// else maps to `OPERATOR`.
pub const OPERATORS: &[&str] = &[
    ">>>=",
    "===", "!==", "<<=", ">>=", ">>>", "**=", "%%=", "&&=", "||=",
    "==", "!=", "<=", ">=", "+=", "-=", "*=", "/=", "%=", "^=", "|=", "&=", "?=",
    "<<", ">>", "&&", "||", "**", "%%", "//", "++", "--",
    "=", "+", "-", "*", "/", "%", "<", ">", "&", "|", "^", "!", "~", "?",
];

/// Maps a matched operator string to its kind.
pub fn operator_kind(op: &str) -> SourceKind {
    match op {
        "?" => SourceKind::Existence,
        "++" => SourceKind::Increment,
        "--" => SourceKind::Decrement,
        _ => SourceKind::Operator,
    }
}
