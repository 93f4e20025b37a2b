//! Code-context dispatch.
//!
//! One scan step for every context where ordinary code rules apply. The
//! prefix patterns are attempted in a fixed priority order; the first
//! match wins and decides both how far the cursor moves and which kind
//! the pending marker takes.

use coffee_util::{LexError, Result};

use crate::context::{Context, StringFrame};
use crate::kind::{keyword_from_word, operator_kind, SourceKind, OPERATORS};
use crate::patterns;

use super::SourceLocationStream;

impl<'a> SourceLocationStream<'a> {
    /// Attempts the code-context prefix patterns, highest priority first.
    pub(super) fn dispatch_code(&mut self, start: usize) -> Result<()> {
        let rest = self.cursor.remaining();
        let bytes = rest.as_bytes();

        // Space runs and newlines outrank everything.
        if let Some(m) = patterns::SPACE.find(rest) {
            self.cursor.advance(m.end());
            self.set_kind(SourceKind::Space, start);
            return Ok(());
        }
        if bytes[0] == b'\n' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Newline, start);
            return Ok(());
        }

        // Ranges bind tighter than numbers so `1..2` splits correctly.
        if rest.starts_with("...") {
            self.cursor.advance(3);
            self.set_kind(SourceKind::Range, start);
            return Ok(());
        }
        if rest.starts_with("..") {
            self.cursor.advance(2);
            self.set_kind(SourceKind::Range, start);
            return Ok(());
        }

        if let Some(m) = patterns::NUMBER.find(rest) {
            self.cursor.advance(m.end());
            self.set_kind(SourceKind::Number, start);
            return Ok(());
        }

        if bytes[0] == b'.' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Dot, start);
            return Ok(());
        }

        // String openers, longest delimiter first.
        if rest.starts_with("\"\"\"") {
            return Ok(self.open_string(StringFrame::TDSTRING, 3, SourceKind::TdstringStart, start));
        }
        if bytes[0] == b'"' {
            return Ok(self.open_string(StringFrame::DSTRING, 1, SourceKind::DstringStart, start));
        }
        if rest.starts_with("'''") {
            return Ok(self.open_string(StringFrame::TSSTRING, 3, SourceKind::TsstringStart, start));
        }
        if bytes[0] == b'\'' {
            return Ok(self.open_string(StringFrame::SSTRING, 1, SourceKind::SstringStart, start));
        }

        // `###` opens a block comment unless a fourth `#` follows.
        if rest.starts_with("###") && bytes.get(3) != Some(&b'#') {
            self.cursor.advance(3);
            self.set_kind(SourceKind::Herecomment, start);
            return Ok(());
        }
        if bytes[0] == b'#' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Comment, start);
            return Ok(());
        }

        if rest.starts_with("///") {
            return Ok(self.open_string(StringFrame::HEREGEXP, 3, SourceKind::HeregexpStart, start));
        }

        if bytes[0] == b'(' {
            let kind = if self
                .last_emitted_kind()
                .is_some_and(|k| k.is_callable())
            {
                SourceKind::CallStart
            } else {
                SourceKind::LParen
            };
            self.stack.push(Context::Paren { kind });
            self.cursor.advance(1);
            self.set_kind(kind, start);
            return Ok(());
        }
        if bytes[0] == b')' {
            let close = match self.stack.last() {
                Some(Context::Paren { kind }) => {
                    if *kind == SourceKind::CallStart {
                        SourceKind::CallEnd
                    } else {
                        SourceKind::RParen
                    }
                }
                _ => return Err(LexError::UnexpectedCloseParen(start)),
            };
            self.stack.pop();
            self.cursor.advance(1);
            self.set_kind(close, start);
            return Ok(());
        }

        if bytes[0] == b'[' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::LBracket, start);
            return Ok(());
        }
        if bytes[0] == b']' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::RBracket, start);
            return Ok(());
        }

        if bytes[0] == b'{' {
            self.stack.push(Context::Brace);
            self.cursor.advance(1);
            self.set_kind(SourceKind::LBrace, start);
            return Ok(());
        }
        if bytes[0] == b'}' {
            match self.stack.last().copied() {
                Some(Context::Interpolation { outer }) => {
                    self.stack.pop();
                    self.resume = outer;
                    self.cursor.advance(1);
                    self.set_kind(SourceKind::InterpolationEnd, start);
                }
                Some(Context::Brace) => {
                    self.stack.pop();
                    self.cursor.advance(1);
                    self.set_kind(SourceKind::RBrace, start);
                }
                _ => return Err(LexError::UnexpectedCloseBrace(start)),
            }
            return Ok(());
        }

        if bytes[0] == b'<' && self.csx_can_open() {
            self.stack.push(Context::CsxOpenTag);
            self.cursor.advance(1);
            self.set_kind(SourceKind::CsxOpenTagStart, start);
            return Ok(());
        }

        if matches!(self.stack.last(), Some(Context::CsxOpenTag)) {
            if rest.starts_with("/>") {
                self.stack.pop();
                self.cursor.advance(2);
                self.set_kind(SourceKind::CsxSelfClosingTagEnd, start);
                return Ok(());
            }
            if bytes[0] == b'>' {
                self.stack.pop();
                self.stack.push(Context::CsxBody);
                self.cursor.advance(1);
                self.set_kind(SourceKind::CsxOpenTagEnd, start);
                return Ok(());
            }
        }
        if matches!(self.stack.last(), Some(Context::CsxCloseTag)) && bytes[0] == b'>' {
            self.stack.pop();
            self.cursor.advance(1);
            self.set_kind(SourceKind::CsxCloseTagEnd, start);
            return Ok(());
        }

        if rest.starts_with("->") || rest.starts_with("=>") {
            self.cursor.advance(2);
            self.set_kind(SourceKind::Function, start);
            return Ok(());
        }

        if self.try_consume_regexp(rest)? {
            self.set_kind(SourceKind::Regexp, start);
            return Ok(());
        }

        if rest.starts_with("::") {
            self.cursor.advance(2);
            self.set_kind(SourceKind::Proto, start);
            return Ok(());
        }
        if bytes[0] == b':' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Colon, start);
            return Ok(());
        }
        if bytes[0] == b',' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Comma, start);
            return Ok(());
        }
        if bytes[0] == b'@' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::At, start);
            return Ok(());
        }
        if bytes[0] == b';' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Semicolon, start);
            return Ok(());
        }

        if rest.starts_with("```") {
            self.cursor.advance(3);
            self.set_kind(SourceKind::Herejs, start);
            return Ok(());
        }
        if bytes[0] == b'`' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Js, start);
            return Ok(());
        }

        for op in OPERATORS {
            if rest.starts_with(op) {
                self.cursor.advance(op.len());
                self.set_kind(operator_kind(op), start);
                return Ok(());
            }
        }

        if let Some(m) = patterns::YIELD_FROM.find(rest) {
            self.cursor.advance(m.end());
            self.set_kind(SourceKind::YieldFrom, start);
            return Ok(());
        }

        let in_csx_tag = matches!(
            self.stack.last(),
            Some(Context::CsxOpenTag) | Some(Context::CsxCloseTag)
        );
        let pattern = if in_csx_tag {
            &patterns::CSX_IDENTIFIER
        } else {
            &patterns::IDENTIFIER
        };
        if let Some(m) = pattern.find(rest) {
            let word = m.as_str();
            let kind = if self.identifier_forced_by_prev()
                || self.next_non_space_is_colon(m.end())
            {
                SourceKind::Identifier
            } else {
                keyword_from_word(word).unwrap_or(SourceKind::Identifier)
            };
            self.cursor.advance(m.end());
            self.set_kind(kind, start);
            return Ok(());
        }

        if bytes[0] == b'\\' {
            self.cursor.advance(1);
            self.set_kind(SourceKind::Continuation, start);
            return Ok(());
        }

        // Nothing matched: classify the rest of the input as unknown so
        // the stream still converges to EOF.
        let len = self.cursor.source().len();
        self.cursor.jump_to(len);
        self.set_kind(SourceKind::Unknown, start);
        Ok(())
    }

    /// Pushes a string frame and emits its start kind.
    fn open_string(
        &mut self,
        frame: StringFrame,
        delimiter_len: usize,
        kind: SourceKind,
        start: usize,
    ) {
        self.stack.push(Context::String(frame));
        self.cursor.advance(delimiter_len);
        self.set_kind(kind, start);
    }

    /// Object-key test: the first non-space/tab byte after the word is a
    /// colon.
    fn next_non_space_is_colon(&self, word_len: usize) -> bool {
        let bytes = self.cursor.remaining().as_bytes();
        let mut i = word_len;
        while matches!(bytes.get(i), Some(&b' ') | Some(&b'\t')) {
            i += 1;
        }
        bytes.get(i) == Some(&b':')
    }

    /// Attempts a regex literal at the cursor. Returns true (cursor
    /// advanced past body and flags) on success, false if this `/` is
    /// division, and fails if a genuine regex never closes.
    fn try_consume_regexp(&mut self, rest: &str) -> Result<bool> {
        let bytes = rest.as_bytes();
        if bytes[0] != b'/' || bytes.get(1) == Some(&b'/') {
            return Ok(false);
        }
        if !self.regexp_allowed_by_prev() {
            return Ok(false);
        }
        let caps = match patterns::REGEXP.captures(rest) {
            Some(caps) => caps,
            None => return Ok(false),
        };
        if caps.get(2).is_none() {
            return Err(LexError::UnclosedRegex);
        }
        let mut end = caps.get(0).map_or(0, |m| m.end());
        while let Some(&b) = bytes.get(end) {
            if patterns::is_regexp_flag(b) {
                end += 1;
            } else {
                break;
            }
        }
        self.cursor.advance(end);
        Ok(true)
    }

    /// CSX open-tag test: the byte after `<` must look like a tag
    /// (fragment `>` or an identifier start), and either we are already
    /// inside markup or the previous marker does not read as a value
    /// (after a value, `<` is the less-than operator).
    pub(super) fn csx_can_open(&self) -> bool {
        match self.cursor.byte_at(1) {
            Some(b'>') => {}
            Some(b) if patterns::is_csx_ident_start(b) => {}
            _ => return false,
        }
        if matches!(
            self.stack.last(),
            Some(Context::CsxOpenTag) | Some(Context::CsxBody)
        ) {
            return true;
        }
        !matches!(
            self.last_emitted_kind(),
            Some(SourceKind::Identifier)
                | Some(SourceKind::RParen)
                | Some(SourceKind::RBracket)
                | Some(SourceKind::Number)
        )
    }
}
