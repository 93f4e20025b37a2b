//! The queryable token list.
//!
//! Tokens are half-open `(kind, start, end)` byte ranges in strictly
//! non-decreasing order (gaps mark filtered-out whitespace). The list
//! pre-computes three sparse byte lookups (containing / starting-at /
//! ending-at, built back to front so the earlier token wins ties) and
//! answers balanced-range queries over arbitrarily nested paired kinds.
//!
//! Positions into the list are opaque [`SourceTokenIndex`] handles tied
//! to their list. Handles from different lists never mix: comparing or
//! slicing across lists panics at the misuse site.

use std::fmt;

use coffee_util::Span;
use rustc_hash::FxHashMap;

use crate::kind::SourceKind;

/// One classified source range, half-open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceToken {
    pub kind: SourceKind,
    pub start: usize,
    pub end: usize,
}

impl SourceToken {
    /// Creates a token.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    pub fn new(kind: SourceKind, start: usize, end: usize) -> Self {
        assert!(start <= end, "token start {start} past end {end}");
        Self { kind, start, end }
    }

    /// The token's byte range.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The token's bytes in `source`.
    pub fn literal<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

/// An immutable ordered token list with byte-level lookup indexes.
pub struct SourceTokenList {
    tokens: Vec<SourceToken>,
    containing: FxHashMap<usize, usize>,
    starting: FxHashMap<usize, usize>,
    ending: FxHashMap<usize, usize>,
}

/// An opaque position in a [`SourceTokenList`]: one of its tokens, or
/// the end position one past the last token.
///
/// Handles are `Copy`; equality compares offsets and panics when the
/// handles belong to different lists.
#[derive(Clone, Copy)]
pub struct SourceTokenIndex<'a> {
    list: &'a SourceTokenList,
    offset: usize,
}

impl SourceTokenList {
    /// Builds a list and its lookup indexes.
    ///
    /// # Panics
    ///
    /// Panics with `Tokens not in order` if any token starts before its
    /// predecessor ends.
    pub fn new(tokens: Vec<SourceToken>) -> Self {
        for pair in tokens.windows(2) {
            assert!(pair[0].end <= pair[1].start, "Tokens not in order");
        }

        let mut containing = FxHashMap::default();
        let mut starting = FxHashMap::default();
        let mut ending = FxHashMap::default();
        // Back to front: on a tie the earlier token wins.
        for (i, token) in tokens.iter().enumerate().rev() {
            for byte in token.start..token.end {
                containing.insert(byte, i);
            }
            starting.insert(token.start, i);
            ending.insert(token.end, i);
        }

        Self {
            tokens,
            containing,
            starting,
            ending,
        }
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the list holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Handle to the first token (equal to `end_index` when empty).
    pub fn start_index(&self) -> SourceTokenIndex<'_> {
        self.index_at(0)
    }

    /// Handle one past the last token.
    pub fn end_index(&self) -> SourceTokenIndex<'_> {
        self.index_at(self.tokens.len())
    }

    fn index_at(&self, offset: usize) -> SourceTokenIndex<'_> {
        debug_assert!(offset <= self.tokens.len());
        SourceTokenIndex { list: self, offset }
    }

    fn assert_owns(&self, index: SourceTokenIndex<'_>) {
        assert!(
            std::ptr::eq(self, index.list),
            "cannot compare indexes from different lists"
        );
    }

    /// The token at `index`, absent only at the end index.
    pub fn token_at_index<'a>(&'a self, index: SourceTokenIndex<'a>) -> Option<&'a SourceToken> {
        self.assert_owns(index);
        self.tokens.get(index.offset)
    }

    /// Handle to the token whose range contains the byte, if any.
    pub fn index_of_token_containing_source_index(
        &self,
        source_index: usize,
    ) -> Option<SourceTokenIndex<'_>> {
        self.containing
            .get(&source_index)
            .map(|&offset| self.index_at(offset))
    }

    /// Handle to the containing token, else the nearest earlier token,
    /// else the start index.
    pub fn index_of_token_near_source_index(&self, source_index: usize) -> SourceTokenIndex<'_> {
        if let Some(index) = self.index_of_token_containing_source_index(source_index) {
            return index;
        }
        let following = self
            .tokens
            .partition_point(|token| token.start <= source_index);
        if following == 0 {
            self.start_index()
        } else {
            self.index_at(following - 1)
        }
    }

    /// Handle to the token starting exactly at the byte, if any.
    pub fn index_of_token_starting_at_source_index(
        &self,
        source_index: usize,
    ) -> Option<SourceTokenIndex<'_>> {
        self.starting
            .get(&source_index)
            .map(|&offset| self.index_at(offset))
    }

    /// Handle to the token ending exactly at the byte, if any.
    pub fn index_of_token_ending_at_source_index(
        &self,
        source_index: usize,
    ) -> Option<SourceTokenIndex<'_>> {
        self.ending
            .get(&source_index)
            .map(|&offset| self.index_at(offset))
    }

    /// Forward scan over `[start, end)` for the first matching token.
    /// `start` defaults to the start index and `end` to the end index.
    pub fn index_of_token_matching_predicate<'a>(
        &'a self,
        predicate: impl Fn(&SourceToken) -> bool,
        start: Option<SourceTokenIndex<'a>>,
        end: Option<SourceTokenIndex<'a>>,
    ) -> Option<SourceTokenIndex<'a>> {
        let start = start.unwrap_or_else(|| self.start_index());
        let end = end.unwrap_or_else(|| self.end_index());
        self.assert_owns(start);
        self.assert_owns(end);
        (start.offset..end.offset.min(self.tokens.len()))
            .find(|&offset| predicate(&self.tokens[offset]))
            .map(|offset| self.index_at(offset))
    }

    /// Reverse scan from `start` down to (and including) `end` for the
    /// first matching token. `start` defaults to the last token and
    /// `end` to the start index.
    pub fn last_index_of_token_matching_predicate<'a>(
        &'a self,
        predicate: impl Fn(&SourceToken) -> bool,
        start: Option<SourceTokenIndex<'a>>,
        end: Option<SourceTokenIndex<'a>>,
    ) -> Option<SourceTokenIndex<'a>> {
        let start = match start {
            Some(index) => index,
            None => self.end_index().previous()?,
        };
        let end = end.unwrap_or_else(|| self.start_index());
        self.assert_owns(start);
        self.assert_owns(end);
        if start.offset >= self.tokens.len() {
            return None;
        }
        (end.offset..=start.offset)
            .rev()
            .find(|&offset| predicate(&self.tokens[offset]))
            .map(|offset| self.index_at(offset))
    }

    /// The balanced `[start, one past end]` range of `start_kind` /
    /// `end_kind` tokens containing `index`.
    ///
    /// If `index` is a `start_kind` token the scan runs forward with a
    /// nesting counter; if it is an `end_kind` token the scan runs
    /// backward; otherwise the scan runs backward to the innermost
    /// unopened `start_kind` and restarts forward from there.
    pub fn range_of_matching_tokens_containing_token_index<'a>(
        &'a self,
        start_kind: SourceKind,
        end_kind: SourceKind,
        index: SourceTokenIndex<'a>,
    ) -> Option<(SourceTokenIndex<'a>, SourceTokenIndex<'a>)> {
        self.assert_owns(index);
        let token = self.token_at_index(index)?;

        if token.kind == start_kind {
            let mut depth = 0isize;
            for offset in index.offset..self.tokens.len() {
                let kind = self.tokens[offset].kind;
                if kind == start_kind {
                    depth += 1;
                } else if kind == end_kind {
                    depth -= 1;
                    if depth == 0 {
                        return Some((index, self.index_at(offset + 1)));
                    }
                }
            }
            None
        } else if token.kind == end_kind {
            let mut depth = 0isize;
            for offset in (0..=index.offset).rev() {
                let kind = self.tokens[offset].kind;
                if kind == end_kind {
                    depth += 1;
                } else if kind == start_kind {
                    depth -= 1;
                    if depth == 0 {
                        return Some((self.index_at(offset), self.index_at(index.offset + 1)));
                    }
                }
            }
            None
        } else {
            // Backward to the innermost unopened start, then restart
            // forward from there so nesting is honored.
            let mut depth = 0isize;
            for offset in (0..index.offset).rev() {
                let kind = self.tokens[offset].kind;
                if kind == end_kind {
                    depth += 1;
                } else if kind == start_kind {
                    if depth == 0 {
                        return self.range_of_matching_tokens_containing_token_index(
                            start_kind,
                            end_kind,
                            self.index_at(offset),
                        );
                    }
                    depth -= 1;
                }
            }
            None
        }
    }

    /// The innermost interpolated-string range containing `index`,
    /// trying double-quoted strings, triple-double-quoted strings, and
    /// heregexes.
    pub fn range_of_interpolated_string_tokens_containing_token_index<'a>(
        &'a self,
        index: SourceTokenIndex<'a>,
    ) -> Option<(SourceTokenIndex<'a>, SourceTokenIndex<'a>)> {
        const PAIRS: [(SourceKind, SourceKind); 3] = [
            (SourceKind::DstringStart, SourceKind::DstringEnd),
            (SourceKind::TdstringStart, SourceKind::TdstringEnd),
            (SourceKind::HeregexpStart, SourceKind::HeregexpEnd),
        ];
        let mut best: Option<(SourceTokenIndex<'a>, SourceTokenIndex<'a>)> = None;
        for (start_kind, end_kind) in PAIRS {
            if let Some(range) =
                self.range_of_matching_tokens_containing_token_index(start_kind, end_kind, index)
            {
                let width = range.1.offset - range.0.offset;
                if best.map_or(true, |(s, e)| width < e.offset - s.offset) {
                    best = Some(range);
                }
            }
        }
        best
    }

    /// A new list holding the tokens in `[from, to)`.
    ///
    /// # Panics
    ///
    /// Panics if either handle belongs to another list, or if `from` is
    /// past `to`.
    pub fn slice(&self, from: SourceTokenIndex<'_>, to: SourceTokenIndex<'_>) -> SourceTokenList {
        assert!(
            std::ptr::eq(self, from.list) && std::ptr::eq(self, to.list),
            "cannot slice a list using indexes from another list"
        );
        assert!(from.offset <= to.offset, "slice start past slice end");
        SourceTokenList::new(self.tokens[from.offset..to.offset].to_vec())
    }

    /// Iterates the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SourceToken> {
        self.tokens.iter()
    }

    /// The tokens as a plain slice.
    pub fn tokens(&self) -> &[SourceToken] {
        &self.tokens
    }
}

impl fmt::Debug for SourceTokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.tokens).finish()
    }
}

impl<'a> IntoIterator for &'a SourceTokenList {
    type Item = &'a SourceToken;
    type IntoIter = std::slice::Iter<'a, SourceToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl<'a> SourceTokenIndex<'a> {
    /// The zero-based offset of this handle in its list.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The token this handle points at, absent at the end index.
    pub fn token(&self) -> Option<&'a SourceToken> {
        self.list.tokens.get(self.offset)
    }

    /// A handle `amount` positions away, or absent when the result would
    /// leave `[0, len]`.
    pub fn advance(&self, amount: isize) -> Option<SourceTokenIndex<'a>> {
        let target = self.offset as isize + amount;
        if target < 0 || target as usize > self.list.tokens.len() {
            return None;
        }
        Some(self.list.index_at(target as usize))
    }

    /// The next position.
    pub fn next(&self) -> Option<SourceTokenIndex<'a>> {
        self.advance(1)
    }

    /// The previous position.
    pub fn previous(&self) -> Option<SourceTokenIndex<'a>> {
        self.advance(-1)
    }

    /// Signed distance to `other` (positive when `other` is later).
    ///
    /// # Panics
    ///
    /// Panics when the handles belong to different lists.
    pub fn distance(&self, other: SourceTokenIndex<'a>) -> isize {
        assert!(
            std::ptr::eq(self.list, other.list),
            "cannot compare indexes from different lists"
        );
        other.offset as isize - self.offset as isize
    }
}

impl PartialEq for SourceTokenIndex<'_> {
    /// # Panics
    ///
    /// Panics when the handles belong to different lists.
    fn eq(&self, other: &Self) -> bool {
        assert!(
            std::ptr::eq(self.list, other.list),
            "cannot compare indexes from different lists"
        );
        self.offset == other.offset
    }
}

impl Eq for SourceTokenIndex<'_> {}

impl fmt::Debug for SourceTokenIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceTokenIndex")
            .field("offset", &self.offset)
            .finish()
    }
}
