//! The padding tracker.
//!
//! Consumes one construct's markers (start through matching end, tracking
//! interpolation depth), exposes each outside-interpolation content run
//! as a fragment, lets the passes mark padding ranges and line-separator
//! positions on those fragments, and finally replays the original marker
//! sequence with every marked fragment expanded into content / padding /
//! line-separator runs.

use coffee_util::{LexError, Result};

use crate::buffered::BufferedSourceLocationStream;
use crate::kind::SourceKind;
use crate::stream::SourceLocationMarker;

/// One maximal run of string-body bytes between interpolation boundaries
/// (or the framing markers). Mark coordinates are fragment-relative.
#[derive(Debug)]
pub struct Fragment {
    /// Absolute byte offset where the fragment's content begins.
    pub start: usize,
    /// Absolute byte offset one past the content's end.
    pub end: usize,
    /// Which consumed marker this fragment replaces.
    marker_index: usize,
    /// Marked padding ranges, fragment-relative and half-open.
    padding: Vec<(usize, usize)>,
    /// Marked line-separator positions, fragment-relative.
    separators: Vec<usize>,
}

impl Fragment {
    /// The fragment's bytes.
    pub fn content<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }

    /// Content length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for the empty fragment between adjacent interpolations.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Marks `[from, to)` (fragment-relative) as padding. Empty ranges
    /// are ignored; overlapping ranges coalesce on emit.
    pub fn mark_padding(&mut self, from: usize, to: usize) {
        debug_assert!(to <= self.len(), "padding range past fragment end");
        if from < to {
            self.padding.push((from, to));
        }
    }

    /// Marks the byte at `pos` (fragment-relative) as a line separator.
    pub fn mark_line_separator(&mut self, pos: usize) {
        debug_assert!(pos < self.len(), "separator past fragment end");
        self.separators.push(pos);
    }

    /// Expands this fragment into a run of classified markers.
    fn classified_markers(&self) -> Result<Vec<SourceLocationMarker>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Class {
            Content,
            Padding,
            Separator,
        }

        let len = self.len();
        let mut classes = vec![Class::Content; len];
        for &(from, to) in &self.padding {
            for class in classes.iter_mut().take(to).skip(from) {
                *class = Class::Padding;
            }
        }
        for &pos in &self.separators {
            if classes[pos] == Class::Padding {
                return Err(LexError::IllegalPaddingState(self.start + pos));
            }
            classes[pos] = Class::Separator;
        }

        let mut markers = Vec::new();
        let mut previous = None;
        for (offset, &class) in classes.iter().enumerate() {
            if previous != Some(class) {
                let kind = match class {
                    Class::Content => SourceKind::StringContent,
                    Class::Padding => SourceKind::StringPadding,
                    Class::Separator => SourceKind::StringLineSeparator,
                };
                markers.push(SourceLocationMarker::new(kind, self.start + offset));
                previous = Some(class);
            }
        }
        Ok(markers)
    }
}

/// Tracker for one construct's markers and fragments.
#[derive(Debug)]
pub struct PaddingTracker {
    markers: Vec<SourceLocationMarker>,
    fragments: Vec<Fragment>,
}

impl PaddingTracker {
    /// Consumes the construct beginning at the stream head (whose kind
    /// must be the construct's start marker) through the matching
    /// `end_kind` at interpolation depth zero.
    pub fn new(
        stream: &mut BufferedSourceLocationStream<'_>,
        end_kind: SourceKind,
    ) -> Result<Self> {
        let mut markers = Vec::new();
        let mut depth = 0usize;
        loop {
            let marker = stream.shift()?;
            let kind = marker.kind;
            markers.push(marker);
            match kind {
                SourceKind::InterpolationStart => depth += 1,
                SourceKind::InterpolationEnd => depth = depth.saturating_sub(1),
                SourceKind::Eof => break,
                _ if kind == end_kind && depth == 0 && markers.len() > 1 => break,
                _ => {}
            }
        }

        let mut fragments = Vec::new();
        let mut depth = 0usize;
        for (i, marker) in markers.iter().enumerate() {
            match marker.kind {
                SourceKind::InterpolationStart => depth += 1,
                SourceKind::InterpolationEnd => depth = depth.saturating_sub(1),
                SourceKind::StringContent if depth == 0 && i + 1 < markers.len() => {
                    fragments.push(Fragment {
                        start: marker.index,
                        end: markers[i + 1].index,
                        marker_index: i,
                        padding: Vec::new(),
                        separators: Vec::new(),
                    });
                }
                _ => {}
            }
        }

        Ok(Self { markers, fragments })
    }

    /// The construct's fragments in source order.
    pub fn fragments(&mut self) -> &mut [Fragment] {
        &mut self.fragments
    }

    /// Number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Replays the consumed markers, expanding every marked fragment
    /// into its content / padding / line-separator runs.
    pub fn compute_source_locations(self) -> Result<Vec<SourceLocationMarker>> {
        let mut out = Vec::with_capacity(self.markers.len());
        let mut fragments = self.fragments.into_iter().peekable();
        for (i, marker) in self.markers.into_iter().enumerate() {
            let replaces = fragments
                .peek()
                .is_some_and(|f| f.marker_index == i);
            if replaces {
                let fragment = fragments.next().expect("peeked fragment");
                if fragment.is_empty() {
                    out.push(marker);
                } else {
                    out.extend(fragment.classified_markers()?);
                }
            } else {
                out.push(marker);
            }
        }
        Ok(out)
    }
}
