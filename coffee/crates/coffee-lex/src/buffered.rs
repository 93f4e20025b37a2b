//! Buffered marker stream with push-back.
//!
//! A thin adapter over the location stream providing single-marker
//! lookahead, multi-marker kind matching, and an unshift buffer. The
//! padding passes use the buffer to splice synthesized markers back in
//! front of the stream; the token assembler then consumes them as if the
//! scanner had produced them.

use std::collections::VecDeque;

use coffee_util::Result;

use crate::kind::SourceKind;
use crate::stream::{SourceLocationMarker, SourceLocationStream};

/// A marker stream with an unshift buffer in front of it.
pub struct BufferedSourceLocationStream<'a> {
    stream: SourceLocationStream<'a>,
    buffer: VecDeque<SourceLocationMarker>,
}

impl<'a> BufferedSourceLocationStream<'a> {
    pub fn new(stream: SourceLocationStream<'a>) -> Self {
        Self {
            stream,
            buffer: VecDeque::new(),
        }
    }

    /// Removes and returns the next marker: buffered markers first, then
    /// the underlying stream.
    pub fn shift(&mut self) -> Result<SourceLocationMarker> {
        match self.buffer.pop_front() {
            Some(marker) => Ok(marker),
            None => self.stream.next(),
        }
    }

    /// Returns the next marker without consuming it.
    pub fn peek(&mut self) -> Result<SourceLocationMarker> {
        let marker = self.shift()?;
        self.buffer.push_front(marker);
        Ok(marker)
    }

    /// Returns true if the next markers have exactly these kinds, in
    /// order. Consumes nothing.
    pub fn has_next(&mut self, kinds: &[SourceKind]) -> Result<bool> {
        let mut taken = Vec::with_capacity(kinds.len());
        let mut matched = true;
        for &kind in kinds {
            let marker = match self.shift() {
                Ok(marker) => marker,
                Err(err) => {
                    self.unshift(&taken);
                    return Err(err);
                }
            };
            taken.push(marker);
            if marker.kind != kind {
                matched = false;
                break;
            }
        }
        self.unshift(&taken);
        Ok(matched)
    }

    /// Prepends markers so the first element of `markers` is the next
    /// marker shifted.
    pub fn unshift(&mut self, markers: &[SourceLocationMarker]) {
        for marker in markers.iter().rev() {
            self.buffer.push_front(*marker);
        }
    }

    /// The source the underlying stream scans.
    pub fn source(&self) -> &'a str {
        self.stream.source()
    }
}
