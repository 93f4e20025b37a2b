//! CSX (markup) body dispatch.
//!
//! Inside a tag body everything is literal text until one of three
//! boundaries: `</` starts the close tag, a `<` that looks like a tag
//! starts a nested element, and `{` opens an interpolation. Tag interiors
//! themselves (between `<` and `>`) run under the ordinary code rules with
//! a `CsxOpenTag`/`CsxCloseTag` frame on the stack.

use coffee_util::Result;

use crate::context::Context;
use crate::kind::SourceKind;
use crate::patterns;

use super::SourceLocationStream;

impl<'a> SourceLocationStream<'a> {
    /// One step inside a CSX body.
    pub(super) fn dispatch_csx_body(&mut self, start: usize) -> Result<()> {
        if self.cursor.starts_with("</") {
            self.stack.pop();
            self.stack.push(Context::CsxCloseTag);
            self.cursor.advance(2);
            self.set_kind(SourceKind::CsxCloseTagStart, start);
        } else if self.cursor.byte_at(0) == Some(b'<') && self.csx_tag_shape_ahead() {
            self.stack.push(Context::CsxOpenTag);
            self.cursor.advance(1);
            self.set_kind(SourceKind::CsxOpenTagStart, start);
        } else if self.cursor.byte_at(0) == Some(b'{') {
            self.stack.push(Context::Interpolation {
                outer: SourceKind::CsxBody,
            });
            self.cursor.advance(1);
            self.set_kind(SourceKind::InterpolationStart, start);
        } else {
            self.cursor.advance_char();
        }
        Ok(())
    }

    /// Shape half of the open-tag test: the byte after `<` is `>` (a
    /// fragment) or starts a CSX identifier.
    fn csx_tag_shape_ahead(&self) -> bool {
        match self.cursor.byte_at(1) {
            Some(b'>') => true,
            Some(b) => patterns::is_csx_ident_start(b),
            None => false,
        }
    }
}
