//! Char-offset text storage.
//!
//! Mutation primitives and commands edit flat markdown through [`TextBuffer`].
//! [`EditorRope`] backs it with a `ropey::Rope` so offsets map to chars in
//! logarithmic time, whatever the mix of multi-byte text.

use std::ops::Range;

use smol_str::{SmolStr, ToSmolStr};

use crate::error::{MdeError, Result};
use crate::types::Selection;

/// Editable text addressed by char offsets (Unicode scalar values).
///
/// Edit methods assume offsets were validated with [`check_offset`] or
/// [`check_selection`] first.
///
/// [`check_offset`]: TextBuffer::check_offset
/// [`check_selection`]: TextBuffer::check_selection
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    fn insert(&mut self, at: usize, text: &str);

    fn remove(&mut self, range: Range<usize>);

    /// Swap the chars in `range` for `text`.
    fn replace(&mut self, range: Range<usize>, text: &str) {
        let at = range.start;
        self.remove(range);
        self.insert(at, text);
    }

    /// Chars in `range`, or `None` if it runs past the end.
    fn slice(&self, range: Range<usize>) -> Option<SmolStr>;

    /// Char at `offset`, or `None` at or past the end.
    fn char_at(&self, offset: usize) -> Option<char>;

    fn to_string(&self) -> String;

    /// `InvalidOffset` unless `offset` lies in `[0, len_chars()]`.
    fn check_offset(&self, offset: usize) -> Result<()> {
        let len = self.len_chars();
        if offset > len {
            return Err(MdeError::InvalidOffset { offset, len });
        }
        Ok(())
    }

    /// `InvalidOffset` unless both ends of `selection` lie in the text.
    fn check_selection(&self, selection: Selection) -> Result<()> {
        let len = self.len_chars();
        if !selection.fits(len) {
            return Err(MdeError::InvalidOffset {
                offset: selection.end,
                len,
            });
        }
        Ok(())
    }
}

/// Rope-backed [`TextBuffer`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorRope(ropey::Rope);

impl EditorRope {
    pub fn from_str(text: &str) -> Self {
        Self(ropey::Rope::from_str(text))
    }
}

impl TextBuffer for EditorRope {
    fn len_chars(&self) -> usize {
        self.0.len_chars()
    }

    fn insert(&mut self, at: usize, text: &str) {
        self.0.insert(at, text);
    }

    fn remove(&mut self, range: Range<usize>) {
        self.0.remove(range);
    }

    fn slice(&self, range: Range<usize>) -> Option<SmolStr> {
        let fits = range.start <= range.end && range.end <= self.0.len_chars();
        fits.then(|| self.0.slice(range).to_smolstr())
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        (offset < self.0.len_chars()).then(|| self.0.char(offset))
    }

    fn to_string(&self) -> String {
        self.0.to_string()
    }
}
