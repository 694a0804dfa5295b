//! Flat rich-text snapshot: a rope plus a selection, no block structure.

use crate::error::{MdeError, Result};
use crate::snapshot::RichTextSnapshot;
use crate::text::{EditorRope, TextBuffer};
use crate::types::{MarkdownState, Selection};

/// Snapshot for hosts whose editing surface is already a plain text area.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlainSnapshot {
    text: EditorRope,
    selection: Selection,
}

impl PlainSnapshot {
    /// Build a snapshot, failing if the selection does not fit the text.
    pub fn new(text: &str, selection: Selection) -> Result<Self> {
        let text = EditorRope::from_str(text);
        text.check_selection(selection)?;
        Ok(Self { text, selection })
    }

    pub fn text(&self) -> &EditorRope {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }
}

impl RichTextSnapshot for PlainSnapshot {
    fn empty() -> Self {
        Self::default()
    }

    fn from_plain_text(text: &str) -> Self {
        Self {
            text: EditorRope::from_str(text),
            selection: Selection::caret(0),
        }
    }

    fn to_markdown_state(&self) -> Result<MarkdownState> {
        if !self.selection.fits(self.text.len_chars()) {
            return Err(MdeError::conversion("selection exceeds text bounds"));
        }
        Ok(MarkdownState {
            text: self.text.to_string(),
            selection: self.selection,
        })
    }

    fn with_markdown_state(&self, state: &MarkdownState) -> Result<Self> {
        Self::new(&state.text, state.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_identity() {
        let snap = PlainSnapshot::new("hello\nworld", Selection::new(3, 8)).unwrap();
        let state = snap.to_markdown_state().unwrap();
        let rebuilt = snap.with_markdown_state(&state).unwrap();
        assert_eq!(rebuilt, snap);
    }

    #[test]
    fn test_new_rejects_out_of_bounds() {
        assert!(PlainSnapshot::new("abc", Selection::caret(4)).is_err());
    }

    #[test]
    fn test_from_plain_text_caret_at_start() {
        let snap = PlainSnapshot::from_plain_text("abc");
        assert_eq!(snap.selection(), Selection::caret(0));
        assert_eq!(snap.text().to_string(), "abc");
    }
}
