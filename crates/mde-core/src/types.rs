//! Core value types: flat selection, flat markdown state, mutation results,
//! and the combined editor state handed to the host.
//!
//! All offsets are in Unicode scalar values (chars), not bytes or UTF-16.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A selection in flat text, measured in character offsets.
///
/// Always ordered: `start <= end`. `start == end` is a caret.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawSelection")]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

/// Wire shape of a selection; bounds may arrive in either order.
#[derive(Deserialize)]
struct RawSelection {
    start: usize,
    end: usize,
}

impl From<RawSelection> for Selection {
    fn from(raw: RawSelection) -> Self {
        Self::new(raw.start, raw.end)
    }
}

impl Selection {
    /// Create a selection, ordering the bounds if they arrive reversed.
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Create a collapsed selection (caret).
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Check if an offset is within the selection (end exclusive).
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Move both bounds right by `delta` chars.
    pub fn shifted(&self, delta: usize) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Check that both bounds fall within text of `len` chars.
    pub fn fits(&self, len: usize) -> bool {
        self.start <= self.end && self.end <= len
    }

    pub fn to_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<Selection> for Range<usize> {
    fn from(s: Selection) -> Self {
        s.start..s.end
    }
}

/// Flat text plus flat selection, the only view of a rich-text snapshot the
/// rest of the core works with.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkdownState {
    pub text: String,
    pub selection: Selection,
}

impl MarkdownState {
    pub fn new(text: impl Into<String>, selection: Selection) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }

    /// Length of the text in chars.
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    /// Text currently spanned by the selection.
    pub fn selected_text(&self) -> String {
        self.text
            .chars()
            .skip(self.selection.start)
            .take(self.selection.len())
            .collect()
    }
}

/// Result of inserting a literal string into text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MutationResult {
    pub new_text: String,
    /// Length of the inserted string in chars, for re-anchoring later offsets.
    pub insertion_length: usize,
}

/// Combined editor state: markdown, cached preview HTML, and the rich-text
/// snapshot.
///
/// `markdown` always agrees with `rich_state` after a sync pass. `html` is a
/// rendering of some earlier `markdown` and may lag behind it.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState<S> {
    pub markdown: String,
    pub html: Option<String>,
    pub rich_state: S,
}

impl<S> EditorState<S> {
    /// HTML to display, falling back when none has been computed yet.
    pub fn html_or<'a>(&'a self, empty_preview_html: &'a str) -> &'a str {
        match self.html.as_deref() {
            Some(html) if !html.is_empty() => html,
            _ => empty_preview_html,
        }
    }
}

/// Markdown-only seed a host can mount the editor with.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkdownSeed {
    pub markdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

/// What a host hands the editor at mount.
#[derive(Clone, Debug, PartialEq)]
pub enum InitialState<S> {
    /// A complete state that needs no hydration.
    Full(EditorState<S>),
    /// A seed whose rich-text snapshot is synthesized from the markdown.
    Seed(MarkdownSeed),
}

impl<S> From<EditorState<S>> for InitialState<S> {
    fn from(state: EditorState<S>) -> Self {
        InitialState::Full(state)
    }
}

impl<S> From<MarkdownSeed> for InitialState<S> {
    fn from(seed: MarkdownSeed) -> Self {
        InitialState::Seed(seed)
    }
}
