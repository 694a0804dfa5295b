//! The capability surface required from a rich-text editing state.
//!
//! The concrete representation (blocks, a rope, a CRDT) stays behind this
//! trait. Everything else in the crate only ever sees flat text and flat
//! selection offsets.

use crate::error::Result;
use crate::types::MarkdownState;

/// An immutable rich-text snapshot: content plus a current selection.
///
/// Implementations must satisfy the round trip
/// `s.with_markdown_state(&s.to_markdown_state()?)?.to_markdown_state()? ==
/// s.to_markdown_state()?`.
pub trait RichTextSnapshot: Clone + Send + Sync + 'static {
    /// An empty snapshot with a caret at 0.
    fn empty() -> Self;

    /// A snapshot holding `text` with a caret at 0.
    fn from_plain_text(text: &str) -> Self;

    /// Flatten content and selection into one offset space.
    ///
    /// Fails with `Conversion` if the snapshot's own invariants are broken.
    fn to_markdown_state(&self) -> Result<MarkdownState>;

    /// Build a new snapshot whose content and selection equal `state`,
    /// carrying over whatever auxiliary state (focus, history) this
    /// representation keeps.
    fn with_markdown_state(&self, state: &MarkdownState) -> Result<Self>;
}
