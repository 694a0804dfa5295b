//! Conversion between rich-text snapshots, flat markdown state, and the
//! combined editor state.

use crate::error::Result;
use crate::preview::{PreviewFn, generate_preview};
use crate::snapshot::RichTextSnapshot;
use crate::types::{EditorState, MarkdownState};

/// Flatten a snapshot into `(text, selection)`.
pub fn markdown_state_from_snapshot<S: RichTextSnapshot>(rich_state: &S) -> Result<MarkdownState> {
    let state = rich_state.to_markdown_state()?;
    tracing::trace!(
        target: "mde::sync",
        text_chars = state.len_chars(),
        selection = ?state.selection,
        "flattened snapshot"
    );
    Ok(state)
}

/// Build a snapshot holding `state`, carrying auxiliary state over from
/// `old`.
pub fn build_snapshot<S: RichTextSnapshot>(old: &S, state: &MarkdownState) -> Result<S> {
    old.with_markdown_state(state)
}

/// Derive the combined editor state for a snapshot.
///
/// With a preview function this suspends until the HTML is ready; without
/// one it completes on first poll and `html` is `None`.
pub async fn editor_state_from_snapshot<S: RichTextSnapshot>(
    rich_state: S,
    preview: Option<&PreviewFn>,
) -> Result<EditorState<S>> {
    let MarkdownState { text, .. } = markdown_state_from_snapshot(&rich_state)?;
    let html = match preview {
        Some(preview) => Some(generate_preview(preview, &text).await?),
        None => None,
    };
    Ok(EditorState {
        markdown: text,
        html,
        rich_state,
    })
}
