//! mde-core: markdown editor command and state-sync engine.
//!
//! This crate provides:
//! - `RichTextSnapshot` - the seam to a host's rich-text model, with
//!   `PlainSnapshot` (single rope) and `BlockSnapshot` (keyed blocks, undo)
//! - Text mutation helpers and the built-in formatting commands
//! - `MarkdownEditor` - mount hydration, change handling, command dispatch,
//!   asynchronous preview generation

pub mod block;
pub mod command;
pub mod commands;
pub mod config;
pub mod convert;
pub mod editor;
pub mod error;
pub mod mutation;
pub mod plain;
pub mod preview;
pub mod snapshot;
pub mod text;
pub mod text_helpers;
pub mod types;

pub use block::{Block, BlockPoint, BlockSelection, BlockSnapshot, make_block_key};
pub use command::{
    Command, CommandGroup, CommandMeta, CommandOutput, CommandRef, async_command, run_command,
    sync_command,
};
pub use commands::{FormatAction, FormatCommand, LinePrefix, apply_format, default_commands};
pub use config::{DEFAULT_EMPTY_PREVIEW_HTML, EditorConfig, SyncPolicy};
pub use convert::{build_snapshot, editor_state_from_snapshot, markdown_state_from_snapshot};
pub use editor::{MarkdownEditor, OnChange};
pub use error::{BoxError, MdeError, Result};
pub use mutation::{insert_text, replace_text, select_word_if_caret_is_inside_one};
pub use plain::PlainSnapshot;
pub use preview::{PreviewFn, PreviewFuture, generate_preview, preview_fn};
pub use smol_str::SmolStr;
pub use snapshot::RichTextSnapshot;
pub use text::{EditorRope, TextBuffer};
pub use types::{
    EditorState, InitialState, MarkdownSeed, MarkdownState, MutationResult, Selection,
};
