//! Editor configuration.
//!
//! Everything the orchestrator needs is passed in explicitly at
//! construction. `EditorConfig::default()` documents the defaults.

use std::fmt;

use smol_str::SmolStr;

use crate::command::CommandGroup;
use crate::commands::default_commands;
use crate::preview::PreviewFn;
use crate::snapshot::RichTextSnapshot;

/// HTML a host shows while no preview has been computed.
pub const DEFAULT_EMPTY_PREVIEW_HTML: &str = "<p>&nbsp;</p>";

/// How overlapping asynchronous sync passes are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Emit every settled pass. Whichever finishes last is what the host
    /// ends up holding, even if it started from an older snapshot.
    #[default]
    LatestCompleted,
    /// Number each pass when it begins and drop a settled pass if a newer
    /// one has begun since.
    LatestIssued,
}

/// Construction-time options for [`MarkdownEditor`](crate::MarkdownEditor).
#[derive(Clone)]
pub struct EditorConfig<S: RichTextSnapshot> {
    /// Toolbar sections. Default: [`default_commands`].
    pub commands: Vec<CommandGroup<S>>,
    /// Markdown to HTML. Default: none, so HTML is never computed.
    pub preview: Option<PreviewFn>,
    /// Default: [`DEFAULT_EMPTY_PREVIEW_HTML`].
    pub empty_preview_html: SmolStr,
    /// Refuse command dispatch. Default: `false`.
    pub read_only: bool,
    /// Default: [`SyncPolicy::LatestCompleted`].
    pub sync_policy: SyncPolicy,
}

impl<S: RichTextSnapshot> Default for EditorConfig<S> {
    fn default() -> Self {
        Self {
            commands: default_commands(),
            preview: None,
            empty_preview_html: DEFAULT_EMPTY_PREVIEW_HTML.into(),
            read_only: false,
            sync_policy: SyncPolicy::default(),
        }
    }
}

impl<S: RichTextSnapshot> EditorConfig<S> {
    pub fn with_commands(mut self, commands: Vec<CommandGroup<S>>) -> Self {
        self.commands = commands;
        self
    }

    pub fn with_preview(mut self, preview: PreviewFn) -> Self {
        self.preview = Some(preview);
        self
    }

    pub fn with_empty_preview_html(mut self, html: impl Into<SmolStr>) -> Self {
        self.empty_preview_html = html.into();
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn with_sync_policy(mut self, sync_policy: SyncPolicy) -> Self {
        self.sync_policy = sync_policy;
        self
    }
}

impl<S: RichTextSnapshot> fmt::Debug for EditorConfig<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<Vec<&str>> = self
            .commands
            .iter()
            .map(|g| g.iter().map(|c| c.meta().name.as_str()).collect())
            .collect();
        f.debug_struct("EditorConfig")
            .field("commands", &names)
            .field("preview", &self.preview.is_some())
            .field("empty_preview_html", &self.empty_preview_html)
            .field("read_only", &self.read_only)
            .field("sync_policy", &self.sync_policy)
            .finish()
    }
}
