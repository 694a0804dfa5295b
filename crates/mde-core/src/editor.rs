//! The orchestrator: mount hydration, change handling, command dispatch.
//!
//! The host owns the current [`EditorState`]. The editor never stores it;
//! each call takes the snapshot it should work from and hands every settled
//! result to the host's change callback.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::command::{Command, CommandGroup, CommandRef, run_command};
use crate::config::{EditorConfig, SyncPolicy};
use crate::convert::editor_state_from_snapshot;
use crate::error::{MdeError, Result};
use crate::preview::generate_preview;
use crate::snapshot::RichTextSnapshot;
use crate::types::{EditorState, InitialState, MarkdownSeed};

/// Host callback invoked once per settled change.
pub type OnChange<S> = Arc<dyn Fn(EditorState<S>) + Send + Sync>;

/// Drives rich-text changes and commands through conversion and preview,
/// emitting each settled [`EditorState`] to the host.
pub struct MarkdownEditor<S: RichTextSnapshot> {
    config: EditorConfig<S>,
    on_change: OnChange<S>,
    /// Number of the most recently started sync pass.
    issued: AtomicU64,
}

impl<S: RichTextSnapshot> MarkdownEditor<S> {
    pub fn new<F>(config: EditorConfig<S>, on_change: F) -> Self
    where
        F: Fn(EditorState<S>) + Send + Sync + 'static,
    {
        Self {
            config,
            on_change: Arc::new(on_change),
            issued: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &EditorConfig<S> {
        &self.config
    }

    /// Toolbar sections, in display order.
    pub fn commands(&self) -> &[CommandGroup<S>] {
        &self.config.commands
    }

    /// Look up a configured command by name.
    pub fn find_command(&self, name: &str) -> Option<&CommandRef<S>> {
        self.config
            .commands
            .iter()
            .flatten()
            .find(|c| c.meta().name == name)
    }

    /// HTML to display for `state`.
    pub fn preview_html<'a>(&'a self, state: &'a EditorState<S>) -> &'a str {
        state.html_or(&self.config.empty_preview_html)
    }

    /// State to show before hydration has finished.
    ///
    /// A seed has no snapshot yet, so an empty one stands in for it.
    pub fn display_state(&self, initial: &InitialState<S>) -> EditorState<S> {
        match initial {
            InitialState::Full(state) => state.clone(),
            InitialState::Seed(_) => EditorState {
                markdown: String::new(),
                html: None,
                rich_state: S::empty(),
            },
        }
    }

    /// Hydrate a markdown-only seed and emit it once.
    ///
    /// A full state needs nothing and returns `Ok(None)` without emitting.
    /// Initial HTML is computed only when the markdown is non-empty, the seed
    /// carries no (or empty) HTML, and a preview function is configured.
    pub async fn mount(&self, initial: InitialState<S>) -> Result<Option<EditorState<S>>> {
        let MarkdownSeed { markdown, html } = match initial {
            InitialState::Full(_) => {
                tracing::trace!(target: "mde::sync", "mount: state already hydrated");
                return Ok(None);
            }
            InitialState::Seed(seed) => seed,
        };

        let ticket = self.issue();
        let rich_state = S::from_plain_text(&markdown);
        let html = match (&self.config.preview, html) {
            (Some(preview), html)
                if !markdown.is_empty() && html.as_deref().is_none_or(str::is_empty) =>
            {
                Some(generate_preview(preview, &markdown).await?)
            }
            (_, html) => html,
        };

        tracing::debug!(
            target: "mde::sync",
            markdown_chars = markdown.chars().count(),
            has_html = html.is_some(),
            "mount: hydrated seed"
        );
        Ok(self.emit(
            ticket,
            EditorState {
                markdown,
                html,
                rich_state,
            },
        ))
    }

    /// Route an edited snapshot (typing, paste, a finished command) through
    /// conversion and preview, then emit it.
    ///
    /// Returns `Ok(None)` if the result was superseded under
    /// [`SyncPolicy::LatestIssued`]. On error nothing is emitted.
    pub async fn handle_change(&self, rich_state: S) -> Result<Option<EditorState<S>>> {
        let ticket = self.issue();
        self.synchronize(ticket, rich_state).await
    }

    /// Execute `command` against `current` and sync its result.
    ///
    /// Immediate and pending commands go through the same path. Failures
    /// come back as `MdeError::Command` and nothing is emitted.
    pub async fn dispatch(
        &self,
        command: &dyn Command<S>,
        current: &S,
    ) -> Result<Option<EditorState<S>>> {
        let name = command.meta().name.clone();
        if self.config.read_only {
            tracing::debug!(target: "mde::command", command = %name, "refused: read-only");
            return Err(MdeError::ReadOnly);
        }

        let ticket = self.issue();
        tracing::debug!(target: "mde::command", command = %name, ticket, "dispatching");
        let next = run_command(command, current).await.inspect_err(|e| {
            tracing::warn!(target: "mde::command", command = %name, "command failed: {e}");
        })?;
        self.synchronize(ticket, next).await
    }

    /// Dispatch the configured command called `name`.
    pub async fn dispatch_named(&self, name: &str, current: &S) -> Result<Option<EditorState<S>>> {
        let command = self
            .find_command(name)
            .cloned()
            .ok_or_else(|| MdeError::UnknownCommand(name.into()))?;
        self.dispatch(command.as_ref(), current).await
    }

    async fn synchronize(&self, ticket: u64, rich_state: S) -> Result<Option<EditorState<S>>> {
        let state = editor_state_from_snapshot(rich_state, self.config.preview.as_ref())
            .await
            .inspect_err(|e| {
                tracing::warn!(target: "mde::sync", ticket, "sync pass failed: {e}");
            })?;
        Ok(self.emit(ticket, state))
    }

    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn emit(&self, ticket: u64, state: EditorState<S>) -> Option<EditorState<S>> {
        if self.config.sync_policy == SyncPolicy::LatestIssued {
            let latest = self.issued.load(Ordering::SeqCst);
            if ticket != latest {
                tracing::debug!(
                    target: "mde::sync",
                    ticket,
                    latest,
                    "dropping superseded sync pass"
                );
                return None;
            }
        }

        tracing::trace!(
            target: "mde::sync",
            ticket,
            markdown_chars = state.markdown.chars().count(),
            "emitting state"
        );
        (self.on_change)(state.clone());
        Some(state)
    }
}

impl<S: RichTextSnapshot> fmt::Debug for MarkdownEditor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownEditor")
            .field("config", &self.config)
            .field("issued", &self.issued.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
