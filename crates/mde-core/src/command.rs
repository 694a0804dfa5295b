//! Command abstraction.
//!
//! A command transforms a rich-text snapshot either immediately or through a
//! pending computation. The variant is explicit in [`CommandOutput`], so the
//! dispatcher branches on a tag instead of inspecting the returned value.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{BoxError, MdeError, Result};
use crate::snapshot::RichTextSnapshot;

/// Display metadata for a toolbar button. Not used by the core logic.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandMeta {
    /// Stable identifier, also used in error reports.
    pub name: SmolStr,
    pub icon: SmolStr,
    /// Accessible label, e.g. "Insert a link".
    pub label: SmolStr,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(SmolStr, SmolStr)>,
}

impl CommandMeta {
    pub fn new(name: impl Into<SmolStr>, icon: impl Into<SmolStr>, label: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            label: label.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }
}

/// What a command hands back: a finished snapshot or one still on the way.
pub enum CommandOutput<S> {
    Immediate(S),
    Pending(BoxFuture<'static, Result<S>>),
}

impl<S> CommandOutput<S> {
    /// Wrap a future as a pending output.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Result<S>> + Send + 'static,
    {
        CommandOutput::Pending(Box::pin(fut))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CommandOutput::Pending(_))
    }

    /// Resolve to the final snapshot, suspending only for `Pending`.
    pub async fn settle(self) -> Result<S> {
        match self {
            CommandOutput::Immediate(state) => Ok(state),
            CommandOutput::Pending(fut) => fut.await,
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for CommandOutput<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutput::Immediate(state) => f.debug_tuple("Immediate").field(state).finish(),
            CommandOutput::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A formatting operation over rich-text snapshots.
pub trait Command<S: RichTextSnapshot>: Send + Sync {
    fn meta(&self) -> &CommandMeta;

    /// Transform `state`. Errors returned here, or from a pending output,
    /// reach the dispatcher's caller untouched apart from being tagged with
    /// the command name.
    fn execute(&self, state: &S) -> Result<CommandOutput<S>>;
}

/// Shared handle to a command.
pub type CommandRef<S> = Arc<dyn Command<S>>;

/// One toolbar section.
pub type CommandGroup<S> = Vec<CommandRef<S>>;

/// Execute `command` against `state` and wait for it to settle.
///
/// Immediate outputs continue without suspending. Any failure is reported
/// as `MdeError::Command` naming the command.
pub async fn run_command<S: RichTextSnapshot>(command: &dyn Command<S>, state: &S) -> Result<S> {
    let name = command.meta().name.clone();
    let tag = |e: MdeError| match e {
        e @ MdeError::Command { .. } => e,
        other => MdeError::command(name.clone(), other),
    };

    let output = command.execute(state).map_err(&tag)?;
    if output.is_pending() {
        tracing::debug!(target: "mde::command", command = %name, "awaiting pending command");
    }
    output.settle().await.map_err(&tag)
}

/// Command backed by a synchronous closure.
pub struct FnCommand<F> {
    meta: CommandMeta,
    f: F,
}

impl<S, F, E> Command<S> for FnCommand<F>
where
    S: RichTextSnapshot,
    F: Fn(&S) -> std::result::Result<S, E> + Send + Sync,
    E: Into<BoxError>,
{
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&self, state: &S) -> Result<CommandOutput<S>> {
        (self.f)(state)
            .map(CommandOutput::Immediate)
            .map_err(|e| MdeError::command(self.meta.name.clone(), e))
    }
}

/// Command backed by an async closure.
pub struct AsyncFnCommand<F> {
    meta: CommandMeta,
    f: F,
}

impl<S, F, Fut, E> Command<S> for AsyncFnCommand<F>
where
    S: RichTextSnapshot,
    F: Fn(S) -> Fut + Send + Sync,
    Fut: Future<Output = std::result::Result<S, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&self, state: &S) -> Result<CommandOutput<S>> {
        let name = self.meta.name.clone();
        let fut = (self.f)(state.clone());
        Ok(CommandOutput::pending(async move {
            fut.await.map_err(|e| MdeError::command(name, e))
        }))
    }
}

/// Build a command from a synchronous transform.
pub fn sync_command<S, F, E>(meta: CommandMeta, f: F) -> CommandRef<S>
where
    S: RichTextSnapshot,
    F: Fn(&S) -> std::result::Result<S, E> + Send + Sync + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(FnCommand { meta, f })
}

/// Build a command from an asynchronous transform.
pub fn async_command<S, F, Fut, E>(meta: CommandMeta, f: F) -> CommandRef<S>
where
    S: RichTextSnapshot,
    F: Fn(S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<S, E>> + Send + 'static,
    E: Into<BoxError> + 'static,
{
    Arc::new(AsyncFnCommand { meta, f })
}
