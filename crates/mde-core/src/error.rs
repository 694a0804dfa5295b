//! Error types for editor synchronization.

use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Boxed error supplied by host code (custom commands, preview functions).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias defaulting to [`MdeError`].
pub type Result<T, E = MdeError> = std::result::Result<T, E>;

/// Errors surfaced by the editor core.
///
/// Nothing here is recovered locally. A failed dispatch or sync pass skips
/// emission, so the host keeps its previous `EditorState` (including the
/// cached HTML).
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum MdeError {
    /// A mutation offset fell outside `[0, len]`.
    #[error("offset {offset} is out of bounds for text of {len} chars")]
    #[diagnostic(code(mde::invalid_offset))]
    InvalidOffset { offset: usize, len: usize },

    /// The rich-text snapshot could not be flattened or rebuilt.
    #[error("rich-text snapshot conversion failed: {0}")]
    #[diagnostic(code(mde::conversion))]
    Conversion(SmolStr),

    /// A command's transform failed, either immediately or when its
    /// pending computation settled.
    #[error("command `{command}` failed")]
    #[diagnostic(code(mde::command))]
    Command {
        command: SmolStr,
        #[source]
        source: BoxError,
    },

    /// The preview function rejected.
    #[error("preview generation failed")]
    #[diagnostic(code(mde::preview))]
    Preview(#[source] BoxError),

    /// No configured command has this name.
    #[error("no command named `{0}`")]
    #[diagnostic(code(mde::unknown_command))]
    UnknownCommand(SmolStr),

    /// A command was dispatched while the editor is read-only.
    #[error("editor is read-only")]
    #[diagnostic(code(mde::read_only), help("clear `read_only` in EditorConfig to allow commands"))]
    ReadOnly,
}

impl MdeError {
    /// Build a conversion error from a message.
    pub fn conversion(msg: impl Into<SmolStr>) -> Self {
        MdeError::Conversion(msg.into())
    }

    /// Wrap any error as a command failure for the named command.
    pub fn command(command: impl Into<SmolStr>, source: impl Into<BoxError>) -> Self {
        MdeError::Command {
            command: command.into(),
            source: source.into(),
        }
    }

    /// Wrap any error as a preview failure.
    pub fn preview(source: impl Into<BoxError>) -> Self {
        MdeError::Preview(source.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_offset_message() {
        let err = MdeError::InvalidOffset { offset: 9, len: 3 };
        assert_eq!(
            err.to_string(),
            "offset 9 is out of bounds for text of 3 chars"
        );
    }

    #[test]
    fn test_command_error_keeps_source() {
        let err = MdeError::command("link", "network down");
        assert_eq!(err.to_string(), "command `link` failed");
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("network down"));
    }
}
