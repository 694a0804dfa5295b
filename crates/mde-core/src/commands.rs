//! Built-in formatting commands and the default toolbar.
//!
//! Every command flattens the snapshot, applies a [`FormatAction`] to the
//! flat `(text, selection)`, and rebuilds. Inline commands follow one
//! template: expand the caret to the word under it, wrap it with a literal
//! prefix and suffix, then reselect the label.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::command::{Command, CommandGroup, CommandMeta, CommandOutput};
use crate::convert::{build_snapshot, markdown_state_from_snapshot};
use crate::error::Result;
use crate::mutation::{insert_text, replace_text, select_word_if_caret_is_inside_one};
use crate::snapshot::RichTextSnapshot;
use crate::text::{EditorRope, TextBuffer};
use crate::text_helpers::{breaks_needed_after, breaks_needed_before, find_line_start};
use crate::types::{MarkdownState, Selection};

/// URL inserted by the link command when the label is empty.
pub const LINK_PLACEHOLDER: &str = "INSERT LINK PLACEHOLDER HERE";

/// URL inserted by the image command when the label is empty.
pub const IMAGE_PLACEHOLDER: &str = "INSERT IMAGE URL HERE";

/// Marker put in front of each line by the line-oriented commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePrefix {
    Quote,
    Bullet,
    Numbered,
    Checkbox,
}

impl LinePrefix {
    fn for_line(self, index: usize) -> SmolStr {
        match self {
            LinePrefix::Quote => "> ".into(),
            LinePrefix::Bullet => "- ".into(),
            LinePrefix::Numbered => smol_str::format_smolstr!("{}. ", index + 1),
            LinePrefix::Checkbox => "- [ ] ".into(),
        }
    }
}

/// A formatting edit over flat markdown state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatAction {
    /// Surround the word or selection with `prefix`/`suffix`.
    Wrap {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// `prefix` + label + `](label)`, with `placeholder` for an empty label.
    Link {
        prefix: &'static str,
        placeholder: &'static str,
    },
    /// Insert `marker` at the start of the current line.
    LinePrefix { marker: &'static str },
    /// Inline code for a single line, a fenced block otherwise.
    Code,
    /// Separate the selection into its own paragraph and prefix every line.
    Lines(LinePrefix),
}

/// Apply `action` to `state`, returning the new text and selection.
pub fn apply_format(state: &MarkdownState, action: &FormatAction) -> Result<MarkdownState> {
    EditorRope::from_str(&state.text).check_selection(state.selection)?;
    match action {
        FormatAction::Wrap { prefix, suffix } => wrap_selection(state, prefix, suffix),
        FormatAction::Link {
            prefix,
            placeholder,
        } => insert_link(state, prefix, placeholder),
        FormatAction::LinePrefix { marker } => prefix_current_line(state, marker),
        FormatAction::Code => insert_code(state),
        FormatAction::Lines(prefix) => prefix_lines(state, *prefix),
    }
}

fn slice_chars(text: &str, selection: Selection) -> SmolStr {
    EditorRope::from_str(text)
        .slice(selection.to_range())
        .unwrap_or_default()
}

fn wrap_selection(state: &MarkdownState, prefix: &str, suffix: &str) -> Result<MarkdownState> {
    let sel = select_word_if_caret_is_inside_one(state);
    let opened = insert_text(&state.text, prefix, sel.start)?;
    let shift = opened.insertion_length;
    let closed = insert_text(&opened.new_text, suffix, sel.end + shift)?;
    Ok(MarkdownState::new(closed.new_text, sel.shifted(shift)))
}

fn insert_link(state: &MarkdownState, prefix: &str, placeholder: &str) -> Result<MarkdownState> {
    let sel = select_word_if_caret_is_inside_one(state);
    let opened = insert_text(&state.text, prefix, sel.start)?;
    let shift = opened.insertion_length;

    // Read the label back from the shifted text, after the prefix went in.
    let label = slice_chars(&opened.new_text, sel.shifted(shift));
    let url = if label.is_empty() {
        placeholder
    } else {
        label.as_str()
    };

    let closed = insert_text(&opened.new_text, &format!("]({url})"), sel.end + shift)?;
    Ok(MarkdownState::new(closed.new_text, sel.shifted(shift)))
}

fn prefix_current_line(state: &MarkdownState, marker: &str) -> Result<MarkdownState> {
    let buf = EditorRope::from_str(&state.text);
    buf.check_offset(state.selection.end)?;
    let line_start = find_line_start(&buf, state.selection.start);
    let inserted = insert_text(&state.text, marker, line_start)?;
    Ok(MarkdownState::new(
        inserted.new_text,
        state.selection.shifted(inserted.insertion_length),
    ))
}

fn insert_code(state: &MarkdownState) -> Result<MarkdownState> {
    let sel = select_word_if_caret_is_inside_one(state);
    let selected = slice_chars(&state.text, sel);
    if !selected.contains('\n') {
        return wrap_selection(state, "`", "`");
    }

    let buf = EditorRope::from_str(&state.text);
    let before = breaks_needed_before(&buf, sel.start);
    let after = breaks_needed_after(&buf, sel.end);

    let opening = format!("{}```\n", "\n".repeat(before));
    let closing = format!("\n```{}", "\n".repeat(after));
    let opened = insert_text(&state.text, &opening, sel.start)?;
    let shift = opened.insertion_length;
    let closed = insert_text(&opened.new_text, &closing, sel.end + shift)?;
    Ok(MarkdownState::new(closed.new_text, sel.shifted(shift)))
}

fn prefix_lines(state: &MarkdownState, prefix: LinePrefix) -> Result<MarkdownState> {
    let sel = select_word_if_caret_is_inside_one(state);
    let buf = EditorRope::from_str(&state.text);
    buf.check_offset(sel.end)?;
    let before = breaks_needed_before(&buf, sel.start);
    let after = breaks_needed_after(&buf, sel.end);

    let selected = slice_chars(&state.text, sel);
    let prefixed = selected
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}{}", prefix.for_line(i), line))
        .collect::<Vec<_>>()
        .join("\n");
    let block = format!("{}{}{}", "\n".repeat(before), prefixed, "\n".repeat(after));

    let replaced = replace_text(&state.text, sel, &block)?;
    let start = sel.start + before;
    let end = start + prefixed.chars().count();
    Ok(MarkdownState::new(replaced.new_text, Selection::new(start, end)))
}

/// A command that applies one [`FormatAction`].
#[derive(Debug, Clone)]
pub struct FormatCommand {
    meta: CommandMeta,
    action: FormatAction,
}

impl FormatCommand {
    pub fn new(meta: CommandMeta, action: FormatAction) -> Self {
        Self { meta, action }
    }

    pub fn action(&self) -> &FormatAction {
        &self.action
    }
}

impl<S: RichTextSnapshot> Command<S> for FormatCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn execute(&self, state: &S) -> Result<CommandOutput<S>> {
        let flat = markdown_state_from_snapshot(state)?;
        let next = apply_format(&flat, &self.action)?;
        tracing::trace!(
            target: "mde::command",
            command = %self.meta.name,
            selection = ?next.selection,
            "applied format"
        );
        Ok(CommandOutput::Immediate(build_snapshot(state, &next)?))
    }
}

fn command(name: &'static str, label: &'static str, action: FormatAction) -> FormatCommand {
    FormatCommand::new(
        CommandMeta::new(name, name, label).with_attribute("aria-label", label),
        action,
    )
}

pub fn header_command() -> FormatCommand {
    command("header", "Add header", FormatAction::LinePrefix { marker: "### " })
}

pub fn bold_command() -> FormatCommand {
    command(
        "bold",
        "Add bold text",
        FormatAction::Wrap {
            prefix: "**",
            suffix: "**",
        },
    )
}

pub fn italic_command() -> FormatCommand {
    command(
        "italic",
        "Add italic text",
        FormatAction::Wrap {
            prefix: "_",
            suffix: "_",
        },
    )
}

pub fn strikethrough_command() -> FormatCommand {
    command(
        "strikethrough",
        "Add strikethrough text",
        FormatAction::Wrap {
            prefix: "~~",
            suffix: "~~",
        },
    )
}

pub fn link_command() -> FormatCommand {
    command(
        "link",
        "Insert a link",
        FormatAction::Link {
            prefix: "[",
            placeholder: LINK_PLACEHOLDER,
        },
    )
}

pub fn quote_command() -> FormatCommand {
    command("quote", "Insert a quote", FormatAction::Lines(LinePrefix::Quote))
}

pub fn code_command() -> FormatCommand {
    command("code", "Insert code", FormatAction::Code)
}

pub fn image_command() -> FormatCommand {
    command(
        "image",
        "Insert an image",
        FormatAction::Link {
            prefix: "![",
            placeholder: IMAGE_PLACEHOLDER,
        },
    )
}

pub fn unordered_list_command() -> FormatCommand {
    command(
        "unordered-list",
        "Add unordered list",
        FormatAction::Lines(LinePrefix::Bullet),
    )
}

pub fn ordered_list_command() -> FormatCommand {
    command(
        "ordered-list",
        "Add ordered list",
        FormatAction::Lines(LinePrefix::Numbered),
    )
}

pub fn checked_list_command() -> FormatCommand {
    command(
        "checked-list",
        "Add checked list",
        FormatAction::Lines(LinePrefix::Checkbox),
    )
}

/// The default toolbar, in three sections.
pub fn default_commands<S: RichTextSnapshot>() -> Vec<CommandGroup<S>> {
    fn group<S: RichTextSnapshot>(commands: Vec<FormatCommand>) -> CommandGroup<S> {
        commands
            .into_iter()
            .map(|c| Arc::new(c) as Arc<dyn Command<S>>)
            .collect()
    }

    vec![
        group(vec![
            header_command(),
            bold_command(),
            italic_command(),
            strikethrough_command(),
        ]),
        group(vec![
            link_command(),
            quote_command(),
            code_command(),
            image_command(),
        ]),
        group(vec![
            unordered_list_command(),
            ordered_list_command(),
            checked_list_command(),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::run_command;
    use crate::error::MdeError;
    use crate::{BlockSnapshot, PlainSnapshot};

    fn apply(cmd: &FormatCommand, text: &str, selection: Selection) -> MarkdownState {
        apply_format(&MarkdownState::new(text, selection), cmd.action()).unwrap()
    }

    #[test]
    fn test_link_expands_word_under_caret() {
        let out = apply(&link_command(), "Check example site", Selection::caret(8));
        insta::assert_snapshot!(out.text, @"Check [example](example) site");
        assert_eq!(out.selection, Selection::new(7, 14));
    }

    #[test]
    fn test_link_with_range_selection() {
        let out = apply(&link_command(), "go to docs now", Selection::new(6, 10));
        assert_eq!(out.text, "go to [docs](docs) now");
        assert_eq!(out.selection, Selection::new(7, 11));
        assert_eq!(out.selected_text(), "docs");
    }

    #[test]
    fn test_link_empty_label_uses_placeholder() {
        let out = apply(&link_command(), "a    b", Selection::caret(3));
        assert_eq!(out.text, "a  [](INSERT LINK PLACEHOLDER HERE)  b");
        assert_eq!(out.selection, Selection::caret(4));
    }

    #[test]
    fn test_link_on_empty_text() {
        let out = apply(&link_command(), "", Selection::caret(0));
        assert_eq!(out.text, "[](INSERT LINK PLACEHOLDER HERE)");
        assert_eq!(out.selection, Selection::caret(1));
    }

    #[test]
    fn test_link_out_of_bounds_selection() {
        let state = MarkdownState::new("abc", Selection::new(1, 9));
        let err = apply_format(&state, link_command().action()).unwrap_err();
        assert!(matches!(err, MdeError::InvalidOffset { .. }));
    }

    #[test]
    fn test_reversed_selection_is_rejected() {
        let state = MarkdownState {
            text: "hello world".into(),
            selection: Selection { start: 8, end: 2 },
        };
        for cmd in [bold_command(), link_command(), code_command(), quote_command()] {
            let err = apply_format(&state, cmd.action()).unwrap_err();
            assert!(matches!(err, MdeError::InvalidOffset { .. }), "{:?}", cmd.action());
        }
    }

    #[test]
    fn test_image() {
        let out = apply(&image_command(), "see cat.png here", Selection::caret(5));
        assert_eq!(out.text, "see ![cat.png](cat.png) here");
        assert_eq!(out.selected_text(), "cat.png");
    }

    #[test]
    fn test_bold_expands_word() {
        let out = apply(&bold_command(), "make it bold", Selection::caret(9));
        insta::assert_snapshot!(out.text, @"make it **bold**");
        assert_eq!(out.selection, Selection::new(10, 14));
    }

    #[test]
    fn test_italic_and_strikethrough() {
        let out = apply(&italic_command(), "so very", Selection::new(3, 7));
        assert_eq!(out.text, "so _very_");
        let out = apply(&strikethrough_command(), "old", Selection::caret(1));
        assert_eq!(out.text, "~~old~~");
        assert_eq!(out.selection, Selection::new(2, 5));
    }

    #[test]
    fn test_wrap_caret_on_whitespace() {
        let out = apply(&bold_command(), "a b", Selection::caret(1));
        assert_eq!(out.text, "a**** b");
        assert_eq!(out.selection, Selection::caret(3));
    }

    #[test]
    fn test_header_prefixes_current_line() {
        let out = apply(&header_command(), "first\nsecond", Selection::caret(8));
        assert_eq!(out.text, "first\n### second");
        assert_eq!(out.selection, Selection::caret(12));
    }

    #[test]
    fn test_inline_code() {
        let out = apply(&code_command(), "call foo() now", Selection::caret(6));
        assert_eq!(out.text, "call `foo()` now");
        assert_eq!(out.selection, Selection::new(6, 11));
    }

    #[test]
    fn test_code_block() {
        let out = apply(
            &code_command(),
            "intro\nlet a;\nlet b;\noutro",
            Selection::new(6, 19),
        );
        assert_eq!(out.text, "intro\n\n```\nlet a;\nlet b;\n```\n\noutro");
        assert_eq!(out.selection, Selection::new(11, 24));
        assert_eq!(out.selected_text(), "let a;\nlet b;");
    }

    #[test]
    fn test_unordered_list() {
        let out = apply(&unordered_list_command(), "a\nb", Selection::new(0, 3));
        assert_eq!(out.text, "- a\n- b");
        assert_eq!(out.selection, Selection::new(0, 7));
    }

    #[test]
    fn test_ordered_list_separates_paragraph() {
        let out = apply(&ordered_list_command(), "x y", Selection::caret(2));
        assert_eq!(out.text, "x \n\n1. y");
        assert_eq!(out.selection, Selection::new(4, 8));
    }

    #[test]
    fn test_numbering_counts_lines() {
        let out = apply(&ordered_list_command(), "one\ntwo\nthree", Selection::new(0, 13));
        assert_eq!(out.text, "1. one\n2. two\n3. three");
    }

    #[test]
    fn test_checked_list() {
        let out = apply(&checked_list_command(), "task", Selection::caret(0));
        assert_eq!(out.text, "- [ ] task");
        assert_eq!(out.selection, Selection::new(0, 10));
    }

    #[test]
    fn test_quote() {
        let out = apply(&quote_command(), "hello world", Selection::new(0, 11));
        assert_eq!(out.text, "> hello world");
        assert_eq!(out.selection, Selection::new(0, 13));
    }

    #[tokio::test]
    async fn test_link_command_through_block_snapshot() {
        let snap = BlockSnapshot::from_plain_text("intro\nCheck example site")
            .with_selection(
                crate::BlockPoint::new("b-1", 8),
                crate::BlockPoint::new("b-1", 8),
            );
        let cmd: Arc<dyn Command<BlockSnapshot>> = Arc::new(link_command());
        let result = run_command(cmd.as_ref(), &snap).await.unwrap();

        let flat = result.to_markdown_state().unwrap();
        assert_eq!(flat.text, "intro\nCheck [example](example) site");
        assert_eq!(flat.selection, Selection::new(13, 20));
        assert!(result.can_undo());
    }

    #[tokio::test]
    async fn test_command_against_plain_snapshot() {
        let snap = PlainSnapshot::new("hello world", Selection::caret(2)).unwrap();
        let result = run_command::<PlainSnapshot>(&bold_command(), &snap).await.unwrap();
        assert_eq!(result.to_markdown_state().unwrap().text, "**hello** world");
    }

    #[test]
    fn test_default_commands_layout() {
        let groups = default_commands::<PlainSnapshot>();
        let names: Vec<Vec<&str>> = groups
            .iter()
            .map(|g| g.iter().map(|c| c.meta().name.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["header", "bold", "italic", "strikethrough"],
                vec!["link", "quote", "code", "image"],
                vec!["unordered-list", "ordered-list", "checked-list"],
            ]
        );
    }
}
