//! Block-structured rich-text snapshot.
//!
//! Content is a list of keyed blocks (one per line) and the selection is
//! expressed per block, the way block-based rich-text engines store it.
//! The snapshot also carries its own focus flag and undo/redo history.

use std::sync::Arc;

use smol_str::{SmolStr, format_smolstr};

use crate::error::{MdeError, Result};
use crate::snapshot::RichTextSnapshot;
use crate::types::{MarkdownState, Selection};

/// Default number of undo steps a snapshot keeps.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Generate a block key from a monotonic counter.
pub fn make_block_key(index: usize) -> SmolStr {
    format_smolstr!("b-{}", index)
}

/// Counter value of a `b-{n}` key, if it has that shape.
fn parse_block_key(key: &str) -> Option<usize> {
    key.strip_prefix("b-")?.parse().ok()
}

/// One line of content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Stable key; survives content changes at the same position.
    pub key: SmolStr,
    pub text: SmolStr,
}

impl Block {
    pub fn new(key: impl Into<SmolStr>, text: impl Into<SmolStr>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// A position inside a specific block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockPoint {
    pub key: SmolStr,
    pub offset: usize,
}

impl BlockPoint {
    pub fn new(key: impl Into<SmolStr>, offset: usize) -> Self {
        Self {
            key: key.into(),
            offset,
        }
    }
}

/// Per-block selection. Anchor may come after focus (backward selection).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSelection {
    pub anchor: BlockPoint,
    pub focus: BlockPoint,
    pub has_focus: bool,
}

impl BlockSelection {
    pub fn collapsed(point: BlockPoint) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
            has_focus: false,
        }
    }
}

/// Content and selection at one point in history.
#[derive(Clone, Debug, PartialEq)]
struct HistoryEntry {
    blocks: Arc<[Block]>,
    selection: BlockSelection,
}

/// Rich-text snapshot made of keyed blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSnapshot {
    blocks: Arc<[Block]>,
    selection: BlockSelection,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    max_history: usize,
    next_key: usize,
}

impl BlockSnapshot {
    /// Assemble a snapshot from raw parts without validating them.
    ///
    /// A selection naming a missing block, or an offset past its block, is
    /// reported by `to_markdown_state` as a conversion failure.
    pub fn from_parts(blocks: Vec<Block>, selection: BlockSelection) -> Self {
        let next_key = blocks
            .iter()
            .filter_map(|b| parse_block_key(&b.key))
            .map(|n| n + 1)
            .max()
            .unwrap_or(0)
            .max(blocks.len());
        Self {
            blocks: blocks.into(),
            selection,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: DEFAULT_MAX_HISTORY,
            next_key,
        }
    }

    /// Change how many undo steps are kept, trimming the oldest if needed.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        trim_front(&mut self.undo_stack, max_history);
        self
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn selection(&self) -> &BlockSelection {
        &self.selection
    }

    pub fn has_focus(&self) -> bool {
        self.selection.has_focus
    }

    /// Same content with the focus flag changed.
    pub fn with_focus(&self, has_focus: bool) -> Self {
        let mut next = self.clone();
        next.selection.has_focus = has_focus;
        next
    }

    /// Same content with a new per-block selection. Not recorded in history.
    pub fn with_selection(&self, anchor: BlockPoint, focus: BlockPoint) -> Self {
        let mut next = self.clone();
        next.selection.anchor = anchor;
        next.selection.focus = focus;
        next
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Snapshot with the previous content restored, if there is one.
    pub fn undo(&self) -> Option<Self> {
        let mut next = self.clone();
        let entry = next.undo_stack.pop()?;
        next.redo_stack.push(self.current_entry());
        next.restore(entry);
        Some(next)
    }

    /// Snapshot with the last undone content re-applied, if there is one.
    pub fn redo(&self) -> Option<Self> {
        let mut next = self.clone();
        let entry = next.redo_stack.pop()?;
        next.undo_stack.push(self.current_entry());
        next.restore(entry);
        Some(next)
    }

    fn current_entry(&self) -> HistoryEntry {
        HistoryEntry {
            blocks: self.blocks.clone(),
            selection: self.selection.clone(),
        }
    }

    fn restore(&mut self, entry: HistoryEntry) {
        let has_focus = self.selection.has_focus;
        self.blocks = entry.blocks;
        self.selection = entry.selection;
        self.selection.has_focus = has_focus;
    }

    /// Whether the anchor sits after the focus.
    fn is_backward(&self) -> bool {
        match (
            self.flat_offset(&self.selection.anchor),
            self.flat_offset(&self.selection.focus),
        ) {
            (Ok(anchor), Ok(focus)) => anchor > focus,
            _ => false,
        }
    }

    /// Resolve a block point to a flat offset.
    fn flat_offset(&self, point: &BlockPoint) -> Result<usize> {
        let mut base = 0;
        for block in self.blocks.iter() {
            let len = block.len_chars();
            if block.key == point.key {
                if point.offset > len {
                    return Err(MdeError::conversion(format_smolstr!(
                        "offset {} is past the end of block `{}` ({} chars)",
                        point.offset,
                        point.key,
                        len
                    )));
                }
                return Ok(base + point.offset);
            }
            // Blocks are joined by a single newline.
            base += len + 1;
        }
        Err(MdeError::conversion(format_smolstr!(
            "selection refers to unknown block `{}`",
            point.key
        )))
    }
}

/// Map a flat offset onto the block that contains it.
///
/// An offset at the end of a line stays in that line rather than moving to
/// the start of the next.
fn block_point(blocks: &[Block], offset: usize) -> Option<BlockPoint> {
    let mut base = 0;
    for block in blocks {
        let len = block.len_chars();
        if offset <= base + len {
            return Some(BlockPoint::new(block.key.clone(), offset - base));
        }
        base += len + 1;
    }
    None
}

fn trim_front<T>(stack: &mut Vec<T>, max: usize) {
    if stack.len() > max {
        let excess = stack.len() - max;
        stack.drain(..excess);
    }
}

impl RichTextSnapshot for BlockSnapshot {
    fn empty() -> Self {
        Self::from_plain_text("")
    }

    fn from_plain_text(text: &str) -> Self {
        let blocks: Vec<Block> = text
            .split('\n')
            .enumerate()
            .map(|(i, line)| Block::new(make_block_key(i), line))
            .collect();
        let selection = BlockSelection::collapsed(BlockPoint::new(make_block_key(0), 0));
        Self::from_parts(blocks, selection)
    }

    fn to_markdown_state(&self) -> Result<MarkdownState> {
        if self.blocks.is_empty() {
            return Err(MdeError::conversion("snapshot has no blocks"));
        }

        let text = self
            .blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let anchor = self.flat_offset(&self.selection.anchor)?;
        let focus = self.flat_offset(&self.selection.focus)?;

        Ok(MarkdownState {
            text,
            selection: Selection::new(anchor, focus),
        })
    }

    fn with_markdown_state(&self, state: &MarkdownState) -> Result<Self> {
        let len = state.len_chars();
        if !state.selection.fits(len) {
            return Err(MdeError::InvalidOffset {
                offset: state.selection.end,
                len,
            });
        }

        let mut next_key = self.next_key;
        let blocks: Vec<Block> = state
            .text
            .split('\n')
            .enumerate()
            .map(|(i, line)| {
                let key = match self.blocks.get(i) {
                    Some(old) => old.key.clone(),
                    None => loop {
                        let key = make_block_key(next_key);
                        next_key += 1;
                        if !self.blocks.iter().any(|b| b.key == key) {
                            break key;
                        }
                    },
                };
                Block::new(key, line)
            })
            .collect();

        let (from, to) = if self.is_backward() {
            (state.selection.end, state.selection.start)
        } else {
            (state.selection.start, state.selection.end)
        };
        let (Some(anchor), Some(focus)) = (block_point(&blocks, from), block_point(&blocks, to))
        else {
            return Err(MdeError::conversion("selection does not map onto any block"));
        };

        let content_changed = blocks.len() != self.blocks.len()
            || blocks
                .iter()
                .zip(self.blocks.iter())
                .any(|(new, old)| new.text != old.text);

        let mut undo_stack = self.undo_stack.clone();
        let mut redo_stack = self.redo_stack.clone();
        if content_changed {
            undo_stack.push(self.current_entry());
            trim_front(&mut undo_stack, self.max_history);
            redo_stack.clear();
        }

        Ok(Self {
            blocks: blocks.into(),
            selection: BlockSelection {
                anchor,
                focus,
                has_focus: self.selection.has_focus,
            },
            undo_stack,
            redo_stack,
            max_history: self.max_history,
            next_key,
        })
    }
}
