//! Text navigation helpers used by the block-level commands.
//!
//! These functions work with the `TextBuffer` trait so they apply equally to a
//! rope or any other char-offset buffer.

use crate::text::TextBuffer;

/// Whether a char counts as part of a "word" for caret expansion.
///
/// Anything that is neither whitespace nor a control char, so markdown
/// punctuation like `*` or `_` is word-constituent.
pub fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

/// Find start of line containing offset.
pub fn find_line_start<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    let mut pos = offset.min(buf.len_chars());
    while pos > 0 {
        if let Some('\n') = buf.char_at(pos - 1) {
            return pos;
        }
        pos -= 1;
    }
    0
}

/// Find end of line containing offset (position of newline or end of text).
pub fn find_line_end<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    let len = buf.len_chars();
    let mut pos = offset;
    while pos < len {
        if let Some('\n') = buf.char_at(pos) {
            return pos;
        }
        pos += 1;
    }
    len
}

/// How many line breaks must be inserted at `offset` so that an empty line
/// separates it from the text before.
///
/// Zero at the start of the text or when the only preceding content on the
/// way back is blanks on the first line.
pub fn breaks_needed_before<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }

    let mut needed: usize = 2;
    let mut in_first_line = true;
    let mut pos = offset;
    while pos > 0 && needed > 0 {
        match buf.char_at(pos - 1) {
            Some(' ') => {}
            Some('\n') => {
                needed -= 1;
                in_first_line = false;
            }
            _ => return needed,
        }
        pos -= 1;
    }
    if in_first_line { 0 } else { needed }
}

/// How many line breaks must be inserted at `offset` so that an empty line
/// separates it from the text after.
pub fn breaks_needed_after<B: TextBuffer>(buf: &B, offset: usize) -> usize {
    let len = buf.len_chars();
    if offset >= len {
        return 0;
    }

    let mut needed: usize = 2;
    let mut in_last_line = true;
    let mut pos = offset;
    while pos < len && needed > 0 {
        match buf.char_at(pos) {
            Some(' ') => {}
            Some('\n') => {
                needed -= 1;
                in_last_line = false;
            }
            _ => return needed,
        }
        pos += 1;
    }
    if in_last_line { 0 } else { needed }
}
