//! Offset-based text mutation primitives.
//!
//! Commands never touch a rich-text snapshot directly. They flatten it to a
//! [`MarkdownState`], run these primitives, and rebuild.

use crate::error::Result;
use crate::text::{EditorRope, TextBuffer};
use crate::text_helpers::is_word_char;
use crate::types::{MarkdownState, MutationResult, Selection};

/// Insert `insertion` verbatim at char offset `at`.
///
/// Fails with `InvalidOffset` when `at > len(text)`. No other chars of
/// `text` change.
pub fn insert_text(text: &str, insertion: &str, at: usize) -> Result<MutationResult> {
    let mut buf = EditorRope::from_str(text);
    buf.check_offset(at)?;
    buf.insert(at, insertion);
    Ok(MutationResult {
        new_text: buf.to_string(),
        insertion_length: insertion.chars().count(),
    })
}

/// Replace the chars in `selection` with `replacement`.
///
/// `insertion_length` is the replacement's length; callers re-anchor later
/// offsets by `insertion_length - selection.len()`.
pub fn replace_text(text: &str, selection: Selection, replacement: &str) -> Result<MutationResult> {
    let mut buf = EditorRope::from_str(text);
    buf.check_selection(selection)?;
    buf.replace(selection.to_range(), replacement);
    Ok(MutationResult {
        new_text: buf.to_string(),
        insertion_length: replacement.chars().count(),
    })
}

/// Expand a caret sitting on a word char to the whole word.
///
/// Ranges, and carets on whitespace or past the end, come back unchanged.
pub fn select_word_if_caret_is_inside_one(state: &MarkdownState) -> Selection {
    let selection = state.selection;
    if !selection.is_caret() {
        return selection;
    }

    let buf = EditorRope::from_str(&state.text);
    select_word_at(&buf, selection.start).unwrap_or(selection)
}

/// The maximal run of word chars containing the char at `offset`, if that
/// char is a word char.
pub(crate) fn select_word_at<B: TextBuffer>(buf: &B, offset: usize) -> Option<Selection> {
    match buf.char_at(offset) {
        Some(c) if is_word_char(c) => {}
        _ => return None,
    }

    let mut start = offset;
    while start > 0 {
        match buf.char_at(start - 1) {
            Some(c) if is_word_char(c) => start -= 1,
            _ => break,
        }
    }

    let len = buf.len_chars();
    let mut end = offset + 1;
    while end < len {
        match buf.char_at(end) {
            Some(c) if is_word_char(c) => end += 1,
            _ => break,
        }
    }

    Some(Selection::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MdeError;

    fn caret_in(text: &str, offset: usize) -> MarkdownState {
        MarkdownState::new(text, Selection::caret(offset))
    }

    #[test]
    fn test_insert_text() {
        let result = insert_text("abc", "X", 1).unwrap();
        assert_eq!(result.new_text, "aXbc");
        assert_eq!(result.insertion_length, 1);
    }

    #[test]
    fn test_insert_text_at_bounds() {
        assert_eq!(insert_text("abc", "X", 0).unwrap().new_text, "Xabc");
        assert_eq!(insert_text("abc", "X", 3).unwrap().new_text, "abcX");
        assert_eq!(insert_text("", "hi", 0).unwrap().new_text, "hi");
    }

    #[test]
    fn test_insert_text_out_of_bounds() {
        let err = insert_text("abc", "X", 4).unwrap_err();
        assert!(matches!(err, MdeError::InvalidOffset { offset: 4, len: 3 }));
    }

    #[test]
    fn test_insertion_length_counts_chars() {
        let result = insert_text("ab", "ü🌍", 1).unwrap();
        assert_eq!(result.new_text, "aü🌍b");
        assert_eq!(result.insertion_length, 2);
    }

    #[test]
    fn test_replace_text() {
        let result = replace_text("hello world", Selection::new(6, 11), "rust").unwrap();
        assert_eq!(result.new_text, "hello rust");
        assert_eq!(result.insertion_length, 4);

        assert!(replace_text("abc", Selection::new(1, 9), "x").is_err());
    }

    #[test]
    fn test_select_word_caret_inside() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("hello world", 2));
        assert_eq!(sel, Selection::new(0, 5));
    }

    #[test]
    fn test_select_word_caret_on_space() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("hello world", 5));
        assert_eq!(sel, Selection::caret(5));
    }

    #[test]
    fn test_select_word_range_unchanged() {
        let state = MarkdownState::new("hello world", Selection::new(1, 3));
        assert_eq!(select_word_if_caret_is_inside_one(&state), Selection::new(1, 3));
    }

    #[test]
    fn test_select_word_caret_at_end_of_text() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("hello", 5));
        assert_eq!(sel, Selection::caret(5));
    }

    #[test]
    fn test_select_word_includes_markdown_punctuation() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("say **bold** now", 7));
        assert_eq!(sel, Selection::new(4, 12));
    }

    #[test]
    fn test_select_word_stops_at_newline() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("one\ntwo", 5));
        assert_eq!(sel, Selection::new(4, 7));
    }

    #[test]
    fn test_select_word_whitespace_run() {
        let sel = select_word_if_caret_is_inside_one(&caret_in("a    b", 3));
        assert_eq!(sel, Selection::caret(3));
        // Offset 5 is the `b` itself, so it expands.
        let sel = select_word_if_caret_is_inside_one(&caret_in("a    b", 5));
        assert_eq!(sel, Selection::new(5, 6));
    }
}
