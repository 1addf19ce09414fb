//! Tag list and cursor state.
//!
//! The tag file is plain text, one tag per line. Blank lines are dropped and
//! surrounding whitespace is trimmed. The whole list is replaced on reload;
//! the cursor only resets when the new content actually differs, so duplicate
//! file-change events do not restart a half-finished run.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{Result, TagFlowError};

/// Status text shown when every tag has been pasted.
pub const EXHAUSTED_NOTICE: &str = "All tags are inserted.";

/// Shared handle to the tag state, locked by every thread that reads or
/// mutates it.
pub type SharedTags = Arc<Mutex<TagStore>>;

/// Ordered tag list plus the cursor marking the next tag to paste.
#[derive(Debug, Default)]
pub struct TagStore {
    tags: Vec<String>,
    cursor: usize,
}

impl TagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split file contents into tags: trimmed, non-blank lines in file order.
    pub fn parse_tags(contents: &str) -> Vec<String> {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Re-read the tag file, replacing the list wholesale.
    ///
    /// Returns `Ok(true)` when the content changed (and the cursor was
    /// reset), `Ok(false)` when the file matched the current list. On a read
    /// failure the existing list and cursor are left untouched; the caller
    /// logs the error and the next trigger or file event is the retry.
    pub fn reload_from(&mut self, path: &Path) -> Result<bool> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TagFlowError::tag_file(path.display().to_string(), e.to_string()))?;
        Ok(self.replace(Self::parse_tags(&contents)))
    }

    /// Replace the tag list if `tags` differs from the current content.
    pub fn replace(&mut self, tags: Vec<String>) -> bool {
        if tags == self.tags {
            return false;
        }
        self.tags = tags;
        self.cursor = 0;
        true
    }

    /// The tag the next paste will emit, if any.
    pub fn current(&self) -> Option<&str> {
        self.tags.get(self.cursor).map(String::as_str)
    }

    /// Advance past the current tag. Saturates at the end of the list.
    pub fn advance(&mut self) {
        if self.cursor < self.tags.len() {
            self.cursor += 1;
        }
    }

    /// Move the cursor back to the first tag.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tags.len()
    }

    /// Status line for the main window.
    pub fn status_line(&self) -> String {
        match self.current() {
            Some(tag) => format!("Next tag: {tag}"),
            None => EXHAUSTED_NOTICE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_blanks() {
        let tags = TagStore::parse_tags("  cat  \n\n dog\n\t\nbird\n");
        assert_eq!(tags, vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_replace_resets_cursor_only_on_change() {
        let mut store = TagStore::new();
        assert!(store.replace(vec!["a".into(), "b".into()]));
        store.advance();
        assert_eq!(store.cursor(), 1);

        // Identical content: no reset.
        assert!(!store.replace(vec!["a".into(), "b".into()]));
        assert_eq!(store.cursor(), 1);

        // Different content: reset.
        assert!(store.replace(vec!["a".into(), "c".into()]));
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn test_reload_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cat\n\ndog \n bird").unwrap();

        let mut store = TagStore::new();
        assert!(store.reload_from(file.path()).unwrap());
        assert_eq!(store.len(), 3);
        assert_eq!(store.current(), Some("cat"));

        // Second reload of the same content is a no-op.
        store.advance();
        assert!(!store.reload_from(file.path()).unwrap());
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn test_reload_missing_file_keeps_state() {
        let mut store = TagStore::new();
        store.replace(vec!["cat".into()]);
        store.advance();

        let err = store.reload_from(Path::new("no-such-tags-file.txt"));
        assert!(matches!(err, Err(TagFlowError::TagFile { .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.cursor(), 1);
    }

    #[test]
    fn test_status_line() {
        let mut store = TagStore::new();
        assert_eq!(store.status_line(), EXHAUSTED_NOTICE);

        store.replace(vec!["cat".into(), "dog".into()]);
        assert_eq!(store.status_line(), "Next tag: cat");

        store.advance();
        assert_eq!(store.status_line(), "Next tag: dog");

        store.advance();
        assert!(store.is_exhausted());
        assert_eq!(store.status_line(), EXHAUSTED_NOTICE);
    }

    #[test]
    fn test_advance_saturates() {
        let mut store = TagStore::new();
        store.replace(vec!["only".into()]);
        store.advance();
        store.advance();
        assert_eq!(store.cursor(), 1);
    }
}
