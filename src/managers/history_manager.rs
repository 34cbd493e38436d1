//! Per-tab back/forward navigation stack.
//!
//! Classic browser semantics: navigating from anywhere but the tip discards
//! the forward entries. Entries are raw URLs or search queries; the caller
//! re-resolves them when replaying.

use tracing::trace;

use crate::types::history::NavigationHistory;

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new navigation at `index + 1`, dropping any forward entries.
    pub fn navigate_to(&mut self, entry: &str) {
        let keep = self.cursor.map_or(0, |i| i + 1);
        self.entries.truncate(keep);
        self.entries.push(entry.to_string());
        self.cursor = Some(self.entries.len() - 1);
        trace!(entry, index = self.index(), len = self.entries.len(), "navigated");
    }

    /// Steps back one entry and returns it, or `None` at the start.
    pub fn go_back(&mut self) -> Option<&str> {
        match self.cursor {
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                Some(self.entries[i - 1].as_str())
            }
            _ => None,
        }
    }

    /// Steps forward one entry and returns it, or `None` at the tip.
    pub fn go_forward(&mut self) -> Option<&str> {
        match self.cursor {
            Some(i) if i + 1 < self.entries.len() => {
                self.cursor = Some(i + 1);
                Some(self.entries[i + 1].as_str())
            }
            _ => None,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor.map(|i| self.entries[i].as_str())
    }

    /// Cursor position, `-1` when the history is empty.
    pub fn index(&self) -> isize {
        self.cursor.map_or(-1, |i| i as isize)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.index() > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index() < self.entries.len() as isize - 1
    }
}
