//! # History
//!
//! The push/read surface of the platform's history stack. The navigator is
//! the only writer; the runtime may read `entries()` to show the stack.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub path: String,
    pub pushed_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            pushed_at: Utc::now(),
        }
    }
}

pub trait History {
    /// The path the platform is currently showing.
    fn current(&self) -> &str;

    /// Adds an entry after the current one, discarding any forward entries.
    fn push(&mut self, path: &str);

    /// Steps back one entry. `None` at the start of the stack.
    fn back(&mut self) -> Option<String>;

    /// Steps forward one entry. `None` at the end of the stack.
    fn forward(&mut self) -> Option<String>;

    fn entries(&self) -> &[HistoryEntry];

    /// Index of the current entry within `entries()`.
    fn position(&self) -> usize;
}

/// In-process history stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![HistoryEntry::new(&path::normalize(initial))],
            index: 0,
        }
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl History for MemoryHistory {
    fn current(&self) -> &str {
        &self.entries[self.index].path
    }

    fn push(&mut self, path: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry::new(path));
        self.index = self.entries.len() - 1;
        debug!("History push {} (depth {})", path, self.entries.len());
    }

    fn back(&mut self) -> Option<String> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current().to_string())
    }

    fn forward(&mut self) -> Option<String> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current().to_string())
    }

    fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    fn position(&self) -> usize {
        self.index
    }
}
