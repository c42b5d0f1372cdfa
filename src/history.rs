// src/history.rs
use std::collections::VecDeque;
use chrono::{DateTime, Local};

/// A target submitted for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub target: String,
    pub submitted_at: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(target: impl Into<String>, submitted_at: DateTime<Local>) -> Self {
        Self {
            target: target.into(),
            submitted_at,
        }
    }
}

/// Session history capped at `capacity` entries; the oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, returning the one evicted to make room
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
