// History log - Cursor-addressed snapshots for undo/redo
use crate::domain::dashboard::DashboardConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub snapshot: DashboardConfig,
    pub timestamp: DateTime<Utc>,
    pub action: String,
}

/// Summary of an entry without the snapshot, for listing.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub index: usize,
    pub action: String,
    pub timestamp: DateTime<Utc>,
    pub current: bool,
}

/// Bounded linear history.
///
/// The cursor is `None` only while the log is empty. Appending after an undo
/// discards the redo branch. Snapshots are owned clones, so later edits to
/// the live document never reach them.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    cursor: Option<usize>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    pub fn push(&mut self, snapshot: &DashboardConfig, action: impl Into<String>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);

        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }

        self.entries.push_back(HistoryEntry {
            snapshot: snapshot.clone(),
            timestamp: Utc::now(),
            action: action.into(),
        });
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Drop everything and start over from a single entry.
    pub fn reset(&mut self, snapshot: &DashboardConfig, action: impl Into<String>) {
        self.entries.clear();
        self.cursor = None;
        self.push(snapshot, action);
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Step back one entry and return the snapshot now under the cursor.
    pub fn undo(&mut self) -> Option<&DashboardConfig> {
        if !self.can_undo() {
            return None;
        }
        let cursor = self.cursor? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    /// Step forward one entry and return the snapshot now under the cursor.
    pub fn redo(&mut self) -> Option<&DashboardConfig> {
        if !self.can_redo() {
            return None;
        }
        let cursor = self.cursor? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).map(|e| &e.snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn items(&self) -> Vec<HistoryItem> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryItem {
                index,
                action: entry.action.clone(),
                timestamp: entry.timestamp,
                current: Some(index) == self.cursor,
            })
            .collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
