//! Record of finished work intervals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WorkItem;
use crate::error::{CoreError, Result};

/// One completed or abandoned work interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub task: WorkItem,
    pub completed_at: DateTime<Utc>,
    /// Time actually spent, in milliseconds.
    pub task_time_ms: u64,
}

impl ArchiveEntry {
    /// Build an entry from the nominal interval length and what was left of it.
    pub fn new(task: WorkItem, nominal_ms: u64, rest_ms: Option<u64>) -> Self {
        let task_time_ms = match rest_ms {
            Some(rest) => nominal_ms.saturating_sub(rest),
            None => nominal_ms,
        };
        Self {
            task,
            completed_at: Utc::now(),
            task_time_ms,
        }
    }
}

/// Archive entries, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prepend(&mut self, entry: ArchiveEntry) {
        self.entries.insert(0, entry);
    }

    pub fn remove(&mut self, index: usize) -> Result<ArchiveEntry> {
        if index >= self.entries.len() {
            return Err(CoreError::not_found("Archive task", index));
        }
        Ok(self.entries.remove(index))
    }
}

impl FromIterator<ArchiveEntry> for Archive {
    fn from_iter<I: IntoIterator<Item = ArchiveEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
