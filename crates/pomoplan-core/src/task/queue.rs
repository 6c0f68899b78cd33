//! The ordered queue of planned work.
//!
//! Position 0 is always the next work item. Entries never hold a count of
//! zero: decrementing the last repeat removes the entry.

use serde::{Deserialize, Serialize};

use super::{TaskId, WorkItem};
use crate::error::{CoreError, Result, ValidationError};

/// One queued work item and how many repeats of it remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedEntry {
    pub task: WorkItem,
    pub count: u32,
}

/// Result of removing one repeat from the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub task: WorkItem,
    /// Position the entry occupied before removal.
    pub index: usize,
    /// Whether the entry left the queue entirely.
    pub emptied: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlannedQueue {
    entries: Vec<PlannedEntry>,
}

impl PlannedQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PlannedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The next work item, if any.
    pub fn head(&self) -> Option<&WorkItem> {
        self.entries.first().map(|e| &e.task)
    }

    pub fn get(&self, id: &TaskId) -> Option<&PlannedEntry> {
        self.entries.iter().find(|e| &e.task.id == id)
    }

    pub fn position(&self, id: &TaskId) -> Option<usize> {
        self.entries.iter().position(|e| &e.task.id == id)
    }

    /// Total number of repeats across all entries.
    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.count)).sum()
    }

    /// Insert a new entry at the head with the given repeat count.
    pub fn push_front(&mut self, task: WorkItem, count: u32) -> Result<()> {
        if count == 0 {
            return Err(ValidationError::InvalidValue {
                field: "count".into(),
                message: "must be at least 1".into(),
            }
            .into());
        }
        if self.position(&task.id).is_some() {
            return Err(ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("task {} is already planned", task.id),
            }
            .into());
        }
        self.entries.insert(0, PlannedEntry { task, count });
        Ok(())
    }

    /// Add one repeat. Returns the new count.
    pub fn increment(&mut self, id: &TaskId) -> Result<u32> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.task.id == id)
            .ok_or_else(|| CoreError::not_found("Plan task", id))?;
        entry.count = entry.count.saturating_add(1);
        Ok(entry.count)
    }

    /// Remove one repeat, dropping the entry when it was the last one.
    pub fn remove_one(&mut self, id: &TaskId) -> Result<Removal> {
        let index = self
            .position(id)
            .ok_or_else(|| CoreError::not_found("Plan task", id))?;
        let entry = &mut self.entries[index];
        if entry.count > 1 {
            entry.count -= 1;
            return Ok(Removal {
                task: entry.task.clone(),
                index,
                emptied: false,
            });
        }
        let entry = self.entries.remove(index);
        Ok(Removal {
            task: entry.task,
            index,
            emptied: true,
        })
    }

    /// Replace the category and description of a queued item, keeping its id.
    pub fn replace(&mut self, task: WorkItem) -> Result<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.task.id == task.id)
            .ok_or_else(|| CoreError::not_found("Plan task", &task.id))?;
        entry.task = task;
        Ok(())
    }

    /// Move the entry at `from` so that it ends up at `to`.
    ///
    /// Equal indices and an empty queue are no-ops.
    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        if self.entries.is_empty() || from == to {
            return Ok(());
        }
        let len = self.entries.len();
        for index in [from, to] {
            if index >= len {
                return Err(ValidationError::OutOfBounds {
                    collection: "plan tasks".into(),
                    index,
                    len,
                }
                .into());
            }
        }
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }
}

impl FromIterator<PlannedEntry> for PlannedQueue {
    fn from_iter<I: IntoIterator<Item = PlannedEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
