//! Phase durations and the policy that picks the next phase.

use serde::{Deserialize, Serialize};

use super::phase::{ActivePhase, PhaseType};
use crate::error::{ConfigError, Result};
use crate::task::{PlannedQueue, WorkItem};

const MINUTE_MS: u64 = 60 * 1000;

/// Nominal phase durations and the long-break cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub task_ms: u64,
    pub short_break_ms: u64,
    pub long_break_ms: u64,
    /// Short breaks allowed in a row before a long one.
    pub max_short_breaks_serie: u32,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            task_ms: 25 * MINUTE_MS,
            short_break_ms: 5 * MINUTE_MS,
            long_break_ms: 15 * MINUTE_MS,
            max_short_breaks_serie: 3,
        }
    }
}

impl TimerSettings {
    /// Reject zero durations.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("task_ms", self.task_ms),
            ("short_break_ms", self.short_break_ms),
            ("long_break_ms", self.long_break_ms),
        ];
        for (key, value) in fields {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "duration must be greater than zero".into(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Full length of a phase of the given type.
    pub fn nominal_ms(&self, phase_type: PhaseType) -> u64 {
        match phase_type {
            PhaseType::Task => self.task_ms,
            PhaseType::ShortBreak => self.short_break_ms,
            PhaseType::LongBreak => self.long_break_ms,
            PhaseType::Undefined => 0,
        }
    }
}

/// What should follow the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPhase {
    Task(WorkItem),
    ShortBreak,
    LongBreak,
    Idle,
}

/// Decide the phase that follows `current`.
///
/// Work always follows a break or idleness, taken from the queue head.
/// A finished work interval earns a short break until the streak reaches
/// `max_short_breaks_serie`, then a long one. An empty queue means idle.
pub fn next_phase(
    current: Option<&ActivePhase>,
    queue: &PlannedQueue,
    max_short_breaks_serie: u32,
) -> NextPhase {
    let Some(head) = queue.head() else {
        return NextPhase::Idle;
    };
    match current {
        Some(phase) if phase.phase_type == PhaseType::Task => {
            if phase.short_break_count >= max_short_breaks_serie {
                NextPhase::LongBreak
            } else {
                NextPhase::ShortBreak
            }
        }
        _ => NextPhase::Task(head.clone()),
    }
}
