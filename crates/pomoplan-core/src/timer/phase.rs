//! The active phase: what is happening right now.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::task::WorkItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseType {
    /// Idle placeholder.
    #[default]
    Undefined,
    Task,
    ShortBreak,
    LongBreak,
}

impl PhaseType {
    pub fn is_break(self) -> bool {
        matches!(self, PhaseType::ShortBreak | PhaseType::LongBreak)
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseType::Undefined | PhaseType::Task => "Pomodoro",
            PhaseType::ShortBreak => "Short break",
            PhaseType::LongBreak => "Long break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    #[default]
    Undefined,
    Pending,
    Active,
    Paused,
    Completed,
}

impl fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PhaseStatus::Undefined => "undefined",
            PhaseStatus::Pending => "pending",
            PhaseStatus::Active => "active",
            PhaseStatus::Paused => "paused",
            PhaseStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// State of the single live phase.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActivePhase {
    pub phase_type: PhaseType,
    pub status: PhaseStatus,
    /// The work item for `Task`, a synthetic label item for breaks.
    #[serde(default)]
    pub task: Option<WorkItem>,
    /// Remaining time in milliseconds.
    pub rest_ms: u64,
    /// Short breaks taken since the last long break.
    #[serde(default)]
    pub short_break_count: u32,
}

impl ActivePhase {
    /// Idle placeholder that keeps the short-break streak.
    pub fn undefined(short_break_count: u32) -> Self {
        Self {
            short_break_count,
            ..Self::default()
        }
    }

    /// Whether the phase has a live or halted countdown.
    pub fn is_running(&self) -> bool {
        matches!(self.status, PhaseStatus::Active | PhaseStatus::Paused)
    }

    pub fn is_task(&self) -> bool {
        self.phase_type == PhaseType::Task
    }

    /// Drop phases that must not be resumed after a restart.
    pub fn sanitized(self) -> Option<Self> {
        if self.phase_type == PhaseType::Undefined
            || matches!(self.status, PhaseStatus::Undefined | PhaseStatus::Completed)
        {
            return None;
        }
        if self.rest_ms == 0 {
            return None;
        }
        if self.phase_type == PhaseType::Task && self.task.is_none() {
            return None;
        }
        Some(self)
    }

    /// One-line title, `"mm:ss - label"` while counting down.
    pub fn title(&self) -> String {
        if self.is_running() {
            format!("{} - {}", format_rest(self.rest_ms), self.phase_type.label())
        } else {
            "Pomodoro".to_string()
        }
    }
}

/// Format milliseconds as `mm:ss`, truncating partial seconds.
pub fn format_rest(rest_ms: u64) -> String {
    let secs = rest_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_phase(status: PhaseStatus, rest_ms: u64) -> ActivePhase {
        ActivePhase {
            phase_type: PhaseType::Task,
            status,
            task: Some(WorkItem::with_id("a", "", "A")),
            rest_ms,
            short_break_count: 0,
        }
    }

    #[test]
    fn sanitize_discards_stale_phases() {
        assert!(ActivePhase::default().sanitized().is_none());
        assert!(task_phase(PhaseStatus::Undefined, 1000).sanitized().is_none());
        assert!(task_phase(PhaseStatus::Active, 0).sanitized().is_none());
        assert!(task_phase(PhaseStatus::Completed, 1000).sanitized().is_none());

        let mut missing_task = task_phase(PhaseStatus::Pending, 1000);
        missing_task.task = None;
        assert!(missing_task.sanitized().is_none());

        assert!(task_phase(PhaseStatus::Paused, 1000).sanitized().is_some());
    }

    #[test]
    fn title_shows_countdown_only_when_running() {
        assert_eq!(task_phase(PhaseStatus::Active, 754_900).title(), "12:34 - Pomodoro");
        assert_eq!(task_phase(PhaseStatus::Pending, 754_900).title(), "Pomodoro");
        let mut brk = task_phase(PhaseStatus::Paused, 60_000);
        brk.phase_type = PhaseType::LongBreak;
        assert_eq!(brk.title(), "01:00 - Long break");
    }
}
