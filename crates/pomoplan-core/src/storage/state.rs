//! Shape of the application state handed to storage.

use serde::{Deserialize, Serialize};

use crate::task::{Archive, ArchiveStatistics, PlanStatistics, PlannedQueue, TaskId};
use crate::timer::ActivePhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTasks {
    pub tasks: PlannedQueue,
    pub statistics: PlanStatistics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveTasks {
    pub tasks: Archive,
    pub statistics: ArchiveStatistics,
}

/// Everything that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub active_task: Option<ActivePhase>,
    #[serde(default)]
    pub plan_tasks: PlanTasks,
    #[serde(default)]
    pub archive_tasks: ArchiveTasks,
    #[serde(default)]
    pub editing_task_id: Option<TaskId>,
    #[serde(default)]
    pub theme: Theme,
    /// Clock reading of the last accepted tick while a countdown ran.
    #[serde(default)]
    pub last_tick_ms: Option<u64>,
}
