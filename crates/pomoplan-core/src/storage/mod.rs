//! Persistence: application state in SQLite, preferences in TOML.

mod config;
pub mod database;
mod state;
mod throttle;

pub use config::{Config, PersistenceConfig, ScheduleConfig};
pub use database::Database;
pub use state::{ArchiveTasks, PersistedState, PlanTasks, Theme};
pub use throttle::Throttle;

use std::path::PathBuf;

use crate::error::Result;

/// Returns the data directory, creating it if needed.
///
/// `POMOPLAN_DATA_DIR` is used verbatim when set. Otherwise this is
/// `~/.config/pomoplan/`, or `~/.config/pomoplan-dev/` with
/// `POMOPLAN_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("POMOPLAN_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomoplan-dev")
            } else {
                base_dir.join("pomoplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
