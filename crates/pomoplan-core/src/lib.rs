//! # Pomoplan Core Library
//!
//! Core logic of a planning Pomodoro timer: a queue of planned work items,
//! an archive of finished intervals and a controller for the single active
//! phase (work, short break, long break) with its countdown.
//!
//! ## Architecture
//!
//! - **Timer**: a cooperative countdown. The caller fires
//!   [`AppContext::on_timer_fired`] once per tick period (see
//!   [`timer::driver`]) and the controller compensates for late firings.
//! - **Actions**: [`AppContext`] keeps the plan, the archive and the active
//!   phase consistent and publishes [`Event`]s to subscribers.
//! - **Storage**: the whole state as JSON in SQLite, preferences in TOML.
//!
//! ## Key Components
//!
//! - [`AppContext`]: the entry point for every user action
//! - [`ActiveTaskController`]: phase state machine and countdown
//! - [`next_phase`]: what follows the current phase
//! - [`Database`]: state persistence
//! - [`Config`]: application configuration

pub mod actions;
pub mod error;
pub mod events;
pub mod storage;
pub mod task;
pub mod timer;

pub use actions::AppContext;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::{Event, EventBus, Subscription};
pub use storage::{Config, Database, PersistedState, Theme, Throttle};
pub use task::{Archive, ArchiveEntry, Category, PlannedQueue, TaskId, WorkItem};
pub use timer::{
    next_phase, ActivePhase, ActiveTaskController, Clock, ManualClock, NextPhase,
    PhaseStatus, PhaseType, SystemClock, TimerSettings,
};
