mod clock;
mod countdown;
pub mod driver;
mod engine;
mod phase;
mod schedule;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{apply_elapsed, Countdown, Tick, TimerHandle, TICK_PERIOD_MS};
pub use engine::ActiveTaskController;
pub use phase::{format_rest, ActivePhase, PhaseStatus, PhaseType};
pub use schedule::{next_phase, NextPhase, TimerSettings};
