//! Countdown bookkeeping as a pure reducer.
//!
//! A running countdown is a [`Countdown`] value: the handle identifying it
//! and the clock reading of the last accepted tick. [`apply_elapsed`] turns
//! a phase plus a clock reading into the next phase without touching any
//! timer, which keeps drift compensation testable with a fake clock.

use super::phase::{ActivePhase, PhaseStatus};

/// Countdown granularity in milliseconds.
pub const TICK_PERIOD_MS: u64 = 1000;

/// Identity of one running countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub handle: TimerHandle,
    /// Clock reading that whole periods are counted from.
    pub last_tick_ms: u64,
}

/// Outcome of one accepted tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub phase: ActivePhase,
    pub last_tick_ms: u64,
    /// Whole periods subtracted by this tick.
    pub periods: u64,
}

impl Tick {
    pub fn completed(&self) -> bool {
        self.phase.status == PhaseStatus::Completed
    }
}

/// Subtract the whole tick periods elapsed since `last_tick_ms`.
///
/// Returns `None` when less than one period has passed. The new reference
/// point is `now - remainder`, so a late callback does not lose the
/// sub-period fraction.
pub fn apply_elapsed(phase: &ActivePhase, last_tick_ms: u64, now_ms: u64) -> Option<Tick> {
    let elapsed = now_ms.saturating_sub(last_tick_ms);
    if elapsed < TICK_PERIOD_MS {
        return None;
    }
    let periods = elapsed / TICK_PERIOD_MS;
    let remainder = elapsed % TICK_PERIOD_MS;

    let mut next = phase.clone();
    next.rest_ms = phase.rest_ms.saturating_sub(periods * TICK_PERIOD_MS);
    if next.rest_ms == 0 {
        next.status = PhaseStatus::Completed;
    }
    Some(Tick {
        phase: next,
        last_tick_ms: now_ms - remainder,
        periods,
    })
}
