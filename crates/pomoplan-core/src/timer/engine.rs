//! Active task controller.
//!
//! Owns the single live phase and its countdown. Like a wall-clock state
//! machine it has no thread of its own: the driver calls
//! [`ActiveTaskController::on_timer_fired`] once per tick period and the
//! controller works out how many whole periods actually elapsed.
//!
//! ## State Transitions
//!
//! ```text
//! Undefined -> Pending -> Active <-> Paused -> Completed
//!                 ^          |
//!                 +-- stop --+
//! ```
//!
//! Events are queued in an outbox and drained by the owner with
//! [`ActiveTaskController::take_events`], always after the state they
//! describe has been fully updated.

use chrono::Utc;

use super::clock::Clock;
use super::countdown::{apply_elapsed, Countdown, TimerHandle};
use super::phase::{ActivePhase, PhaseStatus, PhaseType};
use super::schedule::{next_phase, NextPhase, TimerSettings};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::task::{PlannedQueue, WorkItem};

pub struct ActiveTaskController {
    settings: TimerSettings,
    phase: ActivePhase,
    countdown: Option<Countdown>,
    clock: Box<dyn Clock>,
    next_handle: u64,
    outbox: Vec<Event>,
}

impl std::fmt::Debug for ActiveTaskController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveTaskController")
            .field("settings", &self.settings)
            .field("phase", &self.phase)
            .field("countdown", &self.countdown)
            .finish()
    }
}

impl ActiveTaskController {
    /// Create an idle controller.
    ///
    /// # Errors
    /// Returns a configuration error if any nominal duration is zero.
    pub fn new(settings: TimerSettings, clock: Box<dyn Clock>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            phase: ActivePhase::default(),
            countdown: None,
            clock,
            next_handle: 0,
            outbox: Vec::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active_task(&self) -> &ActivePhase {
        &self.phase
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn status(&self) -> PhaseStatus {
        self.phase.status
    }

    pub fn rest_ms(&self) -> u64 {
        self.phase.rest_ms
    }

    /// Active or paused.
    pub fn is_active(&self) -> bool {
        self.phase.is_running()
    }

    pub fn timer_handle(&self) -> Option<TimerHandle> {
        self.countdown.map(|c| c.handle)
    }

    pub fn is_counting_down(&self) -> bool {
        self.countdown.is_some()
    }

    /// Clock reading of the last accepted tick of the running countdown.
    pub fn last_tick_ms(&self) -> Option<u64> {
        self.countdown.map(|c| c.last_tick_ms)
    }

    /// Drain queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.outbox)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Result<()> {
        self.guard("start", &[PhaseStatus::Pending])?;
        self.phase.status = PhaseStatus::Active;
        self.start_countdown();
        tracing::debug!(phase = ?self.phase.phase_type, rest_ms = self.phase.rest_ms, "phase started");
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.guard("pause", &[PhaseStatus::Active])?;
        self.flush_elapsed();
        if self.phase.status == PhaseStatus::Completed {
            return Ok(());
        }
        self.stop_countdown();
        self.phase.status = PhaseStatus::Paused;
        tracing::debug!(rest_ms = self.phase.rest_ms, "phase paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.guard("resume", &[PhaseStatus::Paused])?;
        self.phase.status = PhaseStatus::Active;
        self.start_countdown();
        tracing::debug!(rest_ms = self.phase.rest_ms, "phase resumed");
        Ok(())
    }

    /// Abort the countdown and rewind to the full nominal duration.
    pub fn stop(&mut self) -> Result<()> {
        self.guard("stop", &[PhaseStatus::Active])?;
        self.stop_countdown();
        self.phase.status = PhaseStatus::Pending;
        self.phase.rest_ms = self.settings.nominal_ms(self.phase.phase_type);
        tracing::debug!(rest_ms = self.phase.rest_ms, "phase stopped");
        Ok(())
    }

    pub fn complete(&mut self) -> Result<()> {
        self.guard("complete", &[PhaseStatus::Active, PhaseStatus::Paused])?;
        self.flush_elapsed();
        if self.phase.status == PhaseStatus::Completed {
            return Ok(());
        }
        self.stop_countdown();
        self.phase.status = PhaseStatus::Completed;
        self.emit_completed();
        Ok(())
    }

    /// Timer callback. Applies elapsed whole periods to the running phase.
    pub fn on_timer_fired(&mut self) {
        self.flush_elapsed();
    }

    /// Install whatever follows the current phase.
    ///
    /// Breaks start counting down immediately; work waits for an explicit
    /// start. `rest_override` replaces the work duration of a new `Task`.
    pub fn activate_next_task(&mut self, queue: &PlannedQueue, rest_override: Option<u64>) {
        let current = match self.phase.phase_type {
            PhaseType::Undefined => None,
            _ => Some(&self.phase),
        };
        let streak = self.phase.short_break_count;
        let next = next_phase(current, queue, self.settings.max_short_breaks_serie);
        self.stop_countdown();

        match next {
            NextPhase::Task(task) => {
                self.phase = ActivePhase {
                    phase_type: PhaseType::Task,
                    status: PhaseStatus::Pending,
                    task: Some(task),
                    rest_ms: rest_override.unwrap_or(self.settings.task_ms),
                    short_break_count: streak,
                };
            }
            NextPhase::ShortBreak => {
                self.install_break(PhaseType::ShortBreak, streak.saturating_add(1))
            }
            NextPhase::LongBreak => self.install_break(PhaseType::LongBreak, 0),
            NextPhase::Idle => {
                self.phase = ActivePhase::undefined(streak);
                tracing::info!("no planned work left, going idle");
                self.outbox.push(Event::Idle { at: Utc::now() });
                return;
            }
        }
        tracing::debug!(
            phase = ?self.phase.phase_type,
            status = %self.phase.status,
            short_break_count = self.phase.short_break_count,
            "phase activated"
        );
        self.outbox.push(Event::PhaseActivated {
            phase: self.phase.clone(),
        });
    }

    /// Install a phase as-is, typically one restored from storage.
    ///
    /// An `Active` phase counts down from `last_tick_ms` when given, so
    /// whole periods that passed since then are applied right away and may
    /// complete the phase.
    pub fn activate_task(&mut self, phase: ActivePhase, last_tick_ms: Option<u64>) {
        self.stop_countdown();
        self.phase = phase;
        if self.phase.status == PhaseStatus::Active {
            self.start_countdown();
            let now = self.clock.now_ms();
            if let (Some(last), Some(countdown)) = (last_tick_ms, self.countdown.as_mut()) {
                // A clock that went backwards restarts the period.
                countdown.last_tick_ms = last.min(now);
            }
            self.flush_elapsed();
        }
        tracing::debug!(phase = ?self.phase.phase_type, status = %self.phase.status, "phase restored");
    }

    /// Point the current `Task` phase at another work item, keeping its
    /// status and remaining time.
    pub fn set_active_task(&mut self, task: WorkItem) -> Result<()> {
        if self.phase.phase_type != PhaseType::Task {
            return Err(CoreError::InvalidTransition {
                operation: "rebind task",
                expected: &[PhaseStatus::Pending, PhaseStatus::Active, PhaseStatus::Paused],
                actual: self.phase.status,
            });
        }
        tracing::debug!(task = %task.id, "active task rebound");
        self.phase.task = Some(task);
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn guard(&self, operation: &'static str, expected: &'static [PhaseStatus]) -> Result<()> {
        if expected.contains(&self.phase.status) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                operation,
                expected,
                actual: self.phase.status,
            })
        }
    }

    /// Apply whole periods elapsed since the last accepted tick.
    fn flush_elapsed(&mut self) {
        let Some(countdown) = self.countdown else {
            return;
        };
        let now = self.clock.now_ms();
        let Some(tick) = apply_elapsed(&self.phase, countdown.last_tick_ms, now) else {
            return;
        };
        let completed = tick.completed();
        self.phase = tick.phase;
        self.countdown = Some(Countdown {
            last_tick_ms: tick.last_tick_ms,
            ..countdown
        });
        self.outbox.push(Event::Tick {
            rest_ms: self.phase.rest_ms,
        });
        if completed {
            self.stop_countdown();
            self.emit_completed();
        }
    }

    fn install_break(&mut self, phase_type: PhaseType, short_break_count: u32) {
        self.phase = ActivePhase {
            phase_type,
            status: PhaseStatus::Active,
            task: Some(WorkItem::new("", phase_type.label())),
            rest_ms: self.settings.nominal_ms(phase_type),
            short_break_count,
        };
        self.start_countdown();
    }

    fn emit_completed(&mut self) {
        tracing::info!(phase = ?self.phase.phase_type, rest_ms = self.phase.rest_ms, "phase completed");
        self.outbox.push(Event::PhaseCompleted {
            phase: self.phase.clone(),
            at: Utc::now(),
        });
    }

    fn start_countdown(&mut self) {
        // Never two countdowns at once.
        self.stop_countdown();
        let handle = TimerHandle::new(self.next_handle);
        self.next_handle += 1;
        self.countdown = Some(Countdown {
            handle,
            last_tick_ms: self.clock.now_ms(),
        });
    }

    fn stop_countdown(&mut self) {
        self.countdown = None;
    }
}
