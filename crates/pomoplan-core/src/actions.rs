//! Application actions.
//!
//! [`AppContext`] is the one object a front-end talks to. It owns the plan,
//! the archive and the [`ActiveTaskController`], and keeps them consistent:
//! every action mutates the collections, re-synchronizes the active phase
//! and only then publishes the resulting events.
//!
//! A `Task` phase is bound to the head of the plan. Any mutation that
//! changes the head re-binds the phase without touching its countdown.

use chrono::Utc;

use crate::error::{CoreError, Result, ValidationError};
use crate::events::{Event, EventBus, Subscription};
use crate::storage::{ArchiveTasks, PersistedState, PlanTasks, Theme};
use crate::task::{ArchiveEntry, ArchiveStatistics, PlanStatistics, TaskId, WorkItem};
use crate::timer::{ActivePhase, ActiveTaskController, Clock, PhaseType, TimerSettings};

pub struct AppContext {
    controller: ActiveTaskController,
    plan: PlanTasks,
    archive: ArchiveTasks,
    editing_task_id: Option<TaskId>,
    theme: Theme,
    bus: EventBus<Event>,
}

impl AppContext {
    /// Build the context, restoring `state` when given.
    ///
    /// A persisted active phase is resumed only if it survives
    /// sanitizing; otherwise the plan head becomes the pending task. A
    /// running countdown is caught up from the saved last tick, so the
    /// phase may complete (and archive its work) during construction.
    ///
    /// # Errors
    /// Returns a configuration error if `settings` has zero durations.
    pub fn new(
        settings: TimerSettings,
        clock: Box<dyn Clock>,
        state: Option<PersistedState>,
    ) -> Result<Self> {
        let controller = ActiveTaskController::new(settings, clock)?;
        let state = state.unwrap_or_default();

        let mut ctx = Self {
            controller,
            plan: state.plan_tasks,
            archive: state.archive_tasks,
            editing_task_id: None,
            theme: state.theme,
            bus: EventBus::new(),
        };
        let editing = state
            .editing_task_id
            .filter(|id| ctx.plan.tasks.get(id).is_some());
        ctx.editing_task_id = editing;
        ctx.refresh_plan_statistics();
        ctx.refresh_archive_statistics();

        let streak = state
            .active_task
            .as_ref()
            .map_or(0, |phase| phase.short_break_count);
        let was_idle = state
            .active_task
            .as_ref()
            .map_or(true, |phase| phase.phase_type == PhaseType::Undefined);
        match state.active_task.and_then(ActivePhase::sanitized) {
            Some(phase) => ctx.controller.activate_task(phase, state.last_tick_ms),
            None => {
                if !was_idle {
                    tracing::debug!("persisted phase cannot be resumed, starting from the plan");
                }
                ctx.controller.activate_task(ActivePhase::undefined(streak), None);
                ctx.controller.activate_next_task(&ctx.plan.tasks, None);
            }
        }
        // Time spent while no process ran may have finished the phase.
        ctx.dispatch()?;
        ctx.sync_active_with_head()?;
        Ok(ctx)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn active_task(&self) -> &ActivePhase {
        self.controller.active_task()
    }

    pub fn plan(&self) -> &PlanTasks {
        &self.plan
    }

    pub fn archive(&self) -> &ArchiveTasks {
        &self.archive
    }

    pub fn editing_task_id(&self) -> Option<&TaskId> {
        self.editing_task_id.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn settings(&self) -> &TimerSettings {
        self.controller.settings()
    }

    pub fn is_counting_down(&self) -> bool {
        self.controller.is_counting_down()
    }

    /// Current state in its persisted shape.
    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            active_task: Some(self.controller.active_task().clone()),
            plan_tasks: self.plan.clone(),
            archive_tasks: self.archive.clone(),
            editing_task_id: self.editing_task_id.clone(),
            theme: self.theme,
            last_tick_ms: self.controller.last_tick_ms(),
        }
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&Event) + 'static) -> Subscription {
        self.bus.subscribe(listener)
    }

    /// Listen to remaining-time updates only.
    pub fn register_timer_tick_event_listener(
        &mut self,
        mut handler: impl FnMut(u64) + 'static,
    ) -> Subscription {
        self.bus.subscribe(move |event| {
            if let Event::Tick { rest_ms } = event {
                handler(*rest_ms);
            }
        })
    }

    // ── Plan actions ─────────────────────────────────────────────────

    /// Put a new item at the head of the plan.
    ///
    /// Without a work phase in progress (idle or on a break) the new item
    /// becomes the pending task right away.
    pub fn add_task(&mut self, item: WorkItem) -> Result<()> {
        validate_description(&item)?;
        self.plan.tasks.push_front(item.clone(), 1)?;
        self.refresh_plan_statistics();
        tracing::debug!(task = %item.id, "task added");

        if self.controller.active_task().is_task() {
            self.sync_active_with_head()?;
        } else {
            self.controller.activate_next_task(&self.plan.tasks, None);
        }
        self.dispatch()
    }

    /// Add one repeat. Returns the new count.
    pub fn inc_task(&mut self, id: &TaskId) -> Result<u32> {
        let count = self.plan.tasks.increment(id)?;
        self.refresh_plan_statistics();
        tracing::debug!(task = %id, count, "task incremented");
        Ok(count)
    }

    /// Drop one repeat without archiving it.
    pub fn dec_task(&mut self, id: &TaskId) -> Result<()> {
        let removal = self.plan.tasks.remove_one(id)?;
        if removal.emptied && self.editing_task_id.as_ref() == Some(id) {
            self.editing_task_id = None;
        }
        self.refresh_plan_statistics();
        tracing::debug!(task = %id, emptied = removal.emptied, "task decremented");
        self.sync_active_with_head()?;
        self.dispatch()
    }

    /// Move one repeat of a planned item to the archive.
    ///
    /// `rest_ms` is what was left of the work interval; without it the
    /// full work duration is recorded. When this empties the plan head
    /// while it is the active task, the next phase is installed.
    pub fn archive_task(&mut self, id: &TaskId, rest_ms: Option<u64>) -> Result<ArchiveEntry> {
        let (entry, head_emptied) = self.archive_one(id, rest_ms)?;
        if head_emptied && self.controller.active_task().is_task() {
            self.controller.activate_next_task(&self.plan.tasks, None);
        }
        self.sync_active_with_head()?;
        self.dispatch()?;
        Ok(entry)
    }

    pub fn delete_archive_task(&mut self, index: usize) -> Result<ArchiveEntry> {
        let entry = self.archive.tasks.remove(index)?;
        self.refresh_archive_statistics();
        tracing::debug!(task = %entry.task.id, index, "archive entry deleted");
        Ok(entry)
    }

    /// Move the plan entry at `from` to `to`.
    pub fn reorder_tasks(&mut self, from: usize, to: usize) -> Result<()> {
        self.plan.tasks.move_entry(from, to)?;
        self.refresh_plan_statistics();
        tracing::debug!(from, to, "tasks reordered");
        self.sync_active_with_head()?;
        self.dispatch()
    }

    pub fn start_edit_task(&mut self, id: &TaskId) -> Result<()> {
        if self.plan.tasks.get(id).is_none() {
            return Err(CoreError::not_found("Plan task", id));
        }
        self.editing_task_id = Some(id.clone());
        Ok(())
    }

    /// Replace the category and description of a planned item.
    pub fn complete_edit_task(&mut self, item: WorkItem) -> Result<()> {
        validate_description(&item)?;
        self.plan.tasks.replace(item)?;
        self.editing_task_id = None;
        self.refresh_plan_statistics();
        self.sync_active_with_head()?;
        self.dispatch()
    }

    pub fn cancel_edit_task(&mut self) {
        self.editing_task_id = None;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    // ── Phase actions ────────────────────────────────────────────────

    pub fn start_task(&mut self) -> Result<()> {
        self.controller.start()?;
        self.dispatch()
    }

    pub fn stop_task(&mut self) -> Result<()> {
        self.controller.stop()?;
        self.dispatch()
    }

    pub fn pause_task(&mut self) -> Result<()> {
        self.controller.pause()?;
        self.dispatch()
    }

    pub fn resume_task(&mut self) -> Result<()> {
        self.controller.resume()?;
        self.dispatch()
    }

    /// Finish the current phase early. A work interval is archived with
    /// the time actually spent.
    pub fn complete_task(&mut self) -> Result<()> {
        self.controller.complete()?;
        self.dispatch()
    }

    /// Timer callback.
    pub fn on_timer_fired(&mut self) -> Result<()> {
        self.controller.on_timer_fired();
        self.dispatch()
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Publish queued controller events, handling completions in between.
    fn dispatch(&mut self) -> Result<()> {
        loop {
            let events = self.controller.take_events();
            if events.is_empty() {
                return Ok(());
            }
            for event in events {
                self.bus.emit(&event);
                if let Event::PhaseCompleted { phase, .. } = event {
                    self.handle_completed(phase)?;
                }
            }
        }
    }

    fn handle_completed(&mut self, phase: ActivePhase) -> Result<()> {
        if !phase.is_task() {
            self.controller.activate_next_task(&self.plan.tasks, None);
            return self.sync_active_with_head();
        }

        // The break is earned against the plan as it stood when the
        // interval ended.
        let plan_at_completion = self.plan.tasks.clone();
        if let Some(task) = &phase.task {
            match self.archive_one(&task.id, Some(phase.rest_ms)) {
                Ok(_) => {}
                Err(CoreError::NotFound { .. }) => {
                    tracing::debug!(task = %task.id, "completed task left the plan, not archived");
                }
                Err(e) => return Err(e),
            }
        }
        self.controller.activate_next_task(&plan_at_completion, None);
        self.sync_active_with_head()
    }

    /// Archive one repeat. Reports whether the plan head entry is gone.
    fn archive_one(&mut self, id: &TaskId, rest_ms: Option<u64>) -> Result<(ArchiveEntry, bool)> {
        let removal = self.plan.tasks.remove_one(id)?;
        let entry = ArchiveEntry::new(removal.task, self.settings().task_ms, rest_ms);
        self.archive.tasks.prepend(entry.clone());
        if removal.emptied && self.editing_task_id.as_ref() == Some(id) {
            self.editing_task_id = None;
        }
        self.refresh_plan_statistics();
        self.refresh_archive_statistics();
        tracing::info!(task = %id, task_time_ms = entry.task_time_ms, "task archived");

        self.bus.emit(&Event::TaskArchived {
            entry: entry.clone(),
        });
        Ok((entry, removal.emptied && removal.index == 0))
    }

    /// Keep a `Task` phase bound to the plan head.
    fn sync_active_with_head(&mut self) -> Result<()> {
        let phase = self.controller.active_task();
        if !phase.is_task() {
            return Ok(());
        }
        match self.plan.tasks.head() {
            None => {
                self.controller.activate_next_task(&self.plan.tasks, None);
                Ok(())
            }
            Some(head) if phase.task.as_ref() != Some(head) => {
                let head = head.clone();
                self.controller.set_active_task(head)
            }
            Some(_) => Ok(()),
        }
    }

    fn refresh_plan_statistics(&mut self) {
        self.plan.statistics =
            PlanStatistics::compute(&self.plan.tasks, self.controller.settings(), Utc::now());
    }

    fn refresh_archive_statistics(&mut self) {
        self.archive.statistics = ArchiveStatistics::compute(&self.archive.tasks);
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("controller", &self.controller)
            .field("plan", &self.plan)
            .field("archive", &self.archive)
            .field("editing_task_id", &self.editing_task_id)
            .field("theme", &self.theme)
            .finish()
    }
}

fn validate_description(item: &WorkItem) -> Result<()> {
    if item.description.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "description".into(),
            message: "must not be empty".into(),
        }
        .into());
    }
    Ok(())
}
