//! Integration tests for a full work/break cycle driven by the clock.

use std::cell::RefCell;
use std::rc::Rc;

use pomoplan_core::{
    AppContext, Event, ManualClock, PhaseStatus, PhaseType, TimerSettings, WorkItem,
};

const SEC: u64 = 1000;

fn settings() -> TimerSettings {
    TimerSettings {
        task_ms: 25 * SEC,
        short_break_ms: 5 * SEC,
        long_break_ms: 15 * SEC,
        max_short_breaks_serie: 2,
    }
}

/// Fire the timer once per second until the current phase is replaced.
fn run_phase_out(ctx: &mut AppContext, clock: &ManualClock) {
    let phase_type = ctx.active_task().phase_type;
    let short_breaks = ctx.active_task().short_break_count;
    for _ in 0..120 {
        clock.advance(SEC);
        ctx.on_timer_fired().unwrap();
        let phase = ctx.active_task();
        if phase.phase_type != phase_type || phase.short_break_count != short_breaks {
            return;
        }
    }
    panic!("phase never completed");
}

#[test]
fn two_tasks_run_through_breaks_to_idle() {
    let clock = ManualClock::new();
    let mut ctx = AppContext::new(settings(), Box::new(clock.clone()), None).unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let _sub = ctx.subscribe(move |e: &Event| sink.borrow_mut().push(e.clone()));

    ctx.add_task(WorkItem::with_id("b", "Writing", "B")).unwrap();
    ctx.add_task(WorkItem::with_id("a", "Coding", "A")).unwrap();
    assert_eq!(ctx.active_task().task.as_ref().unwrap().id.as_str(), "a");

    ctx.start_task().unwrap();
    run_phase_out(&mut ctx, &clock);
    let phase = ctx.active_task();
    assert_eq!(phase.phase_type, PhaseType::ShortBreak);
    assert_eq!(phase.status, PhaseStatus::Active);
    assert_eq!(phase.short_break_count, 1);
    assert!(ctx.is_counting_down());

    run_phase_out(&mut ctx, &clock);
    let phase = ctx.active_task();
    assert_eq!(phase.phase_type, PhaseType::Task);
    assert_eq!(phase.status, PhaseStatus::Pending);
    assert_eq!(phase.task.as_ref().unwrap().id.as_str(), "b");

    ctx.start_task().unwrap();
    run_phase_out(&mut ctx, &clock);
    let phase = ctx.active_task();
    assert_eq!(phase.phase_type, PhaseType::ShortBreak);
    assert_eq!(phase.short_break_count, 2);

    run_phase_out(&mut ctx, &clock);
    assert_eq!(ctx.active_task().phase_type, PhaseType::Undefined);
    assert!(!ctx.is_counting_down());
    assert!(ctx.plan().tasks.is_empty());

    let archive = &ctx.archive().tasks;
    assert_eq!(archive.len(), 2);
    assert_eq!(archive.entries()[0].task.id.as_str(), "b");
    assert_eq!(ctx.archive().statistics.tasks_count, 2);
    assert_eq!(ctx.archive().statistics.tasks_time_ms, 50 * SEC);

    let events = events.borrow();
    assert!(matches!(events.last(), Some(Event::Idle { .. })));
    let archived = events
        .iter()
        .filter(|e| matches!(e, Event::TaskArchived { .. }))
        .count();
    assert_eq!(archived, 2);
}

#[test]
fn long_break_follows_a_full_streak() {
    let clock = ManualClock::new();
    let mut ctx = AppContext::new(settings(), Box::new(clock.clone()), None).unwrap();
    let task = WorkItem::with_id("a", "", "A");
    ctx.add_task(task.clone()).unwrap();
    for _ in 0..3 {
        ctx.inc_task(&task.id).unwrap();
    }

    let mut breaks = Vec::new();
    for _ in 0..3 {
        ctx.start_task().unwrap();
        run_phase_out(&mut ctx, &clock);
        breaks.push((ctx.active_task().phase_type, ctx.active_task().short_break_count));
        run_phase_out(&mut ctx, &clock);
    }

    assert_eq!(
        breaks,
        vec![
            (PhaseType::ShortBreak, 1),
            (PhaseType::ShortBreak, 2),
            (PhaseType::LongBreak, 0),
        ]
    );
    assert_eq!(ctx.plan().tasks.get(&task.id).unwrap().count, 1);
}

#[test]
fn late_firing_counts_every_elapsed_period() {
    let clock = ManualClock::new();
    let mut ctx = AppContext::new(settings(), Box::new(clock.clone()), None).unwrap();
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&ticks);
    let _sub = ctx.register_timer_tick_event_listener(move |rest| sink.borrow_mut().push(rest));

    ctx.add_task(WorkItem::with_id("a", "", "A")).unwrap();
    ctx.start_task().unwrap();

    clock.advance(3 * SEC + 400);
    ctx.on_timer_fired().unwrap();
    clock.advance(600);
    ctx.on_timer_fired().unwrap();

    assert_eq!(*ticks.borrow(), vec![22 * SEC, 21 * SEC]);
    assert_eq!(ctx.active_task().rest_ms, 21 * SEC);
}

#[test]
fn mixed_completions_sum_into_archive_statistics() {
    let clock = ManualClock::new();
    let mut ctx = AppContext::new(settings(), Box::new(clock.clone()), None).unwrap();
    ctx.add_task(WorkItem::with_id("c", "Ops", "C")).unwrap();
    ctx.add_task(WorkItem::with_id("b", "Ops", "B")).unwrap();
    ctx.add_task(WorkItem::with_id("a", "Coding", "A")).unwrap();

    // Early completion after 10s.
    ctx.start_task().unwrap();
    clock.advance(10 * SEC);
    ctx.complete_task().unwrap();
    run_phase_out(&mut ctx, &clock);

    // Full interval.
    ctx.start_task().unwrap();
    run_phase_out(&mut ctx, &clock);

    // Archived by hand without a countdown.
    ctx.archive_task(&"c".into(), None).unwrap();

    let stats = &ctx.archive().statistics;
    assert_eq!(stats.tasks_count, 3);
    assert_eq!(stats.tasks_time_ms, 10 * SEC + 25 * SEC + 25 * SEC);
    let ops = stats.categories.iter().find(|c| c.category.name == "Ops").unwrap();
    assert_eq!(ops.count, 2);
}
