use clap::Subcommand;
use pomoplan_core::timer::driver::{drive, DriveExit};
use pomoplan_core::{ActivePhase, AppContext, Clock, Event, PhaseStatus, SystemClock, Throttle};
use serde::Serialize;

use super::{print_json, save_state, CmdResult, Session};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the pending work interval
    Start,
    /// Abort the running interval and rewind it
    Stop,
    /// Pause the running interval
    Pause,
    /// Resume a paused interval
    Resume,
    /// Finish the current phase now
    Complete,
    /// Print the active phase as JSON
    Status,
    /// Count down in the foreground until the phase sequence stops
    Run {
        /// Start the pending work interval first
        #[arg(long)]
        start: bool,
    },
}

#[derive(Serialize)]
struct Status<'a> {
    title: String,
    phase: &'a ActivePhase,
}

fn print_status(ctx: &AppContext) -> CmdResult {
    let phase = ctx.active_task();
    print_json(&Status {
        title: phase.title(),
        phase,
    })
}

pub fn run(action: TimerAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        TimerAction::Start => session.ctx.start_task()?,
        TimerAction::Stop => session.ctx.stop_task()?,
        TimerAction::Pause => session.ctx.pause_task()?,
        TimerAction::Resume => session.ctx.resume_task()?,
        TimerAction::Complete => session.ctx.complete_task()?,
        // Loading already caught the countdown up; keep that progress.
        TimerAction::Status => {}
        TimerAction::Run { start } => return run_foreground(session, start),
    }

    session.save();
    print_status(&session.ctx)
}

fn run_foreground(session: Session, start: bool) -> CmdResult {
    let Session {
        db,
        config,
        mut ctx,
    } = session;

    if start && ctx.active_task().status == PhaseStatus::Pending {
        ctx.start_task()?;
    }

    let _events = ctx.subscribe(|event| match event {
        Event::PhaseActivated { phase } => println!("next: {}", describe(phase)),
        Event::TaskArchived { entry } => println!(
            "archived: {} ({})",
            entry.task.description,
            pomoplan_core::timer::format_rest(entry.task_time_ms)
        ),
        Event::Idle { .. } => println!("nothing left to do"),
        Event::Tick { .. } | Event::PhaseCompleted { .. } => {}
    });

    let clock = SystemClock;
    let mut throttle = Throttle::new(config.persistence.save_throttle_ms);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };
    let exit = runtime.block_on(drive(&mut ctx, shutdown, |ctx| {
        println!("{}", ctx.active_task().title());
        if throttle.should_run(clock.now_ms()) {
            save_state(&db, ctx);
        }
    }));

    save_state(&db, &ctx);
    match exit {
        DriveExit::Stopped => {
            if ctx.active_task().status == PhaseStatus::Pending {
                println!("waiting: {}", describe(ctx.active_task()));
            }
        }
        DriveExit::Shutdown => println!("interrupted, state saved"),
    }
    Ok(())
}

fn describe(phase: &ActivePhase) -> String {
    match &phase.task {
        Some(task) if phase.is_task() => task.description.clone(),
        _ => phase.phase_type.label().to_string(),
    }
}
