//! Foreground tick loop.
//!
//! Fires [`AppContext::on_timer_fired`] once per tick period on the
//! current task. Everything runs on one thread: the loop and whatever the
//! caller does between ticks never overlap.

use std::future::Future;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};

use super::countdown::TICK_PERIOD_MS;
use crate::actions::AppContext;

/// Why [`drive`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveExit {
    /// No countdown left to run (work waiting for a start, or idle).
    Stopped,
    /// The shutdown future resolved.
    Shutdown,
}

/// Run the countdown until it stops on its own or `shutdown` resolves.
///
/// `after_fire` runs after every timer firing, once all listeners have
/// seen the resulting events.
pub async fn drive<S, F>(ctx: &mut AppContext, shutdown: S, mut after_fire: F) -> DriveExit
where
    S: Future<Output = ()>,
    F: FnMut(&AppContext),
{
    let mut interval = time::interval(Duration::from_millis(TICK_PERIOD_MS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval completes immediately.
    interval.tick().await;
    tokio::pin!(shutdown);

    loop {
        if !ctx.is_counting_down() {
            return DriveExit::Stopped;
        }
        tokio::select! {
            _ = &mut shutdown => return DriveExit::Shutdown,
            _ = interval.tick() => {
                if let Err(e) = ctx.on_timer_fired() {
                    tracing::warn!(error = %e, "timer callback failed");
                }
                after_fire(ctx);
            }
        }
    }
}
