/// Lets an action through at most once per `delay_ms`.
///
/// The first call always runs. Time comes from the caller so the same
/// clock that drives the countdown can drive saving.
#[derive(Debug, Clone)]
pub struct Throttle {
    delay_ms: u64,
    last_run_ms: Option<u64>,
}

impl Throttle {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            last_run_ms: None,
        }
    }

    /// Whether the action may run at `now_ms`. Records the run if so.
    pub fn should_run(&mut self, now_ms: u64) -> bool {
        match self.last_run_ms {
            Some(last) if now_ms.saturating_sub(last) < self.delay_ms => false,
            _ => {
                self.last_run_ms = Some(now_ms);
                true
            }
        }
    }
}
