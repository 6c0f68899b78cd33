//! Subcommand handlers.
//!
//! Every invocation loads the saved state, applies one action through
//! [`AppContext`] and writes the state back.

pub mod archive;
pub mod config;
pub mod stats;
pub mod task;
pub mod theme;
pub mod timer;

use pomoplan_core::{AppContext, Config, Database, SystemClock};
use serde::Serialize;

pub type CmdResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub struct Session {
    pub db: Database,
    pub config: Config,
    pub ctx: AppContext,
}

impl Session {
    pub fn open() -> CmdResult<Self> {
        let config = Config::load()?;
        let db = Database::open()?;
        let state = db.load_state();
        let ctx = AppContext::new(
            config.timer_settings(),
            Box::new(SystemClock),
            state,
        )?;
        Ok(Self { db, config, ctx })
    }

    pub fn save(&self) {
        save_state(&self.db, &self.ctx);
    }
}

/// Write failures are logged, never fatal.
pub fn save_state(db: &Database, ctx: &AppContext) {
    if let Err(e) = db.save_state(&ctx.snapshot()) {
        tracing::warn!(error = %e, "failed to save state");
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
