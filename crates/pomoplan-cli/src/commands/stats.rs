use clap::Subcommand;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Planned work: count, time, finish estimate
    Plan,
    /// Finished work: count and time per category
    Archive,
}

pub fn run(action: StatsAction) -> CmdResult {
    let session = Session::open()?;
    match action {
        StatsAction::Plan => print_json(&session.ctx.plan().statistics),
        StatsAction::Archive => print_json(&session.ctx.archive().statistics),
    }
}
