use clap::Subcommand;

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum ArchiveAction {
    /// List finished intervals, newest first
    List {
        #[arg(long)]
        json: bool,
    },
    /// Delete an archive entry by position
    Delete { index: usize },
}

pub fn run(action: ArchiveAction) -> CmdResult {
    let mut session = Session::open()?;

    match action {
        ArchiveAction::List { json } => {
            let archive = session.ctx.archive();
            if json {
                print_json(archive)?;
            } else {
                for (index, entry) in archive.tasks.entries().iter().enumerate() {
                    println!(
                        "{index:>3}  {}  {:>5}  [{}] {}",
                        entry.completed_at.format("%Y-%m-%d %H:%M"),
                        pomoplan_core::timer::format_rest(entry.task_time_ms),
                        entry.task.category.name,
                        entry.task.description
                    );
                }
            }
            return Ok(());
        }
        ArchiveAction::Delete { index } => {
            let entry = session.ctx.delete_archive_task(index)?;
            print_json(&entry)?;
        }
    }

    session.save();
    Ok(())
}
