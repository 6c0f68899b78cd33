use clap::Subcommand;
use pomoplan_core::{TaskId, WorkItem};

use super::{print_json, CmdResult, Session};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Plan a task at the head of the queue
    Add {
        description: String,
        #[arg(long, default_value = "")]
        category: String,
        /// Number of intervals planned
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Plan one more interval of a task
    Inc { id: String },
    /// Drop one planned interval of a task
    Dec { id: String },
    /// Record one interval of a task as done
    Archive { id: String },
    /// Change a task's description or category
    Edit {
        id: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Move a task to another position
    Reorder { from: usize, to: usize },
    /// List planned tasks
    List {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut session = Session::open()?;
    let ctx = &mut session.ctx;

    match action {
        TaskAction::Add {
            description,
            category,
            count,
        } => {
            let item = WorkItem::new(category, description);
            let id = item.id.clone();
            ctx.add_task(item)?;
            for _ in 1..count {
                ctx.inc_task(&id)?;
            }
            println!("{id}");
        }
        TaskAction::Inc { id } => {
            let count = ctx.inc_task(&TaskId::from(id))?;
            println!("{count}");
        }
        TaskAction::Dec { id } => {
            ctx.dec_task(&TaskId::from(id))?;
            println!("ok");
        }
        TaskAction::Archive { id } => {
            let entry = ctx.archive_task(&TaskId::from(id), None)?;
            print_json(&entry)?;
        }
        TaskAction::Edit {
            id,
            description,
            category,
        } => {
            let id = TaskId::from(id);
            ctx.start_edit_task(&id)?;
            let current = ctx
                .plan()
                .tasks
                .get(&id)
                .map(|entry| entry.task.clone())
                .ok_or_else(|| format!("Plan task not found: {id}"))?;
            let edited = WorkItem::with_id(
                id,
                category.unwrap_or(current.category.name),
                description.unwrap_or(current.description),
            );
            if let Err(e) = ctx.complete_edit_task(edited) {
                ctx.cancel_edit_task();
                return Err(e.into());
            }
            println!("ok");
        }
        TaskAction::Reorder { from, to } => {
            ctx.reorder_tasks(from, to)?;
            println!("ok");
        }
        TaskAction::List { json } => {
            if json {
                print_json(ctx.plan())?;
            } else {
                let active = ctx.active_task().task.as_ref().map(|t| t.id.clone());
                for (index, entry) in ctx.plan().tasks.entries().iter().enumerate() {
                    let marker = if ctx.active_task().is_task() && active.as_ref() == Some(&entry.task.id) {
                        '*'
                    } else {
                        ' '
                    };
                    println!(
                        "{marker} {index:>2}  {}  x{}  [{}] {}",
                        entry.task.id, entry.count, entry.task.category.name, entry.task.description
                    );
                }
            }
        }
    }

    session.save();
    Ok(())
}
