use clap::{CommandFactory, Parser, Subcommand};
use pomoplan_core::Theme;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "pomoplan", version, about = "Plan work and run it in Pomodoro intervals")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Planned work
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Finished work intervals
    Archive {
        #[command(subcommand)]
        action: commands::archive::ArchiveAction,
    },
    /// Active phase control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Plan and archive statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Show, set or toggle the theme
    Theme {
        /// `light` or `dark`; toggles when omitted
        theme: Option<Theme>,
    },
    /// Print a shell completion script
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    // Opt-in via RUST_LOG; stdout stays reserved for command output.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Archive { action } => commands::archive::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Theme { theme } => commands::theme::run(theme),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomoplan", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
