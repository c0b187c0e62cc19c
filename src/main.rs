use clap::Parser;
use color_eyre::Result;
use std::io;
use std::path::{Path, PathBuf};
use timetracker::{Config, Database, Profile, cli::{Cli, Commands}};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Dashboard);

    if should_install_tracing(&command) {
        install_tracing();
    }

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };

    // --db wins over the configured location
    let db_path = cli
        .db
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| config.get_database_path());
    let db = Database::new(&db_path)?;

    let mut out = io::stdout().lock();

    // Dispatch to appropriate command handler
    match command {
        Commands::Dashboard => {
            drop(out);
            let app = timetracker::tui::App::new(config, db)?;
            timetracker::tui::run_event_loop(app)?;
        }
        Commands::AddTask { project, name, duration } => {
            timetracker::cli::handle_add_task(project, name, duration, &db, &mut out)?;
        }
        Commands::Complete { task_id } => {
            timetracker::cli::handle_complete(task_id, &db, &mut out)?;
        }
        Commands::List { today, search } => {
            timetracker::cli::handle_list(today, search, &db, &mut out)?;
        }
        Commands::DailyLog { date } => {
            timetracker::cli::handle_daily_log(date, &db, &mut out)?;
        }
        Commands::Test => {
            timetracker::cli::handle_test(&db, &mut out)?;
        }
        Commands::TestDb => {
            timetracker::cli::handle_test_db(&db, &mut out)?;
        }
    }

    Ok(())
}

/// Log lines on stderr would be drawn over the dashboard's alternate screen
const fn should_install_tracing(cmd: &Commands) -> bool {
    !matches!(cmd, Commands::Dashboard)
}

fn install_tracing() {
    // RUST_LOG overrides the default of warnings only
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}
