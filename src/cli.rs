use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::Task;
use crate::query::TaskFilter;
use crate::utils::{generate_task_id, parse_date, today};

#[derive(Parser)]
#[command(name = "timetracker")]
#[command(about = "Time Tracker - projects, tasks and a terminal dashboard")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Store file to use instead of the configured one
    #[arg(long)]
    pub db: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Launch interactive dashboard (default if no subcommand)
    Dashboard,
    /// Add a task to a project, dated today
    AddTask {
        /// Project ID
        #[arg(long)]
        project: String,
        /// Task name
        #[arg(long)]
        name: String,
        /// Duration in minutes
        #[arg(long)]
        duration: Option<i64>,
    },
    /// Mark a task as done
    Complete {
        /// Task ID
        task_id: String,
    },
    /// List tasks with optional filters
    List {
        /// Only tasks dated today
        #[arg(long)]
        today: bool,
        /// Case-insensitive match on task or project name
        #[arg(long)]
        search: Option<String>,
    },
    /// Recompute and store the daily log for a date
    DailyLog {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Verify that all components are working
    Test,
    /// Seed sample data and show project-task relationships
    TestDb,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Failed to write output: {0}")]
    OutputError(#[from] std::io::Error),
}

/// Handle the add-task command
pub fn handle_add_task(
    project: String,
    name: String,
    duration: Option<i64>,
    db: &Database,
    out: &mut impl Write,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidArgument("task name must not be empty".to_string()));
    }
    if let Some(minutes) = duration {
        if minutes < 0 {
            return Err(CliError::InvalidArgument(format!(
                "duration must be non-negative, got {}",
                minutes
            )));
        }
    }

    let id = generate_task_id(&project, &chrono::Local::now());
    let mut task = Task::new(id, project, name, today());
    task.duration_mins = duration;

    db.insert_task(&task)?;
    writeln!(out, "✓ Added task: {} (ID: {})", task.name, task.id)?;

    Ok(())
}

/// Handle the complete command
pub fn handle_complete(task_id: String, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.mark_done(&task_id)?;
    writeln!(out, "✓ Task marked complete: {}", task_id)?;
    Ok(())
}

/// Handle the list command
pub fn handle_list(
    today_only: bool,
    search: Option<String>,
    db: &Database,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let filter = TaskFilter {
        today_only,
        search_term: search,
    };
    let tasks = db.list_tasks(&filter)?;

    if tasks.is_empty() {
        writeln!(out, "No tasks found")?;
    }
    for task in &tasks {
        writeln!(
            out,
            "{:<20} {:<28} {:<16} {:<12} {}",
            task.id,
            task.name,
            task.project_name,
            task.status.label(),
            task.date
        )?;
    }

    let stats = db.completion_stats()?;
    writeln!(out, "\nTasks: {}/{} completed", stats.done, stats.total)?;
    Ok(())
}

/// Handle the daily-log command
pub fn handle_daily_log(date: Option<String>, db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    let date = match date {
        Some(date_str) => parse_date(&date_str)
            .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e)))?,
        None => today(),
    };

    let log = db.refresh_daily_log(date)?;
    writeln!(out, "Daily log for {}", log.date)?;
    writeln!(out, "  Tasks:        {}/{} completed", log.completed, log.total_tasks)?;
    writeln!(out, "  Focus score:  {}/10", log.focus_score)?;
    writeln!(out, "  Productivity: {}", log.productivity.as_str())?;
    Ok(())
}

/// Handle the test command: initialize the store and report component status
pub fn handle_test(db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.initialize()?;
    writeln!(out, "✓ Database initialized")?;

    writeln!(out, "\nTest Components")?;
    writeln!(out, "{:<16} {:>12}", "Component", "Status")?;
    writeln!(out, "{:<16} {:>12}", "CLI", "Working")?;
    writeln!(out, "{:<16} {:>12}", "Console Output", "Working")?;
    writeln!(out, "{:<16} {:>12}", "SQLite DB", "Connected")?;

    writeln!(out, "\nAll systems go!")?;
    Ok(())
}

/// Handle the test-db command: seed sample data and summarize it
pub fn handle_test_db(db: &Database, out: &mut impl Write) -> Result<(), CliError> {
    db.initialize()?;
    db.seed_sample_data()?;

    writeln!(out, "Projects Summary")?;
    for project in db.project_summaries()? {
        writeln!(out, "{} ({}): {} tasks", project.name, project.id, project.task_count)?;
    }

    writeln!(out, "\nRecent Tasks")?;
    for task in db.recent_tasks(5)? {
        writeln!(
            out,
            "{}: {} - {} ({})",
            task.date,
            task.project_name,
            task.name,
            task.status.as_str().replace('_', " ")
        )?;
    }

    Ok(())
}
