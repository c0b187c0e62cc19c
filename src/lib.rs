pub mod config;
pub mod database;
pub mod models;
pub mod query;
pub mod utils;
pub mod cli;
pub mod tui;

pub use config::Config;
pub use database::{Database, DatabaseError};
pub use models::{DailyLog, Habit, Project, ProjectStatus, Productivity, Task, TaskListing, TaskStatus};
pub use query::{CompletionStats, TaskFilter, TaskStore};
pub use utils::Profile;
