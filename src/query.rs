use chrono::NaiveDate;

use crate::database::{Database, DatabaseError};
use crate::models::{DailyLog, Project, Task, TaskListing};
use crate::utils::today;

/// Which tasks a listing should include
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Only tasks dated on the local calendar day
    pub today_only: bool,
    /// Case-insensitive substring matched against task name or project name
    pub search_term: Option<String>,
}

impl TaskFilter {
    pub fn new(today_only: bool, search_term: &str) -> Self {
        Self {
            today_only,
            search_term: Some(search_term.to_string()),
        }
    }

    /// The search term, ignoring blank input
    fn search(&self) -> Option<&str> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionStats {
    pub total: i64,
    pub done: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
    pub task_count: i64,
}

/// Escape LIKE wildcards so user input matches literally (escape char `\`)
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl Database {
    /// Helper function to map a joined row to a TaskListing
    fn row_to_listing(row: &rusqlite::Row) -> Result<TaskListing, rusqlite::Error> {
        Ok(TaskListing {
            id: row.get(0)?,
            name: row.get(1)?,
            project_id: row.get(2)?,
            project_name: row.get(3)?,
            status: row.get(4)?,
            date: row.get(5)?,
            duration_mins: row.get(6)?,
        })
    }

    /// Tasks joined with their project name, oldest date first
    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskListing>, DatabaseError> {
        self.list_tasks_on(filter, today())
    }

    /// Same as [`Database::list_tasks`] with an explicit "today"
    pub fn list_tasks_on(
        &self,
        filter: &TaskFilter,
        today: NaiveDate,
    ) -> Result<Vec<TaskListing>, DatabaseError> {
        let day = filter.today_only.then_some(today);
        let pattern = filter.search().map(|term| format!("%{}%", escape_like(term)));

        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.project_id, p.name, t.status, t.date, t.duration_mins
             FROM tasks t JOIN projects p ON t.project_id = p.id
             WHERE (?1 IS NULL OR t.date = ?1)
               AND (?2 IS NULL OR t.name LIKE ?2 ESCAPE '\\' OR p.name LIKE ?2 ESCAPE '\\')
             ORDER BY t.date ASC, t.id ASC",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![day, pattern], Self::row_to_listing)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(?filter, count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    /// Total and completed task counts across every task
    pub fn completion_stats(&self) -> Result<CompletionStats, DatabaseError> {
        let conn = self.connection()?;
        let stats = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0)
             FROM tasks",
            [],
            |row| {
                Ok(CompletionStats {
                    total: row.get(0)?,
                    done: row.get(1)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Every project with the number of tasks that reference it
    pub fn project_summaries(&self) -> Result<Vec<ProjectSummary>, DatabaseError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.name, COUNT(t.id)
             FROM projects p LEFT JOIN tasks t ON p.id = t.project_id
             GROUP BY p.id, p.name
             ORDER BY p.id ASC",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(ProjectSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    task_count: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(summaries)
    }

    /// Most recent tasks first
    pub fn recent_tasks(&self, limit: i64) -> Result<Vec<TaskListing>, DatabaseError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT t.id, t.name, t.project_id, p.name, t.status, t.date, t.duration_mins
             FROM tasks t JOIN projects p ON t.project_id = p.id
             ORDER BY t.date DESC, t.id ASC
             LIMIT ?1",
        )?;
        let tasks = stmt
            .query_map(rusqlite::params![limit], Self::row_to_listing)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

/// The operations the dashboard needs from a store
pub trait TaskStore {
    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskListing>, DatabaseError>;
    fn completion_stats(&self) -> Result<CompletionStats, DatabaseError>;
    fn insert_task(&self, task: &Task) -> Result<(), DatabaseError>;
    fn mark_done(&self, task_id: &str) -> Result<(), DatabaseError>;
    fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;
    fn daily_summary(&self, date: NaiveDate) -> Result<DailyLog, DatabaseError>;
}

impl TaskStore for Database {
    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskListing>, DatabaseError> {
        Database::list_tasks(self, filter)
    }

    fn completion_stats(&self) -> Result<CompletionStats, DatabaseError> {
        Database::completion_stats(self)
    }

    fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        Database::insert_task(self, task)
    }

    fn mark_done(&self, task_id: &str) -> Result<(), DatabaseError> {
        Database::mark_done(self, task_id)
    }

    fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        Database::list_projects(self)
    }

    fn daily_summary(&self, date: NaiveDate) -> Result<DailyLog, DatabaseError> {
        Database::daily_summary(self, date)
    }
}
