use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, ErrorCode, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{DailyLog, Productivity, Project, ProjectStatus, Task, TaskStatus};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
    #[error("SQLite error: {0}")]
    SqliteError(rusqlite::Error),
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        // Every SQLITE_CONSTRAINT_* variant (CHECK, PRIMARYKEY, FOREIGNKEY,
        // NOTNULL) reports the same primary code
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => DatabaseError::Validation(err.to_string()),
            _ => DatabaseError::SqliteError(err),
        }
    }
}

impl DatabaseError {
    /// True for the errors SQLite reports when the file itself is unusable
    fn is_open_failure(err: &rusqlite::Error) -> bool {
        matches!(
            err.sqlite_error_code(),
            Some(ErrorCode::CannotOpen) | Some(ErrorCode::NotADatabase) | Some(ErrorCode::PermissionDenied)
        )
    }
}

/// Handle to the on-disk store.
///
/// The handle only remembers where the store lives; every operation opens its
/// own connection through [`Database::connection`] and drops it when done.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Open (or create) the store at `path` and make sure the schema exists
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db_path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| DatabaseError::StoreUnavailable {
                    path: db_path.clone(),
                    reason: e.to_string(),
                })?;
            }
        }

        let db = Database { path: db_path };
        db.initialize().map_err(|e| match e {
            DatabaseError::SqliteError(inner) if DatabaseError::is_open_failure(&inner) => {
                db.unavailable(inner)
            }
            other => other,
        })?;

        tracing::debug!(path = %db.path.display(), "store ready");
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, err: rusqlite::Error) -> DatabaseError {
        DatabaseError::StoreUnavailable {
            path: self.path.clone(),
            reason: err.to_string(),
        }
    }

    /// Open a scoped connection with foreign key enforcement switched on.
    ///
    /// Nothing is committed implicitly: writes must run inside a transaction
    /// that the caller commits before the connection is dropped.
    pub fn connection(&self) -> Result<Connection, DatabaseError> {
        let conn = Connection::open(&self.path).map_err(|e| self.unavailable(e))?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Create all tables and indexes. Safe to call any number of times.
    pub fn initialize(&self) -> Result<(), DatabaseError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS projects (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                start_date      TEXT NOT NULL,
                target_date     TEXT,
                status          TEXT CHECK(status IN ('active', 'paused', 'completed')),
                priority        INTEGER CHECK(priority BETWEEN 1 AND 5),
                tags            TEXT
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id              TEXT PRIMARY KEY,
                project_id      TEXT REFERENCES projects(id),
                name            TEXT NOT NULL,
                date            TEXT NOT NULL,
                status          TEXT CHECK(status IN ('todo', 'in_progress', 'done')),
                duration_mins   INTEGER CHECK(duration_mins >= 0),
                energy_level    INTEGER CHECK(energy_level BETWEEN 1 AND 10),
                notes           TEXT
            )",
            [],
        )?;

        tx.execute(
            "CREATE TABLE IF NOT EXISTS daily_logs (
                date            TEXT PRIMARY KEY,
                total_tasks     INTEGER,
                completed       INTEGER,
                focus_score     INTEGER CHECK(focus_score BETWEEN 1 AND 10),
                productivity    TEXT CHECK(productivity IN ('high', 'medium', 'low'))
            )",
            [],
        )?;

        // Schema only: nothing reads or writes habits yet
        tx.execute(
            "CREATE TABLE IF NOT EXISTS habits (
                id              TEXT PRIMARY KEY,
                name            TEXT NOT NULL,
                current_streak  INTEGER DEFAULT 0,
                last_logged     TEXT
            )",
            [],
        )?;

        tx.execute("CREATE INDEX IF NOT EXISTS idx_tasks_date ON tasks(date)", [])?;
        tx.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id)",
            [],
        )?;

        tx.commit()?;
        Ok(())
    }

    /// Insert the demonstration projects, tasks and daily logs.
    /// Rows whose primary key already exists are left untouched.
    pub fn seed_sample_data(&self) -> Result<(), DatabaseError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO projects (id, name, start_date, target_date, status, priority, tags)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for project in sample_projects() {
                stmt.execute(rusqlite::params![
                    project.id,
                    project.name,
                    project.start_date,
                    project.target_date,
                    project.status,
                    project.priority,
                    encode_tags(&project.tags)?,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO tasks (id, project_id, name, date, status, duration_mins, energy_level, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for task in sample_tasks() {
                stmt.execute(rusqlite::params![
                    task.id,
                    task.project_id,
                    task.name,
                    task.date,
                    task.status,
                    task.duration_mins,
                    task.energy_level,
                    task.notes,
                ])?;
            }

            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO daily_logs (date, total_tasks, completed, focus_score, productivity)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for log in sample_daily_logs() {
                stmt.execute(rusqlite::params![
                    log.date,
                    log.total_tasks,
                    log.completed,
                    log.focus_score,
                    log.productivity,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!("sample data seeded");
        Ok(())
    }

    /// Insert a project; fails on a duplicate id or out-of-range priority
    pub fn insert_project(&self, project: &Project) -> Result<(), DatabaseError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO projects (id, name, start_date, target_date, status, priority, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                project.id,
                project.name,
                project.start_date,
                project.target_date,
                project.status,
                project.priority,
                encode_tags(&project.tags)?,
            ],
        )?;
        tx.commit()?;
        tracing::info!(project_id = %project.id, "project inserted");
        Ok(())
    }

    /// Helper function to map a row to a Project
    fn row_to_project(row: &rusqlite::Row) -> Result<(Project, Option<String>), rusqlite::Error> {
        Ok((
            Project {
                id: row.get(0)?,
                name: row.get(1)?,
                start_date: row.get(2)?,
                target_date: row.get(3)?,
                status: row.get(4)?,
                priority: row.get(5)?,
                tags: Vec::new(),
            },
            row.get(6)?,
        ))
    }

    /// All projects, highest priority (lowest number) first
    pub fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, start_date, target_date, status, priority, tags
             FROM projects ORDER BY priority ASC, name ASC",
        )?;
        let rows = stmt
            .query_map([], Self::row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(mut project, tags)| {
                project.tags = decode_tags(tags.as_deref())?;
                Ok(project)
            })
            .collect()
    }

    /// Insert a task; fails if the id already exists, the project is unknown
    /// or a bounded column is out of range
    pub fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (id, project_id, name, date, status, duration_mins, energy_level, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                task.id,
                task.project_id,
                task.name,
                task.date,
                task.status,
                task.duration_mins,
                task.energy_level,
                task.notes,
            ],
        )?;
        tx.commit()?;
        tracing::info!(task_id = %task.id, "task inserted");
        Ok(())
    }

    /// Helper function to map a row to a Task
    fn row_to_task(row: &rusqlite::Row) -> Result<Task, rusqlite::Error> {
        Ok(Task {
            id: row.get(0)?,
            project_id: row.get(1)?,
            name: row.get(2)?,
            date: row.get(3)?,
            status: row.get(4)?,
            duration_mins: row.get(5)?,
            energy_level: row.get(6)?,
            notes: row.get(7)?,
        })
    }

    /// Get a single task by ID
    pub fn get_task(&self, id: &str) -> Result<Task, DatabaseError> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT id, project_id, name, date, status, duration_mins, energy_level, notes
             FROM tasks WHERE id = ?1",
            rusqlite::params![id],
            Self::row_to_task,
        )
        .optional()?
        .ok_or_else(|| DatabaseError::NotFound(format!("task {}", id)))
    }

    /// Set a task's status to `done`.
    /// An unknown id is reported as `NotFound` rather than ignored.
    pub fn mark_done(&self, task_id: &str) -> Result<(), DatabaseError> {
        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE tasks SET status = ?1 WHERE id = ?2",
            rusqlite::params![TaskStatus::Done, task_id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(format!("task {}", task_id)));
        }
        tx.commit()?;
        tracing::info!(task_id, "task marked done");
        Ok(())
    }

    /// Compute the log for `date` from live task data without storing it
    pub fn daily_summary(&self, date: NaiveDate) -> Result<DailyLog, DatabaseError> {
        let conn = self.connection()?;
        let (total, completed): (i64, i64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN status = 'done' THEN 1 ELSE 0 END), 0)
             FROM tasks WHERE date = ?1",
            rusqlite::params![date],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(DailyLog::from_counts(date, total, completed))
    }

    /// Recompute the log for `date` and store it, replacing any earlier row
    pub fn refresh_daily_log(&self, date: NaiveDate) -> Result<DailyLog, DatabaseError> {
        let log = self.daily_summary(date)?;

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO daily_logs (date, total_tasks, completed, focus_score, productivity)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(date) DO UPDATE SET
                total_tasks = excluded.total_tasks,
                completed = excluded.completed,
                focus_score = excluded.focus_score,
                productivity = excluded.productivity",
            rusqlite::params![
                log.date,
                log.total_tasks,
                log.completed,
                log.focus_score,
                log.productivity,
            ],
        )?;
        tx.commit()?;
        tracing::info!(%date, total = log.total_tasks, completed = log.completed, "daily log refreshed");
        Ok(log)
    }

    /// Stored daily log for a date, if any
    pub fn get_daily_log(&self, date: NaiveDate) -> Result<Option<DailyLog>, DatabaseError> {
        let conn = self.connection()?;
        conn.query_row(
            "SELECT date, total_tasks, completed, focus_score, productivity
             FROM daily_logs WHERE date = ?1",
            rusqlite::params![date],
            |row| {
                Ok(DailyLog {
                    date: row.get(0)?,
                    total_tasks: row.get(1)?,
                    completed: row.get(2)?,
                    focus_score: row.get(3)?,
                    productivity: row.get(4)?,
                })
            },
        )
        .optional()
        .map_err(DatabaseError::from)
    }
}

fn encode_tags(tags: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(tags).map_err(|e| DatabaseError::InvalidData(e.to_string()))
}

fn decode_tags(raw: Option<&str>) -> Result<Vec<String>, DatabaseError> {
    match raw {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json)
            .map_err(|e| DatabaseError::InvalidData(format!("tags {:?}: {}", json, e))),
    }
}

// Enum columns are stored by their snake_case names

macro_rules! text_enum_sql {
    ($ty:ty) => {
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum_sql!(ProjectStatus);
text_enum_sql!(TaskStatus);
text_enum_sql!(Productivity);

fn sample_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_default()
}

fn sample_projects() -> Vec<Project> {
    vec![
        Project {
            id: "proj_german".to_string(),
            name: "Learn German".to_string(),
            start_date: sample_date("2024-01-01"),
            target_date: Some(sample_date("2024-12-31")),
            status: ProjectStatus::Active,
            priority: 2,
            tags: vec!["language".to_string(), "daily".to_string()],
        },
        Project {
            id: "proj_python".to_string(),
            name: "Python CLI App".to_string(),
            start_date: sample_date("2024-02-15"),
            target_date: None,
            status: ProjectStatus::Active,
            priority: 1,
            tags: vec!["coding".to_string(), "priority".to_string()],
        },
        Project {
            id: "proj_health".to_string(),
            name: "Gym Routine".to_string(),
            start_date: sample_date("2024-03-01"),
            target_date: Some(sample_date("2024-06-30")),
            status: ProjectStatus::Paused,
            priority: 3,
            tags: vec!["fitness".to_string()],
        },
    ]
}

fn sample_tasks() -> Vec<Task> {
    let task = |id: &str, project: &str, name: &str, date: &str, status, duration, energy, notes: &str| Task {
        id: id.to_string(),
        project_id: Some(project.to_string()),
        name: name.to_string(),
        date: sample_date(date),
        status,
        duration_mins: duration,
        energy_level: energy,
        notes: Some(notes.to_string()),
    };
    vec![
        task("task_ge_001", "proj_german", "Complete Lesson 1", "2024-03-20", TaskStatus::Done, Some(45), Some(7), "Used Anki flashcards"),
        task("task_ge_002", "proj_german", "Watch German film", "2024-03-21", TaskStatus::Todo, None, None, "Plan for weekend"),
        task("task_py_001", "proj_python", "Setup database", "2024-03-20", TaskStatus::Done, Some(120), Some(8), "SQLite works!"),
        task("task_py_002", "proj_python", "Implement CLI", "2024-03-21", TaskStatus::InProgress, Some(30), Some(5), "Using Click"),
    ]
}

fn sample_daily_logs() -> Vec<DailyLog> {
    vec![
        DailyLog {
            date: sample_date("2024-03-20"),
            total_tasks: 5,
            completed: 3,
            focus_score: 8,
            productivity: Productivity::High,
        },
        DailyLog {
            date: sample_date("2024-03-21"),
            total_tasks: 4,
            completed: 1,
            focus_score: 5,
            productivity: Productivity::Medium,
        },
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn temp_db() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let db = Database::new(dir.path().join("tracker.db")).unwrap();
        (dir, db)
    }

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn count(db: &Database, table: &str) -> i64 {
        db.connection()
            .unwrap()
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap()
    }

    fn schema(db: &Database) -> Vec<String> {
        let conn = db.connection().unwrap();
        let mut stmt = conn
            .prepare("SELECT sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn initialize_is_idempotent() {
        let (_dir, db) = temp_db();
        let before = schema(&db);
        db.initialize().unwrap();
        db.initialize().unwrap();
        assert_eq!(schema(&db), before);

        let conn = db.connection().unwrap();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tables, ["daily_logs", "habits", "projects", "tasks"]);
    }

    #[test]
    fn seeding_twice_keeps_row_counts() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let counts = (count(&db, "projects"), count(&db, "tasks"), count(&db, "daily_logs"));
        assert_eq!(counts, (3, 4, 2));
        db.seed_sample_data().unwrap();
        assert_eq!((count(&db, "projects"), count(&db, "tasks"), count(&db, "daily_logs")), counts);
    }

    #[test]
    fn seeding_does_not_overwrite_existing_rows() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        db.mark_done("task_ge_002").unwrap();
        db.seed_sample_data().unwrap();
        assert_eq!(db.get_task("task_ge_002").unwrap().status, TaskStatus::Done);
    }

    #[test]
    fn projects_round_trip_tags_in_order() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let projects = db.list_projects().unwrap();
        let ids: Vec<_> = projects.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["proj_python", "proj_german", "proj_health"]);
        assert_eq!(projects[1].tags, ["language", "daily"]);
        assert_eq!(projects[0].target_date, None);
        assert_eq!(projects[2].status, ProjectStatus::Paused);
    }

    #[test]
    fn priority_out_of_range_is_a_validation_error() {
        let (_dir, db) = temp_db();
        let mut project = Project::new("proj_x", "X", date("2024-01-01"));
        project.priority = 6;
        let err = db.insert_project(&project).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "{err:?}");

        project.priority = 0;
        assert!(matches!(db.insert_project(&project), Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn energy_level_out_of_range_is_a_validation_error() {
        let (_dir, db) = temp_db();
        db.insert_project(&Project::new("proj_x", "X", date("2024-01-01"))).unwrap();
        let mut task = Task::new("t1", "proj_x", "Too much", date("2024-01-01"));
        task.energy_level = Some(11);
        let err = db.insert_task(&task).unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)), "{err:?}");
    }

    #[test]
    fn negative_duration_is_rejected() {
        let (_dir, db) = temp_db();
        db.insert_project(&Project::new("proj_x", "X", date("2024-01-01"))).unwrap();
        let mut task = Task::new("t1", "proj_x", "Backwards", date("2024-01-01"));
        task.duration_mins = Some(-5);
        assert!(matches!(db.insert_task(&task), Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn bad_enum_value_is_a_validation_error() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let conn = db.connection().unwrap();
        let err: DatabaseError = conn
            .execute(
                "INSERT INTO tasks (id, project_id, name, date, status) VALUES ('t9', 'proj_german', 'x', '2024-01-01', 'blocked')",
                [],
            )
            .unwrap_err()
            .into();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[test]
    fn duplicate_task_id_is_a_validation_error() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let task = Task::new("task_ge_001", "proj_german", "Again", date("2024-04-01"));
        assert!(matches!(db.insert_task(&task), Err(DatabaseError::Validation(_))));
        // The original row is untouched
        assert_eq!(db.get_task("task_ge_001").unwrap().name, "Complete Lesson 1");
    }

    #[test]
    fn task_for_unknown_project_is_rejected() {
        let (_dir, db) = temp_db();
        let task = Task::new("t1", "proj_missing", "Orphan", date("2024-01-01"));
        assert!(matches!(db.insert_task(&task), Err(DatabaseError::Validation(_))));
    }

    #[test]
    fn mark_done_updates_status() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        db.mark_done("task_py_002").unwrap();
        assert_eq!(db.get_task("task_py_002").unwrap().status, TaskStatus::Done);
        // Marking again is fine
        db.mark_done("task_py_002").unwrap();
    }

    #[test]
    fn mark_done_on_unknown_id_is_not_found() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let err = db.mark_done("task_nope").unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)), "{err:?}");
    }

    #[test]
    fn get_task_reports_missing_rows() {
        let (_dir, db) = temp_db();
        assert!(matches!(db.get_task("ghost"), Err(DatabaseError::NotFound(_))));
    }

    #[test]
    fn unopenable_path_is_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "plain file").unwrap();
        let err = Database::new(blocker.join("tracker.db")).unwrap_err();
        assert!(matches!(err, DatabaseError::StoreUnavailable { .. }), "{err:?}");
    }

    #[test]
    fn garbage_file_is_store_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracker.db");
        std::fs::write(&path, vec![0x42u8; 4096]).unwrap();
        let err = Database::new(&path).unwrap_err();
        assert!(matches!(err, DatabaseError::StoreUnavailable { .. }), "{err:?}");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("tracker.db");
        let db = Database::new(&path).unwrap();
        assert!(path.exists());
        assert_eq!(db.path(), path.as_path());
    }

    #[test]
    fn daily_summary_counts_live_tasks() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let log = db.daily_summary(date("2024-03-20")).unwrap();
        assert_eq!((log.total_tasks, log.completed), (2, 2));
        assert_eq!(log.focus_score, 10);
        assert_eq!(log.productivity, Productivity::High);

        let empty = db.daily_summary(date("2030-01-01")).unwrap();
        assert_eq!((empty.total_tasks, empty.completed, empty.focus_score), (0, 0, 1));
    }

    #[test]
    fn refresh_daily_log_replaces_seeded_row() {
        let (_dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let seeded = db.get_daily_log(date("2024-03-21")).unwrap().unwrap();
        assert_eq!(seeded.total_tasks, 4);

        let refreshed = db.refresh_daily_log(date("2024-03-21")).unwrap();
        assert_eq!((refreshed.total_tasks, refreshed.completed), (2, 0));
        assert_eq!(db.get_daily_log(date("2024-03-21")).unwrap(), Some(refreshed));
        assert_eq!(count(&db, "daily_logs"), 2);
    }

    #[test]
    fn missing_daily_log_is_none() {
        let (_dir, db) = temp_db();
        assert_eq!(db.get_daily_log(date("2024-01-01")).unwrap(), None);
    }
}
