use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown {kind} value: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Paused => "paused",
            ProjectStatus::Completed => "completed",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "paused" => Ok(ProjectStatus::Paused),
            "completed" => Ok(ProjectStatus::Completed),
            other => Err(ParseEnumError::new("project status", other)),
        }
    }
}

/// Task progress. The variants are ordered by completion but no transition
/// order is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Human readable label used by the console and the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "Todo",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(ParseEnumError::new("task status", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Productivity {
    High,
    Medium,
    Low,
}

impl Productivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Productivity::High => "high",
            Productivity::Medium => "medium",
            Productivity::Low => "low",
        }
    }

    /// Bucket a completion ratio (0.0..=1.0)
    pub fn from_completion_ratio(ratio: f64) -> Self {
        if ratio >= 0.7 {
            Productivity::High
        } else if ratio >= 0.4 {
            Productivity::Medium
        } else {
            Productivity::Low
        }
    }
}

impl FromStr for Productivity {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Productivity::High),
            "medium" => Ok(Productivity::Medium),
            "low" => Ok(Productivity::Low),
            other => Err(ParseEnumError::new("productivity", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub target_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub priority: i64, // 1-5, enforced by the store
    pub tags: Vec<String>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date,
            target_date: None,
            status: ProjectStatus::Active,
            priority: 3,
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: Option<String>,
    pub name: String,
    pub date: NaiveDate,
    pub status: TaskStatus,
    pub duration_mins: Option<i64>,
    pub energy_level: Option<i64>, // 1-10, enforced by the store
    pub notes: Option<String>,
}

impl Task {
    /// A new `todo` task for a project
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: Some(project_id.into()),
            name: name.into(),
            date,
            status: TaskStatus::Todo,
            duration_mins: None,
            energy_level: None,
            notes: None,
        }
    }
}

/// A task row joined with its project's display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskListing {
    pub id: String,
    pub name: String,
    pub project_id: String,
    pub project_name: String,
    pub status: TaskStatus,
    pub date: NaiveDate,
    pub duration_mins: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    pub date: NaiveDate,
    pub total_tasks: i64,
    pub completed: i64,
    pub focus_score: i64, // 1-10
    pub productivity: Productivity,
}

impl DailyLog {
    /// Derive a log from a day's task counts.
    /// A day without tasks scores the minimum focus of 1.
    pub fn from_counts(date: NaiveDate, total_tasks: i64, completed: i64) -> Self {
        let ratio = if total_tasks > 0 {
            completed as f64 / total_tasks as f64
        } else {
            0.0
        };
        let focus_score = ((ratio * 10.0).round() as i64).clamp(1, 10);
        Self {
            date,
            total_tasks,
            completed,
            focus_score,
            productivity: Productivity::from_completion_ratio(ratio),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub current_streak: i64,
    pub last_logged: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn task_status_parses_storage_values() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::InProgress.label(), "In Progress");
        let err = "blocked".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.value, "blocked");
    }

    #[test]
    fn new_task_starts_as_todo() {
        let task = Task::new("t1", "proj_a", "Write docs", date("2024-01-01"));
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.project_id.as_deref(), Some("proj_a"));
        assert!(task.duration_mins.is_none());
    }

    #[test]
    fn daily_log_scores_completion_ratio() {
        let log = DailyLog::from_counts(date("2024-03-20"), 4, 3);
        assert_eq!(log.focus_score, 8);
        assert_eq!(log.productivity, Productivity::High);

        let log = DailyLog::from_counts(date("2024-03-20"), 5, 2);
        assert_eq!(log.focus_score, 4);
        assert_eq!(log.productivity, Productivity::Medium);

        let log = DailyLog::from_counts(date("2024-03-20"), 4, 0);
        assert_eq!(log.focus_score, 1);
        assert_eq!(log.productivity, Productivity::Low);
    }

    #[test]
    fn empty_day_gets_minimum_focus() {
        let log = DailyLog::from_counts(date("2024-03-22"), 0, 0);
        assert_eq!(log.total_tasks, 0);
        assert_eq!(log.focus_score, 1);
        assert_eq!(log.productivity, Productivity::Low);
    }
}
