use crate::Config;
use crate::models::{DailyLog, Task, TaskListing};
use crate::query::{CompletionStats, TaskFilter, TaskStore};
use crate::tui::dialog::{AddTaskDialog, DialogResponse, NewTaskRequest};
use crate::tui::error::TuiError;
use crate::tui::events::KeyMap;
use crate::tui::widgets::text_input::TextInput;
use crate::utils::{generate_task_id, today};
use crossterm::event::KeyEvent;
use ratatui::widgets::TableState;
use std::cmp;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    View,
    Filter,
    Help,
    Dialog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub mode: Mode,
    pub table_state: TableState,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            mode: Mode::View,
            table_state: TableState::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusState {
    pub message: Option<String>,
    pub severity: Severity,
    pub message_time: Option<Instant>,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            message: None,
            severity: Severity::Info,
            message_time: None,
        }
    }
}

/// Session-only filter state. Nothing here is persisted.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub today_only: bool,
    pub search: TextInput,
}

impl FilterState {
    pub fn search_term(&self) -> &str {
        self.search.value()
    }

    pub fn to_task_filter(&self) -> TaskFilter {
        TaskFilter::new(self.today_only, self.search.value())
    }
}

pub struct App<S: TaskStore> {
    pub config: Config,
    pub keys: KeyMap,
    store: S,
    pub filter: FilterState,
    pub tasks: Vec<TaskListing>,
    pub stats: CompletionStats,
    pub today_summary: Option<DailyLog>,
    pub ui: UiState,
    pub status: StatusState,
    pub dialog: Option<AddTaskDialog>,
    /// Set when the last table query failed; the table shows it instead of rows
    pub load_error: Option<String>,
}

impl<S: TaskStore> App<S> {
    /// Build the dashboard and run the initial load.
    /// Only bad key bindings fail here; store failures end up in `load_error`.
    pub fn new(config: Config, store: S) -> Result<Self, TuiError> {
        let keys = KeyMap::from_config(&config.key_bindings)?;
        let mut app = Self {
            config,
            keys,
            store,
            filter: FilterState::default(),
            tasks: Vec::new(),
            stats: CompletionStats::default(),
            today_summary: None,
            ui: UiState::default(),
            status: StatusState::default(),
            dialog: None,
            load_error: None,
        };
        app.load();
        Ok(app)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn load(&mut self) {
        self.refresh_table();
        self.refresh_stats();
    }

    /// Re-run the current filtered query, keeping the selected task if it is still listed
    pub fn refresh_table(&mut self) {
        let previous_id = self.selected_task().map(|t| t.id.clone());
        let previous_index = self.ui.table_state.selected();

        match self.store.list_tasks(&self.filter.to_task_filter()) {
            Ok(tasks) => {
                self.tasks = tasks;
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "task listing failed");
                self.tasks.clear();
                self.load_error = Some(e.to_string());
                self.set_status(Severity::Error, format!("Could not load tasks: {}", e));
            }
        }

        self.restore_selection(previous_id.as_deref(), previous_index);
    }

    pub fn refresh_stats(&mut self) {
        match self.store.completion_stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => {
                tracing::warn!(error = %e, "completion stats failed");
                self.set_status(Severity::Error, format!("Could not load stats: {}", e));
            }
        }
        match self.store.daily_summary(today()) {
            Ok(summary) => self.today_summary = Some(summary),
            Err(e) => {
                tracing::warn!(error = %e, "daily summary failed");
                self.today_summary = None;
            }
        }
    }

    fn restore_selection(&mut self, previous_id: Option<&str>, previous_index: Option<usize>) {
        if self.tasks.is_empty() {
            self.ui.table_state.select(None);
            return;
        }
        let by_id = previous_id.and_then(|id| self.tasks.iter().position(|t| t.id == id));
        let index = by_id
            .or(previous_index)
            .map(|i| cmp::min(i, self.tasks.len() - 1))
            .unwrap_or(0);
        self.ui.table_state.select(Some(index));
    }

    fn select_task_id(&mut self, id: &str) {
        if let Some(index) = self.tasks.iter().position(|t| t.id == id) {
            self.ui.table_state.select(Some(index));
        }
    }

    pub fn selected_task(&self) -> Option<&TaskListing> {
        self.ui.table_state.selected().and_then(|i| self.tasks.get(i))
    }

    pub fn move_selection_up(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let index = self.ui.table_state.selected().unwrap_or(0);
        self.ui.table_state.select(Some(index.saturating_sub(1)));
    }

    pub fn move_selection_down(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        let index = self.ui.table_state.selected().map(|i| i + 1).unwrap_or(0);
        self.ui.table_state.select(Some(cmp::min(index, self.tasks.len() - 1)));
    }

    pub fn set_status(&mut self, severity: Severity, message: impl Into<String>) {
        self.status.message = Some(message.into());
        self.status.severity = severity;
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_filter_mode(&mut self) {
        self.ui.mode = Mode::Filter;
    }

    /// Leave filter mode. `keep == false` discards the term and re-queries.
    pub fn exit_filter_mode(&mut self, keep: bool) {
        self.ui.mode = Mode::View;
        if !keep && !self.filter.search.value().is_empty() {
            self.filter.search.clear();
            self.refresh_table();
        }
    }

    /// Route a key to the filter input; each edit re-queries (stats stay as they are)
    pub fn handle_filter_key(&mut self, key_event: KeyEvent) {
        if self.filter.search.handle_key(key_event) {
            self.refresh_table();
        }
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.filter.search.clear();
        for ch in term.chars() {
            self.filter.search.insert_char(ch);
        }
        self.refresh_table();
    }

    pub fn toggle_today_only(&mut self) {
        self.filter.today_only = !self.filter.today_only;
        self.refresh_table();
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }

    pub fn mark_selected_complete(&mut self) {
        let Some(task_id) = self.selected_task().map(|t| t.id.clone()) else {
            self.set_status(Severity::Info, "No task selected");
            return;
        };

        match self.store.mark_done(&task_id) {
            Ok(()) => {
                self.refresh_table();
                self.refresh_stats();
                self.set_status(Severity::Success, "Task marked complete!");
            }
            Err(e) => {
                tracing::warn!(task_id = %task_id, error = %e, "mark complete failed");
                self.set_status(Severity::Error, format!("Could not complete task: {}", e));
            }
        }
    }

    pub fn open_add_task_dialog(&mut self) {
        match self.store.list_projects() {
            Ok(projects) if projects.is_empty() => {
                self.set_status(Severity::Info, "No projects yet: run `timetracker test-db` to seed some");
            }
            Ok(projects) => {
                self.dialog = Some(AddTaskDialog::new(projects));
                self.ui.mode = Mode::Dialog;
            }
            Err(e) => {
                tracing::warn!(error = %e, "project listing failed");
                self.set_status(Severity::Error, format!("Could not load projects: {}", e));
            }
        }
    }

    pub fn handle_dialog_key(&mut self, key_event: KeyEvent) {
        let response = match self.dialog.as_mut() {
            Some(dialog) => dialog.handle_key(key_event),
            None => {
                self.ui.mode = Mode::View;
                return;
            }
        };
        if let Some(response) = response {
            self.handle_dialog_response(response);
        }
    }

    pub fn handle_dialog_response(&mut self, response: DialogResponse) {
        match response {
            DialogResponse::Cancel => self.close_dialog(),
            DialogResponse::Submit(request) => self.create_task(request),
        }
    }

    fn close_dialog(&mut self) {
        self.dialog = None;
        self.ui.mode = Mode::View;
    }

    fn create_task(&mut self, request: NewTaskRequest) {
        let id = generate_task_id(&request.project_id, &chrono::Local::now());
        let task = Task::new(id, request.project_id, request.name, today());

        match self.store.insert_task(&task) {
            Ok(()) => {
                self.close_dialog();
                self.refresh_table();
                self.select_task_id(&task.id);
                self.refresh_stats();
                self.set_status(Severity::Success, format!("Added task: {}", task.name));
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "add task failed");
                if let Some(dialog) = self.dialog.as_mut() {
                    dialog.set_error(e.to_string());
                }
                self.set_status(Severity::Error, format!("Could not add task: {}", e));
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::database::DatabaseError;
    use crate::database::tests::temp_db;
    use crate::models::{Project, TaskStatus};
    use crate::Database;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::cell::Cell;
    use tempfile::TempDir;

    pub(crate) fn seeded_app() -> (TempDir, App<Database>) {
        let (dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let app = App::new(Config::default(), db).unwrap();
        (dir, app)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ids<S: TaskStore>(app: &App<S>) -> Vec<&str> {
        app.tasks.iter().map(|t| t.id.as_str()).collect()
    }

    /// Store whose reads work but whose writes can be switched to fail
    struct FailingStore {
        inner: Database,
        fail_reads: Cell<bool>,
    }

    impl FailingStore {
        fn broken() -> DatabaseError {
            DatabaseError::StoreUnavailable {
                path: "/nowhere/tracker.db".into(),
                reason: "disk went away".to_string(),
            }
        }
    }

    impl TaskStore for FailingStore {
        fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<TaskListing>, DatabaseError> {
            if self.fail_reads.get() {
                return Err(Self::broken());
            }
            self.inner.list_tasks(filter)
        }

        fn completion_stats(&self) -> Result<CompletionStats, DatabaseError> {
            self.inner.completion_stats()
        }

        fn insert_task(&self, _task: &Task) -> Result<(), DatabaseError> {
            Err(DatabaseError::Validation("insert refused".to_string()))
        }

        fn mark_done(&self, _task_id: &str) -> Result<(), DatabaseError> {
            Err(Self::broken())
        }

        fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
            self.inner.list_projects()
        }

        fn daily_summary(&self, date: NaiveDate) -> Result<DailyLog, DatabaseError> {
            self.inner.daily_summary(date)
        }
    }

    fn failing_app(fail_reads: bool) -> (TempDir, App<FailingStore>) {
        let (dir, db) = temp_db();
        db.seed_sample_data().unwrap();
        let store = FailingStore {
            inner: db,
            fail_reads: Cell::new(fail_reads),
        };
        (dir, App::new(Config::default(), store).unwrap())
    }

    #[test]
    fn load_shows_every_task_and_stats() {
        let (_dir, app) = seeded_app();
        assert_eq!(app.tasks.len(), 4);
        assert_eq!(app.stats, CompletionStats { total: 4, done: 2 });
        assert_eq!(app.ui.table_state.selected(), Some(0));
        assert!(!app.filter.today_only);
        assert_eq!(app.filter.search_term(), "");
        assert!(app.today_summary.is_some());
    }

    #[test]
    fn typing_a_filter_requeries_without_touching_stats() {
        let (_dir, mut app) = seeded_app();
        app.enter_filter_mode();
        for ch in "GERMAN".chars() {
            app.handle_filter_key(key(KeyCode::Char(ch)));
        }
        assert_eq!(ids(&app), ["task_ge_001", "task_ge_002"]);
        assert_eq!(app.stats, CompletionStats { total: 4, done: 2 });

        app.exit_filter_mode(true);
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.filter.search_term(), "GERMAN");
        assert_eq!(app.tasks.len(), 2);
    }

    #[test]
    fn cancelling_the_filter_restores_the_full_table() {
        let (_dir, mut app) = seeded_app();
        app.enter_filter_mode();
        app.handle_filter_key(key(KeyCode::Char('z')));
        assert!(app.tasks.is_empty());
        assert_eq!(app.ui.table_state.selected(), None);

        app.exit_filter_mode(false);
        assert_eq!(app.filter.search_term(), "");
        assert_eq!(app.tasks.len(), 4);
        assert_eq!(app.ui.table_state.selected(), Some(0));
    }

    #[test]
    fn today_toggle_composes_with_search() {
        let (_dir, mut app) = seeded_app();
        app.store().insert_task(&Task::new("t_today", "proj_german", "Podcast", today())).unwrap();
        app.store().insert_task(&Task::new("t_today2", "proj_python", "Refactor", today())).unwrap();

        app.toggle_today_only();
        assert_eq!(ids(&app), ["t_today", "t_today2"]);

        app.set_search_term("german");
        assert_eq!(ids(&app), ["t_today"]);

        app.toggle_today_only();
        assert_eq!(ids(&app), ["task_ge_001", "task_ge_002", "t_today"]);
    }

    #[test]
    fn selection_follows_the_task_across_refreshes() {
        let (_dir, mut app) = seeded_app();
        app.move_selection_down();
        app.move_selection_down();
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("task_ge_002"));

        app.set_search_term("german");
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("task_ge_002"));

        // Selected row filtered out: index is clamped
        app.set_search_term("setup");
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("task_py_001"));
    }

    #[test]
    fn selection_stays_in_bounds() {
        let (_dir, mut app) = seeded_app();
        app.move_selection_up();
        assert_eq!(app.ui.table_state.selected(), Some(0));
        for _ in 0..10 {
            app.move_selection_down();
        }
        assert_eq!(app.ui.table_state.selected(), Some(3));
    }

    #[test]
    fn mark_complete_updates_row_stats_and_notifies() {
        let (_dir, mut app) = seeded_app();
        app.move_selection_down();
        app.move_selection_down();
        app.mark_selected_complete();

        let task = app.tasks.iter().find(|t| t.id == "task_ge_002").unwrap();
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(app.stats.done, 3);
        assert_eq!(app.status.severity, Severity::Success);
        assert_eq!(app.status.message.as_deref(), Some("Task marked complete!"));
        assert_eq!(app.selected_task().map(|t| t.id.as_str()), Some("task_ge_002"));
    }

    #[test]
    fn mark_complete_without_selection_is_an_info_notice() {
        let (_dir, mut app) = seeded_app();
        app.set_search_term("no such task");
        app.mark_selected_complete();
        assert_eq!(app.status.severity, Severity::Info);
        assert_eq!(app.stats.done, 2);
    }

    #[test]
    fn add_task_dialog_submit_inserts_and_selects() {
        let (_dir, mut app) = seeded_app();
        app.open_add_task_dialog();
        assert_eq!(app.ui.mode, Mode::Dialog);

        for ch in "Read a chapter".chars() {
            app.handle_dialog_key(key(KeyCode::Char(ch)));
        }
        app.handle_dialog_key(key(KeyCode::Enter));

        assert_eq!(app.ui.mode, Mode::View);
        assert!(app.dialog.is_none());
        assert_eq!(app.tasks.len(), 5);
        assert_eq!(app.stats.total, 5);
        let selected = app.selected_task().unwrap();
        assert_eq!(selected.name, "Read a chapter");
        assert_eq!(selected.status, TaskStatus::Todo);
        assert_eq!(selected.date, today());
        // Projects come back priority-first, so the python project is preselected
        assert_eq!(selected.project_id, "proj_python");
        assert!(selected.id.starts_with("task_pr_"));
        assert_eq!(app.status.severity, Severity::Success);
    }

    #[test]
    fn added_task_respects_current_filters() {
        let (_dir, mut app) = seeded_app();
        app.set_search_term("german");
        app.handle_dialog_response(DialogResponse::Submit(NewTaskRequest {
            name: "Groceries".to_string(),
            project_id: "proj_health".to_string(),
        }));
        assert_eq!(ids(&app), ["task_ge_001", "task_ge_002"]);
        assert_eq!(app.stats.total, 5);
    }

    #[test]
    fn add_task_dialog_cancel_changes_nothing() {
        let (_dir, mut app) = seeded_app();
        app.open_add_task_dialog();
        app.handle_dialog_key(key(KeyCode::Char('x')));
        app.handle_dialog_key(key(KeyCode::Esc));
        assert_eq!(app.ui.mode, Mode::View);
        assert!(app.dialog.is_none());
        assert_eq!(app.tasks.len(), 4);
        assert_eq!(app.stats.total, 4);
        assert!(app.status.message.is_none());
    }

    #[test]
    fn empty_store_has_no_projects_for_the_dialog() {
        let (_dir, db) = temp_db();
        let mut app = App::new(Config::default(), db).unwrap();
        assert!(app.tasks.is_empty());
        app.open_add_task_dialog();
        assert_eq!(app.ui.mode, Mode::View);
        assert_eq!(app.status.severity, Severity::Info);
    }

    #[test]
    fn failing_writes_notify_without_ending_the_session() {
        let (_dir, mut app) = failing_app(false);
        app.mark_selected_complete();
        assert_eq!(app.status.severity, Severity::Error);
        assert_eq!(app.tasks.len(), 4);

        app.open_add_task_dialog();
        app.handle_dialog_key(key(KeyCode::Char('x')));
        app.handle_dialog_key(key(KeyCode::Enter));
        // Dialog stays open so the input is not lost
        assert_eq!(app.ui.mode, Mode::Dialog);
        assert!(app.dialog.as_ref().and_then(|d| d.error.as_ref()).is_some());
        assert_eq!(app.status.severity, Severity::Error);
    }

    #[test]
    fn failing_load_shows_error_state() {
        let (_dir, mut app) = failing_app(true);
        assert!(app.load_error.is_some());
        assert!(app.tasks.is_empty());
        assert_eq!(app.status.severity, Severity::Error);

        app.store.fail_reads.set(false);
        app.refresh_table();
        assert!(app.load_error.is_none());
        assert_eq!(app.tasks.len(), 4);
    }

    #[test]
    fn status_message_times_out() {
        let (_dir, mut app) = seeded_app();
        app.set_status(Severity::Info, "hello");
        app.check_status_message_timeout();
        assert!(app.status.message.is_some());

        app.status.message_time = Instant::now().checked_sub(std::time::Duration::from_secs(4));
        app.check_status_message_timeout();
        assert!(app.status.message.is_none());
    }
}
