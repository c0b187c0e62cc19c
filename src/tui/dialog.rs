use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::Project;
use crate::tui::widgets::text_input::TextInput;

/// What the add-task dialog asks the dashboard to create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub name: String,
    pub project_id: String,
}

/// Result handed back to the dashboard when the dialog is dismissed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResponse {
    Submit(NewTaskRequest),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogField {
    Name,
    Project,
}

#[derive(Debug, Clone)]
pub struct AddTaskDialog {
    pub name: TextInput,
    pub projects: Vec<Project>,
    pub project_index: usize,
    pub focus: DialogField,
    pub error: Option<String>,
}

impl AddTaskDialog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            name: TextInput::new(),
            projects,
            project_index: 0,
            focus: DialogField::Name,
            error: None,
        }
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.projects.get(self.project_index)
    }

    /// Shown inline; the dialog stays open
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            DialogField::Name => DialogField::Project,
            DialogField::Project => DialogField::Name,
        };
    }

    fn cycle_project(&mut self, forward: bool) {
        let len = self.projects.len();
        if len == 0 {
            return;
        }
        self.project_index = if forward {
            (self.project_index + 1) % len
        } else {
            (self.project_index + len - 1) % len
        };
    }

    fn submit(&mut self) -> Option<DialogResponse> {
        if self.name.is_blank() {
            self.set_error("Task name is required");
            self.focus = DialogField::Name;
            return None;
        }
        let Some(project) = self.selected_project() else {
            self.set_error("No project to add the task to");
            return None;
        };
        Some(DialogResponse::Submit(NewTaskRequest {
            name: self.name.value().trim().to_string(),
            project_id: project.id.clone(),
        }))
    }

    /// Feed one key press to the dialog. `Some` means the dialog is done.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> Option<DialogResponse> {
        match key_event.code {
            KeyCode::Esc => return Some(DialogResponse::Cancel),
            KeyCode::Enter => return self.submit(),
            KeyCode::Tab | KeyCode::BackTab => {
                self.toggle_focus();
                return None;
            }
            _ => {}
        }

        match self.focus {
            DialogField::Name => {
                if self.name.handle_key(key_event) {
                    self.error = None;
                }
            }
            DialogField::Project => match key_event.code {
                KeyCode::Up | KeyCode::Left => self.cycle_project(false),
                KeyCode::Down | KeyCode::Right => self.cycle_project(true),
                KeyCode::Char('k') if key_event.modifiers == KeyModifiers::NONE => self.cycle_project(false),
                KeyCode::Char('j') if key_event.modifiers == KeyModifiers::NONE => self.cycle_project(true),
                _ => {}
            },
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn projects() -> Vec<Project> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        vec![
            Project::new("proj_python", "Python CLI App", start),
            Project::new("proj_german", "Learn German", start),
        ]
    }

    fn type_text(dialog: &mut AddTaskDialog, text: &str) {
        for ch in text.chars() {
            assert_eq!(dialog.handle_key(key(KeyCode::Char(ch))), None);
        }
    }

    #[test]
    fn submits_trimmed_name_and_selected_project() {
        let mut dialog = AddTaskDialog::new(projects());
        type_text(&mut dialog, " Vocab drill ");
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Down));

        let response = dialog.handle_key(key(KeyCode::Enter));
        assert_eq!(
            response,
            Some(DialogResponse::Submit(NewTaskRequest {
                name: "Vocab drill".to_string(),
                project_id: "proj_german".to_string(),
            }))
        );
    }

    #[test]
    fn empty_name_keeps_dialog_open_with_error() {
        let mut dialog = AddTaskDialog::new(projects());
        type_text(&mut dialog, "   ");
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), None);
        assert!(dialog.error.is_some());

        // Typing clears the message
        type_text(&mut dialog, "x");
        assert!(dialog.error.is_none());
    }

    #[test]
    fn escape_cancels() {
        let mut dialog = AddTaskDialog::new(projects());
        type_text(&mut dialog, "Half typed");
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), Some(DialogResponse::Cancel));
    }

    #[test]
    fn project_selection_wraps() {
        let mut dialog = AddTaskDialog::new(projects());
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Up));
        assert_eq!(dialog.selected_project().map(|p| p.id.as_str()), Some("proj_german"));
        dialog.handle_key(key(KeyCode::Char('j')));
        assert_eq!(dialog.selected_project().map(|p| p.id.as_str()), Some("proj_python"));
        // Letters go to the project selector, not the name field
        assert_eq!(dialog.name.value(), "");
    }

    #[test]
    fn no_projects_cannot_submit() {
        let mut dialog = AddTaskDialog::new(Vec::new());
        type_text(&mut dialog, "Orphan");
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), None);
        assert!(dialog.error.is_some());
    }
}
