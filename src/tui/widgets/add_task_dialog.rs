use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::tui::dialog::{AddTaskDialog, DialogField};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::help::popup_area;
use crate::tui::widgets::text_input::render_text_input;

/// "< Learn German (2/3) >", or a notice when there are no projects
pub fn project_selector_text(dialog: &AddTaskDialog) -> String {
    match dialog.selected_project() {
        Some(project) => format!(
            "< {} ({}/{}) >",
            project.name,
            dialog.project_index + 1,
            dialog.projects.len()
        ),
        None => "No projects".to_string(),
    }
}

pub fn render_add_task_dialog(f: &mut Frame, area: Rect, dialog: &AddTaskDialog, theme: &Theme) {
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let accent = Style::default().fg(parse_color(&theme.accent));

    let mut popup = popup_area(area, 50, 50);
    popup.height = popup.height.max(12);
    let popup = popup.intersection(area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Add Task")
        .title_alignment(Alignment::Center)
        .border_style(accent)
        .style(style);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Project
            Constraint::Length(1), // Error
            Constraint::Min(0),
            Constraint::Length(1), // Hints
        ])
        .split(inner);

    let name_focused = dialog.focus == DialogField::Name;
    render_text_input(
        f,
        rows[0],
        &dialog.name,
        "Name",
        "What needs doing?",
        name_focused,
        style,
        if name_focused { accent } else { style },
    );

    let project_focused = dialog.focus == DialogField::Project;
    let project = Paragraph::new(project_selector_text(dialog))
        .style(if project_focused { style.add_modifier(Modifier::BOLD) } else { style })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Project")
                .border_style(if project_focused { accent } else { style })
                .style(style),
        );
    f.render_widget(project, rows[1]);

    if let Some(err) = &dialog.error {
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red)))),
            rows[2],
        );
    }

    f.render_widget(
        Paragraph::new("Enter: Create • Tab: Switch field • Esc: Cancel")
            .alignment(Alignment::Center)
            .style(style.add_modifier(Modifier::DIM)),
        rows[4],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Project;
    use chrono::NaiveDate;

    #[test]
    fn selector_shows_position() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut dialog = AddTaskDialog::new(vec![
            Project::new("proj_python", "Python CLI App", start),
            Project::new("proj_german", "Learn German", start),
        ]);
        assert_eq!(project_selector_text(&dialog), "< Python CLI App (1/2) >");
        dialog.project_index = 1;
        assert_eq!(project_selector_text(&dialog), "< Learn German (2/2) >");
        assert_eq!(project_selector_text(&AddTaskDialog::new(Vec::new())), "No projects");
    }
}
