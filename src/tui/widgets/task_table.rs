use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Paragraph, Row, Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState, Wrap,
};
use ratatui::Frame;

use crate::config::Theme;
use crate::models::{TaskListing, TaskStatus};
use crate::tui::app::FilterState;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, status_color};

const HEADERS: [&str; 5] = ["ID", "Task", "Project", "Status", "Due"];

fn status_cell(status: TaskStatus) -> Cell<'static> {
    Cell::from(Line::from(vec![
        Span::styled("⬤ ", Style::default().fg(status_color(status))),
        Span::raw(status.label()),
    ]))
}

/// Block title with the row count and the active filters
pub fn table_title(shown: usize, filter: &FilterState) -> String {
    let mut parts = Vec::new();
    let term = filter.search_term().trim();
    if !term.is_empty() {
        parts.push(format!("\"{}\"", term));
    }
    if filter.today_only {
        parts.push("today".to_string());
    }

    if parts.is_empty() {
        format!("Tasks ({})", shown)
    } else {
        format!("Tasks ({}) - {}", shown, parts.join(", "))
    }
}

pub fn render_task_table(
    f: &mut Frame,
    area: Rect,
    tasks: &[TaskListing],
    table_state: &mut TableState,
    filter: &FilterState,
    load_error: Option<&str>,
    theme: &Theme,
) {
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let highlight_fg = if theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&theme.highlight_fg)
    };
    let style = Style::default().fg(fg_color).bg(bg_color);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(table_title(tasks.len(), filter))
        .style(style);

    if let Some(err) = load_error {
        let paragraph = Paragraph::new(format!("Could not load tasks\n\n{}", err))
            .style(Style::default().fg(Color::Red).bg(bg_color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    if tasks.is_empty() {
        let paragraph = Paragraph::new("No tasks match the current filters")
            .style(style.add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(parse_color(&theme.accent)).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = tasks
        .iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.id.clone()),
                Cell::from(task.name.clone()),
                Cell::from(task.project_name.clone()),
                status_cell(task.status),
                Cell::from(task.date.to_string()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(22),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(style)
        .row_highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, table_state);

    // Header row and borders take three lines
    let visible_rows = area.height.saturating_sub(3) as usize;
    if tasks.len() > visible_rows && area.height > 3 {
        let scrollbar_area = Rect::new(area.x, area.y + 2, area.width, area.height.saturating_sub(3));
        let mut scrollbar_state = ScrollbarState::new(tasks.len())
            .viewport_content_length(visible_rows)
            .position(table_state.selected().unwrap_or(0));
        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}
