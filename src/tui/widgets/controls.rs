use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::{KeyBindings, Theme};
use crate::tui::app::FilterState;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::text_input::render_text_input;
use crate::utils::format_key_binding_for_display as display;

fn button(f: &mut Frame, area: Rect, label: String, style: Style) {
    let paragraph = Paragraph::new(label)
        .alignment(Alignment::Center)
        .style(style)
        .block(Block::default().borders(Borders::ALL).style(style));
    f.render_widget(paragraph, area);
}

pub fn today_switch_label(today_only: bool) -> &'static str {
    if today_only { "Today Only [x]" } else { "Today Only [ ]" }
}

/// Action buttons, the filter input and the today-only switch
pub fn render_controls(
    f: &mut Frame,
    area: Rect,
    filter: &FilterState,
    filter_focused: bool,
    keys: &KeyBindings,
    theme: &Theme,
) {
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let accent = Style::default().fg(parse_color(&theme.accent));

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Length(17),
            Constraint::Min(16),
            Constraint::Length(18),
        ])
        .split(area);

    button(f, columns[0], format!("[{}] Mark Complete", display(&keys.mark_complete)), style);
    button(f, columns[1], format!("[{}] Add Task", display(&keys.add_task)), style);

    render_text_input(
        f,
        columns[2],
        &filter.search,
        &format!("Filter [{}]", display(&keys.filter)),
        "Filter tasks...",
        filter_focused,
        style,
        if filter_focused { accent } else { style },
    );

    let switch_style = if filter.today_only {
        style.add_modifier(Modifier::BOLD).patch(accent)
    } else {
        style
    };
    button(
        f,
        columns[3],
        format!("{} {}", today_switch_label(filter.today_only), display(&keys.toggle_today)),
        switch_style,
    );
}
