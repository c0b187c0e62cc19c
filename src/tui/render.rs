use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::config::KeyBindings;
use crate::query::TaskStore;
use crate::tui::app::{App, Mode};
use crate::tui::widgets::{
    add_task_dialog::render_add_task_dialog,
    color::parse_color,
    controls::render_controls,
    help::render_help,
    stats::render_stats,
    status_bar::render_status_bar,
    task_table::render_task_table,
};
use crate::tui::Layout;
use crate::utils::format_key_binding_for_display as display;

/// Key hints for the status bar in the given mode
pub fn key_hints(mode: Mode, keys: &KeyBindings) -> Vec<String> {
    match mode {
        Mode::View => vec![
            format!("{}/{}: Move", display(&keys.list_up), display(&keys.list_down)),
            format!("{}: Complete", display(&keys.mark_complete)),
            format!("{}: Add", display(&keys.add_task)),
            format!("{}: Filter", display(&keys.filter)),
            format!("{}: Today", display(&keys.toggle_today)),
            format!("{}: Help", display(&keys.help)),
            format!("{}: Quit", display(&keys.quit)),
        ],
        Mode::Filter => vec![
            "Type to filter".to_string(),
            "Enter: Keep".to_string(),
            "Esc: Clear".to_string(),
        ],
        Mode::Help => vec![format!("Esc/{}: Close help", display(&keys.help))],
        Mode::Dialog => vec![
            "Enter: Create".to_string(),
            "Tab: Switch field".to_string(),
            "Esc: Cancel".to_string(),
        ],
    }
}

pub fn render<S: TaskStore>(f: &mut Frame, app: &mut App<S>, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Time Tracker")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_task_table(
        f,
        layout.table_area,
        &app.tasks,
        &mut app.ui.table_state,
        &app.filter,
        app.load_error.as_deref(),
        &active_theme,
    );

    render_controls(
        f,
        layout.controls_area,
        &app.filter,
        app.ui.mode == Mode::Filter,
        &app.config.key_bindings,
        &active_theme,
    );

    render_stats(f, layout.stats_area, &app.stats, app.today_summary.as_ref(), &active_theme);

    let hints = key_hints(app.ui.mode, &app.config.key_bindings);
    let message = app
        .status
        .message
        .as_deref()
        .map(|msg| (msg, app.status.severity));
    render_status_bar(f, layout.status_area, message, &hints, &active_theme);

    // Overlays last so they sit on top
    let full_area = f.area();
    match app.ui.mode {
        Mode::Help => render_help(f, full_area, &app.config),
        Mode::Dialog => {
            if let Some(dialog) = &app.dialog {
                render_add_task_dialog(f, full_area, dialog, &active_theme);
            }
        }
        Mode::View | Mode::Filter => {}
    }
}
