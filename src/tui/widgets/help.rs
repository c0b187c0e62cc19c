use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::KeyBindings;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display as display;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);

    // Clear first so the table does not show through
    f.render_widget(Clear, popup_area);

    let style = Style::default().fg(fg_color).bg(bg_color);
    let paragraph = Paragraph::new(build_help_text(&config.key_bindings))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect using a percentage of the available area
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(keys: &KeyBindings) -> String {
    let mut text = String::new();

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {} / {}: Move selection up/down\n", display(&keys.list_up), display(&keys.list_down)));
    text.push_str(&format!("  {}: Mark selected task complete\n", display(&keys.mark_complete)));
    text.push_str(&format!("  {}: Add a task\n", display(&keys.add_task)));
    text.push('\n');

    text.push_str("Filters:\n");
    text.push_str(&format!("  {}: Filter by task or project name\n", display(&keys.filter)));
    text.push_str("    Enter: Keep filter  Esc: Clear filter\n");
    text.push_str(&format!("  {}: Toggle today only\n", display(&keys.toggle_today)));
    text.push('\n');

    text.push_str("Add Task Dialog:\n");
    text.push_str("  Tab: Switch between name and project\n");
    text.push_str("  Up / Down: Choose project\n");
    text.push_str("  Enter: Create  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));
    text.push_str(&format!("  {} / Ctrl+c: Quit\n", display(&keys.quit)));

    text
}
