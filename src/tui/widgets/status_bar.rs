use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::config::Theme;
use crate::tui::app::Severity;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, severity_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `max_width`, ending with an ellipsis when some were dropped
pub fn fit_key_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let current = text.chars().count();
        let separator = if i == 0 { 0 } else { SEPARATOR.chars().count() };
        let added = separator + hint.chars().count();

        if current + added > max_width {
            if i == 0 {
                text = truncate(hint, max_width);
            } else if current + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            } else {
                text = truncate(&text, max_width);
            }
            break;
        }

        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

/// One-line bar: the current notification if any, otherwise key hints
pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<(&str, Severity)>,
    key_hints: &[String],
    theme: &Theme,
) {
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some((msg, severity)) => {
            let bg = severity_color(severity, parse_color(&theme.highlight_bg));
            (
                truncate(msg, max_width),
                Style::default()
                    .fg(get_contrast_text_color(bg))
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_key_hints(key_hints, max_width),
            Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}
