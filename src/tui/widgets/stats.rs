use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::models::DailyLog;
use crate::query::CompletionStats;
use crate::tui::widgets::color::parse_color;

/// Lines shown in the stats box: overall completion and today's focus score
pub fn stats_lines(stats: &CompletionStats, today: Option<&DailyLog>) -> [String; 2] {
    let focus = today
        .map(|log| log.focus_score.to_string())
        .unwrap_or_else(|| "-".to_string());
    [
        format!("{}/{} completed", stats.done, stats.total),
        format!("{}/10 today", focus),
    ]
}

pub fn render_stats(
    f: &mut Frame,
    area: Rect,
    stats: &CompletionStats,
    today: Option<&DailyLog>,
    theme: &Theme,
) {
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let label = Style::default().add_modifier(Modifier::BOLD);
    let [completed, focus] = stats_lines(stats, today);

    let text = vec![
        Line::from(vec![Span::styled("Tasks: ", label), Span::raw(completed)]),
        Line::from(vec![Span::styled("Focus Score: ", label), Span::raw(focus)]),
    ];

    let paragraph = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Stats")
            .border_style(Style::default().fg(parse_color(&theme.accent)))
            .style(style),
    );
    f.render_widget(paragraph, area);
}
