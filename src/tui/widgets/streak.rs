use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Streak;
use crate::tui::theme;

/// Streak panel for the focused habit: a proportional bar for the current
/// run plus dots for the trailing week (Sunday first).
pub fn render(frame: &mut Frame, area: Rect, name: &str, streak: &Streak, week: &[bool]) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    for (i, done) in week.iter().enumerate() {
        let (dot, style) = if *done {
            ("●", theme::green())
        } else {
            ("○", theme::dim())
        };
        dot_spans.push(Span::styled(dot, style));
        if i + 1 < week.len() {
            dot_spans.push(Span::styled("  ", theme::dim()));
        }
    }

    // bar filled proportional to current streak out of 30 days
    let bar_len = 12usize;
    let ratio = (streak.current as f64 / 30.0).min(1.0);
    let filled = (ratio * bar_len as f64).round() as usize;
    let empty = bar_len.saturating_sub(filled);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    let name_line = Line::from(vec![Span::styled(
        format!("  {}", name),
        theme::bold(),
    )]);

    let streak_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, theme::green()),
        Span::styled(
            format!("  {} days", streak.current),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    let meta = match streak.last_completed_date {
        Some(date) => format!("  Best: {}  ·  Last: {}", streak.longest, date.format("%b %d")),
        None => format!("  Best: {}", streak.longest),
    };
    let meta_line = Line::from(vec![Span::styled(meta, theme::dim())]);

    let text = vec![
        name_line,
        Line::from(""),
        streak_line,
        Line::from(dot_spans),
        Line::from(""),
        meta_line,
    ];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
