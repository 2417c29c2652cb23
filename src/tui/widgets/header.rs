use chrono::Local;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, done: u32, scheduled: u32) {
    let today = Local::now();
    let date_str = today.format("%A, %b %d, %Y").to_string();

    let title_line = Line::from(vec![Span::styled(
        "  cadence  ",
        theme::accent().add_modifier(Modifier::BOLD),
    )]);

    let summary = if scheduled == 0 {
        "nothing scheduled today".to_string()
    } else {
        format!("{} of {} done today", done, scheduled)
    };

    let date_line = Line::from(vec![
        Span::styled(date_str, theme::dim()),
        Span::styled("  ·  ", theme::dim()),
        Span::styled(summary, theme::amber()),
    ]);

    let text = vec![title_line, Line::from(""), date_line];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent().add_modifier(Modifier::BOLD))
        .style(theme::base());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
