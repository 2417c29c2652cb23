use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Effectiveness, GoalProgress};
use crate::tui::theme;
use crate::utils::format::{format_percent, percent_bar};

pub struct GoalRow {
    pub habit_name: String,
    pub progress: GoalProgress,
}

pub fn render(frame: &mut Frame, area: Rect, rows: &[GoalRow]) {
    let block = Block::default()
        .title(Span::styled(" Goals ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(false))
        .style(theme::surface());

    let mut lines = vec![Line::from("")];

    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "  no goals — add one with `cadence goal add`",
            theme::dim(),
        )));
    }

    for row in rows {
        let band_style = match row.progress.effectiveness() {
            Effectiveness::HighlyEffective => theme::green(),
            Effectiveness::ModeratelyEffective => theme::amber(),
            Effectiveness::NeedsImprovement => theme::red(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<14}", row.habit_name), theme::bold()),
            Span::styled(percent_bar(row.progress.progress, 10), theme::green()),
            Span::styled(
                format!(
                    " {}/{}",
                    row.progress.completed_days, row.progress.total_days
                ),
                theme::dim(),
            ),
            Span::styled(
                format!("  {}", format_percent(row.progress.progress)),
                band_style,
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
