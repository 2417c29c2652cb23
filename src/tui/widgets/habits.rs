use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::tui::app::DueRow;
use crate::tui::theme;
use crate::utils::format::format_value;

pub fn render(frame: &mut Frame, area: Rect, rows: &[DueRow], focused_idx: usize) {
    let block = Block::default()
        .title(Span::styled(" Due Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border(true))
        .style(theme::surface());

    if rows.is_empty() {
        let empty = List::new([ListItem::new(Line::from(Span::styled(
            "  nothing scheduled today",
            theme::dim(),
        )))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let is_focused = i == focused_idx;

            let (icon, icon_style) = if row.done {
                ("●", theme::green())
            } else {
                ("○", theme::dim())
            };

            let name_style = if is_focused {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };

            let mut spans = vec![
                Span::styled("  ", theme::dim()),
                Span::styled("▌", theme::habit_color(&row.habit.color)),
                Span::styled(" ", theme::dim()),
                Span::styled(icon, icon_style),
                Span::styled(format!("  {:<20}", row.habit.name), name_style),
            ];

            if let (Some(target), Some(unit)) =
                (row.habit.target_value, row.habit.unit.as_deref())
            {
                spans.push(Span::styled(
                    format!("{} {}  ", format_value(target), unit),
                    theme::dim(),
                ));
            }

            if row.streak_current > 0 {
                spans.push(Span::styled(
                    format!("⚡{}", row.streak_current),
                    theme::green(),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
