use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::repository::{load_snapshot, LogRepo};
use crate::models::Habit;
use crate::progress::Snapshot;
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::goals::{self, GoalRow};
use crate::tui::widgets::{habits, header, statusbar, streak};
use crate::utils::date::week_dates;
use crate::utils::format::{format_percent, percent_bar};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

/// A habit due today, with the bits of derived state the dashboard shows.
pub struct DueRow {
    pub habit: Habit,
    pub done: bool,
    pub streak_current: u32,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub focus_idx: usize,
    pub should_quit: bool,

    // Cached state (refreshed on action and on date rollover)
    pub today: NaiveDate,
    pub snapshot: Snapshot,
    pub rows: Vec<DueRow>,
    pub goal_rows: Vec<GoalRow>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        App {
            view: View::Dashboard,
            config,
            focus_idx: 0,
            should_quit: false,
            today: Local::now().date_naive(),
            snapshot: Snapshot::default(),
            rows: Vec::new(),
            goal_rows: Vec::new(),
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        self.today = Local::now().date_naive();
        self.snapshot = load_snapshot(conn)?;

        self.rows = self
            .snapshot
            .due_on(self.today)
            .into_iter()
            .cloned()
            .map(|habit| DueRow {
                done: self.snapshot.is_completed_on(habit.id, self.today),
                streak_current: self.snapshot.streak_for(habit.id).current,
                habit,
            })
            .collect();
        if self.focus_idx >= self.rows.len() {
            self.focus_idx = self.rows.len().saturating_sub(1);
        }

        self.goal_rows = self
            .snapshot
            .goals
            .iter()
            .map(|goal| GoalRow {
                habit_name: self
                    .snapshot
                    .habit_by_id(goal.habit_id)
                    .map(|h| h.name.clone())
                    .unwrap_or_else(|| "(deleted)".to_string()),
                progress: self.snapshot.evaluate_goal(goal, self.today),
            })
            .collect();
        Ok(())
    }

    pub fn tick(&mut self, conn: &Connection) {
        // Reload when the calendar day rolls over under a running session
        if Local::now().date_naive() != self.today {
            let _ = self.load(conn);
        }
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key, conn),
            View::Stats => self.handle_stats_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            KeyCode::Up => {
                if self.focus_idx > 0 {
                    self.focus_idx -= 1;
                }
            }
            KeyCode::Down => {
                if self.focus_idx + 1 < self.rows.len() {
                    self.focus_idx += 1;
                }
            }
            KeyCode::Char('m') | KeyCode::Enter => {
                self.toggle_focused(conn);
            }
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn toggle_focused(&mut self, conn: &Connection) {
        if let Some(row) = self.rows.get(self.focus_idx) {
            let _ = LogRepo::toggle(conn, row.habit.id, self.today, None, None);
            let _ = self.load(conn);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let completion = self.snapshot.daily_completion(self.today);
        header::render(frame, outer_chunks[0], completion.completed, completion.scheduled);
        statusbar::render(frame, outer_chunks[2]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(outer_chunks[1]);

        habits::render(frame, columns[0], &self.rows, self.focus_idx);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(9), // streak
                Constraint::Min(0),    // goals
            ])
            .split(columns[1]);

        if let Some(row) = self.rows.get(self.focus_idx) {
            let full_streak = self.snapshot.streak_for(row.habit.id);
            let week: Vec<bool> = week_dates(self.today)
                .into_iter()
                .map(|d| self.snapshot.is_completed_on(row.habit.id, d))
                .collect();
            streak::render(frame, right_chunks[0], &row.habit.name, &full_streak, &week);
        } else {
            let block = Block::default()
                .title(Span::styled(" Streak ", theme::accent()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border(false))
                .style(theme::surface());
            frame.render_widget(block, right_chunks[0]);
        }

        goals::render(frame, right_chunks[1], &self.goal_rows);
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let window = self.config.report.window_days;
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {:<22}{:>8}{:>8}", "habit", "7d", format!("{}d", window)),
                    theme::dim(),
                ),
            ]),
            Line::from(""),
        ];

        for habit in self.snapshot.active_habits() {
            let weekly = self.snapshot.completion_rate(habit.id, 7, self.today);
            let windowed = self.snapshot.completion_rate(habit.id, window, self.today);
            lines.push(Line::from(vec![
                Span::styled("  ▌", theme::habit_color(&habit.color)),
                Span::styled(format!(" {:<20}", habit.name), theme::bold()),
                Span::styled(format!("{:>8}", format_percent(weekly)), theme::rate_style(weekly)),
                Span::styled(
                    format!("{:>8}", format_percent(windowed)),
                    theme::rate_style(windowed),
                ),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  Last 7 Days", theme::accent())));
        lines.push(Line::from(""));

        let start = self.today - chrono::Duration::days(6);
        for date in start.iter_days().take_while(|d| *d <= self.today) {
            let rate = self.snapshot.completion_rate_for_date(date);
            lines.push(Line::from(vec![
                Span::styled(format!("  {}  ", date.format("%a")), theme::dim()),
                Span::styled(percent_bar(rate, 12), theme::rate_style(rate)),
                Span::styled(format!("  {}", format_percent(rate)), theme::dim()),
            ]));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, chunks[1]);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();

        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [m] / Enter  ", theme::accent()),
                Span::styled("Toggle habit for today", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [↑ ↓]        ", theme::accent()),
                Span::styled("Navigate habits", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [s]          ", theme::accent()),
                Span::styled("Stats view", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]          ", theme::accent()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [Esc]        ", theme::accent()),
                Span::styled("Quit", theme::dim()),
            ]),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let tick_rate_ms = config.tui.tick_rate_ms;
    let mut app = App::new(config);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(tick_rate_ms);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Resize => {}
            Event::Tick => {
                app.tick(&conn);
            }
        }
    }

    ratatui::restore();
    Ok(())
}
