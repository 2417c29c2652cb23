use anyhow::{anyhow, Result};
use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;
use std::str::FromStr;

use crate::cli::args::GoalCommands;
use crate::config::AppConfig;
use crate::db::repository::{load_snapshot, GoalRepo, HabitRepo, LogRepo, NewHabit, StreakRepo};
use crate::models::{parse_target_days, Effectiveness, Frequency, Habit, Streak, ALL_DAYS};
use crate::progress::is_scheduled;
use crate::utils::date::{format_ymd, month_grid, parse_ymd, same_month, week_dates, WEEKDAY_SHORT};
use crate::utils::format::{format_percent, format_value, percent_bar, progress_bar};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! print_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        print!("\x1b[0m");
    }};
}

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const ACCENT: &str = "\x1b[38;2;99;102;241m";

/// 24-bit foreground escape for a habit's hex color; plain text on bad input.
fn hex_color(hex: &str) -> String {
    let h = hex.trim_start_matches('#');
    if h.len() == 6 {
        if let Ok(rgb) = u32::from_str_radix(h, 16) {
            return format!(
                "\x1b[38;2;{};{};{}m",
                (rgb >> 16) & 0xff,
                (rgb >> 8) & 0xff,
                rgb & 0xff
            );
        }
    }
    String::new()
}

// ─── Habit resolution ────────────────────────────────────────────────────────

/// Resolve a habit by case-insensitive name, falling back to prefix match.
/// Ambiguous prefixes are an error rather than a guess.
fn resolve_habit(conn: &Connection, query: &str, archived: bool) -> Result<Habit> {
    let habits: Vec<Habit> = HabitRepo::all(conn)?
        .into_iter()
        .filter(|h| h.is_active() != archived)
        .collect();

    let needle = query.to_lowercase();
    if let Some(habit) = habits.iter().find(|h| h.name.to_lowercase() == needle) {
        return Ok(habit.clone());
    }

    let matches: Vec<&Habit> = habits
        .iter()
        .filter(|h| h.name.to_lowercase().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [habit] => Ok((*habit).clone()),
        [] => Err(anyhow!(
            "No {} habit matches '{}'",
            if archived { "archived" } else { "active" },
            query
        )),
        many => Err(anyhow!(
            "'{}' is ambiguous: {}",
            query,
            many.iter()
                .map(|h| h.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}

fn parse_date_flag(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        None => Ok(Local::now().date_naive()),
        Some(s) => parse_ymd(s).ok_or_else(|| anyhow!("Bad date '{}' (expected YYYY-MM-DD)", s)),
    }
}

// ─── Add / edit / archive ────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    conn: &Connection,
    config: &AppConfig,
    name: &str,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    frequency: &str,
    days: Option<&str>,
    target: Option<f64>,
    unit: Option<String>,
) -> Result<()> {
    let frequency = Frequency::from_str(frequency)?;
    let target_days = target_days_for(frequency, days)?;

    let existing = HabitRepo::all(conn)?;
    if existing
        .iter()
        .any(|h| h.is_active() && h.name.to_lowercase() == name.to_lowercase())
    {
        return Err(anyhow!("An active habit named '{}' already exists", name));
    }

    let color = color.unwrap_or_else(|| config.color_for_index(existing.len()));
    let habit = NewHabit {
        name: name.to_string(),
        description,
        color,
        icon,
        frequency,
        target_days,
        target_value: target,
        unit,
    };
    let id = HabitRepo::insert(conn, &habit)?;
    let habit = HabitRepo::get(conn, id)?
        .ok_or_else(|| anyhow!("Habit {} vanished right after insert", id))?;

    println_colored!(
        GREEN,
        "  ✓ Added habit: {} ({}, {})",
        habit.name,
        habit.frequency.as_str(),
        habit.schedule_summary()
    );
    Ok(())
}

fn target_days_for(frequency: Frequency, days: Option<&str>) -> Result<Vec<u8>> {
    match frequency {
        Frequency::Daily => Ok(ALL_DAYS.to_vec()),
        Frequency::Weekly | Frequency::Custom => {
            let days =
                days.ok_or_else(|| anyhow!("Weekly and custom habits need --days (e.g. mon,thu)"))?;
            let parsed = parse_target_days(days)?;
            if parsed.is_empty() {
                return Err(anyhow!("--days must name at least one weekday"));
            }
            Ok(parsed)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_edit(
    conn: &Connection,
    habit_query: &str,
    name: Option<String>,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    frequency: Option<&str>,
    days: Option<&str>,
    target: Option<f64>,
    unit: Option<String>,
) -> Result<()> {
    let mut habit = resolve_habit(conn, habit_query, false)?;

    if let Some(name) = name {
        habit.name = name;
    }
    if let Some(description) = description {
        habit.description = Some(description);
    }
    if let Some(color) = color {
        habit.color = color;
    }
    if let Some(icon) = icon {
        habit.icon = Some(icon);
    }
    if let Some(freq) = frequency {
        habit.frequency = Frequency::from_str(freq)?;
        habit.target_days = match habit.frequency {
            Frequency::Daily => ALL_DAYS.to_vec(),
            // keep the existing schedule unless --days overrides it
            _ => days
                .map(parse_target_days)
                .transpose()?
                .unwrap_or(habit.target_days),
        };
    } else if let Some(days) = days {
        habit.target_days = parse_target_days(days)?;
    }
    if let Some(target) = target {
        habit.target_value = Some(target);
    }
    if let Some(unit) = unit {
        habit.unit = Some(unit);
    }

    HabitRepo::update(conn, &habit)?;
    println_colored!(
        GREEN,
        "  ✓ Updated {} ({}, {})",
        habit.name,
        habit.frequency.as_str(),
        habit.schedule_summary()
    );
    Ok(())
}

pub fn handle_archive(conn: &Connection, habit_query: &str) -> Result<()> {
    let habit = resolve_habit(conn, habit_query, false)?;
    HabitRepo::archive(conn, habit.id)?;
    println_colored!(AMBER, "  Archived {} — history is kept", habit.name);
    Ok(())
}

pub fn handle_unarchive(conn: &Connection, habit_query: &str) -> Result<()> {
    let habit = resolve_habit(conn, habit_query, true)?;
    HabitRepo::unarchive(conn, habit.id)?;
    println_colored!(GREEN, "  ✓ Restored {}", habit.name);
    Ok(())
}

// ─── List ────────────────────────────────────────────────────────────────────

pub fn handle_list(conn: &Connection, archived: bool) -> Result<()> {
    let habits: Vec<Habit> = HabitRepo::all(conn)?
        .into_iter()
        .filter(|h| h.is_active() != archived)
        .collect();

    println!();
    if habits.is_empty() {
        if archived {
            println_colored!(DIM, "  No archived habits");
        } else {
            println_colored!(DIM, "  No habits yet — try: cadence add \"Read\"");
        }
        println!();
        return Ok(());
    }

    let title = if archived { "Archived Habits" } else { "Habits" };
    println_colored!(ACCENT, "  {} ({})", title, habits.len());
    println!();

    for habit in &habits {
        let streak = StreakRepo::get(conn, habit.id)?;
        let (current, longest) = streak.map(|s| (s.current, s.longest)).unwrap_or((0, 0));

        print_colored!(hex_color(&habit.color), "  ●");
        print_colored!(BOLD, " {:<24}", habit.name);
        print_colored!(DIM, "{:<22}", habit.schedule_summary());
        if current > 0 {
            print_colored!(GREEN, "⚡ {} day streak", current);
            print_colored!(DIM, " (best {})", longest);
        } else {
            print_colored!(DIM, "no streak");
        }
        println!();

        if let Some(desc) = &habit.description {
            println_colored!(DIM, "      {}", desc);
        }
    }
    println!();
    Ok(())
}

// ─── Done ────────────────────────────────────────────────────────────────────

pub fn handle_done(
    conn: &Connection,
    habit_query: &str,
    date: Option<&str>,
    value: Option<f64>,
    note: Option<&str>,
) -> Result<()> {
    let habit = resolve_habit(conn, habit_query, false)?;
    let date = parse_date_flag(date)?;

    let completed = LogRepo::toggle(conn, habit.id, date, value, note)?;
    let streak = StreakRepo::get(conn, habit.id)?.unwrap_or_else(|| Streak::empty(habit.id));

    if completed {
        print_colored!(GREEN, "  ✓ {} done for {}", habit.name, format_ymd(date));
        if let Some(value) = value {
            let unit = habit.unit.as_deref().unwrap_or("");
            print_colored!(DIM, " ({} {})", format_value(value), unit);
        }
        println!();
        if streak.current > 1 {
            println_colored!(
                GREEN,
                "    ⚡ {} day streak (best {})",
                streak.current,
                streak.longest
            );
        }
    } else {
        println_colored!(AMBER, "  ○ {} unmarked for {}", habit.name, format_ymd(date));
    }

    if !is_scheduled(&habit, date) {
        println_colored!(
            DIM,
            "    note: {} is not scheduled on {}",
            habit.name,
            WEEKDAY_SHORT[date.weekday().num_days_from_sunday() as usize]
        );
    }
    Ok(())
}

// ─── Today ───────────────────────────────────────────────────────────────────

pub fn handle_today(conn: &Connection) -> Result<()> {
    let today = Local::now().date_naive();
    let snapshot = load_snapshot(conn)?;
    let due = snapshot.due_on(today);

    println!();
    println_colored!(ACCENT, "  Today — {}", today.format("%A, %b %d"));
    println!();

    if due.is_empty() {
        println_colored!(DIM, "  Nothing scheduled today");
        println!();
        return Ok(());
    }

    for habit in &due {
        let done = snapshot.is_completed_on(habit.id, today);
        if done {
            print_colored!(GREEN, "  ● ");
        } else {
            print_colored!(DIM, "  ○ ");
        }
        print_colored!(BOLD, "{:<24}", habit.name);
        if let (Some(target), Some(unit)) = (habit.target_value, habit.unit.as_deref()) {
            print_colored!(DIM, "target {} {}  ", format_value(target), unit);
        }
        let streak = snapshot.streak_for(habit.id);
        if streak.current > 0 {
            print_colored!(GREEN, "⚡ {}", streak.current);
        }
        println!();
    }

    let completion = snapshot.daily_completion(today);
    println!();
    print_colored!(DIM, "  {}/{} done  ", completion.completed, completion.scheduled);
    print_colored!(GREEN, "{}", percent_bar(completion.rate(), 12));
    println_colored!(BOLD, "  {}", format_percent(completion.rate()));
    println!();
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

fn rate_icon(rate: f64) -> (&'static str, &'static str) {
    if rate >= 80.0 {
        ("●", GREEN)
    } else if rate >= 50.0 {
        ("◕", AMBER)
    } else if rate > 0.0 {
        ("◑", AMBER)
    } else {
        ("○", DIM)
    }
}

pub fn handle_stats(conn: &Connection, week: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let snapshot = load_snapshot(conn)?;
    let active = snapshot.active_habits();

    println!();
    println_colored!(ACCENT, "  Statistics");
    println!();
    println_colored!(BOLD, "  Active habits:  {}", active.len());
    println!("  Log entries:    {}", snapshot.logs.len());

    let mut streaks: Vec<_> = active
        .iter()
        .map(|h| (h.name.clone(), snapshot.streak_for(h.id)))
        .collect();
    streaks.sort_by(|a, b| b.1.current.cmp(&a.1.current));

    if let Some((name, streak)) = streaks.first() {
        if streak.current > 0 {
            println_colored!(
                GREEN,
                "  Top streak:     {} — {} days (best {})",
                name,
                streak.current,
                streak.longest
            );
        }
    }

    let today_rate = snapshot.completion_rate_for_date(today);
    println!("  Today:          {}", format_percent(today_rate));

    if week {
        println!();
        println_colored!(DIM, "  Last 7 days  (● ≥80%, ◕ ≥50%, ◑ >0%, ○ 0%)");
        println!();
        print!("  ");
        let start = today - chrono::Duration::days(6);
        for date in start.iter_days().take_while(|d| *d <= today) {
            let rate = snapshot.completion_rate_for_date(date);
            let (icon, color) = rate_icon(rate);
            print_colored!(color, "{} ", icon);
        }
        println!();
    }

    println!();
    Ok(())
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub fn handle_calendar(conn: &Connection, month: Option<&str>) -> Result<()> {
    let today = Local::now().date_naive();
    let anchor = match month {
        None => today,
        Some(s) => NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .map_err(|_| anyhow!("Bad month '{}' (expected YYYY-MM)", s))?,
    };

    let snapshot = load_snapshot(conn)?;
    let grid = month_grid(anchor);

    println!();
    println_colored!(ACCENT, "  {}", anchor.format("%B %Y"));
    println!();
    print!("  ");
    for name in WEEKDAY_SHORT {
        print_colored!(DIM, "{:<4}", &name[..2]);
    }
    println!();

    for week in &grid {
        print!("  ");
        for date in week {
            let label = if *date == today {
                format!("[{:>2}]", date.day())
            } else {
                format!("{:>3} ", date.day())
            };
            if !same_month(*date, anchor) {
                print_colored!(DIM, "{}", label);
                continue;
            }
            let completion = snapshot.daily_completion(*date);
            if completion.scheduled == 0 || *date > today {
                print!("{}", label);
            } else {
                let (_, color) = rate_icon(completion.rate());
                print_colored!(color, "{}", label);
            }
        }
        println!();
    }

    println!();
    println_colored!(DIM, "  green ≥80% of due habits done, amber partial, plain none due");
    println!();
    Ok(())
}

// ─── Goals ───────────────────────────────────────────────────────────────────

pub fn handle_goal(conn: &Connection, action: &GoalCommands) -> Result<()> {
    match action {
        GoalCommands::Add {
            habit,
            start,
            end,
            target,
            notes,
        } => {
            let habit = resolve_habit(conn, habit, false)?;
            let start = parse_ymd(start).ok_or_else(|| anyhow!("Bad start date '{}'", start))?;
            let end = parse_ymd(end).ok_or_else(|| anyhow!("Bad end date '{}'", end))?;
            if *target <= 0 {
                return Err(anyhow!("--target must be a positive day count"));
            }
            GoalRepo::insert(conn, habit.id, start, end, *target, notes.as_deref())?;
            println_colored!(
                GREEN,
                "  ✓ Goal for {}: {} of {} days ({} → {})",
                habit.name,
                target,
                (end - start).num_days() + 1,
                format_ymd(start),
                format_ymd(end)
            );
        }
        GoalCommands::List => {
            let today = Local::now().date_naive();
            let snapshot = load_snapshot(conn)?;
            println!();
            if snapshot.goals.is_empty() {
                println_colored!(DIM, "  No goals yet — try: cadence goal add <habit> ...");
                println!();
                return Ok(());
            }
            println_colored!(ACCENT, "  Goals");
            println!();
            for goal in &snapshot.goals {
                let name = snapshot
                    .habit_by_id(goal.habit_id)
                    .map(|h| h.name.as_str())
                    .unwrap_or("(deleted habit)");
                let progress = snapshot.evaluate_goal(goal, today);
                let band_color = match progress.effectiveness() {
                    Effectiveness::HighlyEffective => GREEN,
                    Effectiveness::ModeratelyEffective => AMBER,
                    Effectiveness::NeedsImprovement => RED,
                };

                print_colored!(DIM, "  #{:<3}", goal.id);
                print_colored!(BOLD, " {:<20}", name);
                println_colored!(
                    DIM,
                    "{} → {}  (aim {} days)",
                    format_ymd(goal.start_date),
                    format_ymd(goal.end_date),
                    goal.target_days
                );
                print!("       ");
                print_colored!(GREEN, "{}", percent_bar(progress.progress, 16));
                print_colored!(
                    BOLD,
                    "  {}/{} days · {}",
                    progress.completed_days,
                    progress.total_days,
                    format_percent(progress.progress)
                );
                println_colored!(band_color, "  {}", progress.effectiveness().label());
                if let Some(notes) = &goal.notes {
                    println_colored!(DIM, "       {}", notes);
                }
            }
            println!();
        }
        GoalCommands::Delete { id } => {
            if GoalRepo::delete(conn, *id)? {
                println_colored!(AMBER, "  Deleted goal #{}", id);
            } else {
                return Err(anyhow!("No goal with id {}", id));
            }
        }
    }
    Ok(())
}

// ─── Report ──────────────────────────────────────────────────────────────────

pub fn handle_report(conn: &Connection, config: &AppConfig, days: Option<i64>) -> Result<()> {
    let window = days.unwrap_or(config.report.window_days);
    if window <= 0 {
        return Err(anyhow!("--days must be positive"));
    }
    let today = Local::now().date_naive();
    let snapshot = load_snapshot(conn)?;
    let active = snapshot.active_habits();

    println!();
    if active.is_empty() {
        println_colored!(DIM, "  No habits to report on yet");
        println!();
        return Ok(());
    }

    println_colored!(ACCENT, "  Report — last {} days", window);
    println!();

    let mut rated: Vec<(&&Habit, f64, f64)> = active
        .iter()
        .map(|h| {
            (
                h,
                snapshot.completion_rate(h.id, 7, today),
                snapshot.completion_rate(h.id, window, today),
            )
        })
        .collect();
    rated.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println_colored!(DIM, "  {:<24}{:>8}{:>10}", "habit", "7d", "window");
    for (habit, weekly, windowed) in rated.iter().take(config.report.top_habits) {
        print_colored!(hex_color(&habit.color), "  ●");
        print_colored!(BOLD, " {:<22}", habit.name);
        print_colored!(GREEN, "{:>8}", format_percent(*weekly));
        println_colored!(DIM, "{:>10}", format_percent(*windowed));
    }
    if rated.len() > config.report.top_habits {
        println_colored!(DIM, "  … and {} more", rated.len() - config.report.top_habits);
    }

    // Streak leaderboard
    let mut streaks: Vec<_> = active
        .iter()
        .map(|h| (h.name.clone(), snapshot.streak_for(h.id)))
        .collect();
    streaks.sort_by(|a, b| b.1.current.cmp(&a.1.current));
    println!();
    println_colored!(DIM, "  Top streaks");
    for (name, streak) in streaks.iter().take(3).filter(|(_, s)| s.current > 0) {
        println_colored!(
            GREEN,
            "    ⚡ {:<22}{} days (best {})",
            name,
            streak.current,
            streak.longest
        );
    }

    // Daily strip for the last 7 days
    println!();
    println_colored!(DIM, "  Daily completion, last 7 days");
    let start = today - chrono::Duration::days(6);
    let mut sum = 0.0;
    for date in start.iter_days().take_while(|d| *d <= today) {
        let completion = snapshot.daily_completion(date);
        let rate = completion.rate();
        sum += rate;
        print_colored!(DIM, "    {}  ", date.format("%a"));
        print_colored!(GREEN, "{}", percent_bar(rate, 12));
        println_colored!(DIM, "  {}", format_percent(rate));
    }
    println!();
    println_colored!(BOLD, "  Weekly average: {}", format_percent(sum / 7.0));
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

pub fn handle_export(conn: &Connection) -> Result<()> {
    let today = Local::now().date_naive();
    let snapshot = load_snapshot(conn)?;
    let week = week_dates(today);

    println!("# cadence — Weekly Summary");
    println!("# {}", format_ymd(today));
    println!();
    println!("## Daily Completion (week of {})", format_ymd(week[0]));
    for date in &week {
        if *date > today {
            println!("  {}  -", format_ymd(*date));
            continue;
        }
        let completion = snapshot.daily_completion(*date);
        println!(
            "  {}  {}/{}  {}",
            format_ymd(*date),
            completion.completed,
            completion.scheduled,
            progress_bar(completion.completed, completion.scheduled, 10)
        );
    }

    println!();
    println!("## Habits");
    for habit in snapshot.active_habits() {
        let streak = snapshot.streak_for(habit.id);
        let weekly = snapshot.completion_rate(habit.id, 7, today);
        println!(
            "  {:<24} {:<22} 7d {:>6}  streak {} (best {})",
            habit.name,
            habit.schedule_summary(),
            format_percent(weekly),
            streak.current,
            streak.longest
        );
    }

    if !snapshot.goals.is_empty() {
        println!();
        println!("## Goals");
        for goal in &snapshot.goals {
            let name = snapshot
                .habit_by_id(goal.habit_id)
                .map(|h| h.name.as_str())
                .unwrap_or("(deleted habit)");
            let progress = snapshot.evaluate_goal(goal, today);
            println!(
                "  {:<24} {}/{} days  {}  {}",
                name,
                progress.completed_days,
                progress.total_days,
                format_percent(progress.progress),
                progress.effectiveness().label()
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::repository::HabitRepo;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn add_habit(conn: &Connection, name: &str) -> i64 {
        HabitRepo::insert(
            conn,
            &NewHabit {
                name: name.to_string(),
                description: None,
                color: "#3B82F6".to_string(),
                icon: None,
                frequency: Frequency::Daily,
                target_days: ALL_DAYS.to_vec(),
                target_value: None,
                unit: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn resolve_exact_name_is_case_insensitive() {
        let conn = test_conn();
        let id = add_habit(&conn, "Read");
        assert_eq!(resolve_habit(&conn, "read", false).unwrap().id, id);
        assert_eq!(resolve_habit(&conn, "READ", false).unwrap().id, id);
    }

    #[test]
    fn resolve_falls_back_to_unambiguous_prefix() {
        let conn = test_conn();
        let id = add_habit(&conn, "Meditate");
        add_habit(&conn, "Run");
        assert_eq!(resolve_habit(&conn, "med", false).unwrap().id, id);
    }

    #[test]
    fn resolve_rejects_ambiguous_prefix() {
        let conn = test_conn();
        add_habit(&conn, "Read fiction");
        add_habit(&conn, "Read papers");
        let err = resolve_habit(&conn, "read", false).unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn resolve_honors_archived_flag() {
        let conn = test_conn();
        let id = add_habit(&conn, "Old habit");
        HabitRepo::archive(&conn, id).unwrap();
        assert!(resolve_habit(&conn, "old habit", false).is_err());
        assert_eq!(resolve_habit(&conn, "old habit", true).unwrap().id, id);
    }

    #[test]
    fn daily_habits_get_all_seven_days() {
        assert_eq!(
            target_days_for(Frequency::Daily, None).unwrap(),
            ALL_DAYS.to_vec()
        );
    }

    #[test]
    fn weekly_habits_require_days() {
        assert!(target_days_for(Frequency::Weekly, None).is_err());
        assert_eq!(
            target_days_for(Frequency::Weekly, Some("tue,sat")).unwrap(),
            vec![2, 6]
        );
    }
}
