use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{Frequency, Habit, HabitGoal, HabitLog, Streak};
use crate::progress::{compute_streak, Snapshot};
use crate::utils::date::{format_ymd, parse_ymd};

fn date_decode_err(s: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidParameterName(format!("bad date '{}'", s))
}

// ─── Habits ──────────────────────────────────────────────────────────────────

/// Fields for a habit not yet in the store.
#[derive(Debug, Clone)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    pub frequency: Frequency,
    pub target_days: Vec<u8>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
}

pub struct HabitRepo;

impl HabitRepo {
    pub fn insert(conn: &Connection, habit: &NewHabit) -> Result<i64> {
        let target_days = serde_json::to_string(&habit.target_days)?;
        conn.execute(
            "INSERT INTO habits
                (name, description, color, icon, frequency, target_days, target_value, unit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.name,
                habit.description,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                target_days,
                habit.target_value,
                habit.unit,
            ],
        )?;
        let id = conn.last_insert_rowid();

        // New habits start with an empty materialized streak row
        StreakRepo::upsert(conn, &Streak::empty(id))?;
        log::debug!("habit {} created", id);
        Ok(id)
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Habit>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_HABITS))?;
        let habit = stmt.query_row(params![id], decode_habit).optional()?;
        Ok(habit)
    }

    pub fn all(conn: &Connection) -> Result<Vec<Habit>> {
        let mut stmt =
            conn.prepare(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_HABITS))?;
        let rows = stmt.query_map([], decode_habit)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn update(conn: &Connection, habit: &Habit) -> Result<()> {
        let target_days = serde_json::to_string(&habit.target_days)?;
        conn.execute(
            "UPDATE habits SET
                name = ?1, description = ?2, color = ?3, icon = ?4,
                frequency = ?5, target_days = ?6, target_value = ?7, unit = ?8
             WHERE id = ?9",
            params![
                habit.name,
                habit.description,
                habit.color,
                habit.icon,
                habit.frequency.as_str(),
                target_days,
                habit.target_value,
                habit.unit,
                habit.id,
            ],
        )?;
        Ok(())
    }

    pub fn archive(conn: &Connection, id: i64) -> Result<()> {
        conn.execute(
            "UPDATE habits SET archived_at = datetime('now')
             WHERE id = ?1 AND archived_at IS NULL",
            params![id],
        )?;
        Ok(())
    }

    pub fn unarchive(conn: &Connection, id: i64) -> Result<()> {
        conn.execute(
            "UPDATE habits SET archived_at = NULL WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }
}

const SELECT_HABITS: &str = "SELECT id, name, description, color, icon, frequency,
    target_days, target_value, unit, created_at, archived_at FROM habits";

fn decode_habit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Habit> {
    let frequency: String = row.get(5)?;
    let target_days: String = row.get(6)?;
    Ok(Habit {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        color: row.get(3)?,
        icon: row.get(4)?,
        frequency: Frequency::from_str(&frequency)
            .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
        target_days: serde_json::from_str(&target_days).unwrap_or_default(),
        target_value: row.get(7)?,
        unit: row.get(8)?,
        created_at: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        archived_at: row.get(10)?,
    })
}

// ─── Logs ────────────────────────────────────────────────────────────────────

pub struct LogRepo;

impl LogRepo {
    pub fn all(conn: &Connection) -> Result<Vec<HabitLog>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY date DESC, id DESC", SELECT_LOGS))?;
        let rows = stmt.query_map([], decode_log)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn for_habit(conn: &Connection, habit_id: i64) -> Result<Vec<HabitLog>> {
        let mut stmt =
            conn.prepare(&format!("{} WHERE habit_id = ?1 ORDER BY date", SELECT_LOGS))?;
        let rows = stmt.query_map(params![habit_id], decode_log)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn get(conn: &Connection, habit_id: i64, date: NaiveDate) -> Result<Option<HabitLog>> {
        let mut stmt =
            conn.prepare(&format!("{} WHERE habit_id = ?1 AND date = ?2", SELECT_LOGS))?;
        let log = stmt
            .query_row(params![habit_id, format_ymd(date)], decode_log)
            .optional()?;
        Ok(log)
    }

    /// Flip the completion state for (habit, date): an existing log toggles,
    /// a missing one is inserted completed. The habit's materialized streak
    /// is recomputed afterwards. Returns the new completion state.
    pub fn toggle(
        conn: &Connection,
        habit_id: i64,
        date: NaiveDate,
        value: Option<f64>,
        notes: Option<&str>,
    ) -> Result<bool> {
        let now_completed = match Self::get(conn, habit_id, date)? {
            Some(existing) => {
                let flipped = !existing.completed;
                conn.execute(
                    "UPDATE habit_logs SET
                        completed = ?1,
                        value = COALESCE(?2, value),
                        notes = COALESCE(?3, notes)
                     WHERE id = ?4",
                    params![flipped as i32, value, notes, existing.id],
                )?;
                flipped
            }
            None => {
                conn.execute(
                    "INSERT INTO habit_logs (habit_id, date, completed, value, notes)
                     VALUES (?1, ?2, 1, ?3, ?4)",
                    params![habit_id, format_ymd(date), value, notes],
                )?;
                true
            }
        };

        StreakRepo::recompute(conn, habit_id)?;
        Ok(now_completed)
    }
}

const SELECT_LOGS: &str =
    "SELECT id, habit_id, date, completed, value, notes, created_at FROM habit_logs";

fn decode_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitLog> {
    let date: String = row.get(2)?;
    Ok(HabitLog {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        date: parse_ymd(&date).ok_or_else(|| date_decode_err(&date))?,
        completed: row.get::<_, i32>(3)? != 0,
        value: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

// ─── Streaks ─────────────────────────────────────────────────────────────────

pub struct StreakRepo;

impl StreakRepo {
    pub fn upsert(conn: &Connection, streak: &Streak) -> Result<()> {
        conn.execute(
            "INSERT INTO streaks (habit_id, current, longest, last_completed_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(habit_id) DO UPDATE SET
                current = ?2, longest = ?3, last_completed_date = ?4",
            params![
                streak.habit_id,
                streak.current,
                streak.longest,
                streak.last_completed_date.map(format_ymd),
            ],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection, habit_id: i64) -> Result<Option<Streak>> {
        let mut stmt = conn.prepare(
            "SELECT habit_id, current, longest, last_completed_date
             FROM streaks WHERE habit_id = ?1",
        )?;
        let streak = stmt.query_row(params![habit_id], decode_streak).optional()?;
        Ok(streak)
    }

    pub fn all(conn: &Connection) -> Result<Vec<Streak>> {
        let mut stmt = conn.prepare(
            "SELECT habit_id, current, longest, last_completed_date FROM streaks",
        )?;
        let rows = stmt.query_map([], decode_streak)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    /// Rebuild the materialized row from the log history.
    pub fn recompute(conn: &Connection, habit_id: i64) -> Result<Streak> {
        let logs = LogRepo::for_habit(conn, habit_id)?;
        let streak = compute_streak(habit_id, &logs);
        Self::upsert(conn, &streak)?;
        Ok(streak)
    }
}

fn decode_streak(row: &rusqlite::Row<'_>) -> rusqlite::Result<Streak> {
    Ok(Streak {
        habit_id: row.get(0)?,
        current: row.get(1)?,
        longest: row.get(2)?,
        last_completed_date: row.get::<_, Option<String>>(3)?.and_then(|s| parse_ymd(&s)),
    })
}

// ─── Goals ───────────────────────────────────────────────────────────────────

pub struct GoalRepo;

impl GoalRepo {
    pub fn insert(
        conn: &Connection,
        habit_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        target_days: i64,
        notes: Option<&str>,
    ) -> Result<i64> {
        if end_date < start_date {
            return Err(anyhow!(
                "Goal window ends before it starts ({} > {})",
                format_ymd(start_date),
                format_ymd(end_date)
            ));
        }
        conn.execute(
            "INSERT INTO habit_goals (habit_id, start_date, end_date, target_days, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                habit_id,
                format_ymd(start_date),
                format_ymd(end_date),
                target_days,
                notes,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn all(conn: &Connection) -> Result<Vec<HabitGoal>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY start_date, id", SELECT_GOALS))?;
        let rows = stmt.query_map([], decode_goal)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }

    pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
        let affected = conn.execute("DELETE FROM habit_goals WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

const SELECT_GOALS: &str =
    "SELECT id, habit_id, start_date, end_date, target_days, notes, created_at FROM habit_goals";

fn decode_goal(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitGoal> {
    let start: String = row.get(2)?;
    let end: String = row.get(3)?;
    Ok(HabitGoal {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        start_date: parse_ymd(&start).ok_or_else(|| date_decode_err(&start))?,
        end_date: parse_ymd(&end).ok_or_else(|| date_decode_err(&end))?,
        target_days: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
    })
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// One consistent read of the whole store for the calculators and the TUI.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    Ok(Snapshot {
        habits: HabitRepo::all(conn)?,
        logs: LogRepo::all(conn)?,
        streaks: StreakRepo::all(conn)?,
        goals: GoalRepo::all(conn)?,
    })
}
