use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS habits (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            name          TEXT NOT NULL,
            description   TEXT,
            color         TEXT NOT NULL DEFAULT '#6366F1',
            icon          TEXT,
            frequency     TEXT NOT NULL DEFAULT 'daily'
                          CHECK(frequency IN ('daily','weekly','custom')),
            target_days   TEXT NOT NULL DEFAULT '[0,1,2,3,4,5,6]',
            target_value  REAL,
            unit          TEXT,
            created_at    TEXT DEFAULT (datetime('now')),
            archived_at   TEXT
        );

        CREATE TABLE IF NOT EXISTS habit_logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id    INTEGER NOT NULL REFERENCES habits(id),
            date        TEXT NOT NULL,
            completed   INTEGER NOT NULL DEFAULT 0,
            value       REAL,
            notes       TEXT,
            created_at  TEXT DEFAULT (datetime('now')),
            UNIQUE(habit_id, date)
        );

        CREATE TABLE IF NOT EXISTS streaks (
            habit_id             INTEGER PRIMARY KEY REFERENCES habits(id),
            current              INTEGER NOT NULL DEFAULT 0,
            longest              INTEGER NOT NULL DEFAULT 0,
            last_completed_date  TEXT
        );

        CREATE TABLE IF NOT EXISTS habit_goals (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id     INTEGER NOT NULL REFERENCES habits(id),
            start_date   TEXT NOT NULL,
            end_date     TEXT NOT NULL,
            target_days  INTEGER NOT NULL DEFAULT 0,
            notes        TEXT,
            created_at   TEXT DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_habit_logs_date ON habit_logs(date);
        CREATE INDEX IF NOT EXISTS idx_habit_logs_habit ON habit_logs(habit_id);
    ")?;

    log::debug!("migrations applied");
    Ok(())
}
