#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use tempfile::TempDir;

    use crate::db::migrations::run_migrations;
    use crate::db::repository::{
        load_snapshot, GoalRepo, HabitRepo, LogRepo, NewHabit, StreakRepo,
    };
    use crate::models::{Frequency, ALL_DAYS};

    fn open_temp_db(dir: &TempDir) -> Connection {
        let conn = Connection::open(dir.path().join("cadence.db")).unwrap();
        conn.execute_batch("PRAGMA journal_mode=WAL;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn daily_habit(name: &str) -> NewHabit {
        NewHabit {
            name: name.to_string(),
            description: None,
            color: "#0D9488".to_string(),
            icon: None,
            frequency: Frequency::Daily,
            target_days: ALL_DAYS.to_vec(),
            target_value: None,
            unit: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn migrations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn habit_round_trip() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);

        let mut new = daily_habit("Read");
        new.description = Some("20 pages before bed".to_string());
        new.frequency = Frequency::Custom;
        new.target_days = vec![1, 3, 5];
        new.target_value = Some(20.0);
        new.unit = Some("pages".to_string());

        let id = HabitRepo::insert(&conn, &new).unwrap();
        let habit = HabitRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(habit.name, "Read");
        assert_eq!(habit.frequency, Frequency::Custom);
        assert_eq!(habit.target_days, vec![1, 3, 5]);
        assert_eq!(habit.target_value, Some(20.0));
        assert!(habit.is_active());

        // a fresh habit carries an empty materialized streak row
        let streak = StreakRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
        assert!(streak.last_completed_date.is_none());
    }

    #[test]
    fn toggle_writes_through_to_streak() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Stretch")).unwrap();

        for day in 1..=5 {
            let completed =
                LogRepo::toggle(&conn, id, date(&format!("2024-01-{:02}", day)), None, None)
                    .unwrap();
            assert!(completed);
        }

        let streak = StreakRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(streak.current, 5);
        assert_eq!(streak.longest, 5);
        assert_eq!(streak.last_completed_date, Some(date("2024-01-05")));
    }

    #[test]
    fn toggle_twice_is_an_undo() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Meditate")).unwrap();

        assert!(LogRepo::toggle(&conn, id, date("2024-01-01"), None, None).unwrap());
        assert!(!LogRepo::toggle(&conn, id, date("2024-01-01"), None, None).unwrap());

        // still exactly one row for (habit, date), now uncompleted
        let log = LogRepo::get(&conn, id, date("2024-01-01")).unwrap().unwrap();
        assert!(!log.completed);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM habit_logs WHERE habit_id = ?1", [id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);

        // the streak cache followed the undo
        let streak = StreakRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(streak.current, 0);
        assert!(streak.last_completed_date.is_none());
    }

    #[test]
    fn gap_in_history_keeps_longest_at_trailing_run() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Run")).unwrap();

        for d in ["2024-01-01", "2024-01-02", "2024-01-05"] {
            LogRepo::toggle(&conn, id, date(d), None, None).unwrap();
        }

        let streak = StreakRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
        assert_eq!(streak.last_completed_date, Some(date("2024-01-05")));
    }

    #[test]
    fn toggle_records_value_and_note() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Water")).unwrap();

        LogRepo::toggle(&conn, id, date("2024-01-01"), Some(8.0), Some("full bottle")).unwrap();
        let log = LogRepo::get(&conn, id, date("2024-01-01")).unwrap().unwrap();
        assert_eq!(log.value, Some(8.0));
        assert_eq!(log.notes.as_deref(), Some("full bottle"));

        // toggling without a value keeps the stored one
        LogRepo::toggle(&conn, id, date("2024-01-01"), None, None).unwrap();
        let log = LogRepo::get(&conn, id, date("2024-01-01")).unwrap().unwrap();
        assert_eq!(log.value, Some(8.0));
    }

    #[test]
    fn archive_hides_from_active_snapshot() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let keep = HabitRepo::insert(&conn, &daily_habit("Keep")).unwrap();
        let gone = HabitRepo::insert(&conn, &daily_habit("Gone")).unwrap();

        HabitRepo::archive(&conn, gone).unwrap();

        let snapshot = load_snapshot(&conn).unwrap();
        let active: Vec<i64> = snapshot.active_habits().iter().map(|h| h.id).collect();
        assert!(active.contains(&keep));
        assert!(!active.contains(&gone));
        assert_eq!(snapshot.archived_habits().len(), 1);

        HabitRepo::unarchive(&conn, gone).unwrap();
        let snapshot = load_snapshot(&conn).unwrap();
        assert_eq!(snapshot.active_habits().len(), 2);
    }

    #[test]
    fn goal_round_trip_and_validation() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Write")).unwrap();

        assert!(GoalRepo::insert(
            &conn,
            id,
            date("2024-02-10"),
            date("2024-02-01"),
            5,
            None
        )
        .is_err());

        let goal_id = GoalRepo::insert(
            &conn,
            id,
            date("2024-02-01"),
            date("2024-02-10"),
            8,
            Some("february push"),
        )
        .unwrap();

        let goals = GoalRepo::all(&conn).unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, goal_id);
        assert_eq!(goals[0].habit_id, id);
        assert_eq!(goals[0].target_days, 8);
        assert_eq!(goals[0].start_date, date("2024-02-01"));

        assert!(GoalRepo::delete(&conn, goal_id).unwrap());
        assert!(!GoalRepo::delete(&conn, goal_id).unwrap());
    }

    #[test]
    fn snapshot_reads_are_stable() {
        let dir = TempDir::new().unwrap();
        let conn = open_temp_db(&dir);
        let id = HabitRepo::insert(&conn, &daily_habit("Journal")).unwrap();
        LogRepo::toggle(&conn, id, date("2024-01-01"), None, None).unwrap();

        let snapshot = load_snapshot(&conn).unwrap();
        let first = snapshot.completion_rate_for_date(date("2024-01-01"));
        let second = snapshot.completion_rate_for_date(date("2024-01-01"));
        assert_eq!(first, second);
        assert!((first - 100.0).abs() < f64::EPSILON);

        // a held snapshot is unaffected by later writes
        LogRepo::toggle(&conn, id, date("2024-01-01"), None, None).unwrap();
        assert_eq!(snapshot.completion_rate_for_date(date("2024-01-01")), first);
    }
}
