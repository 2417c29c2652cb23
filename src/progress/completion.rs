use chrono::{Duration, NaiveDate};

use crate::models::{DailyCompletion, Habit, HabitLog};
use crate::progress::schedule::is_scheduled;

fn has_completed_log(logs: &[HabitLog], habit_id: i64, date: NaiveDate) -> bool {
    logs.iter()
        .any(|l| l.habit_id == habit_id && l.date == date && l.completed)
}

/// Scheduled-vs-completed counts across all active habits for one date.
pub fn daily_completion(date: NaiveDate, habits: &[Habit], logs: &[HabitLog]) -> DailyCompletion {
    let mut scheduled = 0u32;
    let mut completed = 0u32;
    for habit in habits.iter().filter(|h| h.is_active()) {
        if !is_scheduled(habit, date) {
            continue;
        }
        scheduled += 1;
        if has_completed_log(logs, habit.id, date) {
            completed += 1;
        }
    }
    DailyCompletion {
        date,
        scheduled,
        completed,
    }
}

/// Percentage of active habits scheduled on `date` that have a completed log.
/// 0 when nothing is scheduled.
pub fn completion_rate_for_date(date: NaiveDate, habits: &[Habit], logs: &[HabitLog]) -> f64 {
    daily_completion(date, habits, logs).rate()
}

/// Rolling completion rate for one habit over the inclusive window
/// `[today - window_days, today]`, counting only dates the habit was
/// scheduled on. 0 when no date in the window is scheduled.
pub fn completion_rate(
    habit: &Habit,
    logs: &[HabitLog],
    window_days: i64,
    today: NaiveDate,
) -> f64 {
    let start = today - Duration::days(window_days);

    let mut scheduled = 0u32;
    let mut completed = 0u32;
    for date in start.iter_days().take_while(|d| *d <= today) {
        if !is_scheduled(habit, date) {
            continue;
        }
        scheduled += 1;
        if has_completed_log(logs, habit.id, date) {
            completed += 1;
        }
    }

    if scheduled == 0 {
        0.0
    } else {
        completed as f64 / scheduled as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, ALL_DAYS};

    fn habit(id: i64, frequency: Frequency, target_days: Vec<u8>) -> Habit {
        Habit {
            id,
            name: format!("habit-{}", id),
            description: None,
            color: "#0D9488".to_string(),
            icon: None,
            frequency,
            target_days,
            target_value: None,
            unit: None,
            created_at: String::new(),
            archived_at: None,
        }
    }

    fn completed_log(habit_id: i64, date: NaiveDate) -> HabitLog {
        HabitLog {
            id: 0,
            habit_id,
            date,
            completed: true,
            value: None,
            notes: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn no_scheduled_habits_is_zero() {
        let saturday = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        // only due on Sundays
        let habits = vec![habit(1, Frequency::Weekly, vec![0])];
        assert_eq!(completion_rate_for_date(saturday, &habits, &[]), 0.0);
    }

    #[test]
    fn one_of_four_scheduled_completed_is_25() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let habits: Vec<Habit> = (1..=4)
            .map(|id| habit(id, Frequency::Daily, ALL_DAYS.to_vec()))
            .collect();
        let logs = vec![completed_log(2, date)];
        let rate = completion_rate_for_date(date, &habits, &logs);
        assert!((rate - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn archived_habits_are_excluded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let mut archived = habit(1, Frequency::Daily, ALL_DAYS.to_vec());
        archived.archived_at = Some("2024-01-01T00:00:00Z".to_string());
        let active = habit(2, Frequency::Daily, ALL_DAYS.to_vec());
        let logs = vec![completed_log(2, date)];
        let rate = completion_rate_for_date(date, &[archived, active], &logs);
        assert!((rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rolling_rate_counts_only_scheduled_dates() {
        // Scheduled five days a week (Mon-Fri), completed on every scheduled
        // day in the window: the weekend days must not dilute the rate.
        let h = habit(1, Frequency::Custom, vec![1, 2, 3, 4, 5]);
        let today = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(); // Friday
        let start = today - Duration::days(7);
        let logs: Vec<HabitLog> = start
            .iter_days()
            .take_while(|d| *d <= today)
            .filter(|d| is_scheduled(&h, *d))
            .map(|d| completed_log(1, d))
            .collect();
        let rate = completion_rate(&h, &logs, 7, today);
        assert!((rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rolling_rate_window_is_inclusive() {
        // window_days = 0 still evaluates today itself
        let h = habit(1, Frequency::Daily, ALL_DAYS.to_vec());
        let today = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        let logs = vec![completed_log(1, today)];
        let rate = completion_rate(&h, &logs, 0, today);
        assert!((rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn never_scheduled_window_is_zero() {
        let h = habit(1, Frequency::Custom, vec![]);
        let today = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        assert_eq!(completion_rate(&h, &[], 30, today), 0.0);
    }
}
