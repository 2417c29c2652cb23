use chrono::NaiveDate;

use crate::models::{HabitLog, Streak};

/// Compute current and longest streaks for one habit from its log history.
///
/// `current` is the run of consecutive completed days ending at the most
/// recent completed date. `longest` only tracks that same trailing run — the
/// scan stops at the first gap, so earlier history is never rescanned for a
/// longer run. Dates compare as whole days; gaps are any difference other
/// than exactly one day.
pub fn compute_streak(habit_id: i64, logs: &[HabitLog]) -> Streak {
    let mut dates: Vec<NaiveDate> = logs
        .iter()
        .filter(|l| l.habit_id == habit_id && l.completed)
        .map(|l| l.date)
        .collect();
    dates.sort_unstable();
    dates.dedup();

    let Some(&last) = dates.last() else {
        return Streak::empty(habit_id);
    };

    let mut current = 1u32;
    let mut longest = 1u32;

    for pair in dates.windows(2).rev() {
        let gap = (pair[1] - pair[0]).num_days();
        if gap == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            break;
        }
    }

    Streak {
        habit_id,
        current,
        longest,
        last_completed_date: Some(last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log(habit_id: i64, date: &str, completed: bool) -> HabitLog {
        HabitLog {
            id: 0,
            habit_id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            completed,
            value: None,
            notes: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn empty_history_yields_zeros() {
        let streak = compute_streak(1, &[]);
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
        assert!(streak.last_completed_date.is_none());
    }

    #[test]
    fn five_consecutive_days() {
        let logs: Vec<HabitLog> = (1..=5)
            .map(|d| log(1, &format!("2024-01-{:02}", d), true))
            .collect();
        let streak = compute_streak(1, &logs);
        assert_eq!(streak.current, 5);
        assert_eq!(streak.longest, 5);
        assert_eq!(
            streak.last_completed_date,
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
    }

    #[test]
    fn gap_before_latest_resets_current() {
        let logs = vec![
            log(1, "2024-01-01", true),
            log(1, "2024-01-02", true),
            log(1, "2024-01-05", true),
        ];
        let streak = compute_streak(1, &logs);
        assert_eq!(streak.current, 1);
        // the scan stops at the gap: the earlier two-day run never counts
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn single_completed_log() {
        let streak = compute_streak(1, &[log(1, "2024-03-10", true)]);
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn ignores_other_habits_and_incomplete_logs() {
        let logs = vec![
            log(1, "2024-01-01", true),
            log(1, "2024-01-02", false),
            log(2, "2024-01-02", true),
        ];
        let streak = compute_streak(1, &logs);
        assert_eq!(streak.current, 1);
        assert_eq!(
            streak.last_completed_date,
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn unsorted_input_is_sorted_first() {
        let logs = vec![
            log(1, "2024-01-03", true),
            log(1, "2024-01-01", true),
            log(1, "2024-01-02", true),
        ];
        let streak = compute_streak(1, &logs);
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }
}
