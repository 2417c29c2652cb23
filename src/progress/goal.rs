use chrono::{Duration, NaiveDate};

use crate::models::{GoalProgress, HabitGoal, HabitLog};

/// Evaluate a goal window against the log history as of `today`.
///
/// Every elapsed calendar day in the window counts toward the denominator,
/// whether or not the habit was scheduled on it — unlike the rolling
/// completion rate, which filters to scheduled dates.
pub fn evaluate_goal(goal: &HabitGoal, logs: &[HabitLog], today: NaiveDate) -> GoalProgress {
    let total_days = (goal.end_date - goal.start_date).num_days() + 1;
    let days_passed = ((today - goal.start_date).num_days() + 1).clamp(0, total_days.max(0));

    let mut completed_days = 0i64;
    for offset in 0..days_passed {
        let day = goal.start_date + Duration::days(offset);
        if logs
            .iter()
            .any(|l| l.habit_id == goal.habit_id && l.date == day && l.completed)
        {
            completed_days += 1;
        }
    }

    let progress = if total_days > 0 {
        completed_days as f64 / total_days as f64 * 100.0
    } else {
        0.0
    };

    GoalProgress {
        completed_days,
        total_days,
        days_passed,
        progress,
        is_effective: progress >= 80.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Effectiveness;

    fn goal(start: &str, end: &str) -> HabitGoal {
        HabitGoal {
            id: 1,
            habit_id: 1,
            start_date: NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            end_date: NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
            target_days: 10,
            notes: None,
            created_at: String::new(),
        }
    }

    fn completed_log(date: &str) -> HabitLog {
        HabitLog {
            id: 0,
            habit_id: 1,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            completed: true,
            value: None,
            notes: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn ten_day_goal_four_elapsed_three_completed() {
        let g = goal("2024-01-01", "2024-01-10");
        let logs = vec![
            completed_log("2024-01-01"),
            completed_log("2024-01-02"),
            completed_log("2024-01-04"),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let progress = evaluate_goal(&g, &logs, today);
        assert_eq!(progress.total_days, 10);
        assert_eq!(progress.days_passed, 4);
        assert_eq!(progress.completed_days, 3);
        assert!((progress.progress - 30.0).abs() < f64::EPSILON);
        assert!(!progress.is_effective);
        assert_eq!(progress.effectiveness(), Effectiveness::NeedsImprovement);
    }

    #[test]
    fn finished_goal_reports_full_elapsed_days() {
        let g = goal("2024-01-01", "2024-01-10");
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let progress = evaluate_goal(&g, &[], today);
        assert_eq!(progress.days_passed, 10);
    }

    #[test]
    fn goal_starting_in_the_future_reports_zero_elapsed() {
        let g = goal("2024-06-01", "2024-06-10");
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let progress = evaluate_goal(&g, &[], today);
        assert_eq!(progress.days_passed, 0);
        assert_eq!(progress.completed_days, 0);
        assert_eq!(progress.progress, 0.0);
    }

    #[test]
    fn inverted_window_is_zero_progress() {
        let g = goal("2024-01-10", "2024-01-01");
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let progress = evaluate_goal(&g, &[], today);
        assert!(progress.total_days <= 0);
        assert_eq!(progress.days_passed, 0);
        assert_eq!(progress.progress, 0.0);
    }

    #[test]
    fn effectiveness_bands() {
        let g = goal("2024-01-01", "2024-01-10");
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();

        let logs: Vec<HabitLog> = (1..=9)
            .map(|d| completed_log(&format!("2024-01-{:02}", d)))
            .collect();
        let progress = evaluate_goal(&g, &logs, today);
        assert!(progress.is_effective);
        assert_eq!(progress.effectiveness(), Effectiveness::HighlyEffective);

        let logs: Vec<HabitLog> = (1..=5)
            .map(|d| completed_log(&format!("2024-01-{:02}", d)))
            .collect();
        let progress = evaluate_goal(&g, &logs, today);
        assert!(!progress.is_effective);
        assert_eq!(progress.effectiveness(), Effectiveness::ModeratelyEffective);
    }

    #[test]
    fn unscheduled_days_still_count_toward_elapsed() {
        // The evaluator looks at every calendar day in the window even if the
        // habit's schedule would skip it; only the presence of a completed
        // log matters.
        let g = goal("2024-01-01", "2024-01-05");
        let logs = vec![completed_log("2024-01-01")];
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let progress = evaluate_goal(&g, &logs, today);
        assert_eq!(progress.days_passed, 5);
        assert_eq!(progress.completed_days, 1);
        assert!((progress.progress - 20.0).abs() < f64::EPSILON);
    }
}
