pub mod completion;
pub mod goal;
pub mod schedule;
pub mod streak;

pub use completion::{completion_rate, completion_rate_for_date, daily_completion};
pub use goal::evaluate_goal;
pub use schedule::is_scheduled;
pub use streak::compute_streak;

use chrono::NaiveDate;

use crate::models::{DailyCompletion, GoalProgress, Habit, HabitGoal, HabitLog, Streak};

/// A consistent in-memory read of the store. Every calculator operates on a
/// snapshot rather than reading ambient state, so results are reproducible
/// for as long as the snapshot is held.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub habits: Vec<Habit>,
    pub logs: Vec<HabitLog>,
    pub streaks: Vec<Streak>,
    pub goals: Vec<HabitGoal>,
}

impl Snapshot {
    pub fn active_habits(&self) -> Vec<&Habit> {
        self.habits.iter().filter(|h| h.is_active()).collect()
    }

    pub fn archived_habits(&self) -> Vec<&Habit> {
        self.habits.iter().filter(|h| !h.is_active()).collect()
    }

    pub fn habit_by_id(&self, id: i64) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Active habits due on `date`.
    pub fn due_on(&self, date: NaiveDate) -> Vec<&Habit> {
        self.habits
            .iter()
            .filter(|h| h.is_active() && is_scheduled(h, date))
            .collect()
    }

    /// The materialized streak row, or an empty streak for habits that have
    /// never logged a completion.
    pub fn streak_for(&self, habit_id: i64) -> Streak {
        self.streaks
            .iter()
            .find(|s| s.habit_id == habit_id)
            .cloned()
            .unwrap_or_else(|| Streak::empty(habit_id))
    }

    pub fn is_completed_on(&self, habit_id: i64, date: NaiveDate) -> bool {
        self.logs
            .iter()
            .any(|l| l.habit_id == habit_id && l.date == date && l.completed)
    }

    pub fn completion_rate_for_date(&self, date: NaiveDate) -> f64 {
        completion_rate_for_date(date, &self.habits, &self.logs)
    }

    pub fn daily_completion(&self, date: NaiveDate) -> DailyCompletion {
        daily_completion(date, &self.habits, &self.logs)
    }

    /// Rolling completion rate for a habit; 0 when the habit is unknown.
    pub fn completion_rate(&self, habit_id: i64, window_days: i64, today: NaiveDate) -> f64 {
        match self.habit_by_id(habit_id) {
            Some(habit) => completion_rate(habit, &self.logs, window_days, today),
            None => 0.0,
        }
    }

    pub fn evaluate_goal(&self, goal: &HabitGoal, today: NaiveDate) -> GoalProgress {
        evaluate_goal(goal, &self.logs, today)
    }
}
