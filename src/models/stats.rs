use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Materialized per-habit streak summary. A cache of a pure function of the
/// log history — recomputed whenever a log for the habit changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Streak {
    pub habit_id: i64,
    pub current: u32,
    pub longest: u32,
    pub last_completed_date: Option<NaiveDate>,
}

impl Streak {
    pub fn empty(habit_id: i64) -> Self {
        Self {
            habit_id,
            current: 0,
            longest: 0,
            last_completed_date: None,
        }
    }
}

/// Scheduled-vs-completed counts for one calendar day across all habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub scheduled: u32,
    pub completed: u32,
}

impl DailyCompletion {
    /// Completion percentage in [0, 100]; 0 when nothing was scheduled.
    pub fn rate(&self) -> f64 {
        if self.scheduled == 0 {
            0.0
        } else {
            self.completed as f64 / self.scheduled as f64 * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effectiveness {
    HighlyEffective,
    ModeratelyEffective,
    NeedsImprovement,
}

impl Effectiveness {
    pub fn label(&self) -> &'static str {
        match self {
            Effectiveness::HighlyEffective => "highly effective",
            Effectiveness::ModeratelyEffective => "moderately effective",
            Effectiveness::NeedsImprovement => "needs improvement",
        }
    }
}

/// Derived progress of a goal window at some evaluation date.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgress {
    pub completed_days: i64,
    pub total_days: i64,
    pub days_passed: i64,
    pub progress: f64,
    pub is_effective: bool,
}

impl GoalProgress {
    pub fn effectiveness(&self) -> Effectiveness {
        if self.progress >= 80.0 {
            Effectiveness::HighlyEffective
        } else if self.progress >= 50.0 {
            Effectiveness::ModeratelyEffective
        } else {
            Effectiveness::NeedsImprovement
        }
    }
}
