use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user-defined target window attached to one habit.
/// Progress is always derived from the log history, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitGoal {
    pub id: i64,
    pub habit_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub target_days: i64,
    pub notes: Option<String>,
    pub created_at: String,
}
