use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completion record per (habit, calendar date).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: i64,
    pub habit_id: i64,
    pub date: NaiveDate,
    pub completed: bool,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
}
