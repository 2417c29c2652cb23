use chrono::NaiveDate;

use crate::models::{weekday_index, Frequency, Habit};

/// Whether a habit is due on the given calendar date.
///
/// Daily habits are due every day; weekly and custom habits are due on the
/// weekdays listed in `target_days` (Sunday = 0).
pub fn is_scheduled(habit: &Habit, date: NaiveDate) -> bool {
    match habit.frequency {
        Frequency::Daily => true,
        Frequency::Weekly | Frequency::Custom => {
            habit.target_days.contains(&weekday_index(date))
        }
    }
}
