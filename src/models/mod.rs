pub mod goal;
pub mod habit;
pub mod log;
pub mod stats;

pub use goal::HabitGoal;
pub use habit::{parse_target_days, weekday_index, Frequency, Habit, ParseError, ALL_DAYS};
pub use log::HabitLog;
pub use stats::{DailyCompletion, Effectiveness, GoalProgress, Streak};
