use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cadence", version, about = "A terminal companion for building daily habits")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Longer description
        #[arg(long)]
        description: Option<String>,
        /// Hex display color (e.g. #0D9488); defaults to the config palette
        #[arg(long)]
        color: Option<String>,
        /// Icon preset name (e.g. reading, water)
        #[arg(long)]
        icon: Option<String>,
        /// Frequency: daily, weekly or custom
        #[arg(long, default_value = "daily")]
        frequency: String,
        /// Weekdays for weekly/custom habits, e.g. "mon,wed,fri"
        #[arg(long)]
        days: Option<String>,
        /// Numeric daily target (e.g. 8 for glasses of water)
        #[arg(long)]
        target: Option<f64>,
        /// Unit for the target value (e.g. glasses, pages)
        #[arg(long)]
        unit: Option<String>,
    },
    /// List habits with schedules and streaks
    List {
        /// Show archived habits instead of active ones
        #[arg(long)]
        archived: bool,
    },
    /// Toggle completion of a habit for a date (today by default)
    Done {
        /// Habit name (or unambiguous prefix)
        habit: String,
        /// Date to log, YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// Value achieved (for habits with a numeric target)
        #[arg(long)]
        value: Option<f64>,
        /// Note to attach to the log
        #[arg(long)]
        note: Option<String>,
    },
    /// Edit fields of an existing habit
    Edit {
        /// Habit name (or unambiguous prefix)
        habit: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        /// Frequency: daily, weekly or custom
        #[arg(long)]
        frequency: Option<String>,
        /// Weekdays for weekly/custom habits, e.g. "mon,wed,fri"
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        target: Option<f64>,
        #[arg(long)]
        unit: Option<String>,
    },
    /// Archive a habit (kept in history, hidden from daily views)
    Archive {
        /// Habit name (or unambiguous prefix)
        habit: String,
    },
    /// Bring an archived habit back
    Unarchive {
        /// Habit name (or unambiguous prefix)
        habit: String,
    },
    /// Show habits due today and today's completion rate
    Today,
    /// Show overall statistics
    Stats {
        /// Show an ASCII strip for the last 7 days
        #[arg(long)]
        week: bool,
    },
    /// Show a month calendar colored by completion rate
    Calendar {
        /// Month to show, YYYY-MM (current month by default)
        #[arg(long)]
        month: Option<String>,
    },
    /// Goal windows: planned stretches of consistent completion
    Goal {
        #[command(subcommand)]
        action: GoalCommands,
    },
    /// Per-habit completion report over a rolling window
    Report {
        /// Window size in days (config default when omitted)
        #[arg(long)]
        days: Option<i64>,
    },
    /// Export a weekly text summary to stdout
    Export,
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Attach a goal window to a habit
    Add {
        /// Habit name (or unambiguous prefix)
        habit: String,
        /// Window start, YYYY-MM-DD
        #[arg(long)]
        start: String,
        /// Window end, YYYY-MM-DD
        #[arg(long)]
        end: String,
        /// Days of completion aimed for inside the window
        #[arg(long)]
        target: i64,
        /// Motivation or notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// List goals with derived progress
    List,
    /// Delete a goal by id
    Delete {
        /// Goal id as shown by `goal list`
        id: i64,
    },
}
