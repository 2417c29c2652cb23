use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unknown frequency '{0}' (use: daily, weekly, custom)")]
    Frequency(String),
    #[error("unknown weekday '{0}' (use: sun, mon, tue, wed, thu, fri, sat)")]
    Weekday(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Custom,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Custom => "custom",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Custom => "Custom",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Frequency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(ParseError::Frequency(s.to_string())),
        }
    }
}

/// Weekday index of a date, Sunday = 0 through Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Parse a comma-separated weekday list ("sun,wed,fri") into sorted indices.
pub fn parse_target_days(s: &str) -> Result<Vec<u8>, ParseError> {
    let mut days = Vec::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let idx = match part.to_lowercase().as_str() {
            "sun" | "sunday" => 0,
            "mon" | "monday" => 1,
            "tue" | "tuesday" => 2,
            "wed" | "wednesday" => 3,
            "thu" | "thursday" => 4,
            "fri" | "friday" => 5,
            "sat" | "saturday" => 6,
            _ => return Err(ParseError::Weekday(part.to_string())),
        };
        if !days.contains(&idx) {
            days.push(idx);
        }
    }
    days.sort_unstable();
    Ok(days)
}

pub const ALL_DAYS: [u8; 7] = [0, 1, 2, 3, 4, 5, 6];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    pub frequency: Frequency,
    /// Weekday indices this habit is due on (Sunday = 0).
    /// Authoritative for weekly/custom; conventionally all seven for daily.
    pub target_days: Vec<u8>,
    pub target_value: Option<f64>,
    pub unit: Option<String>,
    pub created_at: String,
    pub archived_at: Option<String>,
}

impl Habit {
    pub fn is_active(&self) -> bool {
        self.archived_at.is_none()
    }

    /// Human-readable schedule, e.g. "every day" or "Sun, Wed, Fri".
    pub fn schedule_summary(&self) -> String {
        if self.frequency == Frequency::Daily || self.target_days.len() == 7 {
            return "every day".to_string();
        }
        if self.target_days.is_empty() {
            return "never".to_string();
        }
        const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        self.target_days
            .iter()
            .filter(|d| **d < 7)
            .map(|d| NAMES[*d as usize])
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_round_trip() {
        for freq in [Frequency::Daily, Frequency::Weekly, Frequency::Custom] {
            assert_eq!(Frequency::from_str(freq.as_str()).unwrap(), freq);
        }
        assert!(Frequency::from_str("fortnightly").is_err());
    }

    #[test]
    fn target_days_parsing() {
        assert_eq!(parse_target_days("sun,wed,fri").unwrap(), vec![0, 3, 5]);
        assert_eq!(parse_target_days("Friday, Monday").unwrap(), vec![1, 5]);
        // duplicates collapse
        assert_eq!(parse_target_days("mon,mon").unwrap(), vec![1]);
        assert!(parse_target_days("mon,noday").is_err());
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        // 2024-01-07 was a Sunday
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday.succ_opt().unwrap()), 1);
    }
}
