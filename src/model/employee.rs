use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

/// Set of contract weekdays, persisted as a comma-separated list of short
/// day codes (`Mon,Tue,...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkDays(Vec<Weekday>);

impl WorkDays {
    pub fn new(days: Vec<Weekday>) -> Self {
        Self(days)
    }

    /// Parses a stored day list. Unrecognized tokens are dropped with a
    /// warning rather than failing the whole row.
    pub fn parse(raw: &str) -> Self {
        let mut days = Vec::new();
        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<Weekday>() {
                Ok(day) => {
                    if !days.contains(&day) {
                        days.push(day);
                    }
                }
                Err(_) => warn!(token, "unrecognized weekday code in work_days"),
            }
        }
        Self(days)
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0.contains(&day)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for WorkDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{}", codes.join(","))
    }
}

/// Daily scheduled start/end time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// The slice of an employee the attendance lifecycle reads.
#[derive(Debug, Clone)]
pub struct EmployeeContract {
    pub username: String,
    pub days: WorkDays,
    /// Absent when the employee has no scheduled hours on file.
    pub window: Option<ContractWindow>,
}

/// Full employee row as stored, used by the administrative endpoints.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Alice Kim")]
    pub name: String,

    #[schema(example = "alice01")]
    pub username: String,

    #[schema(example = 11000.0, nullable = true)]
    pub wage: Option<f64>,

    #[schema(example = "Gangnam", nullable = true)]
    pub location: Option<String>,

    #[schema(example = "Mon,Tue,Wed", nullable = true)]
    pub work_days: Option<String>,

    #[schema(example = "09:00:00", value_type = String, format = "time", nullable = true)]
    pub work_start: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = String, format = "time", nullable = true)]
    pub work_end: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_day_codes() {
        let days = WorkDays::parse("Mon,Wed,Fri");
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Wed));
        assert!(days.contains(Weekday::Fri));
        assert!(!days.contains(Weekday::Sun));
    }

    #[test]
    fn parsing_is_lenient_about_case_whitespace_and_junk() {
        let days = WorkDays::parse(" mon , TUESDAY, nope,, Sat ");
        assert!(days.contains(Weekday::Mon));
        assert!(days.contains(Weekday::Tue));
        assert!(days.contains(Weekday::Sat));
        assert_eq!(days.iter().count(), 3);
    }

    #[test]
    fn duplicate_tokens_collapse() {
        let days = WorkDays::parse("Mon,Mon,Mon");
        assert_eq!(days.iter().count(), 1);
    }

    #[test]
    fn displays_back_as_short_codes() {
        let days = WorkDays::new(vec![Weekday::Mon, Weekday::Sun]);
        assert_eq!(days.to_string(), "Mon,Sun");
        assert_eq!(WorkDays::parse(&days.to_string()), days);
    }

    #[test]
    fn empty_input_means_no_contract_days() {
        assert!(WorkDays::parse("").is_empty());
    }
}
