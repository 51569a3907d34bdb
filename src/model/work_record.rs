use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of reconciliation codes persisted on a closed record.
///
/// The legacy schema overloaded a free-text `memo` column with these codes;
/// here they are a real enumeration and free text lives in `note`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Annotation {
    OnTime,
    OnTimeOverage,
    Late,
    LateOverage,
    EarlyGrace,
    EarlyDeparture,
    Absent,
    MissedClockout,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkRecord {
    pub id: u64,
    pub username: String,

    #[schema(example = "2026-03-02T00:00:00Z", value_type = String, format = "date-time")]
    pub clock_in: DateTime<Utc>,

    #[schema(example = "2026-03-02T08:10:00Z", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<DateTime<Utc>>,

    /// Billable hours, always a non-negative multiple of 0.5. Zero while open.
    #[schema(example = 8.0)]
    pub total_hours: f64,

    pub annotation: Option<Annotation>,

    /// Free-text administrative note, never written by the system.
    pub note: Option<String>,
}

impl WorkRecord {
    /// An open shift: clocked in, not yet clocked out, not yet annotated.
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none() && self.annotation.is_none()
    }
}

/// Insert shape for a record the storage layer has not assigned an id yet.
#[derive(Debug, Clone)]
pub struct NewWorkRecord {
    pub username: String,
    pub clock_in: DateTime<Utc>,
    pub clock_out: Option<DateTime<Utc>>,
    pub total_hours: f64,
    pub annotation: Option<Annotation>,
    pub note: Option<String>,
}

impl NewWorkRecord {
    pub fn open(username: &str, clock_in: DateTime<Utc>) -> Self {
        Self {
            username: username.to_owned(),
            clock_in,
            clock_out: None,
            total_hours: 0.0,
            annotation: None,
            note: None,
        }
    }

    /// Synthetic placeholder for a contractual day with no clock-in.
    pub fn absent(username: &str, local_midnight: DateTime<Utc>) -> Self {
        Self {
            username: username.to_owned(),
            clock_in: local_midnight,
            clock_out: None,
            total_hours: 0.0,
            annotation: Some(Annotation::Absent),
            note: None,
        }
    }

    pub fn with_id(self, id: u64) -> WorkRecord {
        WorkRecord {
            id,
            username: self.username,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            total_hours: self.total_hours,
            annotation: self.annotation,
            note: self.note,
        }
    }
}
