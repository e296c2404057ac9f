// libs/scheduling-cell/src/models.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::error::AppError;

/// Wire format for appointment timestamps, minute resolution.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub title: String,
    #[serde(with = "time_format")]
    pub start: NaiveDateTime,
    #[serde(with = "time_format")]
    pub end: NaiveDateTime,
    pub category: Category,
}

/// Validated fields for a create or full-replace update. Produced by the
/// handler layer after field-set, timestamp and category validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub category: Category,
}

/// Signed day offsets for a shift, as parsed from the request.
///
/// `None` means the raw value did not parse to a finite number; the store
/// still needs to see the request so a missing id wins over a bad offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShiftOffsets {
    pub start_days: Option<f64>,
    pub end_days: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    General,
    Work,
    Social,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Health,
        Category::General,
        Category::Work,
        Category::Social,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::General => "general",
            Category::Work => "work",
            Category::Social => "social",
        }
    }

    fn allowed_values_message() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(Category::as_str).collect();
        format!("Invalid category. Must be one of [{}]", names.join(", "))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ScheduleError::InvalidCategory(Self::allowed_values_message()))
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    #[error("{0}")]
    NotFound(String),

    #[error("Overlapping appointment")]
    Conflict,

    #[error("{0}")]
    InvalidCategory(String),

    #[error("Shift would result in start after end")]
    InvalidRange,

    #[error("{0}")]
    InvalidInput(String),
}

impl ScheduleError {
    pub fn appointment_not_found() -> Self {
        ScheduleError::NotFound("Appointment not found".to_string())
    }

    pub fn no_appointments_for_category() -> Self {
        ScheduleError::NotFound("No appointments found for this category".to_string())
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        let message = err.to_string();
        match err {
            ScheduleError::NotFound(_) => AppError::NotFound(message),
            ScheduleError::Conflict => AppError::Conflict(message),
            ScheduleError::InvalidCategory(_)
            | ScheduleError::InvalidRange
            | ScheduleError::InvalidInput(_) => AppError::BadRequest(message),
        }
    }
}

// ==============================================================================
// TIMESTAMP SERIALIZATION
// ==============================================================================

/// Serde adapter rendering `NaiveDateTime` in the fixed `YYYY-MM-DD HH:MM`
/// wire format.
pub mod time_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(TIME_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
