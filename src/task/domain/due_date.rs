//! Due date parsing.
//!
//! Browsers submit due dates either as full RFC 3339 timestamps or as the
//! bare values produced by `<input type="date">` and
//! `<input type="datetime-local">`. Bare values carry no offset and are read
//! as UTC.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Instant by which a task should be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(DateTime<Utc>);

impl DueDate {
    /// Parses a due date from client input.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueDate`] when the input matches none
    /// of the accepted formats or names an impossible calendar date.
    pub fn parse(raw: &str) -> Result<Self, TaskDomainError> {
        let value = raw.trim();

        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(instant.with_timezone(&Utc)));
        }

        if let Some(naive) = LOCAL_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        {
            return Ok(Self(naive.and_utc()));
        }

        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|midnight| Self(midnight.and_utc()))
            .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))
    }

    /// Wraps an instant read back from storage.
    #[must_use]
    pub const fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// Returns the due instant.
    #[must_use]
    pub const fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
