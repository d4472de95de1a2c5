//! Export date parsing and normalization
//!
//! Dates are accepted as `YYYY-M-D` or `YYYY-MM-DD`, optionally followed by a
//! `Thh:mm:ssZ` time. They are normalized to `YYYY-MM-DDThh:mm:ssZ`. A missing
//! time defaults to the start or the end of the day depending on which side of
//! the range the date bounds, so a bare end date covers that whole day.

use super::errors::UsageExportError;
use super::result::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// Formats listed in validation errors
pub const ACCEPTED_FORMATS: &str = "YYYY-M-D, YYYY-MM-DD, YYYY-M-DThh:mm:ssZ or YYYY-MM-DDThh:mm:ssZ";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:T([0-9]{2}):([0-9]{2}):([0-9]{2})Z)?$")
            .unwrap()
    })
}

/// Which end of the export range a date bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// Range start, defaults to `T00:00:00Z`
    Start,
    /// Range end, defaults to `T23:59:59Z`
    End,
}

impl DateBound {
    /// Field name used in error messages
    pub fn field_name(self) -> &'static str {
        match self {
            DateBound::Start => "start",
            DateBound::End => "end",
        }
    }

    fn default_time(self) -> NaiveTime {
        match self {
            DateBound::Start => NaiveTime::MIN,
            DateBound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// A validated, normalized export range boundary
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExportDate {
    timestamp: DateTime<Utc>,
}

impl ExportDate {
    /// Parses and normalizes a user-supplied date
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the field when the input does not
    /// match an accepted format, or is not a real date or time of day.
    ///
    /// # Examples
    ///
    /// ```
    /// use usage_export::domain::dates::{DateBound, ExportDate};
    ///
    /// let start = ExportDate::parse("2024-1-5", DateBound::Start).unwrap();
    /// assert_eq!(start.to_string(), "2024-01-05T00:00:00Z");
    ///
    /// let end = ExportDate::parse("2024-01-31", DateBound::End).unwrap();
    /// assert_eq!(end.to_string(), "2024-01-31T23:59:59Z");
    /// ```
    pub fn parse(raw: &str, bound: DateBound) -> Result<Self> {
        let field = bound.field_name();
        let raw = raw.trim();

        let captures = date_pattern().captures(raw).ok_or_else(|| {
            UsageExportError::Validation(format!(
                "Invalid {field} date '{raw}'. Accepted formats: {ACCEPTED_FORMATS}"
            ))
        })?;

        let number = |index: usize| -> Result<u32> {
            captures
                .get(index)
                .and_then(|m| m.as_str().parse().ok())
                .ok_or_else(|| {
                    UsageExportError::Validation(format!(
                        "Invalid {field} date '{raw}'. Accepted formats: {ACCEPTED_FORMATS}"
                    ))
                })
        };

        let (year, month, day) = (number(1)?, number(2)?, number(3)?);
        let date = NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| {
            UsageExportError::Validation(format!(
                "Invalid {field} date '{raw}': not a calendar date"
            ))
        })?;

        let time = if captures.get(4).is_some() {
            let (hour, minute, second) = (number(4)?, number(5)?, number(6)?);
            NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
                UsageExportError::Validation(format!(
                    "Invalid {field} date '{raw}': not a valid time of day"
                ))
            })?
        } else {
            bound.default_time()
        };

        Ok(Self {
            timestamp: NaiveDateTime::new(date, time).and_utc(),
        })
    }

    /// The `YYYY-MM-DD` part, used in report file names
    pub fn date_part(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for ExportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"))
    }
}

impl Serialize for ExportDate {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
