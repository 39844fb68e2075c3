//! The Authority's compact 14-digit `YYYYMMDDHHMMSS` timestamp.
//!
//! Parsed by fixed-width digit slices (4-2-2-2-2-2), never through a generic
//! date parser — locale-aware parsing of this token has historically
//! misread it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::error::FiscalError;

/// A validated compact timestamp with its original token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactTimestamp {
    datetime: NaiveDateTime,
    token: String,
}

impl CompactTimestamp {
    /// Parse a 14-digit `YYYYMMDDHHMMSS` token.
    pub fn parse(token: &str) -> Result<Self, FiscalError> {
        if token.len() != 14 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FiscalError::Validation(format!(
                "timestamp token must be exactly 14 digits, got '{token}'"
            )));
        }

        // Fixed-width slices: 4-2-2-2-2-2. All-digit input, so the numeric
        // parses cannot fail; calendar validity still can.
        let year: i32 = token[0..4].parse().unwrap_or_default();
        let month: u32 = token[4..6].parse().unwrap_or_default();
        let day: u32 = token[6..8].parse().unwrap_or_default();
        let hour: u32 = token[8..10].parse().unwrap_or_default();
        let minute: u32 = token[10..12].parse().unwrap_or_default();
        let second: u32 = token[12..14].parse().unwrap_or_default();

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            FiscalError::Validation(format!("timestamp '{token}' has no valid calendar date"))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            FiscalError::Validation(format!("timestamp '{token}' has no valid time of day"))
        })?;

        Ok(Self {
            datetime: date.and_time(time),
            token: token.to_string(),
        })
    }

    /// Format a datetime back into the 14-digit token.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        let token = format!(
            "{:04}{:02}{:02}{:02}{:02}{:02}",
            datetime.year(),
            datetime.month(),
            datetime.day(),
            datetime.hour(),
            datetime.minute(),
            datetime.second()
        );
        Self { datetime, token }
    }

    /// The original 14-digit token.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.datetime
    }

    /// Display date, `DD/MM/YYYY`.
    pub fn display_date(&self) -> String {
        format!(
            "{:02}/{:02}/{:04}",
            self.datetime.day(),
            self.datetime.month(),
            self.datetime.year()
        )
    }

    /// Display time, `HH:MM:SS`.
    pub fn display_time(&self) -> String {
        format!(
            "{:02}:{:02}:{:02}",
            self.datetime.hour(),
            self.datetime.minute(),
            self.datetime.second()
        )
    }
}
