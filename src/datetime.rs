//! Fixed-width date-time codec.
//!
//! Event times are stored as `YYYY-MM-DDThh:mm:00`. Seconds are always zero
//! since the store has minute resolution. Decoding slices the token at fixed
//! offsets, so only the canonical 19-character form is accepted.

use crate::error::{Result, StoreError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of an encoded token.
pub const TOKEN_LEN: usize = 19;

/// Largest year that still fits the four-digit year field.
pub const MAX_YEAR: u32 = 9999;

/// Half of the day a time falls in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Convention {
    Am,
    Pm,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::Am => f.write_str("AM"),
            Convention::Pm => f.write_str("PM"),
        }
    }
}

/// Calendar date and time-of-day with minute resolution, no timezone.
///
/// Serializes as its encoded token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventDateTime {
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
}

fn check_range(field: &'static str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(StoreError::DateTimeRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

impl EventDateTime {
    /// Build a date-time, rejecting the first out-of-range field and
    /// dates that do not exist on the calendar.
    pub fn new(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> Result<Self> {
        check_range("year", year, 0, MAX_YEAR)?;
        check_range("month", month, 1, 12)?;
        check_range("day", day, 1, 31)?;
        check_range("hour", hour, 0, 23)?;
        check_range("minute", minute, 0, 59)?;

        if NaiveDate::from_ymd_opt(year as i32, month, day).is_none() {
            return Err(StoreError::InvalidDate { year, month, day });
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
        })
    }

    /// Build a date-time from a 12-hour display value.
    ///
    /// `display_hour` is in `[0, 11]`; `Pm` adds twelve.
    pub fn from_display(
        year: u32,
        month: u32,
        day: u32,
        display_hour: u32,
        minute: u32,
        convention: Convention,
    ) -> Result<Self> {
        check_range("display hour", display_hour, 0, 11)?;
        let hour = match convention {
            Convention::Am => display_hour,
            Convention::Pm => display_hour + 12,
        };
        Self::new(year, month, day, hour, minute)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Hour of day in `[0, 23]`.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn convention(&self) -> Convention {
        if self.hour < 12 {
            Convention::Am
        } else {
            Convention::Pm
        }
    }

    /// Hour shown next to the convention. Midnight renders as 0 AM and
    /// noon as 0 PM.
    pub fn display_hour(&self) -> u32 {
        if self.hour < 12 {
            self.hour
        } else {
            self.hour - 12
        }
    }

    /// Encode as `YYYY-MM-DDThh:mm:00`.
    pub fn encode(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:00",
            self.year, self.month, self.day, self.hour, self.minute
        )
    }

    /// Decode a token produced by [`encode`](Self::encode).
    pub fn decode(token: &str) -> Result<Self> {
        let malformed = || StoreError::MalformedDateTime(token.to_string());

        let bytes = token.as_bytes();
        if bytes.len() != TOKEN_LEN
            || !token.is_ascii()
            || bytes[4] != b'-'
            || bytes[7] != b'-'
            || bytes[10] != b'T'
            || bytes[13] != b':'
            || bytes[16] != b':'
        {
            return Err(malformed());
        }

        let field = |start: usize, end: usize| -> Result<u32> {
            let digits = &token[start..end];
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            digits.parse().map_err(|_| malformed())
        };

        let year = field(0, 4)?;
        let month = field(5, 7)?;
        let day = field(8, 10)?;
        let hour = field(11, 13)?;
        let minute = field(14, 16)?;
        if field(17, 19)? != 0 {
            return Err(malformed());
        }

        Self::new(year, month, day, hour, minute)
    }

    pub fn to_naive(&self) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(self.year as i32, self.month, self.day)
            .and_then(|date| date.and_hms_opt(self.hour, self.minute, 0))
            .unwrap_or_default()
    }
}

impl TryFrom<NaiveDateTime> for EventDateTime {
    type Error = StoreError;

    /// Truncates seconds.
    fn try_from(value: NaiveDateTime) -> Result<Self> {
        let year =
            u32::try_from(value.year()).map_err(|_| StoreError::NegativeYear(value.year()))?;
        Self::new(year, value.month(), value.day(), value.hour(), value.minute())
    }
}

impl TryFrom<String> for EventDateTime {
    type Error = StoreError;

    fn try_from(token: String) -> Result<Self> {
        Self::decode(&token)
    }
}

impl From<EventDateTime> for String {
    fn from(value: EventDateTime) -> Self {
        value.encode()
    }
}

impl fmt::Display for EventDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
