//! Date windows for exports
//!
//! Record dates are free-form strings; comparisons use their first ten
//! characters so `2024-01-05` and `2024-01-05T10:00:00Z` land on the same day.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{FintrackError, FintrackResult};

/// The `YYYY-MM-DD` prefix of a date string
pub fn day_key(date: &str) -> &str {
    match date.char_indices().nth(10) {
        Some((idx, _)) => &date[..idx],
        None => date,
    }
}

/// Which records an export covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateWindow {
    #[default]
    All,
    /// One calendar month, `YYYY-MM`
    Month(String),
    /// Inclusive day range, both ends `YYYY-MM-DD`
    Range { from: String, to: String },
}

impl DateWindow {
    pub fn month(month: &str) -> FintrackResult<Self> {
        let month = month.trim();
        if month.len() != 7 || NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_err() {
            return Err(FintrackError::Validation(format!(
                "Invalid month '{}', expected YYYY-MM",
                month
            )));
        }
        Ok(Self::Month(month.to_string()))
    }

    pub fn range(from: &str, to: &str) -> FintrackResult<Self> {
        let from = parse_day(from)?;
        let to = parse_day(to)?;
        if from > to {
            return Err(FintrackError::Validation(format!(
                "Range start {} is after its end {}",
                from, to
            )));
        }
        Ok(Self::Range {
            from: from.format("%Y-%m-%d").to_string(),
            to: to.format("%Y-%m-%d").to_string(),
        })
    }

    /// Whether a record dated `date` falls in the window
    ///
    /// Dates are not checked here; a malformed one simply compares as a
    /// string.
    pub fn contains(&self, date: &str) -> bool {
        match self {
            Self::All => true,
            Self::Month(month) => day_key(date).starts_with(month.as_str()),
            Self::Range { from, to } => {
                let day = day_key(date);
                from.as_str() <= day && day <= to.as_str()
            }
        }
    }

    /// Like `contains`, but undated records are in every window
    pub fn contains_optional(&self, date: Option<&str>) -> bool {
        date.map_or(true, |d| self.contains(d))
    }

    /// Date descriptor used in export file names
    pub fn scope(&self) -> String {
        match self {
            Self::All => "all".to_string(),
            Self::Month(month) => month.clone(),
            Self::Range { from, to } => format!("{}_to_{}", from, to),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all dates"),
            Self::Month(month) => write!(f, "month {}", month),
            Self::Range { from, to } => write!(f, "{} to {}", from, to),
        }
    }
}

fn parse_day(day: &str) -> FintrackResult<NaiveDate> {
    NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d").map_err(|_| {
        FintrackError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", day.trim()))
    })
}
