//! Date normalization for the search index
//!
//! Catalogers write dates at whatever precision they know: a year, a month,
//! a day, or a full timestamp. The index wants one sortable form, so every
//! accepted input is widened to the first instant it covers, converted to
//! UTC and printed as `YYYY-MM-DDTHH:MM:SSZ`.

use crate::core::error::{PbcoreError, PbcoreResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Output format of normalized dates
pub const INDEX_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A date widened to a UTC instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexDate(DateTime<Utc>);

impl IndexDate {
    /// Parse a full or partial date
    ///
    /// Accepted forms:
    /// - `YYYY`
    /// - `YYYY-MM`
    /// - `YYYY-MM-DD`
    /// - `YYYY-MM-DDTHH:MM:SS` or with a space separator (taken as UTC)
    /// - RFC 3339 with `Z` or an offset
    pub fn parse(s: &str) -> PbcoreResult<Self> {
        let s = s.trim();
        let invalid = || PbcoreError::ParseError(format!("Invalid date: '{}'", s));

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(dt.and_utc()));
            }
        }

        let date = match s.len() {
            4 => {
                let year: i32 = s.parse().map_err(|_| invalid())?;
                NaiveDate::from_ymd_opt(year, 1, 1)
            }
            7 => NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").ok(),
            10 => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
            _ => None,
        }
        .ok_or_else(invalid)?;

        Ok(Self(date.and_time(NaiveTime::MIN).and_utc()))
    }

    /// Format in the index form
    pub fn format(&self) -> String {
        self.0.format(INDEX_DATE_FORMAT).to_string()
    }

    /// The underlying instant
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parse and format a date in one step
pub fn normalize_date(s: &str) -> PbcoreResult<String> {
    IndexDate::parse(s).map(|date| date.format())
}
