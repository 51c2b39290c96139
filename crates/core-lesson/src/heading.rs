//! Target heading derivation.

use chrono::NaiveDate;
use std::fmt;

/// Prefix shared by every top-level section heading (note the trailing space).
pub const HEADING_MARKER: &str = "### ";

/// Accepted `--date` format (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a user supplied `YYYY-MM-DD` date.
pub fn parse_date(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
}

/// Exact heading line (compared against trimmed document lines) for one day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetHeading(String);

impl TargetHeading {
    /// `### <full English weekday> <YYYY-MM-DD>`, e.g. `### Monday 2024-03-18`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self(format!("{HEADING_MARKER}{}", date.format("%A %Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TargetHeading {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn heading_uses_full_weekday_and_iso_date() {
        assert_eq!(
            TargetHeading::for_date(date(2024, 3, 18)).as_str(),
            "### Monday 2024-03-18"
        );
        assert_eq!(
            TargetHeading::for_date(date(2024, 3, 23)).to_string(),
            "### Saturday 2024-03-23"
        );
    }

    #[test]
    fn heading_zero_pads_month_and_day() {
        assert_eq!(
            TargetHeading::for_date(date(2025, 1, 5)).as_str(),
            "### Sunday 2025-01-05"
        );
    }

    #[test]
    fn parse_accepts_iso_dates() {
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn parse_rejects_other_layouts() {
        assert!(parse_date("18-03-2024").is_err());
        assert!(parse_date("2024/03/18").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("").is_err());
    }
}
