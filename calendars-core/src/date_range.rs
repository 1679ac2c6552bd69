//! Date window for a reconciliation run.

use std::fmt;

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

/// Inclusive range of calendar dates. Events dated on either bound are inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// `months_before` months before `today` up to `months_after` months after it.
    pub fn around(today: NaiveDate, months_before: u32, months_after: u32) -> Self {
        DateRange {
            start: today
                .checked_sub_months(Months::new(months_before))
                .unwrap_or(NaiveDate::MIN),
            end: today
                .checked_add_months(Months::new(months_after))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    pub fn around_today(months_before: u32, months_after: u32) -> Self {
        Self::around(Utc::now().date_naive(), months_before, months_after)
    }

    /// Build a range from optional YYYY-MM-DD bounds, falling back to `default`
    /// for whichever bound is missing.
    pub fn from_args(
        from: Option<&str>,
        to: Option<&str>,
        default: DateRange,
    ) -> Result<Self, String> {
        let start = match from {
            Some(s) => parse_date(s)?,
            None => default.start,
        };
        let end = match to {
            Some(s) => parse_date(s)?,
            None => default.end,
        };

        if start > end {
            return Err(format!("Start date {start} is after end date {end}"));
        }

        Ok(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Lower bound for a provider query.
    ///
    /// Widened by a day so timed events whose local date differs from their
    /// UTC date are still returned; the caller filters on the exact bounds.
    pub fn query_from_rfc3339(&self) -> String {
        start_of_day(self.start.checked_sub_days(Days::new(1)).unwrap_or(self.start))
    }

    /// Exclusive upper bound for a provider query, widened like the lower one.
    pub fn query_to_rfc3339(&self) -> String {
        start_of_day(self.end.checked_add_days(Days::new(2)).unwrap_or(self.end))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
}

fn start_of_day(date: NaiveDate) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(date.and_time(chrono::NaiveTime::MIN), Utc)
        .to_rfc3339()
}
