use crate::error::{ProvisionError, Result};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar (year, month) bucket. Ordering is purely calendar order,
/// independent of how rows were ordered in the source data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct PeriodKey {
    pub year: i32,
    /// 1 = January, 12 = December
    pub month: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The comparison period: exactly one calendar month earlier, whether or
    /// not any data exists for it.
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The `n` periods ending at `self`, in chronological order. Always
    /// exactly `n` entries so chart series keep a fixed width.
    pub fn trailing(self, n: usize) -> Vec<PeriodKey> {
        let mut periods = Vec::with_capacity(n);
        let mut current = self;
        for _ in 0..n {
            periods.push(current);
            current = current.prev();
        }
        periods.reverse();
        periods
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Parses a period string in the format "YYYY-MM".
    pub fn parse(period: &str) -> Result<Self> {
        let anchored = format!("{}-01", period.trim());
        let date = NaiveDate::parse_from_str(&anchored, "%Y-%m-%d")
            .map_err(|_| ProvisionError::InvalidPeriod(period.to_string()))?;
        Ok(Self::from_date(date))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
