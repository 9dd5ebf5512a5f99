//! Calendar helpers: month labels and onboarding dates.
//!
//! Months are true calendar months, never 30-day blocks, so a
//! trailing series is always contiguous.

use crate::error::GenError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Days per tenure month when back-dating onboarding.
pub const DAYS_PER_TENURE_MONTH: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    pub year:  i32,
    pub month: u32, // 1..=12
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year:  date.year(),
            month: date.month(),
        }
    }

    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn months_back(self, k: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - k as i32;
        Self {
            year:  index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || GenError::InvalidArgument {
            name: "month",
            reason: format!("expected YYYY-MM, got '{s}'"),
        };
        let (y, m) = s.split_once('-').ok_or_else(bad)?;
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        Self::new(year, month).ok_or_else(bad)
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = GenError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// `count` consecutive months ending at the month of `as_of`, oldest first.
pub fn trailing_months(as_of: NaiveDate, count: usize) -> Vec<YearMonth> {
    let current = YearMonth::from_date(as_of);
    (0..count)
        .rev()
        .map(|back| current.months_back(back as u32))
        .collect()
}

pub fn onboarding_date(as_of: NaiveDate, tenure_months: u32) -> NaiveDate {
    as_of - Duration::days(tenure_months as i64 * DAYS_PER_TENURE_MONTH)
}
