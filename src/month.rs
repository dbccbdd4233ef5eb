use std::fmt;

use serde::{Serialize, Serializer};
use time::{Date, Month};

/// A calendar month of a specific year, e.g. `2024-01`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn of(date: Date) -> Self {
        Self::new(date.year(), date.month())
    }

    /// Parse `YYYY-MM`. Anything else, including out-of-range months, is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year_part, month_part) = raw.trim().split_once('-')?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return None;
        }
        if !year_part.bytes().all(|b| b.is_ascii_digit())
            || !month_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let year: i32 = year_part.parse().ok()?;
        let month_number: u8 = month_part.parse().ok()?;
        let month = Month::try_from(month_number).ok()?;
        Some(Self::new(year, month))
    }

    /// `None` when the month lies outside the representable date range
    pub fn first_day(&self) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, 1).ok()
    }

    /// The following month, or `None` after December 9999
    pub fn next(&self) -> Option<Self> {
        let next = match self.month {
            Month::December => Self::new(self.year + 1, Month::January),
            month => Self::new(self.year, month.next()),
        };
        next.first_day().map(|_| next)
    }

    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self::new(self.year - 1, Month::December),
            month => Self::new(self.year, month.previous()),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The `count` months ending at (and including) `self`, oldest first
    pub fn trailing(&self, count: usize) -> Vec<YearMonth> {
        let mut months = Vec::with_capacity(count);
        let mut cursor = *self;
        for _ in 0..count {
            months.push(cursor);
            cursor = cursor.previous();
        }
        months.reverse();
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, u8::from(self.month))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
