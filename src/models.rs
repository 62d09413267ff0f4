use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::SalesError;

/// Calendar month. Ordering follows the calendar, not the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month of a date.
    pub fn of(date: NaiveDate) -> Month {
        Month::ALL[date.month0() as usize]
    }

    /// Zero-based position in the calendar.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    pub fn abbrev(self) -> &'static str {
        &self.name()[..3]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = SalesError;

    /// Accepts full names, three-letter abbreviations, or 1-12, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            if (1..=12).contains(&n) {
                return Ok(Month::ALL[n - 1]);
            }
        }
        Month::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s) || m.abbrev().eq_ignore_ascii_case(s))
            .ok_or_else(|| SalesError::UnknownMonth(s.to_string()))
    }
}

/// One cleaned sales transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub branch: Option<String>,
    pub customer: Option<String>,
    pub tbm: Option<String>,
    /// Raw serial date code as it appeared in the sheet.
    pub dt: f64,
    pub amount: f64,
    pub date: NaiveDate,
    pub year: i32,
    pub month: Month,
}

/// All cleaned transactions from one workbook.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    pub rows: Vec<Transaction>,
    /// Whether the sheet carried a TBM column at all.
    pub has_tbm: bool,
    /// Data rows discarded because Date or USDAmt failed coercion.
    pub dropped: usize,
}

impl TransactionTable {
    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|r| r.year).max()
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_sorts_in_calendar_order() {
        let mut months = vec![Month::December, Month::April, Month::January, Month::August];
        months.sort();
        assert_eq!(
            months,
            vec![Month::January, Month::April, Month::August, Month::December]
        );
    }

    #[test]
    fn test_month_of_date() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(Month::of(d), Month::March);
        assert_eq!(Month::March.index(), 2);
    }

    #[test]
    fn test_month_from_str() {
        assert_eq!("january".parse::<Month>().unwrap(), Month::January);
        assert_eq!("Sep".parse::<Month>().unwrap(), Month::September);
        assert_eq!("12".parse::<Month>().unwrap(), Month::December);
        assert!("13".parse::<Month>().is_err());
        assert!("Smarch".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_display() {
        assert_eq!(Month::February.to_string(), "February");
        assert_eq!(Month::February.abbrev(), "Feb");
    }
}
