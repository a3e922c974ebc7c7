//! Date parsing and the generated date dimension.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};

/// Tried in order against the first ten characters of a raw date.
const DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Parses a raw source date; the first matching format wins.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let head = match trimmed.char_indices().nth(10) {
        Some((idx, _)) => &trimmed[..idx],
        None => trimmed,
    };
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

/// Smart key `YYYYMMDD` shared by every fact table. Years before 0 have no
/// key.
pub fn date_key(date: NaiveDate) -> Option<u32> {
    let year = u32::try_from(date.year()).ok()?;
    Some(year * 10_000 + date.month() * 100 + date.day())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DateRow {
    pub date_key: u32,
    pub date: NaiveDate,
    pub year: i32,
    /// US federal fiscal year: October starts the next year.
    pub fiscal_year: i32,
    pub quarter: u32,
    /// Q1 = October-December.
    pub fiscal_quarter: u32,
    pub month: u32,
    pub month_name: String,
    pub day: u32,
    /// 1 = Monday.
    pub day_of_week: u32,
    pub day_name: String,
    pub week_of_year: u32,
}

impl DateRow {
    fn new(date_key: u32, date: NaiveDate) -> Self {
        let month = date.month();
        Self {
            date_key,
            date,
            year: date.year(),
            fiscal_year: if month < 10 { date.year() } else { date.year() + 1 },
            quarter: (month - 1) / 3 + 1,
            fiscal_quarter: ((month + 2) % 12) / 3 + 1,
            month,
            month_name: date.format("%B").to_string(),
            day: date.day(),
            day_of_week: date.weekday().number_from_monday(),
            day_name: date.format("%A").to_string(),
            week_of_year: date.iso_week().week(),
        }
    }
}

/// One row per calendar day from January 1 of `start_year` through
/// December 31 of `end_year`.
#[derive(Debug, Clone)]
pub struct DateDimension {
    rows: Vec<DateRow>,
    first: NaiveDate,
    last: NaiveDate,
}

impl DateDimension {
    pub fn new(start_year: i32, end_year: i32) -> Result<Self> {
        let range_error = || Error::DateRange {
            start: start_year,
            end: end_year,
        };
        if start_year > end_year {
            return Err(range_error());
        }
        let first = NaiveDate::from_ymd_opt(start_year, 1, 1).ok_or_else(range_error)?;
        let last = NaiveDate::from_ymd_opt(end_year, 12, 31).ok_or_else(range_error)?;

        let rows = first
            .iter_days()
            .take_while(|d| *d <= last)
            .map(|d| date_key(d).map(|key| DateRow::new(key, d)))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(range_error)?;

        Ok(Self { rows, first, last })
    }

    pub fn rows(&self) -> &[DateRow] {
        &self.rows
    }

    pub fn start_year(&self) -> i32 {
        self.first.year()
    }

    pub fn end_year(&self) -> i32 {
        self.last.year()
    }

    /// Key for `date` when it falls inside the dimension.
    pub fn key_for(&self, date: NaiveDate) -> Option<u32> {
        (self.first..=self.last)
            .contains(&date)
            .then_some(date)
            .and_then(date_key)
    }
}
