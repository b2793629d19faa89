//! Month-granular dates on the wire.
//!
//! Periods are exchanged as `MM-YYYY` tokens and always resolve to the first
//! day of that calendar month. Values are civil dates: no time of day and no
//! timezone.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::app_error::{AppError, AppResult};

const TOKEN_LEN: usize = 7;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("date is empty")]
    EmptyDate,

    #[error("date {0:?} is invalid, expected MM-YYYY")]
    InvalidDateFormat(String),
}

/// Parses a `MM-YYYY` token into the first day of that month.
pub fn parse_month_year(token: &str) -> Result<NaiveDate, DateParseError> {
    if token.is_empty() {
        return Err(DateParseError::EmptyDate);
    }

    let invalid = || DateParseError::InvalidDateFormat(token.to_string());

    let bytes = token.as_bytes();
    if bytes.len() != TOKEN_LEN || bytes[2] != b'-' {
        return Err(invalid());
    }

    let (month, year) = (&token[..2], &token[3..]);
    if !month.bytes().all(|b| b.is_ascii_digit()) || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let month: u32 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Like [`parse_month_year`] but treats a missing or blank token as "no date".
pub fn parse_optional_month_year(token: Option<&str>) -> Result<Option<NaiveDate>, DateParseError> {
    match token.map(str::trim) {
        None | Some("") => Ok(None),
        Some(token) => parse_month_year(token).map(Some),
    }
}

pub fn format_month_year(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

/// Linear month counter: consecutive calendar months differ by exactly one.
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month())
}

/// Half-open query window `[start, end)` in whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if start > end {
            return Err(AppError::InvalidInput(format!(
                "period_start {} is after period_end {}",
                format_month_year(start),
                format_month_year(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        let start = parse_month_year(start)?;
        let end = parse_month_year(end)?;
        Self::new(start, end)
    }
}
