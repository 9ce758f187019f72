use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const DEFAULT_RANGE_DAYS: i64 = 30;
pub const MAX_RANGE_DAYS: i64 = 3660;

/// An inclusive range of calendar days. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AppError::BadRequest(
                "'from' must not be after 'to'".to_string(),
            ));
        }
        let range = Self { from, to };
        if range.days() > MAX_RANGE_DAYS {
            return Err(AppError::BadRequest(format!(
                "Date range must not exceed {} days",
                MAX_RANGE_DAYS
            )));
        }
        Ok(range)
    }

    /// Fills in missing bounds: `to` defaults to `today`, `from` to the start
    /// of the default window ending on `to`.
    pub fn resolve(from: Option<NaiveDate>, to: Option<NaiveDate>, today: NaiveDate) -> Result<Self> {
        let to = to.unwrap_or(today);
        let from = match from {
            Some(from) => from,
            None => to
                .checked_sub_signed(Duration::days(DEFAULT_RANGE_DAYS - 1))
                .ok_or_else(|| AppError::BadRequest("'to' is out of range".to_string()))?,
        };
        Self::new(from, to)
    }

    /// Number of days, counting both ends.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Also yields `NaiveDate::MAX` when the range ends there.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let to = self.to;
        std::iter::successors(Some(self.from), move |d| d.succ_opt().filter(|next| *next <= to))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn resolve(&self, today: NaiveDate) -> Result<DateRange> {
        DateRange::resolve(self.from, self.to, today)
    }
}
