use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{totals, DateRange, Totals};
use crate::models::WorkoutRecord;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
}

impl Period {
    /// First day of the period containing `date`. Weeks start on Monday.
    fn start_of(self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Week => date
                .checked_sub_signed(Duration::days(i64::from(date.weekday().num_days_from_monday())))
                .unwrap_or(NaiveDate::MIN),
            Period::Month => date.with_day(1).unwrap_or(date),
        }
    }

    fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Day => start.succ_opt(),
            Period::Week => start.checked_add_signed(Duration::days(7)),
            Period::Month => start.checked_add_months(Months::new(1)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(flatten)]
    pub totals: Totals,
}

/// One bucket per period overlapping `range`, including empty ones.
///
/// The first and last bucket are clipped to the range, so a bucket never
/// reports days outside of it.
pub fn buckets(range: &DateRange, period: Period, records: &[WorkoutRecord]) -> Vec<Bucket> {
    let mut sorted: Vec<&WorkoutRecord> = records.iter().filter(|r| range.contains(r.date)).collect();
    sorted.sort_by_key(|r| r.date);
    let mut remaining = sorted.as_slice();

    let mut result = Vec::new();
    let mut cursor = Some(period.start_of(range.from));

    while let Some(period_start) = cursor.filter(|d| *d <= range.to) {
        let next = period.next(period_start);
        let start = period_start.max(range.from);
        let end = next
            .and_then(|n| n.pred_opt())
            .map_or(range.to, |last| last.min(range.to));

        let split = remaining.partition_point(|r| r.date <= end);
        let (inside, rest) = remaining.split_at(split);
        remaining = rest;

        result.push(Bucket {
            start,
            end,
            totals: totals(inside.iter().copied()),
        });
        cursor = next;
    }

    result
}
