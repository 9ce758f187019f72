use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use super::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrikeKind {
    Workout,
    Rest,
}

/// A maximal run of consecutive days of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strike {
    pub kind: StrikeKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub longest_workout_streak: i64,
    pub longest_rest_streak: i64,
    pub current_workout_streak: i64,
    pub current_rest_streak: i64,
}

/// Splits `range` into workout and rest strikes in date order.
///
/// A day is a workout day when it appears in `workout_days`. The strikes
/// cover the range without gaps, so their `days` sum to `range.days()`.
pub fn strikes(range: &DateRange, workout_days: &BTreeSet<NaiveDate>) -> Vec<Strike> {
    let mut result: Vec<Strike> = Vec::new();

    for day in range.iter_days() {
        let kind = if workout_days.contains(&day) {
            StrikeKind::Workout
        } else {
            StrikeKind::Rest
        };

        match result.last_mut() {
            Some(strike) if strike.kind == kind => {
                strike.end = day;
                strike.days += 1;
            }
            _ => result.push(Strike {
                kind,
                start: day,
                end: day,
                days: 1,
            }),
        }
    }

    result
}

/// `strikes` must come from [`strikes`] for the same `range`.
///
/// The current workout streak still counts when `to` itself has no record
/// yet, as long as the day before closes a workout strike.
pub fn summarize_strikes(range: &DateRange, strikes: &[Strike]) -> StreakSummary {
    let longest = |kind| {
        strikes
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.days)
            .max()
            .unwrap_or(0)
    };

    let yesterday = range.to.pred_opt();
    let current_workout_streak = strikes
        .iter()
        .rev()
        .take(2)
        .find(|s| s.kind == StrikeKind::Workout && (s.end == range.to || Some(s.end) == yesterday))
        .map_or(0, |s| s.days);
    let current_rest_streak = strikes
        .last()
        .filter(|s| s.kind == StrikeKind::Rest)
        .map_or(0, |s| s.days);

    StreakSummary {
        longest_workout_streak: longest(StrikeKind::Workout),
        longest_rest_streak: longest(StrikeKind::Rest),
        current_workout_streak,
        current_rest_streak,
    }
}
