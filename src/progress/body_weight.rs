use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::BodyWeight;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BodyWeightSummary {
    pub entries: usize,
    pub first: Option<WeightPoint>,
    pub last: Option<WeightPoint>,
    pub min: Option<WeightPoint>,
    pub max: Option<WeightPoint>,
    /// `last - first`.
    pub change: Option<f64>,
    /// Change per 7 days between the first and last entry.
    pub avg_weekly_change: Option<f64>,
}

pub fn summarize_body_weight(entries: &[BodyWeight]) -> BodyWeightSummary {
    let by_date = entries
        .iter()
        .map(|bw| (bw.date, WeightPoint { date: bw.date, weight: bw.weight }))
        .collect::<BTreeMap<NaiveDate, WeightPoint>>();

    let first = by_date.values().next().copied();
    let last = by_date.values().next_back().copied();
    let min = by_date
        .values()
        .copied()
        .reduce(|a, b| if b.weight < a.weight { b } else { a });
    let max = by_date
        .values()
        .copied()
        .reduce(|a, b| if b.weight > a.weight { b } else { a });

    let (change, avg_weekly_change) = match (first, last) {
        (Some(first), Some(last)) if last.date > first.date => {
            let change = last.weight - first.weight;
            let weeks = (last.date - first.date).num_days() as f64 / 7.;
            (Some(change), Some(change / weeks))
        }
        (Some(_), Some(_)) => (Some(0.), None),
        _ => (None, None),
    };

    BodyWeightSummary {
        entries: by_date.len(),
        first,
        last,
        min,
        max,
        change,
        avg_weekly_change,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::fixtures::date;
    use super::*;

    fn bw(d: u32, weight: f64) -> BodyWeight {
        BodyWeight {
            id: format!("bw-{}", d),
            user_id: "user1".to_string(),
            date: date(2024, 1, d),
            weight,
        }
    }

    fn point(d: u32, weight: f64) -> Option<WeightPoint> {
        Some(WeightPoint {
            date: date(2024, 1, d),
            weight,
        })
    }

    #[test]
    fn test_empty() {
        assert_eq!(summarize_body_weight(&[]), BodyWeightSummary::default());
    }

    #[test]
    fn test_single_entry_has_no_weekly_change() {
        let summary = summarize_body_weight(&[bw(1, 80.0)]);

        assert_eq!(summary.entries, 1);
        assert_eq!(summary.first, summary.last);
        assert_eq!(summary.change, Some(0.));
        assert_eq!(summary.avg_weekly_change, None);
    }

    #[test]
    fn test_summary_over_two_weeks() {
        let entries = vec![bw(15, 79.0), bw(1, 81.0), bw(5, 81.5), bw(10, 78.5)];

        assert_eq!(
            summarize_body_weight(&entries),
            BodyWeightSummary {
                entries: 4,
                first: point(1, 81.0),
                last: point(15, 79.0),
                min: point(10, 78.5),
                max: point(5, 81.5),
                change: Some(-2.0),
                avg_weekly_change: Some(-1.0),
            }
        );
    }
}
