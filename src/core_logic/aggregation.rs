use crate::api::models::{MonthlyPoint, RawSample};
use chrono::{Datelike, TimeZone, Utc};
use std::collections::BTreeMap;

struct MonthBucket {
    label: String,
    sum: u64,
    compare_sum: u64,
    count: u32,
}

/// Buckets raw weekly/irregular samples into calendar-month averages.
///
/// Buckets are keyed by `(year, month)` so the output is always emitted in
/// chronological order, even if the provider ever returns samples out of
/// order. A month with no samples yields no point at all; there is no
/// smoothing or interpolation across gaps.
///
/// When a comparison keyword was requested, a sample with no second column
/// still counts toward the bucket with a value of 0, so sparse comparison
/// data deflates that month's `compare_value` rather than dropping it.
pub fn aggregate_monthly(samples: &[RawSample], with_compare: bool) -> Vec<MonthlyPoint> {
    let mut buckets: BTreeMap<(i32, u32), MonthBucket> = BTreeMap::new();

    for sample in samples {
        let date = match Utc.timestamp_opt(sample.timestamp, 0).single() {
            Some(date) => date,
            None => continue,
        };

        let bucket = buckets
            .entry((date.year(), date.month()))
            .or_insert_with(|| MonthBucket {
                label: date.format("%b %Y").to_string(),
                sum: 0,
                compare_sum: 0,
                count: 0,
            });

        bucket.sum += u64::from(sample.values.first().copied().unwrap_or(0));
        if with_compare {
            bucket.compare_sum += u64::from(sample.values.get(1).copied().unwrap_or(0));
        }
        bucket.count += 1;
    }

    buckets
        .into_values()
        .map(|bucket| MonthlyPoint {
            month: bucket.label,
            value: rounded_mean(bucket.sum, bucket.count),
            compare_value: if with_compare {
                Some(rounded_mean(bucket.compare_sum, bucket.count))
            } else {
                None
            },
        })
        .collect()
}

fn rounded_mean(sum: u64, count: u32) -> u32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

pub fn current_score(points: &[MonthlyPoint]) -> u32 {
    points.last().map(|point| point.value).unwrap_or(0)
}

/// Peak interest across the series, floored at 1 so downstream ratios
/// never divide by zero.
pub fn peak_score(points: &[MonthlyPoint]) -> u32 {
    points
        .iter()
        .map(|point| point.value)
        .max()
        .unwrap_or(0)
        .max(1)
}
