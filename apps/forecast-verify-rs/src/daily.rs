//! Calendar-day bucketing for extremum extraction.
//!
//! Both input series are bucketed against one shared origin: the earliest
//! sample across the two series, truncated to midnight of its calendar day in
//! its own UTC offset. Day boundaries are fixed 24h periods from that origin,
//! so the two series always agree on which day a given instant belongs to.

use crate::series::TimeSeries;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use std::collections::BTreeMap;

/// Length of one day bucket in seconds.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Midnight of the earliest sample across both series, in that sample's own
/// offset. Ties between the series' earliest instants prefer `a`.
pub fn shared_origin(a: &TimeSeries, b: &TimeSeries) -> Option<DateTime<FixedOffset>> {
    truncate_to_midnight(a.first_ts().min(b.first_ts()))
}

/// Truncates a timestamp to 00:00:00 of its calendar day, preserving the
/// timestamp's UTC offset rather than normalizing to UTC.
pub fn truncate_to_midnight(ts: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    ts.offset()
        .with_ymd_and_hms(ts.year(), ts.month(), ts.day(), 0, 0, 0)
        .single()
}

fn day_index(origin: DateTime<FixedOffset>, ts: DateTime<FixedOffset>) -> i64 {
    ts.signed_duration_since(origin)
        .num_seconds()
        .div_euclid(SECONDS_PER_DAY)
}

/// Timestamp of each day's extremum in one linear scan, keyed by whole days
/// elapsed since `origin`. `use_max` selects the per-day maximum, otherwise
/// the minimum; ties keep the chronologically first sample. Days without
/// samples get no entry.
pub fn daily_extremum_timestamps(
    series: &TimeSeries,
    origin: DateTime<FixedOffset>,
    use_max: bool,
) -> BTreeMap<i64, DateTime<FixedOffset>> {
    let mut best: BTreeMap<i64, (DateTime<FixedOffset>, f64)> = BTreeMap::new();
    for point in series.points() {
        let day = day_index(origin, point.ts);
        let slot = best.entry(day).or_insert((point.ts, point.value));
        let replaces = if use_max {
            point.value > slot.1
        } else {
            point.value < slot.1
        };
        if replaces {
            *slot = (point.ts, point.value);
        }
    }
    best.into_iter().map(|(day, (ts, _value))| (day, ts)).collect()
}
