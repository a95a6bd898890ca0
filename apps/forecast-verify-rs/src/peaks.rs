//! Daily peak/trough verification: does the forecast flag the same
//! threshold-crossing days the measurements do?
//!
//! Both series are bucketed into calendar days anchored at the midnight of
//! the earliest sample either one carries. A positive limit means the daily
//! maximum is the interesting extremum, a non-positive limit the daily
//! minimum. Days with an extremum on both sides are compared as binary
//! events and scored with precision, recall and a recall-heavy F-score.

use serde::Serialize;

use crate::classification::ConfusionCounts;
use crate::daily;
use crate::series::TimeSeries;

/// Beta for the combined F-score. Missing a real event costs far more than
/// a false alarm, so recall is weighted 10x against precision.
pub const FBETA_BETA: f64 = 10.0;

/// Event-classification scores over the days both series cover.
///
/// The float fields are NaN whenever their denominator is empty (no events
/// on the relevant side); the counts are always exact.
#[derive(Debug, Clone, Serialize)]
pub struct PeakClassificationMetrics {
    pub precision: f64,
    pub recall: f64,
    pub fbeta10: f64,
    pub actual_event_count: usize,
    pub forecast_event_count: usize,
}

/// Event predicate: strictly above a positive limit, strictly below a
/// non-positive one. Touching the limit exactly is never an event.
pub fn is_event(value: f64, limit: f64) -> bool {
    if limit > 0.0 {
        value > limit
    } else {
        value < limit
    }
}

/// Scores how well `forecasts` predicts the daily extreme events of
/// `measurements` relative to `limit`.
///
/// Returns None only when no day origin exists (an empty series cannot be
/// constructed, so in practice only a non-representable midnight). Degenerate
/// inputs, e.g. the two series covering disjoint days, still produce a value
/// with NaN scores and zero counts.
pub fn compute_peak_metrics(
    measurements: &TimeSeries,
    forecasts: &TimeSeries,
    limit: f64,
) -> Option<PeakClassificationMetrics> {
    let use_max = limit > 0.0;
    let origin = daily::shared_origin(measurements, forecasts)?;

    let measured_extrema = daily::daily_extremum_timestamps(measurements, origin, use_max);
    let forecast_extrema = daily::daily_extremum_timestamps(forecasts, origin, use_max);

    let mut actual_flags = Vec::new();
    let mut forecast_flags = Vec::new();
    for (day, measured_ts) in &measured_extrema {
        let Some(forecast_ts) = forecast_extrema.get(day) else {
            continue;
        };
        let Some(measured_value) = measurements.value_at(*measured_ts) else {
            continue;
        };
        let Some(forecast_value) = forecasts.value_at(*forecast_ts) else {
            continue;
        };
        actual_flags.push(is_event(measured_value, limit));
        forecast_flags.push(is_event(forecast_value, limit));
    }

    let counts = ConfusionCounts::from_flags(&actual_flags, &forecast_flags);
    Some(PeakClassificationMetrics {
        precision: counts.precision(),
        recall: counts.recall(),
        fbeta10: counts.fbeta(FBETA_BETA),
        actual_event_count: actual_flags.iter().filter(|flag| **flag).count(),
        forecast_event_count: forecast_flags.iter().filter(|flag| **flag).count(),
    })
}
