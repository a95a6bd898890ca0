use chrono::{DateTime, FixedOffset};

/// One timestamped sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub ts: DateTime<FixedOffset>,
    pub value: f64,
}

/// A time-ordered series of finite-valued samples, unique per instant.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Builds a series from raw samples: non-finite values are dropped, samples
    /// are sorted by instant, and duplicate instants keep the first occurrence.
    /// Returns `None` when no usable sample remains.
    pub fn from_points(points: Vec<SeriesPoint>) -> Option<Self> {
        let mut points: Vec<SeriesPoint> = points
            .into_iter()
            .filter(|p| p.value.is_finite())
            .collect();
        if points.is_empty() {
            return None;
        }
        points.sort_by_key(|p| p.ts);
        points.dedup_by_key(|p| p.ts);
        Some(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Earliest sample instant. Construction guarantees at least one sample.
    pub fn first_ts(&self) -> DateTime<FixedOffset> {
        self.points[0].ts
    }

    /// Latest sample instant.
    pub fn last_ts(&self) -> DateTime<FixedOffset> {
        self.points[self.points.len() - 1].ts
    }

    /// Value at an exact instant, if the series has a sample there.
    pub fn value_at(&self, ts: DateTime<FixedOffset>) -> Option<f64> {
        self.points
            .binary_search_by(|p| p.ts.cmp(&ts))
            .ok()
            .map(|idx| self.points[idx].value)
    }
}
