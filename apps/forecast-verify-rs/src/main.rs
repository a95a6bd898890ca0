use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};

use forecast_verify_rs::peaks::{self, PeakClassificationMetrics};
use forecast_verify_rs::series::{SeriesPoint, TimeSeries};

#[derive(Debug, Parser)]
#[command(about = "Score how well a forecast series predicts daily peaks (or troughs) of a measured series.")]
struct Args {
    /// CSV file with measured samples (header + `ts,value`, RFC3339 timestamps).
    #[arg(long)]
    measurements: PathBuf,

    /// CSV file with forecast samples (same format as --measurements).
    #[arg(long)]
    forecasts: PathBuf,

    /// Event threshold. Positive scores daily maxima above it; zero or
    /// negative scores daily minima below it.
    #[arg(long, allow_negative_numbers = true)]
    limit: f64,

    /// Print the summary as pretty JSON instead of one text line.
    #[arg(long)]
    json: bool,

    /// Optional markdown report path (parent directories are created).
    #[arg(long)]
    report: Option<PathBuf>,
}

fn init_tracing() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,forecast_verify_rs=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    ts: String,
    value: f64,
}

fn parse_ts(label: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim())
        .with_context(|| format!("invalid {} timestamp: {}", label, value))
}

fn load_series(label: &str, path: &Path) -> Result<TimeSeries> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {} file {}", label, path.display()))?;

    let mut points = Vec::new();
    for (row_idx, row) in reader.deserialize::<SampleRow>().enumerate() {
        // Header occupies line 1, so the first data row is line 2.
        let row: SampleRow = row
            .with_context(|| format!("bad {} row {} in {}", label, row_idx + 2, path.display()))?;
        points.push(SeriesPoint {
            ts: parse_ts(label, &row.ts)?,
            value: row.value,
        });
    }

    let rows = points.len();
    let series = TimeSeries::from_points(points)
        .with_context(|| format!("{} series in {} has no usable samples", label, path.display()))?;
    tracing::info!(series = label, rows, kept = series.len(), "loaded samples");
    Ok(series)
}

#[derive(Debug, Serialize)]
struct EvalSummary {
    generated_at: DateTime<Utc>,
    measurements: String,
    forecasts: String,
    limit: f64,
    mode: &'static str,
    window_start: DateTime<FixedOffset>,
    window_end: DateTime<FixedOffset>,
    metrics: PeakClassificationMetrics,
}

fn write_report(
    path: &Path,
    summary: &EvalSummary,
    measurement_samples: usize,
    forecast_samples: usize,
) -> Result<()> {
    let metrics = &summary.metrics;

    let mut report = String::new();
    report.push_str("# Daily Peak Forecast Verification\n\n");
    report.push_str(&format!(
        "- Date: {}\n- Measurements: `{}` ({} samples)\n- Forecasts: `{}` ({} samples)\n- Limit: `{}` (mode: {})\n- Window: `{}` → `{}`\n\n",
        summary.generated_at.to_rfc3339(),
        summary.measurements,
        measurement_samples,
        summary.forecasts,
        forecast_samples,
        summary.limit,
        summary.mode,
        summary.window_start.to_rfc3339(),
        summary.window_end.to_rfc3339(),
    ));
    report.push_str("## Metrics\n\n");
    report.push_str("| Metric | Value |\n| --- | ---: |\n");
    report.push_str(&format!("| precision | {:.3} |\n", metrics.precision));
    report.push_str(&format!("| recall | {:.3} |\n", metrics.recall));
    report.push_str(&format!("| fbeta10 | {:.3} |\n", metrics.fbeta10));
    report.push_str(&format!("| actual events | {} |\n", metrics.actual_event_count));
    report.push_str(&format!("| forecast events | {} |\n", metrics.forecast_event_count));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, report).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_series_reads_header_and_rows() {
        let file = csv_file(
            "ts,value\n2024-03-01T00:00:00+00:00,1.5\n2024-03-01T01:00:00+00:00,2.5\n",
        );
        let series = load_series("measurements", file.path()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].value, 1.5);
    }

    #[test]
    fn load_series_rejects_bad_timestamp() {
        let file = csv_file("ts,value\nnot-a-time,1.0\n");
        let err = load_series("measurements", file.path()).unwrap_err();
        assert!(
            err.to_string().contains("invalid measurements timestamp"),
            "got: {err}"
        );
    }

    #[test]
    fn load_series_rejects_non_numeric_value() {
        let file = csv_file("ts,value\n2024-03-01T00:00:00+00:00,garbage\n");
        let err = load_series("measurements", file.path()).unwrap_err();
        assert!(err.to_string().contains("bad measurements row 2"), "got: {err}");
    }

    #[test]
    fn load_series_drops_non_finite_values() {
        let file = csv_file(
            "ts,value\n2024-03-01T00:00:00+00:00,NaN\n2024-03-01T01:00:00+00:00,3.0\n",
        );
        let series = load_series("measurements", file.path()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].value, 3.0);
    }

    #[test]
    fn load_series_fails_when_nothing_usable_remains() {
        let file = csv_file("ts,value\n2024-03-01T00:00:00+00:00,inf\n");
        let err = load_series("forecasts", file.path()).unwrap_err();
        assert!(err.to_string().contains("no usable samples"), "got: {err}");
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing()?;
    ensure!(args.limit.is_finite(), "--limit must be a finite number");

    let measurements = load_series("measurements", &args.measurements)?;
    let forecasts = load_series("forecasts", &args.forecasts)?;

    let window_start = measurements.first_ts().min(forecasts.first_ts());
    let window_end = measurements.last_ts().max(forecasts.last_ts());
    let mode = if args.limit > 0.0 { "peak" } else { "trough" };
    tracing::info!(
        start = %window_start.to_rfc3339(),
        end = %window_end.to_rfc3339(),
        limit = args.limit,
        mode,
        "scoring forecast events"
    );

    let Some(metrics) = peaks::compute_peak_metrics(&measurements, &forecasts, args.limit) else {
        bail!("no calendar-day origin could be derived for the input window");
    };

    let summary = EvalSummary {
        generated_at: Utc::now(),
        measurements: args.measurements.display().to_string(),
        forecasts: args.forecasts.display().to_string(),
        limit: args.limit,
        mode,
        window_start,
        window_end,
        metrics,
    };

    if let Some(report) = &args.report {
        write_report(report, &summary, measurements.len(), forecasts.len())?;
        println!("wrote report to {}", report.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "precision={:.3} recall={:.3} fbeta10={:.3} actual_events={} forecast_events={}",
            summary.metrics.precision,
            summary.metrics.recall,
            summary.metrics.fbeta10,
            summary.metrics.actual_event_count,
            summary.metrics.forecast_event_count
        );
    }

    Ok(())
}
