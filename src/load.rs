use std::path::Path;

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;

use devgrowth::{MetricSnapshot, TrendMetric, TrendValues};

pub fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Read a metric history CSV: a `date` column followed by one column per
/// tracked metric. Empty cells leave the metric out of that snapshot.
pub fn load_history_csv(path: &Path) -> anyhow::Result<(Vec<TrendMetric>, Vec<MetricSnapshot>)> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let headers = reader.headers()?.clone();
    match headers.get(0) {
        Some("date") => {}
        _ => bail!("{}: first column must be `date`", path.display()),
    }

    let metrics = headers
        .iter()
        .skip(1)
        .map(|name| name.trim().parse::<TrendMetric>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("unsupported column in {}", path.display()))?;

    let mut snapshots = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        let raw_date = record.get(0).unwrap_or_default();
        let date = parse_date(raw_date)
            .with_context(|| format!("row {}: invalid date `{raw_date}`", line + 1))?;

        let mut values = TrendValues::new();
        for (metric, cell) in metrics.iter().zip(record.iter().skip(1)) {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let value: f64 = cell
                .parse()
                .with_context(|| format!("row {}: invalid {metric} value `{cell}`", line + 1))?;
            values.insert(*metric, value);
        }

        snapshots.push(MetricSnapshot {
            date,
            metrics: values,
        });
    }

    tracing::info!(rows = snapshots.len(), path = %path.display(), "loaded metric history");
    Ok((metrics, snapshots))
}

pub fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").context("expected RFC 3339 or YYYY-MM-DD")?;
    day.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .context("invalid date")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-03-01").unwrap(), expected);
        assert_eq!(parse_date("2024-03-01T00:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_date("2024-03-01T02:00:00+02:00").unwrap(),
            expected
        );
        assert!(parse_date("March 1st").is_err());
    }

    #[test]
    fn reads_history_with_gaps() {
        let path = std::env::temp_dir().join(format!("devgrowth-history-{}.csv", std::process::id()));
        std::fs::write(&path, "date,commits,stars\n2024-01-01,10,\n2024-01-31,25,4\n").unwrap();

        let (metrics, snapshots) = load_history_csv(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(metrics, vec![TrendMetric::Commits, TrendMetric::Stars]);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].metrics.get(&TrendMetric::Stars), None);
        assert_eq!(snapshots[1].metrics.get(&TrendMetric::Stars), Some(&4.0));
    }

    #[test]
    fn rejects_unknown_columns() {
        let path = std::env::temp_dir().join(format!("devgrowth-bad-{}.csv", std::process::id()));
        std::fs::write(&path, "date,karma\n2024-01-01,3\n").unwrap();
        let result = load_history_csv(&path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
