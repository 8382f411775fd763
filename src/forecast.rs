//! Multi-horizon metric forecasting.
//!
//! Trend direction is classified from an index-based slope (x = 0..n-1),
//! while the 3/6/12 month values come from a separate regression on epoch
//! milliseconds. The two slopes live on different x scales; both are kept
//! because each drives observable output.

use chrono::Duration;

use crate::models::{GrowthPrediction, MetricSnapshot, Timestamp, TrendMetric};
use crate::regression::{classify_trend, fit_linear, index_slope, mean, mean_absolute_error};

const DAYS_PER_MONTH: i64 = 30;
const HORIZONS_MONTHS: [i64; 3] = [3, 6, 12];
const MIN_POINTS_FOR_CONFIDENCE: usize = 3;
const DEFAULT_CONFIDENCE: f64 = 50.0;

/// Forecast each requested metric from its history.
///
/// A snapshot that lacks a metric contributes 0 for it.
pub fn predict_growth(
    history: &[MetricSnapshot],
    metrics: &[TrendMetric],
    now: Timestamp,
) -> Vec<GrowthPrediction> {
    let predictions: Vec<GrowthPrediction> = metrics
        .iter()
        .map(|metric| predict_metric(history, *metric, now))
        .collect();
    tracing::debug!(
        points = history.len(),
        metrics = predictions.len(),
        "computed growth predictions"
    );
    predictions
}

fn predict_metric(history: &[MetricSnapshot], metric: TrendMetric, now: Timestamp) -> GrowthPrediction {
    let series: Vec<(f64, f64)> = history
        .iter()
        .map(|snapshot| {
            let value = snapshot.metrics.get(&metric).copied().unwrap_or(0.0);
            (snapshot.date.timestamp_millis() as f64, value)
        })
        .collect();
    let values: Vec<f64> = series.iter().map(|(_, value)| *value).collect();

    let trend = classify_trend(index_slope(&values));
    let fit = fit_linear(&series);

    let [predicted_3_months, predicted_6_months, predicted_12_months] = HORIZONS_MONTHS.map(|months| {
        let target = now + Duration::days(months * DAYS_PER_MONTH);
        fit.predict(target.timestamp_millis() as f64).max(0.0)
    });

    let confidence = if series.len() < MIN_POINTS_FOR_CONFIDENCE {
        DEFAULT_CONFIDENCE
    } else {
        let mean_value = mean(&values);
        if mean_value == 0.0 {
            DEFAULT_CONFIDENCE
        } else {
            let error = mean_absolute_error(&series, &fit);
            (100.0 * (1.0 - error / mean_value)).clamp(0.0, 100.0)
        }
    };

    tracing::trace!(%metric, slope = fit.slope, confidence, "forecast metric");

    GrowthPrediction {
        metric,
        current_value: values.last().copied().unwrap_or(0.0),
        predicted_3_months,
        predicted_6_months,
        predicted_12_months,
        confidence,
        trend,
        factors: growth_factors(metric),
    }
}

pub fn growth_factors(metric: TrendMetric) -> Vec<String> {
    let items: &[&str] = match metric {
        TrendMetric::Commits => &[
            "Consistent daily coding habits",
            "Active participation in open source projects",
            "Personal project development",
        ],
        TrendMetric::Stars => &[
            "Quality of project documentation",
            "Community engagement and promotion",
            "Solving real-world problems",
        ],
        TrendMetric::PullRequests => &[
            "Collaboration with other maintainers",
            "Contribution to external repositories",
            "Team code review culture",
        ],
        TrendMetric::Reviews => &[
            "Mentoring and knowledge sharing",
            "Depth of domain expertise",
            "Trust from fellow maintainers",
        ],
        TrendMetric::Followers => &[
            "Visibility of public work",
            "Technical writing and talks",
            "Helpfulness in community discussions",
        ],
        TrendMetric::Repositories
        | TrendMetric::Issues
        | TrendMetric::Forks
        | TrendMetric::Contributions => &[
            "Historical activity patterns",
            "Current engagement levels",
            "Industry trends",
        ],
    };
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Trend, TrendValues};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn monthly(metric: TrendMetric, values: &[f64]) -> Vec<MetricSnapshot> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let mut metrics = TrendValues::new();
                metrics.insert(metric, *value);
                MetricSnapshot {
                    date: start() + Duration::days(index as i64 * DAYS_PER_MONTH),
                    metrics,
                }
            })
            .collect()
    }

    #[test]
    fn rising_stars_forecast_upwards() {
        let history = monthly(TrendMetric::Stars, &[10.0, 20.0, 30.0, 40.0, 50.0]);
        let now = history[4].date;
        let predictions = predict_growth(&history, &[TrendMetric::Stars], now);

        let stars = &predictions[0];
        assert_eq!(stars.trend, Trend::Increasing);
        assert_eq!(stars.current_value, 50.0);
        assert!(stars.predicted_3_months > 50.0);
        assert!((stars.predicted_3_months - 80.0).abs() < 1e-6);
        assert!((stars.predicted_12_months - 170.0).abs() < 1e-6);
        assert!((stars.confidence - 100.0).abs() < 1e-6);
        assert_eq!(stars.factors, growth_factors(TrendMetric::Stars));
    }

    #[test]
    fn declining_series_is_clamped_at_zero() {
        let history = monthly(TrendMetric::Commits, &[90.0, 60.0, 30.0]);
        let now = history[2].date;
        let prediction = &predict_growth(&history, &[TrendMetric::Commits], now)[0];
        assert_eq!(prediction.trend, Trend::Decreasing);
        assert_eq!(prediction.predicted_3_months, 0.0);
        assert_eq!(prediction.predicted_12_months, 0.0);
    }

    #[test]
    fn empty_history_uses_safe_defaults() {
        let predictions = predict_growth(&[], &[TrendMetric::Followers], start());
        let prediction = &predictions[0];
        assert_eq!(prediction.trend, Trend::Stable);
        assert_eq!(prediction.confidence, 50.0);
        assert_eq!(prediction.current_value, 0.0);
        assert_eq!(prediction.predicted_6_months, 0.0);
    }

    #[test]
    fn missing_metric_is_an_all_zero_series() {
        let history = monthly(TrendMetric::Stars, &[1.0, 2.0, 3.0, 4.0]);
        let prediction = &predict_growth(&history, &[TrendMetric::Forks], history[3].date)[0];
        assert_eq!(prediction.trend, Trend::Stable);
        assert_eq!(prediction.confidence, 50.0);
        assert_eq!(prediction.predicted_12_months, 0.0);
        assert_eq!(prediction.factors.len(), 3);
        assert_eq!(prediction.factors[0], "Historical activity patterns");
    }

    #[test]
    fn noisy_series_loses_confidence() {
        let history = monthly(TrendMetric::Commits, &[10.0, 40.0, 5.0, 50.0, 8.0]);
        let prediction = &predict_growth(&history, &[TrendMetric::Commits], history[4].date)[0];
        assert!(prediction.confidence < 60.0);
        assert!(prediction.confidence >= 0.0);
    }

    #[test]
    fn two_points_keep_default_confidence() {
        let history = monthly(TrendMetric::Commits, &[10.0, 12.0]);
        let prediction = &predict_growth(&history, &[TrendMetric::Commits], history[1].date)[0];
        assert_eq!(prediction.confidence, 50.0);
        assert_eq!(prediction.trend, Trend::Increasing);
    }

    proptest! {
        #[test]
        fn linear_growth_never_forecasts_a_drop(
            first in 0.0f64..1000.0,
            step in 0.5f64..100.0,
            points in 2usize..24,
        ) {
            let values: Vec<f64> = (0..points).map(|i| first + step * i as f64).collect();
            let history = monthly(TrendMetric::Commits, &values);
            let now = history[points - 1].date;
            let prediction = &predict_growth(&history, &[TrendMetric::Commits], now)[0];

            prop_assert_eq!(prediction.trend, Trend::Increasing);
            prop_assert!(prediction.predicted_12_months >= prediction.current_value - 1e-6);
            prop_assert!((0.0..=100.0).contains(&prediction.confidence));
        }
    }
}
