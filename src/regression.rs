//! Least-squares primitives shared by the forecasters.

use crate::models::{DemandDirection, Trend};

/// Slope magnitude below which a series counts as flat.
pub const TREND_THRESHOLD: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Ordinary least squares over `(x, y)` pairs.
///
/// Zero points yield a flat line through 0; a single point (or identical x
/// values) yields a flat line through the mean of y.
pub fn fit_linear(points: &[(f64, f64)]) -> LinearFit {
    if points.is_empty() {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
        };
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    // Centered sums keep epoch-millisecond x values well conditioned.
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in points {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }

    let slope = if sxx == 0.0 { 0.0 } else { sxy / sxx };
    LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    }
}

/// Regression slope with the sample index (0..n-1) as x.
pub fn index_slope(values: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(index, value)| (index as f64, *value))
        .collect();
    fit_linear(&points).slope
}

pub fn classify_trend(slope: f64) -> Trend {
    if slope > TREND_THRESHOLD {
        Trend::Increasing
    } else if slope < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

pub fn classify_demand(slope: f64) -> DemandDirection {
    match classify_trend(slope) {
        Trend::Increasing => DemandDirection::Rising,
        Trend::Decreasing => DemandDirection::Falling,
        Trend::Stable => DemandDirection::Stable,
    }
}

/// Mean of `|y - fit(x)|` over the points; 0 for an empty slice.
pub fn mean_absolute_error(points: &[(f64, f64)], fit: &LinearFit) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let total: f64 = points.iter().map(|(x, y)| (y - fit.predict(*x)).abs()).sum();
    total / points.len() as f64
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
