//! Linear trend over a series of daily values

use serde::Serialize;

/// Slope magnitude below which a series counts as stable
pub const TREND_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub slope: f64,
    pub direction: TrendDirection,
}

impl Trend {
    fn stable() -> Self {
        Self {
            slope: 0.0,
            direction: TrendDirection::Stable,
        }
    }
}

/// Ordinary least-squares slope of value against index
///
/// Fewer than two points gives slope 0 and a stable direction.
pub fn compute_linear_trend(series: &[f64]) -> Trend {
    if series.len() < 2 {
        return Trend::stable();
    }

    let n = series.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = series.iter().sum::<f64>() / n;

    let (covariance, variance) = series
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(cov, var), (i, y)| {
            let dx = i as f64 - mean_x;
            (cov + dx * (y - mean_y), var + dx * dx)
        });

    if variance.abs() < f64::EPSILON || !covariance.is_finite() {
        return Trend::stable();
    }

    let slope = covariance / variance;
    let direction = if slope > TREND_THRESHOLD {
        TrendDirection::Increasing
    } else if slope < -TREND_THRESHOLD {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Trend { slope, direction }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_series_is_stable() {
        let trend = compute_linear_trend(&[100.0, 100.0, 100.0, 100.0]);
        assert!(trend.slope.abs() < 1e-9);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_rising_series() {
        let trend = compute_linear_trend(&[100.0, 110.0, 120.0, 130.0]);
        assert!((trend.slope - 10.0).abs() < 1e-9);
        assert_eq!(trend.direction, TrendDirection::Increasing);
    }

    #[test]
    fn test_falling_series() {
        let trend = compute_linear_trend(&[2000.0, 1900.0, 1950.0, 1700.0]);
        assert!(trend.slope < 0.0);
        assert_eq!(trend.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_small_slope_is_stable() {
        let trend = compute_linear_trend(&[100.0, 100.05, 100.1]);
        assert!(trend.slope > 0.0);
        assert_eq!(trend.direction, TrendDirection::Stable);
    }

    #[test]
    fn test_short_series() {
        assert_eq!(compute_linear_trend(&[]), Trend::stable());
        assert_eq!(compute_linear_trend(&[42.0]), Trend::stable());
    }
}
