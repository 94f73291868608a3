//! Piecewise-linear curve mapping normalized world height to a surface offset.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a spline is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error("spline has no keys")]
    Empty,
    #[error("spline has {keys} keys but {values} values")]
    LengthMismatch { keys: usize, values: usize },
    #[error("spline keys are not sorted at index {index}")]
    Unsorted { index: usize },
    #[error("spline contains a non-finite number")]
    NonFinite,
}

/// Piecewise-linear function over sorted keys, clamped outside the key range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SplinePoints", into = "SplinePoints")]
pub struct TerrainSpline {
    keys: Vec<f64>,
    values: Vec<f64>,
}

/// Serialized form of a [`TerrainSpline`], validated on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SplinePoints {
    keys: Vec<f64>,
    values: Vec<f64>,
}

impl TerrainSpline {
    /// Build a spline from matching key/value lists. Keys must be ascending.
    pub fn new(keys: Vec<f64>, values: Vec<f64>) -> Result<Self, SplineError> {
        if keys.is_empty() {
            return Err(SplineError::Empty);
        }
        if keys.len() != values.len() {
            return Err(SplineError::LengthMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        if keys.iter().chain(&values).any(|v| !v.is_finite()) {
            return Err(SplineError::NonFinite);
        }
        if let Some(index) = keys.windows(2).position(|pair| pair[1] < pair[0]) {
            return Err(SplineError::Unsorted { index: index + 1 });
        }
        Ok(Self { keys, values })
    }

    /// Build a spline from `(key, value)` points.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self, SplineError> {
        let (keys, values) = points.iter().copied().unzip();
        Self::new(keys, values)
    }

    /// A spline returning `value` everywhere.
    pub fn flat(value: f64) -> Self {
        Self {
            keys: vec![0.0],
            values: vec![value],
        }
    }

    pub fn keys(&self) -> &[f64] {
        &self.keys
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Evaluate at `t`, clamping to the first/last value outside the keys.
    pub fn evaluate(&self, t: f64) -> f64 {
        let last = self.keys.len() - 1;
        if t <= self.keys[0] {
            return self.values[0];
        }
        if t >= self.keys[last] {
            return self.values[last];
        }

        // First key strictly greater than t; 1..=last given the checks above.
        let upper = self.keys.partition_point(|&k| k <= t);
        let lower = upper - 1;
        let span = self.keys[upper] - self.keys[lower];
        if span <= 0.0 {
            return self.values[upper];
        }
        let alpha = (t - self.keys[lower]) / span;
        self.values[lower] + (self.values[upper] - self.values[lower]) * alpha
    }
}

impl TryFrom<SplinePoints> for TerrainSpline {
    type Error = SplineError;

    fn try_from(points: SplinePoints) -> Result<Self, Self::Error> {
        Self::new(points.keys, points.values)
    }
}

impl From<TerrainSpline> for SplinePoints {
    fn from(spline: TerrainSpline) -> Self {
        Self {
            keys: spline.keys,
            values: spline.values,
        }
    }
}
