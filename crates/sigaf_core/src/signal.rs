//! Sampled one-dimensional signal type.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A uniformly sampled univariate signal.
///
/// Holds the time axis and the sample values as two parallel vectors.
/// A `Signal` always satisfies:
/// - at least one sample,
/// - `t[0] == 0` and `t` strictly increasing,
/// - every value finite.
///
/// Signals are immutable once built. Stages that change values go through
/// [`Signal::with_values`], which copies the time axis into a new signal
/// and leaves the original untouched.
///
/// # Example
///
/// ```rust
/// use sigaf_core::Signal;
///
/// let signal = Signal::new(vec![0.0, 0.5, 1.0], vec![1.0, -1.0, 1.0])?;
/// assert_eq!(signal.len(), 3);
/// assert_eq!(signal.duration(), 1.0);
/// # Ok::<(), sigaf_core::CoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSignal", into = "RawSignal")]
pub struct Signal {
    t: Vec<f64>,
    values: Vec<f64>,
}

/// Unvalidated serde form of [`Signal`].
#[derive(Serialize, Deserialize)]
struct RawSignal {
    t: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<RawSignal> for Signal {
    type Error = CoreError;

    fn try_from(raw: RawSignal) -> Result<Self> {
        Self::new(raw.t, raw.values)
    }
}

impl From<Signal> for RawSignal {
    fn from(signal: Signal) -> Self {
        Self {
            t: signal.t,
            values: signal.values,
        }
    }
}

impl Signal {
    /// Create a signal from a time axis and matching values.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if the vectors are empty, differ in length,
    ///   `t[0] != 0`, or `t` is not strictly increasing.
    /// - `NumericError` if any value is NaN or infinite.
    pub fn new(t: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if t.is_empty() {
            return Err(CoreError::invalid("t", "a signal needs at least one sample"));
        }
        if t.len() != values.len() {
            return Err(CoreError::invalid(
                "values",
                format!("length {} does not match time axis length {}", values.len(), t.len()),
            ));
        }
        if t[0] != 0.0 {
            return Err(CoreError::invalid("t", format!("must start at 0, got {}", t[0])));
        }
        if let Some(i) = t.windows(2).position(|w| w[1].partial_cmp(&w[0]) != Some(Ordering::Greater)) {
            return Err(CoreError::invalid(
                "t",
                format!("must be strictly increasing (t[{}] = {}, t[{}] = {})", i, t[i], i + 1, t[i + 1]),
            ));
        }
        check_finite(&values)?;

        Ok(Self { t, values })
    }

    /// Build a new signal on the same time axis with different values.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `values` has a different length.
    /// - `NumericError` if any value is NaN or infinite.
    pub fn with_values(&self, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.len() {
            return Err(CoreError::invalid(
                "values",
                format!("length {} does not match signal length {}", values.len(), self.len()),
            ));
        }
        check_finite(&values)?;

        Ok(Self {
            t: self.t.clone(),
            values,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the signal has no samples (never true once validated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample times in seconds.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.t
    }

    /// Sample values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Time of the last sample.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.t[self.t.len() - 1]
    }

    /// Iterate over `(t, value)` pairs in time order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.t.iter().copied().zip(self.values.iter().copied())
    }

    /// Smallest sample value.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest sample value.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Arithmetic mean of the values.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.len() as f64
    }

    /// Population variance of the values (divides by `N`).
    #[must_use]
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.len() as f64
    }

    /// Consume the signal and return `(t, values)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.t, self.values)
    }
}

fn check_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(CoreError::NumericError(format!(
            "sample {} is not finite ({})",
            i, values[i]
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Signal {
        Signal::new(vec![0.0, 0.25, 0.5, 0.75, 1.0], vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap()
    }

    #[test]
    fn test_signal_new_validates_axis() {
        assert!(Signal::new(vec![], vec![]).unwrap_err().is_invalid_parameter());
        assert!(Signal::new(vec![0.0, 1.0], vec![1.0]).is_err());
        assert!(Signal::new(vec![0.5, 1.0], vec![1.0, 2.0]).is_err());
        assert!(Signal::new(vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
        assert!(Signal::new(vec![0.0], vec![7.0]).is_ok());
    }

    #[test]
    fn test_signal_rejects_non_finite() {
        let err = Signal::new(vec![0.0, 1.0], vec![1.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, CoreError::NumericError(_)));
    }

    #[test]
    fn test_with_values_leaves_original() {
        let signal = ramp();
        let doubled: Vec<f64> = signal.values().iter().map(|v| v * 2.0).collect();
        let other = signal.with_values(doubled).unwrap();

        assert_eq!(signal.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(other.values(), &[2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(other.times(), signal.times());
        assert!(signal.with_values(vec![1.0]).is_err());
    }

    #[test]
    fn test_statistics() {
        let signal = ramp();
        assert_eq!(signal.min(), 1.0);
        assert_eq!(signal.max(), 5.0);
        assert_eq!(signal.mean(), 3.0);
        assert_eq!(signal.variance(), 2.0);
        assert_eq!(signal.duration(), 1.0);
    }

    #[test]
    fn test_into_parts() {
        let (t, values) = ramp().into_parts();
        assert_eq!(t, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(Signal::new(t, values).unwrap(), ramp());
    }

    #[test]
    fn test_serde_validates() {
        let json = serde_json::to_string(&ramp()).unwrap();
        let restored: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ramp());

        let bad = r#"{"t":[0.0,0.0],"values":[1.0,2.0]}"#;
        assert!(serde_json::from_str::<Signal>(bad).is_err());
    }
}
