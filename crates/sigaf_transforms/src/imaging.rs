//! Gramian Angular Field imaging.
//!
//! Turns a univariate signal into a square image:
//! 1. the values are min-max rescaled into `[-1, 1]`,
//! 2. each rescaled value becomes an angle `phi = arccos(x)`,
//! 3. pixel `(i, j)` is `cos(phi_i + phi_j)` (GASF) or `sin(phi_i - phi_j)` (GADF).
//!
//! Row and column 0 correspond to the first sample, so the image is meant
//! to be drawn with its origin in the lower-left corner.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use sigaf_core::{CoreError, Result, Signal};

/// Largest image side [`TSToGAF`] will allocate (a 4096 x 4096 field is 128 MiB).
///
/// Longer series must be reduced with [`GAFConfig::image_size`].
pub const MAX_IMAGE_SIZE: usize = 4096;

/// Type of Gramian Angular Field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GAFType {
    /// Gramian Angular Summation Field.
    #[default]
    Summation,
    /// Gramian Angular Difference Field.
    Difference,
}

impl GAFType {
    /// Both field types, summation first.
    pub const ALL: [Self; 2] = [Self::Summation, Self::Difference];

    /// Lowercase name of the field type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Summation => "summation",
            Self::Difference => "difference",
        }
    }
}

impl fmt::Display for GAFType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GAFType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "summation" | "gasf" => Ok(Self::Summation),
            "difference" | "gadf" => Ok(Self::Difference),
            other => Err(CoreError::invalid(
                "method",
                format!("unknown GAF method '{other}' (expected summation or difference)"),
            )),
        }
    }
}

/// What to do with a constant series, where min-max scaling divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Map every value to -1, the lower end of the range.
    ///
    /// A single sample then encodes to `[[1]]` (GASF) and `[[0]]` (GADF).
    #[default]
    LowerBound,
    /// Map every value to 0, the middle of the range.
    Midpoint,
    /// Fail with `DegenerateInput`.
    Reject,
}

/// Configuration for Gramian Angular Field transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GAFConfig {
    /// Type of GAF (Summation or Difference).
    pub gaf_type: GAFType,
    /// Side of the output image. `None` keeps one pixel per sample; a
    /// smaller size averages the series down with PAA first.
    pub image_size: Option<usize>,
    /// Handling of constant series.
    pub degenerate: DegeneratePolicy,
}

/// A square Gramian Angular Field image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GramianField {
    gaf_type: GAFType,
    data: Array2<f64>,
}

impl GramianField {
    /// The field type that produced this image.
    #[must_use]
    pub const fn gaf_type(&self) -> GAFType {
        self.gaf_type
    }

    /// Side length of the square image.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    /// Pixel at row `i`, column `j`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.data.get((i, j)).copied()
    }

    /// Borrow the pixels as an `ndarray` matrix.
    #[must_use]
    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    /// Consume the field and return its pixels.
    #[must_use]
    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Pixels as nested rows, row 0 first.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Check `M[i][j] == M[j][i]` within `tol`.
    #[must_use]
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| (i..n).all(|j| (self.data[[i, j]] - self.data[[j, i]]).abs() <= tol))
    }

    /// Check `M[i][j] == -M[j][i]` within `tol` (which forces a zero diagonal).
    #[must_use]
    pub fn is_antisymmetric(&self, tol: f64) -> bool {
        let n = self.size();
        (0..n).all(|i| (i..n).all(|j| (self.data[[i, j]] + self.data[[j, i]]).abs() <= tol))
    }
}

/// Min-max rescale `values` into `[-1, 1]`.
///
/// # Errors
///
/// - `InvalidParameter` if `values` is empty.
/// - `NumericError` if any value is NaN or infinite.
/// - `DegenerateInput` for a constant series under [`DegeneratePolicy::Reject`].
pub fn rescale(values: &[f64], policy: DegeneratePolicy) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(CoreError::invalid("signal", "cannot rescale an empty series"));
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(CoreError::NumericError(format!(
            "cannot rescale a series containing {bad}"
        )));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // halved so that max - min stays finite for any finite pair
    let half_range = max / 2.0 - min / 2.0;

    if half_range == 0.0 {
        let fill = match policy {
            DegeneratePolicy::LowerBound => -1.0,
            DegeneratePolicy::Midpoint => 0.0,
            DegeneratePolicy::Reject => {
                return Err(CoreError::DegenerateInput(format!(
                    "constant series (every value is {min}) has no range to rescale"
                )))
            }
        };
        tracing::debug!(?policy, samples = values.len(), "constant series rescaled to {fill}");
        return Ok(vec![fill; values.len()]);
    }

    Ok(values
        .iter()
        .map(|&x| ((x / 2.0 - min / 2.0) / half_range * 2.0 - 1.0).clamp(-1.0, 1.0))
        .collect())
}

/// Piecewise aggregate approximation: average `values` down to `size` segments.
///
/// Segment `k` covers indices `floor(k*n/size)..floor((k+1)*n/size)`.
///
/// # Errors
///
/// Returns `InvalidParameter` unless `1 <= size <= values.len()`.
pub fn paa(values: &[f64], size: usize) -> Result<Vec<f64>> {
    let n = values.len();
    if size == 0 || size > n {
        return Err(CoreError::invalid(
            "image_size",
            format!("must be between 1 and the series length {n}, got {size}"),
        ));
    }
    if size == n {
        return Ok(values.to_vec());
    }

    Ok((0..size)
        .map(|k| {
            let start = k * n / size;
            let end = (k + 1) * n / size;
            values[start..end].iter().sum::<f64>() / (end - start) as f64
        })
        .collect())
}

/// Converts time series to Gramian Angular Field images.
///
/// # Example
///
/// ```rust
/// use sigaf_core::Signal;
/// use sigaf_transforms::imaging::{GAFType, TSToGAF};
///
/// let signal = Signal::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 1.0])?;
/// let field = TSToGAF::new(GAFType::Difference).encode(&signal)?;
/// assert_eq!(field.size(), 3);
/// assert_eq!(field.get(1, 1), Some(0.0));
/// # Ok::<(), sigaf_core::CoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TSToGAF {
    config: GAFConfig,
}

impl TSToGAF {
    /// Create a new GAF transform of the given type.
    #[must_use]
    pub fn new(gaf_type: GAFType) -> Self {
        Self {
            config: GAFConfig {
                gaf_type,
                ..Default::default()
            },
        }
    }

    /// Gramian Angular Summation Field transform.
    #[must_use]
    pub fn summation() -> Self {
        Self::new(GAFType::Summation)
    }

    /// Gramian Angular Difference Field transform.
    #[must_use]
    pub fn difference() -> Self {
        Self::new(GAFType::Difference)
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: GAFConfig) -> Self {
        Self { config }
    }

    /// Reduce the series to `size` points before encoding.
    #[must_use]
    pub fn with_image_size(mut self, size: usize) -> Self {
        self.config.image_size = Some(size);
        self
    }

    /// Set the constant-series policy.
    #[must_use]
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.config.degenerate = policy;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &GAFConfig {
        &self.config
    }

    /// Encode a signal.
    ///
    /// # Errors
    ///
    /// See [`TSToGAF::encode_series`].
    pub fn encode(&self, signal: &Signal) -> Result<GramianField> {
        self.encode_series(signal.values())
    }

    /// Encode a raw series of values.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` for an empty series, an out-of-range `image_size`,
    ///   or a series longer than [`MAX_IMAGE_SIZE`] left unreduced.
    /// - `NumericError` for NaN or infinite values.
    /// - `DegenerateInput` for a constant series under [`DegeneratePolicy::Reject`].
    pub fn encode_series(&self, series: &[f64]) -> Result<GramianField> {
        if series.is_empty() {
            return Err(CoreError::invalid("signal", "cannot encode an empty series"));
        }

        let reduced;
        let series = match self.config.image_size {
            Some(size) => {
                reduced = paa(series, size)?;
                reduced.as_slice()
            }
            None => series,
        };
        if series.len() > MAX_IMAGE_SIZE {
            return Err(CoreError::invalid(
                "image_size",
                format!(
                    "a {n}-point series exceeds the {MAX_IMAGE_SIZE}-pixel image limit; \
                     set image_size to reduce it first",
                    n = series.len()
                ),
            ));
        }

        let scaled = rescale(series, self.config.degenerate)?;
        let phi: Vec<f64> = scaled.iter().map(|x| x.acos()).collect();
        let n = phi.len();

        // fill the upper triangle and mirror it so the (anti)symmetry is exact
        let mut data = Array2::<f64>::zeros((n, n));
        match self.config.gaf_type {
            GAFType::Summation => {
                for i in 0..n {
                    for j in i..n {
                        let v = (phi[i] + phi[j]).cos();
                        data[[i, j]] = v;
                        data[[j, i]] = v;
                    }
                }
            }
            GAFType::Difference => {
                for i in 0..n {
                    for j in (i + 1)..n {
                        let v = (phi[i] - phi[j]).sin();
                        data[[i, j]] = v;
                        data[[j, i]] = -v;
                    }
                }
            }
        }

        tracing::debug!(gaf_type = %self.config.gaf_type, size = n, "encoded Gramian Angular Field");

        Ok(GramianField {
            gaf_type: self.config.gaf_type,
            data,
        })
    }

    /// Encode many signals in parallel.
    ///
    /// Signals are independent, so each is encoded on its own rayon task;
    /// the output keeps the input order. The first error aborts the batch.
    ///
    /// # Errors
    ///
    /// Any error [`TSToGAF::encode`] can return.
    pub fn encode_batch(&self, signals: &[Signal]) -> Result<Vec<GramianField>> {
        signals.par_iter().map(|signal| self.encode(signal)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(values: &[f64]) -> Signal {
        let t = (0..values.len()).map(|i| i as f64 * 0.1).collect();
        Signal::new(t, values.to_vec()).unwrap()
    }

    fn bumpy() -> Signal {
        signal(&[0.0, 0.5, 1.0, 0.5, 0.0, -0.3, 2.0, 1.7])
    }

    #[test]
    fn test_gaf_config_default() {
        let config = GAFConfig::default();
        assert_eq!(config.gaf_type, GAFType::Summation);
        assert_eq!(config.image_size, None);
        assert_eq!(config.degenerate, DegeneratePolicy::LowerBound);
    }

    #[test]
    fn test_rescale_range() {
        let scaled = rescale(&[2.0, 4.0, 3.0], DegeneratePolicy::Reject).unwrap();
        assert_eq!(scaled, vec![-1.0, 1.0, 0.0]);
        assert!(rescale(&[], DegeneratePolicy::LowerBound).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_rescale_constant_policies() {
        assert_eq!(rescale(&[5.0, 5.0], DegeneratePolicy::LowerBound).unwrap(), vec![-1.0, -1.0]);
        assert_eq!(rescale(&[5.0, 5.0], DegeneratePolicy::Midpoint).unwrap(), vec![0.0, 0.0]);
        let err = rescale(&[5.0, 5.0], DegeneratePolicy::Reject).unwrap_err();
        assert!(matches!(err, CoreError::DegenerateInput(_)));
    }

    #[test]
    fn test_gasf_compute() {
        let field = TSToGAF::summation().encode(&bumpy()).unwrap();

        assert_eq!(field.size(), 8);
        assert_eq!(field.gaf_type(), GAFType::Summation);
        assert!(field.is_symmetric(0.0));

        // GASF values should be in [-1, 1]
        assert!(field.as_array().iter().all(|v| (-1.0..=1.0).contains(v)));

        // diagonal is cos(2 phi) = 2x^2 - 1
        let scaled = rescale(bumpy().values(), DegeneratePolicy::LowerBound).unwrap();
        for (i, x) in scaled.iter().enumerate() {
            assert!((field.get(i, i).unwrap() - (2.0 * x * x - 1.0)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_gadf_compute() {
        let field = TSToGAF::difference().encode(&bumpy()).unwrap();

        assert_eq!(field.size(), 8);
        assert!(field.is_antisymmetric(0.0));
        for i in 0..8 {
            assert_eq!(field.get(i, i), Some(0.0));
        }
        assert!(field.as_array().iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_two_point_extremes() {
        // scaled [-1, 1] -> phi [pi, 0]
        let field = TSToGAF::summation().encode(&signal(&[3.0, 7.0])).unwrap();
        let expected = [[1.0, -1.0], [-1.0, 1.0]];
        for i in 0..2 {
            for j in 0..2 {
                assert!((field.get(i, j).unwrap() - expected[i][j]).abs() < 1e-12);
            }
        }

        let field = TSToGAF::difference().encode(&signal(&[3.0, 7.0])).unwrap();
        assert!(field.as_array().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_single_sample_field() {
        let one = signal(&[4.2]);
        let gasf = TSToGAF::summation().encode(&one).unwrap();
        let gadf = TSToGAF::difference().encode(&one).unwrap();

        assert_eq!(gasf.size(), 1);
        assert!((gasf.get(0, 0).unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(gadf.to_rows(), vec![vec![0.0]]);
    }

    #[test]
    fn test_reject_constant_signal() {
        let flat = signal(&[1.0, 1.0, 1.0]);
        let err = TSToGAF::summation()
            .with_degenerate_policy(DegeneratePolicy::Reject)
            .encode(&flat)
            .unwrap_err();
        assert!(matches!(err, CoreError::DegenerateInput(_)));

        let midpoint = TSToGAF::summation()
            .with_degenerate_policy(DegeneratePolicy::Midpoint)
            .encode(&flat)
            .unwrap();
        assert!(midpoint.as_array().iter().all(|v| (v + 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_empty_series_rejected() {
        let err = TSToGAF::summation().encode_series(&[]).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_extreme_range_stays_finite() {
        let wide = signal(&[-1e308, 0.0, 1e308]);
        let scaled = rescale(wide.values(), DegeneratePolicy::Reject).unwrap();
        for (got, want) in scaled.iter().zip([-1.0, 0.0, 1.0]) {
            assert!((got - want).abs() < 1e-12);
        }

        for gaf_type in GAFType::ALL {
            let field = TSToGAF::new(gaf_type).encode(&wide).unwrap();
            assert!(field.as_array().iter().all(|v| v.is_finite() && v.abs() <= 1.0));
        }
    }

    #[test]
    fn test_non_finite_series_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = TSToGAF::difference().encode_series(&[0.0, bad, 1.0]).unwrap_err();
            assert!(matches!(err, CoreError::NumericError(_)));
        }
    }

    #[test]
    fn test_image_size_limit() {
        let long: Vec<f64> = (0..=MAX_IMAGE_SIZE).map(|i| (i as f64 * 0.01).sin()).collect();

        let err = TSToGAF::summation().encode_series(&long).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("image_size"));

        let field = TSToGAF::summation().with_image_size(64).encode_series(&long).unwrap();
        assert_eq!(field.size(), 64);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let gaf = TSToGAF::difference();
        assert_eq!(gaf.encode(&bumpy()).unwrap(), gaf.encode(&bumpy()).unwrap());
    }

    #[test]
    fn test_paa_image_size() {
        assert_eq!(paa(&[1.0, 3.0, 5.0, 7.0], 2).unwrap(), vec![2.0, 6.0]);
        assert_eq!(paa(&[1.0, 2.0, 3.0], 3).unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(paa(&[1.0, 2.0], 3).is_err());
        assert!(paa(&[1.0, 2.0], 0).is_err());

        let field = TSToGAF::summation().with_image_size(4).encode(&bumpy()).unwrap();
        assert_eq!(field.size(), 4);
        assert!(field.is_symmetric(0.0));

        let err = TSToGAF::summation().with_image_size(9).encode(&bumpy()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_encode_batch_keeps_order() {
        let signals = vec![bumpy(), signal(&[0.0, 1.0]), signal(&[2.0])];
        let gaf = TSToGAF::summation();
        let fields = gaf.encode_batch(&signals).unwrap();

        assert_eq!(fields.len(), 3);
        for (field, signal) in fields.iter().zip(&signals) {
            assert_eq!(field, &gaf.encode(signal).unwrap());
        }

        let rejecting = gaf.with_degenerate_policy(DegeneratePolicy::Reject);
        assert!(rejecting.encode_batch(&signals).is_err());
    }

    #[test]
    fn test_method_names() {
        assert_eq!("summation".parse::<GAFType>().unwrap(), GAFType::Summation);
        assert_eq!("GADF".parse::<GAFType>().unwrap(), GAFType::Difference);
        assert!("product".parse::<GAFType>().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_field_serde() {
        let field = TSToGAF::summation().encode(&signal(&[0.0, 1.0, 0.5])).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        let restored: GramianField = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, field);

        let config: GAFConfig = serde_json::from_str(r#"{"gaf_type":"difference"}"#).unwrap();
        assert_eq!(config.gaf_type, GAFType::Difference);
        assert_eq!(config.degenerate, DegeneratePolicy::LowerBound);
    }
}
