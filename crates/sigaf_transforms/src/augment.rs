//! Signal augmentation transforms.
//!
//! Each augmenter reads a [`Signal`] and returns a new one on the same time
//! axis with distorted values:
//! - [`AddNoise`]: white Gaussian noise sized by a target SNR
//! - [`AddTrend`]: fixed linear or quadratic drift
//! - [`AddDiscontinuity`]: additive step from a break time on
//! - [`AddSuddenChange`]: amplitude rescaling from a pivot time on

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sigaf_core::{
    ensure_finite, standard_normal, Compose, CoreError, Result, Signal, SignalRng, Transform,
};

/// Slope of the linear trend, per second.
pub const LINEAR_TREND_COEFF: f64 = 0.5;

/// Coefficient of the quadratic trend, per second squared.
pub const QUADRATIC_TREND_COEFF: f64 = 0.1;

// =============================================================================
// AddNoise: white noise at a target SNR
// =============================================================================

/// Configuration for SNR-driven noise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddNoiseConfig {
    /// Target signal-to-noise ratio in decibels.
    pub snr_db: f64,
}

impl Default for AddNoiseConfig {
    fn default() -> Self {
        Self { snr_db: 20.0 }
    }
}

/// Adds zero-mean Gaussian noise at a given signal-to-noise ratio.
///
/// The noise power is `var(values) / 10^(snr_db / 10)`, using the
/// population variance of the input.
///
/// # Example
///
/// ```rust
/// use sigaf_core::{Seed, Signal, Transform};
/// use sigaf_transforms::augment::AddNoise;
///
/// let signal = Signal::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, -1.0, 1.0, -1.0])?;
/// let noisy = AddNoise::new(30.0).apply(&signal, &mut Seed::new(1).to_rng())?;
/// assert_eq!(noisy.len(), signal.len());
/// # Ok::<(), sigaf_core::CoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AddNoise {
    config: AddNoiseConfig,
}

impl AddNoise {
    /// Create a new noise transform.
    #[must_use]
    pub fn new(snr_db: f64) -> Self {
        Self {
            config: AddNoiseConfig { snr_db },
        }
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: AddNoiseConfig) -> Self {
        Self { config }
    }

    /// Noise power that would be injected into `signal`.
    ///
    /// # Errors
    ///
    /// - `InvalidParameter` if `snr_db` is not finite.
    /// - `NumericError` if the signal has zero variance or the power is not finite.
    pub fn noise_power(&self, signal: &Signal) -> Result<f64> {
        let snr_db = ensure_finite("snr_db", self.config.snr_db)?;
        let variance = signal.variance();
        if variance == 0.0 {
            return Err(CoreError::NumericError(
                "SNR is undefined for a zero-variance signal".to_string(),
            ));
        }

        let noise_power = variance / 10f64.powf(snr_db / 10.0);
        if !noise_power.is_finite() {
            return Err(CoreError::NumericError(format!(
                "noise power for {snr_db} dB is not finite"
            )));
        }
        Ok(noise_power)
    }
}

impl Transform for AddNoise {
    fn apply(&self, signal: &Signal, rng: &mut SignalRng) -> Result<Signal> {
        let std = self.noise_power(signal)?.sqrt();

        let values = signal
            .values()
            .iter()
            .map(|&v| v + std * standard_normal(rng))
            .collect();

        signal.with_values(values)
    }

    fn name(&self) -> &str {
        "AddNoise"
    }
}

// =============================================================================
// AddTrend: deterministic drift
// =============================================================================

/// Shape of the drift added by [`AddTrend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrendKind {
    /// `LINEAR_TREND_COEFF * t`.
    #[default]
    Linear,
    /// `QUADRATIC_TREND_COEFF * t^2`.
    Quadratic,
}

impl TrendKind {
    /// Trend value at time `t`.
    #[must_use]
    pub fn at(&self, t: f64) -> f64 {
        match self {
            Self::Linear => LINEAR_TREND_COEFF * t,
            Self::Quadratic => QUADRATIC_TREND_COEFF * t * t,
        }
    }

    /// Lowercase name of the trend.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Quadratic => "quadratic",
        }
    }
}

impl fmt::Display for TrendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            other => Err(CoreError::invalid(
                "kind",
                format!("unknown trend '{other}' (expected linear or quadratic)"),
            )),
        }
    }
}

/// Configuration for trend augmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AddTrendConfig {
    /// Trend shape.
    pub kind: TrendKind,
}

/// Adds a fixed linear or quadratic trend over time.
///
/// Coefficients are [`LINEAR_TREND_COEFF`] and [`QUADRATIC_TREND_COEFF`].
#[derive(Debug, Clone, Default)]
pub struct AddTrend {
    config: AddTrendConfig,
}

impl AddTrend {
    /// Create a new trend transform.
    #[must_use]
    pub fn new(kind: TrendKind) -> Self {
        Self {
            config: AddTrendConfig { kind },
        }
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: AddTrendConfig) -> Self {
        Self { config }
    }
}

impl Transform for AddTrend {
    fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
        let kind = self.config.kind;
        let values = signal.iter().map(|(t, v)| v + kind.at(t)).collect();
        signal.with_values(values)
    }

    fn name(&self) -> &str {
        "AddTrend"
    }
}

// =============================================================================
// AddDiscontinuity: step jump
// =============================================================================

/// Configuration for discontinuity augmentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddDiscontinuityConfig {
    /// Time in seconds from which the jump applies.
    pub break_time: f64,
    /// Value added to every sample at or after `break_time`.
    pub jump: f64,
}

impl Default for AddDiscontinuityConfig {
    fn default() -> Self {
        Self {
            break_time: 2.0,
            jump: 2.0,
        }
    }
}

/// Adds a constant to every sample with `t >= break_time`.
///
/// A break time before the first sample shifts the whole signal; one after
/// the last sample leaves it unchanged.
#[derive(Debug, Clone, Default)]
pub struct AddDiscontinuity {
    config: AddDiscontinuityConfig,
}

impl AddDiscontinuity {
    /// Create a new discontinuity transform.
    #[must_use]
    pub fn new(break_time: f64, jump: f64) -> Self {
        Self {
            config: AddDiscontinuityConfig { break_time, jump },
        }
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: AddDiscontinuityConfig) -> Self {
        Self { config }
    }
}

impl Transform for AddDiscontinuity {
    fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
        let break_time = ensure_finite("break_time", self.config.break_time)?;
        let jump = ensure_finite("jump", self.config.jump)?;

        let start = signal.times().partition_point(|&t| t < break_time);
        let mut values = signal.values().to_vec();
        for v in &mut values[start..] {
            *v += jump;
        }

        signal.with_values(values)
    }

    fn name(&self) -> &str {
        "AddDiscontinuity"
    }
}

// =============================================================================
// AddSuddenChange: amplitude pivot
// =============================================================================

/// Configuration for sudden amplitude change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddSuddenChangeConfig {
    /// Pivot time in seconds.
    pub change_time: f64,
    /// Peak magnitude the post-pivot segment is scaled towards.
    pub new_amplitude: f64,
}

impl Default for AddSuddenChangeConfig {
    fn default() -> Self {
        Self {
            change_time: 2.0,
            new_amplitude: 2.0,
        }
    }
}

/// Rescales the signal from `change_time` on.
///
/// With `old_max` the largest `|value|` strictly before the pivot, every
/// sample at or after the pivot is multiplied by `new_amplitude / old_max`
/// (or by 1 when `old_max` is zero).
#[derive(Debug, Clone, Default)]
pub struct AddSuddenChange {
    config: AddSuddenChangeConfig,
}

impl AddSuddenChange {
    /// Create a new sudden-change transform.
    #[must_use]
    pub fn new(change_time: f64, new_amplitude: f64) -> Self {
        Self {
            config: AddSuddenChangeConfig {
                change_time,
                new_amplitude,
            },
        }
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: AddSuddenChangeConfig) -> Self {
        Self { config }
    }

    /// Index of the pivot and the scale factor applied from there on.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a parameter is not finite or no sample
    /// lies before `change_time`.
    pub fn pivot(&self, signal: &Signal) -> Result<(usize, f64)> {
        let change_time = ensure_finite("change_time", self.config.change_time)?;
        let new_amplitude = ensure_finite("new_amplitude", self.config.new_amplitude)?;

        let pivot = signal.times().partition_point(|&t| t < change_time);
        if pivot == 0 {
            return Err(CoreError::invalid(
                "change_time",
                format!("no samples before t = {change_time}, the reference peak is undefined"),
            ));
        }

        let old_max = signal.values()[..pivot]
            .iter()
            .fold(0.0f64, |acc, v| acc.max(v.abs()));
        let factor = if old_max != 0.0 {
            new_amplitude / old_max
        } else {
            1.0
        };

        Ok((pivot, factor))
    }
}

impl Transform for AddSuddenChange {
    fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
        let (pivot, factor) = self.pivot(signal)?;

        let mut values = signal.values().to_vec();
        for v in &mut values[pivot..] {
            *v *= factor;
        }

        signal.with_values(values)
    }

    fn name(&self) -> &str {
        "AddSuddenChange"
    }
}

// =============================================================================
// AugmentationConfig: serializable augmentation chain entries
// =============================================================================

/// One step of an augmentation chain, as stored in configuration files.
///
/// ```rust
/// use sigaf_transforms::augment::AugmentationConfig;
///
/// let step: AugmentationConfig =
///     serde_json::from_str(r#"{"type":"trend","kind":"quadratic"}"#).unwrap();
/// assert_eq!(step.name(), "trend");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AugmentationConfig {
    /// See [`AddNoise`].
    Noise(AddNoiseConfig),
    /// See [`AddTrend`].
    Trend(AddTrendConfig),
    /// See [`AddDiscontinuity`].
    Discontinuity(AddDiscontinuityConfig),
    /// See [`AddSuddenChange`].
    SuddenChange(AddSuddenChangeConfig),
}

impl AugmentationConfig {
    /// Build the transform described by this entry.
    #[must_use]
    pub fn build(&self) -> Box<dyn Transform> {
        match self {
            Self::Noise(c) => Box::new(AddNoise::from_config(c.clone())),
            Self::Trend(c) => Box::new(AddTrend::from_config(c.clone())),
            Self::Discontinuity(c) => Box::new(AddDiscontinuity::from_config(c.clone())),
            Self::SuddenChange(c) => Box::new(AddSuddenChange::from_config(c.clone())),
        }
    }

    /// Short name of the augmentation.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Noise(_) => "noise",
            Self::Trend(_) => "trend",
            Self::Discontinuity(_) => "discontinuity",
            Self::SuddenChange(_) => "sudden_change",
        }
    }
}

/// Chain the configured augmentations in the given order.
#[must_use]
pub fn compose(steps: &[AugmentationConfig]) -> Compose {
    Compose::from_vec(steps.iter().map(AugmentationConfig::build).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigaf_core::Seed;

    /// 1 Hz sine sampled at 1 kHz for one second on a linspace axis.
    fn sine() -> Signal {
        let n = 1000;
        let t: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
        let v = t.iter().map(|&t| (2.0 * std::f64::consts::PI * t).sin()).collect();
        Signal::new(t, v).unwrap()
    }

    fn rng() -> SignalRng {
        Seed::new(42).to_rng()
    }

    #[test]
    fn test_noise_config() {
        let config = AddNoiseConfig::default();
        assert_eq!(config.snr_db, 20.0);
        assert_eq!(AddNoise::new(10.0).config.snr_db, 10.0);
    }

    #[test]
    fn test_noise_power_matches_snr() {
        let signal = sine();
        let noise = AddNoise::new(10.0);
        let expected = signal.variance() / 10.0;
        assert!((noise.noise_power(&signal).unwrap() - expected).abs() < 1e-12);

        let noisy = noise.apply(&signal, &mut rng()).unwrap();
        let residual: Vec<f64> = noisy
            .values()
            .iter()
            .zip(signal.values())
            .map(|(a, b)| a - b)
            .collect();
        let power = residual.iter().map(|r| r * r).sum::<f64>() / residual.len() as f64;

        assert_eq!(noisy.times(), signal.times());
        assert!((power / expected - 1.0).abs() < 0.2, "power = {power}, expected = {expected}");
    }

    #[test]
    fn test_noise_is_reproducible() {
        let signal = sine();
        let a = AddNoise::new(5.0).apply(&signal, &mut rng()).unwrap();
        let b = AddNoise::new(5.0).apply(&signal, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_rejects_constant_signal() {
        let flat = Signal::new(vec![0.0, 1.0, 2.0], vec![3.0, 3.0, 3.0]).unwrap();
        let err = AddNoise::new(20.0).apply(&flat, &mut rng()).unwrap_err();
        assert!(matches!(err, CoreError::NumericError(_)));

        let err = AddNoise::new(f64::NAN).apply(&sine(), &mut rng()).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_noise_high_snr_is_near_silent() {
        let signal = sine();
        let noisy = AddNoise::new(200.0).apply(&signal, &mut rng()).unwrap();
        for (a, b) in noisy.values().iter().zip(signal.values()) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn test_trend_coefficients() {
        let signal = Signal::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();

        let linear = AddTrend::new(TrendKind::Linear).apply(&signal, &mut rng()).unwrap();
        assert_eq!(linear.values(), &[1.0, 1.5, 2.0]);

        let quadratic = AddTrend::new(TrendKind::Quadratic)
            .apply(&signal, &mut rng())
            .unwrap();
        assert!((quadratic.values()[1] - 1.1).abs() < 1e-12);
        assert!((quadratic.values()[2] - 1.4).abs() < 1e-12);

        assert_eq!("quadratic".parse::<TrendKind>().unwrap(), TrendKind::Quadratic);
        assert!("cubic".parse::<TrendKind>().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_discontinuity_step() {
        let signal = sine();
        let half = signal.len() / 2;
        let break_time = signal.times()[half];

        let out = AddDiscontinuity::new(break_time, 5.0)
            .apply(&signal, &mut rng())
            .unwrap();

        for i in 0..signal.len() {
            let diff = out.values()[i] - signal.values()[i];
            if i >= half {
                assert!((diff - 5.0).abs() < 1e-12);
            } else {
                assert_eq!(diff, 0.0);
            }
        }
    }

    #[test]
    fn test_discontinuity_outside_axis() {
        let signal = sine();

        let after = AddDiscontinuity::new(10.0, 3.0).apply(&signal, &mut rng()).unwrap();
        assert_eq!(after, signal);

        let before = AddDiscontinuity::new(-1.0, 3.0).apply(&signal, &mut rng()).unwrap();
        for (a, b) in before.values().iter().zip(signal.values()) {
            assert!((a - b - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_sudden_change_scales_linearly() {
        let signal = sine();
        let change = AddSuddenChange::new(0.5, 2.0);
        let (pivot, factor) = change.pivot(&signal).unwrap();
        let out = change.apply(&signal, &mut rng()).unwrap();

        assert_eq!(&out.values()[..pivot], &signal.values()[..pivot]);
        for i in pivot..signal.len() {
            assert!((out.values()[i] - factor * signal.values()[i]).abs() < 1e-12);
            assert!(out.values()[i].abs() <= 2.0 + 1e-6);
        }
    }

    #[test]
    fn test_sudden_change_zero_reference() {
        let signal = Signal::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 0.0, 4.0, -4.0]).unwrap();
        let out = AddSuddenChange::new(1.5, 10.0).apply(&signal, &mut rng()).unwrap();
        assert_eq!(out, signal);
    }

    #[test]
    fn test_sudden_change_requires_prefix() {
        let signal = sine();
        for change_time in [0.0, -1.0] {
            let err = AddSuddenChange::new(change_time, 1.0)
                .apply(&signal, &mut rng())
                .unwrap_err();
            assert!(err.is_invalid_parameter());
        }
    }

    #[test]
    fn test_input_is_untouched() {
        let signal = sine();
        let snapshot = signal.clone();
        let chain = Compose::new()
            .add(AddNoise::new(10.0))
            .add(AddTrend::new(TrendKind::Quadratic))
            .add(AddDiscontinuity::new(0.3, -1.0))
            .add(AddSuddenChange::new(0.6, 0.5));

        let out = chain.apply(&signal, &mut rng()).unwrap();
        assert_eq!(signal, snapshot);
        assert_eq!(out.len(), signal.len());
        assert_eq!(out.times(), signal.times());
    }

    #[test]
    fn test_order_is_not_normalized() {
        let signal = sine();
        let trend_first = compose(&[
            AugmentationConfig::Trend(AddTrendConfig::default()),
            AugmentationConfig::SuddenChange(AddSuddenChangeConfig {
                change_time: 0.5,
                new_amplitude: 3.0,
            }),
        ]);
        let change_first = compose(&[
            AugmentationConfig::SuddenChange(AddSuddenChangeConfig {
                change_time: 0.5,
                new_amplitude: 3.0,
            }),
            AugmentationConfig::Trend(AddTrendConfig::default()),
        ]);

        let a = trend_first.apply(&signal, &mut rng()).unwrap();
        let b = change_first.apply(&signal, &mut rng()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_augmentation_config_serde() {
        let steps = vec![
            AugmentationConfig::Noise(AddNoiseConfig { snr_db: 15.0 }),
            AugmentationConfig::Trend(AddTrendConfig {
                kind: TrendKind::Quadratic,
            }),
            AugmentationConfig::Discontinuity(AddDiscontinuityConfig::default()),
            AugmentationConfig::SuddenChange(AddSuddenChangeConfig::default()),
        ];
        let json = serde_json::to_string(&steps).unwrap();
        assert!(json.contains(r#""type":"sudden_change""#));

        let restored: Vec<AugmentationConfig> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, steps);
        assert_eq!(compose(&restored).len(), 4);

        assert!(serde_json::from_str::<AugmentationConfig>(r#"{"type":"trend","kind":"cubic"}"#).is_err());
    }
}
