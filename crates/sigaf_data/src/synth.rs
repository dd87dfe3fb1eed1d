//! Waveform synthesis.
//!
//! Builds a [`Signal`] from a waveform family and its parameters:
//! - periodic shapes (sine, square, triangle) driven by a frequency
//! - i.i.d. noise (normal, uniform, binomial) drawn from an injected generator

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use sigaf_core::{
    ensure_finite, ensure_positive, standard_normal, CoreError, Result, Signal, SignalRng,
};

/// Upper bound on the number of samples a single synthesis may produce.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Law used by the [`Waveform::Random`] family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NoiseDistribution {
    /// Standard normal draws.
    #[default]
    Normal,
    /// Uniform draws in `[-1, 1)`.
    Uniform,
    /// Fair coin flips mapped to `{-1, +1}`.
    Binomial,
}

impl NoiseDistribution {
    /// All distributions, in declaration order.
    pub const ALL: [Self; 3] = [Self::Normal, Self::Uniform, Self::Binomial];

    /// Draw a single sample.
    pub fn sample(&self, rng: &mut SignalRng) -> f64 {
        match self {
            Self::Normal => standard_normal(rng),
            Self::Uniform => rng.gen_range(-1.0..1.0),
            Self::Binomial => {
                if rng.gen_bool(0.5) {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }

    /// Lowercase name of the distribution.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Uniform => "uniform",
            Self::Binomial => "binomial",
        }
    }
}

impl fmt::Display for NoiseDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseDistribution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "gaussian" => Ok(Self::Normal),
            "uniform" => Ok(Self::Uniform),
            "binomial" | "bernoulli" => Ok(Self::Binomial),
            other => Err(CoreError::invalid(
                "distribution",
                format!("unknown distribution '{other}' (expected normal, uniform or binomial)"),
            )),
        }
    }
}

/// Shape family of a synthesized signal.
///
/// Periodic families carry their frequency in Hz; the random family
/// carries its noise law and has no frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waveform {
    /// `sin(2πft)`.
    Sine {
        /// Frequency in Hz.
        frequency: f64,
    },
    /// 50% duty-cycle square wave, `+1` at zero crossings.
    Square {
        /// Frequency in Hz.
        frequency: f64,
    },
    /// Symmetric triangle wave rising over the first half period.
    Triangle {
        /// Frequency in Hz.
        frequency: f64,
    },
    /// I.i.d. noise.
    Random {
        /// Noise law.
        #[serde(default)]
        distribution: NoiseDistribution,
    },
}

impl Default for Waveform {
    fn default() -> Self {
        Self::Sine { frequency: 1.0 }
    }
}

impl Waveform {
    /// Build a waveform from its name.
    ///
    /// `frequency` is used by the periodic families and `distribution` by
    /// `random`. Accepts `sine`/`sinusoidal`, `square`, `triangle`/`triangular`
    /// and `random`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for any other name.
    pub fn from_name(name: &str, frequency: f64, distribution: NoiseDistribution) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sine" | "sinusoidal" => Ok(Self::Sine { frequency }),
            "square" => Ok(Self::Square { frequency }),
            "triangle" | "triangular" => Ok(Self::Triangle { frequency }),
            "random" => Ok(Self::Random { distribution }),
            other => Err(CoreError::invalid(
                "waveform",
                format!("unknown waveform '{other}' (expected sine, square, triangle or random)"),
            )),
        }
    }

    /// Lowercase family name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sine { .. } => "sine",
            Self::Square { .. } => "square",
            Self::Triangle { .. } => "triangle",
            Self::Random { .. } => "random",
        }
    }

    /// Frequency of periodic families, `None` for random.
    #[must_use]
    pub const fn frequency(&self) -> Option<f64> {
        match self {
            Self::Sine { frequency } | Self::Square { frequency } | Self::Triangle { frequency } => {
                Some(*frequency)
            }
            Self::Random { .. } => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(frequency) = self.frequency() {
            ensure_positive("frequency", frequency)?;
        }
        Ok(())
    }
}

/// Configuration for signal synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthConfig {
    /// Waveform family and its parameters.
    pub waveform: Waveform,
    /// Constant added to every sample.
    pub offset: f64,
    /// Scale applied to the unit waveform.
    pub amplitude: f64,
    /// Sampling rate in samples per second.
    pub fs: f64,
    /// Signal duration in seconds.
    pub duration: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            waveform: Waveform::default(),
            offset: 0.0,
            amplitude: 1.0,
            fs: 100.0,
            duration: 5.0,
        }
    }
}

impl SynthConfig {
    /// Check every parameter and return the sample count `floor(fs * duration)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `fs`, `duration` or a periodic frequency
    /// is not strictly positive, if `offset`/`amplitude` are not finite, or
    /// if the sample count falls outside `1..=MAX_SAMPLES`.
    pub fn validate(&self) -> Result<usize> {
        ensure_positive("fs", self.fs)?;
        ensure_positive("duration", self.duration)?;
        ensure_finite("offset", self.offset)?;
        ensure_finite("amplitude", self.amplitude)?;
        self.waveform.validate()?;
        sample_count(self.fs, self.duration)
    }
}

/// Number of samples produced for a sampling rate and duration.
///
/// # Errors
///
/// Returns `InvalidParameter` unless `1 <= floor(fs * duration) <= MAX_SAMPLES`.
pub fn sample_count(fs: f64, duration: f64) -> Result<usize> {
    let n = (fs * duration).floor();
    if n.is_nan() || n < 1.0 {
        return Err(CoreError::invalid(
            "duration",
            format!("fs * duration = {} yields no samples", fs * duration),
        ));
    }
    if n > MAX_SAMPLES as f64 {
        return Err(CoreError::invalid(
            "duration",
            format!("fs * duration = {n} exceeds the limit of {MAX_SAMPLES} samples"),
        ));
    }
    Ok(n as usize)
}

/// `n` evenly spaced times from 0 to `duration`, both ends included.
///
/// A single sample sits at `t = 0`.
#[must_use]
pub fn time_axis(n: usize, duration: f64) -> Vec<f64> {
    if n <= 1 {
        return vec![0.0; n];
    }
    let last = (n - 1) as f64;
    (0..n).map(|i| duration * i as f64 / last).collect()
}

/// Unit square wave: `sign(sin(2πx))` with `sign(0) = +1`.
#[must_use]
pub fn square_wave(x: f64) -> f64 {
    if (2.0 * PI * x).sin() >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// Unit symmetric triangle wave with period 1.
///
/// Starts at -1, peaks at +1 half a period later and returns to -1.
#[must_use]
pub fn triangle_wave(x: f64) -> f64 {
    let phase = x.rem_euclid(1.0);
    if phase < 0.5 {
        4.0 * phase - 1.0
    } else {
        3.0 - 4.0 * phase
    }
}

/// Produces base signals from a [`SynthConfig`].
///
/// # Example
///
/// ```rust
/// use sigaf_core::Seed;
/// use sigaf_data::{SignalSynthesizer, SynthConfig, Waveform};
///
/// let synth = SignalSynthesizer::from_config(SynthConfig {
///     waveform: Waveform::Sine { frequency: 1.0 },
///     fs: 1000.0,
///     duration: 1.0,
///     ..Default::default()
/// });
/// let signal = synth.synthesize(&mut Seed::new(0).to_rng())?;
/// assert_eq!(signal.len(), 1000);
/// # Ok::<(), sigaf_core::CoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SignalSynthesizer {
    config: SynthConfig,
}

impl SignalSynthesizer {
    /// Create a synthesizer for a waveform with unit amplitude and no offset.
    #[must_use]
    pub fn new(waveform: Waveform, fs: f64, duration: f64) -> Self {
        Self {
            config: SynthConfig {
                waveform,
                fs,
                duration,
                ..Default::default()
            },
        }
    }

    /// Create from config.
    #[must_use]
    pub fn from_config(config: SynthConfig) -> Self {
        Self { config }
    }

    /// Set the offset.
    #[must_use]
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.config.offset = offset;
        self
    }

    /// Set the amplitude.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.config.amplitude = amplitude;
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Generate the signal.
    ///
    /// Only the random family draws from `rng`; periodic families leave it
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when [`SynthConfig::validate`] fails and
    /// `NumericError` if the scaled samples overflow.
    pub fn synthesize(&self, rng: &mut SignalRng) -> Result<Signal> {
        let cfg = &self.config;
        let n = cfg.validate()?;
        let t = time_axis(n, cfg.duration);

        let unit: Vec<f64> = match cfg.waveform {
            Waveform::Sine { frequency } => {
                t.iter().map(|&ti| (2.0 * PI * frequency * ti).sin()).collect()
            }
            Waveform::Square { frequency } => t.iter().map(|&ti| square_wave(frequency * ti)).collect(),
            Waveform::Triangle { frequency } => {
                t.iter().map(|&ti| triangle_wave(frequency * ti)).collect()
            }
            Waveform::Random { distribution } => (0..n).map(|_| distribution.sample(rng)).collect(),
        };

        let values = unit.into_iter().map(|u| cfg.offset + cfg.amplitude * u).collect();

        tracing::debug!(
            waveform = cfg.waveform.name(),
            samples = n,
            fs = cfg.fs,
            duration = cfg.duration,
            "synthesized signal"
        );

        Signal::new(t, values)
    }
}

/// Synthesize a signal in one call.
///
/// Shorthand for `SignalSynthesizer::from_config(config.clone()).synthesize(rng)`.
pub fn synthesize(config: &SynthConfig, rng: &mut SignalRng) -> Result<Signal> {
    SignalSynthesizer::from_config(config.clone()).synthesize(rng)
}
