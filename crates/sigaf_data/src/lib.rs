//! # sigaf_data
//!
//! Base signal synthesis for sigaf.
//!
//! This crate provides:
//! - [`Waveform`] families (sine, square, triangle, random noise)
//! - [`SynthConfig`] and [`SignalSynthesizer`] for building a [`sigaf_core::Signal`]
//! - Helpers for the sampling grid ([`sample_count`], [`time_axis`])
//!
//! ## Example
//!
//! ```rust
//! use sigaf_core::Seed;
//! use sigaf_data::{synthesize, NoiseDistribution, SynthConfig, Waveform};
//!
//! let config = SynthConfig {
//!     waveform: Waveform::Random { distribution: NoiseDistribution::Uniform },
//!     fs: 50.0,
//!     duration: 2.0,
//!     ..Default::default()
//! };
//! let signal = synthesize(&config, &mut Seed::new(42).to_rng())?;
//! assert_eq!(signal.len(), 100);
//! # Ok::<(), sigaf_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod synth;

pub use synth::{
    sample_count, square_wave, synthesize, time_axis, triangle_wave, NoiseDistribution,
    SignalSynthesizer, SynthConfig, Waveform, MAX_SAMPLES,
};
