//! # sigaf
//!
//! Synthetic time series and their Gramian Angular Field images.
//!
//! sigaf runs a strictly forward pipeline:
//!
//! - **Synthesis**: sine, square, triangle or random-noise base signals
//! - **Augmentation**: SNR-sized noise, trends, discontinuities, sudden
//!   amplitude changes, composed in any order
//! - **Imaging**: Gramian Angular Summation / Difference Fields
//!
//! Every random draw comes from a generator seeded through [`core::Seed`],
//! so a run is reproducible bit for bit.
//!
//! ## Quick Start
//!
//! ```rust
//! use sigaf::prelude::*;
//!
//! let config = SynthConfig {
//!     waveform: Waveform::Sine { frequency: 2.0 },
//!     fs: 64.0,
//!     duration: 1.0,
//!     ..Default::default()
//! };
//! let mut rng = Seed::new(42).to_rng();
//!
//! let signal = synthesize(&config, &mut rng)?;
//! let signal = AddNoise::new(20.0).apply(&signal, &mut rng)?;
//! let gasf = TSToGAF::summation().encode(&signal)?;
//! assert_eq!(gasf.size(), 64);
//! # Ok::<(), sigaf::core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export all crates
pub use sigaf_core as core;
pub use sigaf_data as data;
pub use sigaf_transforms as transforms;

pub mod pipeline;

/// Prelude module for convenient imports.
///
/// ```rust
/// use sigaf::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use sigaf_core::{Compose, CoreError, Result, Seed, Signal, SignalRng, Transform};

    // Synthesis
    pub use sigaf_data::{synthesize, NoiseDistribution, SignalSynthesizer, SynthConfig, Waveform};

    // Transforms
    pub use sigaf_transforms::{
        AddDiscontinuity, AddNoise, AddSuddenChange, AddTrend, AugmentationConfig,
        DegeneratePolicy, GAFConfig, GAFType, GramianField, TSToGAF, TrendKind,
    };

    // Pipeline
    pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineOutput};
}
