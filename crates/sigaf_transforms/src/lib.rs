//! # sigaf_transforms
//!
//! Signal augmentations and imaging transforms.
//!
//! This crate provides:
//! - Augmentation transforms (noise at a target SNR, trend, discontinuity,
//!   sudden amplitude change)
//! - Imaging transforms (Gramian Angular Summation / Difference Fields)
//!
//! ## Augmentation Example
//!
//! ```rust
//! use sigaf_core::{Compose, Seed, Signal, Transform};
//! use sigaf_transforms::augment::{AddDiscontinuity, AddTrend, TrendKind};
//!
//! let signal = Signal::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0])?;
//! let transform = Compose::new()
//!     .add(AddTrend::new(TrendKind::Linear))
//!     .add(AddDiscontinuity::new(1.0, 5.0));
//!
//! let out = transform.apply(&signal, &mut Seed::new(42).to_rng())?;
//! assert_eq!(out.values(), &[0.0, 6.5, 6.0]);
//! # Ok::<(), sigaf_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod augment;
pub mod imaging;

pub use augment::*;
pub use imaging::*;
