//! # sigaf_core
//!
//! Core types and traits shared by the sigaf crates.
//!
//! This crate provides:
//! - [`Signal`], the validated `(t, value)` sample sequence every stage passes along
//! - [`Seed`] and [`SignalRng`] for deterministic random number generation
//! - [`Transform`] trait and [`Compose`] for chaining augmentations
//! - [`CoreError`] and the crate-wide [`Result`] alias
//!
//! ## Example
//!
//! ```rust
//! use sigaf_core::{Compose, Identity, Seed, Signal, Transform};
//!
//! let signal = Signal::new(vec![0.0, 0.5, 1.0], vec![0.0, 2.0, 1.0])?;
//! let mut rng = Seed::new(42).to_rng();
//!
//! let out = Compose::new().add(Identity).apply(&signal, &mut rng)?;
//! assert_eq!(out.len(), 3);
//! assert_eq!(out.max(), 2.0);
//! # Ok::<(), sigaf_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod seed;
mod signal;
mod transform;

pub use error::{ensure_finite, ensure_positive, CoreError, Result};
pub use seed::{standard_normal, Seed, SignalRng};
pub use signal::Signal;
pub use transform::{Compose, Identity, Transform};
