//! Transform trait for signal augmentation.

use crate::error::Result;
use crate::seed::SignalRng;
use crate::signal::Signal;

/// A distortion applied to a [`Signal`].
///
/// Transforms read their input by reference and return a new signal with
/// the same time axis, so an upstream signal can keep being used after a
/// transform has run on it.
///
/// # Implementation Notes
///
/// - Randomized transforms must draw only from the `rng` they are handed
/// - Transforms return `Result` instead of panicking
/// - Output length and time axis must match the input
///
/// # Example
///
/// ```rust
/// use sigaf_core::{Result, Signal, SignalRng, Transform};
///
/// struct Negate;
///
/// impl Transform for Negate {
///     fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
///         signal.with_values(signal.values().iter().map(|v| -v).collect())
///     }
/// }
/// ```
pub trait Transform: Send + Sync {
    /// Apply the transform, producing a new signal.
    ///
    /// # Arguments
    ///
    /// * `signal` - The input signal, left unchanged
    /// * `rng` - Generator for transforms that need randomness
    fn apply(&self, signal: &Signal, rng: &mut SignalRng) -> Result<Signal>;

    /// Get the name of this transform for logging/debugging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Identity transform that returns a copy of its input.
#[derive(Debug, Clone, Default)]
pub struct Identity;

impl Transform for Identity {
    fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
        Ok(signal.clone())
    }

    fn name(&self) -> &str {
        "Identity"
    }
}

/// Applies several transforms one after another, in insertion order.
///
/// Order matters whenever effects do not commute (a trend added before a
/// discontinuity is not the same signal as the reverse), and `Compose`
/// never reorders.
#[derive(Default)]
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    /// Create a new empty composition.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a transform and return the composition (builder style).
    #[must_use]
    pub fn add<T: Transform + 'static>(mut self, transform: T) -> Self {
        self.push(transform);
        self
    }

    /// Append a transform.
    pub fn push<T: Transform + 'static>(&mut self, transform: T) {
        self.transforms.push(Box::new(transform));
    }

    /// Create a composition from boxed transforms.
    #[must_use]
    pub fn from_vec(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }

    /// Number of transforms in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Check if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl Transform for Compose {
    fn apply(&self, signal: &Signal, rng: &mut SignalRng) -> Result<Signal> {
        let mut current = signal.clone();
        for transform in &self.transforms {
            tracing::debug!(transform = transform.name(), samples = current.len(), "applying transform");
            current = transform.apply(&current, rng)?;
        }
        Ok(current)
    }

    fn name(&self) -> &str {
        "Compose"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;

    struct AddConst(f64);

    impl Transform for AddConst {
        fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
            signal.with_values(signal.values().iter().map(|v| v + self.0).collect())
        }
    }

    struct Scale(f64);

    impl Transform for Scale {
        fn apply(&self, signal: &Signal, _rng: &mut SignalRng) -> Result<Signal> {
            signal.with_values(signal.values().iter().map(|v| v * self.0).collect())
        }
    }

    fn signal() -> Signal {
        Signal::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).unwrap()
    }

    #[test]
    fn test_identity_name() {
        assert_eq!(Identity.name(), "Identity");
        let mut rng = Seed::new(0).to_rng();
        assert_eq!(Identity.apply(&signal(), &mut rng).unwrap(), signal());
    }

    #[test]
    fn test_compose_preserves_order() {
        let mut rng = Seed::new(0).to_rng();
        let add_then_scale = Compose::new().add(AddConst(1.0)).add(Scale(2.0));
        let scale_then_add = Compose::new().add(Scale(2.0)).add(AddConst(1.0));

        let a = add_then_scale.apply(&signal(), &mut rng).unwrap();
        let b = scale_then_add.apply(&signal(), &mut rng).unwrap();

        assert_eq!(a.values(), &[4.0, 6.0, 8.0]);
        assert_eq!(b.values(), &[3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_empty_compose_is_identity() {
        let mut rng = Seed::new(0).to_rng();
        let compose = Compose::new();
        assert!(compose.is_empty());
        assert_eq!(compose.apply(&signal(), &mut rng).unwrap(), signal());
    }
}
