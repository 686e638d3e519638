//! Control sequence genome
//!
//! A genome is an ordered list of `(left, right)` wheel-speed pairs, one per
//! unit timestep. The list starts at the configured horizon and can only get
//! shorter through the shrink operators; there is no way to append steps.

use std::ops::Index;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenomeError;
use crate::genome::bounds::Bounds;
use crate::genome::traits::EvolutionaryGenome;

/// Wheel speeds applied for a single timestep
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlPair {
    /// Left wheel speed in `[0, 1]`
    pub left: f64,
    /// Right wheel speed in `[0, 1]`
    pub right: f64,
}

impl ControlPair {
    /// Create a control pair without range checks
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Forward speed of the tractor, `u1 = (left + right) / 2`
    pub fn forward_speed(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// Heading change per step, `u2 = left - right`
    pub fn turn_rate(&self) -> f64 {
        self.left - self.right
    }

    /// Check both wheels against the bounds
    pub fn is_within(&self, bounds: &Bounds) -> bool {
        bounds.contains(self.left) && bounds.contains(self.right)
    }

    fn random<R: Rng>(rng: &mut R, bounds: &Bounds) -> Self {
        Self {
            left: bounds.sample(rng),
            right: bounds.sample(rng),
        }
    }
}

impl From<(f64, f64)> for ControlPair {
    fn from((left, right): (f64, f64)) -> Self {
        Self::new(left, right)
    }
}

/// Variable-length sequence of control pairs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlSequence {
    controls: Vec<ControlPair>,
}

impl ControlSequence {
    /// Create a sequence, checking every wheel speed against `[0, 1]`
    pub fn new(controls: Vec<ControlPair>) -> Result<Self, GenomeError> {
        let unit = Bounds::unit();
        for (step, pair) in controls.iter().enumerate() {
            for value in [pair.left, pair.right] {
                if !unit.contains(value) {
                    return Err(GenomeError::SpeedOutOfRange { step, value });
                }
            }
        }
        Ok(Self { controls })
    }

    /// Create a sequence from raw `(left, right)` tuples
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, GenomeError> {
        Self::new(pairs.iter().copied().map(ControlPair::from).collect())
    }

    /// The same control repeated `length` times
    pub fn constant(pair: ControlPair, length: usize) -> Result<Self, GenomeError> {
        Self::new(vec![pair; length])
    }

    /// Build from operator output whose values are already in range
    pub(crate) fn from_vec(controls: Vec<ControlPair>) -> Self {
        Self { controls }
    }

    /// Number of timesteps
    pub fn len(&self) -> usize {
        self.controls.len()
    }

    /// Whether the sequence holds no steps
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Borrow the control pairs
    pub fn controls(&self) -> &[ControlPair] {
        &self.controls
    }

    /// Mutable access to the pairs; the length cannot change through this
    pub fn controls_mut(&mut self) -> &mut [ControlPair] {
        &mut self.controls
    }

    /// Iterate over the control pairs
    pub fn iter(&self) -> std::slice::Iter<'_, ControlPair> {
        self.controls.iter()
    }

    /// Drop the final step, refusing to go below one step.
    ///
    /// Returns `true` when a step was removed.
    pub fn shrink(&mut self) -> bool {
        if self.controls.len() > 1 {
            self.controls.pop();
            true
        } else {
            false
        }
    }

    /// Copy the pairs out as plain tuples
    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        self.controls.iter().map(|c| (c.left, c.right)).collect()
    }
}

impl EvolutionaryGenome for ControlSequence {
    fn dimension(&self) -> usize {
        self.controls.len()
    }

    fn generate<R: Rng>(rng: &mut R, length: usize, bounds: &Bounds) -> Self {
        Self {
            controls: (0..length).map(|_| ControlPair::random(rng, bounds)).collect(),
        }
    }
}

impl Index<usize> for ControlSequence {
    type Output = ControlPair;

    fn index(&self, index: usize) -> &Self::Output {
        &self.controls[index]
    }
}

impl<'a> IntoIterator for &'a ControlSequence {
    type Item = &'a ControlPair;
    type IntoIter = std::slice::Iter<'a, ControlPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.controls.iter()
    }
}
