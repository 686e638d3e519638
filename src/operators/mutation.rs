//! Mutation operators

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::OperatorError;
use crate::genome::bounds::Bounds;
use crate::genome::control_sequence::ControlSequence;
use crate::operators::traits::{MutationOperator, MutationOutcome};

/// Gaussian perturbation or shrink.
///
/// Each call either removes the final control pair (probability
/// `shrink_probability`, only when more than one pair remains) or walks the
/// sequence and, with probability `gene_probability` per pair, adds
/// `N(0, sigma)` noise to both wheel speeds before clamping them back into
/// bounds. Never both.
#[derive(Clone, Debug)]
pub struct GaussianShrinkMutation {
    sigma: f64,
    gene_probability: f64,
    shrink_probability: f64,
    bounds: Bounds,
}

fn check_probability(name: &str, p: f64) -> Result<(), OperatorError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(OperatorError::InvalidConfiguration(format!(
            "{name} must be in [0, 1], got {p}"
        )))
    }
}

impl GaussianShrinkMutation {
    pub fn new(
        sigma: f64,
        gene_probability: f64,
        shrink_probability: f64,
    ) -> Result<Self, OperatorError> {
        check_probability("per-gene mutation probability", gene_probability)?;
        check_probability("shrink probability", shrink_probability)?;
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(OperatorError::InvalidConfiguration(format!(
                "sigma must be finite and non-negative, got {sigma}"
            )));
        }
        Ok(Self {
            sigma,
            gene_probability,
            shrink_probability,
            bounds: Bounds::unit(),
        })
    }

    /// Clamp perturbed speeds into `bounds` instead of `[0, 1]`
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn gene_probability(&self) -> f64 {
        self.gene_probability
    }

    pub fn shrink_probability(&self) -> f64 {
        self.shrink_probability
    }

    fn noise<R: Rng>(&self, rng: &mut R) -> f64 {
        self.sigma * rng.sample::<f64, _>(StandardNormal)
    }
}

impl Default for GaussianShrinkMutation {
    fn default() -> Self {
        Self {
            sigma: 0.1,
            gene_probability: 0.2,
            shrink_probability: 0.01,
            bounds: Bounds::unit(),
        }
    }
}

impl MutationOperator<ControlSequence> for GaussianShrinkMutation {
    fn mutate<R: Rng>(&self, genome: &mut ControlSequence, rng: &mut R) -> MutationOutcome {
        if rng.gen::<f64>() < self.shrink_probability && genome.shrink() {
            return MutationOutcome::Shrunk;
        }

        let mut genes = 0;
        for control in genome.controls_mut() {
            if rng.gen::<f64>() < self.gene_probability {
                control.left = self.bounds.clamp(control.left + self.noise(rng));
                control.right = self.bounds.clamp(control.right + self.noise(rng));
                genes += 1;
            }
        }
        MutationOutcome::Perturbed { genes }
    }
}
