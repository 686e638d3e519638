//! Fitness traits
//!
//! Fitness is a cost: lower values are better and [`INFEASIBLE`] marks a
//! genome that violated a hard constraint. Every finite value compares
//! better than the sentinel, so infeasible genomes never win a tournament or
//! an elite slot against a feasible one.

use std::cmp::Ordering;

use crate::genome::traits::EvolutionaryGenome;

/// Sentinel cost of a genome that breaks a hard constraint
pub const INFEASIBLE: f64 = f64::INFINITY;

/// Map NaN to the infeasible sentinel, leaving every other value untouched
pub fn sanitize(cost: f64) -> f64 {
    if cost.is_nan() {
        INFEASIBLE
    } else {
        cost
    }
}

/// Whether `cost` is a usable, finite score
pub fn is_feasible(cost: f64) -> bool {
    cost.is_finite()
}

/// Ascending cost order (best first)
pub fn compare_costs(a: f64, b: f64) -> Ordering {
    sanitize(a).total_cmp(&sanitize(b))
}

/// Fitness evaluation trait
///
/// Defines how to score a genome. Implementations must be pure so that
/// evaluation can be spread over threads without changing results.
pub trait Fitness: Send + Sync {
    /// The genome type being evaluated
    type Genome: EvolutionaryGenome;

    /// Evaluate the cost of a genome (lower = better)
    fn evaluate(&self, genome: &Self::Genome) -> f64;
}

/// A simple function wrapper for fitness evaluation
pub struct FnFitness<G, F>
where
    F: Fn(&G) -> f64,
{
    f: F,
    _marker: std::marker::PhantomData<fn(&G)>,
}

impl<G, F> FnFitness<G, F>
where
    F: Fn(&G) -> f64,
{
    /// Create a new function-based fitness evaluator
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<G, F> Fitness for FnFitness<G, F>
where
    G: EvolutionaryGenome,
    F: Fn(&G) -> f64 + Send + Sync,
{
    type Genome = G;

    fn evaluate(&self, genome: &Self::Genome) -> f64 {
        (self.f)(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::control_sequence::ControlSequence;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize(f64::NAN), INFEASIBLE);
        assert_eq!(sanitize(3.5), 3.5);
        assert_eq!(sanitize(f64::NEG_INFINITY), f64::NEG_INFINITY);
    }

    #[test]
    fn test_finite_beats_sentinel() {
        assert_eq!(compare_costs(1e300, INFEASIBLE), Ordering::Less);
        assert_eq!(compare_costs(INFEASIBLE, INFEASIBLE), Ordering::Equal);
        assert_eq!(compare_costs(f64::NAN, 0.0), Ordering::Greater);
        assert!(!is_feasible(INFEASIBLE));
        assert!(is_feasible(0.0));
    }

    #[test]
    fn test_fn_fitness() {
        let fitness = FnFitness::new(|g: &ControlSequence| g.len() as f64);
        let genome = ControlSequence::from_pairs(&[(0.0, 0.0), (1.0, 1.0)]).unwrap();
        assert_eq!(fitness.evaluate(&genome), 2.0);
    }
}
