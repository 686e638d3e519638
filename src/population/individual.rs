//! Individual wrapper type
//!
//! This module provides the Individual type that wraps a genome with its
//! cached fitness.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::fitness::traits::{compare_costs, sanitize, INFEASIBLE};
use crate::genome::traits::EvolutionaryGenome;

/// An individual in the population
///
/// The fitness is a cache: it is `None` whenever the genome has changed
/// since the last evaluation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Individual<G>
where
    G: EvolutionaryGenome,
{
    /// The genome of this individual
    pub genome: G,
    /// The cost (None if not yet evaluated or invalidated)
    pub fitness: Option<f64>,
}

impl<G> Individual<G>
where
    G: EvolutionaryGenome,
{
    /// Create a new individual with an unevaluated genome
    pub fn new(genome: G) -> Self {
        Self {
            genome,
            fitness: None,
        }
    }

    /// Create a new individual with a known fitness
    pub fn with_fitness(genome: G, fitness: f64) -> Self {
        Self {
            genome,
            fitness: Some(sanitize(fitness)),
        }
    }

    /// Check if this individual carries a valid fitness
    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Cost of this individual; unevaluated individuals rank as infeasible
    pub fn cost(&self) -> f64 {
        self.fitness.unwrap_or(INFEASIBLE)
    }

    /// Set the fitness value
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(sanitize(fitness));
    }

    /// Mutable access to the genome; the cached fitness is dropped
    pub fn genome_mut(&mut self) -> &mut G {
        self.fitness = None;
        &mut self.genome
    }

    /// Check if this individual is strictly better (cheaper) than another
    pub fn is_better_than(&self, other: &Self) -> bool {
        match (self.fitness, other.fitness) {
            (Some(f1), Some(f2)) => f1 < f2,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Ascending cost order, unevaluated individuals last
    pub fn cmp_by_cost(&self, other: &Self) -> Ordering {
        compare_costs(self.cost(), other.cost())
    }
}

impl<G> PartialEq for Individual<G>
where
    G: EvolutionaryGenome + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome && self.fitness == other.fitness
    }
}
