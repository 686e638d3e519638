//! Operator traits
//!
//! This module defines the core operator traits for genetic algorithms.
//! Every operator draws randomness only from the `rng` handle it is given.

use rand::Rng;

use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// Selection operator trait
///
/// Picks individuals from a population for reproduction without modifying
/// the population.
pub trait SelectionOperator<G: EvolutionaryGenome>: Send + Sync {
    /// Select a single individual, returning its index
    fn select<R: Rng>(&self, population: &[Individual<G>], rng: &mut R) -> usize;

    /// Select `count` individuals
    fn select_many<R: Rng>(
        &self,
        population: &[Individual<G>],
        count: usize,
        rng: &mut R,
    ) -> Vec<usize> {
        (0..count).map(|_| self.select(population, rng)).collect()
    }
}

/// Crossover operator trait
///
/// Combines genetic material from two parents to create two offspring.
pub trait CrossoverOperator<G: EvolutionaryGenome>: Send + Sync {
    /// Apply crossover to two parents and produce two offspring
    fn crossover<R: Rng>(&self, parent1: &G, parent2: &G, rng: &mut R) -> (G, G);
}

/// Which branch a mutation call took
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The last gene was removed
    Shrunk,
    /// Genes were perturbed in place (possibly none)
    Perturbed { genes: usize },
}

/// Mutation operator trait
///
/// Applies random changes to a genome in place.
pub trait MutationOperator<G: EvolutionaryGenome>: Send + Sync {
    /// Apply mutation to a genome in place
    fn mutate<R: Rng>(&self, genome: &mut G, rng: &mut R) -> MutationOutcome;
}
