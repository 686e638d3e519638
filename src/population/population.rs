//! Population type
//!
//! This module provides the Population container type.

use rand::Rng;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::fitness::traits::Fitness;
use crate::genome::bounds::Bounds;
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;

/// A population of individuals
#[derive(Clone, Debug)]
pub struct Population<G>
where
    G: EvolutionaryGenome,
{
    /// The individuals in this population
    individuals: Vec<Individual<G>>,
    /// Current generation number
    generation: usize,
}

impl<G> Population<G>
where
    G: EvolutionaryGenome,
{
    /// Create an empty population
    pub fn new() -> Self {
        Self {
            individuals: Vec::new(),
            generation: 0,
        }
    }

    /// Create a population from a vector of individuals
    pub fn from_individuals(individuals: Vec<Individual<G>>) -> Self {
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Create `size` random, unevaluated genomes of `length` genes each
    pub fn random<R: Rng>(size: usize, length: usize, bounds: &Bounds, rng: &mut R) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::new(G::generate(rng, length, bounds)))
            .collect();
        Self {
            individuals,
            generation: 0,
        }
    }

    /// Get the current generation
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Set the generation number
    pub fn set_generation(&mut self, generation: usize) {
        self.generation = generation;
    }

    /// Get the population size
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Check if the population is empty
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Add an individual to the population
    pub fn push(&mut self, individual: Individual<G>) {
        self.individuals.push(individual);
    }

    /// Get an iterator over the individuals
    pub fn iter(&self) -> impl Iterator<Item = &Individual<G>> {
        self.individuals.iter()
    }

    /// Get the underlying slice of individuals
    pub fn individuals(&self) -> &[Individual<G>] {
        &self.individuals
    }

    /// Get the best (cheapest) evaluated individual
    pub fn best(&self) -> Option<&Individual<G>> {
        self.individuals
            .iter()
            .filter(|i| i.is_evaluated())
            .min_by(|a, b| a.cmp_by_cost(b))
    }

    /// Clones of the `count` cheapest individuals, best first.
    ///
    /// The sort is stable, so ties keep population order.
    pub fn best_n(&self, count: usize) -> Vec<Individual<G>> {
        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| self.individuals[a].cmp_by_cost(&self.individuals[b]));
        order
            .into_iter()
            .take(count)
            .map(|i| self.individuals[i].clone())
            .collect()
    }

    /// Evaluate every individual without a cached fitness (sequential).
    ///
    /// Returns the number of fitness evaluations performed.
    pub fn evaluate<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G>,
    {
        let mut evaluated = 0;
        for individual in &mut self.individuals {
            if !individual.is_evaluated() {
                let f = fitness.evaluate(&individual.genome);
                individual.set_fitness(f);
                evaluated += 1;
            }
        }
        evaluated
    }

    /// Mean genome length
    pub fn mean_length(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }
        self.individuals
            .iter()
            .map(|i| i.genome.dimension() as f64)
            .sum::<f64>()
            / self.individuals.len() as f64
    }
}

/// Parallel evaluation support (requires `parallel` feature)
#[cfg(feature = "parallel")]
impl<G> Population<G>
where
    G: EvolutionaryGenome,
{
    /// Evaluate every individual without a cached fitness (parallel).
    ///
    /// Each worker writes only to its own slot, and the call returns once
    /// every slot is filled.
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G>,
    {
        self.individuals
            .par_iter_mut()
            .filter(|i| !i.is_evaluated())
            .map(|individual| {
                let f = fitness.evaluate(&individual.genome);
                individual.set_fitness(f);
                1usize
            })
            .sum()
    }
}

/// Sequential fallback for parallel evaluation (when `parallel` feature is disabled)
#[cfg(not(feature = "parallel"))]
impl<G> Population<G>
where
    G: EvolutionaryGenome,
{
    /// Evaluate every individual without a cached fitness (sequential fallback)
    pub fn evaluate_parallel<Fit>(&mut self, fitness: &Fit) -> usize
    where
        Fit: Fitness<Genome = G>,
    {
        self.evaluate(fitness)
    }
}

impl<G> Default for Population<G>
where
    G: EvolutionaryGenome,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G> std::ops::Index<usize> for Population<G>
where
    G: EvolutionaryGenome,
{
    type Output = Individual<G>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::{FnFitness, INFEASIBLE};
    use crate::genome::control_sequence::ControlSequence;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn genome(v: f64, len: usize) -> ControlSequence {
        ControlSequence::from_pairs(&vec![(v, v); len]).unwrap()
    }

    fn create_test_population() -> Population<ControlSequence> {
        let individuals = vec![
            Individual::with_fitness(genome(0.1, 1), 30.0),
            Individual::with_fitness(genome(0.2, 2), INFEASIBLE),
            Individual::with_fitness(genome(0.3, 3), 10.0),
            Individual::with_fitness(genome(0.4, 4), 50.0),
            Individual::with_fitness(genome(0.5, 5), 10.0),
        ];
        Population::from_individuals(individuals)
    }

    fn total_speed() -> impl Fitness<Genome = ControlSequence> {
        FnFitness::new(|g: &ControlSequence| g.iter().map(|c| c.left + c.right).sum())
    }

    #[test]
    fn test_population_new() {
        let pop: Population<ControlSequence> = Population::new();
        assert!(pop.is_empty());
        assert_eq!(pop.generation(), 0);
    }

    #[test]
    fn test_population_random() {
        let mut rng = StdRng::seed_from_u64(1);
        let pop: Population<ControlSequence> = Population::random(10, 7, &Bounds::unit(), &mut rng);
        assert_eq!(pop.len(), 10);
        assert!(pop.iter().all(|i| i.genome.len() == 7));
        assert!(pop.iter().all(|i| !i.is_evaluated()));
    }

    #[test]
    fn test_population_best() {
        let pop = create_test_population();
        assert_eq!(pop.best().unwrap().cost(), 10.0);
        assert_eq!(pop.best().unwrap().genome.len(), 3);
        assert!(Population::<ControlSequence>::new().best().is_none());
    }

    #[test]
    fn test_best_n_is_stable_and_ascending() {
        let pop = create_test_population();
        let elites = pop.best_n(3);
        let costs: Vec<f64> = elites.iter().map(|i| i.cost()).collect();
        assert_eq!(costs, vec![10.0, 10.0, 30.0]);
        assert_eq!(elites[0].genome.len(), 3);
        assert_eq!(elites[1].genome.len(), 5);
        assert_eq!(pop.best_n(0).len(), 0);
        assert_eq!(pop.best_n(99).len(), 5);
    }

    #[test]
    fn test_evaluate_only_invalid() {
        let mut pop = create_test_population();
        pop.push(Individual::new(genome(0.5, 2)));
        let evaluated = pop.evaluate(&total_speed());
        assert_eq!(evaluated, 1);
        assert!(pop.iter().all(|i| i.is_evaluated()));
        assert_eq!(pop[5].cost(), 2.0);
        // Cached values are untouched
        assert_eq!(pop[0].cost(), 30.0);
    }

    #[test]
    fn test_evaluate_parallel_matches_sequential() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seq: Population<ControlSequence> =
            Population::random(64, 20, &Bounds::unit(), &mut rng);
        let mut par = seq.clone();

        assert_eq!(seq.evaluate(&total_speed()), 64);
        assert_eq!(par.evaluate_parallel(&total_speed()), 64);
        for (a, b) in seq.iter().zip(par.iter()) {
            assert_eq!(a.fitness, b.fitness);
        }
        assert_eq!(par.evaluate_parallel(&total_speed()), 0);
    }

    #[test]
    fn test_mean_length() {
        let pop = create_test_population();
        assert_eq!(pop.mean_length(), 3.0);
        assert_eq!(Population::<ControlSequence>::new().mean_length(), 0.0);
    }
}
