//! Simple Genetic Algorithm
//!
//! A generational GA with elitism and fitness caching. The random initial
//! population is evaluated and seeds the hall of fame before generation 1.
//! Each generation:
//!
//! 1. select `N - elite` offspring by tournament (clones keep their cost)
//! 2. cross adjacent pairs `(0, 1), (2, 3), ...` with the crossover rate
//! 3. mutate each offspring with the mutation rate
//! 4. append clones of the `elite` cheapest members of the current population
//! 5. evaluate only the individuals whose cost was invalidated
//! 6. replace the population, update the hall of fame and record statistics

use std::marker::PhantomData;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::OptimizerConfig;
use crate::diagnostics::{EvolutionResult, EvolutionStats, GenerationStats, NullSink, StatsSink};
use crate::error::{EvoResult, EvolutionError};
use crate::fitness::traits::{Fitness, INFEASIBLE};
use crate::fitness::trajectory::TrajectoryFitness;
use crate::genome::bounds::Bounds;
use crate::genome::control_sequence::ControlSequence;
use crate::genome::traits::EvolutionaryGenome;
use crate::operators::crossover::OnePointShrinkCrossover;
use crate::operators::mutation::GaussianShrinkMutation;
use crate::operators::selection::TournamentSelection;
use crate::operators::traits::{CrossoverOperator, MutationOperator, SelectionOperator};
use crate::population::hall_of_fame::HallOfFame;
use crate::population::individual::Individual;
use crate::population::population::Population;
use crate::termination::{
    AnyOf, EvolutionState, MaxDuration, MaxGenerations, TerminationCriterion,
};

/// Configuration for the Simple GA
#[derive(Clone, Debug)]
pub struct SimpleGAConfig {
    /// Population size
    pub population_size: usize,
    /// Length of every initial genome
    pub horizon_length: usize,
    /// Number of elite individuals carried over unchanged
    pub elite_count: usize,
    /// Probability that an adjacent offspring pair is crossed
    pub crossover_probability: f64,
    /// Probability that an offspring is mutated
    pub mutation_probability: f64,
    /// Whether to evaluate in parallel
    pub parallel_evaluation: bool,
    /// Range the initial genes are drawn from
    pub gene_bounds: Bounds,
}

impl Default for SimpleGAConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            horizon_length: 290,
            elite_count: 30,
            crossover_probability: 0.9,
            mutation_probability: 0.2,
            parallel_evaluation: true,
            gene_bounds: Bounds::unit(),
        }
    }
}

impl SimpleGAConfig {
    fn validate(&self) -> EvoResult<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "population size must be at least 1".to_string(),
            ));
        }
        if self.horizon_length == 0 {
            return Err(EvolutionError::Configuration(
                "horizon length must be at least 1".to_string(),
            ));
        }
        if self.elite_count > self.population_size {
            return Err(EvolutionError::Configuration(format!(
                "elite count {} exceeds population size {}",
                self.elite_count, self.population_size
            )));
        }
        for (name, p) in [
            ("crossover probability", self.crossover_probability),
            ("mutation probability", self.mutation_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EvolutionError::Configuration(format!(
                    "{name} must be in [0, 1], got {p}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for SimpleGA
pub struct SimpleGABuilder<G, S, C, M, Fit, Term>
where
    G: EvolutionaryGenome,
{
    config: SimpleGAConfig,
    selection: Option<S>,
    crossover: Option<C>,
    mutation: Option<M>,
    fitness: Option<Fit>,
    termination: Option<Term>,
    _phantom: PhantomData<G>,
}

impl<G> SimpleGABuilder<G, (), (), (), (), ()>
where
    G: EvolutionaryGenome,
{
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SimpleGAConfig::default(),
            selection: None,
            crossover: None,
            mutation: None,
            fitness: None,
            termination: None,
            _phantom: PhantomData,
        }
    }
}

impl<G> Default for SimpleGABuilder<G, (), (), (), (), ()>
where
    G: EvolutionaryGenome,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<G, S, C, M, Fit, Term> SimpleGABuilder<G, S, C, M, Fit, Term>
where
    G: EvolutionaryGenome,
{
    /// Replace the whole configuration
    pub fn config(mut self, config: SimpleGAConfig) -> Self {
        self.config = config;
        self
    }

    pub fn population_size(mut self, size: usize) -> Self {
        self.config.population_size = size;
        self
    }

    pub fn horizon_length(mut self, length: usize) -> Self {
        self.config.horizon_length = length;
        self
    }

    pub fn elite_count(mut self, count: usize) -> Self {
        self.config.elite_count = count;
        self
    }

    pub fn crossover_probability(mut self, probability: f64) -> Self {
        self.config.crossover_probability = probability;
        self
    }

    pub fn mutation_probability(mut self, probability: f64) -> Self {
        self.config.mutation_probability = probability;
        self
    }

    pub fn parallel_evaluation(mut self, enabled: bool) -> Self {
        self.config.parallel_evaluation = enabled;
        self
    }

    pub fn gene_bounds(mut self, bounds: Bounds) -> Self {
        self.config.gene_bounds = bounds;
        self
    }

    /// Set the selection operator
    pub fn selection<NewS>(self, selection: NewS) -> SimpleGABuilder<G, NewS, C, M, Fit, Term>
    where
        NewS: SelectionOperator<G>,
    {
        SimpleGABuilder {
            config: self.config,
            selection: Some(selection),
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            termination: self.termination,
            _phantom: PhantomData,
        }
    }

    /// Set the crossover operator
    pub fn crossover<NewC>(self, crossover: NewC) -> SimpleGABuilder<G, S, NewC, M, Fit, Term>
    where
        NewC: CrossoverOperator<G>,
    {
        SimpleGABuilder {
            config: self.config,
            selection: self.selection,
            crossover: Some(crossover),
            mutation: self.mutation,
            fitness: self.fitness,
            termination: self.termination,
            _phantom: PhantomData,
        }
    }

    /// Set the mutation operator
    pub fn mutation<NewM>(self, mutation: NewM) -> SimpleGABuilder<G, S, C, NewM, Fit, Term>
    where
        NewM: MutationOperator<G>,
    {
        SimpleGABuilder {
            config: self.config,
            selection: self.selection,
            crossover: self.crossover,
            mutation: Some(mutation),
            fitness: self.fitness,
            termination: self.termination,
            _phantom: PhantomData,
        }
    }

    /// Set the fitness function
    pub fn fitness<NewFit>(self, fitness: NewFit) -> SimpleGABuilder<G, S, C, M, NewFit, Term>
    where
        NewFit: Fitness<Genome = G>,
    {
        SimpleGABuilder {
            config: self.config,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: Some(fitness),
            termination: self.termination,
            _phantom: PhantomData,
        }
    }

    /// Set the termination criterion
    pub fn termination<NewTerm>(self, termination: NewTerm) -> SimpleGABuilder<G, S, C, M, Fit, NewTerm>
    where
        NewTerm: TerminationCriterion,
    {
        SimpleGABuilder {
            config: self.config,
            selection: self.selection,
            crossover: self.crossover,
            mutation: self.mutation,
            fitness: self.fitness,
            termination: Some(termination),
            _phantom: PhantomData,
        }
    }

    /// Set max generations (convenience method)
    pub fn max_generations(self, max: usize) -> SimpleGABuilder<G, S, C, M, Fit, MaxGenerations> {
        self.termination(MaxGenerations::new(max))
    }
}

impl<G, S, C, M, Fit, Term> SimpleGABuilder<G, S, C, M, Fit, Term>
where
    G: EvolutionaryGenome + PartialEq,
    S: SelectionOperator<G>,
    C: CrossoverOperator<G>,
    M: MutationOperator<G>,
    Fit: Fitness<Genome = G>,
    Term: TerminationCriterion,
{
    /// Build the SimpleGA instance
    pub fn build(self) -> EvoResult<SimpleGA<G, S, C, M, Fit, Term>> {
        self.config.validate()?;

        let selection = self.selection.ok_or_else(|| {
            EvolutionError::Configuration("Selection operator must be specified".to_string())
        })?;

        let crossover = self.crossover.ok_or_else(|| {
            EvolutionError::Configuration("Crossover operator must be specified".to_string())
        })?;

        let mutation = self.mutation.ok_or_else(|| {
            EvolutionError::Configuration("Mutation operator must be specified".to_string())
        })?;

        let fitness = self.fitness.ok_or_else(|| {
            EvolutionError::Configuration("Fitness function must be specified".to_string())
        })?;

        let termination = self.termination.ok_or_else(|| {
            EvolutionError::Configuration("Termination criterion must be specified".to_string())
        })?;

        Ok(SimpleGA {
            config: self.config,
            selection,
            crossover,
            mutation,
            fitness,
            termination,
            _phantom: PhantomData,
        })
    }
}

/// Simple Genetic Algorithm
pub struct SimpleGA<G, S, C, M, Fit, Term>
where
    G: EvolutionaryGenome,
{
    config: SimpleGAConfig,
    selection: S,
    crossover: C,
    mutation: M,
    fitness: Fit,
    termination: Term,
    _phantom: PhantomData<G>,
}

/// The optimizer wired up for the tractor-trailer problem
pub type TrailerGA = SimpleGA<
    ControlSequence,
    TournamentSelection,
    OnePointShrinkCrossover,
    GaussianShrinkMutation,
    TrajectoryFitness,
    AnyOf,
>;

impl TrailerGA {
    /// Build the optimizer described by a validated configuration
    pub fn from_config(config: &OptimizerConfig) -> EvoResult<Self> {
        config.validate()?;

        let mut criteria: Vec<Box<dyn TerminationCriterion>> =
            vec![Box::new(MaxGenerations::new(config.max_generations))];
        if let Some(secs) = config.time_limit_secs {
            criteria.push(Box::new(MaxDuration::try_from_secs_f64(secs)?));
        }

        SimpleGABuilder::new()
            .population_size(config.population_size)
            .horizon_length(config.horizon_length)
            .elite_count(config.elite_count())
            .crossover_probability(config.crossover_prob)
            .mutation_probability(config.mutation_prob)
            .parallel_evaluation(config.parallel_evaluation)
            .selection(TournamentSelection::new(config.tournament_size)?)
            .crossover(OnePointShrinkCrossover::new())
            .mutation(GaussianShrinkMutation::new(
                config.sigma,
                config.per_gene_mutation_prob,
                config.shrink_prob,
            )?)
            .fitness(config.fitness()?)
            .termination(AnyOf::new(criteria))
            .build()
    }
}

impl<G, S, C, M, Fit, Term> SimpleGA<G, S, C, M, Fit, Term>
where
    G: EvolutionaryGenome + PartialEq,
    S: SelectionOperator<G>,
    C: CrossoverOperator<G>,
    M: MutationOperator<G>,
    Fit: Fitness<Genome = G>,
    Term: TerminationCriterion,
{
    /// Create a builder for SimpleGA
    pub fn builder() -> SimpleGABuilder<G, (), (), (), (), ()> {
        SimpleGABuilder::new()
    }

    pub fn config(&self) -> &SimpleGAConfig {
        &self.config
    }

    pub fn fitness(&self) -> &Fit {
        &self.fitness
    }

    /// Hall-of-fame capacity: the elite size, but never below one
    pub fn hall_of_fame_size(&self) -> usize {
        self.config.elite_count.max(1)
    }

    /// Run the genetic algorithm
    pub fn run<R: Rng>(&self, rng: &mut R) -> EvoResult<EvolutionResult<G>> {
        self.run_with_sink(rng, &mut NullSink)
    }

    /// Run the genetic algorithm, pushing every generation record to `sink`
    /// in addition to the in-memory log of the result.
    ///
    /// A failing sink is logged and skipped; it never aborts the run.
    pub fn run_with_sink<R: Rng>(
        &self,
        rng: &mut R,
        sink: &mut dyn StatsSink,
    ) -> EvoResult<EvolutionResult<G>> {
        let start_time = Instant::now();
        let config = &self.config;
        let offspring_count = config.population_size - config.elite_count;

        info!(
            population_size = config.population_size,
            horizon_length = config.horizon_length,
            elite_count = config.elite_count,
            parallel = config.parallel_evaluation,
            "starting evolution"
        );

        let mut population: Population<G> = Population::random(
            config.population_size,
            config.horizon_length,
            &config.gene_bounds,
            rng,
        );
        let mut evaluations = self.evaluate(&mut population);

        let mut hall_of_fame = HallOfFame::new(self.hall_of_fame_size())?;
        hall_of_fame.update(&population);

        let mut stats = EvolutionStats::new();
        let mut sink_failures = 0usize;

        loop {
            let state = EvolutionState {
                generation: population.generation(),
                evaluations,
                best_fitness: hall_of_fame.best().map_or(INFEASIBLE, |b| b.cost()),
                elapsed: start_time.elapsed(),
            };
            if let Some(reason) = self.termination.triggered(&state) {
                stats.set_termination_reason(reason);
                break;
            }

            let generation = population.generation() + 1;

            let mut offspring: Vec<Individual<G>> = self
                .selection
                .select_many(population.individuals(), offspring_count, rng)
                .into_iter()
                .map(|idx| population[idx].clone())
                .collect();

            for i in (1..offspring.len()).step_by(2) {
                if rng.gen::<f64>() < config.crossover_probability {
                    let (child1, child2) =
                        self.crossover
                            .crossover(&offspring[i - 1].genome, &offspring[i].genome, rng);
                    offspring[i - 1] = Individual::new(child1);
                    offspring[i] = Individual::new(child2);
                }
            }

            for individual in &mut offspring {
                if rng.gen::<f64>() < config.mutation_probability {
                    self.mutation.mutate(individual.genome_mut(), rng);
                }
            }

            offspring.extend(population.best_n(config.elite_count));

            let mut next = Population::from_individuals(offspring);
            next.set_generation(generation);
            evaluations += self.evaluate(&mut next);
            population = next;

            hall_of_fame.update(&population);

            let gen_stats = GenerationStats::from_population(&population, generation, evaluations);
            debug!(
                generation,
                min = gen_stats.min,
                mean = gen_stats.mean,
                max = gen_stats.max,
                feasible = gen_stats.feasible,
                mean_length = gen_stats.mean_length,
                "generation complete"
            );
            if let Err(error) = sink.record(&gen_stats) {
                sink_failures += 1;
                warn!(generation, %error, "statistics sink rejected a record");
            }
            stats.push(gen_stats);
        }

        stats.set_runtime(start_time.elapsed());

        let best = population
            .best()
            .ok_or(EvolutionError::EmptyPopulation)?
            .clone();

        info!(
            generations = population.generation(),
            evaluations,
            best_fitness = best.cost(),
            best_length = best.genome.dimension(),
            runtime_ms = stats.total_runtime_ms,
            reason = stats.termination_reason.as_deref().unwrap_or("unknown"),
            "evolution finished"
        );
        if sink_failures > 0 {
            warn!(sink_failures, "some generation records were not delivered");
        }

        Ok(EvolutionResult::new(
            best.genome.clone(),
            best.cost(),
            population.generation(),
            evaluations,
        )
        .with_hall_of_fame(hall_of_fame.into_members())
        .with_stats(stats))
    }

    fn evaluate(&self, population: &mut Population<G>) -> usize {
        if self.config.parallel_evaluation {
            population.evaluate_parallel(&self.fitness)
        } else {
            population.evaluate(&self.fitness)
        }
    }
}
