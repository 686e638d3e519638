//! Diagnostics and statistics
//!
//! Per-generation fitness summaries, the sinks they are pushed to, and the
//! result of an evolution run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::fitness::traits::{compare_costs, is_feasible};
use crate::genome::traits::EvolutionaryGenome;
use crate::population::individual::Individual;
use crate::population::population::Population;

/// Serde adapter for costs: non-finite values are written as `null`, and
/// `null` reads back as [`INFEASIBLE`](crate::fitness::INFEASIBLE).
pub mod non_finite {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::fitness::traits::INFEASIBLE;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(INFEASIBLE))
    }
}

/// Statistics for a single generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number, starting at 1
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Lowest cost in the population
    #[serde(with = "non_finite")]
    pub min: f64,
    /// Mean cost (infinite as soon as one member is infeasible)
    #[serde(with = "non_finite")]
    pub mean: f64,
    /// Highest cost in the population
    #[serde(with = "non_finite")]
    pub max: f64,
    /// Number of feasible members
    pub feasible: usize,
    pub population_size: usize,
    /// Mean genome length
    pub mean_length: f64,
    /// Length of the cheapest genome
    pub best_length: usize,
}

impl GenerationStats {
    /// Compute statistics from the evaluated members of a population
    pub fn from_population<G>(population: &Population<G>, generation: usize, evaluations: usize) -> Self
    where
        G: EvolutionaryGenome,
    {
        let costs: Vec<f64> = population.iter().filter_map(|i| i.fitness).collect();

        let (min, mean, max) = if costs.is_empty() {
            (f64::INFINITY, f64::INFINITY, f64::INFINITY)
        } else {
            let min = costs.iter().copied().min_by(|a, b| compare_costs(*a, *b));
            let max = costs.iter().copied().max_by(|a, b| compare_costs(*a, *b));
            let mean = costs.iter().sum::<f64>() / costs.len() as f64;
            (
                min.unwrap_or(f64::INFINITY),
                mean,
                max.unwrap_or(f64::INFINITY),
            )
        };

        Self {
            generation,
            evaluations,
            min,
            mean,
            max,
            feasible: costs.iter().filter(|&&c| is_feasible(c)).count(),
            population_size: population.len(),
            mean_length: population.mean_length(),
            best_length: population.best().map_or(0, |b| b.genome.dimension()),
        }
    }
}

/// Destination for per-generation statistics
pub trait StatsSink {
    /// Append one generation record
    fn record(&mut self, stats: &GenerationStats) -> Result<(), PersistenceError>;
}

/// Sink that discards every record
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl StatsSink for NullSink {
    fn record(&mut self, _stats: &GenerationStats) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Streams records as newline-delimited JSON
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W, PersistenceError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl JsonLinesSink<BufWriter<File>> {
    /// Create (or truncate) a JSON-lines file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> StatsSink for JsonLinesSink<W> {
    fn record(&mut self, stats: &GenerationStats) -> Result<(), PersistenceError> {
        serde_json::to_writer(&mut self.writer, stats)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }
}

/// In-memory statistics log for an entire run
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Statistics per generation, in order
    pub generations: Vec<GenerationStats>,
    /// Total runtime in milliseconds
    pub total_runtime_ms: f64,
    /// Reason for termination
    pub termination_reason: Option<String>,
}

impl EvolutionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generation's statistics
    pub fn push(&mut self, stats: GenerationStats) {
        self.generations.push(stats);
    }

    pub fn num_generations(&self) -> usize {
        self.generations.len()
    }

    /// Lowest cost seen in any generation
    pub fn best_fitness(&self) -> Option<f64> {
        self.generations
            .iter()
            .map(|g| g.min)
            .min_by(|a, b| compare_costs(*a, *b))
    }

    /// Lowest cost of the final generation
    pub fn final_best_fitness(&self) -> Option<f64> {
        self.generations.last().map(|g| g.min)
    }

    pub fn best_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.min).collect()
    }

    pub fn mean_fitness_history(&self) -> Vec<f64> {
        self.generations.iter().map(|g| g.mean).collect()
    }

    pub fn set_termination_reason(&mut self, reason: &str) {
        self.termination_reason = Some(reason.to_string());
    }

    pub fn set_runtime(&mut self, duration: Duration) {
        self.total_runtime_ms = duration.as_secs_f64() * 1000.0;
    }

    /// Total runtime
    pub fn runtime(&self) -> Duration {
        Duration::try_from_secs_f64(self.total_runtime_ms.max(0.0) / 1000.0)
            .unwrap_or(Duration::MAX)
    }

    /// Get a summary of the evolution run
    pub fn summary(&self) -> String {
        format!(
            "Evolution Summary:\n\
             - Generations: {}\n\
             - Best fitness: {:.6}\n\
             - Final best: {:.6}\n\
             - Runtime: {:.2}ms\n\
             - Termination: {}",
            self.num_generations(),
            self.best_fitness().unwrap_or(f64::INFINITY),
            self.final_best_fitness().unwrap_or(f64::INFINITY),
            self.total_runtime_ms,
            self.termination_reason.as_deref().unwrap_or("unknown")
        )
    }
}

impl StatsSink for EvolutionStats {
    fn record(&mut self, stats: &GenerationStats) -> Result<(), PersistenceError> {
        self.push(stats.clone());
        Ok(())
    }
}

/// Result of an evolution run
#[derive(Clone, Debug)]
pub struct EvolutionResult<G>
where
    G: EvolutionaryGenome,
{
    /// The cheapest genome of the final population
    pub best_genome: G,
    /// Its cost
    pub best_fitness: f64,
    /// Number of generations completed
    pub generations: usize,
    /// Total fitness evaluations, including the initial population
    pub evaluations: usize,
    /// Best individuals ever observed, cheapest first
    pub hall_of_fame: Vec<Individual<G>>,
    /// Statistics for the run
    pub stats: EvolutionStats,
}

impl<G> EvolutionResult<G>
where
    G: EvolutionaryGenome,
{
    pub fn new(best_genome: G, best_fitness: f64, generations: usize, evaluations: usize) -> Self {
        Self {
            best_genome,
            best_fitness,
            generations,
            evaluations,
            hall_of_fame: Vec::new(),
            stats: EvolutionStats::new(),
        }
    }

    pub fn with_hall_of_fame(mut self, hall_of_fame: Vec<Individual<G>>) -> Self {
        self.hall_of_fame = hall_of_fame;
        self
    }

    pub fn with_stats(mut self, stats: EvolutionStats) -> Self {
        self.stats = stats;
        self
    }

    /// Whether the best genome satisfies every constraint
    pub fn is_feasible(&self) -> bool {
        is_feasible(self.best_fitness)
    }
}

pub mod prelude {
    pub use super::{
        EvolutionResult, EvolutionStats, GenerationStats, JsonLinesSink, NullSink, StatsSink,
    };
}
