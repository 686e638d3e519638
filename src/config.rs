//! Optimizer configuration
//!
//! [`OptimizerConfig`] collects every knob of a run. Missing JSON fields fall
//! back to the reference scenario: a 100 x 100 arena with nine obstacles, the
//! vehicle parked near the bottom-left corner and the goal near the top-left.

use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EvoResult, EvolutionError, PersistenceError};
use crate::fitness::trajectory::TrajectoryFitness;
use crate::kinematics::{Point, Pose};
use crate::termination::MaxDuration;
use crate::workspace::{Rect, Workspace, ARENA_OBSTACLES, ARENA_WALLS};

/// Every parameter of an optimization run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of individuals per generation
    pub population_size: usize,
    /// Probability that an adjacent offspring pair is crossed
    pub crossover_prob: f64,
    /// Probability that an offspring is mutated
    pub mutation_prob: f64,
    pub max_generations: usize,
    /// Share of the population carried over unchanged
    pub elite_fraction: f64,
    /// Initial number of control steps
    pub horizon_length: usize,
    pub random_seed: u64,
    /// Standard deviation of the Gaussian speed perturbation
    pub sigma: f64,
    /// Per-step perturbation probability inside a mutation
    pub per_gene_mutation_prob: f64,
    /// Probability that a mutation drops the last step instead
    pub shrink_prob: f64,
    pub start_pose: Pose,
    pub goal_position: Point,
    /// Largest admissible `|phi|`, radians
    pub max_articulation_angle: f64,
    pub obstacles: Vec<Rect>,
    pub walls: Vec<Rect>,
    pub tournament_size: usize,
    pub parallel_evaluation: bool,
    /// Optional wall-clock budget, seconds
    pub time_limit_secs: Option<f64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 300,
            crossover_prob: 0.9,
            mutation_prob: 0.2,
            max_generations: 500,
            elite_fraction: 0.1,
            horizon_length: 290,
            random_seed: 42,
            sigma: 0.1,
            per_gene_mutation_prob: 0.2,
            shrink_prob: 0.01,
            start_pose: Pose::new(5.0, 5.0, 0.0, 0.0),
            goal_position: Point::new(5.0, 95.0),
            max_articulation_angle: FRAC_PI_2,
            obstacles: ARENA_OBSTACLES.to_vec(),
            walls: ARENA_WALLS.to_vec(),
            tournament_size: 3,
            parallel_evaluation: true,
            time_limit_secs: None,
        }
    }
}

fn check_probability(name: &str, p: f64) -> EvoResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(EvolutionError::Configuration(format!(
            "{name} must be in [0, 1], got {p}"
        )))
    }
}

fn check_positive(name: &str, value: usize) -> EvoResult<()> {
    if value == 0 {
        Err(EvolutionError::Configuration(format!(
            "{name} must be at least 1"
        )))
    } else {
        Ok(())
    }
}

impl OptimizerConfig {
    /// Parse a configuration from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(json).map_err(|e| PersistenceError::Deserialization {
            line: e.line(),
            message: e.to_string(),
        })
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Reject configurations the optimizer cannot run
    pub fn validate(&self) -> EvoResult<()> {
        check_positive("population size", self.population_size)?;
        check_positive("horizon length", self.horizon_length)?;
        check_positive("tournament size", self.tournament_size)?;

        check_probability("crossover probability", self.crossover_prob)?;
        check_probability("mutation probability", self.mutation_prob)?;
        check_probability("elite fraction", self.elite_fraction)?;
        check_probability("per-gene mutation probability", self.per_gene_mutation_prob)?;
        check_probability("shrink probability", self.shrink_prob)?;

        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(EvolutionError::Configuration(format!(
                "sigma must be finite and non-negative, got {}",
                self.sigma
            )));
        }
        if !self.start_pose.is_finite() {
            return Err(EvolutionError::Configuration(format!(
                "start pose must be finite, got {:?}",
                self.start_pose
            )));
        }
        if !(self.goal_position.x.is_finite() && self.goal_position.y.is_finite()) {
            return Err(EvolutionError::Configuration(format!(
                "goal position must be finite, got {:?}",
                self.goal_position
            )));
        }
        if !(self.max_articulation_angle.is_finite() && self.max_articulation_angle > 0.0) {
            return Err(EvolutionError::Configuration(format!(
                "max articulation angle must be positive, got {}",
                self.max_articulation_angle
            )));
        }
        if let Some(secs) = self.time_limit_secs {
            MaxDuration::try_from_secs_f64(secs)?;
        }
        self.workspace()?;
        Ok(())
    }

    /// `floor(population_size * elite_fraction)`
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_fraction).floor() as usize
    }

    /// The walls and obstacles as a validated workspace
    pub fn workspace(&self) -> EvoResult<Workspace> {
        Workspace::new(self.walls.clone(), self.obstacles.clone())
    }

    /// The trajectory cost function for this scenario
    pub fn fitness(&self) -> EvoResult<TrajectoryFitness> {
        Ok(TrajectoryFitness::new(
            self.start_pose,
            self.goal_position,
            self.max_articulation_angle,
            Arc::new(self.workspace()?),
        ))
    }

    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    pub fn with_crossover_prob(mut self, p: f64) -> Self {
        self.crossover_prob = p;
        self
    }

    pub fn with_mutation_prob(mut self, p: f64) -> Self {
        self.mutation_prob = p;
        self
    }

    pub fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    pub fn with_elite_fraction(mut self, fraction: f64) -> Self {
        self.elite_fraction = fraction;
        self
    }

    pub fn with_horizon_length(mut self, length: usize) -> Self {
        self.horizon_length = length;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_shrink_prob(mut self, p: f64) -> Self {
        self.shrink_prob = p;
        self
    }

    pub fn with_start_pose(mut self, pose: Pose) -> Self {
        self.start_pose = pose;
        self
    }

    pub fn with_goal_position(mut self, goal: Point) -> Self {
        self.goal_position = goal;
        self
    }

    pub fn with_obstacles(mut self, obstacles: Vec<Rect>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_tournament_size(mut self, size: usize) -> Self {
        self.tournament_size = size;
        self
    }

    pub fn with_parallel_evaluation(mut self, enabled: bool) -> Self {
        self.parallel_evaluation = enabled;
        self
    }

    pub fn with_time_limit_secs(mut self, secs: Option<f64>) -> Self {
        self.time_limit_secs = secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_reference_scenario() {
        let config = OptimizerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 300);
        assert_eq!(config.max_generations, 500);
        assert_eq!(config.horizon_length, 290);
        assert_eq!(config.elite_count(), 30);
        assert_eq!(config.obstacles.len(), 9);
        assert_eq!(config.walls.len(), 4);
        assert_relative_eq!(config.max_articulation_angle, std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn test_elite_count_floors() {
        let config = OptimizerConfig::default()
            .with_population_size(25)
            .with_elite_fraction(0.1);
        assert_eq!(config.elite_count(), 2);
        assert_eq!(config.with_population_size(5).elite_count(), 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            OptimizerConfig::from_json_str(r#"{"population_size": 50, "time_limit_secs": 2.5}"#)
                .unwrap();
        assert_eq!(config.population_size, 50);
        assert_eq!(config.time_limit_secs, Some(2.5));
        assert_eq!(config.horizon_length, 290);
        assert_eq!(config.goal_position, Point::new(5.0, 95.0));
    }

    #[test]
    fn test_bad_json_reports_line() {
        let err = OptimizerConfig::from_json_str("{\n\"population_size\": \"many\"\n}").unwrap_err();
        match err {
            PersistenceError::Deserialization { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = OptimizerConfig::default()
            .with_random_seed(7)
            .with_obstacles(vec![Rect::new(10.0, 10.0, 20.0, 20.0)]);
        config.save_json(&path).unwrap();

        assert_eq!(OptimizerConfig::from_json_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OptimizerConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PersistenceError::Io(_)));
    }

    #[test]
    fn test_validation_failures() {
        let base = OptimizerConfig::default();
        let invalid = [
            base.clone().with_population_size(0),
            base.clone().with_horizon_length(0),
            base.clone().with_tournament_size(0),
            base.clone().with_crossover_prob(1.1),
            base.clone().with_mutation_prob(-0.1),
            base.clone().with_elite_fraction(2.0),
            base.clone().with_shrink_prob(f64::NAN),
            base.clone().with_sigma(-1.0),
            base.clone().with_start_pose(Pose::new(f64::NAN, 0.0, 0.0, 0.0)),
            base.clone().with_goal_position(Point::new(f64::INFINITY, 0.0)),
            base.clone().with_time_limit_secs(Some(-1.0)),
            base.clone().with_time_limit_secs(Some(1e20)),
            base.clone().with_obstacles(vec![Rect::new(10.0, 10.0, 5.0, 20.0)]),
        ];
        for config in invalid {
            assert!(
                matches!(config.validate(), Err(EvolutionError::Configuration(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_fitness_uses_configured_scenario() {
        let config = OptimizerConfig::default().with_goal_position(Point::new(50.0, 50.0));
        let fitness = config.fitness().unwrap();
        assert_eq!(fitness.goal(), Point::new(50.0, 50.0));
        assert_eq!(fitness.start(), config.start_pose);
        assert_eq!(fitness.workspace().obstacles().len(), 9);
    }
}
