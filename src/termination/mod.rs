//! Termination criteria
//!
//! Criteria are checked before every generation. The driver stops at the
//! first check that fires.

use std::time::Duration;

use crate::error::{EvoResult, EvolutionError};

/// Evolution state for termination checking
#[derive(Clone, Copy, Debug)]
pub struct EvolutionState {
    /// Generations completed so far
    pub generation: usize,
    /// Total fitness evaluations so far
    pub evaluations: usize,
    /// Lowest cost found so far
    pub best_fitness: f64,
    /// Wall-clock time since the run started
    pub elapsed: Duration,
}

/// Termination criterion trait
pub trait TerminationCriterion: Send + Sync {
    /// Check if evolution should terminate
    fn should_terminate(&self, state: &EvolutionState) -> bool;

    /// Get a description of why termination occurred
    fn reason(&self) -> &'static str;

    /// The reason to report if this criterion fires for `state`
    fn triggered(&self, state: &EvolutionState) -> Option<&'static str> {
        self.should_terminate(state).then(|| self.reason())
    }
}

/// Terminate after a fixed number of generations
#[derive(Clone, Debug)]
pub struct MaxGenerations(pub usize);

impl MaxGenerations {
    pub fn new(max: usize) -> Self {
        Self(max)
    }
}

impl TerminationCriterion for MaxGenerations {
    fn should_terminate(&self, state: &EvolutionState) -> bool {
        state.generation >= self.0
    }

    fn reason(&self) -> &'static str {
        "Maximum generations reached"
    }
}

/// Terminate once the run has used up its wall-clock budget.
///
/// The check happens between generations, so a run can overshoot the limit
/// by at most one generation.
#[derive(Clone, Debug)]
pub struct MaxDuration(pub Duration);

impl MaxDuration {
    pub fn new(limit: Duration) -> Self {
        Self(limit)
    }

    /// Fails for limits a `Duration` cannot hold
    pub fn try_from_secs_f64(secs: f64) -> EvoResult<Self> {
        Duration::try_from_secs_f64(secs).map(Self).map_err(|e| {
            EvolutionError::Configuration(format!("invalid time limit {secs}: {e}"))
        })
    }
}

impl TerminationCriterion for MaxDuration {
    fn should_terminate(&self, state: &EvolutionState) -> bool {
        state.elapsed >= self.0
    }

    fn reason(&self) -> &'static str {
        "Time limit reached"
    }
}

/// Combine criteria with OR logic (any one triggers termination)
pub struct AnyOf {
    criteria: Vec<Box<dyn TerminationCriterion>>,
}

impl AnyOf {
    pub fn new(criteria: Vec<Box<dyn TerminationCriterion>>) -> Self {
        Self { criteria }
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl TerminationCriterion for AnyOf {
    fn should_terminate(&self, state: &EvolutionState) -> bool {
        self.criteria.iter().any(|c| c.should_terminate(state))
    }

    fn reason(&self) -> &'static str {
        "One of multiple criteria met"
    }

    fn triggered(&self, state: &EvolutionState) -> Option<&'static str> {
        self.criteria.iter().find_map(|c| c.triggered(state))
    }
}

impl std::fmt::Debug for AnyOf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reasons: Vec<&str> = self.criteria.iter().map(|c| c.reason()).collect();
        f.debug_struct("AnyOf").field("criteria", &reasons).finish()
    }
}

pub mod prelude {
    pub use super::{AnyOf, EvolutionState, MaxDuration, MaxGenerations, TerminationCriterion};
}
