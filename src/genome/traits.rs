//! Core genome traits
//!
//! This module defines the `EvolutionaryGenome` trait used by the
//! population, the operators and the generational driver.

use rand::Rng;
use serde::{de::DeserializeOwned, Serialize};

use crate::genome::bounds::Bounds;

/// Core genome abstraction for evolutionary algorithms.
///
/// Genomes must be cloneable, serializable, and thread-safe so that a
/// population can be evaluated in parallel and persisted in run records.
/// The length of a genome is a run-time property: operators are free to
/// shorten it, and consumers must never assume the initial horizon.
pub trait EvolutionaryGenome: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Number of genes currently held
    fn dimension(&self) -> usize;

    /// Generate a random genome of `length` genes within the given bounds
    fn generate<R: Rng>(rng: &mut R, length: usize, bounds: &Bounds) -> Self;

    /// Check whether the genome holds no genes
    fn is_empty(&self) -> bool {
        self.dimension() == 0
    }
}
