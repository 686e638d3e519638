//! Error types for trailer-evo
//!
//! This module defines all error types used throughout the library.
//! Infeasible control sequences are not errors: they are scored with the
//! [`INFEASIBLE`](crate::fitness::INFEASIBLE) sentinel instead.

use thiserror::Error;

/// Error type for genome construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenomeError {
    /// A wheel speed outside the unit interval
    #[error("Wheel speed {value} at step {step} is outside [0, 1]")]
    SpeedOutOfRange { step: usize, value: f64 },
}

/// Error type for operator construction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperatorError {
    /// Invalid operator configuration
    #[error("Invalid operator configuration: {0}")]
    InvalidConfiguration(String),
}

/// Error type for reading configuration files and writing run logs
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error at line {line}: {message}")]
    Deserialization { line: usize, message: String },
}

/// Top-level error type for evolution operations
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Genome error
    #[error("Genome error: {0}")]
    Genome(#[from] GenomeError),

    /// Operator error
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// Persistence error
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Empty population
    #[error("Empty population")]
    EmptyPopulation,
}

/// Result type alias for evolution operations
pub type EvoResult<T> = Result<T, EvolutionError>;
