//! Genome abstractions and implementations
//!
//! This module provides the core `EvolutionaryGenome` trait and the
//! control-sequence genome steering the tractor-trailer.

pub mod bounds;
pub mod control_sequence;
pub mod traits;

pub mod prelude {
    pub use super::bounds::*;
    pub use super::control_sequence::*;
    pub use super::traits::*;
}
