//! Evolutionary algorithms

pub mod simple_ga;

pub mod prelude {
    pub use super::simple_ga::*;
}
