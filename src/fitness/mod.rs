//! Fitness evaluation
//!
//! Costs are minimized. [`INFEASIBLE`] marks a genome that violates a hard
//! constraint.

pub mod traits;
pub mod trajectory;

pub use traits::{is_feasible, Fitness, INFEASIBLE};

pub mod prelude {
    pub use super::traits::*;
    pub use super::trajectory::*;
}
