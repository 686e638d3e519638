//! # trailer-evo
//!
//! Evolves open-loop wheel-speed schedules that drive a tractor towing a
//! trailer from a start pose to a goal through a field of rectangular
//! obstacles, without jackknifing.
//!
//! A genome is a variable-length [`ControlSequence`](genome::control_sequence::ControlSequence)
//! of `(left, right)` wheel speeds in `[0, 1]`. It is rolled out through the
//! kinematic model in [`kinematics`] and scored by
//! [`TrajectoryFitness`](fitness::trajectory::TrajectoryFitness): infeasible
//! trajectories cost [`INFEASIBLE`](fitness::INFEASIBLE), feasible ones cost
//! `1000 * distance_to_goal + path_length`. The generational GA in
//! [`algorithms::simple_ga`] minimizes that cost.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use trailer_evo::prelude::*;
//!
//! # fn main() -> Result<(), EvolutionError> {
//! let config = OptimizerConfig::default().with_max_generations(50);
//! let mut rng = StdRng::seed_from_u64(config.random_seed);
//!
//! let result = TrailerGA::from_config(&config)?.run(&mut rng)?;
//! println!("best cost {} after {} steps", result.best_fitness, result.best_genome.len());
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod fitness;
pub mod genome;
pub mod kinematics;
pub mod operators;
pub mod population;
pub mod report;
pub mod termination;
pub mod workspace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::algorithms::prelude::*;
    pub use crate::config::OptimizerConfig;
    pub use crate::diagnostics::prelude::*;
    pub use crate::error::*;
    pub use crate::fitness::prelude::*;
    pub use crate::genome::prelude::*;
    pub use crate::kinematics::{simulate, Point, Pose, Trajectory};
    pub use crate::operators::prelude::*;
    pub use crate::population::prelude::*;
    pub use crate::report::{append_record, read_records, RunRecord};
    pub use crate::termination::prelude::*;
    pub use crate::workspace::{Rect, Workspace};
}
