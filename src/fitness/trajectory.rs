//! Trajectory cost for the tractor-trailer problem
//!
//! A control sequence is rolled out from the start pose and the resulting
//! trajectory is checked step by step. The first step that jackknifes the
//! trailer, enters an inflated wall or obstacle, or produces a non-finite
//! state makes the whole genome infeasible. Feasible genomes cost
//! `GOAL_WEIGHT * distance_to_goal + path_length`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::fitness::traits::{Fitness, INFEASIBLE};
use crate::genome::control_sequence::ControlSequence;
use crate::kinematics::{simulate, Point, Pose};
use crate::workspace::Workspace;

/// Weight of the final distance to the goal relative to path length
pub const GOAL_WEIGHT: f64 = 1000.0;

/// Constraint that made a genome infeasible
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Violation {
    /// The genome has no steps, so there is no final pose
    EmptyGenome,
    /// A state component overflowed or became NaN
    NonFinite { step: usize },
    /// `|phi|` exceeded the articulation limit
    Articulation { step: usize, phi: f64 },
    /// The tractor entered an inflated wall
    Wall { step: usize },
    /// The tractor entered an inflated obstacle
    Obstacle { step: usize },
}

/// Outcome of scoring a single genome
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Assessment {
    Feasible {
        fitness: f64,
        path_length: f64,
        goal_distance: f64,
    },
    Infeasible(Violation),
}

impl Assessment {
    /// Scalar cost, [`INFEASIBLE`] for violations
    pub fn fitness(&self) -> f64 {
        match self {
            Assessment::Feasible { fitness, .. } => *fitness,
            Assessment::Infeasible(_) => INFEASIBLE,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Assessment::Feasible { .. })
    }

    pub fn violation(&self) -> Option<Violation> {
        match self {
            Assessment::Feasible { .. } => None,
            Assessment::Infeasible(v) => Some(*v),
        }
    }
}

/// Scores control sequences against a fixed scenario
#[derive(Clone, Debug)]
pub struct TrajectoryFitness {
    start: Pose,
    goal: Point,
    max_articulation: f64,
    workspace: Arc<Workspace>,
}

impl TrajectoryFitness {
    pub fn new(start: Pose, goal: Point, max_articulation: f64, workspace: Arc<Workspace>) -> Self {
        Self {
            start,
            goal,
            max_articulation,
            workspace,
        }
    }

    pub fn start(&self) -> Pose {
        self.start
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Roll out `genome` and classify the result
    pub fn assess(&self, genome: &ControlSequence) -> Assessment {
        if genome.is_empty() {
            return Assessment::Infeasible(Violation::EmptyGenome);
        }

        let trajectory = simulate(genome, self.start);
        for (step, pose) in trajectory.iter().enumerate() {
            if let Some(violation) = self.check_pose(step, pose) {
                return Assessment::Infeasible(violation);
            }
        }

        let Some(last) = trajectory.last() else {
            return Assessment::Infeasible(Violation::EmptyGenome);
        };
        let path_length = trajectory.path_length();
        let goal_distance = last.position().distance(&self.goal);
        let fitness = GOAL_WEIGHT * goal_distance + path_length;
        if !fitness.is_finite() {
            return Assessment::Infeasible(Violation::NonFinite {
                step: trajectory.len() - 1,
            });
        }

        Assessment::Feasible {
            fitness,
            path_length,
            goal_distance,
        }
    }

    fn check_pose(&self, step: usize, pose: &Pose) -> Option<Violation> {
        if !pose.is_finite() {
            return Some(Violation::NonFinite { step });
        }
        if pose.phi.abs() > self.max_articulation {
            return Some(Violation::Articulation {
                step,
                phi: pose.phi,
            });
        }
        if self.workspace.hits_wall(pose.x, pose.y) {
            return Some(Violation::Wall { step });
        }
        if self.workspace.hits_obstacle(pose.x, pose.y) {
            return Some(Violation::Obstacle { step });
        }
        None
    }
}

impl Fitness for TrajectoryFitness {
    type Genome = ControlSequence;

    fn evaluate(&self, genome: &ControlSequence) -> f64 {
        let assessment = self.assess(genome);
        if let Some(violation) = assessment.violation() {
            trace!(?violation, length = genome.len(), "infeasible control sequence");
        }
        assessment.fitness()
    }
}
