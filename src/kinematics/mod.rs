//! Tractor-trailer kinematics
//!
//! Forward-Euler integration of a differential-drive tractor towing a
//! single trailer, with a unit timestep. The trailer angle `phi` is measured
//! relative to the tractor heading `theta`.

use serde::{Deserialize, Serialize};

use crate::genome::control_sequence::{ControlPair, ControlSequence};

/// Planar position
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Tractor position, tractor heading and trailer articulation angle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Pose {
    pub const fn new(x: f64, y: f64, theta: f64, phi: f64) -> Self {
        Self { x, y, theta, phi }
    }

    /// Tractor position
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Whether every component is a finite number
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.theta.is_finite() && self.phi.is_finite()
    }

    /// Advance one unit timestep under `control`.
    ///
    /// All derivatives are taken at the current state.
    pub fn step(&self, control: &ControlPair) -> Pose {
        let u1 = control.forward_speed();
        let u2 = control.turn_rate();
        Pose {
            x: self.x + self.theta.cos() * u1,
            y: self.y + self.theta.sin() * u1,
            theta: self.theta + u2,
            phi: self.phi - self.phi.sin() * u1 + u2,
        }
    }
}

/// States visited by the vehicle, one per applied control
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    poses: Vec<Pose>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pose> {
        self.poses.iter()
    }

    /// State after the final control
    pub fn last(&self) -> Option<&Pose> {
        self.poses.last()
    }

    /// Sum of distances between consecutive positions.
    ///
    /// The leg from the start pose to the first state is not counted.
    pub fn path_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|w| w[0].position().distance(&w[1].position()))
            .sum()
    }

    pub fn into_poses(self) -> Vec<Pose> {
        self.poses
    }
}

/// Roll the vehicle forward from `start` through every control in `genome`.
///
/// Entry `i` of the result is the state after applying control `i`, so the
/// trajectory is exactly as long as the genome.
pub fn simulate(genome: &ControlSequence, start: Pose) -> Trajectory {
    let mut poses = Vec::with_capacity(genome.len());
    let mut pose = start;
    for control in genome {
        pose = pose.step(control);
        poses.push(pose);
    }
    Trajectory { poses }
}
