//! Static workspace model
//!
//! Walls and obstacles are axis-aligned rectangles. Collision queries test a
//! point against every rectangle grown by [`SAFETY_MARGIN`] on each side,
//! with inclusive bounds.

use serde::{Deserialize, Serialize};

use crate::error::EvolutionError;

/// Clearance added to every side of every rectangle
pub const SAFETY_MARGIN: f64 = 2.0;

/// Axis-aligned rectangle `(x_min, y_min, x_max, y_max)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Whether `(x, y)` lies in this rectangle grown by `margin`
    pub fn contains_inflated(&self, x: f64, y: f64, margin: f64) -> bool {
        self.x_min - margin <= x
            && x <= self.x_max + margin
            && self.y_min - margin <= y
            && y <= self.y_max + margin
    }

    /// Finite corners with `min <= max` on both axes
    pub fn is_well_formed(&self) -> bool {
        [self.x_min, self.y_min, self.x_max, self.y_max]
            .iter()
            .all(|v| v.is_finite())
            && self.x_min <= self.x_max
            && self.y_min <= self.y_max
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    fn from((x_min, y_min, x_max, y_max): (f64, f64, f64, f64)) -> Self {
        Self::new(x_min, y_min, x_max, y_max)
    }
}

/// Boundary walls of the 100 x 100 arena
pub const ARENA_WALLS: [Rect; 4] = [
    Rect::new(0.0, 99.0, 100.0, 100.0),
    Rect::new(0.0, 1.0, 1.0, 99.0),
    Rect::new(0.0, 0.0, 100.0, 1.0),
    Rect::new(99.0, 1.0, 100.0, 99.0),
];

/// Interior obstacles of the reference arena
pub const ARENA_OBSTACLES: [Rect; 9] = [
    Rect::new(56.0, 1.0, 62.0, 12.0),
    Rect::new(1.0, 30.0, 22.0, 36.0),
    Rect::new(22.0, 30.0, 28.0, 42.0),
    Rect::new(28.0, 36.0, 40.0, 42.0),
    Rect::new(64.0, 38.0, 70.0, 60.0),
    Rect::new(70.0, 38.0, 99.0, 44.0),
    Rect::new(36.0, 58.0, 42.0, 72.0),
    Rect::new(30.0, 72.0, 46.0, 78.0),
    Rect::new(72.0, 76.0, 80.0, 99.0),
];

/// Immutable set of walls and obstacles
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkspace")]
pub struct Workspace {
    walls: Vec<Rect>,
    obstacles: Vec<Rect>,
}

/// Unchecked serde form of [`Workspace`]
#[derive(Deserialize)]
struct RawWorkspace {
    walls: Vec<Rect>,
    obstacles: Vec<Rect>,
}

impl TryFrom<RawWorkspace> for Workspace {
    type Error = EvolutionError;

    fn try_from(raw: RawWorkspace) -> Result<Self, Self::Error> {
        Self::new(raw.walls, raw.obstacles)
    }
}

impl Workspace {
    /// Build a workspace, rejecting malformed rectangles
    pub fn new(walls: Vec<Rect>, obstacles: Vec<Rect>) -> Result<Self, EvolutionError> {
        for (kind, rects) in [("wall", &walls), ("obstacle", &obstacles)] {
            if let Some((i, r)) = rects.iter().enumerate().find(|(_, r)| !r.is_well_formed()) {
                return Err(EvolutionError::Configuration(format!(
                    "{kind} {i} is malformed: {r:?}"
                )));
            }
        }
        Ok(Self { walls, obstacles })
    }

    /// The reference 100 x 100 arena with four walls and nine obstacles
    pub fn arena() -> Self {
        Self {
            walls: ARENA_WALLS.to_vec(),
            obstacles: ARENA_OBSTACLES.to_vec(),
        }
    }

    pub fn walls(&self) -> &[Rect] {
        &self.walls
    }

    pub fn obstacles(&self) -> &[Rect] {
        &self.obstacles
    }

    pub fn hits_wall(&self, x: f64, y: f64) -> bool {
        Self::hits_any(&self.walls, x, y)
    }

    pub fn hits_obstacle(&self, x: f64, y: f64) -> bool {
        Self::hits_any(&self.obstacles, x, y)
    }

    /// Whether `(x, y)` is inside any inflated wall or obstacle
    pub fn is_blocked(&self, x: f64, y: f64) -> bool {
        self.hits_wall(x, y) || self.hits_obstacle(x, y)
    }

    fn hits_any(rects: &[Rect], x: f64, y: f64) -> bool {
        rects
            .iter()
            .any(|r| r.contains_inflated(x, y, SAFETY_MARGIN))
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::arena()
    }
}
