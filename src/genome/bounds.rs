//! Bounds for wheel speeds
//!
//! Every component of a control pair is confined to an interval, by default
//! the unit interval `[0, 1]`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::OperatorError;

/// Closed interval for a single wheel speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds, rejecting empty or non-finite intervals
    pub fn new(min: f64, max: f64) -> Result<Self, OperatorError> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(OperatorError::InvalidConfiguration(format!(
                "invalid bounds [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// Unit bounds [0, 1]
    pub const fn unit() -> Self {
        Self { min: 0.0, max: 1.0 }
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Draw a value uniformly from `[min, max)`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.range() == 0.0 {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::unit()
    }
}
