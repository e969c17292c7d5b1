//! Spatial operations on the abstract dispatch grid.
//!
//! This module provides:
//!
//! - **Location**: an integer point on an unbounded plane
//! - **Distance calculations**: straight-line (Euclidean) and step (Chebyshev) distance
//! - **Step movement**: one tick of diagonal movement toward a target
//!
//! There is no road network: a driver closes at most one unit per axis per tick,
//! so the number of ticks between two points is their Chebyshev distance.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A point on the dispatch grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i64,
    pub y: i64,
}

impl Location {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance, used for ETA scoring.
    pub fn distance_to(&self, other: &Location) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    /// Number of ticks a driver needs to travel from `self` to `other`.
    pub fn steps_to(&self, other: &Location) -> u64 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Moves one unit toward `target` on each axis independently.
    ///
    /// Both axes are computed from the pre-step position, so a driver that is
    /// off on both axes moves diagonally. Never overshoots.
    pub fn step_towards(&self, target: &Location) -> Location {
        Location {
            x: self.x + unit_step(self.x, target.x),
            y: self.y + unit_step(self.y, target.y),
        }
    }
}

/// -1, 0 or +1 toward `to`. Compares instead of subtracting so opposite ends of
/// the `i64` range cannot overflow.
fn unit_step(from: i64, to: i64) -> i64 {
    match to.cmp(&from) {
        Ordering::Greater => 1,
        Ordering::Less => -1,
        Ordering::Equal => 0,
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between a driver and a pickup point.
pub fn eta_between(driver: &Location, pickup: &Location) -> f64 {
    driver.distance_to(pickup)
}
