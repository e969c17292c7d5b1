//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::World;

use crate::dispatch::{DispatchConfig, DispatchMode};
use crate::ecs::{RideRequestId, RiderId};
use crate::error::SimError;
use crate::simulation::Simulation;
use crate::spatial::Location;
use crate::telemetry::RideRequestSnapshot;

/// Shorthand for [`Location::new`].
pub fn loc(x: i64, y: i64) -> Location {
    Location::new(x, y)
}

/// Create a basic test world with essential resources.
///
/// This is a convenience function for tests that drive systems directly.
/// For end-to-end flows, use [`Simulation`].
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(crate::clock::SimulationClock::default());
    world.insert_resource(crate::registry::EntityIndex::default());
    world.insert_resource(DispatchConfig::default());
    world
}

/// A fresh simulation using `mode`.
pub fn create_test_simulation(mode: DispatchMode) -> Simulation {
    Simulation::new(mode)
}

/// Registers a rider and immediately requests a ride for them.
///
/// The rider and request ids are derived from `name` (`rider-<name>`, `req-<name>`).
pub fn request_ride_for(
    sim: &mut Simulation,
    name: &str,
    pickup: Location,
    dropoff: Location,
) -> Result<RideRequestSnapshot, SimError> {
    let rider_id = RiderId(format!("rider-{name}"));
    sim.create_rider(rider_id.clone(), pickup, dropoff)?;
    sim.request_ride(RideRequestId(format!("req-{name}")), &rider_id)
}

/// Advances the simulation `ticks` times.
pub fn advance_by(sim: &mut Simulation, ticks: u64) -> u64 {
    for _ in 0..ticks {
        sim.advance();
    }
    sim.tick()
}
