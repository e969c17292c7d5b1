//! Serializable snapshots of registry state, as exposed to API callers.

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::clock::SimulationClock;
use crate::ecs::{
    Driver, DriverId, DriverStatusKind, RideRequest, RideRequestId, RideRequestStatus, Rider,
    RiderId,
};
use crate::registry::components_in_spawn_order;
use crate::spatial::Location;

/// Snapshot of one driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverSnapshot {
    pub id: DriverId,
    pub location: Location,
    pub status: DriverStatusKind,
    pub current_ride_id: Option<RideRequestId>,
    pub target_location: Option<Location>,
    pub is_moving_to_pickup: bool,
}

impl From<&Driver> for DriverSnapshot {
    fn from(driver: &Driver) -> Self {
        Self {
            id: driver.id.clone(),
            location: driver.location,
            status: driver.status.kind(),
            current_ride_id: driver.current_ride_id().cloned(),
            target_location: driver.target_location(),
            is_moving_to_pickup: driver.is_moving_to_pickup(),
        }
    }
}

/// Snapshot of one rider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiderSnapshot {
    pub id: RiderId,
    pub pickup_location: Location,
    pub dropoff_location: Location,
}

impl From<&Rider> for RiderSnapshot {
    fn from(rider: &Rider) -> Self {
        Self {
            id: rider.id.clone(),
            pickup_location: rider.pickup_location,
            dropoff_location: rider.dropoff_location,
        }
    }
}

/// Snapshot of one ride request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideRequestSnapshot {
    pub id: RideRequestId,
    pub rider_id: RiderId,
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub status: RideRequestStatus,
    pub assigned_driver_id: Option<DriverId>,
    pub rejected_drivers: Vec<DriverId>,
}

impl From<&RideRequest> for RideRequestSnapshot {
    fn from(request: &RideRequest) -> Self {
        Self {
            id: request.id.clone(),
            rider_id: request.rider_id.clone(),
            pickup_location: request.pickup_location,
            dropoff_location: request.dropoff_location,
            status: request.status,
            assigned_driver_id: request.assigned_driver_id().cloned(),
            rejected_drivers: request.rejected_drivers.clone(),
        }
    }
}

/// Full simulation state at the current tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimSnapshot {
    pub tick: u64,
    pub drivers: Vec<DriverSnapshot>,
    pub riders: Vec<RiderSnapshot>,
    pub ride_requests: Vec<RideRequestSnapshot>,
}

pub fn driver_snapshots(world: &World) -> Vec<DriverSnapshot> {
    components_in_spawn_order::<Driver>(world)
        .into_iter()
        .map(DriverSnapshot::from)
        .collect()
}

pub fn rider_snapshots(world: &World) -> Vec<RiderSnapshot> {
    components_in_spawn_order::<Rider>(world)
        .into_iter()
        .map(RiderSnapshot::from)
        .collect()
}

pub fn ride_request_snapshots(world: &World) -> Vec<RideRequestSnapshot> {
    components_in_spawn_order::<RideRequest>(world)
        .into_iter()
        .map(RideRequestSnapshot::from)
        .collect()
}

pub fn capture_snapshot(world: &World) -> SimSnapshot {
    SimSnapshot {
        tick: world.resource::<SimulationClock>().now(),
        drivers: driver_snapshots(world),
        riders: rider_snapshots(world),
        ride_requests: ride_request_snapshots(world),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::RideRef;
    use bevy_ecs::prelude::Entity;

    #[test]
    fn driver_snapshot_serializes_with_api_field_names() {
        let mut driver = Driver::new(DriverId::from("d1"), Location::new(1, 2));
        driver.assign(
            RideRef {
                entity: Entity::from_raw(4),
                id: RideRequestId::from("q1"),
            },
            Location::new(3, 3),
        );

        let json = serde_json::to_value(DriverSnapshot::from(&driver)).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "id": "d1",
                "location": {"x": 1, "y": 2},
                "status": "on_trip",
                "current_ride_id": "q1",
                "target_location": {"x": 3, "y": 3},
                "is_moving_to_pickup": true,
            })
        );
    }

    #[test]
    fn available_driver_has_null_trip_fields() {
        let driver = Driver::new(DriverId::from("d1"), Location::new(0, 0));
        let json = serde_json::to_value(DriverSnapshot::from(&driver)).expect("json");
        assert_eq!(json["status"], "available");
        assert!(json["current_ride_id"].is_null());
        assert!(json["target_location"].is_null());
        assert_eq!(json["is_moving_to_pickup"], false);
    }
}
