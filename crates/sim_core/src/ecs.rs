use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::spatial::Location;

macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

external_id!(
    /// Opaque driver identifier handed out by the caller.
    DriverId
);
external_id!(
    /// Opaque rider identifier handed out by the caller.
    RiderId
);
external_id!(
    /// Opaque ride request identifier handed out by the caller.
    RideRequestId
);

/// Creation order of an entity. Used wherever iteration order must be deterministic
/// (dispatch tie-breaking, movement order, listings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Component)]
pub struct SpawnSeq(pub u64);

/// Link from a driver to the ride it is serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RideRef {
    pub entity: Entity,
    pub id: RideRequestId,
}

/// Link from a ride request to the driver assigned to it.
///
/// The entity may no longer exist if the driver was deleted mid-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverRef {
    pub entity: Entity,
    pub id: DriverId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripLeg {
    ToPickup,
    ToDropoff,
}

/// What an on-trip driver is doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub ride: RideRef,
    pub target: Location,
    pub leg: TripLeg,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStatus {
    Available,
    OnTrip(Assignment),
    Offline,
}

/// Status label without the assignment payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatusKind {
    Available,
    OnTrip,
    Offline,
}

impl DriverStatus {
    pub fn kind(&self) -> DriverStatusKind {
        match self {
            DriverStatus::Available => DriverStatusKind::Available,
            DriverStatus::OnTrip(_) => DriverStatusKind::OnTrip,
            DriverStatus::Offline => DriverStatusKind::Offline,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Driver {
    pub id: DriverId,
    pub location: Location,
    pub status: DriverStatus,
}

impl Driver {
    pub fn new(id: DriverId, location: Location) -> Self {
        Self {
            id,
            location,
            status: DriverStatus::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, DriverStatus::Available)
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match &self.status {
            DriverStatus::OnTrip(assignment) => Some(assignment),
            DriverStatus::Available | DriverStatus::Offline => None,
        }
    }

    pub fn current_ride_id(&self) -> Option<&RideRequestId> {
        self.assignment().map(|a| &a.ride.id)
    }

    pub fn target_location(&self) -> Option<Location> {
        self.assignment().map(|a| a.target)
    }

    pub fn is_moving_to_pickup(&self) -> bool {
        self.assignment()
            .is_some_and(|a| a.leg == TripLeg::ToPickup)
    }

    /// Puts the driver on a trip heading to `pickup`.
    pub fn assign(&mut self, ride: RideRef, pickup: Location) {
        self.status = DriverStatus::OnTrip(Assignment {
            ride,
            target: pickup,
            leg: TripLeg::ToPickup,
        });
    }

    /// Returns the driver to the available pool, dropping any assignment.
    pub fn release(&mut self) {
        self.status = DriverStatus::Available;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Rider {
    pub id: RiderId,
    pub pickup_location: Location,
    pub dropoff_location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideRequestStatus {
    Waiting,
    Assigned,
    /// Reserved; no transition produces it.
    Rejected,
    Completed,
    /// Reserved; no transition produces it.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct RideRequest {
    pub id: RideRequestId,
    pub rider_id: RiderId,
    /// Copied from the rider at creation so deleting the rider cannot affect the trip.
    pub pickup_location: Location,
    pub dropoff_location: Location,
    pub status: RideRequestStatus,
    pub assigned_driver: Option<DriverRef>,
    /// Drivers that rejected this request, in rejection order. Never shrinks.
    pub rejected_drivers: Vec<DriverId>,
}

impl RideRequest {
    pub fn new(id: RideRequestId, rider: &Rider) -> Self {
        Self {
            id,
            rider_id: rider.id.clone(),
            pickup_location: rider.pickup_location,
            dropoff_location: rider.dropoff_location,
            status: RideRequestStatus::Waiting,
            assigned_driver: None,
            rejected_drivers: Vec::new(),
        }
    }

    pub fn assigned_driver_id(&self) -> Option<&DriverId> {
        self.assigned_driver.as_ref().map(|d| &d.id)
    }

    pub fn has_rejected(&self, driver: &DriverId) -> bool {
        self.rejected_drivers.contains(driver)
    }

    /// The driver this request counts toward for fairness, once completed.
    pub fn completed_by(&self) -> Option<&DriverId> {
        match self.status {
            RideRequestStatus::Completed => self.assigned_driver_id(),
            _ => None,
        }
    }

    pub fn assign(&mut self, driver: DriverRef) {
        self.status = RideRequestStatus::Assigned;
        self.assigned_driver = Some(driver);
    }

    /// Records a rejection by the assigned driver and puts the request back to
    /// waiting. Returns the driver that was released.
    pub fn reject_assignment(&mut self) -> Option<DriverRef> {
        let driver = self.assigned_driver.take()?;
        if !self.has_rejected(&driver.id) {
            self.rejected_drivers.push(driver.id.clone());
        }
        self.status = RideRequestStatus::Waiting;
        Some(driver)
    }

    pub fn complete(&mut self) {
        self.status = RideRequestStatus::Completed;
    }
}
