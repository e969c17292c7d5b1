//! Simulation coordinator: the single owner of the ECS world.
//!
//! Every externally visible operation is a synchronous method here. Callers that
//! share a [Simulation] across threads must wrap it in one lock and hold it for
//! the whole call; nothing inside suspends or performs I/O.

use bevy_ecs::prelude::{Component, Entity, Schedule, World};
use tracing::debug;

use crate::clock::{EventKind, EventSubject, SimulationClock};
use crate::dispatch::{DispatchConfig, DispatchMode};
use crate::ecs::{
    Driver, DriverId, RideRequest, RideRequestId, RideRequestStatus, Rider, RiderId,
};
use crate::error::{EntityKind, SimError};
use crate::metrics::{compute_metrics, SimMetrics};
use crate::registry::{
    despawn_driver, despawn_rider, spawn_driver, spawn_ride_request, spawn_rider, EntityIndex,
};
use crate::runner::{run_event, simulation_schedule};
use crate::spatial::Location;
use crate::telemetry::{
    capture_snapshot, driver_snapshots, ride_request_snapshots, rider_snapshots, DriverSnapshot,
    RideRequestSnapshot, RiderSnapshot, SimSnapshot,
};

pub struct Simulation {
    world: World,
    schedule: Schedule,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(DispatchMode::default())
    }
}

impl Simulation {
    pub fn new(mode: DispatchMode) -> Self {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(EntityIndex::default());
        world.insert_resource(DispatchConfig { mode });
        Self {
            world,
            schedule: simulation_schedule(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.world.resource::<SimulationClock>().now()
    }

    pub fn create_driver(
        &mut self,
        id: DriverId,
        location: Location,
    ) -> Result<DriverSnapshot, SimError> {
        let entity = spawn_driver(&mut self.world, id, location)?;
        self.snapshot::<Driver, DriverSnapshot>(entity, EntityKind::Driver)
    }

    pub fn delete_driver(&mut self, id: &DriverId) -> Result<(), SimError> {
        despawn_driver(&mut self.world, id)
    }

    pub fn drivers(&self) -> Vec<DriverSnapshot> {
        driver_snapshots(&self.world)
    }

    pub fn driver(&self, id: &DriverId) -> Option<DriverSnapshot> {
        let entity = self.index().driver(id)?;
        self.world.get::<Driver>(entity).map(DriverSnapshot::from)
    }

    pub fn create_rider(
        &mut self,
        id: RiderId,
        pickup_location: Location,
        dropoff_location: Location,
    ) -> Result<RiderSnapshot, SimError> {
        let entity = spawn_rider(&mut self.world, id, pickup_location, dropoff_location)?;
        self.snapshot::<Rider, RiderSnapshot>(entity, EntityKind::Rider)
    }

    pub fn delete_rider(&mut self, id: &RiderId) -> Result<(), SimError> {
        despawn_rider(&mut self.world, id)
    }

    pub fn riders(&self) -> Vec<RiderSnapshot> {
        rider_snapshots(&self.world)
    }

    /// Creates a ride request for `rider_id` and dispatches it immediately.
    ///
    /// The returned snapshot reflects the dispatch outcome: `assigned` with a
    /// driver, or `waiting` if no driver was eligible.
    pub fn request_ride(
        &mut self,
        id: RideRequestId,
        rider_id: &RiderId,
    ) -> Result<RideRequestSnapshot, SimError> {
        let entity = spawn_ride_request(&mut self.world, id, rider_id)?;
        run_event(
            &mut self.world,
            &mut self.schedule,
            EventKind::RideRequested,
            Some(EventSubject::RideRequest(entity)),
        );
        self.snapshot::<RideRequest, RideRequestSnapshot>(entity, EntityKind::RideRequest)
    }

    /// The assigned driver turns the request down.
    ///
    /// The driver is excluded from this request for good, freed, and the request
    /// is dispatched again before this returns.
    ///
    /// # Errors
    ///
    /// * [SimError::NotFound] if the request does not exist.
    /// * [SimError::InvalidState] if `driver_id` is not the request's assigned
    ///   driver, or the request is no longer in the assigned state.
    pub fn reject_assignment(
        &mut self,
        request_id: &RideRequestId,
        driver_id: &DriverId,
    ) -> Result<RideRequestSnapshot, SimError> {
        let entity = self
            .index()
            .ride_request(request_id)
            .ok_or_else(|| SimError::not_found(EntityKind::RideRequest, request_id))?;
        let request = self
            .world
            .get::<RideRequest>(entity)
            .ok_or_else(|| SimError::not_found(EntityKind::RideRequest, request_id))?;

        if request.assigned_driver_id() != Some(driver_id) {
            return Err(SimError::InvalidState(
                "Driver not assigned to this ride".to_string(),
            ));
        }
        // A completed request keeps its last driver id; that driver may already
        // be serving another ride and must not be released by a stale reject.
        if request.status != RideRequestStatus::Assigned {
            return Err(SimError::InvalidState(format!(
                "Ride request is {:?} and can no longer be rejected",
                request.status
            )));
        }

        run_event(
            &mut self.world,
            &mut self.schedule,
            EventKind::AssignmentRejected,
            Some(EventSubject::RideRequest(entity)),
        );
        self.snapshot::<RideRequest, RideRequestSnapshot>(entity, EntityKind::RideRequest)
    }

    pub fn ride_requests(&self) -> Vec<RideRequestSnapshot> {
        ride_request_snapshots(&self.world)
    }

    pub fn ride_request(&self, id: &RideRequestId) -> Option<RideRequestSnapshot> {
        let entity = self.index().ride_request(id)?;
        self.world
            .get::<RideRequest>(entity)
            .map(RideRequestSnapshot::from)
    }

    /// Advances the clock by one tick and returns the new tick.
    pub fn advance(&mut self) -> u64 {
        let event = run_event(&mut self.world, &mut self.schedule, EventKind::Tick, None);
        event.tick
    }

    pub fn state(&self) -> SimSnapshot {
        capture_snapshot(&self.world)
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.world.resource::<DispatchConfig>().mode
    }

    /// Switches the scoring policy used by future dispatches. Setting the current
    /// mode again is a no-op.
    pub fn set_dispatch_mode(&mut self, mode: DispatchMode) {
        let mut config = self.world.resource_mut::<DispatchConfig>();
        if config.mode != mode {
            debug!(from = %config.mode, to = %mode, "dispatch mode changed");
            config.mode = mode;
        }
    }

    pub fn metrics(&self) -> SimMetrics {
        compute_metrics(&self.world)
    }

    fn index(&self) -> &EntityIndex {
        self.world.resource::<EntityIndex>()
    }

    fn snapshot<T, S>(&self, entity: Entity, kind: EntityKind) -> Result<S, SimError>
    where
        T: Component,
        S: for<'a> From<&'a T>,
    {
        self.world
            .get::<T>(entity)
            .map(S::from)
            .ok_or_else(|| SimError::not_found(kind, format!("{entity:?}")))
    }
}
