use sim_core::dispatch::DispatchMode;
use sim_core::ecs::{DriverId, RideRequestId};
use sim_core::simulation::Simulation;
use sim_core::spatial::Location;
use sim_core::telemetry::{DriverSnapshot, RideRequestSnapshot};
use sim_core::test_helpers::{loc, request_ride_for};

/// Builder for a simulation pre-populated with drivers.
///
/// Drivers are created in the order they are added, which is also the
/// dispatch tie-break order.
#[derive(Clone, Debug, Default)]
pub struct FleetBuilder {
    mode: DispatchMode,
    drivers: Vec<(String, Location)>,
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_driver(mut self, id: &str, x: i64, y: i64) -> Self {
        self.drivers.push((id.to_string(), loc(x, y)));
        self
    }

    pub fn build(self) -> Simulation {
        let mut sim = Simulation::new(self.mode);
        for (id, location) in self.drivers {
            sim.create_driver(DriverId(id), location)
                .expect("fleet driver ids are unique");
        }
        sim
    }
}

/// Requests a ride and panics on failure.
pub fn ride(
    sim: &mut Simulation,
    name: &str,
    pickup: Location,
    dropoff: Location,
) -> RideRequestSnapshot {
    request_ride_for(sim, name, pickup, dropoff).expect("ride request")
}

pub fn driver(sim: &Simulation, id: &str) -> DriverSnapshot {
    sim.driver(&DriverId::from(id)).expect("driver exists")
}

pub fn request(sim: &Simulation, name: &str) -> RideRequestSnapshot {
    sim.ride_request(&RideRequestId(format!("req-{name}")))
        .expect("request exists")
}

pub fn assigned(request: &RideRequestSnapshot) -> Option<&str> {
    request.assigned_driver_id.as_ref().map(|id| id.as_str())
}
