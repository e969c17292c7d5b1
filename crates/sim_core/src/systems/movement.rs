//! Movement system: advances every on-trip driver one grid step per tick.
//!
//! Drivers move toward their current target one unit per axis. Reaching the
//! pickup switches the target to the dropoff; reaching the dropoff completes the
//! ride and frees the driver. Drivers are processed in creation order.

use bevy_ecs::prelude::{Query, Res};
use tracing::{debug, warn};

use crate::clock::SimulationClock;
use crate::ecs::{Driver, DriverStatus, RideRequest, SpawnSeq, TripLeg};

enum Arrival {
    Pickup,
    Dropoff,
}

pub fn movement_system(
    clock: Res<SimulationClock>,
    mut drivers: Query<(&SpawnSeq, &mut Driver)>,
    mut requests: Query<&mut RideRequest>,
) {
    let mut en_route: Vec<_> = drivers
        .iter_mut()
        .filter(|(_, driver)| driver.assignment().is_some())
        .collect();
    en_route.sort_by_key(|(seq, _)| **seq);

    for (_, mut driver) in en_route {
        let driver = &mut *driver;
        let DriverStatus::OnTrip(assignment) = &mut driver.status else {
            continue;
        };

        driver.location = driver.location.step_towards(&assignment.target);
        if driver.location != assignment.target {
            continue;
        }

        let arrival = match assignment.leg {
            TripLeg::ToPickup => Arrival::Pickup,
            TripLeg::ToDropoff => Arrival::Dropoff,
        };

        let Ok(mut request) = requests.get_mut(assignment.ride.entity) else {
            warn!(
                driver = %driver.id,
                request = %assignment.ride.id,
                "on-trip driver references a missing ride request"
            );
            continue;
        };

        match arrival {
            Arrival::Pickup => {
                assignment.leg = TripLeg::ToDropoff;
                assignment.target = request.dropoff_location;
                debug!(
                    tick = clock.now(),
                    driver = %driver.id,
                    request = %request.id,
                    "picked up rider"
                );
            }
            Arrival::Dropoff => {
                request.complete();
                debug!(
                    tick = clock.now(),
                    driver = %driver.id,
                    request = %request.id,
                    "ride completed"
                );
                driver.release();
            }
        }
    }
}
