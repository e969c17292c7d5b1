//! Aggregate KPIs derived from the registry. Read-only; nothing is cached
//! between calls.

use bevy_ecs::prelude::World;
use serde::Serialize;

use crate::clock::SimulationClock;
use crate::dispatch::{DispatchConfig, DispatchMode};
use crate::ecs::{Driver, DriverStatusKind, RideRequest, RideRequestStatus};
use crate::registry::{components_in_spawn_order, EntityIndex};
use crate::spatial::eta_between;

const COMPLETION_WEIGHT: f64 = 0.7;
const UTILIZATION_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimMetrics {
    pub total_requests: usize,
    pub completed_rides: usize,
    pub waiting_rides: usize,
    pub assigned_rides: usize,
    /// Completed / total requests, in `[0, 1]`.
    pub completion_rate: f64,
    pub completion_rate_percent: f64,
    pub available_drivers: usize,
    pub busy_drivers: usize,
    /// On-trip / total drivers, in `[0, 1]`.
    pub driver_utilization: f64,
    pub driver_utilization_percent: f64,
    pub total_drivers: usize,
    pub total_riders: usize,
    pub current_tick: u64,
    pub dispatch_algorithm: DispatchMode,
    pub average_eta: f64,
    pub system_efficiency: f64,
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole`, or 0 when `whole` is 0.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Weighted blend of completion rate and utilization, as a percentage.
///
/// No special case for an empty fleet or an empty request log: once every
/// driver is deleted this still reports `70 * completion_rate`, not 0.
pub fn system_efficiency(completion_rate: f64, driver_utilization: f64) -> f64 {
    round2(100.0 * (COMPLETION_WEIGHT * completion_rate + UTILIZATION_WEIGHT * driver_utilization))
}

/// Mean distance between each completed request's driver and its pickup.
///
/// Uses where the driver is *now*, not where it was when assigned. Completed
/// requests whose driver has since been deleted add 0 to the sum but still count
/// in the denominator.
pub fn average_eta(world: &World, requests: &[&RideRequest]) -> f64 {
    let completed: Vec<&&RideRequest> = requests
        .iter()
        .filter(|r| r.status == RideRequestStatus::Completed)
        .collect();
    if completed.is_empty() {
        return 0.0;
    }

    let total: f64 = completed
        .iter()
        .filter_map(|request| {
            let driver = request.assigned_driver.as_ref()?;
            let driver = world.get::<Driver>(driver.entity)?;
            Some(eta_between(&driver.location, &request.pickup_location))
        })
        .sum();

    round2(total / completed.len() as f64)
}

pub fn compute_metrics(world: &World) -> SimMetrics {
    let drivers = components_in_spawn_order::<Driver>(world);
    let requests = components_in_spawn_order::<RideRequest>(world);

    let count_requests =
        |status: RideRequestStatus| requests.iter().filter(|r| r.status == status).count();
    let count_drivers =
        |status: DriverStatusKind| drivers.iter().filter(|d| d.status.kind() == status).count();

    let total_requests = requests.len();
    let completed_rides = count_requests(RideRequestStatus::Completed);
    let total_drivers = drivers.len();
    let busy_drivers = count_drivers(DriverStatusKind::OnTrip);

    let completion_rate = ratio(completed_rides, total_requests);
    let driver_utilization = ratio(busy_drivers, total_drivers);

    SimMetrics {
        total_requests,
        completed_rides,
        waiting_rides: count_requests(RideRequestStatus::Waiting),
        assigned_rides: count_requests(RideRequestStatus::Assigned),
        completion_rate,
        completion_rate_percent: round2(completion_rate * 100.0),
        available_drivers: count_drivers(DriverStatusKind::Available),
        busy_drivers,
        driver_utilization,
        driver_utilization_percent: round2(driver_utilization * 100.0),
        total_drivers,
        total_riders: world.resource::<EntityIndex>().rider_count(),
        current_tick: world.resource::<SimulationClock>().now(),
        dispatch_algorithm: world.resource::<DispatchConfig>().mode,
        average_eta: average_eta(world, &requests),
        system_efficiency: system_efficiency(completion_rate, driver_utilization),
    }
}
