use bevy_ecs::prelude::{Entity, Query, Res};
use tracing::debug;

use crate::clock::CurrentEvent;
use crate::dispatch::{completed_trips_by_driver, select_driver, DispatchCandidate, DispatchConfig};
use crate::ecs::{Driver, DriverRef, RideRef, RideRequest, RideRequestStatus, SpawnSeq};
use crate::spatial::eta_between;

/// Assigns the best eligible driver to the event's ride request.
///
/// Eligible drivers are available and have not rejected this request. Candidates
/// are scored in creation order so ties resolve to the oldest driver. When nobody
/// is eligible the request stays waiting.
pub fn dispatch_system(
    event: Res<CurrentEvent>,
    config: Res<DispatchConfig>,
    mut drivers: Query<(Entity, &SpawnSeq, &mut Driver)>,
    mut requests: Query<&mut RideRequest>,
) {
    let Some(request_entity) = event.0.ride_request() else {
        return;
    };

    let (request_id, pickup, candidates) = {
        let Ok(request) = requests.get(request_entity) else {
            return;
        };
        if request.status != RideRequestStatus::Waiting {
            return;
        }

        let fairness = completed_trips_by_driver(requests.iter());
        let mut eligible: Vec<(SpawnSeq, DispatchCandidate)> = drivers
            .iter()
            .filter(|(_, _, driver)| driver.is_available() && !request.has_rejected(&driver.id))
            .map(|(entity, seq, driver)| {
                (
                    *seq,
                    DispatchCandidate {
                        driver: entity,
                        eta: eta_between(&driver.location, &request.pickup_location),
                        fairness: fairness.get(&driver.id).copied().unwrap_or(0),
                    },
                )
            })
            .collect();
        eligible.sort_by_key(|(seq, _)| *seq);

        let candidates: Vec<DispatchCandidate> =
            eligible.into_iter().map(|(_, candidate)| candidate).collect();
        (request.id.clone(), request.pickup_location, candidates)
    };

    let Some(decision) = select_driver(config.mode, &candidates) else {
        debug!(
            request = %request_id,
            mode = %config.mode,
            "no eligible driver; request keeps waiting"
        );
        return;
    };

    let Ok((_, _, mut driver)) = drivers.get_mut(decision.driver) else {
        return;
    };
    driver.assign(
        RideRef {
            entity: request_entity,
            id: request_id.clone(),
        },
        pickup,
    );
    let driver_ref = DriverRef {
        entity: decision.driver,
        id: driver.id.clone(),
    };

    if let Ok(mut request) = requests.get_mut(request_entity) {
        request.assign(driver_ref.clone());
    }

    debug!(
        request = %request_id,
        driver = %driver_ref.id,
        score = decision.score,
        candidates = candidates.len(),
        mode = %config.mode,
        "assigned driver"
    );
}
