use bevy_ecs::prelude::{Query, Res};
use tracing::debug;

use crate::clock::CurrentEvent;
use crate::ecs::{Driver, RideRequest};

/// Handles a driver turning down the event's ride request.
///
/// The driver is added to the request's rejection list, the request goes back to
/// waiting and the driver becomes available again. Re-dispatch runs right after
/// this system in the same schedule pass.
pub fn assignment_rejected_system(
    event: Res<CurrentEvent>,
    mut drivers: Query<&mut Driver>,
    mut requests: Query<&mut RideRequest>,
) {
    let Some(request_entity) = event.0.ride_request() else {
        return;
    };
    let Ok(mut request) = requests.get_mut(request_entity) else {
        return;
    };
    let Some(released) = request.reject_assignment() else {
        return;
    };

    match drivers.get_mut(released.entity) {
        Ok(mut driver) => driver.release(),
        Err(_) => debug!(
            request = %request.id,
            driver = %released.id,
            "rejecting driver no longer registered"
        ),
    }

    debug!(
        request = %request.id,
        driver = %released.id,
        rejections = request.rejected_drivers.len(),
        "assignment rejected"
    );
}
