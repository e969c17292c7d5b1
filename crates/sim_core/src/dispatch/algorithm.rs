use std::collections::HashMap;

use super::mode::DispatchMode;
use super::types::{DispatchCandidate, DispatchDecision};
use crate::ecs::{DriverId, RideRequest};

/// Weight of one completed ride in the balanced score.
pub const FAIRNESS_WEIGHT: f64 = 0.5;

/// Single-pass greedy selection over eligible drivers.
///
/// The candidate with the strictly lowest score wins; on a tie the earlier
/// candidate is kept, so callers pass candidates in creation order.
/// Returns `None` when there are no candidates.
///
/// # Examples
///
/// ```rust
/// use bevy_ecs::prelude::Entity;
/// use sim_core::dispatch::{select_driver, DispatchCandidate, DispatchMode};
///
/// let far = DispatchCandidate { driver: Entity::from_raw(1), eta: 10.0, fairness: 0 };
/// let busy = DispatchCandidate { driver: Entity::from_raw(2), eta: 8.0, fairness: 3 };
/// let decision = select_driver(DispatchMode::Balanced, &[far, busy]).unwrap();
/// assert_eq!(decision.driver, Entity::from_raw(2));
/// assert_eq!(decision.score, 9.5);
/// ```
pub fn select_driver(
    mode: DispatchMode,
    candidates: &[DispatchCandidate],
) -> Option<DispatchDecision> {
    let mut best: Option<DispatchDecision> = None;

    for candidate in candidates {
        let score = mode.score(candidate.eta, candidate.fairness);
        match best {
            Some(current) if score >= current.score => {}
            _ => {
                best = Some(DispatchDecision {
                    driver: candidate.driver,
                    score,
                })
            }
        }
    }

    best
}

/// Completed rides per assigned driver id, counted fresh from the requests.
///
/// Keyed by id, so a driver re-registered under the same id after deletion
/// keeps its history.
pub fn completed_trips_by_driver<'a>(
    requests: impl IntoIterator<Item = &'a RideRequest>,
) -> HashMap<&'a DriverId, u32> {
    let mut counts = HashMap::new();
    for driver in requests.into_iter().filter_map(RideRequest::completed_by) {
        *counts.entry(driver).or_insert(0) += 1;
    }
    counts
}
