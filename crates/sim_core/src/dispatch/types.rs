use bevy_ecs::prelude::Entity;

/// An eligible driver together with the inputs to its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchCandidate {
    pub driver: Entity,
    /// Straight-line distance from the driver to the pickup.
    pub eta: f64,
    /// Rides this driver has already completed.
    pub fairness: u32,
}

/// The winning candidate and the score it won with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchDecision {
    pub driver: Entity,
    pub score: f64,
}
