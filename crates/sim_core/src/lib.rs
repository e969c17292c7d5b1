pub mod spatial;
pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod runner;
pub mod simulation;
pub mod systems;
pub mod telemetry;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
