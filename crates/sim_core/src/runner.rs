//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Clock progression and event routing happen here, outside systems. Each call
//! to [run_event] stamps the event with the clock (advancing it first for
//! [EventKind::Tick]), inserts it as [CurrentEvent], then runs the schedule.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};

use crate::clock::{CurrentEvent, Event, EventKind, EventSubject, SimulationClock};
use crate::systems::{
    assignment_rejected::assignment_rejected_system, dispatch::dispatch_system,
    movement::movement_system,
};

fn is_assignment_rejected(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::AssignmentRejected)
        .unwrap_or(false)
}

/// Both new requests and rejected ones go through dispatch.
fn needs_dispatch(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| {
            matches!(
                e.0.kind,
                EventKind::RideRequested | EventKind::AssignmentRejected
            )
        })
        .unwrap_or(false)
}

fn is_tick(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::Tick)
        .unwrap_or(false)
}

/// Builds the simulation schedule.
///
/// Runs single-threaded so that every pass is a deterministic, atomic step over
/// the whole registry. Rejection handling is chained before dispatch so the
/// released request is re-dispatched within the same pass.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);

    schedule.add_systems(
        (
            assignment_rejected_system.run_if(is_assignment_rejected),
            dispatch_system.run_if(needs_dispatch),
        )
            .chain(),
    );
    schedule.add_systems(movement_system.run_if(is_tick));

    schedule
}

/// Processes one event synchronously and returns it as processed.
pub fn run_event(
    world: &mut World,
    schedule: &mut Schedule,
    kind: EventKind,
    subject: Option<EventSubject>,
) -> Event {
    let tick = {
        let mut clock = world.resource_mut::<SimulationClock>();
        match kind {
            EventKind::Tick => clock.advance(),
            EventKind::RideRequested | EventKind::AssignmentRejected => clock.now(),
        }
    };

    let event = Event {
        tick,
        kind,
        subject,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    event
}

/// Advances the clock `ticks` times. Returns the final tick.
pub fn run_ticks(world: &mut World, schedule: &mut Schedule, ticks: u64) -> u64 {
    for _ in 0..ticks {
        run_event(world, schedule, EventKind::Tick, None);
    }
    world.resource::<SimulationClock>().now()
}
