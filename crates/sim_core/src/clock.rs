use bevy_ecs::prelude::{Entity, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A ride request was created and needs a driver.
    RideRequested,
    /// The assigned driver turned the request down; release and re-dispatch.
    AssignmentRejected,
    /// One discrete time step.
    Tick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSubject {
    RideRequest(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Clock value at which the event was processed.
    pub tick: u64,
    pub kind: EventKind,
    pub subject: Option<EventSubject>,
}

impl Event {
    pub fn ride_request(&self) -> Option<Entity> {
        match self.subject {
            Some(EventSubject::RideRequest(entity)) => Some(entity),
            None => None,
        }
    }
}

/// The event the schedule is currently reacting to. Inserted by the runner.
#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentEvent(pub Event);

/// Discrete tick counter. Starts at 0 and only moves forward.
#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advances by one tick and returns the new value.
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}
