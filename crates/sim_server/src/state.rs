use std::sync::Arc;

use sim_core::dispatch::DispatchMode;
use sim_core::simulation::Simulation;
use tokio::sync::Mutex;

/// Shared handler state. Every handler holds the lock for its whole operation,
/// reads included, so no caller observes a half-applied dispatch or tick.
#[derive(Clone)]
pub struct AppState {
    pub sim: Arc<Mutex<Simulation>>,
}

impl AppState {
    pub fn new(mode: DispatchMode) -> Self {
        Self {
            sim: Arc::new(Mutex::new(Simulation::new(mode))),
        }
    }
}
