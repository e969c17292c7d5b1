pub mod algorithm;
pub mod mode;
pub mod types;

pub use algorithm::{completed_trips_by_driver, select_driver, FAIRNESS_WEIGHT};
pub use mode::{DispatchConfig, DispatchMode};
pub use types::{DispatchCandidate, DispatchDecision};
