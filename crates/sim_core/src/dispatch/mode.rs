use std::str::FromStr;

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use super::algorithm::FAIRNESS_WEIGHT;
use crate::error::SimError;

/// Process-wide driver scoring policy. Lower scores win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// Distance to pickup plus half the driver's completed ride count.
    #[default]
    Balanced,
    /// Distance to pickup only.
    EtaOnly,
    /// Completed ride count only.
    FairnessOnly,
}

impl DispatchMode {
    pub const ALL: [DispatchMode; 3] = [
        DispatchMode::Balanced,
        DispatchMode::EtaOnly,
        DispatchMode::FairnessOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DispatchMode::Balanced => "balanced",
            DispatchMode::EtaOnly => "eta_only",
            DispatchMode::FairnessOnly => "fairness_only",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DispatchMode::Balanced => "Balances ETA and fairness (default)",
            DispatchMode::EtaOnly => "Only considers distance to pickup",
            DispatchMode::FairnessOnly => "Only considers driver fairness",
        }
    }

    pub fn score(self, eta: f64, fairness: u32) -> f64 {
        let fairness = f64::from(fairness);
        match self {
            DispatchMode::Balanced => eta + fairness * FAIRNESS_WEIGHT,
            DispatchMode::EtaOnly => eta,
            DispatchMode::FairnessOnly => fairness,
        }
    }

    /// Names accepted by [`FromStr`], in declaration order.
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|mode| mode.as_str()).collect()
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchMode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| SimError::InvalidConfiguration {
                requested: s.to_string(),
                valid: Self::names().join(", "),
            })
    }
}

/// Active dispatch mode resource.
#[derive(Debug, Clone, Copy, Default, Resource)]
pub struct DispatchConfig {
    pub mode: DispatchMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        for mode in DispatchMode::ALL {
            assert_eq!(mode.as_str().parse::<DispatchMode>(), Ok(mode));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "nearest".parse::<DispatchMode>().expect_err("unknown mode");
        assert_eq!(
            err,
            SimError::InvalidConfiguration {
                requested: "nearest".to_string(),
                valid: "balanced, eta_only, fairness_only".to_string(),
            }
        );
        assert!("Balanced".parse::<DispatchMode>().is_err());
    }

    #[test]
    fn balanced_adds_half_the_fairness_penalty() {
        assert_eq!(DispatchMode::Balanced.score(10.0, 0), 10.0);
        assert_eq!(DispatchMode::Balanced.score(8.0, 3), 9.5);
        assert_eq!(DispatchMode::EtaOnly.score(8.0, 3), 8.0);
        assert_eq!(DispatchMode::FairnessOnly.score(8.0, 3), 3.0);
    }

    #[test]
    fn default_mode_is_balanced() {
        assert_eq!(DispatchConfig::default().mode, DispatchMode::Balanced);
    }
}
