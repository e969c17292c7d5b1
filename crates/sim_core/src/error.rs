use thiserror::Error;

/// Which registry map an identifier was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Driver,
    Rider,
    RideRequest,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Driver => "Driver",
            EntityKind::Rider => "Rider",
            EntityKind::RideRequest => "Ride request",
        })
    }
}

/// Errors raised by simulation operations.
///
/// Every variant is detected before the operation writes anything, so a failed
/// call leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("{kind} not found")]
    NotFound { kind: EntityKind, id: String },

    #[error("{0}")]
    InvalidState(String),

    #[error("Invalid algorithm '{requested}'. Must be one of: {valid}")]
    InvalidConfiguration { requested: String, valid: String },

    #[error("{kind} {id} already exists")]
    DuplicateId { kind: EntityKind, id: String },
}

impl SimError {
    pub fn not_found(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        SimError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate(kind: EntityKind, id: impl std::fmt::Display) -> Self {
        SimError::DuplicateId {
            kind,
            id: id.to_string(),
        }
    }
}
