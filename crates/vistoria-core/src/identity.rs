//! # Identifiers
//!
//! Newtypes for the identifiers that cross the storage boundary, plus the
//! generator used for recommendations that arrive without an id.
//!
//! Recommendation ids are plain strings because packs choose them
//! (`rec_doc`, `ext_disabled`, ...). Only the fallback is generated here,
//! from a random v4 UUID, so concurrent dispatches never need a shared
//! counter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of generated recommendation ids.
pub const RECOMMENDATION_ID_PREFIX: &str = "rec_";

/// A unique identifier for an inspection record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InspectionId(Uuid);

impl InspectionId {
    /// Create a new random inspection identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InspectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InspectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for InspectionId {
    type Err = crate::error::VistoriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|e| {
            crate::error::VistoriaError::Validation(format!("invalid inspection id {s:?}: {e}"))
        })
    }
}

/// Generate a placeholder recommendation id (`rec_` + 32 hex chars).
pub fn new_recommendation_id() -> String {
    format!("{RECOMMENDATION_ID_PREFIX}{}", Uuid::new_v4().simple())
}
