//! # Facility Classification, Risk Tags and Severities
//!
//! The closed vocabularies shared by every pack: the two facility types
//! an inspection can target, the risk tags the checklist and the hazard
//! flags are keyed on, and the three recommendation severities.
//!
//! Risk tags are an open set on the wire (a pack may introduce its own),
//! so they stay strings; the constants in [`tags`] name the ones the
//! engine itself interprets.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::VistoriaError;

/// Risk tag identifiers understood by the engine.
pub mod tags {
    /// Liquefied petroleum gas (cylinders or central).
    pub const GLP: &str = "glp";
    /// Kitchen / cooking oil.
    pub const COZINHA: &str = "cozinha";
    /// Flammable liquids or materials.
    pub const INFLAMAVEIS: &str = "inflamaveis";
    /// Basement levels.
    pub const SUBSOLO: &str = "subsolo";
    /// Stage or temporary structure.
    pub const PALCO: &str = "palco";
    /// Sound and lighting rigs.
    pub const SOM_LUZ: &str = "som_luz";

    /// Tags that pull event-only checklist items in for every event.
    pub const EVENT_MARKERS: &[&str] = &[PALCO, SOM_LUZ];
}

// ---------------------------------------------------------------------------
// FacilityType
// ---------------------------------------------------------------------------

/// What kind of place is being inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityType {
    /// Permanent commercial premises.
    #[default]
    Comercio,
    /// Temporary event.
    Evento,
}

impl FacilityType {
    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comercio => "comercio",
            Self::Evento => "evento",
        }
    }

    /// Lenient classification used by normalization: anything that is not
    /// recognizably an event is treated as commerce.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "evento" | "event" => Self::Evento,
            _ => Self::Comercio,
        }
    }

    /// Whether this is [`FacilityType::Evento`].
    pub fn is_event(&self) -> bool {
        matches!(self, Self::Evento)
    }
}

impl std::fmt::Display for FacilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FacilityType {
    type Err = VistoriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comercio" => Ok(Self::Comercio),
            "evento" => Ok(Self::Evento),
            other => Err(VistoriaError::Validation(format!(
                "unknown facility type: {other:?}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Recommendation severity.
///
/// Recommendations store their severity as the label the pack supplied;
/// this enum is the interpretation applied when ranking and rendering.
/// Unknown labels resolve to [`Severity::Info`], the lowest rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    #[default]
    Info,
    /// Needs attention.
    Warn,
    /// Blocking / safety-critical.
    Critical,
}

impl Severity {
    /// All severities, lowest rank first.
    pub fn all() -> &'static [Severity] {
        &[Self::Info, Self::Warn, Self::Critical]
    }

    /// Wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Critical => "critical",
        }
    }

    /// Ordering key; higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Info => 0,
            Self::Warn => 1,
            Self::Critical => 2,
        }
    }

    /// Resolve a stored label. Unknown labels become `Info`.
    pub fn resolve(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = VistoriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "critical" => Ok(Self::Critical),
            other => Err(VistoriaError::Validation(format!(
                "unknown severity: {other:?}"
            ))),
        }
    }
}
