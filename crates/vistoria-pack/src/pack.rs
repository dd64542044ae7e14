//! # Pack Contract
//!
//! A regulatory pack bundles three things: metadata ([`PackInfo`]), a pure
//! checklist builder, and optionally a sizing capability
//! ([`SizingRules`]). The dispatcher in `vistoria-engine` only ever sees
//! `&dyn Pack`, so packs are swappable at run time.
//!
//! ## Capability check
//!
//! Not every pack can size. [`Pack::sizing`] returns `None` by default;
//! the dispatcher turns that into a single degraded-capability warning
//! instead of failing.
//!
//! ## Purity
//!
//! Both `build_checklist` and [`SizingRules::compute`] must be pure: the
//! same inputs produce the same output, and neither touches shared
//! mutable state. Implementations are `Send + Sync` and are shared across
//! threads behind `Arc`.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use vistoria_core::{FacilityType, RawRecommendation, SizingContext};

use crate::checklist::ChecklistSection;
use crate::error::{PackError, PackResult};

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Descriptive metadata of a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackInfo {
    /// Stable identifier, e.g. `"sp-base"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Semantic version `MAJOR.MINOR.PATCH`.
    pub version: String,
    /// Last-updated date, `YYYY-MM-DD`.
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    /// Free-text note shown next to the pack name.
    #[serde(default)]
    pub note: String,
}

impl PackInfo {
    pub fn new(id: &str, name: &str, version: &str, updated_at: &str, note: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            updated_at: updated_at.to_string(),
            note: note.to_string(),
        }
    }

    /// Check the metadata is well-formed: non-empty id and name, a
    /// three-part numeric version and a calendar date.
    pub fn validate(&self) -> PackResult<()> {
        if self.id.trim().is_empty() {
            return Err(PackError::InvalidManifest {
                detail: "pack id must not be empty".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(PackError::InvalidManifest {
                detail: format!("pack {} has an empty name", self.id),
            });
        }
        if !is_semver(&self.version) {
            return Err(PackError::InvalidManifest {
                detail: format!(
                    "pack {} version {:?} is not MAJOR.MINOR.PATCH",
                    self.id, self.version
                ),
            });
        }
        self.updated_date()?;
        Ok(())
    }

    /// Parsed last-updated date.
    pub fn updated_date(&self) -> PackResult<NaiveDate> {
        NaiveDate::parse_from_str(&self.updated_at, "%Y-%m-%d").map_err(|e| {
            PackError::InvalidManifest {
                detail: format!(
                    "pack {} updatedAt {:?} is not a date: {e}",
                    self.id, self.updated_at
                ),
            }
        })
    }

    pub fn snapshot(&self) -> PackSnapshot {
        PackSnapshot::from(self)
    }
}

fn is_semver(v: &str) -> bool {
    let parts: Vec<&str> = v.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

/// The part of [`PackInfo`] recorded on every sizing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSnapshot {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl PackSnapshot {
    /// Sentinel recorded when sizing runs without any pack.
    pub fn unknown() -> Self {
        Self {
            id: "unknown".to_string(),
            name: "Sem pacote".to_string(),
            version: "0.0.0".to_string(),
        }
    }
}

impl From<&PackInfo> for PackSnapshot {
    fn from(info: &PackInfo) -> Self {
        Self {
            id: info.id.clone(),
            name: info.name.clone(),
            version: info.version.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Sizing output
// ---------------------------------------------------------------------------

/// What a pack's sizing rules return: recommendations in the pack's own
/// loose shape, and warnings of any JSON type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SizingOutput {
    pub results: Vec<RawRecommendation>,
    pub warnings: Vec<Value>,
}

impl SizingOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rec: RawRecommendation) {
        self.results.push(rec);
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(Value::String(warning.into()));
    }

    /// Append another output, keeping order.
    pub fn extend(&mut self, other: SizingOutput) {
        self.results.extend(other.results);
        self.warnings.extend(other.warnings);
    }

    /// Interpret arbitrary JSON emitted by a pack.
    ///
    /// The top level must be an object; anything else is
    /// [`PackError::MalformedOutput`]. Inside the object, a `results` or
    /// `warnings` member that is not an array is ignored.
    pub fn from_value(pack_id: &str, value: Value) -> PackResult<Self> {
        let Value::Object(mut map) = value else {
            return Err(PackError::MalformedOutput {
                pack_id: pack_id.to_string(),
                detail: format!("expected object, got {}", json_kind(&value)),
            });
        };
        let results = match map.remove("results") {
            Some(Value::Array(items)) => items.into_iter().map(RawRecommendation::from).collect(),
            _ => Vec::new(),
        };
        let warnings = match map.remove("warnings") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        Ok(Self { results, warnings })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// The sizing capability of a pack.
pub trait SizingRules: Send + Sync + fmt::Debug {
    /// Compute recommendations and warnings for a normalized context.
    ///
    /// Errors are contained by the dispatcher; they never reach the
    /// sizing result.
    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput>;
}

/// A regulatory pack.
pub trait Pack: Send + Sync + fmt::Debug {
    /// Pack metadata.
    fn info(&self) -> &PackInfo;

    /// Checklist sections applicable to the facility.
    fn build_checklist(
        &self,
        facility_type: FacilityType,
        risk_tags: &[String],
    ) -> Vec<ChecklistSection>;

    /// Sizing capability, if the pack has one.
    fn sizing(&self) -> Option<&dyn SizingRules> {
        None
    }
}
