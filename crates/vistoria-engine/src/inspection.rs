//! # Inspection Records
//!
//! An [`Inspection`] is what the inspector fills in on site: the raw
//! facility data, an answer per checklist item, and the latest
//! [`SizingResult`]. The raw data is stored as collected; it is only
//! normalized when sizing runs.
//!
//! Sizing is owned by the record but never merged: [`Inspection::apply_sizing`]
//! replaces the previous result wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vistoria_core::{InspectionId, RawContext, SizingContext, Timestamp};
use vistoria_pack::Pack;

use crate::sizing::{SizingEngine, SizingResult};

/// Lifecycle of an inspection record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionStatus {
    #[default]
    Draft,
    Completed,
}

/// Answer to a checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistAnswer {
    Ok,
    NotOk,
    NotApplicable,
}

impl ChecklistAnswer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotOk => "not_ok",
            Self::NotApplicable => "not_applicable",
        }
    }
}

/// Answer and note recorded for one checklist item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    #[serde(default)]
    pub answer: Option<ChecklistAnswer>,
    #[serde(default)]
    pub note: String,
}

/// A stored inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    pub id: InspectionId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub status: InspectionStatus,
    /// Facility data as collected.
    pub facility: RawContext,
    /// Checklist answers keyed by item id.
    #[serde(default)]
    pub checklist: BTreeMap<String, ChecklistEntry>,
    /// Latest sizing, if computed.
    #[serde(default)]
    pub sizing: Option<SizingResult>,
}

impl Inspection {
    /// New draft for the given facility data.
    pub fn new(facility: RawContext) -> Self {
        let now = Timestamp::now();
        Self {
            id: InspectionId::new(),
            created_at: now,
            updated_at: now,
            status: InspectionStatus::Draft,
            facility,
            checklist: BTreeMap::new(),
            sizing: None,
        }
    }

    /// The facility data as a pack would see it.
    pub fn context(&self) -> SizingContext {
        SizingContext::normalize(&self.facility)
    }

    /// Replace the facility data.
    pub fn set_facility(&mut self, facility: RawContext) {
        self.facility = facility;
        self.touch();
    }

    /// Record an answer for a checklist item, replacing any earlier one.
    pub fn answer(&mut self, item_id: &str, answer: ChecklistAnswer, note: impl Into<String>) {
        self.checklist.insert(
            item_id.to_string(),
            ChecklistEntry {
                answer: Some(answer),
                note: note.into(),
            },
        );
        self.touch();
    }

    pub fn entry(&self, item_id: &str) -> Option<&ChecklistEntry> {
        self.checklist.get(item_id)
    }

    pub fn complete(&mut self) {
        self.status = InspectionStatus::Completed;
        self.touch();
    }

    /// Store a sizing result, replacing the previous one.
    pub fn apply_sizing(&mut self, result: SizingResult) {
        self.sizing = Some(result);
        self.touch();
    }

    /// Run sizing on this record's facility data and store the result.
    pub fn size_with(&mut self, engine: &SizingEngine, pack: Option<&dyn Pack>) -> &SizingResult {
        let result = engine.run(&self.facility, pack);
        self.touch();
        self.sizing.insert(result)
    }

    fn touch(&mut self) {
        let now = Timestamp::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}
