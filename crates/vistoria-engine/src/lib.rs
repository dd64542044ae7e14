//! # vistoria-engine — Sizing Dispatch and Inspection Records
//!
//! Runs the active pack's sizing rules over an inspection's facility
//! data and keeps the outcome with the inspection.
//!
//! - **Dispatch** ([`sizing`]): [`SizingEngine`] normalizes the raw
//!   facility data, invokes the pack inside a containment boundary, and
//!   normalizes whatever comes back into a [`SizingResult`]. It never
//!   panics and never returns an error; every failure becomes a warning.
//!
//! - **Records** ([`inspection`]): [`Inspection`] with checklist answers
//!   and the latest sizing.
//!
//! - **Storage** ([`store`]): the [`InspectionStore`] seam with in-memory
//!   and JSON-directory backends.
//!
//! - **Reports** ([`report`]): grouped, severity-ordered view models.

pub mod inspection;
pub mod report;
pub mod sizing;
pub mod store;

// Re-export primary types.
pub use inspection::{ChecklistAnswer, ChecklistEntry, Inspection, InspectionStatus};
pub use report::{ChecklistSummary, InspectionReport, ReportGroup, ReportItem, SizingReport};
pub use sizing::{run_sizing, try_compute, PackFailure, SizingEngine, SizingResult};
pub use store::{InspectionStore, JsonDirStore, MemoryStore, StoreError, StoreResult};
