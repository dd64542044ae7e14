//! # vistoria-core — Shared Types for Fire-Safety Inspections
//!
//! The leaf crate of the workspace. It defines the vocabulary every pack
//! and the sizing engine speak: facility classification, risk tags,
//! severities, the raw and normalized sizing context, and the universal
//! recommendation record.
//!
//! ## Key Design Principles
//!
//! 1. **Total normalization.** [`SizingContext::normalize`] and
//!    [`normalize_recommendation`] never fail. Malformed input degrades to
//!    documented defaults so that a half-filled form still produces a
//!    report.
//!
//! 2. **Loose at the edge, typed inside.** [`RawContext`] and
//!    [`RawRecommendation`] hold arbitrary JSON values; everything past
//!    normalization is strongly typed.
//!
//! 3. **UTC-only timestamps.** [`Timestamp`] is truncated to milliseconds
//!    and always rendered with a `Z` suffix.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vistoria-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod context;
pub mod error;
pub mod facility;
pub mod identity;
pub mod limits;
pub mod recommendation;
pub mod temporal;

pub use context::{normalize_context, RawContext, SizingContext};
pub use error::VistoriaError;
pub use facility::{tags, FacilityType, Severity};
pub use identity::{new_recommendation_id, InspectionId};
pub use limits::EngineLimits;
pub use recommendation::{
    normalize_recommendation, normalize_warning, RawRecommendation, Recommendation, Reference,
    SizingValue,
};
pub use temporal::Timestamp;
