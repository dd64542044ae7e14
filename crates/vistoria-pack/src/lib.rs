//! # vistoria-pack — Regulatory Packs
//!
//! A pack is the unit of jurisdictional knowledge: it decides which
//! checklist items apply to a facility and, optionally, computes sizing
//! recommendations with their normative references. The engine never
//! assumes normative values on its own.
//!
//! - **Contract** ([`pack`]): [`Pack`] and [`SizingRules`] traits,
//!   [`PackInfo`] metadata and the loose [`SizingOutput`].
//!
//! - **Base pack** ([`base`]): `sp-base`, macro checklist and
//!   "what to verify" recommendations without official numbers.
//!
//! - **Official pack** ([`official`]): `sp-oficial`, reference database,
//!   input validation and four pluggable sizing tables.
//!
//! - **External packs** ([`manifest`], [`external`]): packs loaded from
//!   YAML/JSON manifests, and closure-backed JSON rules.
//!
//! ## Data Format
//!
//! Manifests and table settings are YAML or JSON files loaded through
//! [`parser`], which reports missing files and parse errors with the
//! offending path.

pub mod base;
pub mod checklist;
pub mod error;
pub mod external;
pub mod manifest;
pub mod official;
pub mod pack;
pub mod parser;
pub mod registry;

// Re-export primary types.
pub use base::BasePack;
pub use checklist::{ChecklistItem, ChecklistSection};
pub use error::{PackError, PackResult};
pub use external::JsonRules;
pub use manifest::{ManifestPack, PackManifest};
pub use official::{OfficialPack, RulesDb, TableSettings};
pub use pack::{Pack, PackInfo, PackSnapshot, SizingOutput, SizingRules};
pub use registry::PackRegistry;
