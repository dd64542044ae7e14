//! # Manifest-Defined Packs
//!
//! Packs for other jurisdictions (or local variants) can be shipped as a
//! YAML or JSON manifest instead of Rust code:
//!
//! ```yaml
//! pack:
//!   id: sp-municipal
//!   name: São Paulo (Municipal)
//!   version: 0.1.0
//!   updatedAt: "2025-06-01"
//!   note: Itens complementares.
//! checklist:
//!   - id: ident
//!     title: Identificação
//!     items:
//!       - id: ident_alvara
//!         title: Alvará de funcionamento
//!         help: Verificar validade.
//! sizing:
//!   results:
//!     - id: mun_alvara
//!       category: Documentação
//!       title: Conferir alvará
//!   warnings: []
//! ```
//!
//! Without a `sizing` member the pack has no sizing capability and the
//! dispatcher reports it as such.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use vistoria_core::FacilityType;

use crate::checklist::{filter_sections, ChecklistSection};
use crate::error::{PackError, PackResult};
use crate::external::JsonRules;
use crate::pack::{Pack, PackInfo, SizingRules};
use crate::parser;

/// On-disk pack description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackManifest {
    pub pack: PackInfo,
    #[serde(default)]
    pub checklist: Vec<ChecklistSection>,
    /// Static sizing document: `{results: [...], warnings: [...]}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<Value>,
}

impl PackManifest {
    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: &Path) -> PackResult<Self> {
        parser::load_typed(path)
    }

    /// Check metadata and checklist ids.
    pub fn validate(&self) -> PackResult<()> {
        self.pack.validate()?;
        let mut sections = HashSet::new();
        let mut items = HashSet::new();
        for section in &self.checklist {
            if section.id.is_empty() {
                return Err(PackError::InvalidManifest {
                    detail: format!("pack {}: checklist section with empty id", self.pack.id),
                });
            }
            if !sections.insert(section.id.as_str()) {
                return Err(PackError::InvalidManifest {
                    detail: format!(
                        "pack {}: duplicate checklist section {:?}",
                        self.pack.id, section.id
                    ),
                });
            }
            for item in &section.items {
                if item.id.is_empty() || !items.insert(item.id.as_str()) {
                    return Err(PackError::InvalidManifest {
                        detail: format!(
                            "pack {}: empty or duplicate checklist item id {:?} in section {:?}",
                            self.pack.id, item.id, section.id
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// A pack backed by a [`PackManifest`].
#[derive(Debug)]
pub struct ManifestPack {
    info: PackInfo,
    checklist: Vec<ChecklistSection>,
    rules: Option<JsonRules>,
}

impl ManifestPack {
    /// Validate a manifest and build the pack.
    pub fn from_manifest(manifest: PackManifest) -> PackResult<Self> {
        manifest.validate()?;
        let rules = manifest
            .sizing
            .map(|doc| JsonRules::constant(manifest.pack.id.clone(), doc));
        Ok(Self {
            info: manifest.pack,
            checklist: manifest.checklist,
            rules,
        })
    }

    /// Load, validate and build from a file.
    pub fn load(path: &Path) -> PackResult<Self> {
        let pack = Self::from_manifest(PackManifest::load(path)?)?;
        tracing::debug!(
            pack_id = %pack.info.id,
            path = %path.display(),
            sizing = pack.rules.is_some(),
            "loaded pack manifest"
        );
        Ok(pack)
    }

    /// Replace the sizing capability with custom JSON rules.
    pub fn with_rules(mut self, rules: JsonRules) -> Self {
        self.rules = Some(rules);
        self
    }
}

impl Pack for ManifestPack {
    fn info(&self) -> &PackInfo {
        &self.info
    }

    fn build_checklist(
        &self,
        facility_type: FacilityType,
        risk_tags: &[String],
    ) -> Vec<ChecklistSection> {
        filter_sections(&self.checklist, facility_type, risk_tags)
    }

    fn sizing(&self) -> Option<&dyn SizingRules> {
        self.rules.as_ref().map(|r| r as &dyn SizingRules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use vistoria_core::{RawContext, SizingContext};

    const YAML: &str = r#"
pack:
  id: sp-municipal
  name: São Paulo (Municipal)
  version: 0.1.0
  updatedAt: "2025-06-01"
checklist:
  - id: ident
    title: Identificação
    items:
      - id: ident_alvara
        title: Alvará de funcionamento
        help: Verificar validade.
      - id: ident_glp
        title: Autorização GLP
        help: Quando houver GLP.
        tags: [glp]
sizing:
  results:
    - id: mun_alvara
      category: Documentação
      title: Conferir alvará
  warnings:
    - Dados municipais incompletos.
"#;

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn load_yaml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let pack = ManifestPack::load(&write(&dir, "m.yaml", YAML)).unwrap();
        assert_eq!(pack.info().id, "sp-municipal");
        let rules = pack.sizing().unwrap();
        let out = rules
            .compute(&SizingContext::normalize(&RawContext::default()))
            .unwrap();
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.warnings, vec![json!("Dados municipais incompletos.")]);
    }

    #[test]
    fn checklist_is_filtered() {
        let dir = tempfile::tempdir().unwrap();
        let pack = ManifestPack::load(&write(&dir, "m.yml", YAML)).unwrap();
        let plain = pack.build_checklist(FacilityType::Comercio, &[]);
        assert_eq!(plain[0].items.len(), 1);
        let glp = pack.build_checklist(FacilityType::Comercio, &["glp".to_string()]);
        assert_eq!(glp[0].items.len(), 2);
    }

    #[test]
    fn json_manifest_without_sizing_has_no_capability() {
        let dir = tempfile::tempdir().unwrap();
        let doc = json!({
            "pack": { "id": "x", "name": "X", "version": "1.0.0", "updatedAt": "2025-01-01" }
        });
        let pack = ManifestPack::load(&write(&dir, "m.json", &doc.to_string())).unwrap();
        assert!(pack.sizing().is_none());
        assert!(pack.build_checklist(FacilityType::Evento, &[]).is_empty());
    }

    #[test]
    fn duplicate_item_ids_rejected() {
        let manifest: PackManifest = serde_json::from_value(json!({
            "pack": { "id": "x", "name": "X", "version": "1.0.0", "updatedAt": "2025-01-01" },
            "checklist": [
                { "id": "a", "title": "A", "items": [
                    { "id": "i", "title": "I", "help": "" },
                    { "id": "i", "title": "I2", "help": "" }
                ]}
            ]
        }))
        .unwrap();
        assert!(matches!(
            ManifestPack::from_manifest(manifest),
            Err(PackError::InvalidManifest { .. })
        ));
    }

    #[test]
    fn bad_version_rejected() {
        let manifest: PackManifest = serde_json::from_value(json!({
            "pack": { "id": "x", "name": "X", "version": "v1", "updatedAt": "2025-01-01" }
        }))
        .unwrap();
        assert!(manifest.validate().is_err());
    }

    #[test]
    fn missing_manifest_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ManifestPack::load(&dir.path().join("nada.yaml")).unwrap_err();
        assert!(matches!(err, PackError::FileNotFound { .. }));
    }

    #[test]
    fn with_rules_adds_capability() {
        let manifest: PackManifest = serde_json::from_value(json!({
            "pack": { "id": "x", "name": "X", "version": "1.0.0", "updatedAt": "2025-01-01" }
        }))
        .unwrap();
        let pack = ManifestPack::from_manifest(manifest)
            .unwrap()
            .with_rules(JsonRules::constant("x", json!({ "results": [] })));
        assert!(pack.sizing().is_some());
    }
}
