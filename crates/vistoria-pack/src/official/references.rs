//! Reference database of the official São Paulo pack.
//!
//! Metadata only: identifiers, titles and short summaries of the legal
//! instruments, procedures, technical instructions and ABNT standards the
//! pack cites. No normative text is embedded.

use serde::{Deserialize, Serialize};

use vistoria_core::Reference;

use super::tables::{TableSettings, TableStatus, OCCUPANCY_NOTE};

/// Jurisdiction code of the official pack.
pub const JURISDICTION: &str = "BR-SP";

// ── Record types ────────────────────────────────────────────────────────

/// A statute or decree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalInstrument {
    pub id: String,
    pub title: String,
    /// Instrument kind, e.g. `"DECRETO"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub authority: String,
    /// Issue date, `YYYY-MM-DD`.
    pub issued: String,
    pub summary: String,
}

/// An administrative procedure reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProceduralReference {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub summary: String,
}

/// A technical instruction (IT) or technical standard (NBR).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalDocument {
    pub id: String,
    pub code: String,
    pub title: String,
    /// Edition year when pinned.
    pub year: Option<u16>,
}

impl TechnicalDocument {
    fn new(id: &str, code: &str, title: &str, year: Option<u16>) -> Self {
        Self {
            id: id.to_string(),
            code: code.to_string(),
            title: title.to_string(),
            year,
        }
    }

    /// Citation code including the year when known, e.g.
    /// `"ABNT NBR 12693:2021"`.
    pub fn citation(&self) -> String {
        match self.year {
            Some(y) => format!("{}:{y}", self.code),
            None => self.code.clone(),
        }
    }
}

/// Occupancy classification table. Shipped disabled and empty until the
/// official group/division list is entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTable {
    pub enabled: bool,
    pub note: String,
    pub options: Vec<OccupancyOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for OccupancyTable {
    fn default() -> Self {
        Self {
            enabled: false,
            note: OCCUPANCY_NOTE.to_string(),
            options: Vec::new(),
        }
    }
}

// ── RulesDb ─────────────────────────────────────────────────────────────

/// All references of the official pack, plus the status of each sizing
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesDb {
    pub jurisdiction: String,
    pub legal: Vec<LegalInstrument>,
    #[serde(rename = "viafacil")]
    pub procedures: Vec<ProceduralReference>,
    #[serde(rename = "its")]
    pub instructions: Vec<TechnicalDocument>,
    #[serde(rename = "nbrs")]
    pub standards: Vec<TechnicalDocument>,
    pub tables: TableStatus,
    pub occupancy: OccupancyTable,
}

impl RulesDb {
    /// Build the database for the given table configuration.
    pub fn new(settings: &TableSettings) -> Self {
        Self {
            jurisdiction: JURISDICTION.to_string(),
            legal: vec![LegalInstrument {
                id: "sp_decreto_69118_2024".to_string(),
                title: "Decreto SP nº 69.118/2024 - Regulamento de Segurança Contra Incêndios"
                    .to_string(),
                kind: "DECRETO".to_string(),
                authority: "Governo do Estado de São Paulo".to_string(),
                issued: "2024-12-09".to_string(),
                summary: "Base do regulamento estadual para SCI em SP, orientando o processo de \
                          regularização (AVCB/CLCB/LAVCB/TAACB)."
                    .to_string(),
            }],
            procedures: vec![ProceduralReference {
                id: "viafacil_pts".to_string(),
                title: "Via Fácil Bombeiros - PTS/PT (processos)".to_string(),
                kind: "PROCEDIMENTO".to_string(),
                summary: "Orientações de processo no sistema. O enquadramento pode exigir PTS ou \
                          PT conforme risco/complexidade."
                    .to_string(),
            }],
            instructions: vec![
                TechnicalDocument::new("it_01", "IT-01", "Procedimentos Administrativos", None),
                TechnicalDocument::new(
                    "it_21",
                    "IT-21",
                    "Sistema de proteção por extintores de incêndio",
                    None,
                ),
                TechnicalDocument::new("it_17", "IT-17", "Brigada de incêndio", None),
                TechnicalDocument::new(
                    "it_42",
                    "IT-42",
                    "Projeto Técnico Simplificado (PTS)",
                    None,
                ),
            ],
            standards: vec![
                TechnicalDocument::new(
                    "nbr_12693",
                    "ABNT NBR 12693",
                    "Sistemas de proteção por extintores de incêndio",
                    Some(2021),
                ),
                TechnicalDocument::new("nbr_14276", "ABNT NBR 14276", "Brigada de incêndio", None),
            ],
            tables: TableStatus::from(settings),
            occupancy: OccupancyTable::default(),
        }
    }

    /// Look up an IT or NBR by its bare code (`"IT-21"`, `"ABNT NBR 14276"`).
    pub fn document(&self, code: &str) -> Option<&TechnicalDocument> {
        self.instructions
            .iter()
            .chain(&self.standards)
            .find(|d| d.code == code)
    }
}

impl Default for RulesDb {
    fn default() -> Self {
        Self::new(&TableSettings::default())
    }
}

// ── Citations used in recommendations ───────────────────────────────────

pub fn ref_decree() -> Reference {
    Reference::new(
        "DECRETO SP 69.118/2024",
        "Base do regulamento estadual para SCI em SP.",
    )
}

pub fn ref_via_facil() -> Reference {
    Reference::new("Via Fácil Bombeiros", "Processo PTS/PT e orientações do sistema.")
}

pub fn ref_it21() -> Reference {
    Reference::new("IT-21", "Extintores (SP).")
}

pub fn ref_nbr12693() -> Reference {
    Reference::new(
        "ABNT NBR 12693",
        "Extintores: requisitos de projeto/seleção/instalação.",
    )
}

pub fn ref_it17() -> Reference {
    Reference::new("IT-17", "Brigada (SP).")
}

pub fn ref_nbr14276() -> Reference {
    Reference::new("ABNT NBR 14276", "Brigada: diretrizes.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_db_lists_sp_references() {
        let db = RulesDb::default();
        assert_eq!(db.jurisdiction, "BR-SP");
        assert_eq!(db.legal.len(), 1);
        assert_eq!(db.legal[0].issued, "2024-12-09");
        let its: Vec<&str> = db.instructions.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(its, vec!["IT-01", "IT-21", "IT-17", "IT-42"]);
        assert_eq!(db.standards.len(), 2);
    }

    #[test]
    fn citation_includes_pinned_year() {
        let db = RulesDb::default();
        assert_eq!(
            db.document("ABNT NBR 12693").unwrap().citation(),
            "ABNT NBR 12693:2021"
        );
        assert_eq!(db.document("IT-17").unwrap().citation(), "IT-17");
        assert!(db.document("IT-99").is_none());
    }

    #[test]
    fn occupancy_table_ships_disabled_and_empty() {
        let db = RulesDb::default();
        assert!(!db.occupancy.enabled);
        assert!(db.occupancy.options.is_empty());
        assert!(!db.occupancy.note.is_empty());
    }

    #[test]
    fn table_status_reflects_settings() {
        let settings = TableSettings {
            brigade: true,
            ..TableSettings::default()
        };
        let db = RulesDb::new(&settings);
        assert!(db.tables.brigade.enabled);
        assert!(!db.tables.extinguishers.enabled);
        assert_eq!(db.tables.version, settings.version);
    }

    #[test]
    fn serializes_with_wire_section_names() {
        let v = serde_json::to_value(RulesDb::default()).unwrap();
        assert!(v["viafacil"].is_array());
        assert!(v["its"].is_array());
        assert!(v["nbrs"].is_array());
        assert_eq!(v["legal"][0]["type"], "DECRETO");
    }

    #[test]
    fn extinguisher_citations_exist_in_db() {
        let db = RulesDb::default();
        assert!(db.document(&ref_it21().code).is_some());
        assert!(db.document(&ref_nbr12693().code).is_some());
        assert!(db.document(&ref_it17().code).is_some());
        assert!(db.document(&ref_nbr14276().code).is_some());
    }
}
