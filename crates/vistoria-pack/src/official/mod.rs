//! # São Paulo Official Pack (`sp-oficial`)
//!
//! Structured pack for the state of São Paulo: a reference database
//! ([`RulesDb`]), input validation warnings, and sizing delegated to the
//! pluggable tables in [`tables`].
//!
//! ## Sizing order
//!
//! 1. Data-insufficiency warnings (area, floors, capacity, occupation).
//! 2. Legal-basis and licensing-process recommendation, always.
//! 3. Event flow recommendation (`critical`) for events, the `palco` tag,
//!    or a declared stage/structure.
//! 4. The four table calculators, in [`CalculatorKind::all`] order.

pub mod references;
pub mod tables;

use vistoria_core::{tags, FacilityType, RawRecommendation, Severity, SizingContext};

use crate::checklist::{filter_sections, sp_catalog, CatalogEdition, ChecklistSection};
use crate::error::PackResult;
use crate::pack::{Pack, PackInfo, SizingOutput, SizingRules};

pub use references::RulesDb;
pub use tables::{CalculatorKind, TableCalculator, TableRegistry, TableSettings};

use references::{ref_decree, ref_via_facil};

/// Identifier of the official pack.
pub const OFFICIAL_PACK_ID: &str = "sp-oficial";

pub const WARN_NO_AREA: &str = "Área (m²) não informada: cálculos ficam limitados.";
pub const WARN_NO_FLOORS: &str =
    "Pavimentos não informados: análise de rotas/saídas pode ficar limitada.";
pub const WARN_NO_CAPACITY: &str =
    "Lotação não informada: recomendações de controle de público/brigada ficam limitadas.";
pub const WARN_NO_OCCUPATION: &str =
    "Ocupação/atividade não informada: critérios podem variar por enquadramento.";

#[derive(Debug)]
pub struct OfficialPack {
    info: PackInfo,
    db: RulesDb,
    tables: TableRegistry,
    catalog: Vec<ChecklistSection>,
}

impl OfficialPack {
    /// Official pack with every table disabled.
    pub fn new() -> Self {
        Self::with_settings(&TableSettings::default())
    }

    pub fn with_settings(settings: &TableSettings) -> Self {
        Self {
            info: PackInfo::new(
                OFFICIAL_PACK_ID,
                "São Paulo (Oficial)",
                "0.2.0",
                "2025-12-29",
                "Estrutura oficial (refs + validações + tabelas plugáveis). Tabelas numéricas \
                 ainda não ativadas.",
            ),
            db: RulesDb::new(settings),
            tables: TableRegistry::new(settings),
            catalog: sp_catalog(CatalogEdition::Official),
        }
    }

    /// Replace the table calculators, e.g. with tables loaded from another
    /// source. The reference database keeps the status it was built with.
    pub fn with_registry(mut self, tables: TableRegistry) -> Self {
        self.tables = tables;
        self
    }

    pub fn rules_db(&self) -> &RulesDb {
        &self.db
    }

    pub fn tables(&self) -> &TableRegistry {
        &self.tables
    }
}

impl Default for OfficialPack {
    fn default() -> Self {
        Self::new()
    }
}

impl Pack for OfficialPack {
    fn info(&self) -> &PackInfo {
        &self.info
    }

    fn build_checklist(
        &self,
        facility_type: FacilityType,
        risk_tags: &[String],
    ) -> Vec<ChecklistSection> {
        filter_sections(&self.catalog, facility_type, risk_tags)
    }

    fn sizing(&self) -> Option<&dyn SizingRules> {
        Some(self)
    }
}

impl SizingRules for OfficialPack {
    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();

        if !ctx.has_area() {
            out.warn(WARN_NO_AREA);
        }
        if ctx.floors.is_none() {
            out.warn(WARN_NO_FLOORS);
        }
        if ctx.capacity.is_none() {
            out.warn(WARN_NO_CAPACITY);
        }
        if ctx.occupation.is_empty() {
            out.warn(WARN_NO_OCCUPATION);
        }

        out.push(
            RawRecommendation::new(
                "sp_base_legal",
                "Base legal e processo",
                "Conferir enquadramento e processo de licenciamento",
            )
            .summary("Confirmar se o caso é PTS, PT ou outra via e reunir documentos e evidências.")
            .details(
                "O app gera relatório de adequações para o contratante. Vistoria/licenciamento \
                 oficial segue procedimento do CBPMESP.",
            )
            .refs([ref_decree(), ref_via_facil()])
            .severity(Severity::Info),
        );

        if ctx.is_event() || ctx.has_tag(tags::PALCO) || ctx.stage_structure {
            out.push(
                RawRecommendation::new(
                    "evt_fluxo",
                    "Evento",
                    "Validar layout, saídas temporárias e controle de público",
                )
                .summary(
                    "Garantir fluxo seguro, rotas desobstruídas e sinalização adequada para \
                     evacuação.",
                )
                .details(
                    "Registrar mapa do layout, barreiras, gargalos, pontos de maior densidade, \
                     posição de extintores e equipe.",
                )
                .refs([ref_decree(), ref_via_facil()])
                .severity(Severity::Critical),
            );
        }

        out.extend(self.tables.run(ctx)?);
        Ok(out)
    }
}
