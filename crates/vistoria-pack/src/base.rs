//! # São Paulo Base Pack (`sp-base`)
//!
//! Macro checklist plus a sizing framework that carries no official
//! numbers. Its recommendations only say *what* to verify; quantities
//! belong to the official pack.
//!
//! Sizing always emits documentation, brigade and extinguisher
//! recommendations, adds a critical layout recommendation for events or
//! when a stage/structure is present, and warns when area or capacity is
//! missing.

use vistoria_core::{FacilityType, RawRecommendation, Reference, Severity, SizingContext};

use crate::checklist::{filter_sections, sp_catalog, CatalogEdition, ChecklistSection};
use crate::error::PackResult;
use crate::pack::{Pack, PackInfo, SizingOutput, SizingRules};

/// Identifier of the base pack.
pub const BASE_PACK_ID: &str = "sp-base";

const BASE_REF: &str = "PACOTE SP (BASE)";

/// Warning emitted when no usable floor area was given.
pub const WARN_NO_AREA: &str = "Área (m²) não informada: dimensionamento ficará limitado.";
/// Warning emitted when no occupant capacity was given.
pub const WARN_NO_CAPACITY: &str =
    "Lotação não informada: recomendações de público/brigada ficarão limitadas.";

#[derive(Debug, Clone)]
pub struct BasePack {
    info: PackInfo,
    catalog: Vec<ChecklistSection>,
}

impl BasePack {
    pub fn new() -> Self {
        Self {
            info: PackInfo::new(
                BASE_PACK_ID,
                "São Paulo (Base)",
                "0.2.0",
                "2025-01-01",
                "Checklist macro + framework de dimensionamento. Sem valores normativos oficiais.",
            ),
            catalog: sp_catalog(CatalogEdition::Base),
        }
    }
}

impl Default for BasePack {
    fn default() -> Self {
        Self::new()
    }
}

impl Pack for BasePack {
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

impl SizingRules for BasePack {
    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();

        out.push(
            RawRecommendation::new(
                "rec_doc",
                "Documentação",
                "Organizar evidências mínimas de manutenção e testes",
            )
            .summary("Reunir registros e evidências de manutenção/testes dos sistemas existentes.")
            .details(
                "Registre datas, responsáveis, fotos e ocorrências. Isso ajuda a orientar \
                 adequações do contratante.",
            )
            .refs([Reference::new(BASE_REF, "Sem citações normativas no pacote base.")])
            .severity(Severity::Info),
        );

        out.push(
            RawRecommendation::new(
                "rec_brigada",
                "Brigada",
                "Avaliar necessidade de brigada/treinamento e dimensionamento",
            )
            .summary("Dimensionamento depende da ocupação, lotação, riscos e exigências aplicáveis.")
            .details(
                "No pacote oficial, o app calculará quantitativo mínimo e justificará com \
                 IT/NBR/leis. Por enquanto, registre lotação, riscos e turnos.",
            )
            .refs([Reference::new(
                BASE_REF,
                "Cálculo normativo será inserido no pacote oficial.",
            )])
            .severity(Severity::Warn),
        );

        out.push(
            RawRecommendation::new(
                "rec_extintores",
                "Extintores",
                "Avaliar quantidade, distribuição e tipo dos extintores",
            )
            .summary(
                "Verificar compatibilidade com riscos (elétrico, cozinha/óleo, inflamáveis, etc.).",
            )
            .details(
                "No pacote oficial, o app calculará mínimos por área/risco e justificará com \
                 referências. No base, registre o que existe (tipo/capacidade/localização/validade) \
                 e pendências.",
            )
            .refs([Reference::new(BASE_REF, "Sem valores numéricos oficiais.")])
            .severity(Severity::Warn),
        );

        if ctx.is_event() || ctx.stage_structure {
            out.push(
                RawRecommendation::new(
                    "rec_evento_layout",
                    "Evento",
                    "Validar layout, barreiras, saídas temporárias e controle de público",
                )
                .summary("Garantir fluxo seguro, saídas sinalizadas e rotas desobstruídas.")
                .details(
                    "Registrar largura de rotas, pontos de estrangulamento, barreiras e \
                     posicionamento de equipamentos.",
                )
                .refs([Reference::new(
                    BASE_REF,
                    "Pacote oficial trará requisitos e cálculos.",
                )])
                .severity(Severity::Critical),
            );
        }

        if !ctx.has_area() {
            out.warn(WARN_NO_AREA);
        }
        if ctx.capacity.is_none() {
            out.warn(WARN_NO_CAPACITY);
        }

        Ok(out)
    }
}
