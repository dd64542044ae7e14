//! # Pluggable Sizing Tables
//!
//! The official pack delegates quantitative sizing to four table
//! calculators: extinguishers, brigade, civil fire-watch and
//! signage/lighting. Each one is individually enabled through
//! [`TableSettings`] and owns its references.
//!
//! No official numeric tables ship yet, so an enabled calculator emits a
//! structural recommendation (what will be computed, which data is
//! missing). A disabled calculator is still visible in every report
//! through a single `warn` placeholder naming the pending calculation.
//!
//! ## Configuration
//!
//! ```yaml
//! version: "0.1.0"
//! extinguishers: false
//! brigade: false
//! civil_fire_watch: false
//! signage_lighting: false
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use vistoria_core::{RawRecommendation, Reference, Severity, SizingContext};

use super::references::{ref_decree, ref_it17, ref_it21, ref_nbr12693, ref_nbr14276};
use crate::error::{PackError, PackResult};
use crate::pack::SizingOutput;
use crate::parser;

/// Version of the bundled table layout.
pub const TABLES_VERSION: &str = "0.1.0";

pub(crate) const OCCUPANCY_NOTE: &str = "Classificação por ocupação/grupo/divisão será adicionada \
     com base oficial (SP/CBPMESP).";

// ---------------------------------------------------------------------------
// Settings and status
// ---------------------------------------------------------------------------

/// Which calculators are enabled. Everything is off by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub version: String,
    pub extinguishers: bool,
    pub brigade: bool,
    pub civil_fire_watch: bool,
    pub signage_lighting: bool,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            version: TABLES_VERSION.to_string(),
            extinguishers: false,
            brigade: false,
            civil_fire_watch: false,
            signage_lighting: false,
        }
    }
}

impl TableSettings {
    /// Load settings from a YAML or JSON file.
    pub fn load(path: &Path) -> PackResult<Self> {
        parser::load_typed(path)
    }

    pub fn is_enabled(&self, kind: CalculatorKind) -> bool {
        match kind {
            CalculatorKind::Extinguishers => self.extinguishers,
            CalculatorKind::Brigade => self.brigade,
            CalculatorKind::CivilFireWatch => self.civil_fire_watch,
            CalculatorKind::SignageLighting => self.signage_lighting,
        }
    }
}

/// Enablement and note of one table, as listed in the reference database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableState {
    pub enabled: bool,
    pub note: String,
}

/// Status of every table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStatus {
    pub version: String,
    pub extinguishers: TableState,
    pub brigade: TableState,
    pub civil_fire_watch: TableState,
    pub signage_lighting: TableState,
}

impl From<&TableSettings> for TableStatus {
    fn from(settings: &TableSettings) -> Self {
        let state = |kind: CalculatorKind| TableState {
            enabled: settings.is_enabled(kind),
            note: kind.note().to_string(),
        };
        Self {
            version: settings.version.clone(),
            extinguishers: state(CalculatorKind::Extinguishers),
            brigade: state(CalculatorKind::Brigade),
            civil_fire_watch: state(CalculatorKind::CivilFireWatch),
            signage_lighting: state(CalculatorKind::SignageLighting),
        }
    }
}

// ---------------------------------------------------------------------------
// Calculator contract
// ---------------------------------------------------------------------------

/// The four sizing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculatorKind {
    Extinguishers,
    Brigade,
    CivilFireWatch,
    SignageLighting,
}

impl CalculatorKind {
    /// Evaluation order.
    pub fn all() -> &'static [CalculatorKind] {
        &[
            Self::Extinguishers,
            Self::Brigade,
            Self::CivilFireWatch,
            Self::SignageLighting,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extinguishers => "extinguishers",
            Self::Brigade => "brigade",
            Self::CivilFireWatch => "civil_fire_watch",
            Self::SignageLighting => "signage_lighting",
        }
    }

    /// Status note shown in the reference database.
    pub fn note(&self) -> &'static str {
        match self {
            Self::Extinguishers => {
                "Tabela de dimensionamento de extintores será preenchida com base em \
                 IT-21/NBR 12693 e requisitos SP."
            }
            Self::Brigade => {
                "Tabela de dimensionamento de brigada/brigadistas será preenchida com base \
                 IT-17/NBR 14276 e critérios SP."
            }
            Self::CivilFireWatch => {
                "Critérios para bombeiro civil (nível/quantidade) podem variar por contrato, \
                 risco e exigências locais. Estrutura pronta para regras futuras."
            }
            Self::SignageLighting => {
                "Regras e critérios de sinalização e iluminação de emergência serão \
                 parametrizados por SP/ABNT aplicáveis."
            }
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pluggable sizing table.
pub trait TableCalculator: Send + Sync + fmt::Debug {
    fn kind(&self) -> CalculatorKind;

    fn enabled(&self) -> bool;

    /// References the table is built on.
    fn references(&self) -> &[Reference];

    /// Run the table. Only called when enabled.
    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput>;

    /// The recommendation standing in for the table while disabled.
    fn placeholder(&self) -> RawRecommendation;
}

// ---------------------------------------------------------------------------
// Extinguishers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ExtinguisherTable {
    enabled: bool,
    refs: Vec<Reference>,
}

impl ExtinguisherTable {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            refs: vec![
                Reference::new("IT-21", "Sistema de proteção por extintores (SP)."),
                Reference::new("ABNT NBR 12693", "Extintores: projeto/seleção/instalação."),
            ],
        }
    }
}

impl TableCalculator for ExtinguisherTable {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Extinguishers
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn references(&self) -> &[Reference] {
        &self.refs
    }

    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();
        out.push(
            RawRecommendation::new(
                "ext_placeholder_min",
                "Extintores",
                "Dimensionar mínimo de extintores (tabela oficial pendente)",
            )
            .summary("A definição do mínimo depende de ocupação, área, riscos e critérios aplicáveis.")
            .details(
                "Esta função está pronta para calcular automaticamente quando a tabela oficial \
                 for preenchida com valores de IT/NBR/Decreto aplicáveis.",
            )
            .refs(self.refs.clone())
            .severity(Severity::Warn),
        );
        if !ctx.has_area() {
            out.warn("Área não informada: cálculo de extintores limitado.");
        }
        if ctx.occupation.is_empty() {
            out.warn("Ocupação não informada: classificação e critérios podem mudar.");
        }
        Ok(out)
    }

    fn placeholder(&self) -> RawRecommendation {
        RawRecommendation::new(
            "ext_disabled",
            "Extintores",
            "Dimensionamento automático de extintores (aguardando tabela oficial)",
        )
        .summary("O motor está pronto, mas a tabela oficial ainda não foi ativada.")
        .details(
            "Quando habilitar, o app calculará mínimo, distribuição e justificativa (refs IT/NBR). \
             Por enquanto, registre: quantidade, tipos, localização, validade e pendências.",
        )
        .refs([ref_it21(), ref_nbr12693()])
        .severity(Severity::Warn)
    }
}

// ---------------------------------------------------------------------------
// Brigade
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BrigadeTable {
    enabled: bool,
    refs: Vec<Reference>,
}

impl BrigadeTable {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            refs: vec![
                Reference::new("IT-17", "Brigada de incêndio (SP)."),
                Reference::new("ABNT NBR 14276", "Brigada de incêndio (diretrizes)."),
            ],
        }
    }
}

impl TableCalculator for BrigadeTable {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::Brigade
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn references(&self) -> &[Reference] {
        &self.refs
    }

    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();
        out.push(
            RawRecommendation::new(
                "brig_placeholder_min",
                "Brigada",
                "Dimensionar brigada/brigadistas (tabela oficial pendente)",
            )
            .summary(
                "O mínimo depende de ocupação, lotação, riscos, turnos e exigências aplicáveis.",
            )
            .details(
                "Esta função está pronta para calcular automaticamente quando a tabela oficial \
                 for preenchida.",
            )
            .refs(self.refs.clone())
            .severity(Severity::Warn),
        );
        if ctx.capacity.is_none() {
            out.warn("Lotação não informada: dimensionamento de brigada limitado.");
        }
        if ctx.occupation.is_empty() {
            out.warn("Ocupação não informada: critérios de brigada podem mudar por atividade.");
        }
        Ok(out)
    }

    fn placeholder(&self) -> RawRecommendation {
        RawRecommendation::new(
            "brig_disabled",
            "Brigada",
            "Dimensionamento automático de brigada (aguardando tabela oficial)",
        )
        .summary("O motor está pronto, mas a tabela oficial ainda não foi ativada.")
        .details(
            "Quando habilitar, o app calculará mínimo de brigadistas e justificará no relatório. \
             Por enquanto, registre lotação, turnos, riscos e responsável interno.",
        )
        .refs([ref_it17(), ref_nbr14276(), ref_decree()])
        .severity(Severity::Warn)
    }
}

// ---------------------------------------------------------------------------
// Civil fire-watch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CivilFireWatchTable {
    enabled: bool,
    refs: Vec<Reference>,
}

impl CivilFireWatchTable {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            refs: vec![Reference::new(
                "Contrato/Plano de emergência",
                "Definir conforme risco, público e estratégia do local.",
            )],
        }
    }
}

impl TableCalculator for CivilFireWatchTable {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::CivilFireWatch
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn references(&self) -> &[Reference] {
        &self.refs
    }

    fn compute(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();
        out.push(
            RawRecommendation::new(
                "bc_placeholder_need",
                "Bombeiro Civil",
                "Avaliar necessidade de bombeiro civil (regras pendentes)",
            )
            .summary(
                "A necessidade pode depender de eventos, público, risco, layout e exigências do \
                 contratante/órgãos.",
            )
            .details(
                "Esta seção será automatizada quando definirmos a matriz oficial/contratual.",
            )
            .refs(self.refs.clone())
            .severity(Severity::Info),
        );
        if ctx.is_event() {
            out.push(
                RawRecommendation::new(
                    "bc_event_attention",
                    "Bombeiro Civil",
                    "Evento: reforçar equipe e controle operacional",
                )
                .summary(
                    "Eventos geralmente exigem planejamento operacional (fluxo, barreiras, \
                     saídas, comunicação).",
                )
                .details(
                    "Registre layout, pontos críticos e forma de controle de público para definir \
                     equipe mínima.",
                )
                .refs([Reference::new(
                    "Planejamento de evento",
                    "Recomendações operacionais.",
                )])
                .severity(Severity::Warn),
            );
        }
        Ok(out)
    }

    fn placeholder(&self) -> RawRecommendation {
        RawRecommendation::new(
            "bc_disabled",
            "Bombeiro Civil",
            "Avaliar necessidade de bombeiro civil (regras futuras)",
        )
        .summary(
            "Estrutura pronta para automatizar conforme critérios definidos para \
             operação/contratos/eventos.",
        )
        .details("Por enquanto, registre: público, layout, pontos críticos, turnos e plano operacional.")
        .refs(self.refs.clone())
        .severity(Severity::Warn)
    }
}

// ---------------------------------------------------------------------------
// Signage and emergency lighting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SignageLightingTable {
    enabled: bool,
    refs: Vec<Reference>,
}

impl SignageLightingTable {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            refs: vec![Reference::new(
                "Sinalização/Iluminação",
                "Referências serão adicionadas no pacote oficial.",
            )],
        }
    }
}

impl TableCalculator for SignageLightingTable {
    fn kind(&self) -> CalculatorKind {
        CalculatorKind::SignageLighting
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn references(&self) -> &[Reference] {
        &self.refs
    }

    fn compute(&self, _ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();
        out.push(
            RawRecommendation::new(
                "sig_placeholder",
                "Sinalização/Iluminação",
                "Verificar sinalização e iluminação de emergência (regras pendentes)",
            )
            .summary("Avaliar rotas, saídas, pontos críticos e presença/funcionamento dos sistemas.")
            .details(
                "A automatização com quantidades/posicionamento será habilitada após inserir \
                 regras oficiais.",
            )
            .refs(self.refs.clone())
            .severity(Severity::Info),
        );
        Ok(out)
    }

    fn placeholder(&self) -> RawRecommendation {
        RawRecommendation::new(
            "sig_disabled",
            "Sinalização/Iluminação",
            "Regras automáticas de sinalização/iluminação (aguardando parâmetros)",
        )
        .summary("Estrutura pronta para automatizar após inserir regras oficiais aplicáveis.")
        .details(
            "Por enquanto, registre: placas de saída/rota, equipamentos, iluminação de \
             emergência, testes e falhas.",
        )
        .refs([Reference::new("Pacote SP (Oficial)", "Parâmetros serão adicionados.")])
        .severity(Severity::Warn)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The four calculators in evaluation order.
#[derive(Debug)]
pub struct TableRegistry {
    calculators: Vec<Box<dyn TableCalculator>>,
}

impl TableRegistry {
    pub fn new(settings: &TableSettings) -> Self {
        Self {
            calculators: vec![
                Box::new(ExtinguisherTable::new(settings.extinguishers)),
                Box::new(BrigadeTable::new(settings.brigade)),
                Box::new(CivilFireWatchTable::new(settings.civil_fire_watch)),
                Box::new(SignageLightingTable::new(settings.signage_lighting)),
            ],
        }
    }

    /// Registry over caller-supplied calculators, run in the given order.
    pub fn from_calculators(calculators: Vec<Box<dyn TableCalculator>>) -> Self {
        Self { calculators }
    }

    pub fn calculators(&self) -> impl Iterator<Item = &dyn TableCalculator> {
        self.calculators.iter().map(|c| c.as_ref())
    }

    pub fn get(&self, kind: CalculatorKind) -> Option<&dyn TableCalculator> {
        self.calculators().find(|c| c.kind() == kind)
    }

    /// Run enabled calculators and emit placeholders for disabled ones,
    /// concatenating their output in evaluation order.
    pub fn run(&self, ctx: &SizingContext) -> PackResult<SizingOutput> {
        let mut out = SizingOutput::new();
        for calc in self.calculators() {
            if calc.enabled() {
                let part = calc.compute(ctx).map_err(|e| PackError::Calculator {
                    calculator: calc.kind().to_string(),
                    detail: e.to_string(),
                })?;
                out.extend(part);
            } else {
                tracing::debug!(calculator = %calc.kind(), "table disabled, emitting placeholder");
                out.push(calc.placeholder());
            }
        }
        Ok(out)
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::new(&TableSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::Write;
    use vistoria_core::{normalize_recommendation, RawContext, Recommendation};

    fn ctx(v: Value) -> SizingContext {
        SizingContext::normalize(&RawContext::from(v))
    }

    fn recs(out: &SizingOutput) -> Vec<Recommendation> {
        out.results.iter().map(normalize_recommendation).collect()
    }

    fn all_enabled() -> TableSettings {
        TableSettings {
            extinguishers: true,
            brigade: true,
            civil_fire_watch: true,
            signage_lighting: true,
            ..TableSettings::default()
        }
    }

    #[test]
    fn defaults_disable_everything() {
        let s = TableSettings::default();
        assert_eq!(s.version, "0.1.0");
        for kind in CalculatorKind::all() {
            assert!(!s.is_enabled(*kind));
        }
    }

    #[test]
    fn disabled_registry_emits_one_warn_placeholder_each() {
        let out = TableRegistry::default().run(&ctx(json!({}))).unwrap();
        let r = recs(&out);
        let ids: Vec<&str> = r.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["ext_disabled", "brig_disabled", "bc_disabled", "sig_disabled"]);
        assert!(r.iter().all(|x| x.severity == "warn"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn extinguisher_placeholder_refs() {
        let rec = normalize_recommendation(&ExtinguisherTable::new(false).placeholder());
        let codes: Vec<&str> = rec.refs.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["IT-21", "ABNT NBR 12693"]);
    }

    #[test]
    fn brigade_placeholder_refs_include_decree() {
        let rec = normalize_recommendation(&BrigadeTable::new(false).placeholder());
        let codes: Vec<&str> = rec.refs.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["IT-17", "ABNT NBR 14276", "DECRETO SP 69.118/2024"]);
    }

    #[test]
    fn civil_and_signage_placeholder_refs() {
        let bc = normalize_recommendation(&CivilFireWatchTable::new(false).placeholder());
        assert_eq!(bc.refs[0].code, "Contrato/Plano de emergência");
        let sig = normalize_recommendation(&SignageLightingTable::new(false).placeholder());
        assert_eq!(sig.refs[0].code, "Pacote SP (Oficial)");
    }

    #[test]
    fn enabled_tables_warn_on_missing_data() {
        let out = TableRegistry::new(&all_enabled()).run(&ctx(json!({}))).unwrap();
        let ids: Vec<String> = recs(&out).into_iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec![
                "ext_placeholder_min",
                "brig_placeholder_min",
                "bc_placeholder_need",
                "sig_placeholder",
            ]
        );
        assert_eq!(out.warnings.len(), 4);
    }

    #[test]
    fn enabled_tables_quiet_with_full_data() {
        let out = TableRegistry::new(&all_enabled())
            .run(&ctx(json!({ "area_m2": 300, "lotacao": 80, "ocupacao": "Restaurante" })))
            .unwrap();
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn civil_fire_watch_reinforces_events() {
        let calc = CivilFireWatchTable::new(true);
        let out = calc.compute(&ctx(json!({ "tipoLocal": "evento" }))).unwrap();
        let r = recs(&out);
        assert_eq!(r.len(), 2);
        assert_eq!(r[1].id, "bc_event_attention");
        assert_eq!(r[1].severity, "warn");
    }

    #[test]
    fn mixed_settings() {
        let settings = TableSettings {
            brigade: true,
            ..TableSettings::default()
        };
        let out = TableRegistry::new(&settings)
            .run(&ctx(json!({ "ocupacao": "Loja", "lotacao": 20 })))
            .unwrap();
        let ids: Vec<String> = recs(&out).into_iter().map(|r| r.id).collect();
        assert_eq!(
            ids,
            vec!["ext_disabled", "brig_placeholder_min", "bc_disabled", "sig_disabled"]
        );
    }

    #[test]
    fn registry_lookup_by_kind() {
        let reg = TableRegistry::default();
        let ext = reg.get(CalculatorKind::Extinguishers).unwrap();
        assert_eq!(ext.references().len(), 2);
        assert!(!ext.enabled());
    }

    #[test]
    fn status_notes_come_from_kind() {
        let status = TableStatus::from(&TableSettings::default());
        assert_eq!(status.brigade.note, CalculatorKind::Brigade.note());
        assert!(!status.signage_lighting.enabled);
    }

    #[test]
    fn settings_load_partial_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tables.yaml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"extinguishers: true\n").unwrap();
        let s = TableSettings::load(&path).unwrap();
        assert!(s.extinguishers);
        assert!(!s.brigade);
        assert_eq!(s.version, TABLES_VERSION);
    }

    #[derive(Debug)]
    struct BrokenTable;

    impl TableCalculator for BrokenTable {
        fn kind(&self) -> CalculatorKind {
            CalculatorKind::Brigade
        }

        fn enabled(&self) -> bool {
            true
        }

        fn references(&self) -> &[Reference] {
            &[]
        }

        fn compute(&self, _: &SizingContext) -> PackResult<SizingOutput> {
            Err(PackError::Validation("tabela vazia".into()))
        }

        fn placeholder(&self) -> RawRecommendation {
            RawRecommendation::new("broken_disabled", "Brigada", "Indisponível")
        }
    }

    #[test]
    fn failing_calculator_is_reported_by_kind() {
        let reg = TableRegistry::from_calculators(vec![
            Box::new(ExtinguisherTable::new(false)),
            Box::new(BrokenTable),
        ]);
        match reg.run(&ctx(json!({}))) {
            Err(PackError::Calculator { calculator, detail }) => {
                assert_eq!(calculator, "brigade");
                assert!(detail.contains("tabela vazia"));
            }
            other => panic!("expected Calculator error, got {other:?}"),
        }
    }
}
