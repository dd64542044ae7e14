//! # Inspection Checklist
//!
//! Ordered sections of yes/no inspection items, and the filter that
//! decides which tagged items apply to a facility.
//!
//! ## Filter rule
//!
//! - Untagged items always apply.
//! - Tagged items apply to events when their tags include an event marker
//!   (`palco`, `som_luz`), regardless of the declared risks.
//! - Otherwise a tagged item applies when any of its tags is among the
//!   facility's risk tags.
//!
//! Sections keep their order even when every item is filtered out.

use serde::{Deserialize, Serialize};

use vistoria_core::{tags, FacilityType};

/// A single inspection item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub help: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ChecklistItem {
    pub fn new(id: &str, title: &str, help: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            help: help.to_string(),
            tags: Vec::new(),
        }
    }

    pub fn tagged(mut self, item_tags: &[&str]) -> Self {
        self.tags = item_tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Whether this item applies to the facility.
    pub fn applies_to(&self, facility_type: FacilityType, risk_tags: &[String]) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        if facility_type.is_event()
            && self
                .tags
                .iter()
                .any(|t| tags::EVENT_MARKERS.contains(&t.as_str()))
        {
            return true;
        }
        self.tags.iter().any(|t| risk_tags.contains(t))
    }
}

/// A titled group of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub id: String,
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

impl ChecklistSection {
    pub fn new(id: &str, title: &str, items: Vec<ChecklistItem>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            items,
        }
    }
}

/// Apply the filter rule to every section.
pub fn filter_sections(
    sections: &[ChecklistSection],
    facility_type: FacilityType,
    risk_tags: &[String],
) -> Vec<ChecklistSection> {
    sections
        .iter()
        .map(|s| ChecklistSection {
            id: s.id.clone(),
            title: s.title.clone(),
            items: s
                .items
                .iter()
                .filter(|it| it.applies_to(facility_type, risk_tags))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Every item id across sections, in order.
pub fn item_ids(sections: &[ChecklistSection]) -> Vec<&str> {
    sections
        .iter()
        .flat_map(|s| s.items.iter().map(|it| it.id.as_str()))
        .collect()
}

// ---------------------------------------------------------------------------
// São Paulo catalog
// ---------------------------------------------------------------------------

/// Which São Paulo pack the catalog wording is for. Item ids and tags
/// are identical; a few help texts differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEdition {
    Base,
    Official,
}

impl CatalogEdition {
    fn pick(self, base: &'static str, official: &'static str) -> &'static str {
        match self {
            Self::Base => base,
            Self::Official => official,
        }
    }
}

/// The unfiltered São Paulo checklist.
pub fn sp_catalog(edition: CatalogEdition) -> Vec<ChecklistSection> {
    use ChecklistItem as I;
    use ChecklistSection as S;

    vec![
        S::new(
            "ident",
            "Identificação e Documentos",
            vec![
                I::new(
                    "ident_placa",
                    "Placas de lotação/regras (quando aplicável)",
                    "Verificar se há controle/limites e orientações visíveis quando aplicável.",
                ),
                I::new(
                    "ident_planta",
                    "Planta/croqui disponível para orientação",
                    "Se não houver, registrar e sugerir croqui para orientar rotas e equipamentos.",
                ),
                I::new(
                    "ident_man",
                    "Registros de manutenção (extintores/iluminação/alarme)",
                    edition.pick(
                        "Se existir sistema, verificar evidências mínimas de manutenção e teste.",
                        "Verificar evidências mínimas de manutenção e teste quando houver sistemas.",
                    ),
                ),
            ],
        ),
        S::new(
            "rotas",
            "Rotas de fuga e Saídas",
            vec![
                I::new(
                    "rotas_desob",
                    "Rotas de fuga desobstruídas",
                    "Corredores, portas e saídas sem obstáculos, materiais ou travamentos indevidos.",
                ),
                I::new(
                    "rotas_portas",
                    "Portas de saída funcionais",
                    "Sem cadeados durante operação; registrar travas e bloqueios.",
                ),
                I::new(
                    "rotas_larg",
                    "Larguras compatíveis com fluxo",
                    "Registrar gargalos, estreitamentos e barreiras.",
                ),
                I::new(
                    "rotas_escadas",
                    "Escadas/níveis com proteção e segurança",
                    "Corrimão/guarda-corpo quando aplicável; registrar riscos.",
                ),
                I::new(
                    "rotas_dist",
                    "Percurso até saídas e alternativa",
                    "Registrar se percurso parece excessivo/sem alternativas.",
                ),
            ],
        ),
        S::new(
            "ext",
            "Extintores",
            vec![
                I::new(
                    "ext_qtd",
                    "Quantidade/distribuição adequada",
                    "Verificar se há extintores suficientes e bem distribuídos.",
                ),
                I::new(
                    "ext_tipo",
                    "Tipos compatíveis com riscos",
                    edition.pick(
                        "Ex.: risco elétrico, cozinha/óleo, inflamáveis — registrar o que existe e o que falta.",
                        "Compatibilidade com risco elétrico, cozinha/óleo, inflamáveis etc.",
                    ),
                )
                .tagged(&[tags::COZINHA, tags::INFLAMAVEIS]),
                I::new(
                    "ext_sinal",
                    "Sinalização do extintor",
                    "Sinalização visível e correta do ponto do equipamento.",
                ),
                I::new(
                    "ext_acesso",
                    "Acesso livre ao extintor",
                    edition.pick(
                        "Sem móveis, caixas ou obstáculos na frente.",
                        "Sem obstáculos no acesso.",
                    ),
                ),
                I::new(
                    "ext_valid",
                    "Validade/lacre/manômetro/condição",
                    edition.pick(
                        "Verificar indicadores básicos: lacre, pressão (quando houver), condições visuais.",
                        "Verificar indicadores: lacre, pressão (quando houver), integridade.",
                    ),
                ),
            ],
        ),
        S::new(
            "sinal",
            "Sinalização de emergência",
            vec![
                I::new(
                    "sinal_rotas",
                    "Sinalização de rotas e saídas",
                    "Placas indicando saída/rota conforme necessidade do ambiente.",
                ),
                I::new(
                    "sinal_equip",
                    "Sinalização de equipamentos",
                    "Extintores, hidrantes, alarme, etc.",
                ),
                I::new(
                    "sinal_alerta",
                    "Sinalização de alerta/risco",
                    "Riscos específicos (energia, inflamáveis, GLP, etc.).",
                )
                .tagged(&[tags::GLP, tags::INFLAMAVEIS]),
            ],
        ),
        S::new(
            "ilu",
            "Iluminação de emergência",
            vec![
                I::new(
                    "ilu_pres",
                    "Iluminação de emergência presente",
                    "Verificar existência em rotas, saídas e pontos críticos.",
                ),
                I::new(
                    "ilu_teste",
                    "Teste funcional básico",
                    "Se possível, registrar teste simples/indicadores.",
                ),
                I::new(
                    "ilu_aut",
                    "Autonomia/condição aparente",
                    "Estado das luminárias e bateria; registrar falhas.",
                ),
            ],
        ),
        S::new(
            "alarme",
            "Alarme e Detecção (quando houver)",
            vec![
                I::new(
                    "al_central",
                    "Central/indicadores operacionais (se existe)",
                    edition.pick(
                        "Registrar se há central e condição aparente.",
                        "Registrar existência e condição aparente.",
                    ),
                ),
                I::new(
                    "al_acion",
                    "Acionadores/sirenes (se existe)",
                    "Verificar presença, acesso e condição.",
                ),
                I::new(
                    "al_teste",
                    "Registros de teste/manutenção",
                    "Se existir sistema, verificar evidências mínimas.",
                ),
            ],
        ),
        S::new(
            "brigada",
            "Brigada / Plano de emergência",
            vec![
                I::new(
                    "br_plano",
                    "Plano de emergência/orientações internas",
                    "Procedimentos básicos, rota, encontro, responsável.",
                ),
                I::new(
                    "br_treino",
                    "Treinamento/brigadistas definidos",
                    edition.pick(
                        "Registrar se há brigada e se há evidência de treinamento.",
                        "Registrar evidência de treinamento e designação.",
                    ),
                ),
                I::new(
                    "br_dimension",
                    "Dimensionamento (quando aplicável)",
                    edition.pick(
                        "Será calculado pelo pacote oficial (no futuro).",
                        "Será calculado por tabela oficial no pacote SP quando ativado.",
                    ),
                ),
            ],
        ),
        S::new(
            "riscos",
            "Riscos Especiais",
            vec![
                I::new(
                    "r_glp",
                    "GLP: armazenamento e sinalização",
                    "Condição do botijão/central, ventilação e sinalização.",
                )
                .tagged(&[tags::GLP]),
                I::new(
                    "r_cozinha",
                    "Cozinha/óleo: controle de risco",
                    edition.pick(
                        "Presença de risco K/limpeza/ordem; registrar.",
                        "Limpeza/ordem, risco de gordura, registro.",
                    ),
                )
                .tagged(&[tags::COZINHA]),
                I::new(
                    "r_inflam",
                    "Inflamáveis: armazenamento e controle",
                    "Local adequado, sinalização e controle.",
                )
                .tagged(&[tags::INFLAMAVEIS]),
                I::new(
                    "r_subsolo",
                    "Subsolo: rotas e ventilação",
                    "Checar acessos, rotas e condições.",
                )
                .tagged(&[tags::SUBSOLO]),
                I::new(
                    "r_evento",
                    "Evento: layout/saídas temporárias/controle público",
                    edition.pick(
                        "Se evento, registrar layout, saídas e barreiras.",
                        "Registrar layout, saídas, barreiras e fluxo.",
                    ),
                )
                .tagged(tags::EVENT_MARKERS),
            ],
        ),
    ]
}
