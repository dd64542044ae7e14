//! # Report View Models
//!
//! Turns a stored [`SizingResult`] and checklist answers into the shape a
//! renderer needs. Nothing here re-computes sizing.
//!
//! ## Ordering
//!
//! Recommendations are grouped by category in order of first appearance.
//! Within a group they are ordered by severity rank, most severe first;
//! the sort is stable so equal ranks keep the pack's order. Unknown
//! severity labels rank with `info`.

use serde::Serialize;

use vistoria_core::{InspectionId, Recommendation, Reference, Severity, SizingContext, Timestamp};
use vistoria_pack::{checklist::item_ids, ChecklistSection, Pack, PackSnapshot};

use crate::inspection::{ChecklistAnswer, Inspection, InspectionStatus};
use crate::sizing::SizingResult;

/// Shown in place of the groups when a sizing run produced nothing.
pub const NO_RECOMMENDATIONS: &str = "Sem recomendações de dimensionamento.";

/// One rendered recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub details: String,
    pub severity: Severity,
    /// Label as the pack supplied it.
    pub severity_label: String,
    /// References with a non-empty code.
    pub refs: Vec<Reference>,
    /// `value` followed by `unit`, when a value is present.
    pub value_text: Option<String>,
}

impl From<&Recommendation> for ReportItem {
    fn from(rec: &Recommendation) -> Self {
        let value_text = rec.value.as_ref().map(|v| {
            if rec.unit.is_empty() {
                v.to_string()
            } else {
                format!("{v} {}", rec.unit)
            }
        });
        Self {
            id: rec.id.clone(),
            title: rec.title.clone(),
            summary: rec.summary.clone(),
            details: rec.details.clone(),
            severity: rec.severity_level(),
            severity_label: rec.severity.clone(),
            refs: rec.renderable_refs().cloned().collect(),
            value_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportGroup {
    pub category: String,
    pub items: Vec<ReportItem>,
}

impl ReportGroup {
    /// Highest severity in the group.
    pub fn max_severity(&self) -> Severity {
        self.items
            .iter()
            .map(|i| i.severity)
            .max_by_key(Severity::rank)
            .unwrap_or_default()
    }
}

/// Rendered view of one sizing run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingReport {
    pub pack: PackSnapshot,
    pub computed_at: Timestamp,
    pub groups: Vec<ReportGroup>,
    pub warnings: Vec<String>,
    /// True when there are no recommendations to show.
    pub no_recommendations: bool,
}

impl SizingReport {
    pub fn from_result(result: &SizingResult) -> Self {
        Self {
            pack: result.pack.clone(),
            computed_at: result.computed_at,
            groups: group_by_category(&result.results),
            warnings: result.warnings.clone(),
            no_recommendations: !result.has_results(),
        }
    }

    /// Placeholder text when empty.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.no_recommendations.then_some(NO_RECOMMENDATIONS)
    }

    /// Number of items at `severity`.
    pub fn count(&self, severity: Severity) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.items)
            .filter(|i| i.severity == severity)
            .count()
    }
}

/// Group by category (first appearance), then stable sort by severity.
pub fn group_by_category(results: &[Recommendation]) -> Vec<ReportGroup> {
    let mut groups: Vec<ReportGroup> = Vec::new();
    for rec in results {
        let item = ReportItem::from(rec);
        match groups.iter_mut().find(|g| g.category == rec.category) {
            Some(group) => group.items.push(item),
            None => groups.push(ReportGroup {
                category: rec.category.clone(),
                items: vec![item],
            }),
        }
    }
    for group in &mut groups {
        group.items.sort_by_key(|i| std::cmp::Reverse(i.severity.rank()));
    }
    groups
}

// ---------------------------------------------------------------------------
// Checklist
// ---------------------------------------------------------------------------

/// Answer counts over the items of a built checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChecklistSummary {
    pub total: usize,
    pub ok: usize,
    pub not_ok: usize,
    pub not_applicable: usize,
    pub unanswered: usize,
}

impl ChecklistSummary {
    /// Count answers for the items in `sections`. Answers for items not in
    /// the checklist are ignored.
    pub fn tally(inspection: &Inspection, sections: &[ChecklistSection]) -> Self {
        let mut summary = Self::default();
        for id in item_ids(sections) {
            summary.total += 1;
            match inspection.entry(id).and_then(|e| e.answer) {
                Some(ChecklistAnswer::Ok) => summary.ok += 1,
                Some(ChecklistAnswer::NotOk) => summary.not_ok += 1,
                Some(ChecklistAnswer::NotApplicable) => summary.not_applicable += 1,
                None => summary.unanswered += 1,
            }
        }
        summary
    }

    pub fn is_complete(&self) -> bool {
        self.unanswered == 0
    }
}

/// Everything a renderer shows for one inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionReport {
    pub id: InspectionId,
    pub status: InspectionStatus,
    pub updated_at: Timestamp,
    pub facility: SizingContext,
    pub checklist: ChecklistSummary,
    pub sizing: Option<SizingReport>,
}

impl InspectionReport {
    /// Build against the checklist `pack` produces for this facility.
    pub fn build(inspection: &Inspection, pack: &dyn Pack) -> Self {
        let facility = inspection.context();
        let sections = pack.build_checklist(facility.facility_type, &facility.risk_tags);
        Self {
            id: inspection.id,
            status: inspection.status,
            updated_at: inspection.updated_at,
            checklist: ChecklistSummary::tally(inspection, &sections),
            sizing: inspection.sizing.as_ref().map(SizingReport::from_result),
            facility,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vistoria_core::{normalize_recommendation, RawContext, RawRecommendation};
    use vistoria_pack::{BasePack, OfficialPack};

    use crate::sizing::SizingEngine;

    fn rec(id: &str, category: &str, severity: &str) -> Recommendation {
        normalize_recommendation(&RawRecommendation::from(json!({
            "id": id, "category": category, "title": id, "severity": severity
        })))
    }

    #[test]
    fn groups_keep_first_appearance_order() {
        let groups = group_by_category(&[
            rec("a", "Documentação", "info"),
            rec("b", "Evento", "critical"),
            rec("c", "Documentação", "warn"),
        ]);
        let cats: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(cats, vec!["Documentação", "Evento"]);
    }

    #[test]
    fn items_sorted_by_severity_stably() {
        let groups = group_by_category(&[
            rec("i1", "G", "info"),
            rec("w1", "G", "warn"),
            rec("x", "G", "bogus"),
            rec("c1", "G", "critical"),
            rec("w2", "G", "warn"),
        ]);
        let ids: Vec<&str> = groups[0].items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "w1", "w2", "i1", "x"]);
        assert_eq!(groups[0].max_severity(), Severity::Critical);
        assert_eq!(groups[0].items[4].severity_label, "bogus");
    }

    #[test]
    fn empty_code_refs_are_hidden() {
        let r = normalize_recommendation(&RawRecommendation::from(json!({
            "refs": [{ "code": "IT-21", "note": "" }, { "note": "sem código" }]
        })));
        let item = ReportItem::from(&r);
        assert_eq!(item.refs.len(), 1);
        assert_eq!(item.refs[0].code, "IT-21");
    }

    #[test]
    fn value_text_joins_unit() {
        let with_unit = normalize_recommendation(&RawRecommendation::from(json!({
            "value": 4, "unit": "un"
        })));
        assert_eq!(ReportItem::from(&with_unit).value_text.as_deref(), Some("4 un"));
        let bare = normalize_recommendation(&RawRecommendation::from(json!({ "value": "A-2" })));
        assert_eq!(ReportItem::from(&bare).value_text.as_deref(), Some("A-2"));
        let none = normalize_recommendation(&RawRecommendation::from(json!({})));
        assert!(ReportItem::from(&none).value_text.is_none());
    }

    #[test]
    fn empty_sizing_shows_placeholder() {
        let result = SizingEngine::default().run(&RawContext::default(), None);
        assert!(!result.has_results());
        let report = SizingReport::from_result(&result);
        assert!(report.no_recommendations);
        assert_eq!(report.placeholder(), Some(NO_RECOMMENDATIONS));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn event_report_has_critical_item() {
        let raw = RawContext::from(json!({ "tipoLocal": "evento", "possuiPalcoEstrutura": true }));
        let result = SizingEngine::default().run(&raw, Some(&BasePack::new()));
        assert!(result.has_results());
        let report = SizingReport::from_result(&result);
        assert!(report.placeholder().is_none());
        assert_eq!(report.count(Severity::Critical), 1);
    }

    #[test]
    fn checklist_summary_counts_only_built_items() {
        let pack = OfficialPack::new();
        let mut insp = Inspection::new(RawContext::from(json!({ "tipoLocal": "comercio" })));
        let sections = pack.build_checklist(insp.context().facility_type, &[]);
        let ids = item_ids(&sections);
        insp.answer(ids[0], ChecklistAnswer::Ok, "");
        insp.answer(ids[1], ChecklistAnswer::NotOk, "vencido");
        insp.answer(ids[2], ChecklistAnswer::NotApplicable, "");
        insp.answer("item_inexistente", ChecklistAnswer::Ok, "");

        let summary = ChecklistSummary::tally(&insp, &sections);
        assert_eq!(summary.total, ids.len());
        assert_eq!((summary.ok, summary.not_ok, summary.not_applicable), (1, 1, 1));
        assert_eq!(summary.unanswered, ids.len() - 3);
        assert!(!summary.is_complete());
    }

    #[test]
    fn inspection_report_without_sizing() {
        let insp = Inspection::new(RawContext::from(json!({ "nomeLocal": "Loja" })));
        let report = InspectionReport::build(&insp, &BasePack::new());
        assert!(report.sizing.is_none());
        assert_eq!(report.facility.name, "Loja");
        assert_eq!(report.checklist.ok, 0);
        assert!(report.checklist.total > 0);
    }
}
