//! # Sizing Context — Raw Input and Normalization
//!
//! [`RawContext`] is the partial, loosely typed facility data the UI
//! collects: every field is an arbitrary JSON value and any of them may be
//! missing. [`SizingContext`] is the canonical form every pack receives.
//!
//! [`SizingContext::normalize`] is total. It never rejects input, it only
//! coerces:
//!
//! | Field kind | Rule |
//! |------------|------|
//! | number     | first `,` → `.`, trim, parse; non-finite or blank → `None` |
//! | integer    | as number, then truncated toward zero |
//! | short text | falsy → `""`, clamped to `short_text` chars + `…` |
//! | long text  | falsy → `""`, clamped to `long_text` chars + `…` |
//! | risk tags  | non-array → empty; entries as trimmed text, blanks and repeats dropped |
//! | hazard flag| explicit flag OR corresponding risk tag |
//!
//! Normalization is idempotent: feeding a normalized context back through
//! [`RawContext::from`] and normalizing again yields the same value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{clamp_text, flag, parse_integer, parse_number, text_or, value_to_text};
use crate::facility::{tags, FacilityType};
use crate::limits::EngineLimits;

// ---------------------------------------------------------------------------
// RawContext
// ---------------------------------------------------------------------------

/// Facility data as collected, before normalization.
///
/// Deserializes from *any* JSON value: an object contributes the fields it
/// has, anything else yields an all-`null` context. Alternate English keys
/// (`facilityType`, `riskTags`) are accepted for the two fields callers most
/// often spell that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawContext {
    /// Facility type label.
    #[serde(rename = "tipoLocal")]
    pub facility_type: Value,
    /// Facility name.
    #[serde(rename = "nomeLocal")]
    pub name: Value,
    /// Street address.
    #[serde(rename = "endereco")]
    pub address: Value,
    /// Floor area in square metres.
    #[serde(rename = "area_m2")]
    pub area_m2: Value,
    /// Number of floors.
    #[serde(rename = "pavimentos")]
    pub floors: Value,
    /// Height in metres.
    #[serde(rename = "altura_m")]
    pub height_m: Value,
    /// Occupant capacity.
    #[serde(rename = "lotacao")]
    pub capacity: Value,
    /// Risk tags.
    #[serde(rename = "riscos")]
    pub risk_tags: Value,
    /// Occupation / use description.
    #[serde(rename = "ocupacao")]
    pub occupation: Value,
    /// Operating hours.
    #[serde(rename = "horarioFuncionamento")]
    pub operating_hours: Value,
    /// Predominant public (adult, mixed, children, ...).
    #[serde(rename = "publicoPredominante")]
    pub predominant_public: Value,
    /// Explicit industrial-kitchen flag.
    #[serde(rename = "possuiCozinhaIndustrial")]
    pub industrial_kitchen: Value,
    /// Explicit LPG flag.
    #[serde(rename = "possuiGLP")]
    pub lpg: Value,
    /// Explicit stage/structure flag.
    #[serde(rename = "possuiPalcoEstrutura")]
    pub stage_structure: Value,
    /// Free-text sizing notes.
    #[serde(rename = "observacoesDim")]
    pub notes: Value,
}

impl From<Value> for RawContext {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self {
            facility_type: pick(&map, &["tipoLocal", "facilityType"]),
            name: pick(&map, &["nomeLocal"]),
            address: pick(&map, &["endereco"]),
            area_m2: pick(&map, &["area_m2"]),
            floors: pick(&map, &["pavimentos"]),
            height_m: pick(&map, &["altura_m"]),
            capacity: pick(&map, &["lotacao"]),
            risk_tags: pick(&map, &["riscos", "riskTags"]),
            occupation: pick(&map, &["ocupacao"]),
            operating_hours: pick(&map, &["horarioFuncionamento"]),
            predominant_public: pick(&map, &["publicoPredominante"]),
            industrial_kitchen: pick(&map, &["possuiCozinhaIndustrial"]),
            lpg: pick(&map, &["possuiGLP"]),
            stage_structure: pick(&map, &["possuiPalcoEstrutura"]),
            notes: pick(&map, &["observacoesDim"]),
        }
    }
}

/// First non-null value among `keys`.
fn pick(map: &Map<String, Value>, keys: &[&str]) -> Value {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
        .cloned()
        .unwrap_or(Value::Null)
}

impl From<&SizingContext> for RawContext {
    fn from(ctx: &SizingContext) -> Self {
        Self {
            facility_type: Value::from(ctx.facility_type.as_str()),
            name: Value::from(ctx.name.clone()),
            address: Value::from(ctx.address.clone()),
            area_m2: ctx.area_m2.map_or(Value::Null, Value::from),
            floors: ctx.floors.map_or(Value::Null, Value::from),
            height_m: ctx.height_m.map_or(Value::Null, Value::from),
            capacity: ctx.capacity.map_or(Value::Null, Value::from),
            risk_tags: Value::from(ctx.risk_tags.clone()),
            occupation: Value::from(ctx.occupation.clone()),
            operating_hours: Value::from(ctx.operating_hours.clone()),
            predominant_public: Value::from(ctx.predominant_public.clone()),
            industrial_kitchen: Value::from(ctx.industrial_kitchen),
            lpg: Value::from(ctx.lpg),
            stage_structure: Value::from(ctx.stage_structure),
            notes: Value::from(ctx.notes.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// SizingContext
// ---------------------------------------------------------------------------

/// Canonical facility data handed to a pack's sizing rules and echoed in
/// the sizing result as `inputs`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SizingContext {
    /// Facility classification.
    #[serde(rename = "tipoLocal")]
    pub facility_type: FacilityType,
    /// Facility name.
    #[serde(rename = "nomeLocal")]
    pub name: String,
    /// Street address.
    #[serde(rename = "endereco")]
    pub address: String,
    /// Floor area in square metres.
    pub area_m2: Option<f64>,
    /// Number of floors.
    #[serde(rename = "pavimentos")]
    pub floors: Option<i64>,
    /// Height in metres.
    #[serde(rename = "altura_m")]
    pub height_m: Option<f64>,
    /// Occupant capacity.
    #[serde(rename = "lotacao")]
    pub capacity: Option<i64>,
    /// Risk tags, in first-seen order, without duplicates.
    #[serde(rename = "riscos")]
    pub risk_tags: Vec<String>,
    /// Occupation / use description.
    #[serde(rename = "ocupacao")]
    pub occupation: String,
    /// Operating hours.
    #[serde(rename = "horarioFuncionamento")]
    pub operating_hours: String,
    /// Predominant public.
    #[serde(rename = "publicoPredominante")]
    pub predominant_public: String,
    /// Industrial kitchen present (flag or `cozinha` tag).
    #[serde(rename = "possuiCozinhaIndustrial")]
    pub industrial_kitchen: bool,
    /// LPG present (flag or `glp` tag).
    #[serde(rename = "possuiGLP")]
    pub lpg: bool,
    /// Stage or structure present (flag or `palco` tag).
    #[serde(rename = "possuiPalcoEstrutura")]
    pub stage_structure: bool,
    /// Free-text sizing notes.
    #[serde(rename = "observacoesDim")]
    pub notes: String,
}

impl SizingContext {
    /// Normalize with the default [`EngineLimits`].
    pub fn normalize(raw: &RawContext) -> Self {
        Self::normalize_with(raw, &EngineLimits::default())
    }

    /// Normalize with explicit limits.
    pub fn normalize_with(raw: &RawContext, limits: &EngineLimits) -> Self {
        let short = |v: &Value| clamp_text(&text_or(v, ""), limits.short_text);
        let long = |v: &Value| clamp_text(&text_or(v, ""), limits.long_text);

        let risk_tags = normalize_tags(&raw.risk_tags);
        let has = |tag: &str| risk_tags.iter().any(|t| t == tag);

        let facility_type = match &raw.facility_type {
            Value::String(s) => FacilityType::from_label(s),
            _ => FacilityType::default(),
        };

        Self {
            facility_type,
            name: short(&raw.name),
            address: long(&raw.address),
            area_m2: parse_number(&raw.area_m2),
            floors: parse_integer(&raw.floors),
            height_m: parse_number(&raw.height_m),
            capacity: parse_integer(&raw.capacity),
            occupation: short(&raw.occupation),
            operating_hours: short(&raw.operating_hours),
            predominant_public: short(&raw.predominant_public),
            industrial_kitchen: flag(&raw.industrial_kitchen) || has(tags::COZINHA),
            lpg: flag(&raw.lpg) || has(tags::GLP),
            stage_structure: flag(&raw.stage_structure) || has(tags::PALCO),
            notes: long(&raw.notes),
            risk_tags,
        }
    }

    /// Whether `tag` is among the risk tags.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.risk_tags.iter().any(|t| t == tag)
    }

    /// Whether the facility is an event.
    pub fn is_event(&self) -> bool {
        self.facility_type.is_event()
    }

    /// Whether a usable floor area was supplied (present and non-zero).
    pub fn has_area(&self) -> bool {
        self.area_m2.is_some_and(|a| a != 0.0)
    }
}

/// Normalize a raw context with the default limits.
pub fn normalize_context(raw: &RawContext) -> SizingContext {
    SizingContext::normalize(raw)
}

fn normalize_tags(value: &Value) -> Vec<String> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if item.is_array() || item.is_object() {
            continue;
        }
        let tag = value_to_text(item).trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn normalize_json(v: Value) -> SizingContext {
        SizingContext::normalize(&RawContext::from(v))
    }

    #[test]
    fn empty_input_yields_defaults() {
        let ctx = normalize_json(json!({}));
        assert_eq!(ctx, SizingContext::default());
        assert_eq!(ctx.facility_type, FacilityType::Comercio);
        assert!(ctx.risk_tags.is_empty());
        assert_eq!(ctx.area_m2, None);
    }

    #[test]
    fn non_object_input_yields_defaults() {
        assert_eq!(normalize_json(json!("texto")), SizingContext::default());
        assert_eq!(normalize_json(json!(null)), SizingContext::default());
        assert_eq!(normalize_json(json!([1, 2])), SizingContext::default());
    }

    #[test]
    fn numbers_are_parsed_from_form_strings() {
        let ctx = normalize_json(json!({
            "area_m2": "350,5",
            "pavimentos": "2",
            "altura_m": " 7.2 ",
            "lotacao": "149.9"
        }));
        assert_eq!(ctx.area_m2, Some(350.5));
        assert_eq!(ctx.floors, Some(2));
        assert_eq!(ctx.height_m, Some(7.2));
        assert_eq!(ctx.capacity, Some(149));
    }

    #[test]
    fn invalid_numbers_become_none() {
        let ctx = normalize_json(json!({
            "area_m2": "muito grande",
            "lotacao": "",
            "pavimentos": null,
            "altura_m": true
        }));
        assert_eq!(ctx.area_m2, None);
        assert_eq!(ctx.capacity, None);
        assert_eq!(ctx.floors, None);
        assert_eq!(ctx.height_m, None);
    }

    #[test]
    fn short_text_is_clamped_with_marker() {
        let long = "x".repeat(130);
        let ctx = normalize_json(json!({ "ocupacao": long }));
        assert_eq!(ctx.occupation.chars().count(), 121);
        assert!(ctx.occupation.ends_with('…'));
    }

    #[test]
    fn long_text_uses_long_cap() {
        let notes = "y".repeat(1500);
        let ctx = normalize_json(json!({ "observacoesDim": notes.clone() }));
        assert_eq!(ctx.notes, notes);
    }

    #[test]
    fn custom_limits_apply() {
        let limits = EngineLimits {
            short_text: 5,
            long_text: 8,
            warning: 10,
        };
        let raw = RawContext::from(json!({
            "ocupacao": "Comércio varejista",
            "observacoesDim": "observação longa"
        }));
        let ctx = SizingContext::normalize_with(&raw, &limits);
        assert_eq!(ctx.occupation, "Comér…");
        assert_eq!(ctx.notes, "observaç…");
    }

    #[test]
    fn text_fields_coerce_numbers() {
        let ctx = normalize_json(json!({ "ocupacao": 42, "nomeLocal": null }));
        assert_eq!(ctx.occupation, "42");
        assert_eq!(ctx.name, "");
    }

    #[test]
    fn glp_tag_sets_lpg_flag() {
        let ctx = normalize_json(json!({ "riscos": ["glp"] }));
        assert!(ctx.lpg);
        assert!(!ctx.industrial_kitchen);
        assert!(!ctx.stage_structure);
    }

    #[test]
    fn kitchen_and_stage_tags_set_flags() {
        let ctx = normalize_json(json!({ "riscos": ["cozinha", "palco"] }));
        assert!(ctx.industrial_kitchen);
        assert!(ctx.stage_structure);
        assert!(!ctx.lpg);
    }

    #[test]
    fn explicit_flags_hold_without_tags() {
        let ctx = normalize_json(json!({
            "possuiGLP": true,
            "possuiCozinhaIndustrial": "sim",
            "possuiPalcoEstrutura": 1
        }));
        assert!(ctx.lpg && ctx.industrial_kitchen && ctx.stage_structure);
        assert!(ctx.risk_tags.is_empty());
    }

    #[test]
    fn non_array_tags_become_empty() {
        let ctx = normalize_json(json!({ "riscos": "glp" }));
        assert!(ctx.risk_tags.is_empty());
        assert!(!ctx.lpg);
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let ctx = normalize_json(json!({ "riscos": [" glp", "glp", "", null, 7, "subsolo"] }));
        assert_eq!(ctx.risk_tags, vec!["glp", "7", "subsolo"]);
    }

    #[test]
    fn structured_tag_entries_are_dropped() {
        let ctx = normalize_json(json!({
            "riscos": [{}, [], { "tag": "glp" }, ["palco"], "cozinha"]
        }));
        assert_eq!(ctx.risk_tags, vec!["cozinha"]);
        assert!(!ctx.lpg);
        assert!(!ctx.stage_structure);
    }

    #[test]
    fn oversized_capacity_is_absent() {
        let ctx = normalize_json(json!({ "lotacao": "1e30", "pavimentos": -1e300 }));
        assert_eq!(ctx.capacity, None);
        assert_eq!(ctx.floors, None);
    }

    #[test]
    fn english_aliases_are_accepted() {
        let ctx = normalize_json(json!({ "facilityType": "evento", "riskTags": ["som_luz"] }));
        assert!(ctx.is_event());
        assert!(ctx.has_tag("som_luz"));
    }

    #[test]
    fn unknown_facility_type_is_commerce() {
        let ctx = normalize_json(json!({ "tipoLocal": "industria" }));
        assert_eq!(ctx.facility_type, FacilityType::Comercio);
        let ctx = normalize_json(json!({ "tipoLocal": 3 }));
        assert_eq!(ctx.facility_type, FacilityType::Comercio);
    }

    #[test]
    fn normalized_context_serializes_with_wire_names() {
        let ctx = normalize_json(json!({ "tipoLocal": "evento", "lotacao": 300 }));
        let v = serde_json::to_value(&ctx).unwrap();
        assert_eq!(v["tipoLocal"], "evento");
        assert_eq!(v["lotacao"], 300);
        assert_eq!(v["area_m2"], Value::Null);
        assert_eq!(v["possuiGLP"], false);
    }

    #[test]
    fn raw_context_deserializes_from_any_json() {
        let raw: RawContext = serde_json::from_str(r#"{"area_m2": "10", "extra": 1}"#).unwrap();
        assert_eq!(raw.area_m2, json!("10"));
        let raw: RawContext = serde_json::from_str("42").unwrap();
        assert_eq!(raw, RawContext::default());
    }

    #[test]
    fn has_area_treats_zero_as_missing() {
        assert!(!normalize_json(json!({ "area_m2": 0 })).has_area());
        assert!(normalize_json(json!({ "area_m2": "12" })).has_area());
    }

    fn scalar() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i32>().prop_map(Value::from),
            (-1.0e6f64..1.0e6).prop_map(Value::from),
            ".{0,200}".prop_map(Value::from),
            "[0-9]{1,4}(,[0-9]{1,3})?".prop_map(Value::from),
        ]
    }

    fn raw_context() -> impl Strategy<Value = RawContext> {
        let tags = prop_oneof![
            Just(Value::Null),
            prop::collection::vec(
                prop_oneof![
                    Just(Value::from("glp")),
                    Just(Value::from("cozinha")),
                    Just(Value::from("palco")),
                    Just(Value::from(" som_luz ")),
                    scalar(),
                ],
                0..6
            )
            .prop_map(Value::from),
            scalar(),
        ];
        (
            prop::collection::vec(scalar(), 14),
            tags,
        )
            .prop_map(|(s, tags)| RawContext {
                facility_type: s[0].clone(),
                name: s[1].clone(),
                address: s[2].clone(),
                area_m2: s[3].clone(),
                floors: s[4].clone(),
                height_m: s[5].clone(),
                capacity: s[6].clone(),
                risk_tags: tags,
                occupation: s[7].clone(),
                operating_hours: s[8].clone(),
                predominant_public: s[9].clone(),
                industrial_kitchen: s[10].clone(),
                lpg: s[11].clone(),
                stage_structure: s[12].clone(),
                notes: s[13].clone(),
            })
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(raw in raw_context()) {
            let once = SizingContext::normalize(&raw);
            let twice = SizingContext::normalize(&RawContext::from(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn hazard_flags_follow_tags(raw in raw_context()) {
            let ctx = SizingContext::normalize(&raw);
            if ctx.has_tag(tags::GLP) { prop_assert!(ctx.lpg); }
            if ctx.has_tag(tags::COZINHA) { prop_assert!(ctx.industrial_kitchen); }
            if ctx.has_tag(tags::PALCO) { prop_assert!(ctx.stage_structure); }
        }
    }
}
