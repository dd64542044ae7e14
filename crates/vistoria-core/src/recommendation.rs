//! # Recommendations
//!
//! A pack emits [`RawRecommendation`]s, JSON-shaped and possibly
//! incomplete. [`normalize_recommendation`] turns each one into the
//! universal [`Recommendation`] record every consumer relies on: all text
//! fields present, references well-formed, value either a number, a text
//! or absent.
//!
//! ## Defaults
//!
//! | Field      | When falsy            |
//! |------------|-----------------------|
//! | `id`       | fresh `rec_<hex>`     |
//! | `category` | `"Geral"`             |
//! | `title`    | `"Recomendação"`      |
//! | `severity` | `"info"`              |
//! | others     | `""` / `[]` / absent  |
//!
//! The severity label is kept as supplied. Ranking resolves it through
//! [`Severity::resolve`], so an unknown label sorts as `info`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{clamp_text, text_or, value_to_text};
use crate::facility::Severity;
use crate::identity::new_recommendation_id;

/// Category used when a recommendation has none.
pub const DEFAULT_CATEGORY: &str = "Geral";
/// Title used when a recommendation has none.
pub const DEFAULT_TITLE: &str = "Recomendação";

// ---------------------------------------------------------------------------
// Normalized model
// ---------------------------------------------------------------------------

/// A normative or technical reference cited by a recommendation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Citation code, e.g. `"IT-21"` or `"ABNT NBR 12693:2021"`.
    pub code: String,
    /// Free-text note.
    pub note: String,
}

impl Reference {
    pub fn new(code: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            note: note.into(),
        }
    }

    /// References with an empty code are kept in the record but never
    /// rendered.
    pub fn is_renderable(&self) -> bool {
        !self.code.is_empty()
    }
}

/// A computed quantity attached to a recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizingValue {
    Number(f64),
    Text(String),
}

impl SizingValue {
    /// Interpret an arbitrary JSON value. `null` is no value; numbers stay
    /// numeric; everything else is rendered as text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(n) => match n.as_f64() {
                Some(f) => Some(Self::Number(f)),
                None => Some(Self::Text(n.to_string())),
            },
            Value::String(s) => Some(Self::Text(s.clone())),
            other => Some(Self::Text(value_to_text(other))),
        }
    }
}

impl std::fmt::Display for SizingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => f.write_str(&value_to_text(&Value::from(*n))),
            Self::Text(t) => f.write_str(t),
        }
    }
}

/// The universal recommendation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub category: String,
    pub title: String,
    pub summary: String,
    pub details: String,
    pub refs: Vec<Reference>,
    /// Severity label as supplied by the pack.
    pub severity: String,
    pub value: Option<SizingValue>,
    pub unit: String,
}

impl Recommendation {
    /// Interpreted severity; unknown labels are `Info`.
    pub fn severity_level(&self) -> Severity {
        Severity::resolve(&self.severity)
    }

    /// References worth showing (non-empty code).
    pub fn renderable_refs(&self) -> impl Iterator<Item = &Reference> {
        self.refs.iter().filter(|r| r.is_renderable())
    }
}

// ---------------------------------------------------------------------------
// Raw model
// ---------------------------------------------------------------------------

/// A recommendation as a pack emits it. Every field is optional and
/// loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct RawRecommendation {
    pub id: Value,
    pub category: Value,
    pub title: Value,
    pub summary: Value,
    pub details: Value,
    pub refs: Value,
    pub severity: Value,
    pub value: Value,
    pub unit: Value,
}

impl From<Value> for RawRecommendation {
    fn from(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };
        let mut take = |key: &str| map.remove(key).unwrap_or(Value::Null);
        Self {
            id: take("id"),
            category: take("category"),
            title: take("title"),
            summary: take("summary"),
            details: take("details"),
            refs: take("refs"),
            severity: take("severity"),
            value: take("value"),
            unit: take("unit"),
        }
    }
}

impl RawRecommendation {
    /// Start a builder-style recommendation with the three identifying
    /// fields. Packs written in Rust use this instead of JSON literals.
    pub fn new(id: &str, category: &str, title: &str) -> Self {
        Self {
            id: Value::from(id),
            category: Value::from(category),
            title: Value::from(title),
            ..Self::default()
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Value::String(summary.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Value::String(details.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Value::from(severity.as_str());
        self
    }

    pub fn refs(mut self, refs: impl IntoIterator<Item = Reference>) -> Self {
        self.refs = Value::Array(
            refs.into_iter()
                .map(|r| {
                    let mut m = Map::new();
                    m.insert("code".into(), Value::String(r.code));
                    m.insert("note".into(), Value::String(r.note));
                    Value::Object(m)
                })
                .collect(),
        );
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Value::String(unit.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turn a pack-supplied recommendation into the universal record.
pub fn normalize_recommendation(raw: &RawRecommendation) -> Recommendation {
    let id = match text_or(&raw.id, "") {
        s if s.is_empty() => new_recommendation_id(),
        s => s,
    };
    Recommendation {
        id,
        category: text_or(&raw.category, DEFAULT_CATEGORY),
        title: text_or(&raw.title, DEFAULT_TITLE),
        summary: text_or(&raw.summary, ""),
        details: text_or(&raw.details, ""),
        refs: normalize_refs(&raw.refs),
        severity: text_or(&raw.severity, Severity::Info.as_str()),
        value: SizingValue::from_json(&raw.value),
        unit: text_or(&raw.unit, ""),
    }
}

/// Render a pack warning as text and cap it at `max` characters.
pub fn normalize_warning(warning: &Value, max: usize) -> String {
    clamp_text(&value_to_text(warning), max)
}

fn normalize_refs(refs: &Value) -> Vec<Reference> {
    let Value::Array(items) = refs else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| match item {
            Value::Object(m) => Reference {
                code: m.get("code").map(|v| text_or(v, "")).unwrap_or_default(),
                note: m.get("note").map(|v| text_or(v, "")).unwrap_or_default(),
            },
            _ => Reference::default(),
        })
        .collect()
}
