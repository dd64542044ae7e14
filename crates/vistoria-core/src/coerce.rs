//! # Value Coercion
//!
//! Total conversions from arbitrary JSON values to the scalar types the
//! normalizers need. None of these functions fail; input that cannot be
//! interpreted maps to the documented default (`None`, `""`, `false`).
//!
//! ## Truthiness
//!
//! Several defaults apply when a field is *falsy*: absent, `null`,
//! `false`, `0`, `NaN`, or the empty string. Arrays and objects are
//! truthy. See [`is_truthy`].

use serde_json::Value;

/// Marker appended to text cut by [`clamp_text`].
pub const ELLIPSIS: char = '…';

/// Whether a value counts as present for default-coalescing purposes.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render any value as text. `null` becomes the empty string; arrays and
/// objects become their compact JSON form.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_text(n),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Text of a truthy value, `None` for a falsy one.
pub fn truthy_text(value: &Value) -> Option<String> {
    is_truthy(value).then(|| value_to_text(value))
}

/// Text of a truthy value, or `fallback`.
pub fn text_or(value: &Value, fallback: &str) -> String {
    truthy_text(value).unwrap_or_else(|| fallback.to_string())
}

/// Interpret a checkbox-like flag.
///
/// Booleans are taken as-is and numbers are true when non-zero. Strings
/// are true unless blank or one of the usual negative spellings
/// (`false`, `0`, `no`, `nao`, `não`, `off`).
pub fn flag(value: &Value) -> bool {
    match value {
        Value::String(s) => {
            let s = s.trim().to_lowercase();
            !matches!(s.as_str(), "" | "false" | "0" | "no" | "nao" | "não" | "off")
        }
        other => is_truthy(other),
    }
}

/// Parse a finite number.
///
/// Strings have their first decimal comma replaced by a dot and are
/// trimmed before parsing. Blank strings, booleans, containers and
/// non-finite results are `None`.
pub fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.replacen(',', ".", 1);
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// 2^63, the first magnitude `i64` cannot hold.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Parse a number and truncate it toward zero. Values outside the `i64`
/// range are `None`.
pub fn parse_integer(value: &Value) -> Option<i64> {
    parse_number(value)
        .map(f64::trunc)
        .filter(|t| (-I64_LIMIT..I64_LIMIT).contains(t))
        .map(|t| t as i64)
}

/// Cut `text` to at most `max` characters, appending [`ELLIPSIS`] when
/// anything was removed. Text at or under the cap is returned unchanged.
pub fn clamp_text(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => {
            let mut out = String::with_capacity(cut + ELLIPSIS.len_utf8());
            out.push_str(&text[..cut]);
            out.push(ELLIPSIS);
            out
        }
    }
}

fn number_to_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn truthiness_table() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(" ")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn value_to_text_variants() {
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!(42)), "42");
        assert_eq!(value_to_text(&json!(2.5)), "2.5");
        assert_eq!(value_to_text(&json!(3.0)), "3");
        assert_eq!(value_to_text(&json!("IT-21")), "IT-21");
        assert_eq!(value_to_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn text_or_falls_back_on_falsy() {
        assert_eq!(text_or(&json!(""), "Geral"), "Geral");
        assert_eq!(text_or(&json!(0), "Geral"), "Geral");
        assert_eq!(text_or(&json!(7), "Geral"), "7");
    }

    #[test]
    fn flag_handles_form_strings() {
        assert!(flag(&json!(true)));
        assert!(flag(&json!("sim")));
        assert!(flag(&json!(1)));
        assert!(!flag(&json!("false")));
        assert!(!flag(&json!("Não")));
        assert!(!flag(&json!(null)));
        assert!(!flag(&json!(0)));
    }

    #[test]
    fn parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number(&json!("12,5")), Some(12.5));
        assert_eq!(parse_number(&json!("  300 ")), Some(300.0));
        assert_eq!(parse_number(&json!(80)), Some(80.0));
    }

    #[test]
    fn parse_number_rejects_non_numbers() {
        assert_eq!(parse_number(&json!(null)), None);
        assert_eq!(parse_number(&json!("")), None);
        assert_eq!(parse_number(&json!("   ")), None);
        assert_eq!(parse_number(&json!("abc")), None);
        assert_eq!(parse_number(&json!("inf")), None);
        assert_eq!(parse_number(&json!("NaN")), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!([1])), None);
    }

    #[test]
    fn parse_number_only_replaces_first_comma() {
        assert_eq!(parse_number(&json!("1,000,5")), None);
    }

    #[test]
    fn parse_integer_truncates_toward_zero() {
        assert_eq!(parse_integer(&json!("3,9")), Some(3));
        assert_eq!(parse_integer(&json!(-2.7)), Some(-2));
        assert_eq!(parse_integer(&json!("x")), None);
    }

    #[test]
    fn parse_integer_rejects_out_of_range() {
        assert_eq!(parse_integer(&json!("1e30")), None);
        assert_eq!(parse_integer(&json!(-1e19)), None);
        assert_eq!(parse_integer(&json!(9.2e18)), Some(9_200_000_000_000_000_000));
        assert_eq!(parse_integer(&json!(i64::MIN)), Some(i64::MIN));
    }

    #[test]
    fn clamp_text_at_and_over_cap() {
        assert_eq!(clamp_text("abc", 3), "abc");
        assert_eq!(clamp_text("abcd", 3), "abc…");
        assert_eq!(clamp_text("", 0), "");
        assert_eq!(clamp_text("a", 0), "…");
    }

    #[test]
    fn clamp_text_counts_characters_not_bytes() {
        assert_eq!(clamp_text("ção", 3), "ção");
        assert_eq!(clamp_text("extintoção", 8), "extintoç…");
    }

    proptest! {
        #[test]
        fn clamp_text_is_idempotent(s in ".{0,64}", max in 1usize..40) {
            let once = clamp_text(&s, max);
            prop_assert_eq!(clamp_text(&once, max), once.clone());
        }

        #[test]
        fn clamp_text_never_exceeds_cap_plus_marker(s in ".{0,64}", max in 0usize..40) {
            let out = clamp_text(&s, max);
            prop_assert!(out.chars().count() <= max + 1);
        }

        #[test]
        fn parse_number_is_stable_on_its_output(f in -1.0e9f64..1.0e9) {
            let first = parse_number(&json!(f.to_string()));
            prop_assert_eq!(first, Some(f));
        }
    }
}
