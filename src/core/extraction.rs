//! Coercion of loosely-shaped model output before preference validation.
//!
//! Rules, applied in order and only to the named fields:
//! - `weather`: arrays and objects are flattened to one comma-joined string of
//!   at most 200 characters; if nothing readable remains the field is removed.
//! - `activities`: a string is split on commas, the word "and" and `&`, with
//!   pieces trimmed and empties dropped; any other non-array value is removed.
//!
//! Everything else is left for schema validation to accept or reject.

use crate::error::Result;
use crate::schemas::{decode_structured, parse_model_object};
use crate::types::ParsedPreferences;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

const WEATHER_MAX_CHARS: usize = 200;

fn activity_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| {
        Regex::new(r"(?i),|\band\b|&")
            .unwrap_or_else(|err| panic!("invalid activity separator: {err}"))
    })
}

/// Parse, coerce and validate model text into preferences.
pub fn preferences_from_model_text(text: &str) -> Result<ParsedPreferences> {
    let raw = parse_model_object(text)?;
    let normalized = normalize_preferences(raw);
    decode_structured(&Value::Object(normalized))
}

pub fn normalize_preferences(mut raw: Map<String, Value>) -> Map<String, Value> {
    if let Some(weather) = raw.remove("weather") {
        match normalize_weather(weather) {
            Some(weather) => {
                raw.insert("weather".to_string(), weather);
            }
            None => debug!(target: "voyage::extract", "dropping unreadable weather preference"),
        }
    }

    if let Some(activities) = raw.remove("activities") {
        match normalize_activities(activities) {
            Some(activities) => {
                raw.insert("activities".to_string(), activities);
            }
            None => debug!(target: "voyage::extract", "dropping non-list activities"),
        }
    }

    raw
}

fn normalize_weather(value: Value) -> Option<Value> {
    let parts: Vec<String> = match value {
        Value::String(_) | Value::Null => return Some(value),
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::Object(fields) => fields.values().filter_map(scalar_text).collect(),
        _ => return None,
    };

    let joined = parts.join(", ");
    if joined.is_empty() {
        return None;
    }
    Some(Value::String(joined.chars().take(WEATHER_MAX_CHARS).collect()))
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn normalize_activities(value: Value) -> Option<Value> {
    match value {
        Value::Array(_) | Value::Null => Some(value),
        Value::String(text) => Some(Value::Array(
            activity_separator()
                .split(&text)
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(|piece| Value::String(piece.to_string()))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> Value {
        let Value::Object(map) = value else {
            panic!("test input must be an object");
        };
        Value::Object(normalize_preferences(map))
    }

    #[test]
    fn splits_activity_strings() {
        let out = normalize(json!({ "activities": "food, hiking and museums & nightlife" }));
        assert_eq!(
            out["activities"],
            json!(["food", "hiking", "museums", "nightlife"])
        );

        let sandy = normalize(json!({ "activities": "Sand and surf" }));
        assert_eq!(sandy["activities"], json!(["Sand", "surf"]));
    }

    #[test]
    fn drops_non_list_activities() {
        let out = normalize(json!({ "activities": 42, "region": "Europe" }));
        assert!(out.get("activities").is_none());
        assert_eq!(out["region"], "Europe");
    }

    #[test]
    fn flattens_structured_weather() {
        let out = normalize(json!({ "weather": ["warm", "dry", 25] }));
        assert_eq!(out["weather"], "warm, dry, 25");

        let out = normalize(json!({ "weather": { "temp": "hot", "rain": "none" } }));
        let weather = out["weather"].as_str().unwrap();
        assert!(weather.contains("hot") && weather.contains("none"));

        let many = vec!["sunny"; 80];
        let long = normalize(json!({ "weather": many }));
        assert_eq!(long["weather"].as_str().unwrap().chars().count(), 200);
    }

    #[test]
    fn unreadable_weather_is_removed() {
        assert!(normalize(json!({ "weather": [[], {}] })).get("weather").is_none());
        assert!(normalize(json!({ "weather": 7 })).get("weather").is_none());
    }

    #[test]
    fn model_text_becomes_preferences() {
        let prefs = preferences_from_model_text(
            r#"{"region":"Europe","budgetUsd":2000,"activities":"food and hiking","weather":["warm"]}"#,
        )
        .unwrap();
        assert_eq!(prefs.budget_usd, Some(2000.0));
        assert_eq!(prefs.activities(), ["food", "hiking"]);
        assert_eq!(prefs.weather.as_deref(), Some("warm"));
    }

    #[test]
    fn empty_model_text_is_empty_preferences() {
        assert!(preferences_from_model_text("").unwrap().is_empty());
    }

    #[test]
    fn distinguishes_format_and_validation_failures() {
        let format = preferences_from_model_text("no json here").unwrap_err();
        assert_eq!(format.error_code(), "UPSTREAM_FORMAT_ERROR");

        let validation = preferences_from_model_text(r#"{"budgetUsd":"lots"}"#).unwrap_err();
        assert_eq!(validation.error_code(), "VALIDATION_ERROR");
    }
}
