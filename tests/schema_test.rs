use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use voyage_rs::schemas::{decode_structured, validate_structured_payload};
use voyage_rs::{completion_schema, CompletionSchema, ParsedPreferences, Recommendation};

/// A quick sketch of one trip.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[completion_schema(name = "TripSketch")]
struct TripSketch {
    /// Where the trip goes
    destination_name: String,
    /// Nights away
    nights: u32,
    /// Optional vibe in a couple of words
    #[serde(default)]
    vibe: Option<String>,
}

#[test]
fn macro_attaches_named_schema_with_field_docs() {
    let handle = TripSketch::schema();
    assert_eq!(handle.schema_name(), "TripSketch");
    assert_eq!(handle.type_name(), "TripSketch");

    let schema = handle.schema_json();
    assert_eq!(schema["title"], "TripSketch");
    assert_eq!(schema["description"], "A quick sketch of one trip.");

    let props = schema["properties"].as_object().unwrap();
    assert_eq!(props["destinationName"]["description"], "Where the trip goes");
    assert_eq!(props["nights"]["type"], "integer");
    assert!(props.contains_key("vibe"));
}

#[test]
fn schema_handle_is_built_once() {
    assert!(std::ptr::eq(TripSketch::schema(), TripSketch::schema()));
}

#[test]
fn decode_reports_shape_errors_as_validation() {
    let sketch: TripSketch =
        decode_structured(&json!({ "destinationName": "Crete", "nights": 4 })).unwrap();
    assert_eq!(sketch.destination_name, "Crete");
    assert_eq!(sketch.nights, 4);
    assert!(sketch.vibe.is_none());

    let err = decode_structured::<TripSketch>(&json!({ "destinationName": "Crete", "nights": "four" }))
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("TripSketch"));
}

#[test]
fn preference_schema_accepts_partial_payloads() {
    let handle = ParsedPreferences::schema();
    assert!(validate_structured_payload(handle, &json!({})).is_ok());
    assert!(validate_structured_payload(handle, &json!({ "month": "July" })).is_ok());
    assert!(validate_structured_payload(handle, &json!({ "budgetUsd": "cheap" })).is_err());

    let props = handle.schema_json()["properties"].as_object().unwrap();
    for field in ["region", "destinationType", "budgetUsd", "durationDays", "month", "activities"] {
        assert!(props.contains_key(field), "missing {field}");
    }
}

#[test]
fn recommendation_schema_requires_destination_names() {
    let handle = Recommendation::schema();
    assert!(validate_structured_payload(handle, &json!({ "destinations": [] })).is_ok());
    assert!(
        validate_structured_payload(handle, &json!({ "destinations": [{ "country": "Spain" }] }))
            .is_err()
    );
}
