use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Travel preferences extracted from a single user turn.
///
/// Every field is optional: absence means the user has not said, never a guess.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[completion_schema]
#[serde(rename_all = "camelCase")]
pub struct ParsedPreferences {
    /// Broad region, country or city the user wants (e.g. "Europe", "Portugal")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Kind of destination (e.g. "beach", "city", "adventure")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_type: Option<String>,
    /// Total trip budget in US dollars
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_usd: Option<f64>,
    /// Trip length in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<f64>,
    /// Month name or the user's original phrase when it cannot be resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Explicit travel dates, when given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TripDates>,
    /// Requested activities (e.g. "food", "hiking")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    /// Desired weather in the user's words (e.g. "warm, dry")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TripDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ParsedPreferences {
    pub fn activities(&self) -> &[String] {
        self.activities.as_deref().unwrap_or_default()
    }

    /// The month to price and forecast against, ignoring blank strings.
    pub fn month(&self) -> Option<&str> {
        self.month
            .as_deref()
            .map(str::trim)
            .filter(|month| !month.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::decode_structured;
    use serde_json::json;

    #[test]
    fn accepts_minimal_object() {
        let prefs: ParsedPreferences = decode_structured(&json!({})).unwrap();
        assert!(prefs.is_empty());
    }

    #[test]
    fn accepts_fully_populated_object() {
        let prefs: ParsedPreferences = decode_structured(&json!({
            "region": "Europe",
            "destinationType": "beach",
            "budgetUsd": 2000,
            "durationDays": 5,
            "month": "May",
            "dates": { "start": "2026-05-02", "end": "2026-05-07" },
            "activities": ["food", "adventure"],
            "weather": "warm"
        }))
        .unwrap();

        assert_eq!(prefs.budget_usd, Some(2000.0));
        assert_eq!(prefs.activities(), ["food", "adventure"]);
        assert_eq!(
            prefs.dates.and_then(|dates| dates.end).as_deref(),
            Some("2026-05-07")
        );
    }

    #[test]
    fn accepts_explicit_nulls() {
        let prefs: ParsedPreferences =
            decode_structured(&json!({ "budgetUsd": null, "durationDays": null, "dates": null }))
                .unwrap();
        assert_eq!(prefs.budget_usd, None);
    }

    #[test]
    fn rejects_non_numeric_budget() {
        let err = decode_structured::<ParsedPreferences>(&json!({ "budgetUsd": "lots" }))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(err.to_string().contains("budgetUsd"));
    }

    #[test]
    fn blank_month_reads_as_unknown() {
        let prefs = ParsedPreferences {
            month: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(prefs.month(), None);
    }
}
