use crate::completion_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Model-written recommendation set for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[completion_schema]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Recommended destinations, best fit first
    #[serde(default)]
    pub destinations: Vec<Destination>,
    /// General travel tips that apply to every destination
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_time_to_visit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_cost_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_price_usd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_summary: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub fun_score: Option<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<f64>")]
    pub food_score: Option<Score>,
    #[serde(
        default,
        deserialize_with = "well_formed_hotels",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Vec<Value>>")]
    pub hotels: Option<Vec<Hotel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    pub price_per_night: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// A 0-100 rating. Any JSON number is accepted and clamped, then rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub fn from_raw(raw: f64) -> Self {
        Self(raw.clamp(0.0, 100.0).round() as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Score::from_raw)
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Keeps only entries with a string `name` and a numeric `pricePerNight`.
fn well_formed_hotels<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Hotel>>, D::Error> {
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw.map(|items| items.iter().filter_map(hotel_from_value).collect()))
}

fn hotel_from_value(value: &Value) -> Option<Hotel> {
    let name = value.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(Hotel {
        name: name.to_string(),
        price_per_night: value.get("pricePerNight")?.as_f64()?,
        rating: value.get("rating").and_then(Value::as_f64),
        kind: value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

impl Recommendation {
    /// Tidy model-written text fields in place.
    ///
    /// Scores and hotels are already clamped and filtered while deserializing.
    pub fn normalize(&mut self) {
        for destination in &mut self.destinations {
            destination.normalize();
        }
        if let Some(tips) = self.tips.take() {
            self.tips = Some(clean_list(tips));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty() && self.tips.as_ref().map_or(true, Vec::is_empty)
    }
}

impl Destination {
    pub fn normalize(&mut self) {
        self.name = self.name.trim().to_string();
        self.highlights = clean_list(std::mem::take(&mut self.highlights));
        if let Some(insights) = self.cultural_insights.take() {
            self.cultural_insights = Some(clean_list(insights));
        }
    }

    /// "Name, Country", or just the name when the country is unknown.
    pub fn label(&self) -> String {
        match self.country.as_deref().map(str::trim) {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Trim entries, drop blanks and keep the first occurrence of each (case-insensitive).
pub(crate) fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::decode_structured;
    use serde_json::json;

    #[test]
    fn validates_typical_shape() {
        let rec: Recommendation = decode_structured(&json!({
            "destinations": [
                { "name": "Lisbon", "country": "Portugal", "estCostUsd": 1500, "weatherSummary": "Sunny", "highlights": ["food", "beaches"] },
                { "name": "Crete", "country": "Greece", "estCostUsd": 1700, "weatherSummary": "Warm", "highlights": ["hikes"] }
            ],
            "tips": ["Pack light"]
        }))
        .unwrap();

        assert_eq!(rec.destinations.len(), 2);
        assert_eq!(rec.destinations[0].label(), "Lisbon, Portugal");
    }

    #[test]
    fn defaults_missing_collections() {
        let rec: Recommendation =
            decode_structured(&json!({ "destinations": [{ "name": "Nice" }] })).unwrap();
        assert!(rec.destinations[0].highlights.is_empty());
        assert!(rec.tips.is_none());

        let empty: Recommendation = decode_structured(&json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn rejects_destination_without_name() {
        let err = decode_structured::<Recommendation>(&json!({
            "destinations": [{ "country": "Spain" }]
        }))
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn scores_are_clamped_and_rounded() {
        let rec: Recommendation = decode_structured(&json!({
            "destinations": [
                { "name": "A", "funScore": -12.5, "foodScore": 140 },
                { "name": "B", "funScore": 72.6, "foodScore": 0.4 }
            ]
        }))
        .unwrap();

        let scores: Vec<_> = rec
            .destinations
            .iter()
            .map(|d| (d.fun_score.unwrap().value(), d.food_score.unwrap().value()))
            .collect();
        assert_eq!(scores, vec![(0, 100), (73, 0)]);
        assert_eq!(serde_json::to_value(&rec).unwrap()["destinations"][1]["funScore"], 73);
    }

    #[test]
    fn malformed_hotels_are_filtered() {
        let rec: Recommendation = decode_structured(&json!({
            "destinations": [{
                "name": "Lisbon",
                "hotels": [
                    { "name": "Casa Alfama", "pricePerNight": 120, "rating": 4.5, "type": "guesthouse" },
                    { "name": "No Price" },
                    { "pricePerNight": 90 },
                    { "name": "Stringly", "pricePerNight": "200" },
                    "just a string"
                ]
            }]
        }))
        .unwrap();

        let hotels = rec.destinations[0].hotels.as_ref().unwrap();
        assert_eq!(hotels.len(), 1);
        assert_eq!(hotels[0].name, "Casa Alfama");
        assert_eq!(hotels[0].kind.as_deref(), Some("guesthouse"));
    }

    #[test]
    fn normalize_dedupes_and_trims_highlights() {
        let mut rec = Recommendation {
            destinations: vec![Destination {
                name: " Crete ".to_string(),
                highlights: vec![
                    "  Samaria Gorge ".to_string(),
                    "samaria gorge".to_string(),
                    "   ".to_string(),
                    "Knossos".to_string(),
                    "Knossos".to_string(),
                ],
                cultural_insights: Some(vec!["".to_string(), "Greet with kalimera".to_string()]),
                ..Default::default()
            }],
            tips: Some(vec![" Pack light ".to_string(), String::new()]),
        };

        rec.normalize();

        let crete = &rec.destinations[0];
        assert_eq!(crete.name, "Crete");
        assert_eq!(crete.highlights, vec!["Samaria Gorge", "Knossos"]);
        assert_eq!(
            crete.cultural_insights.as_deref(),
            Some(&["Greet with kalimera".to_string()][..])
        );
        assert_eq!(rec.tips, Some(vec!["Pack light".to_string()]));
    }
}
