use super::recommendation::{Hotel, Score};
use serde::{Deserialize, Serialize};

/// A catalog destination the recommender may suggest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub name: &'static str,
    pub country: &'static str,
    /// Destination types joined with `+`, e.g. `city+beach`.
    pub kind: &'static str,
}

impl Candidate {
    /// "Name, Country"
    pub fn place(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Deterministic facts about one candidate destination.
///
/// These values are authoritative: prompts tell the model not to change them
/// and rendered views read scores and prices from here, not from model text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactSheetEntry {
    pub name: String,
    pub country: String,
    /// "Name, Country"
    pub place: String,
    pub weather_summary: String,
    pub flight_price_usd: u32,
    pub est_cost_usd: u32,
    pub hotels: Vec<Hotel>,
    pub fun_score: Score,
    pub food_score: Score,
}

impl FactSheetEntry {
    /// Whether a model-written destination name refers to this candidate.
    pub fn matches(&self, destination_name: &str) -> bool {
        let wanted = destination_name.trim().to_lowercase();
        if wanted.is_empty() {
            return false;
        }
        let name = self.name.to_lowercase();
        wanted == name || wanted == self.place.to_lowercase() || wanted.starts_with(&name)
    }
}
