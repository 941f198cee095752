use crate::types::{Candidate, ParsedPreferences};

const MAX_CANDIDATES: usize = 3;

/// Destinations the recommender knows about, in preference order.
pub const CANDIDATE_POOL: [Candidate; 4] = [
    Candidate {
        name: "Lisbon",
        country: "Portugal",
        kind: "city+beach",
    },
    Candidate {
        name: "Canary Islands",
        country: "Spain",
        kind: "beach",
    },
    Candidate {
        name: "Crete",
        country: "Greece",
        kind: "beach+adventure",
    },
    Candidate {
        name: "Nice",
        country: "France",
        kind: "city+beach",
    },
];

fn lowered(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

fn region_admits(region: &str, candidate: &Candidate) -> bool {
    region.is_empty()
        || ["europe", "eu"].iter().any(|r| region.contains(r))
        || region.contains(&candidate.country.to_lowercase())
        || region.contains(&candidate.name.to_lowercase())
}

/// Up to three pool entries compatible with the destination type and region.
pub fn select_candidates(preferences: &ParsedPreferences) -> Vec<Candidate> {
    let kind = lowered(preferences.destination_type.as_deref());
    let region = lowered(preferences.region.as_deref());

    CANDIDATE_POOL
        .iter()
        .filter(|candidate| kind.is_empty() || candidate.kind.contains(&kind))
        .filter(|candidate| region_admits(&region, candidate))
        .take(MAX_CANDIDATES)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(preferences: &ParsedPreferences) -> Vec<&'static str> {
        select_candidates(preferences)
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[test]
    fn europe_beach_returns_first_three_in_pool_order() {
        let preferences = ParsedPreferences {
            region: Some("Europe".to_string()),
            destination_type: Some("beach".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&preferences), ["Lisbon", "Canary Islands", "Crete"]);
    }

    #[test]
    fn region_matches_country_or_name() {
        let france = ParsedPreferences {
            region: Some("southern France".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&france), ["Nice"]);

        let crete = ParsedPreferences {
            region: Some("crete".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&crete), ["Crete"]);
    }

    #[test]
    fn type_filter_uses_substring() {
        let city = ParsedPreferences {
            destination_type: Some("City".to_string()),
            ..Default::default()
        };
        assert_eq!(names(&city), ["Lisbon", "Nice"]);
    }

    #[test]
    fn nothing_matches_unknown_region() {
        let asia = ParsedPreferences {
            region: Some("Japan".to_string()),
            ..Default::default()
        };
        assert!(select_candidates(&asia).is_empty());
    }

    #[test]
    fn no_preferences_caps_at_three() {
        assert_eq!(select_candidates(&ParsedPreferences::default()).len(), 3);
    }
}
