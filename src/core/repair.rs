use crate::core::intent::FollowUpMode;
use crate::error::{Result, TravelError};
use crate::schemas::{decode_structured, parse_model_object};
use crate::types::{FactSheetEntry, Recommendation};
use serde_json::Value;

/// Shape the model output must have for a follow-up mode.
///
/// Every variant is the base recommendation shape; some add a content check
/// that only applies when the model returned destinations at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSchema {
    Base,
    RequiresFunScore,
    RequiresFoodScore,
}

impl ModeSchema {
    pub fn for_mode(mode: FollowUpMode) -> Self {
        match mode {
            FollowUpMode::Fun => ModeSchema::RequiresFunScore,
            FollowUpMode::Food => ModeSchema::RequiresFoodScore,
            FollowUpMode::None
            | FollowUpMode::Climate
            | FollowUpMode::Costs
            | FollowUpMode::Flights
            | FollowUpMode::Hotels
            | FollowUpMode::Highlights
            | FollowUpMode::Tips => ModeSchema::Base,
        }
    }

    pub fn check(self, recommendation: &Recommendation) -> Result<()> {
        let destinations = &recommendation.destinations;
        if destinations.is_empty() {
            return Ok(());
        }
        let (satisfied, field) = match self {
            ModeSchema::Base => return Ok(()),
            ModeSchema::RequiresFunScore => {
                (destinations.iter().any(|d| d.fun_score.is_some()), "funScore")
            }
            ModeSchema::RequiresFoodScore => (
                destinations.iter().any(|d| d.food_score.is_some()),
                "foodScore",
            ),
        };
        if satisfied {
            Ok(())
        } else {
            Err(TravelError::Validation(format!(
                "at least one destination should include {field}"
            )))
        }
    }
}

/// Parse, validate and normalize model text for the given mode.
pub fn recommendation_from_model_text(text: &str, mode: FollowUpMode) -> Result<Recommendation> {
    let raw = parse_model_object(text)?;
    let mut recommendation: Recommendation = decode_structured(&Value::Object(raw))?;
    ModeSchema::for_mode(mode).check(&recommendation)?;
    recommendation.normalize();
    Ok(recommendation)
}

/// Overwrite model-written numbers with computed facts for matching destinations.
///
/// Scores, trip cost and flight price always come from the fact sheet; weather,
/// hotels and country are filled only where the model left them out.
pub fn reconcile_with_facts(recommendation: &mut Recommendation, facts: &[FactSheetEntry]) {
    for destination in &mut recommendation.destinations {
        let Some(entry) = facts
            .iter()
            .find(|entry| entry.matches(&destination.name) || entry.matches(&destination.label()))
        else {
            continue;
        };

        destination.fun_score = Some(entry.fun_score);
        destination.food_score = Some(entry.food_score);
        destination.est_cost_usd = Some(f64::from(entry.est_cost_usd));
        destination.flight_price_usd = Some(f64::from(entry.flight_price_usd));

        if destination.country.as_deref().map_or(true, |c| c.trim().is_empty()) {
            destination.country = Some(entry.country.clone());
        }
        if destination
            .weather_summary
            .as_deref()
            .map_or(true, |w| w.trim().is_empty())
        {
            destination.weather_summary = Some(entry.weather_summary.clone());
        }
        if destination.hotels.as_ref().map_or(true, Vec::is_empty) && !entry.hotels.is_empty() {
            destination.hotels = Some(entry.hotels.clone());
        }
    }
}

/// User-visible explanation when the model output could not be used.
pub fn degraded_markdown(error: &TravelError) -> String {
    format!(
        "**Sorry, I couldn't put together recommendations this time.**\n\n\
         The travel model returned a response I couldn't read ({}: {}).\n\n\
         Please try again, or rephrase what you're looking for.",
        error.error_code(),
        error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Destination, Hotel, Score};

    fn entry(name: &str, country: &str) -> FactSheetEntry {
        FactSheetEntry {
            name: name.to_string(),
            country: country.to_string(),
            place: format!("{name}, {country}"),
            weather_summary: "Warm and dry".to_string(),
            flight_price_usd: 980,
            est_cost_usd: 1580,
            hotels: vec![Hotel {
                name: "Harbour rooms".to_string(),
                price_per_night: 130.0,
                rating: None,
                kind: None,
            }],
            fun_score: Score::from_raw(88.0),
            food_score: Score::from_raw(76.0),
        }
    }

    #[test]
    fn fun_mode_requires_a_fun_score_when_destinations_exist() {
        let err = recommendation_from_model_text(
            r#"{"destinations":[{"name":"Crete"}]}"#,
            FollowUpMode::Fun,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let ok = recommendation_from_model_text(
            r#"{"destinations":[{"name":"Crete"},{"name":"Nice","funScore":71}]}"#,
            FollowUpMode::Fun,
        );
        assert!(ok.is_ok());

        let empty = recommendation_from_model_text(r#"{"destinations":[]}"#, FollowUpMode::Food);
        assert!(empty.unwrap().is_empty());
    }

    #[test]
    fn base_modes_accept_missing_scores() {
        let rec = recommendation_from_model_text(
            "```json\n{\"destinations\":[{\"name\":\"Crete\",\"highlights\":[\" Knossos \",\"knossos\"]}]}\n```",
            FollowUpMode::Highlights,
        )
        .unwrap();
        assert_eq!(rec.destinations[0].highlights, vec!["Knossos"]);
    }

    #[test]
    fn unreadable_text_is_a_format_error() {
        let err = recommendation_from_model_text("sorry, no", FollowUpMode::None).unwrap_err();
        assert_eq!(err.error_code(), "UPSTREAM_FORMAT_ERROR");
        assert!(degraded_markdown(&err).contains("UPSTREAM_FORMAT_ERROR"));
    }

    #[test]
    fn reconcile_overwrites_numbers_and_fills_gaps() {
        let mut rec = Recommendation {
            destinations: vec![
                Destination {
                    name: "Crete".to_string(),
                    est_cost_usd: Some(99.0),
                    fun_score: Some(Score::from_raw(10.0)),
                    weather_summary: Some("Model weather".to_string()),
                    ..Default::default()
                },
                Destination {
                    name: "Atlantis".to_string(),
                    est_cost_usd: Some(5.0),
                    ..Default::default()
                },
            ],
            tips: None,
        };

        reconcile_with_facts(&mut rec, &[entry("Crete", "Greece")]);

        let crete = &rec.destinations[0];
        assert_eq!(crete.est_cost_usd, Some(1580.0));
        assert_eq!(crete.flight_price_usd, Some(980.0));
        assert_eq!(crete.fun_score.map(Score::value), Some(88));
        assert_eq!(crete.food_score.map(Score::value), Some(76));
        assert_eq!(crete.country.as_deref(), Some("Greece"));
        assert_eq!(crete.weather_summary.as_deref(), Some("Model weather"));
        assert_eq!(crete.hotels.as_ref().map(Vec::len), Some(1));

        let unknown = &rec.destinations[1];
        assert_eq!(unknown.est_cost_usd, Some(5.0));
        assert!(unknown.fun_score.is_none());
    }
}
