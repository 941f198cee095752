//! Heuristic fun and food ratings derived from weather text, activities and lodging.

use crate::types::{Hotel, Score};
use regex::Regex;
use std::sync::OnceLock;

const BASELINE: i32 = 70;
const UPSCALE_NIGHTLY_USD: f64 = 250.0;

struct Cues {
    warm: Regex,
    dry: Regex,
    wet: Regex,
    nightlife: Regex,
    beach: Regex,
    outdoors: Regex,
    food: Regex,
    fine_dining: Regex,
}

fn cues() -> &'static Cues {
    static CUES: OnceLock<Cues> = OnceLock::new();
    CUES.get_or_init(|| {
        let re = |pattern: &str| {
            Regex::new(pattern)
                .unwrap_or_else(|err| panic!("invalid score pattern {pattern}: {err}"))
        };
        Cues {
            warm: re(r"(?i)warm|sunny|breeze|pleasant"),
            dry: re(r"(?i)dry|low rain"),
            wet: re(r"(?i)rain|cold|cool"),
            nightlife: re(r"(?i)nightlife|party|bars|music"),
            beach: re(r"(?i)beach|swim|sun"),
            outdoors: re(r"(?i)hiking|adventure|boat|sailing"),
            food: re(r"(?i)food|cuisine|dining|restaurant|eat|gastronomy|culinary"),
            fine_dining: re(r"(?i)fine[- ]dining|michelin|tasting"),
        }
    })
}

fn any_matches(re: &Regex, activities: &[String]) -> bool {
    activities.iter().any(|activity| re.is_match(activity))
}

fn has_upscale_hotel(hotels: &[Hotel]) -> bool {
    hotels
        .iter()
        .any(|hotel| hotel.price_per_night > UPSCALE_NIGHTLY_USD)
}

fn bounded(score: i32) -> Score {
    Score::from_raw(f64::from(score))
}

pub fn fun_score(weather_summary: &str, activities: &[String], hotels: &[Hotel]) -> Score {
    let cues = cues();
    let mut score = BASELINE;

    if cues.warm.is_match(weather_summary) {
        score += 8;
    }
    if cues.dry.is_match(weather_summary) {
        score += 5;
    }
    if cues.wet.is_match(weather_summary) {
        score -= 6;
    }
    if any_matches(&cues.nightlife, activities) {
        score += 8;
    }
    if any_matches(&cues.beach, activities) {
        score += 6;
    }
    if any_matches(&cues.outdoors, activities) {
        score += 4;
    }
    if has_upscale_hotel(hotels) {
        score += 2;
    }

    bounded(score)
}

pub fn food_score(activities: &[String], hotels: &[Hotel]) -> Score {
    let cues = cues();
    let mut score = BASELINE;

    if any_matches(&cues.food, activities) {
        score += 10;
    }
    if any_matches(&cues.fine_dining, activities) {
        score += 6;
    }
    if has_upscale_hotel(hotels) {
        score += 2;
    }

    bounded(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activities(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn hotel(price: f64) -> Hotel {
        Hotel {
            name: "Test".to_string(),
            price_per_night: price,
            rating: None,
            kind: None,
        }
    }

    #[test]
    fn fallback_weather_nets_out_warm_dry_and_rain_cues() {
        let weather = "Typically mild to warm in July; expect 65–80°F, low rain.";
        assert_eq!(fun_score(weather, &[], &[]).value(), 70 + 8 + 5 - 6);
    }

    #[test]
    fn fun_rewards_nightlife_beach_outdoors_and_upscale_lodging() {
        let score = fun_score(
            "Sunny and dry",
            &activities(&["Nightlife", "beach days", "sailing"]),
            &[hotel(300.0)],
        );
        assert_eq!(score.value(), 70 + 8 + 5 + 8 + 6 + 4 + 2);
    }

    #[test]
    fn fun_penalizes_cold_rain() {
        assert_eq!(fun_score("Cold with rain", &[], &[]).value(), 64);
    }

    #[test]
    fn food_rewards_food_activities_and_fine_dining() {
        assert_eq!(food_score(&activities(&["hiking"]), &[]).value(), 70);
        assert_eq!(food_score(&activities(&["food", "hiking"]), &[]).value(), 80);
        assert_eq!(
            food_score(&activities(&["michelin tasting menus"]), &[hotel(260.0)]).value(),
            70 + 6 + 2
        );
        assert_eq!(
            food_score(&activities(&["fine dining"]), &[hotel(100.0)]).value(),
            70 + 10 + 6
        );
    }

    #[test]
    fn scores_never_leave_range() {
        let all = activities(&["party", "beach", "hiking", "food", "michelin"]);
        let fun = fun_score("warm sunny dry breeze", &all, &[hotel(900.0)]);
        let food = food_score(&all, &[hotel(900.0)]);
        assert!(fun.value() <= 100);
        assert!(food.value() <= 100);
    }
}
