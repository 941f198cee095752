//! Markdown views of a validated recommendation, one layout per follow-up mode.

use crate::core::intent::FollowUpMode;
use crate::types::{
    recommendation::clean_list, Destination, FactSheetEntry, Hotel, ParsedPreferences,
    Recommendation, Score, Tone,
};
use regex::Regex;
use reqwest::Url;
use std::sync::OnceLock;

const MAX_AGGREGATED_HIGHLIGHTS: usize = 15;
const MISSING: &str = "—";

/// Everything a markdown view may draw on besides the recommendation itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub mode: FollowUpMode,
    pub tone: Tone,
    pub preferences: &'a ParsedPreferences,
    pub facts: &'a [FactSheetEntry],
    pub latest_user_message: Option<&'a str>,
}

pub fn render_markdown(recommendation: &Recommendation, ctx: &RenderContext<'_>) -> String {
    match ctx.mode {
        FollowUpMode::Fun => ranked(
            recommendation,
            ctx.facts,
            "Most fun",
            |d| d.fun_score,
            |f| f.fun_score,
        ),
        FollowUpMode::Food => ranked(
            recommendation,
            ctx.facts,
            "Best food",
            |d| d.food_score,
            |f| f.food_score,
        ),
        FollowUpMode::Climate => bare_list(recommendation, |d| {
            d.weather_summary.clone().unwrap_or_else(|| MISSING.to_string())
        }),
        FollowUpMode::Costs => bare_list(recommendation, |d| {
            d.est_cost_usd
                .map(|cost| format!("est. total {}", format_usd(cost)))
                .unwrap_or_else(|| MISSING.to_string())
        }),
        FollowUpMode::Flights => bare_list(recommendation, |d| {
            d.flight_price_usd
                .map(|price| format!("round-trip flight ~{}", format_usd(price)))
                .unwrap_or_else(|| MISSING.to_string())
        }),
        FollowUpMode::Hotels => bare_list(recommendation, |d| {
            d.hotels
                .as_deref()
                .filter(|hotels| !hotels.is_empty())
                .map(hotel_list)
                .unwrap_or_else(|| MISSING.to_string())
        }),
        FollowUpMode::Highlights if asks_for_best(ctx.latest_user_message) => {
            aggregated_highlights(recommendation)
        }
        FollowUpMode::Highlights => bare_list(recommendation, |d| joined_or_missing(&d.highlights)),
        FollowUpMode::Tips => tips(recommendation),
        FollowUpMode::None => cards(recommendation, ctx),
    }
}

/// Whole dollars with thousands separators, e.g. `$1,580`.
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round().max(0.0) as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

fn asks_for_best(message: Option<&str>) -> bool {
    static BEST: OnceLock<Regex> = OnceLock::new();
    let best = BEST.get_or_init(|| {
        Regex::new(r"(?i)\b(best|top)\b")
            .unwrap_or_else(|err| panic!("invalid best/top pattern: {err}"))
    });
    message.is_some_and(|text| best.is_match(text))
}

fn joined_or_missing(items: &[String]) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        items.join(", ")
    }
}

fn hotel_list(hotels: &[Hotel]) -> String {
    hotels
        .iter()
        .map(|hotel| format!("{} ({}/night)", hotel.name, format_usd(hotel.price_per_night)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bare_list(recommendation: &Recommendation, line: impl Fn(&Destination) -> String) -> String {
    if recommendation.destinations.is_empty() {
        return "No matching destinations.".to_string();
    }
    recommendation
        .destinations
        .iter()
        .map(|destination| format!("- **{}**: {}", destination.label(), line(destination)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn ranked(
    recommendation: &Recommendation,
    facts: &[FactSheetEntry],
    title: &str,
    model_score: impl Fn(&Destination) -> Option<Score>,
    fact_score: impl Fn(&FactSheetEntry) -> Score,
) -> String {
    let mut rows: Vec<(String, Score, Option<&str>)> = if recommendation.destinations.is_empty() {
        facts
            .iter()
            .map(|entry| (entry.place.clone(), fact_score(entry), None))
            .collect()
    } else {
        recommendation
            .destinations
            .iter()
            .filter_map(|destination| {
                let computed = facts
                    .iter()
                    .find(|entry| entry.matches(&destination.name))
                    .map(&fact_score);
                let score = computed.or_else(|| model_score(destination))?;
                Some((destination.label(), score, destination.why.as_deref()))
            })
            .collect()
    };

    if rows.is_empty() {
        return format!("**{title}** (0-100)\n\nNo scores available.");
    }

    rows.sort_by(|a, b| b.1.cmp(&a.1));
    let lines: Vec<String> = rows
        .iter()
        .enumerate()
        .map(|(index, (label, score, why))| match why {
            Some(why) if !why.trim().is_empty() => {
                format!("{}. **{}**: {}/100 - {}", index + 1, label, score, why.trim())
            }
            _ => format!("{}. **{}**: {}/100", index + 1, label, score),
        })
        .collect();

    format!("**{title}** (0-100)\n\n{}", lines.join("\n"))
}

fn aggregated_highlights(recommendation: &Recommendation) -> String {
    let all: Vec<String> = recommendation
        .destinations
        .iter()
        .flat_map(|destination| destination.highlights.iter().cloned())
        .collect();
    let unique = clean_list(all);
    if unique.is_empty() {
        return "No highlights available.".to_string();
    }
    unique
        .into_iter()
        .take(MAX_AGGREGATED_HIGHLIGHTS)
        .map(|highlight| format!("- {highlight}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn tips(recommendation: &Recommendation) -> String {
    let mut lines: Vec<String> = recommendation
        .destinations
        .iter()
        .filter_map(|destination| {
            let insights = destination.cultural_insights.as_deref()?;
            (!insights.is_empty())
                .then(|| format!("- **{}**: {}", destination.label(), insights.join("; ")))
        })
        .collect();
    lines.extend(
        recommendation
            .tips
            .iter()
            .flatten()
            .map(|tip| format!("- {tip}")),
    );
    if lines.is_empty() {
        "No tips available.".to_string()
    } else {
        lines.join("\n")
    }
}

/// One-line summary of what the user asked for, phrased per tone.
pub fn recap_line(preferences: &ParsedPreferences, tone: Tone) -> Option<String> {
    let mut parts = Vec::new();
    match (
        preferences.destination_type.as_deref(),
        preferences.region.as_deref(),
    ) {
        (Some(kind), Some(region)) => parts.push(format!("{kind} in {region}")),
        (Some(kind), None) => parts.push(format!("{kind} trip")),
        (None, Some(region)) => parts.push(region.to_string()),
        (None, None) => {}
    }
    if let Some(month) = preferences.month() {
        parts.push(month.to_string());
    }
    if let Some(days) = preferences.duration_days {
        parts.push(format!("{} days", days.round() as i64));
    }
    if let Some(budget) = preferences.budget_usd {
        parts.push(format!("about {} budget", format_usd(budget)));
    }
    if !preferences.activities().is_empty() {
        parts.push(preferences.activities().join(", "));
    }

    (!parts.is_empty()).then(|| format!("{} {}.", tone.recap_lead(), parts.join(", ")))
}

fn cards(recommendation: &Recommendation, ctx: &RenderContext<'_>) -> String {
    let mut sections = Vec::new();
    if let Some(recap) = recap_line(ctx.preferences, ctx.tone) {
        sections.push(format!("_{recap}_\n"));
    }

    if recommendation.destinations.is_empty() {
        sections.push("No destinations matched your preferences yet.".to_string());
    } else {
        sections.push("**Top picks** (based on your prefs):".to_string());
    }

    for destination in &recommendation.destinations {
        let mut card = vec![
            format!("\n### {}", destination.label()),
            format!(
                "- **Why**: {}",
                destination
                    .why
                    .as_deref()
                    .unwrap_or("Great fit for your stated interests and weather prefs.")
            ),
            format!(
                "- **Weather**: {}",
                destination.weather_summary.as_deref().unwrap_or(MISSING)
            ),
            format!(
                "- **Est. total**: {}",
                destination
                    .est_cost_usd
                    .map(format_usd)
                    .unwrap_or_else(|| MISSING.to_string())
            ),
        ];
        if let Some(flight) = destination.flight_price_usd {
            card.push(format!("- **Flight**: {}", format_usd(flight)));
        }
        if let Some(hotels) = destination.hotels.as_deref().filter(|h| !h.is_empty()) {
            card.push(format!("- **Hotels**: {}", hotel_list(hotels)));
        }
        card.push(format!(
            "- **Highlights**: {}",
            joined_or_missing(&destination.highlights)
        ));
        if let (Some(fun), Some(food)) = (destination.fun_score, destination.food_score) {
            card.push(format!("- **Fun / Food**: {fun} / {food}"));
        }
        if let Some(month) = destination
            .best_month
            .as_deref()
            .or(destination.best_time_to_visit.as_deref())
        {
            card.push(format!("- **Best time**: {month}"));
        }
        sections.push(card.join("\n"));
    }

    if let Some(tips) = recommendation.tips.as_deref().filter(|t| !t.is_empty()) {
        sections.push(format!("\n**Tips**\n- {}", tips.join("\n- ")));
    }

    sections.join("\n")
}

fn link(base: &str, params: &[(&str, &str)]) -> Option<String> {
    Url::parse_with_params(base, params).ok().map(String::from)
}

/// Recap, an image reference and search links sent ahead of streamed text.
pub fn stream_prelude(
    preferences: &ParsedPreferences,
    tone: Tone,
    first: Option<&FactSheetEntry>,
) -> String {
    let mut out = String::new();
    if let Some(recap) = recap_line(preferences, tone) {
        out.push_str(&format!("_{recap}_\n\n"));
    }
    let Some(entry) = first else {
        return out;
    };

    let image_query = format!("{},{},travel", entry.name, entry.country);
    if let Some(image) = link("https://source.unsplash.com/featured/", &[("q", image_query.as_str())]) {
        out.push_str(&format!("![{}]({})\n\n", entry.place, image));
    }

    let flights_query = format!("Flights to {}", entry.place);
    let things_query = format!("things to do in {}", entry.place);
    let links: Vec<String> = [
        (
            "Flights",
            link("https://www.google.com/travel/flights", &[("q", flights_query.as_str())]),
        ),
        (
            "Hotels",
            link(
                "https://www.booking.com/searchresults.html",
                &[("ss", entry.place.as_str())],
            ),
        ),
        (
            "Things to do",
            link("https://www.tripadvisor.com/Search", &[("q", things_query.as_str())]),
        ),
    ]
    .into_iter()
    .filter_map(|(label, url)| url.map(|url| format!("[{label}]({url})")))
    .collect();

    if !links.is_empty() {
        out.push_str(&format!("**Plan {}**: {}\n\n", entry.name, links.join(" · ")));
    }
    out
}
