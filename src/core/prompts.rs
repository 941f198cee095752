//! Prompt text for preference extraction and recommendation generation.

use crate::core::intent::FollowUpMode;
use crate::error::Result;
use crate::types::{FactSheetEntry, ParsedPreferences, Tone};

pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You extract structured travel preferences from a short user message.
Earlier turns may be included; use them only to resolve references in the newest message.
Return ONLY JSON matching this schema:
{
  "region": string | undefined,
  "destinationType": string | undefined,
  "budgetUsd": number | null | undefined,
  "durationDays": number | null | undefined,
  "month": string | undefined,
  "dates": { "start"?: string, "end"?: string } | undefined,
  "activities": string[] | undefined,
  "weather": string | undefined
}
Rules:
- budget can be parsed from phrases like 'under $2000'
- month: map relative like 'next month' to a month name if possible, else keep original phrase
- activities: split by commas/and phrases (adventure, food, hiking, museums, nightlife, beach, etc.)
- leave a field out when the user has not mentioned it"#;

const RECOMMEND_JSON_CONTRACT: &str = r#"You are a knowledgeable travel recommender. Use provided facts; avoid fabrication.
Output JSON ONLY with this schema:
{
  "destinations": [
    {
      "name": string,
      "country": string,
      "bestMonth"?: string,
      "bestTimeToVisit"?: string,
      "estCostUsd"?: number,
      "flightPriceUsd"?: number,
      "weatherSummary"?: string,
      "highlights": string[],
      "funScore"?: number,
      "foodScore"?: number,
      "hotels"?: [{ "name": string, "pricePerNight": number, "rating"?: number, "type"?: string }],
      "culturalInsights"?: string[],
      "why"?: string
    }
  ],
  "tips"?: string[]
}
Only recommend destinations listed in the facts and copy their numbers unchanged."#;

const RECOMMEND_MARKDOWN_CONTRACT: &str = "You are a knowledgeable travel recommender. Respond in concise Markdown only (no JSON). \
Use provided facts; avoid fabrication. Only discuss destinations listed in the facts and quote their numbers unchanged.";

/// Narrows the answer to what the follow-up asked for.
pub fn mode_directive(mode: FollowUpMode) -> &'static str {
    match mode {
        FollowUpMode::None => {
            "Give well-rounded picks: why each fits, weather, total cost, flight price, hotels, highlights and best month."
        }
        FollowUpMode::Climate => {
            "Reply minimally with weatherSummary plus a one-sentence appeal per destination; avoid flights/costs/hotels/tips."
        }
        FollowUpMode::Costs => {
            "Reply minimally with estCostUsd per destination; avoid weather/hotels/highlights/tips."
        }
        FollowUpMode::Flights => {
            "Reply minimally with flightPriceUsd per destination; avoid weather/hotels/highlights/tips."
        }
        FollowUpMode::Hotels => {
            "Reply minimally with 1-2 hotels (name, pricePerNight) per destination taken from the facts; avoid flights/costs/tips."
        }
        FollowUpMode::Highlights => {
            "Reply minimally with 2-3 highlights per destination; avoid flights/costs/hotels."
        }
        FollowUpMode::Tips => {
            "Reply minimally with 2-3 culturalInsights per destination and optional general tips; avoid flights/costs/hotels."
        }
        FollowUpMode::Fun => {
            "Reply minimally with funScore (0-100) per destination copied from the facts plus a short reason; avoid other fields."
        }
        FollowUpMode::Food => {
            "Reply minimally with foodScore (0-100) per destination copied from the facts plus a short reason; avoid other fields."
        }
    }
}

fn tone_directive(tone: Tone) -> String {
    format!(
        "Tone: {} Tone changes phrasing only, never facts, numbers or output shape.",
        tone.directive()
    )
}

/// System prompt for the JSON (batch) recommendation call.
pub fn recommend_system_prompt(mode: FollowUpMode, tone: Tone) -> String {
    [
        RECOMMEND_JSON_CONTRACT,
        mode_directive(mode),
        tone_directive(tone).as_str(),
    ]
    .join("\n\n")
}

/// System prompt for the markdown (streaming) recommendation call.
pub fn stream_system_prompt(mode: FollowUpMode, tone: Tone) -> String {
    [
        RECOMMEND_MARKDOWN_CONTRACT,
        mode_directive(mode),
        tone_directive(tone).as_str(),
    ]
    .join("\n\n")
}

/// `#N place | flightUSD=X | totalCostUSD=Y | weather='Z' | fun=F | food=D | hotels=JSON`
pub fn fact_line(position: usize, entry: &FactSheetEntry) -> Result<String> {
    Ok(format!(
        "#{} {} | flightUSD={} | totalCostUSD={} | weather='{}' | fun={} | food={} | hotels={}",
        position,
        entry.place,
        entry.flight_price_usd,
        entry.est_cost_usd,
        entry.weather_summary,
        entry.fun_score,
        entry.food_score,
        serde_json::to_string(&entry.hotels)?
    ))
}

/// User message carrying preferences, one fact line per candidate and the task.
pub fn recommend_user_message(
    preferences: &ParsedPreferences,
    facts: &[FactSheetEntry],
    mode: FollowUpMode,
) -> Result<String> {
    let lines = facts
        .iter()
        .enumerate()
        .map(|(index, entry)| fact_line(index + 1, entry))
        .collect::<Result<Vec<_>>>()?;

    Ok(format!(
        "User preferences: {}\n\nFacts to include exactly as given (do not alter numbers):\n{}\n\nTask: {}",
        serde_json::to_string(preferences)?,
        lines.join("\n"),
        mode.task()
    ))
}
