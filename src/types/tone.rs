use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::warn;

/// Phrasing style for generated text. Never affects facts or schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tone {
    #[default]
    Surfer,
    Friendly,
    Formal,
    Concise,
    Enthusiastic,
    Luxury,
    Adventure,
    #[serde(rename = "90s-daria")]
    Daria,
    HankHill,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTone(pub String);

impl fmt::Display for UnknownTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown tone `{}` (expected one of: {})",
            self.0,
            Tone::ALL
                .iter()
                .map(|tone| tone.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownTone {}

impl Tone {
    pub const ALL: [Tone; 9] = [
        Tone::Surfer,
        Tone::Friendly,
        Tone::Formal,
        Tone::Concise,
        Tone::Enthusiastic,
        Tone::Luxury,
        Tone::Adventure,
        Tone::Daria,
        Tone::HankHill,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Surfer => "surfer",
            Tone::Friendly => "friendly",
            Tone::Formal => "formal",
            Tone::Concise => "concise",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Luxury => "luxury",
            Tone::Adventure => "adventure",
            Tone::Daria => "90s-daria",
            Tone::HankHill => "hank-hill",
        }
    }

    /// Resolve a request's tone, falling back to the default for blank or unknown values.
    pub fn resolve(raw: Option<&str>) -> Tone {
        match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => Tone::default(),
            Some(raw) => raw.parse::<Tone>().unwrap_or_else(|err: UnknownTone| {
                warn!(target: "voyage::recommend", "{err}; using `{}`", Tone::default());
                Tone::default()
            }),
        }
    }

    /// Style instruction appended to the system prompt.
    pub fn directive(self) -> &'static str {
        match self {
            Tone::Surfer => "Write like a laid-back surfer: relaxed, upbeat, a little slang (stoked, gnarly, chill), never sloppy.",
            Tone::Friendly => "Write in a warm, friendly, conversational voice.",
            Tone::Formal => "Write in a formal, polished register without slang or exclamation marks.",
            Tone::Concise => "Be as brief as possible: short fragments, no filler, no pleasantries.",
            Tone::Enthusiastic => "Write with high energy and genuine excitement, but keep it readable.",
            Tone::Luxury => "Write like a luxury travel editorial: refined, evocative, understated.",
            Tone::Adventure => "Write like a seasoned adventure guide: practical, bold, outdoors-minded.",
            Tone::Daria => "Write with dry, deadpan 90s Daria-style sarcasm while staying helpful.",
            Tone::HankHill => "Write like Hank Hill: plainspoken, earnest Texan common sense, the occasional 'I tell you what'.",
        }
    }

    /// Opening phrase for the personalized recap line.
    pub(crate) fn recap_lead(self) -> &'static str {
        match self {
            Tone::Surfer => "Stoked! Here's the vibe I'm riding with:",
            Tone::Friendly => "Here's what I've got from you so far:",
            Tone::Formal => "Based on your stated preferences:",
            Tone::Concise => "Prefs:",
            Tone::Enthusiastic => "Love it! Planning around:",
            Tone::Luxury => "Curated around your wishes:",
            Tone::Adventure => "Mission brief:",
            Tone::Daria => "So, apparently you want:",
            Tone::HankHill => "Alright, here's the plan, I tell you what:",
        }
    }
}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_lowercase().replace([' ', '_'], "-");
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str() == normalized)
            .or(match normalized.as_str() {
                "daria" => Some(Tone::Daria),
                "hank" => Some(Tone::HankHill),
                _ => None,
            })
            .ok_or_else(|| UnknownTone(raw.to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_vocabulary_entry() {
        for tone in Tone::ALL {
            assert_eq!(tone.as_str().parse::<Tone>(), Ok(tone));
        }
        assert_eq!("Hank Hill".parse::<Tone>(), Ok(Tone::HankHill));
        assert_eq!("90S_DARIA".parse::<Tone>(), Ok(Tone::Daria));
    }

    #[test]
    fn unknown_tone_is_rejected_by_parse_and_defaulted_by_resolve() {
        assert!("pirate".parse::<Tone>().is_err());
        assert_eq!(Tone::resolve(Some("pirate")), Tone::Surfer);
        assert_eq!(Tone::resolve(Some("  ")), Tone::Surfer);
        assert_eq!(Tone::resolve(None), Tone::Surfer);
        assert_eq!(Tone::resolve(Some("formal")), Tone::Formal);
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(Tone::Daria).unwrap(), "90s-daria");
        assert_eq!(serde_json::to_value(Tone::HankHill).unwrap(), "hank-hill");
    }
}
