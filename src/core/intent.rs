use regex::RegexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// What the latest user message is asking about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpMode {
    #[default]
    None,
    Climate,
    Costs,
    Flights,
    Hotels,
    Highlights,
    Tips,
    Fun,
    Food,
}

/// Checked in order; the first matching pattern decides the mode.
/// Flights comes before costs so "flight prices" stays a flights question.
const PATTERNS: [(FollowUpMode, &str); 8] = [
    (FollowUpMode::Climate, r"climate|weather|temperature"),
    (FollowUpMode::Flights, r"flight|airfare|plane|airline"),
    (FollowUpMode::Costs, r"cost|price|budget|how much|estimate"),
    (FollowUpMode::Hotels, r"hotel|stay|accommodation"),
    (
        FollowUpMode::Highlights,
        r"highlight|what to do|things to do|must[- ]see|attraction|activities",
    ),
    (FollowUpMode::Tips, r"tip|advice|insight|etiquette|safety"),
    (FollowUpMode::Fun, r"fun|lively|vibe|party"),
    (
        FollowUpMode::Food,
        r"best food|food scene|cuisine|restaurants?|dining|eat",
    ),
];

fn pattern_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(PATTERNS.iter().map(|(_, pattern)| *pattern))
            .unwrap_or_else(|err| panic!("invalid follow-up pattern: {err}"))
    })
}

impl FollowUpMode {
    pub const ALL: [FollowUpMode; 9] = [
        FollowUpMode::None,
        FollowUpMode::Climate,
        FollowUpMode::Costs,
        FollowUpMode::Flights,
        FollowUpMode::Hotels,
        FollowUpMode::Highlights,
        FollowUpMode::Tips,
        FollowUpMode::Fun,
        FollowUpMode::Food,
    ];

    /// Classify a user message. Absent or empty text is `None`.
    pub fn classify(message: Option<&str>) -> Self {
        let Some(text) = message.filter(|text| !text.trim().is_empty()) else {
            return FollowUpMode::None;
        };
        let text = text.to_lowercase();
        pattern_set()
            .matches(&text)
            .iter()
            .next()
            .map(|index| PATTERNS[index].0)
            .unwrap_or(FollowUpMode::None)
    }

    /// One-line task instruction for the model.
    pub fn task(self) -> &'static str {
        match self {
            FollowUpMode::None => "Return well-rounded recommendations.",
            FollowUpMode::Climate => "Return concise climate summary per destination only.",
            FollowUpMode::Costs => "Return concise total cost estimate per destination only.",
            FollowUpMode::Flights => "Return concise flight price per destination only.",
            FollowUpMode::Hotels => {
                "Return 1-2 concise hotel suggestions (name + pricePerNight) per destination only."
            }
            FollowUpMode::Highlights => {
                "Return 2-3 concise activity highlights per destination only."
            }
            FollowUpMode::Tips => "Return 2-3 concise travel/cultural tips per destination only.",
            FollowUpMode::Fun => "Return concise fun rating per destination only (0-100).",
            FollowUpMode::Food => "Return concise food rating per destination only (0-100).",
        }
    }

    pub fn is_follow_up(self) -> bool {
        self != FollowUpMode::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FollowUpMode::None => "none",
            FollowUpMode::Climate => "climate",
            FollowUpMode::Costs => "costs",
            FollowUpMode::Flights => "flights",
            FollowUpMode::Hotels => "hotels",
            FollowUpMode::Highlights => "highlights",
            FollowUpMode::Tips => "tips",
            FollowUpMode::Fun => "fun",
            FollowUpMode::Food => "food",
        }
    }
}

impl fmt::Display for FollowUpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
