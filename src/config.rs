use crate::error::{Result, TravelError};
use crate::services::openai_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::types::Tone;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MIN_MISSING_GROUPS: u8 = 3;

/// Runtime settings, read from the environment (and `.env` via `dotenvy`).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    /// Open-Meteo compatible forecast URL; `None` uses seasonal fallback text
    pub weather_api_base: Option<String>,
    /// How many preference groups must be missing before asking a clarifying question (1..=3)
    pub min_missing_groups: u8,
    pub tone: Tone,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            weather_api_base: None,
            min_missing_groups: DEFAULT_MIN_MISSING_GROUPS,
            tone: Tone::default(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let api_key = value("OPENAI_API_KEY").ok_or_else(|| {
            TravelError::Config(
                "OPENAI_API_KEY environment variable must be set before creating a TravelAssistant"
                    .to_string(),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = value("OPENAI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = value("OPENAI_MODEL") {
            config.model = model;
        }
        if let Some(raw) = value("VOYAGE_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                TravelError::Config(format!("VOYAGE_TIMEOUT_SECS must be whole seconds, got `{raw}`"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.weather_api_base = value("WEATHER_API_BASE");
        config.min_missing_groups =
            parse_min_missing_groups(value("MIN_MISSING_GROUPS").as_deref());
        config.tone = Tone::resolve(value("VOYAGE_TONE").as_deref());

        Ok(config)
    }
}

/// Clamp to 1..=3; unparseable or absent values use the default of 3.
pub fn parse_min_missing_groups(raw: Option<&str>) -> u8 {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .map(|n| n.clamp(1, 3) as u8)
        .unwrap_or(DEFAULT_MIN_MISSING_GROUPS)
}
