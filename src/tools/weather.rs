use crate::error::{Result, TravelError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

const COORDS: [(&str, LatLng); 4] = [
    (
        "Lisbon, Portugal",
        LatLng {
            lat: 38.7223,
            lng: -9.1393,
        },
    ),
    (
        "Canary Islands, Spain",
        LatLng {
            lat: 28.2916,
            lng: -16.6291,
        },
    ),
    (
        "Crete, Greece",
        LatLng {
            lat: 35.2401,
            lng: 24.8093,
        },
    ),
    (
        "Nice, France",
        LatLng {
            lat: 43.7102,
            lng: 7.2620,
        },
    ),
];

/// Known coordinates for a catalog place ("Name, Country").
pub fn coordinates_for(place: &str) -> Option<LatLng> {
    COORDS
        .iter()
        .find(|(name, _)| *name == place)
        .map(|(_, coords)| *coords)
}

/// Seven days of daily highs, lows (°F) and precipitation (mm).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DailyForecast {
    #[serde(rename = "temperature_2m_max", default)]
    pub highs: Vec<f64>,
    #[serde(rename = "temperature_2m_min", default)]
    pub lows: Vec<f64>,
    #[serde(rename = "precipitation_sum", default)]
    pub precipitation: Vec<f64>,
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len().max(1) as f64
}

impl DailyForecast {
    /// `Avg highs H°F / lows L°F; precipitation P.Pmm/day.`
    pub fn summary(&self) -> String {
        format!(
            "Avg highs {:.0}°F / lows {:.0}°F; precipitation {:.1}mm/day.",
            mean(&self.highs),
            mean(&self.lows),
            mean(&self.precipitation)
        )
    }
}

/// Used when no weather source is configured or the place has no coordinates.
pub fn generic_summary(month: Option<&str>) -> String {
    format!(
        "Typically mild to warm{}; expect 65–80°F, low rain.",
        month_hint(month)
    )
}

/// Used when a configured source fails or returns something unreadable.
pub fn failure_summary(month: Option<&str>) -> String {
    format!(
        "Seasonal: pleasant{}, moderate temps, limited rain.",
        month_hint(month)
    )
}

fn month_hint(month: Option<&str>) -> String {
    match month.map(str::trim).filter(|m| !m.is_empty()) {
        Some(month) => format!(" in {month}"),
        None => String::new(),
    }
}

/// A daily forecast provider.
#[async_trait]
pub trait WeatherSource: Send + Sync + std::fmt::Debug {
    async fn daily(&self, coords: LatLng) -> Result<DailyForecast>;
}

#[derive(Debug, Deserialize)]
struct ForecastEnvelope {
    daily: Option<DailyForecast>,
}

/// Open-Meteo compatible forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenMeteoSource {
    base_url: String,
    client: Client,
}

impl OpenMeteoSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoSource {
    async fn daily(&self, coords: LatLng) -> Result<DailyForecast> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", coords.lat.to_string()),
                ("longitude", coords.lng.to_string()),
                (
                    "daily",
                    "temperature_2m_max,temperature_2m_min,precipitation_sum".to_string(),
                ),
                ("forecast_days", "7".to_string()),
                ("timezone", "auto".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TravelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let envelope: ForecastEnvelope = serde_json::from_str(&body)
            .map_err(|err| TravelError::UpstreamFormat(format!("forecast body: {err}")))?;

        match envelope.daily {
            Some(daily) if !daily.highs.is_empty() && !daily.lows.is_empty() => Ok(daily),
            _ => Err(TravelError::UpstreamFormat(
                "forecast has no daily temperatures".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_places_have_coordinates() {
        assert!(coordinates_for("Lisbon, Portugal").is_some());
        assert!(coordinates_for("Nice, France").is_some());
        assert!(coordinates_for("Lisbon").is_none());
    }

    #[test]
    fn summary_averages_each_series() {
        let forecast = DailyForecast {
            highs: vec![80.0, 84.0],
            lows: vec![60.0, 64.0],
            precipitation: vec![0.0, 0.6],
        };
        assert_eq!(
            forecast.summary(),
            "Avg highs 82°F / lows 62°F; precipitation 0.3mm/day."
        );
    }

    #[test]
    fn summary_of_missing_precipitation_is_zero() {
        let forecast = DailyForecast {
            highs: vec![70.0],
            lows: vec![50.0],
            precipitation: Vec::new(),
        };
        assert!(forecast.summary().ends_with("precipitation 0.0mm/day."));
    }

    #[test]
    fn fallback_sentences_include_month_hint() {
        assert_eq!(
            generic_summary(Some("July")),
            "Typically mild to warm in July; expect 65–80°F, low rain."
        );
        assert_eq!(
            generic_summary(None),
            "Typically mild to warm; expect 65–80°F, low rain."
        );
        assert_eq!(
            failure_summary(Some("May")),
            "Seasonal: pleasant in May, moderate temps, limited rain."
        );
    }
}
