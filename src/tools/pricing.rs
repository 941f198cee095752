use serde::{Deserialize, Serialize};
use std::fmt;

/// Round-trip flight proxy for the European catalog, in USD.
pub const BASE_FLIGHT_USD: u32 = 700;

const DEFAULT_DURATION_DAYS: f64 = 5.0;
const PEAK_MONTHS: [&str; 4] = ["june", "july", "august", "december"];
const SHOULDER_MONTHS: [&str; 4] = ["april", "may", "september", "october"];
const PEAK_MULTIPLIER: f64 = 1.4;
const SHOULDER_MULTIPLIER: f64 = 1.15;

/// Lodging tier that sets nightly rates and hotel price bands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comfort {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl Comfort {
    /// `budget` under $1500, `premium` over $3000, otherwise (or unknown) `mid`.
    pub fn from_budget(budget_usd: Option<f64>) -> Self {
        match budget_usd {
            Some(budget) if budget < 1500.0 => Comfort::Budget,
            Some(budget) if budget > 3000.0 => Comfort::Premium,
            _ => Comfort::Mid,
        }
    }

    pub fn nightly_rate_usd(self) -> u32 {
        match self {
            Comfort::Budget => 80,
            Comfort::Mid => 150,
            Comfort::Premium => 300,
        }
    }

    /// Whether a nightly price falls inside this tier's hotel band.
    pub fn admits(self, price_per_night: f64) -> bool {
        match self {
            Comfort::Budget => price_per_night < 150.0,
            Comfort::Mid => (100.0..=250.0).contains(&price_per_night),
            Comfort::Premium => price_per_night > 200.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comfort::Budget => "budget",
            Comfort::Mid => "mid",
            Comfort::Premium => "premium",
        }
    }
}

impl fmt::Display for Comfort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlightQuery<'a> {
    pub destination: &'a str,
    pub month: Option<&'a str>,
}

#[derive(Debug, Clone, Copy)]
pub struct TripCostQuery<'a> {
    pub destination: &'a str,
    pub duration_days: Option<f64>,
    pub comfort: Comfort,
    pub flight_price: Option<u32>,
}

impl<'a> TripCostQuery<'a> {
    pub fn new(destination: &'a str) -> Self {
        Self {
            destination,
            duration_days: None,
            comfort: Comfort::default(),
            flight_price: None,
        }
    }
}

fn seasonal_multiplier(month: Option<&str>) -> f64 {
    let Some(month) = month.map(str::to_lowercase) else {
        return 1.0;
    };
    if PEAK_MONTHS.iter().any(|peak| month.contains(peak)) {
        PEAK_MULTIPLIER
    } else if SHOULDER_MONTHS.iter().any(|shoulder| month.contains(shoulder)) {
        SHOULDER_MULTIPLIER
    } else {
        1.0
    }
}

/// Base fare scaled by season: peak months x1.4, shoulder months x1.15.
///
/// The destination does not change the fare yet; every catalog entry shares
/// the same European base.
pub fn estimate_flight_price_usd(query: FlightQuery<'_>) -> u32 {
    (f64::from(BASE_FLIGHT_USD) * seasonal_multiplier(query.month)).round() as u32
}

/// Flight plus `max(1, days - 1)` nights at the tier's nightly rate.
///
/// A zero, negative or non-finite length counts as unknown and falls back to
/// the default trip length.
pub fn estimate_trip_cost_usd(query: TripCostQuery<'_>) -> u32 {
    let flight = query.flight_price.unwrap_or(BASE_FLIGHT_USD);
    let days = query
        .duration_days
        .filter(|days| days.is_finite() && *days > 0.0)
        .unwrap_or(DEFAULT_DURATION_DAYS);
    let nights = (days - 1.0).max(1.0);
    let lodging = nights * f64::from(query.comfort.nightly_rate_usd());
    (f64::from(flight) + lodging).round() as u32
}
