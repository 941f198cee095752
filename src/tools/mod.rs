//! Fact engine: weather, flight and trip cost estimates, hotels and heuristic scores

pub mod cache;
pub mod engine;
pub mod hotels;
pub mod pricing;
pub mod scores;
pub mod weather;

pub use cache::{MemoryCache, TtlCache};
pub use engine::FactEngine;
pub use pricing::{
    estimate_flight_price_usd, estimate_trip_cost_usd, Comfort, FlightQuery, TripCostQuery,
};
pub use scores::{food_score, fun_score};
pub use weather::{DailyForecast, LatLng, OpenMeteoSource, WeatherSource};
