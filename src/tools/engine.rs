use super::cache::{MemoryCache, TtlCache};
use super::hotels::hotels_for;
use super::pricing::{
    estimate_flight_price_usd, estimate_trip_cost_usd, Comfort, FlightQuery, TripCostQuery,
};
use super::scores::{food_score, fun_score};
use super::weather::{coordinates_for, failure_summary, generic_summary, WeatherSource};
use crate::types::{Candidate, FactSheetEntry, Hotel, ParsedPreferences};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const LIVE_WEATHER_TTL: Duration = Duration::from_secs(60 * 60);
pub const FALLBACK_WEATHER_TTL: Duration = Duration::from_secs(12 * 60 * 60);
pub const HOTEL_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Deterministic facts for catalog destinations.
///
/// Weather and hotel lookups are cached; the caches are the only state shared
/// between requests. Nothing here returns an error: failed lookups degrade to
/// fallback values.
#[derive(Debug, Clone)]
pub struct FactEngine {
    weather: Option<Arc<dyn WeatherSource>>,
    weather_cache: Arc<dyn TtlCache<String>>,
    hotel_cache: Arc<dyn TtlCache<Vec<Hotel>>>,
}

impl Default for FactEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FactEngine {
    /// Engine without a weather source, backed by in-memory caches.
    pub fn new() -> Self {
        Self {
            weather: None,
            weather_cache: Arc::new(MemoryCache::new()),
            hotel_cache: Arc::new(MemoryCache::new()),
        }
    }

    pub fn with_weather_source(mut self, source: Arc<dyn WeatherSource>) -> Self {
        self.weather = Some(source);
        self
    }

    pub fn with_caches(
        mut self,
        weather_cache: Arc<dyn TtlCache<String>>,
        hotel_cache: Arc<dyn TtlCache<Vec<Hotel>>>,
    ) -> Self {
        self.weather_cache = weather_cache;
        self.hotel_cache = hotel_cache;
        self
    }

    pub fn has_weather_source(&self) -> bool {
        self.weather.is_some()
    }

    /// One-sentence weather summary for `place`, optionally hinted by month.
    pub async fn weather_summary(&self, place: &str, month: Option<&str>) -> String {
        let month = month.map(str::trim).filter(|m| !m.is_empty());
        let key = format!("weather:{place}:{}", month.unwrap_or_default());
        if let Some(hit) = self.weather_cache.get(&key) {
            return hit;
        }

        let (summary, ttl) = match (&self.weather, coordinates_for(place)) {
            (Some(source), Some(coords)) => match source.daily(coords).await {
                Ok(forecast) => (forecast.summary(), LIVE_WEATHER_TTL),
                Err(err) => {
                    warn!(target: "voyage::facts", place, error = %err, "weather lookup failed, using seasonal fallback");
                    (failure_summary(month), FALLBACK_WEATHER_TTL)
                }
            },
            _ => (generic_summary(month), FALLBACK_WEATHER_TTL),
        };

        self.weather_cache.insert(key, summary.clone(), ttl);
        summary
    }

    pub fn flight_price(&self, query: FlightQuery<'_>) -> u32 {
        estimate_flight_price_usd(query)
    }

    pub fn trip_cost(&self, query: TripCostQuery<'_>) -> u32 {
        estimate_trip_cost_usd(query)
    }

    pub fn hotel_suggestions(&self, destination: &str, comfort: Comfort) -> Vec<Hotel> {
        let key = format!("hotels:{destination}:{comfort}");
        if let Some(hit) = self.hotel_cache.get(&key) {
            return hit;
        }
        let hotels = hotels_for(destination, comfort);
        self.hotel_cache.insert(key, hotels.clone(), HOTEL_TTL);
        hotels
    }

    /// Every fact for one candidate under the given preferences.
    pub async fn facts_for(
        &self,
        candidate: &Candidate,
        preferences: &ParsedPreferences,
    ) -> FactSheetEntry {
        let place = candidate.place();
        let month = preferences.month();
        let comfort = Comfort::from_budget(preferences.budget_usd);

        let weather_summary = self.weather_summary(&place, month).await;
        let flight_price_usd = self.flight_price(FlightQuery {
            destination: &place,
            month,
        });
        let est_cost_usd = self.trip_cost(TripCostQuery {
            destination: &place,
            duration_days: preferences.duration_days,
            comfort,
            flight_price: Some(flight_price_usd),
        });
        let hotels = self.hotel_suggestions(&place, comfort);
        let activities = preferences.activities();

        FactSheetEntry {
            name: candidate.name.to_string(),
            country: candidate.country.to_string(),
            fun_score: fun_score(&weather_summary, activities, &hotels),
            food_score: food_score(activities, &hotels),
            place,
            weather_summary,
            flight_price_usd,
            est_cost_usd,
            hotels,
        }
    }

    /// Facts for all candidates, computed concurrently, in candidate order.
    pub async fn fact_sheet(
        &self,
        candidates: &[Candidate],
        preferences: &ParsedPreferences,
    ) -> Vec<FactSheetEntry> {
        let sheet = join_all(
            candidates
                .iter()
                .map(|candidate| self.facts_for(candidate, preferences)),
        )
        .await;
        debug!(target: "voyage::facts", count = sheet.len(), "fact sheet ready");
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, TravelError};
    use crate::tools::weather::{DailyForecast, LatLng};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WeatherSource for CountingSource {
        async fn daily(&self, _coords: LatLng) -> Result<DailyForecast> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TravelError::Api {
                    status: 503,
                    message: "down".to_string(),
                });
            }
            Ok(DailyForecast {
                highs: vec![78.0],
                lows: vec![64.0],
                precipitation: vec![0.0],
            })
        }
    }

    const LISBON: Candidate = Candidate {
        name: "Lisbon",
        country: "Portugal",
        kind: "city+beach",
    };

    #[tokio::test]
    async fn generic_summary_without_source() {
        let engine = FactEngine::new();
        assert_eq!(
            engine.weather_summary("Lisbon, Portugal", Some("July")).await,
            "Typically mild to warm in July; expect 65–80°F, low rain."
        );
    }

    #[tokio::test]
    async fn live_summary_is_cached_per_place_and_month() {
        let source = Arc::new(CountingSource::default());
        let engine = FactEngine::new().with_weather_source(source.clone());

        let first = engine.weather_summary("Nice, France", Some("May")).await;
        let second = engine.weather_summary("Nice, France", Some("May")).await;
        assert_eq!(first, "Avg highs 78°F / lows 64°F; precipitation 0.0mm/day.");
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        engine.weather_summary("Nice, France", Some("June")).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failing_source_degrades_to_seasonal_sentence() {
        let source = Arc::new(CountingSource {
            fail: true,
            ..Default::default()
        });
        let engine = FactEngine::new().with_weather_source(source);
        assert_eq!(
            engine.weather_summary("Crete, Greece", None).await,
            "Seasonal: pleasant, moderate temps, limited rain."
        );
    }

    #[tokio::test]
    async fn unknown_place_skips_the_source() {
        let source = Arc::new(CountingSource::default());
        let engine = FactEngine::new().with_weather_source(source.clone());
        let summary = engine.weather_summary("Atlantis, Ocean", None).await;
        assert!(summary.starts_with("Typically mild to warm"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn facts_follow_preferences() {
        let engine = FactEngine::new();
        let preferences = ParsedPreferences {
            month: Some("July".to_string()),
            duration_days: Some(5.0),
            budget_usd: Some(2000.0),
            activities: Some(vec!["beaches".to_string(), "food".to_string()]),
            ..Default::default()
        };

        let entry = engine.facts_for(&LISBON, &preferences).await;
        assert_eq!(entry.place, "Lisbon, Portugal");
        assert_eq!(entry.flight_price_usd, 980);
        assert_eq!(entry.est_cost_usd, 980 + 4 * 150);
        assert!(!entry.hotels.is_empty());
        assert_eq!(entry.food_score.value(), 80);
        // warm +8, low rain +5, rain -6, beach +6
        assert_eq!(entry.fun_score.value(), 83);
    }

    #[tokio::test]
    async fn fact_sheet_keeps_candidate_order() {
        let engine = FactEngine::new();
        let nice = Candidate {
            name: "Nice",
            country: "France",
            kind: "city+beach",
        };
        let sheet = engine
            .fact_sheet(&[nice, LISBON], &ParsedPreferences::default())
            .await;
        let places: Vec<_> = sheet.iter().map(|entry| entry.place.as_str()).collect();
        assert_eq!(places, ["Nice, France", "Lisbon, Portugal"]);
    }

    /// Wraps a `MemoryCache`, counting hits and writes.
    #[derive(Debug, Default)]
    struct CountingCache<V> {
        inner: MemoryCache<V>,
        hits: AtomicUsize,
        writes: AtomicUsize,
    }

    impl<V: Clone + Send + Sync + std::fmt::Debug> TtlCache<V> for CountingCache<V> {
        fn get(&self, key: &str) -> Option<V> {
            let hit = self.inner.get(key);
            if hit.is_some() {
                self.hits.fetch_add(1, Ordering::SeqCst);
            }
            hit
        }

        fn insert(&self, key: String, value: V, ttl: Duration) {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.insert(key, value, ttl);
        }
    }

    #[derive(Debug)]
    struct SlowSource(Duration);

    #[async_trait]
    impl WeatherSource for SlowSource {
        async fn daily(&self, _coords: LatLng) -> Result<DailyForecast> {
            tokio::time::sleep(self.0).await;
            Ok(DailyForecast {
                highs: vec![75.0],
                lows: vec![60.0],
                precipitation: vec![1.0],
            })
        }
    }

    #[tokio::test]
    async fn hotel_suggestions_are_served_from_cache() {
        let hotels: Arc<CountingCache<Vec<Hotel>>> = Arc::new(CountingCache::default());
        let engine = FactEngine::new()
            .with_caches(Arc::new(MemoryCache::new()), hotels.clone());

        let first = engine.hotel_suggestions("Lisbon, Portugal", Comfort::Mid);
        let second = engine.hotel_suggestions("Lisbon, Portugal", Comfort::Mid);

        assert!(!first.is_empty());
        assert_eq!(first, second);
        assert_eq!(hotels.writes.load(Ordering::SeqCst), 1);
        assert_eq!(hotels.hits.load(Ordering::SeqCst), 1);

        engine.hotel_suggestions("Lisbon, Portugal", Comfort::Premium);
        assert_eq!(hotels.writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn candidate_facts_are_computed_concurrently() {
        let delay = Duration::from_millis(300);
        let engine = FactEngine::new().with_weather_source(Arc::new(SlowSource(delay)));
        assert!(engine.has_weather_source());
        let candidates = [
            LISBON,
            Candidate {
                name: "Crete",
                country: "Greece",
                kind: "beach+adventure",
            },
            Candidate {
                name: "Nice",
                country: "France",
                kind: "city+beach",
            },
        ];

        let started = std::time::Instant::now();
        let sheet = engine
            .fact_sheet(&candidates, &ParsedPreferences::default())
            .await;
        let elapsed = started.elapsed();

        assert_eq!(sheet.len(), 3);
        assert!(sheet
            .iter()
            .all(|entry| entry.weather_summary.starts_with("Avg highs 75°F")));
        assert!(elapsed < delay * 2, "facts took {elapsed:?}");
    }

    #[tokio::test]
    async fn weather_cache_stays_bounded_for_free_form_months() {
        let weather: Arc<MemoryCache<String>> = Arc::new(MemoryCache::with_capacity(64));
        let engine = FactEngine::new().with_caches(weather.clone(), Arc::new(MemoryCache::new()));
        assert!(!engine.has_weather_source());

        for i in 0..500 {
            let month = format!("month phrase {i}");
            engine.weather_summary("Lisbon, Portugal", Some(&month)).await;
        }

        assert_eq!(weather.len(), 64);
        assert_eq!(
            engine
                .weather_summary("Lisbon, Portugal", Some("month phrase 499"))
                .await,
            "Typically mild to warm in month phrase 499; expect 65–80°F, low rain."
        );
    }
}
