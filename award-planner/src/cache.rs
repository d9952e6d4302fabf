//! Caching layer for availability API responses.
//!
//! Calendar rows change slowly and seat detail for a given segment ID is
//! stable for the life of that ID, so both are cached for a short TTL. This
//! keeps repeated searches over overlapping date windows, and the HTTP
//! endpoints that rebuild segments on every call, from refetching.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::availability::{
    AvailabilityClient, AvailabilityEntry, AvailabilityError, RawFlightRecord,
};
use crate::domain::Route;
use crate::planner::FlightSource;

/// Cache key for calendars: (route, from date).
type AvailabilityKey = (Route, Option<NaiveDate>);

type AvailabilityEntries = Arc<Vec<AvailabilityEntry>>;
type SeatRecords = Arc<Vec<RawFlightRecord>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries, per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Cache for availability API responses.
pub struct AvailabilityCache {
    calendars: MokaCache<AvailabilityKey, AvailabilityEntries>,
    seats: MokaCache<String, SeatRecords>,
}

impl AvailabilityCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let calendars = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let seats = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { calendars, seats }
    }

    pub async fn get_calendar(&self, key: &AvailabilityKey) -> Option<AvailabilityEntries> {
        self.calendars.get(key).await
    }

    pub async fn insert_calendar(&self, key: AvailabilityKey, entries: AvailabilityEntries) {
        self.calendars.insert(key, entries).await;
    }

    pub async fn get_seats(&self, segment_id: &str) -> Option<SeatRecords> {
        self.seats.get(segment_id).await
    }

    pub async fn insert_seats(&self, segment_id: String, records: SeatRecords) {
        self.seats.insert(segment_id, records).await;
    }
}

/// Availability client with caching.
///
/// Wraps an `AvailabilityClient` and caches calendars and seat detail.
/// Failed requests are not cached.
pub struct CachedAvailabilityClient {
    client: AvailabilityClient,
    cache: AvailabilityCache,
}

impl CachedAvailabilityClient {
    /// Create a new cached client.
    pub fn new(client: AvailabilityClient, cache_config: &CacheConfig) -> Self {
        Self {
            client,
            cache: AvailabilityCache::new(cache_config),
        }
    }

    /// Calendar rows for `route` from `from_date`, using the cache if available.
    pub async fn get_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<AvailabilityEntries, AvailabilityError> {
        let key = (route.clone(), from_date);

        if let Some(cached) = self.cache.get_calendar(&key).await {
            debug!(%route, "availability cache hit");
            return Ok(cached);
        }

        let entries = Arc::new(self.client.fetch_availability(route, from_date).await?);
        self.cache.insert_calendar(key, entries.clone()).await;

        Ok(entries)
    }

    /// Seat records for `segment_id`, using the cache if available.
    pub async fn get_seats(&self, segment_id: &str) -> Result<SeatRecords, AvailabilityError> {
        if let Some(cached) = self.cache.get_seats(segment_id).await {
            debug!(segment_id, "seats cache hit");
            return Ok(cached);
        }

        let records = Arc::new(self.client.fetch_legs(segment_id).await?);
        self.cache
            .insert_seats(segment_id.to_string(), records.clone())
            .await;

        Ok(records)
    }
}

impl FlightSource for CachedAvailabilityClient {
    async fn fetch_availability(
        &self,
        route: &Route,
        from_date: Option<NaiveDate>,
    ) -> Result<Vec<AvailabilityEntry>, AvailabilityError> {
        Ok(self.get_availability(route, from_date).await?.as_ref().clone())
    }

    async fn fetch_legs(&self, segment_id: &str) -> Result<Vec<RawFlightRecord>, AvailabilityError> {
        Ok(self.get_seats(segment_id).await?.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> AvailabilityEntry {
        AvailabilityEntry {
            date: "2025-03-15".to_string(),
            origin_airport: "YYZ".to_string(),
            destination_airport: "YVR".to_string(),
            segment_id: id.to_string(),
            distance: None,
            class_open: Default::default(),
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 1000);
    }

    #[tokio::test]
    async fn calendar_key_includes_from_date() {
        let cache = AvailabilityCache::new(&CacheConfig::default());
        let route = Route::parse("YYZ-YVR").unwrap();
        let from = NaiveDate::from_ymd_opt(2025, 3, 15);

        cache
            .insert_calendar((route.clone(), from), Arc::new(vec![entry("a")]))
            .await;

        let hit = cache.get_calendar(&(route.clone(), from)).await.unwrap();
        assert_eq!(hit[0].segment_id, "a");
        assert!(cache.get_calendar(&(route.clone(), None)).await.is_none());

        let other = Route::parse("YYZ-YUL").unwrap();
        assert!(cache.get_calendar(&(other, from)).await.is_none());
    }

    #[tokio::test]
    async fn seats_keyed_by_segment_id() {
        let cache = AvailabilityCache::new(&CacheConfig::default());
        cache.insert_seats("seg-1".to_string(), Arc::new(vec![])).await;

        assert!(cache.get_seats("seg-1").await.is_some());
        assert!(cache.get_seats("seg-2").await.is_none());
    }
}
