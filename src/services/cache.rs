use crate::core::distance::location_bucket;
use crate::core::sources::{PlaceQuery, PlacesSearch, SourceError};
use crate::models::Place;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache key for a single-category nearest-place lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AmenityKey {
    category: String,
    radius_m: u32,
    bucket: (i64, i64),
}

/// Memoizing decorator for amenity lookups
///
/// Only limit-1, single-category queries (nearest-amenity lookups) are
/// cached, keyed by category and a coarse location bucket. Empty results are
/// cached too; failures are not. Everything else passes straight through.
pub struct CachedPlacesSearch<P> {
    inner: P,
    cache: Option<moka::future::Cache<AmenityKey, Option<Place>>>,
    bucket_precision_deg: f64,
}

impl<P: PlacesSearch> CachedPlacesSearch<P> {
    pub fn new(inner: P, capacity: u64, ttl_secs: u64, bucket_precision_deg: f64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            inner,
            cache: Some(cache),
            bucket_precision_deg,
        }
    }

    /// Forward every query without caching
    pub fn passthrough(inner: P) -> Self {
        Self {
            inner,
            cache: None,
            bucket_precision_deg: 0.0,
        }
    }

    fn key_for(&self, query: &PlaceQuery) -> Option<AmenityKey> {
        match query.categories.as_slice() {
            [category] if query.limit == 1 => Some(AmenityKey {
                category: category.clone(),
                radius_m: query.radius_m,
                bucket: location_bucket(&query.center, self.bucket_precision_deg),
            }),
            _ => None,
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.cache.is_some(),
            entries: self.cache.as_ref().map_or(0, |c| c.entry_count()),
        }
    }
}

impl<P: PlacesSearch> PlacesSearch for CachedPlacesSearch<P> {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError> {
        let (Some(cache), Some(key)) = (&self.cache, self.key_for(query)) else {
            return self.inner.search(query).await;
        };

        if let Some(cached) = cache.get(&key).await {
            tracing::trace!("Amenity cache hit: {:?}", key);
            return Ok(cached.into_iter().collect());
        }

        let results = self.inner.search(query).await?;
        let nearest = results.into_iter().next();
        cache.insert(key, nearest.clone()).await;

        Ok(nearest.into_iter().collect())
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: u64,
}
