//! Seams to the external services the pipeline consumes.
//!
//! The pipeline is generic over these traits so that the HTTP clients in
//! `services` can be swapped for in-memory fakes in tests.
#![allow(async_fn_in_trait)]

use crate::models::{GeoPoint, Place};
use thiserror::Error;

/// Errors raised by an external collaborator
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Parameters for one places search
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceQuery {
    pub center: GeoPoint,
    pub radius_m: u32,
    pub categories: Vec<String>,
    pub limit: u32,
}

impl PlaceQuery {
    /// Query for the single nearest place of one category
    pub fn nearest(center: GeoPoint, category: &str, radius_m: u32) -> Self {
        Self {
            center,
            radius_m,
            categories: vec![category.to_string()],
            limit: 1,
        }
    }

    /// Categories joined the way the places API expects them
    pub fn joined_categories(&self) -> String {
        self.categories.join(",")
    }
}

/// Maps a free-text place name to coordinates
pub trait Geocoder {
    /// Returns `Ok(None)` when the service knows no such place
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, SourceError>;
}

/// Finds points of interest around a location
pub trait PlacesSearch {
    /// Results are ordered as the service returns them, nearest-first for amenity lookups
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError>;
}

impl<T: Geocoder> Geocoder for std::sync::Arc<T> {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, SourceError> {
        (**self).geocode(query).await
    }
}

impl<T: PlacesSearch> PlacesSearch for std::sync::Arc<T> {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError> {
        (**self).search(query).await
    }
}
