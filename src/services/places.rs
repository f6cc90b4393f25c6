use crate::core::sources::{PlaceQuery, PlacesSearch, SourceError};
use crate::models::{GeoPoint, Place};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    name: Option<String>,
    location: Option<ResultLocation>,
    geocodes: Option<ResultGeocodes>,
}

#[derive(Debug, Deserialize)]
struct ResultLocation {
    formatted_address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResultGeocodes {
    main: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

impl SearchResult {
    /// Results without main coordinates cannot be placed and are dropped
    fn into_place(self) -> Option<Place> {
        let coords = self.geocodes?.main?;
        Some(Place {
            name: self.name.unwrap_or_else(|| "N/A".to_string()),
            address: self
                .location
                .and_then(|l| l.formatted_address)
                .unwrap_or_else(|| "N/A".to_string()),
            location: GeoPoint::new(coords.latitude, coords.longitude),
        })
    }
}

/// Foursquare places search client
///
/// The API key is sent verbatim in the `Authorization` header.
pub struct FoursquareClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl FoursquareClient {
    pub fn new(base_url: String, api_key: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

impl PlacesSearch for FoursquareClient {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError> {
        let url = format!(
            "{}/places/search?ll={},{}&radius={}&categories={}&limit={}",
            self.base_url.trim_end_matches('/'),
            query.center.latitude,
            query.center.longitude,
            query.radius_m,
            urlencoding::encode(&query.joined_categories()),
            query.limit
        );

        tracing::trace!("Places search: {}", url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Places search failed: {} - {}", status, body);
            return Err(SourceError::ApiError(format!("Failed to search places: {}", status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse places response: {}", e)))?;

        let places: Vec<Place> = body
            .results
            .into_iter()
            .filter_map(SearchResult::into_place)
            .collect();

        tracing::debug!("Places search for [{}] returned {} results", query.joined_categories(), places.len());

        Ok(places)
    }
}
