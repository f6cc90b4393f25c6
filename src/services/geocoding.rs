use crate::core::sources::{Geocoder, SourceError};
use crate::models::GeoPoint;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// One entry of a Nominatim search response
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Nominatim geocoding client
///
/// Nominatim's usage policy requires an identifying `User-Agent`.
pub struct NominatimClient {
    base_url: String,
    user_agent: String,
    client: Client,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: String, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            user_agent,
            client,
        })
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, SourceError> {
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(query)
        );

        tracing::debug!("Geocoding {:?} via {}", query, url);

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::Unauthorized);
        }
        if !status.is_success() {
            return Err(SourceError::ApiError(format!("Failed to geocode {}: {}", query, status)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse geocoding response: {}", e)))?;

        let Some(place) = places.into_iter().next() else {
            tracing::info!("No geocoding result for {:?}", query);
            return Ok(None);
        };

        let latitude = place
            .lat
            .parse::<f64>()
            .map_err(|e| SourceError::InvalidResponse(format!("Invalid latitude {:?}: {}", place.lat, e)))?;
        let longitude = place
            .lon
            .parse::<f64>()
            .map_err(|e| SourceError::InvalidResponse(format!("Invalid longitude {:?}: {}", place.lon, e)))?;

        let point = GeoPoint::new(latitude, longitude);
        if !point.is_valid() {
            return Err(SourceError::InvalidResponse(format!("Coordinates out of range: {:?}", point)));
        }

        Ok(Some(point))
    }
}
