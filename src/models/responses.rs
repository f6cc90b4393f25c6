use serde::{Deserialize, Serialize};
use crate::models::domain::{GeoPoint, ScoredCandidate};

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub run_id: String,
    pub city: String,
    pub location: GeoPoint,
    pub estimated_monthly_cost: f64,
    pub income: f64,
    pub total_candidates: usize,
    pub recommendations: Vec<ScoredCandidate>,
    pub markers: Vec<MapMarker>,
    pub map_center: Option<GeoPoint>,
}

/// A map marker for one recommended candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

/// One entry of the cost-of-living listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityCostEntry {
    pub name: String,
    pub estimated_monthly_cost: f64,
}

/// Cost-of-living listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesResponse {
    pub cities: Vec<CityCostEntry>,
    pub default_monthly_cost: f64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
