// In-memory collaborators shared by the integration tests
#![allow(dead_code)]

use reloc_algo::core::{haversine_distance, Geocoder, PlaceQuery, PlacesSearch, SourceError};
use reloc_algo::models::{GeoPoint, Place};
use std::collections::HashMap;
use std::sync::Mutex;

/// Kilometers per degree of latitude on the 6371 km sphere
const KM_PER_DEGREE: f64 = 6371.0 * std::f64::consts::PI / 180.0;

pub fn pune() -> GeoPoint {
    GeoPoint::new(18.5204, 73.8567)
}

/// A point `km` due north of `origin`
pub fn north_of(origin: GeoPoint, km: f64) -> GeoPoint {
    GeoPoint::new(origin.latitude + km / KM_PER_DEGREE, origin.longitude)
}

pub struct FakeGeocoder {
    pub known: HashMap<String, GeoPoint>,
    pub fail: bool,
}

impl FakeGeocoder {
    pub fn with(entries: &[(&str, GeoPoint)]) -> Self {
        Self {
            known: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            fail: false,
        }
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<GeoPoint>, SourceError> {
        if self.fail {
            return Err(SourceError::ApiError("503 Service Unavailable".to_string()));
        }
        Ok(self.known.get(query).copied())
    }
}

/// Candidate batch plus amenities scattered on the map
///
/// Nearest-amenity queries return the closest amenity of the requested
/// category inside the query radius, like the real service.
pub struct FakePlaces {
    pub candidates: Vec<Place>,
    pub amenities: Vec<(String, GeoPoint)>,
    pub fail_candidates: bool,
    pub queries: Mutex<Vec<PlaceQuery>>,
}

impl FakePlaces {
    pub fn new(candidates: Vec<Place>) -> Self {
        Self {
            candidates,
            amenities: vec![],
            fail_candidates: false,
            queries: Mutex::new(vec![]),
        }
    }

    pub fn with_amenity(mut self, category: &str, location: GeoPoint) -> Self {
        self.amenities.push((category.to_string(), location));
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

impl PlacesSearch for FakePlaces {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError> {
        self.queries.lock().unwrap().push(query.clone());

        if query.limit > 1 {
            if self.fail_candidates {
                return Err(SourceError::Unauthorized);
            }
            return Ok(self.candidates.iter().take(query.limit as usize).cloned().collect());
        }

        let radius_km = query.radius_m as f64 / 1000.0;
        let nearest = self
            .amenities
            .iter()
            .filter(|(category, _)| query.categories.contains(category))
            .map(|(category, location)| (category, *location, haversine_distance(&query.center, location)))
            .filter(|(_, _, d)| *d <= radius_km)
            .min_by(|a, b| a.2.total_cmp(&b.2));

        Ok(nearest
            .map(|(category, location, _)| Place {
                name: category.clone(),
                address: "N/A".to_string(),
                location,
            })
            .into_iter()
            .collect())
    }
}

pub fn place(name: &str, location: GeoPoint) -> Place {
    Place {
        name: name.to_string(),
        address: format!("{} Road, Pune", name),
        location,
    }
}
