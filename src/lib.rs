//! Reloc Algo - residential cluster recommendations for relocating users
//!
//! Scores residential areas of a city by proximity to the amenities a user
//! cares about, affordability against their income, and food-preference fit,
//! then ranks them for display on a map or download as CSV.

pub mod config;
pub mod core;
pub mod export;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{haversine_distance, RecommendError, Recommendation, RecommendationInput, Recommender};
pub use models::{AmenitySelection, FoodPreferences, GeoPoint, ScoredCandidate, RecommendRequest, RecommendResponse};
