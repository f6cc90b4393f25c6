// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AmenitySelection, Candidate, CityProfile, FoodPreferences, GeoPoint, MeasuredCandidate, Place,
    ScoredCandidate, ScoringWeights, DEFAULT_MONTHLY_COST, UNREACHABLE_DISTANCE_KM,
};
pub use requests::RecommendRequest;
pub use responses::{
    CitiesResponse, CityCostEntry, ErrorResponse, HealthResponse, MapMarker, RecommendResponse,
};
