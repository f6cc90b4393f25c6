// Core algorithm exports
pub mod distance;
pub mod proximity;
pub mod ranker;
pub mod recommender;
pub mod scoring;
pub mod sources;

pub use distance::{haversine_distance, location_bucket};
pub use proximity::{average_distance, AmenityProximityEstimator};
pub use ranker::{rank, TOP_N};
pub use recommender::{
    RankedBatch, RecommendError, Recommendation, RecommendationInput, Recommender, SearchOptions,
};
pub use scoring::{calculate_affordability_score, score_batch, ScoringContext};
pub use sources::{Geocoder, PlaceQuery, PlacesSearch, SourceError};
