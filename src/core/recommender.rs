use crate::core::{
    proximity::{AmenityProximityEstimator, DEFAULT_AMENITY_RADIUS_M},
    ranker::{rank, TOP_N},
    scoring::{score_batch, ScoringContext},
    sources::{Geocoder, PlaceQuery, PlacesSearch, SourceError},
};
use crate::models::{
    AmenitySelection, Candidate, CityProfile, FoodPreferences, GeoPoint, MeasuredCandidate,
    ScoredCandidate, ScoringWeights,
};
use crate::services::CityCostTable;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

/// Category identifiers for residential areas
pub const RESIDENTIAL_CATEGORIES: [&str; 3] = [
    "4f2a25ac4b909258e854f55f",
    "4e67e38e036454776db1fb3a",
    "4d954b06a243a5684965b473",
];

/// Terminal failures of a recommendation run
#[derive(Debug, Error)]
pub enum RecommendError {
    #[error("No amenity categories selected")]
    NoAmenitySelection,

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("No residential areas found near {0}")]
    NoCandidatesFound(String),

    #[error("Geocoding failed: {0}")]
    Geocoding(#[source] SourceError),

    #[error("Places search failed: {0}")]
    Places(#[source] SourceError),
}

/// Everything the user supplies for one run
#[derive(Debug, Clone)]
pub struct RecommendationInput {
    pub city: String,
    pub income: f64,
    pub food: FoodPreferences,
    pub amenities: AmenitySelection,
}

/// Where and how widely to search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub radius_m: u32,
    pub candidate_limit: u32,
    pub amenity_radius_m: u32,
    pub residential_categories: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            radius_m: 5000,
            candidate_limit: 20,
            amenity_radius_m: DEFAULT_AMENITY_RADIUS_M,
            residential_categories: RESIDENTIAL_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Scored and ranked batch
#[derive(Debug)]
pub struct RankedBatch {
    pub recommendations: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub run_id: Uuid,
    pub city: CityProfile,
    pub location: GeoPoint,
    pub income: f64,
    pub food: FoodPreferences,
    pub total_candidates: usize,
    pub recommendations: Vec<ScoredCandidate>,
}

/// Recommendation orchestrator
///
/// # Pipeline Stages
/// 1. Amenity selection check
/// 2. Geocoding and city cost lookup
/// 3. Residential candidate fetch
/// 4. Per-candidate amenity proximity
/// 5. Scoring and ranking
#[derive(Debug, Clone)]
pub struct Recommender {
    weights: ScoringWeights,
    limit: usize,
    search: SearchOptions,
}

impl Recommender {
    pub fn new(search: SearchOptions) -> Self {
        Self {
            weights: ScoringWeights::default(),
            limit: TOP_N,
            search,
        }
    }

    /// Score and rank an already measured batch
    pub fn rank_batch(
        &self,
        batch: Vec<MeasuredCandidate>,
        context: &ScoringContext<'_>,
    ) -> RankedBatch {
        let total_candidates = batch.len();
        let scored = score_batch(batch, context, &self.weights);

        RankedBatch {
            recommendations: rank(scored, self.limit),
            total_candidates,
        }
    }

    /// Run the full pipeline for one user request
    ///
    /// Terminal conditions stop the run before anything is scored. Missing or
    /// failed amenity lookups only reduce the samples for that candidate.
    pub async fn recommend<G, P>(
        &self,
        input: RecommendationInput,
        geocoder: &G,
        places: &P,
        costs: &CityCostTable,
    ) -> Result<Recommendation, RecommendError>
    where
        G: Geocoder,
        P: PlacesSearch,
    {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("recommend", %run_id, city = %input.city);

        self.run(run_id, input, geocoder, places, costs)
            .instrument(span)
            .await
    }

    async fn run<G, P>(
        &self,
        run_id: Uuid,
        input: RecommendationInput,
        geocoder: &G,
        places: &P,
        costs: &CityCostTable,
    ) -> Result<Recommendation, RecommendError>
    where
        G: Geocoder,
        P: PlacesSearch,
    {
        if input.amenities.is_empty() {
            tracing::warn!("Rejected run without amenity categories");
            return Err(RecommendError::NoAmenitySelection);
        }

        let location = geocoder
            .geocode(&input.city)
            .await
            .map_err(RecommendError::Geocoding)?
            .ok_or_else(|| RecommendError::LocationNotFound(input.city.clone()))?;

        let city = costs.profile(&input.city);
        tracing::info!(
            "Geocoded {} to ({}, {}), estimated cost {}",
            city.name,
            location.latitude,
            location.longitude,
            city.estimated_monthly_cost
        );

        let query = PlaceQuery {
            center: location,
            radius_m: self.search.radius_m,
            categories: self.search.residential_categories.clone(),
            limit: self.search.candidate_limit,
        };
        let candidates: Vec<Candidate> = places
            .search(&query)
            .await
            .map_err(RecommendError::Places)?
            .into_iter()
            .enumerate()
            .map(|(i, place)| Candidate::from_place(i + 1, place))
            .collect();

        if candidates.is_empty() {
            return Err(RecommendError::NoCandidatesFound(input.city));
        }

        tracing::debug!(
            "Measuring {} candidates against {} amenity categories",
            candidates.len(),
            input.amenities.len()
        );

        let estimator = AmenityProximityEstimator::new(places, self.search.amenity_radius_m);
        let mut batch = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let avg_amenity_distance_km = estimator
                .estimate(candidate.location(), &input.amenities)
                .await;
            batch.push(MeasuredCandidate {
                candidate,
                avg_amenity_distance_km,
            });
        }

        let context = ScoringContext {
            income: input.income,
            city_cost: city.estimated_monthly_cost,
            food: &input.food,
        };
        let ranked = self.rank_batch(batch, &context);

        let unreachable = ranked.recommendations.iter().filter(|s| s.is_unreachable()).count();
        tracing::info!(
            "Returning {} recommendations (from {} candidates, {} with no amenity in range)",
            ranked.recommendations.len(),
            ranked.total_candidates,
            unreachable
        );

        Ok(Recommendation {
            run_id,
            city,
            location,
            income: input.income,
            food: input.food,
            total_candidates: ranked.total_candidates,
            recommendations: ranked.recommendations,
        })
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}
