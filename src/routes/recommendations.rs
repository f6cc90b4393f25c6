use actix_web::{http::header, web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{Geocoder, PlacesSearch, RecommendError, Recommendation, RecommendationInput, Recommender};
use crate::export::{export_file_name, map_center, map_markers, to_csv};
use crate::models::{
    AmenitySelection, CitiesResponse, ErrorResponse, HealthResponse, RecommendRequest,
    RecommendResponse,
};
use crate::services::{income, CategoryCatalog, CityCostTable};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState<G, P> {
    pub geocoder: Arc<G>,
    pub places: Arc<P>,
    pub costs: Arc<CityCostTable>,
    pub catalog: Arc<CategoryCatalog>,
    pub recommender: Recommender,
}

impl<G, P> Clone for AppState<G, P> {
    fn clone(&self) -> Self {
        Self {
            geocoder: Arc::clone(&self.geocoder),
            places: Arc::clone(&self.places),
            costs: Arc::clone(&self.costs),
            catalog: Arc::clone(&self.catalog),
            recommender: self.recommender.clone(),
        }
    }
}

/// Configure all recommendation-related routes
pub fn configure<G, P>(cfg: &mut web::ServiceConfig)
where
    G: Geocoder + 'static,
    P: PlacesSearch + 'static,
{
    cfg
        .route("/health", web::get().to(health_check))
        .route("/cities", web::get().to(list_cities::<G, P>))
        .route("/income-brackets", web::get().to(list_income_brackets))
        .route("/categories", web::get().to(list_categories::<G, P>))
        .route("/recommendations", web::post().to(recommend::<G, P>))
        .route("/recommendations/export", web::post().to(export_recommendations::<G, P>));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Cost-of-living table
///
/// GET /api/v1/cities
async fn list_cities<G, P>(state: web::Data<AppState<G, P>>) -> impl Responder {
    HttpResponse::Ok().json(CitiesResponse {
        cities: state.costs.entries(),
        default_monthly_cost: state.costs.default_cost(),
    })
}

/// Income brackets grouped by tier
///
/// GET /api/v1/income-brackets
async fn list_income_brackets() -> impl Responder {
    let tiers: Vec<serde_json::Value> = income::brackets_by_tier()
        .into_iter()
        .map(|(tier, brackets)| {
            serde_json::json!({
                "tier": tier,
                "brackets": brackets,
            })
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({ "tiers": tiers }))
}

/// Amenity catalog grouped by super category
///
/// GET /api/v1/categories
async fn list_categories<G, P>(state: web::Data<AppState<G, P>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "groups": state.catalog.groups(),
        "count": state.catalog.len(),
    }))
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "city": "Pune",
///   "income": 45000,
///   "foodPreferences": { "ethnicFood": 3, "spicyFood": 5 },
///   "amenityCategoryIds": ["4bf58dd8d48988d175941735"],
///   "amenities": ["Park"]
/// }
/// ```
async fn recommend<G, P>(
    state: web::Data<AppState<G, P>>,
    req: web::Json<RecommendRequest>,
) -> HttpResponse
where
    G: Geocoder,
    P: PlacesSearch,
{
    let recommendation = match run_pipeline(&state, req.into_inner()).await {
        Ok(recommendation) => recommendation,
        Err(response) => return response,
    };

    let markers = map_markers(&recommendation);
    let map_center = map_center(&recommendation.recommendations);

    HttpResponse::Ok().json(RecommendResponse {
        run_id: recommendation.run_id.to_string(),
        city: recommendation.city.name,
        location: recommendation.location,
        estimated_monthly_cost: recommendation.city.estimated_monthly_cost,
        income: recommendation.income,
        total_candidates: recommendation.total_candidates,
        recommendations: recommendation.recommendations,
        markers,
        map_center,
    })
}

/// CSV download of the ranked recommendations
///
/// POST /api/v1/recommendations/export
async fn export_recommendations<G, P>(
    state: web::Data<AppState<G, P>>,
    req: web::Json<RecommendRequest>,
) -> HttpResponse
where
    G: Geocoder,
    P: PlacesSearch,
{
    let recommendation = match run_pipeline(&state, req.into_inner()).await {
        Ok(recommendation) => recommendation,
        Err(response) => return response,
    };

    match to_csv(&recommendation) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    export_file_name(&recommendation.city.name)
                ),
            ))
            .body(body),
        Err(e) => {
            tracing::error!("Failed to export recommendations: {}", e);
            error_response(500, "Export failed", e.to_string())
        }
    }
}

/// Validate the request, resolve it into pipeline input and run the pipeline
async fn run_pipeline<G, P>(
    state: &AppState<G, P>,
    req: RecommendRequest,
) -> Result<Recommendation, HttpResponse>
where
    G: Geocoder,
    P: PlacesSearch,
{
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendation request: {:?}", errors);
        return Err(error_response(400, "Validation failed", errors.to_string()));
    }

    let input = build_input(req, &state.catalog)?;

    tracing::info!(
        "Recommending for city: {}, income: {}, amenities: {}",
        input.city,
        input.income,
        input.amenities.len()
    );

    state
        .recommender
        .recommend(input, state.geocoder.as_ref(), state.places.as_ref(), &state.costs)
        .await
        .map_err(|e| recommend_error_response(&e))
}

fn build_input(
    req: RecommendRequest,
    catalog: &CategoryCatalog,
) -> Result<RecommendationInput, HttpResponse> {
    let income = match (req.income, req.income_bracket.as_deref()) {
        (Some(income), _) => income,
        (None, Some(label)) => match income::find_bracket(label) {
            Some(bracket) => bracket.amount,
            None => {
                return Err(error_response(
                    400,
                    "Unknown income bracket",
                    format!("No income bracket labelled {:?}", label),
                ))
            }
        },
        (None, None) => {
            return Err(error_response(400, "Validation failed", "income is required".to_string()))
        }
    };

    let mut category_ids = req.amenity_category_ids;
    match catalog.resolve(&req.amenities) {
        Ok(ids) => category_ids.extend(ids),
        Err(e) => return Err(error_response(400, "Unknown amenity", e.to_string())),
    }

    Ok(RecommendationInput {
        city: req.city.trim().to_string(),
        income,
        food: req.food_preferences,
        amenities: AmenitySelection::new(category_ids),
    })
}

fn recommend_error_response(err: &RecommendError) -> HttpResponse {
    let (status, error) = match err {
        RecommendError::NoAmenitySelection => (422, "No amenity selection"),
        RecommendError::LocationNotFound(_) => (404, "Location not found"),
        RecommendError::NoCandidatesFound(_) => (404, "No candidates found"),
        RecommendError::Geocoding(_) | RecommendError::Places(_) => (502, "Upstream service failed"),
    };

    if status >= 500 {
        tracing::error!("Recommendation run failed: {}", err);
    } else {
        tracing::info!("Recommendation run stopped: {}", err);
    }

    error_response(status, error, err.to_string())
}

fn error_response(status_code: u16, error: &str, message: String) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code,
    })
}
