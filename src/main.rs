use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use reloc_algo::config::{LogFormat, Settings};
use reloc_algo::core::{Recommender, SearchOptions};
use reloc_algo::routes::{self, AppState};
use reloc_algo::services::{CachedPlacesSearch, CategoryCatalog, CityCostTable, FoursquareClient, NominatimClient};
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(settings: &Settings) {
    // LOG_LEVEL / LOG_FORMAT win over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT")
        .map(|name| LogFormat::parse(&name))
        .unwrap_or_else(|_| settings.logging.log_format());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    match log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

type Places = CachedPlacesSearch<FoursquareClient>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is not up yet, so configuration errors go to stderr
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);

    info!("Starting reloc-algo recommendation service...");

    let geocoder = NominatimClient::new(
        settings.geocoder.endpoint.clone(),
        settings.geocoder.user_agent.clone(),
        settings.geocoder.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create geocoding client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    let foursquare = FoursquareClient::new(
        settings.places.endpoint.clone(),
        settings.places.api_key.clone(),
        settings.places.timeout(),
    )
    .map_err(|e| {
        error!("Failed to create places client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    if settings.places.api_key.trim().is_empty() {
        error!("places.api_key is empty, places search requests will be rejected");
    }

    let places: Places = if settings.cache.enabled {
        info!(
            "Amenity cache enabled ({} entries, TTL: {}s, bucket: {}°)",
            settings.cache.capacity, settings.cache.ttl_secs, settings.cache.bucket_precision_deg
        );
        CachedPlacesSearch::new(
            foursquare,
            settings.cache.capacity,
            settings.cache.ttl_secs,
            settings.cache.bucket_precision_deg,
        )
    } else {
        CachedPlacesSearch::passthrough(foursquare)
    };

    let costs = CityCostTable::with_overrides(
        &settings.cost_table.override_map(),
        settings.cost_table.default_cost,
    );
    let catalog = CategoryCatalog::load_or_empty(&settings.catalog.path);

    let search = SearchOptions::from(&settings.search);
    info!("Search options: {:?}", search);

    let app_state = AppState {
        geocoder: Arc::new(geocoder),
        places: Arc::new(places),
        costs: Arc::new(costs),
        catalog: Arc::new(catalog),
        recommender: Recommender::new(search),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes::<NominatimClient, Places>)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
