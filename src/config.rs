use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use crate::core::{recommender::RESIDENTIAL_CATEGORIES, SearchOptions};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    pub places: PlacesSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub cost_table: CostTableSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeocoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_geocoder_endpoint() -> String { "https://nominatim.openstreetmap.org".to_string() }
fn default_user_agent() -> String { "relocation-system".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesSettings {
    #[serde(default = "default_places_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl PlacesSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_places_endpoint() -> String { "https://api.foursquare.com/v3".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius_m")]
    pub radius_m: u32,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: u32,
    #[serde(default = "default_radius_m")]
    pub amenity_radius_m: u32,
    #[serde(default = "default_residential_categories")]
    pub residential_categories: Vec<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            radius_m: default_radius_m(),
            candidate_limit: default_candidate_limit(),
            amenity_radius_m: default_radius_m(),
            residential_categories: default_residential_categories(),
        }
    }
}

impl From<&SearchSettings> for SearchOptions {
    fn from(settings: &SearchSettings) -> Self {
        Self {
            radius_m: settings.radius_m,
            candidate_limit: settings.candidate_limit,
            amenity_radius_m: settings.amenity_radius_m,
            residential_categories: settings.residential_categories.clone(),
        }
    }
}

fn default_radius_m() -> u32 { 5000 }
fn default_candidate_limit() -> u32 { 20 }
fn default_residential_categories() -> Vec<String> {
    RESIDENTIAL_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_bucket_precision")]
    pub bucket_precision_deg: f64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
            bucket_precision_deg: default_bucket_precision(),
        }
    }
}

fn default_cache_capacity() -> u64 { 10_000 }
fn default_cache_ttl() -> u64 { 3600 }
fn default_bucket_precision() -> f64 { 0.001 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

fn default_catalog_path() -> String { "config/categories.csv".to_string() }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CostTableSettings {
    pub default_cost: Option<f64>,
    /// Kept as a list: config keys are case-folded, city names must not be
    #[serde(default)]
    pub overrides: Vec<CityCostOverride>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityCostOverride {
    pub city: String,
    pub cost: f64,
}

impl CostTableSettings {
    pub fn override_map(&self) -> HashMap<String, f64> {
        self.overrides.iter().map(|o| (o.city.clone(), o.cost)).collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl LogFormat {
    /// Unrecognized names fall back to compact text
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with RELOC__)
    /// 5. `FOURSQUARE_API_KEY`, if set
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., RELOC__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("RELOC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("RELOC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        substitute_env_vars(settings)?.try_deserialize()
    }
}

/// Apply well-known environment variables on top of the layered config
///
/// The places API key is a credential and is normally injected this way
/// rather than committed to a config file.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = std::env::var("FOURSQUARE_API_KEY") {
        builder = builder.set_override("places.api_key", api_key)?;
    }

    builder.build()
}
