// Service exports
pub mod cache;
pub mod catalog;
pub mod cost_table;
pub mod geocoding;
pub mod income;
pub mod places;

pub use cache::{CacheStats, CachedPlacesSearch};
pub use catalog::{AmenityCategory, CatalogError, CategoryCatalog, CategoryGroup};
pub use cost_table::CityCostTable;
pub use geocoding::NominatimClient;
pub use income::{find_bracket, IncomeBracket, INCOME_BRACKETS};
pub use places::FoursquareClient;
