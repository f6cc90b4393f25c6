use serde::{Deserialize, Serialize};
use validator::Validate;

/// Distance assigned when no amenity could be found for any selected category
pub const UNREACHABLE_DISTANCE_KM: f64 = 9999.0;

/// Monthly cost used when a city is missing from the cost table
pub const DEFAULT_MONTHLY_COST: f64 = 30000.0;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true when both coordinates are finite and inside their degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.longitude, point.latitude)
    }
}

impl From<geo::Point<f64>> for GeoPoint {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

/// The user's food ratings, each on a 1-5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreferences {
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub ethnic_food: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub fast_food: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub veg_preference: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub fruit_preference: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub organic_food: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub home_cooked: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub eating_out: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub sweet_tooth: u8,
    #[serde(default = "default_rating")]
    #[validate(range(min = 1, max = 5))]
    pub spicy_food: u8,
}

fn default_rating() -> u8 { 3 }

impl FoodPreferences {
    /// Every axis set to the same rating
    pub fn uniform(rating: u8) -> Self {
        Self {
            ethnic_food: rating,
            fast_food: rating,
            veg_preference: rating,
            fruit_preference: rating,
            organic_food: rating,
            home_cooked: rating,
            eating_out: rating,
            sweet_tooth: rating,
            spicy_food: rating,
        }
    }

    /// Ratings in axis order
    pub fn ratings(&self) -> [u8; 9] {
        [
            self.ethnic_food,
            self.fast_food,
            self.veg_preference,
            self.fruit_preference,
            self.organic_food,
            self.home_cooked,
            self.eating_out,
            self.sweet_tooth,
            self.spicy_food,
        ]
    }

    /// Sum of all nine ratings (9-45 for valid input)
    pub fn total(&self) -> u32 {
        self.ratings().iter().map(|&r| r as u32).sum()
    }
}

impl Default for FoodPreferences {
    fn default() -> Self {
        Self::uniform(default_rating())
    }
}

/// Ordered, de-duplicated set of amenity category identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct AmenitySelection(Vec<String>);

impl AmenitySelection {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selected: Vec<String> = Vec::new();
        for id in ids {
            let id = id.into().trim().to_string();
            if !id.is_empty() && !selected.contains(&id) {
                selected.push(id);
            }
        }
        Self(selected)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for AmenitySelection {
    fn from(ids: Vec<String>) -> Self {
        Self::new(ids)
    }
}

impl From<AmenitySelection> for Vec<String> {
    fn from(selection: AmenitySelection) -> Self {
        selection.0
    }
}

/// A point of interest returned by the places search service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
}

/// A residential point of interest considered for recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// 1-based position in the fetched batch
    pub serial: usize,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Candidate {
    pub fn from_place(serial: usize, place: Place) -> Self {
        Self {
            serial,
            name: place.name,
            address: place.address,
            latitude: place.location.latitude,
            longitude: place.location.longitude,
        }
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// A candidate paired with its measured amenity proximity
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredCandidate {
    pub candidate: Candidate,
    pub avg_amenity_distance_km: f64,
}

/// Candidate with its derived sub-scores and final score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub avg_amenity_distance_km: f64,
    pub proximity_score: f64,
    pub affordability_score: f64,
    pub food_score: f64,
    pub final_score: f64,
}

impl ScoredCandidate {
    /// True when no amenity was found for any selected category
    pub fn is_unreachable(&self) -> bool {
        self.avg_amenity_distance_km >= UNREACHABLE_DISTANCE_KM
    }
}

/// City name with its representative monthly living cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityProfile {
    pub name: String,
    pub estimated_monthly_cost: f64,
}

/// Fixed weights combining the three sub-scores
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub proximity: f64,
    pub affordability: f64,
    pub food: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            proximity: 0.5,
            affordability: 0.3,
            food: 0.2,
        }
    }
}
