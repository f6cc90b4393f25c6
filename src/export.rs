//! Presentation payloads for a finished run: CSV table rows and map markers.

use crate::core::Recommendation;
use crate::models::{GeoPoint, MapMarker, ScoredCandidate};
use geo::{Centroid, MultiPoint, Point};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// One flat CSV row per ranked candidate
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Serial")]
    serial: usize,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Address")]
    address: &'a str,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
    ethnic_food: u8,
    fast_food: u8,
    veg_preference: u8,
    fruit_preference: u8,
    organic_food: u8,
    home_cooked: u8,
    eating_out: u8,
    sweet_tooth: u8,
    spicy_food: u8,
    #[serde(rename = "Income")]
    income: f64,
    #[serde(rename = "Estimated City Cost")]
    estimated_city_cost: f64,
    #[serde(rename = "Avg Amenity Distance")]
    avg_amenity_distance_km: f64,
    #[serde(rename = "Proximity Score")]
    proximity_score: f64,
    #[serde(rename = "Affordability Score")]
    affordability_score: f64,
    #[serde(rename = "Food Score")]
    food_score: f64,
    #[serde(rename = "Final Score")]
    final_score: f64,
}

/// Render the ranked batch as CSV, header included
pub fn to_csv(recommendation: &Recommendation) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let food = &recommendation.food;

    for scored in &recommendation.recommendations {
        writer.serialize(ExportRow {
            serial: scored.candidate.serial,
            name: &scored.candidate.name,
            address: &scored.candidate.address,
            latitude: scored.candidate.latitude,
            longitude: scored.candidate.longitude,
            ethnic_food: food.ethnic_food,
            fast_food: food.fast_food,
            veg_preference: food.veg_preference,
            fruit_preference: food.fruit_preference,
            organic_food: food.organic_food,
            home_cooked: food.home_cooked,
            eating_out: food.eating_out,
            sweet_tooth: food.sweet_tooth,
            spicy_food: food.spicy_food,
            income: recommendation.income,
            estimated_city_cost: recommendation.city.estimated_monthly_cost,
            avg_amenity_distance_km: scored.avg_amenity_distance_km,
            proximity_score: scored.proximity_score,
            affordability_score: scored.affordability_score,
            food_score: scored.food_score,
            final_score: scored.final_score,
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
}

/// Download file name for a city's export
pub fn export_file_name(city: &str) -> String {
    let safe: String = city
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}_recommendations.csv", safe)
}

/// One marker per ranked candidate
pub fn map_markers(recommendation: &Recommendation) -> Vec<MapMarker> {
    recommendation
        .recommendations
        .iter()
        .map(|scored| MapMarker {
            latitude: scored.candidate.latitude,
            longitude: scored.candidate.longitude,
            label: marker_label(
                scored,
                recommendation.income,
                recommendation.city.estimated_monthly_cost,
            ),
        })
        .collect()
}

fn marker_label(scored: &ScoredCandidate, income: f64, city_cost: f64) -> String {
    format!(
        "{}\n{}\nIncome: ₹{}\nCity Cost: ₹{}\nMatch Score: {:.2}",
        scored.candidate.name,
        scored.candidate.address,
        format_amount(income),
        format_amount(city_cost),
        scored.final_score
    )
}

/// Center of the ranked candidates, for framing the map
pub fn map_center(recommendations: &[ScoredCandidate]) -> Option<GeoPoint> {
    let points: Vec<Point<f64>> = recommendations
        .iter()
        .map(|s| s.candidate.location().into())
        .collect();

    MultiPoint::from(points).centroid().map(GeoPoint::from)
}

/// Whole-unit amount with thousands separators, e.g. `45,000`
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
