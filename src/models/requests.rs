use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::models::domain::FoodPreferences;

/// Request to compute residential recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_income_source"))]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(range(min = 0.0))]
    pub income: Option<f64>,
    pub income_bracket: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub food_preferences: FoodPreferences,
    #[serde(default, alias = "categoryIds")]
    pub amenity_category_ids: Vec<String>,
    /// Amenity sub-category labels, resolved through the category catalog
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn validate_income_source(req: &RecommendRequest) -> Result<(), ValidationError> {
    match (&req.income, &req.income_bracket) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        _ => {
            let mut err = ValidationError::new("income");
            err.message = Some("exactly one of income or incomeBracket is required".into());
            Err(err)
        }
    }
}
