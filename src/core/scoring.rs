use crate::models::{
    FoodPreferences, MeasuredCandidate, ScoredCandidate, ScoringWeights, DEFAULT_MONTHLY_COST,
};

/// Upper bound on the affordability score
pub const AFFORDABILITY_CAP: f64 = 1.5;

/// Distances below this are treated as this, so inversion stays finite
const MIN_DISTANCE_KM: f64 = 0.001;

/// Session-wide inputs shared by every candidate in one batch
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    pub income: f64,
    pub city_cost: f64,
    pub food: &'a FoodPreferences,
}

/// Score a batch of measured candidates
///
/// Scoring formula:
/// final = (
///     proximity * 0.5 +        # 1/avg distance, normalized by batch max
///     affordability * 0.3 +    # income / city cost, capped at 1.5
///     food * 0.2               # rating sum, normalized by batch max
/// )
///
/// Normalization is batch-local, so scores only compare within one run.
/// Output order matches input order.
pub fn score_batch(
    batch: Vec<MeasuredCandidate>,
    context: &ScoringContext<'_>,
    weights: &ScoringWeights,
) -> Vec<ScoredCandidate> {
    let inverted: Vec<f64> = batch
        .iter()
        .map(|m| inverted_distance(m.avg_amenity_distance_km))
        .collect();
    let proximity = normalize_by_max(&inverted);

    // Every candidate shares the session's food ratings
    let food_sums = vec![context.food.total() as f64; batch.len()];
    let food = normalize_by_max(&food_sums);

    let affordability = calculate_affordability_score(context.income, context.city_cost);

    batch
        .into_iter()
        .zip(proximity)
        .zip(food)
        .map(|((measured, proximity_score), food_score)| {
            let final_score = proximity_score * weights.proximity
                + affordability * weights.affordability
                + food_score * weights.food;

            ScoredCandidate {
                candidate: measured.candidate,
                avg_amenity_distance_km: measured.avg_amenity_distance_km,
                proximity_score,
                affordability_score: affordability,
                food_score,
                final_score,
            }
        })
        .collect()
}

/// Income relative to city cost, in [0, 1.5]
///
/// A non-positive or non-finite cost falls back to the default city cost.
#[inline]
pub fn calculate_affordability_score(income: f64, city_cost: f64) -> f64 {
    let cost = if city_cost.is_finite() && city_cost > 0.0 {
        city_cost
    } else {
        DEFAULT_MONTHLY_COST
    };
    let income = if income.is_finite() { income.max(0.0) } else { 0.0 };

    (income / cost).min(AFFORDABILITY_CAP)
}

/// Inverse of an average distance; zero distance maps to the largest value
#[inline]
fn inverted_distance(distance_km: f64) -> f64 {
    if distance_km.is_nan() {
        return 0.0;
    }
    1.0 / distance_km.max(MIN_DISTANCE_KM)
}

/// Divide each value by the largest one
///
/// A non-positive or non-finite maximum leaves the values untouched.
fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !max.is_finite() || max <= 0.0 {
        return values.to_vec();
    }

    values.iter().map(|v| v / max).collect()
}
