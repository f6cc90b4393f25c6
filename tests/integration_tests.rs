// Integration tests for the recommendation pipeline

mod common;

use common::{north_of, place, pune, FakeGeocoder, FakePlaces};
use reloc_algo::core::{RecommendError, RecommendationInput, Recommender, TOP_N};
use reloc_algo::models::{AmenitySelection, FoodPreferences, GeoPoint, UNREACHABLE_DISTANCE_KM};
use reloc_algo::services::{CachedPlacesSearch, CityCostTable};

const GYM: &str = "4bf58dd8d48988d175941735";
const PARK: &str = "4bf58dd8d48988d163941735";

fn input(city: &str, income: f64, categories: &[&str]) -> RecommendationInput {
    RecommendationInput {
        city: city.to_string(),
        income,
        food: FoodPreferences::default(),
        amenities: AmenitySelection::new(categories.iter().copied()),
    }
}

fn candidate_a() -> GeoPoint {
    GeoPoint::new(18.50, 73.80)
}

fn candidate_b() -> GeoPoint {
    GeoPoint::new(18.55, 73.90)
}

#[tokio::test]
async fn test_pune_gym_scenario() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let places = FakePlaces::new(vec![place("Far Heights", candidate_b()), place("Gym Villas", candidate_a())])
        .with_amenity(GYM, north_of(candidate_a(), 0.5))
        .with_amenity(GYM, north_of(candidate_b(), 3.0));

    let result = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap();

    assert_eq!(result.total_candidates, 2);
    assert_eq!(result.city.estimated_monthly_cost, 38000.0);

    let first = &result.recommendations[0];
    let second = &result.recommendations[1];
    assert_eq!(first.candidate.name, "Gym Villas");
    assert_eq!(first.proximity_score, 1.0);
    assert!((first.avg_amenity_distance_km - 0.5).abs() < 1e-6);

    assert_eq!(second.candidate.name, "Far Heights");
    assert!(second.proximity_score < 1.0);
    assert!((second.avg_amenity_distance_km - 3.0).abs() < 1e-6);
    assert!((second.proximity_score - 0.5 / 3.0).abs() < 1e-6);

    for scored in &result.recommendations {
        assert!((scored.affordability_score - 45000.0 / 38000.0).abs() < 1e-12);
        assert_eq!(scored.food_score, 1.0);
    }
}

#[tokio::test]
async fn test_one_query_per_category_per_candidate() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let places = FakePlaces::new(vec![place("A", candidate_a()), place("B", candidate_b())])
        .with_amenity(GYM, north_of(candidate_a(), 1.0));

    Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM, PARK]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap();

    // one candidate fetch + 2 candidates x 2 categories
    assert_eq!(places.query_count(), 5);
    let queries = places.queries.lock().unwrap();
    assert_eq!(queries[0].limit, 20);
    assert_eq!(queries[0].radius_m, 5000);
    assert_eq!(queries[0].center, pune());
    assert!(queries[1..].iter().all(|q| q.limit == 1 && q.categories.len() == 1));
}

#[tokio::test]
async fn test_unreachable_candidate_ranks_last() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let places = FakePlaces::new(vec![
        place("Nowhere", candidate_b()),
        place("Near", candidate_a()),
        place("Mid", north_of(candidate_a(), 1.0)),
    ])
    .with_amenity(GYM, north_of(candidate_a(), 0.2))
    .with_amenity(PARK, north_of(candidate_a(), 0.4));

    let result = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM, PARK]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap();

    let last = result.recommendations.last().unwrap();
    assert_eq!(last.candidate.name, "Nowhere");
    assert_eq!(last.avg_amenity_distance_km, UNREACHABLE_DISTANCE_KM);
    assert!(last.is_unreachable());
    assert!(result.recommendations[..2].iter().all(|s| !s.is_unreachable()));
    assert!(last.proximity_score > 0.0);
    assert!(result
        .recommendations
        .iter()
        .all(|s| s.proximity_score >= last.proximity_score));
}

#[tokio::test]
async fn test_no_candidates_found() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let places = FakePlaces::new(vec![]);

    let err = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendError::NoCandidatesFound(ref city) if city == "Pune"));
}

#[tokio::test]
async fn test_location_not_found() {
    let geocoder = FakeGeocoder::with(&[]);
    let places = FakePlaces::new(vec![place("A", candidate_a())]);

    let err = Recommender::default()
        .recommend(input("Atlantis", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendError::LocationNotFound(_)));
    assert_eq!(places.query_count(), 0);
}

#[tokio::test]
async fn test_no_amenity_selection_blocks_run() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let places = FakePlaces::new(vec![place("A", candidate_a())]);

    let err = Recommender::default()
        .recommend(input("Pune", 45000.0, &[]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap_err();

    assert!(matches!(err, RecommendError::NoAmenitySelection));
    assert_eq!(places.query_count(), 0);
}

#[tokio::test]
async fn test_upstream_failures_are_terminal() {
    let mut geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let mut places = FakePlaces::new(vec![place("A", candidate_a())]);
    places.fail_candidates = true;

    let err = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::Places(_)));

    geocoder.fail = true;
    let err = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap_err();
    assert!(matches!(err, RecommendError::Geocoding(_)));
}

#[tokio::test]
async fn test_unknown_city_uses_default_cost() {
    let shimla = GeoPoint::new(31.1048, 77.1734);
    let geocoder = FakeGeocoder::with(&[("Shimla", shimla)]);
    let places = FakePlaces::new(vec![place("Mall Road", shimla)]);

    let result = Recommender::default()
        .recommend(input("Shimla", 15000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap();

    assert_eq!(result.city.estimated_monthly_cost, 30000.0);
    assert_eq!(result.recommendations[0].affordability_score, 0.5);
}

#[tokio::test]
async fn test_top_ten_with_stable_ties() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let candidates = (1..=20)
        .map(|i| place(&format!("Society {}", i), north_of(pune(), i as f64 * 0.1)))
        .collect();
    let places = FakePlaces::new(candidates);

    let result = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &places, &CityCostTable::builtin())
        .await
        .unwrap();

    assert_eq!(result.total_candidates, 20);
    assert_eq!(result.recommendations.len(), TOP_N);

    // Nothing reachable: every score ties and input order is kept
    let serials: Vec<usize> = result.recommendations.iter().map(|s| s.candidate.serial).collect();
    assert_eq!(serials, (1..=10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_cached_places_preserve_results() {
    let geocoder = FakeGeocoder::with(&[("Pune", pune())]);
    let build = || {
        FakePlaces::new(vec![place("A", candidate_a()), place("A twin", candidate_a()), place("B", candidate_b())])
            .with_amenity(GYM, north_of(candidate_a(), 0.5))
            .with_amenity(GYM, north_of(candidate_b(), 3.0))
    };

    let plain = build();
    let expected = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &plain, &CityCostTable::builtin())
        .await
        .unwrap();

    let cached = CachedPlacesSearch::new(build(), 100, 60, 0.001);
    let actual = Recommender::default()
        .recommend(input("Pune", 45000.0, &[GYM]), &geocoder, &cached, &CityCostTable::builtin())
        .await
        .unwrap();

    assert_eq!(expected.recommendations, actual.recommendations);
    assert!(cached.stats().enabled);
}
