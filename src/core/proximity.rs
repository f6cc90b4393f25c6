use crate::core::distance::haversine_distance;
use crate::core::sources::{PlaceQuery, PlacesSearch};
use crate::models::{AmenitySelection, GeoPoint, UNREACHABLE_DISTANCE_KM};

/// Default search radius around a candidate, in meters
pub const DEFAULT_AMENITY_RADIUS_M: u32 = 5000;

/// Mean distance from `origin` to each found amenity
///
/// Returns [`UNREACHABLE_DISTANCE_KM`] when nothing was found.
pub fn average_distance<I>(origin: &GeoPoint, nearest: I) -> f64
where
    I: IntoIterator<Item = GeoPoint>,
{
    let (sum, count) = nearest
        .into_iter()
        .map(|place| haversine_distance(origin, &place))
        .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

    if count == 0 {
        UNREACHABLE_DISTANCE_KM
    } else {
        sum / count as f64
    }
}

/// Estimates how close a location is to every selected amenity type
///
/// Issues one limit-1 places query per category. Categories with no result,
/// or whose query failed, contribute no sample.
pub struct AmenityProximityEstimator<'a, P> {
    places: &'a P,
    radius_m: u32,
}

impl<'a, P: PlacesSearch> AmenityProximityEstimator<'a, P> {
    pub fn new(places: &'a P, radius_m: u32) -> Self {
        Self { places, radius_m }
    }

    /// Nearest place per category, skipping categories with nothing nearby
    pub async fn nearest_amenities(
        &self,
        origin: GeoPoint,
        selection: &AmenitySelection,
    ) -> Vec<GeoPoint> {
        let mut found = Vec::with_capacity(selection.len());

        for category in selection.iter() {
            let query = PlaceQuery::nearest(origin, category, self.radius_m);
            match self.places.search(&query).await {
                Ok(results) => match results.into_iter().next() {
                    Some(place) => found.push(place.location),
                    None => {
                        tracing::debug!("No {} within {}m of {:?}", category, self.radius_m, origin);
                    }
                },
                Err(e) => {
                    tracing::warn!("Amenity lookup for {} failed, skipping: {}", category, e);
                }
            }
        }

        found
    }

    /// Average distance in km to the nearest place of each selected category
    pub async fn estimate(&self, origin: GeoPoint, selection: &AmenitySelection) -> f64 {
        if selection.is_empty() {
            return UNREACHABLE_DISTANCE_KM;
        }

        let nearest = self.nearest_amenities(origin, selection).await;
        average_distance(&origin, nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sources::SourceError;
    use crate::models::Place;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns a fixed place per category and counts queries
    struct FixedPlaces {
        by_category: HashMap<String, GeoPoint>,
        failing: Vec<String>,
        queries: Mutex<Vec<PlaceQuery>>,
    }

    impl FixedPlaces {
        fn new(entries: &[(&str, GeoPoint)]) -> Self {
            Self {
                by_category: entries.iter().map(|(c, p)| (c.to_string(), *p)).collect(),
                failing: vec![],
                queries: Mutex::new(vec![]),
            }
        }
    }

    impl PlacesSearch for FixedPlaces {
        async fn search(&self, query: &PlaceQuery) -> Result<Vec<Place>, SourceError> {
            self.queries.lock().unwrap().push(query.clone());
            let category = &query.categories[0];
            if self.failing.contains(category) {
                return Err(SourceError::ApiError("503 Service Unavailable".to_string()));
            }
            Ok(self
                .by_category
                .get(category)
                .map(|p| Place {
                    name: category.clone(),
                    address: "N/A".to_string(),
                    location: *p,
                })
                .into_iter()
                .collect())
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(18.5204, 73.8567)
    }

    #[test]
    fn test_average_distance_empty_is_sentinel() {
        assert_eq!(average_distance(&origin(), Vec::new()), UNREACHABLE_DISTANCE_KM);
    }

    #[test]
    fn test_average_distance_mean() {
        let o = origin();
        let a = GeoPoint::new(18.53, 73.8567);
        let b = GeoPoint::new(18.54, 73.8567);
        let expected = (haversine_distance(&o, &a) + haversine_distance(&o, &b)) / 2.0;

        assert!((average_distance(&o, vec![a, b]) - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_missing_category_is_skipped() {
        let gym = GeoPoint::new(18.53, 73.8567);
        let places = FixedPlaces::new(&[("gym", gym)]);
        let estimator = AmenityProximityEstimator::new(&places, DEFAULT_AMENITY_RADIUS_M);
        let selection = AmenitySelection::new(vec!["gym", "park"]);

        let avg = estimator.estimate(origin(), &selection).await;

        assert!((avg - haversine_distance(&origin(), &gym)).abs() < 1e-12);
        assert_eq!(places.queries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_lookup_is_absorbed() {
        let gym = GeoPoint::new(18.53, 73.8567);
        let mut places = FixedPlaces::new(&[("gym", gym), ("park", GeoPoint::new(18.60, 73.90))]);
        places.failing.push("park".to_string());
        let estimator = AmenityProximityEstimator::new(&places, DEFAULT_AMENITY_RADIUS_M);

        let avg = estimator
            .estimate(origin(), &AmenitySelection::new(vec!["gym", "park"]))
            .await;

        assert!((avg - haversine_distance(&origin(), &gym)).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_nothing_found_is_sentinel() {
        let places = FixedPlaces::new(&[]);
        let estimator = AmenityProximityEstimator::new(&places, DEFAULT_AMENITY_RADIUS_M);

        let avg = estimator
            .estimate(origin(), &AmenitySelection::new(vec!["gym", "park"]))
            .await;

        assert_eq!(avg, UNREACHABLE_DISTANCE_KM);
    }

    #[tokio::test]
    async fn test_empty_selection_issues_no_queries() {
        let places = FixedPlaces::new(&[]);
        let estimator = AmenityProximityEstimator::new(&places, DEFAULT_AMENITY_RADIUS_M);

        let avg = estimator.estimate(origin(), &AmenitySelection::default()).await;

        assert_eq!(avg, UNREACHABLE_DISTANCE_KM);
        assert!(places.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_queries_are_limit_one_within_radius() {
        let places = FixedPlaces::new(&[]);
        let estimator = AmenityProximityEstimator::new(&places, 1200);

        estimator
            .estimate(origin(), &AmenitySelection::new(vec!["gym"]))
            .await;

        let queries = places.queries.lock().unwrap();
        assert_eq!(queries[0].limit, 1);
        assert_eq!(queries[0].radius_m, 1200);
        assert_eq!(queries[0].categories, vec!["gym"]);
    }
}
