use crate::models::{CityCostEntry, CityProfile, DEFAULT_MONTHLY_COST};
use std::collections::HashMap;

/// Representative monthly living cost per city, in rupees
const BUILTIN_COSTS: [(&str, f64); 20] = [
    ("Delhi", 40000.0),
    ("Mumbai", 45000.0),
    ("Bangalore", 42000.0),
    ("Hyderabad", 37000.0),
    ("Ahmedabad", 35000.0),
    ("Chennai", 39000.0),
    ("Kolkata", 36000.0),
    ("Pune", 38000.0),
    ("Jaipur", 32000.0),
    ("Lucknow", 31000.0),
    ("Kanpur", 30000.0),
    ("Nagpur", 32000.0),
    ("Indore", 31000.0),
    ("Thane", 35000.0),
    ("Bhopal", 30000.0),
    ("Visakhapatnam", 33000.0),
    ("Patna", 29000.0),
    ("Vadodara", 31000.0),
    ("Ghaziabad", 34000.0),
    ("Ludhiana", 30000.0),
];

/// Static city cost-of-living lookup
///
/// Lookups are exact-name matches. Unknown cities, and entries that are not
/// positive, resolve to the default cost so a profile's cost is always > 0.
#[derive(Debug, Clone)]
pub struct CityCostTable {
    costs: HashMap<String, f64>,
    default_cost: f64,
}

impl CityCostTable {
    /// Built-in table with the default fallback cost
    pub fn builtin() -> Self {
        Self {
            costs: BUILTIN_COSTS
                .iter()
                .map(|(name, cost)| (name.to_string(), *cost))
                .collect(),
            default_cost: DEFAULT_MONTHLY_COST,
        }
    }

    /// Built-in table extended or overridden by configured entries
    pub fn with_overrides(overrides: &HashMap<String, f64>, default_cost: Option<f64>) -> Self {
        let mut table = Self::builtin();
        table.costs.extend(overrides.iter().map(|(k, v)| (k.clone(), *v)));
        if let Some(cost) = default_cost.filter(|c| c.is_finite() && *c > 0.0) {
            table.default_cost = cost;
        }
        table
    }

    pub fn default_cost(&self) -> f64 {
        self.default_cost
    }

    /// Monthly cost for a city, falling back to the default
    pub fn cost_for(&self, city: &str) -> f64 {
        self.costs
            .get(city)
            .copied()
            .filter(|c| c.is_finite() && *c > 0.0)
            .unwrap_or(self.default_cost)
    }

    pub fn profile(&self, city: &str) -> CityProfile {
        CityProfile {
            name: city.to_string(),
            estimated_monthly_cost: self.cost_for(city),
        }
    }

    /// All entries sorted by city name
    pub fn entries(&self) -> Vec<CityCostEntry> {
        let mut entries: Vec<CityCostEntry> = self
            .costs
            .iter()
            .map(|(name, _)| CityCostEntry {
                name: name.clone(),
                estimated_monthly_cost: self.cost_for(name),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

impl Default for CityCostTable {
    fn default() -> Self {
        Self::builtin()
    }
}
