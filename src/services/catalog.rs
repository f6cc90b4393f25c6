use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading the category catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open catalog: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unknown amenity: {0}")]
    UnknownAmenity(String),
}

/// An amenity category split into super and sub category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityCategory {
    pub id: String,
    pub super_category: String,
    pub sub_category: String,
}

/// Sub categories of one super category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub super_category: String,
    pub categories: Vec<AmenityCategory>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Category ID")]
    id: String,
    #[serde(rename = "Category Label")]
    label: String,
}

/// Amenity categories a user can pick from
///
/// Loaded from a CSV with `Category ID` and `Category Label` columns, where
/// labels look like `Super > Sub > ...`. Only the first separator splits.
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    categories: Vec<AmenityCategory>,
}

impl CategoryCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut categories = Vec::new();

        for row in reader.deserialize() {
            let row: CatalogRow = row?;
            let Some((super_category, sub_category)) = row.label.split_once(" > ") else {
                continue;
            };
            let (super_category, sub_category) = (super_category.trim(), sub_category.trim());
            if super_category.is_empty() || sub_category.is_empty() {
                continue;
            }

            categories.push(AmenityCategory {
                id: row.id.trim().to_string(),
                super_category: super_category.to_string(),
                sub_category: sub_category.to_string(),
            });
        }

        Ok(Self { categories })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load from `path`, or an empty catalog if it cannot be read
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(catalog) => {
                tracing::info!("Loaded {} amenity categories from {}", catalog.len(), path.display());
                catalog
            }
            Err(e) => {
                tracing::warn!("Amenity catalog unavailable at {} ({}), only category ids accepted", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories grouped by super category, both sorted alphabetically
    pub fn groups(&self) -> Vec<CategoryGroup> {
        let mut groups: Vec<CategoryGroup> = Vec::new();
        for category in &self.categories {
            match groups.iter_mut().find(|g| g.super_category == category.super_category) {
                Some(group) => group.categories.push(category.clone()),
                None => groups.push(CategoryGroup {
                    super_category: category.super_category.clone(),
                    categories: vec![category.clone()],
                }),
            }
        }

        groups.sort_by(|a, b| a.super_category.cmp(&b.super_category));
        for group in &mut groups {
            group.categories.sort_by(|a, b| a.sub_category.cmp(&b.sub_category));
        }
        groups
    }

    /// Category ids for the given sub category labels
    ///
    /// A label shared by several super categories yields every matching id.
    pub fn resolve(&self, labels: &[String]) -> Result<Vec<String>, CatalogError> {
        let mut ids = Vec::new();
        for label in labels {
            let label = label.trim();
            let matches: Vec<&AmenityCategory> = self
                .categories
                .iter()
                .filter(|c| c.sub_category == label)
                .collect();
            if matches.is_empty() {
                return Err(CatalogError::UnknownAmenity(label.to_string()));
            }
            ids.extend(matches.into_iter().map(|c| c.id.clone()));
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Category ID,Category Label
4bf58dd8d48988d175941735,Sports and Recreation > Gym and Studio
4bf58dd8d48988d163941735,Landmarks and Outdoors > Park
4bf58dd8d48988d196941735,Health and Medicine > Hospital
52e81612bcbc57f1066b7a38,Landmarks and Outdoors
56aa371be4b08b9a8d573562,Retail > Food and Beverage Retail > Grocery Store
";

    #[test]
    fn test_parse_and_drop_top_level_rows() {
        let catalog = CategoryCatalog::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_split_on_first_separator() {
        let catalog = CategoryCatalog::from_reader(SAMPLE.as_bytes()).unwrap();
        let retail = catalog
            .groups()
            .into_iter()
            .find(|g| g.super_category == "Retail")
            .unwrap();
        assert_eq!(retail.categories[0].sub_category, "Food and Beverage Retail > Grocery Store");
    }

    #[test]
    fn test_groups_sorted() {
        let catalog = CategoryCatalog::from_reader(SAMPLE.as_bytes()).unwrap();
        let names: Vec<String> = catalog.groups().into_iter().map(|g| g.super_category).collect();
        assert_eq!(
            names,
            vec!["Health and Medicine", "Landmarks and Outdoors", "Retail", "Sports and Recreation"]
        );
    }

    #[test]
    fn test_resolve_labels() {
        let catalog = CategoryCatalog::from_reader(SAMPLE.as_bytes()).unwrap();

        let ids = catalog
            .resolve(&["Gym and Studio".to_string(), "Park".to_string()])
            .unwrap();
        assert_eq!(ids, vec!["4bf58dd8d48988d175941735", "4bf58dd8d48988d163941735"]);

        assert!(matches!(
            catalog.resolve(&["Casino".to_string()]),
            Err(CatalogError::UnknownAmenity(_))
        ));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let catalog = CategoryCatalog::load_or_empty("does/not/exist.csv");
        assert!(catalog.is_empty());
    }
}
