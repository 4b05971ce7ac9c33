//! # Catalog
//!
//! Businesses and campaigns loaded at startup. Campaign management lives
//! outside this process; the runtime only reads a snapshot.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_types::{Business, Campaign, GeoPoint};
use tracing::info;

use super::config::ConfigError;

/// A JSON catalog file.
///
/// ```json
/// {
///   "businesses": [{ "id": "b1", "name": "Bean There", "location": { "latitude": 40.0, "longitude": -73.0 } }],
///   "campaigns": [{ "id": "c1", "business_id": "b1", "name": "Coffee Club", "stamp_goal": 5, "reward": "Free latte" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub businesses: Vec<Business>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

impl Catalog {
    /// Read and parse a catalog file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::parse(&raw).map_err(|source| ConfigError::CatalogParse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            path = %path.display(),
            businesses = catalog.businesses.len(),
            campaigns = catalog.campaigns.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Built-in catalog for local runs: one ungated and one location-gated campaign.
    pub fn demo() -> Self {
        Self {
            businesses: vec![
                Business {
                    id: "bean-there".into(),
                    name: "Bean There".into(),
                    location: Some(GeoPoint::new(40.7128, -74.0060)),
                },
                Business {
                    id: "crust-club".into(),
                    name: "Crust Club".into(),
                    location: Some(GeoPoint::new(40.7306, -73.9866)),
                },
            ],
            campaigns: vec![
                Campaign::new("coffee-5", "bean-there", "Coffee Club", 5, "Free latte"),
                Campaign::new("pizza-8", "crust-club", "Slice Saver", 8, "Free slice")
                    .with_location_required(100.0),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_applies_campaign_defaults() {
        let catalog = Catalog::parse(
            r#"{
                "businesses": [{ "id": "b1", "name": "Bean There" }],
                "campaigns": [{ "id": "c1", "business_id": "b1", "name": "Coffee Club", "stamp_goal": 5, "reward": "Free latte" }]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.businesses[0].location, None);
        let campaign = &catalog.campaigns[0];
        assert!(campaign.is_active);
        assert!(!campaign.location_required);
        assert_eq!(campaign.proximity_threshold_meters, 100.0);
    }

    #[test]
    fn test_parse_empty_object() {
        assert_eq!(Catalog::parse("{}").unwrap(), Catalog::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, ConfigError::CatalogRead { .. }));
    }

    #[test]
    fn test_demo_is_valid() {
        let catalog = Catalog::demo();
        assert!(catalog.campaigns.iter().all(|c| c.validate().is_ok()));
    }
}
