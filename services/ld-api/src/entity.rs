//! Geological entities and the store they are fetched from.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ApiConfig;

/// GA unit-of-measure URI for millions of years.
pub const UOM_MA: &str = "http://pid.geoscience.gov.au/def/voc/ga/uom/Ma";

/// QUDT unit for years.
pub const QUDT_UNIT_YEAR: &str = "http://qudt.org/vocab/unit/YR";

/// A geological entity: a feature, a province or a stratigraphic unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier, unique within its collection.
    pub id: String,

    /// Canonical URI.
    pub uri: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URI of the dataset the entity belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,

    /// Stratigraphic unit properties, for units only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<StratUnitProperties>,

    /// The upstream GeoSciML document, served verbatim by the `gsmlb` profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_xml: Option<String>,
}

/// Entity geometry in the encodings the serializers need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Well-known text, used by the RDF serializers.
    pub wkt: String,

    /// GeoJSON geometry object, used by the JSON serializers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geojson: Option<serde_json::Value>,
}

/// Properties of a stratigraphic unit. All vocabulary values are URIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StratUnitProperties {
    #[serde(default)]
    pub observation_method: Option<String>,
    #[serde(default)]
    pub geologic_unit_type: Option<String>,
    #[serde(default)]
    pub description_purpose: Option<String>,
    #[serde(default)]
    pub stratigraphic_rank: Option<String>,

    /// CGI event process URI of the unit's geologic history.
    #[serde(default)]
    pub event_process: Option<String>,

    #[serde(default)]
    pub younger_bound: Option<AgeBound>,
    #[serde(default)]
    pub older_bound: Option<AgeBound>,
    #[serde(default)]
    pub younger_named_age: Option<String>,
    #[serde(default)]
    pub older_named_age: Option<String>,

    #[serde(default)]
    pub hierarchy_links: Vec<HierarchyLink>,
}

impl StratUnitProperties {
    /// Whether any geologic history is recorded.
    pub fn has_history(&self) -> bool {
        self.event_process.is_some()
            || self.younger_bound.is_some()
            || self.older_bound.is_some()
            || self.younger_named_age.is_some()
            || self.older_named_age.is_some()
    }

    /// Whether any age (named or numeric) is recorded.
    pub fn has_age(&self) -> bool {
        self.younger_bound.is_some()
            || self.older_bound.is_some()
            || self.younger_named_age.is_some()
            || self.older_named_age.is_some()
    }
}

/// A numeric age bound with its unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeBound {
    pub value: f64,

    /// Unit of measure URI.
    pub uom: String,
}

impl AgeBound {
    pub fn new(value: f64, uom: impl Into<String>) -> Self {
        Self {
            value,
            uom: uom.into(),
        }
    }

    /// Whether the bound is given in millions of years.
    pub fn is_ma(&self) -> bool {
        self.uom == UOM_MA
    }

    /// The bound as a QUDT quantity: Ma values are converted to years,
    /// anything else is passed through with its own unit.
    pub fn as_quantity(&self) -> (f64, &str) {
        if self.is_ma() {
            (self.value * 1_000_000.0, QUDT_UNIT_YEAR)
        } else {
            (self.value, self.uom.as_str())
        }
    }
}

/// A link from a unit to a related unit in the stratigraphic hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyLink {
    /// Role predicate URI.
    pub role: String,

    /// Target unit URI.
    pub target_unit: String,
}

/// Source of entities for the item endpoints.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch an item of a collection, or `None` if it does not exist.
    async fn fetch_entity(
        &self,
        resource_kind: &str,
        collection_id: &str,
        item_id: &str,
    ) -> Result<Option<Entity>>;
}

/// Shape of a collection data file.
#[derive(Debug, Deserialize)]
struct ItemsFile {
    #[serde(default)]
    items: Vec<Entity>,
}

/// In-memory store of the items listed in the collections' data files.
#[derive(Debug, Default)]
pub struct CatalogStore {
    items: HashMap<(String, String), Entity>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the data file of every configured collection.
    ///
    /// Collections without a data file start empty.
    pub fn load(config: &ApiConfig) -> Result<Self> {
        let mut store = Self::new();

        for collection in &config.collections.collections {
            let Some(path) = config.data_path(collection) else {
                warn!(collection = %collection.id, "Collection has no data file");
                continue;
            };

            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read collection data: {:?}", path))?;
            let file: ItemsFile = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse collection data: {:?}", path))?;

            info!(
                collection = %collection.id,
                items = file.items.len(),
                "Loaded collection items"
            );
            for entity in file.items {
                store.insert(&collection.id, entity);
            }
        }

        Ok(store)
    }

    /// Add or replace an item.
    pub fn insert(&mut self, collection_id: &str, entity: Entity) {
        self.items
            .insert((collection_id.to_string(), entity.id.clone()), entity);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[async_trait]
impl EntityStore for CatalogStore {
    async fn fetch_entity(
        &self,
        resource_kind: &str,
        collection_id: &str,
        item_id: &str,
    ) -> Result<Option<Entity>> {
        debug!(resource_kind, collection_id, item_id, "Fetching entity");
        Ok(self
            .items
            .get(&(collection_id.to_string(), item_id.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionDefinition;

    const SUS_YAML: &str = r#"
items:
  - id: "12345"
    uri: https://pid.geoscience.gov.au/def/stratname/ga/SU12345
    title: Mulga Downs Group
    is_part_of: http://example.com/dataset/auststrat/sus
    unit:
      stratigraphic_rank: http://resource.geosciml.org/classifier/cgi/stratigraphicrank/group
      event_process: http://resource.geosciml.org/classifier/cgi/eventprocess/deposition
      younger_bound:
        value: 359.2
        uom: http://pid.geoscience.gov.au/def/voc/ga/uom/Ma
      hierarchy_links:
        - role: http://pid.geoscience.gov.au/def/voc/stratigraphichierarchy/isPartOf
          target_unit: https://pid.geoscience.gov.au/def/stratname/ga/SU1
"#;

    #[test]
    fn test_age_bound_ma_converts_to_years() {
        let bound = AgeBound::new(1.5, UOM_MA);
        assert_eq!(bound.as_quantity(), (1_500_000.0, QUDT_UNIT_YEAR));
    }

    #[test]
    fn test_age_bound_other_unit_passes_through() {
        let bound = AgeBound::new(42.0, "http://qudt.org/vocab/unit/KiloYR");
        assert_eq!(bound.as_quantity(), (42.0, "http://qudt.org/vocab/unit/KiloYR"));
    }

    #[test]
    fn test_history_flags() {
        let mut unit = StratUnitProperties::default();
        assert!(!unit.has_history());
        unit.event_process = Some("http://example.com/ep".to_string());
        assert!(unit.has_history());
        assert!(!unit.has_age());
        unit.older_named_age = Some("http://example.com/age".to_string());
        assert!(unit.has_age());
    }

    #[tokio::test]
    async fn test_catalog_store_loads_collection_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sus.yaml"), SUS_YAML).unwrap();

        let mut collection = CollectionDefinition::new("sus", "stratunit", "Stratigraphic Units");
        collection.data = Some("sus.yaml".to_string());
        let mut config = ApiConfig::builtin();
        config.collections.collections = vec![collection];
        config.dir = Some(dir.path().to_path_buf());

        let store = CatalogStore::load(&config).unwrap();
        assert_eq!(store.len(), 1);

        let entity = store
            .fetch_entity("stratunit", "sus", "12345")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entity.title, "Mulga Downs Group");
        let unit = entity.unit.unwrap();
        assert_eq!(unit.younger_bound.unwrap().value, 359.2);
        assert_eq!(unit.hierarchy_links.len(), 1);

        assert!(store
            .fetch_entity("stratunit", "provinces", "12345")
            .await
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_catalog_store_insert_replaces() {
        let mut store = CatalogStore::new();
        let mut entity: Entity = serde_yaml::from_str(
            "id: '1'\nuri: http://pid.geoscience.gov.au/feature/ga/1\ntitle: Old",
        )
        .unwrap();
        store.insert("features", entity.clone());
        entity.title = "New".to_string();
        store.insert("features", entity);
        assert_eq!(store.len(), 1);

        let fetched = tokio_test::block_on(store.fetch_entity("feature", "features", "1"))
            .unwrap()
            .unwrap();
        assert_eq!(fetched.title, "New");
    }

    #[test]
    fn test_catalog_store_missing_data_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = CollectionDefinition::new("sus", "stratunit", "Stratigraphic Units");
        collection.data = Some("missing.yaml".to_string());
        let mut config = ApiConfig::builtin();
        config.collections.collections = vec![collection];
        config.dir = Some(dir.path().to_path_buf());

        assert!(CatalogStore::load(&config).is_err());
    }

    #[test]
    fn test_catalog_store_without_data_files_is_empty() {
        let store = CatalogStore::load(&ApiConfig::builtin()).unwrap();
        assert!(store.is_empty());
    }
}
