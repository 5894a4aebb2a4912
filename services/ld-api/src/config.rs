//! API configuration loading and types.
//!
//! Configuration is read from a directory of YAML files:
//!
//! - `profiles.yaml`: the profiles offered for each resource kind
//! - `collections.yaml`: the collections served and where their items live
//!
//! A missing directory or file falls back to the built-in defaults.

use anyhow::{Context, Result};
use profile_negotiation::{
    media_types, MediaTypeDescriptor, ProfileDescriptor, ProfileRegistry,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resource kinds served by the API.
pub mod kinds {
    pub const FEATURE: &str = "feature";
    pub const PROVINCE: &str = "province";
    pub const STRAT_UNIT: &str = "stratunit";
}

/// Canonical profile URIs of the built-in profiles.
pub mod profile_uris {
    pub const OAI: &str = "http://www.opengis.net/spec/ogcapi-features-1/1.0/req/oas30";
    pub const GEOSPARQL: &str = "http://www.opengis.net/ont/geosparql";
    pub const STRAT_UNITS: &str = "https://linked.data.gov.au/def/su";
    pub const LOOP3D: &str = "http://loop3d.org/GSO/ontology/2020/1";
    pub const GSMLB: &str = "http://www.opengis.net/gsml/4.1/GeoSciML-Basic";
}

/// Complete API configuration.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Profiles per resource kind.
    pub profiles: ProfilesConfig,

    /// Collections served by the API.
    pub collections: CollectionsConfig,

    /// Directory the configuration was loaded from, used to resolve data files.
    pub dir: Option<PathBuf>,
}

impl ApiConfig {
    /// Built-in configuration: default profiles and collections, no item data.
    pub fn builtin() -> Self {
        Self {
            profiles: ProfilesConfig::builtin(),
            collections: CollectionsConfig::builtin(),
            dir: None,
        }
    }

    /// Load configuration from a directory of YAML files.
    pub fn load_from_dir(dir: &str) -> Result<Self> {
        let path = Path::new(dir);

        // If directory doesn't exist, return default config
        if !path.exists() {
            tracing::warn!(
                "LD config directory {} does not exist, using built-in defaults",
                dir
            );
            return Ok(Self::builtin());
        }

        let profiles_path = path.join("profiles.yaml");
        let profiles = if profiles_path.exists() {
            let content = std::fs::read_to_string(&profiles_path)
                .with_context(|| format!("Failed to read: {:?}", profiles_path))?;
            let profiles: ProfilesConfig = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse profiles config: {:?}", profiles_path))?;
            tracing::info!(
                "Loaded profiles for {} resource kinds from {:?}",
                profiles.resource_kinds.len(),
                profiles_path
            );
            profiles
        } else {
            tracing::warn!("{:?} not found, using built-in profiles", profiles_path);
            ProfilesConfig::builtin()
        };

        let collections_path = path.join("collections.yaml");
        let collections = if collections_path.exists() {
            let content = std::fs::read_to_string(&collections_path)
                .with_context(|| format!("Failed to read: {:?}", collections_path))?;
            let collections: CollectionsConfig = serde_yaml::from_str(&content).with_context(|| {
                format!("Failed to parse collections config: {:?}", collections_path)
            })?;
            tracing::info!(
                "Loaded {} collections from {:?}",
                collections.collections.len(),
                collections_path
            );
            collections
        } else {
            tracing::warn!("{:?} not found, using built-in collections", collections_path);
            CollectionsConfig::builtin()
        };

        Ok(Self {
            profiles,
            collections,
            dir: Some(path.to_path_buf()),
        })
    }

    /// Build the profile registry, enforcing the registry invariants.
    pub fn build_registry(&self) -> Result<ProfileRegistry> {
        let mut registry = ProfileRegistry::new();
        for entry in &self.profiles.resource_kinds {
            registry
                .register(entry.kind.clone(), entry.profiles.clone())
                .with_context(|| format!("Invalid profiles for resource kind '{}'", entry.kind))?;
        }
        Ok(registry)
    }

    /// Find a collection by ID.
    pub fn find_collection(&self, id: &str) -> Option<&CollectionDefinition> {
        self.collections.collections.iter().find(|c| c.id == id)
    }

    /// Resolve a collection's data file against the config directory.
    pub fn data_path(&self, collection: &CollectionDefinition) -> Option<PathBuf> {
        let data = collection.data.as_ref()?;
        let path = Path::new(data);
        if path.is_absolute() {
            return Some(path.to_path_buf());
        }
        Some(match self.dir {
            Some(ref dir) => dir.join(path),
            None => path.to_path_buf(),
        })
    }
}

/// Profiles for every resource kind, in declaration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilesConfig {
    #[serde(default)]
    pub resource_kinds: Vec<ResourceKindProfiles>,
}

/// The profiles offered for one resource kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceKindProfiles {
    /// Resource kind name (e.g., "stratunit").
    pub kind: String,

    /// Profiles, in advertisement order.
    pub profiles: Vec<ProfileDescriptor>,
}

impl ProfilesConfig {
    /// The profiles shipped with the API.
    pub fn builtin() -> Self {
        Self {
            resource_kinds: vec![
                ResourceKindProfiles {
                    kind: kinds::FEATURE.to_string(),
                    profiles: vec![oai_profile().as_default(), geosparql_profile()],
                },
                ResourceKindProfiles {
                    kind: kinds::PROVINCE.to_string(),
                    profiles: vec![
                        geosparql_profile().as_default(),
                        oai_profile(),
                        gsmlb_profile(),
                    ],
                },
                ResourceKindProfiles {
                    kind: kinds::STRAT_UNIT.to_string(),
                    profiles: vec![
                        geosparql_profile(),
                        loop3d_profile(),
                        strat_units_profile().as_default(),
                        gsmlb_profile(),
                    ],
                },
            ],
        }
    }
}

fn oai_profile() -> ProfileDescriptor {
    ProfileDescriptor::new("oai", profile_uris::OAI, "OGC API Features")
        .with_media_type(MediaTypeDescriptor::default_type(media_types::HTML))
        .with_media_types([media_types::JSON, media_types::GEO_JSON])
}

fn geosparql_profile() -> ProfileDescriptor {
    ProfileDescriptor::new("geosp", profile_uris::GEOSPARQL, "GeoSPARQL")
        .with_media_type(MediaTypeDescriptor::default_type(media_types::TURTLE))
        .with_media_types([
            media_types::JSON_LD,
            media_types::N_TRIPLES,
            media_types::RDF_XML,
        ])
}

fn strat_units_profile() -> ProfileDescriptor {
    ProfileDescriptor::new("su", profile_uris::STRAT_UNITS, "Stratigraphic Units Ontology")
        .with_media_type(MediaTypeDescriptor::default_type(media_types::HTML))
        .with_media_types(media_types::RDF.iter().copied())
}

fn loop3d_profile() -> ProfileDescriptor {
    ProfileDescriptor::new("loop3d", profile_uris::LOOP3D, "Loop3D Geoscience Ontology")
        .with_media_type(MediaTypeDescriptor::default_type(media_types::TURTLE))
        .with_media_types([
            media_types::JSON_LD,
            media_types::N_TRIPLES,
            media_types::RDF_XML,
        ])
}

fn gsmlb_profile() -> ProfileDescriptor {
    ProfileDescriptor::new("gsmlb", profile_uris::GSMLB, "GeoSciML 4.1 Basic")
        .with_media_type(MediaTypeDescriptor::default_type(media_types::XML))
}

/// Collections served by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionsConfig {
    #[serde(default)]
    pub collections: Vec<CollectionDefinition>,
}

impl CollectionsConfig {
    /// The collections shipped with the API, without item data.
    pub fn builtin() -> Self {
        Self {
            collections: vec![
                CollectionDefinition::new("features", kinds::FEATURE, "Geological Features"),
                CollectionDefinition::new("provinces", kinds::PROVINCE, "Geologic Provinces"),
                CollectionDefinition::new("sus", kinds::STRAT_UNIT, "Stratigraphic Units"),
            ],
        }
    }
}

/// Definition of a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionDefinition {
    /// Unique collection identifier, used in URLs.
    pub id: String,

    /// Resource kind of the collection's items.
    pub resource_kind: String,

    /// Human-readable title.
    #[serde(default)]
    pub title: String,

    /// Description of the collection.
    #[serde(default)]
    pub description: String,

    /// Canonical URI of the collection.
    #[serde(default)]
    pub uri: Option<String>,

    /// YAML file holding the collection's items, relative to the config directory.
    #[serde(default)]
    pub data: Option<String>,
}

impl CollectionDefinition {
    pub fn new(id: &str, resource_kind: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            resource_kind: resource_kind.to_string(),
            title: title.to_string(),
            description: String::new(),
            uri: None,
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_is_valid() {
        let config = ApiConfig::builtin();
        let registry = config.build_registry().unwrap();

        let kinds: Vec<&str> = registry.resource_kinds().collect();
        assert_eq!(kinds, vec!["feature", "province", "stratunit"]);

        let sus = registry.lookup("stratunit").unwrap();
        let default = sus.iter().find(|p| p.is_default).unwrap();
        assert_eq!(default.token, "su");
        assert_eq!(default.default_media_type().unwrap().mime_type, "text/html");
    }

    #[test]
    fn test_builtin_collections_reference_registered_kinds() {
        let config = ApiConfig::builtin();
        let registry = config.build_registry().unwrap();
        for collection in &config.collections.collections {
            assert!(registry.contains(&collection.resource_kind));
        }
    }

    #[test]
    fn test_profiles_yaml_parsing() {
        let yaml = r#"
resource_kinds:
  - kind: stratunit
    profiles:
      - token: su
        uri: https://linked.data.gov.au/def/su
        label: Stratigraphic Units
        default: true
        media_types:
          - mime_type: text/html
            default: true
          - mime_type: text/turtle
      - token: gsmlb
        uri: http://www.opengis.net/gsml/4.1/GeoSciML-Basic
        label: GeoSciML Basic
        media_types:
          - mime_type: application/xml
            default: true
"#;
        let profiles: ProfilesConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profiles.resource_kinds.len(), 1);
        assert_eq!(profiles.resource_kinds[0].profiles.len(), 2);
        assert!(profiles.resource_kinds[0].profiles[0].is_default);
        assert!(!profiles.resource_kinds[0].profiles[1].is_default);

        let config = ApiConfig {
            profiles,
            ..Default::default()
        };
        assert!(config.build_registry().is_ok());
    }

    #[test]
    fn test_invalid_profiles_fail_registry_build() {
        let yaml = r#"
resource_kinds:
  - kind: feature
    profiles:
      - token: geosp
        uri: http://www.opengis.net/ont/geosparql
        label: GeoSPARQL
        media_types:
          - mime_type: text/turtle
            default: true
"#;
        let config = ApiConfig {
            profiles: serde_yaml::from_str(yaml).unwrap(),
            ..Default::default()
        };
        let err = config.build_registry().unwrap_err();
        assert!(format!("{:#}", err).contains("exactly one default profile"));
    }

    #[test]
    fn test_load_missing_dir_uses_builtin() {
        let config = ApiConfig::load_from_dir("/nonexistent/ld-config").unwrap();
        assert_eq!(config.collections.collections.len(), 3);
        assert!(config.dir.is_none());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("collections.yaml"),
            r#"
collections:
  - id: sus
    resource_kind: stratunit
    title: Stratigraphic Units
    data: data/sus.yaml
"#,
        )
        .unwrap();

        let config = ApiConfig::load_from_dir(dir.path().to_str().unwrap()).unwrap();
        // profiles.yaml is absent, so the built-in profiles apply
        assert_eq!(config.profiles.resource_kinds.len(), 3);

        let sus = config.find_collection("sus").unwrap();
        assert_eq!(sus.resource_kind, "stratunit");
        assert_eq!(
            config.data_path(sus).unwrap(),
            dir.path().join("data/sus.yaml")
        );
        assert!(config.find_collection("missing").is_none());
    }

    #[test]
    fn test_load_rejects_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("profiles.yaml"), "resource_kinds: [not: {valid").unwrap();
        assert!(ApiConfig::load_from_dir(dir.path().to_str().unwrap()).is_err());
    }
}
