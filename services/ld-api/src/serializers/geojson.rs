//! JSON and GeoJSON bodies of the OGC API Features profile.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use profile_negotiation::{media_types, Link};

use crate::entity::Entity;

/// Plain JSON view of an entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureRecord {
    pub id: String,
    pub uri: String,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "isPartOf", skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<String>,

    /// Geometry as WKT.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<String>,

    pub links: Vec<Link>,
}

impl FeatureRecord {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            uri: entity.uri.clone(),
            title: entity.title.clone(),
            description: entity.description.clone(),
            is_part_of: entity.is_part_of.clone(),
            geometry: entity.geometry.as_ref().map(|g| g.wkt.clone()),
            links: entity_links(entity),
        }
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub id: String,

    /// GeoJSON geometry object, null when the entity has none.
    pub geometry: Option<Value>,

    pub properties: FeatureProperties,

    pub links: Vec<Link>,
}

/// Properties of a GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureProperties {
    pub uri: String,
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "isPartOf", skip_serializing_if = "Option::is_none")]
    pub is_part_of: Option<String>,
}

impl Feature {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: entity.id.clone(),
            geometry: entity.geometry.as_ref().and_then(|g| g.geojson.clone()),
            properties: FeatureProperties {
                uri: entity.uri.clone(),
                title: entity.title.clone(),
                description: entity.description.clone(),
                is_part_of: entity.is_part_of.clone(),
            },
            links: entity_links(entity),
        }
    }
}

fn entity_links(entity: &Entity) -> Vec<Link> {
    let mut links = vec![Link::new(&entity.uri, "canonical")
        .with_type(media_types::HTML)
        .with_title(&entity.title)];
    if let Some(ref dataset) = entity.is_part_of {
        links.push(Link::new(dataset, "collection"));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Geometry;
    use serde_json::json;

    fn entity() -> Entity {
        Entity {
            id: "1".to_string(),
            uri: "http://pid.geoscience.gov.au/feature/ga/1".to_string(),
            title: "Pilbara Craton".to_string(),
            description: None,
            is_part_of: Some("http://pid.geoscience.gov.au/dataset/ga/21884".to_string()),
            geometry: Some(Geometry {
                wkt: "POINT (118 -21)".to_string(),
                geojson: Some(json!({"type": "Point", "coordinates": [118.0, -21.0]})),
            }),
            unit: None,
            source_xml: None,
        }
    }

    #[test]
    fn test_feature_serialization() {
        let value = serde_json::to_value(Feature::from_entity(&entity())).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["id"], "1");
        assert_eq!(value["geometry"]["type"], "Point");
        assert_eq!(value["properties"]["title"], "Pilbara Craton");
        assert_eq!(
            value["properties"]["isPartOf"],
            "http://pid.geoscience.gov.au/dataset/ga/21884"
        );
        assert!(value["properties"].get("description").is_none());
        assert_eq!(value["links"][1]["rel"], "collection");
    }

    #[test]
    fn test_feature_without_geometry_has_null_geometry() {
        let mut e = entity();
        e.geometry = None;
        let value = serde_json::to_value(Feature::from_entity(&e)).unwrap();
        assert!(value["geometry"].is_null());
    }

    #[test]
    fn test_feature_record() {
        let value = serde_json::to_value(FeatureRecord::from_entity(&entity())).unwrap();
        assert_eq!(value["geometry"], "POINT (118 -21)");
        assert_eq!(value["links"][0]["rel"], "canonical");
        assert_eq!(value["links"][0]["type"], "text/html");
    }
}
