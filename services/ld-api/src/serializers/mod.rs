//! Serializers for the shipped profiles, and the dispatcher table built from them.
//!
//! | Profile  | Media types                                  | Body                          |
//! |----------|----------------------------------------------|-------------------------------|
//! | `oai`    | HTML, JSON, GeoJSON                          | feature page / record / Feature |
//! | `geosp`  | Turtle, JSON-LD, N-Triples, RDF/XML, JSON    | GeoSPARQL graph               |
//! | `su`     | HTML, Turtle, JSON-LD, N-Triples, RDF/XML, JSON | unit page / SU graph       |
//! | `loop3d` | Turtle, JSON-LD, N-Triples, RDF/XML, JSON    | Loop3D GSO graph              |
//! | `gsmlb`  | XML                                          | stored GeoSciML document      |

pub mod alternates;
pub mod geojson;
pub mod graphs;
pub mod html;
pub mod rdf;

use bytes::Bytes;
use profile_negotiation::{media_types, ProfileRegistry, RenderDispatcher, SerializationError, Serializer};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::entity::Entity;

/// Build the dispatcher for every (profile, media type) pair the registry
/// declares and a serializer exists for.
pub fn build_dispatcher(registry: &ProfileRegistry) -> RenderDispatcher<Entity> {
    let mut dispatcher = RenderDispatcher::new();
    for kind in registry.resource_kinds() {
        let Ok(profiles) = registry.lookup(kind) else {
            continue;
        };
        for profile in profiles {
            for media_type in &profile.media_types {
                if let Some(serializer) = serializer_for(&profile.token, &media_type.mime_type) {
                    debug!(
                        resource_kind = kind,
                        profile = %profile.token,
                        media_type = %media_type.mime_type,
                        "Registered serializer"
                    );
                    dispatcher.register(kind, &profile.token, &media_type.mime_type, serializer);
                }
            }
        }
    }
    dispatcher
}

fn is_rdf(media_type: &str) -> bool {
    media_types::RDF.contains(&media_type) || media_type == media_types::JSON
}

/// The serializer for a profile token and media type, if one is implemented.
pub fn serializer_for(profile_token: &str, media_type: &str) -> Option<Serializer<Entity>> {
    let owned = media_type.to_string();
    let serializer: Serializer<Entity> = match (profile_token, media_type) {
        ("oai", media_types::HTML) => Box::new(feature_html),
        ("oai", media_types::JSON) => Box::new(|e: &Entity| {
            to_json(&geojson::FeatureRecord::from_entity(e), media_types::JSON)
        }),
        ("oai", media_types::GEO_JSON) => Box::new(|e: &Entity| {
            to_json(&geojson::Feature::from_entity(e), media_types::GEO_JSON)
        }),
        ("geosp", mt) if is_rdf(mt) => {
            Box::new(move |e: &Entity| graphs::geosp_graph(e).serialize(&owned))
        }
        ("su", media_types::HTML) => Box::new(strat_unit_html),
        ("su", mt) if is_rdf(mt) => Box::new(move |e: &Entity| graphs::su_graph(e).serialize(&owned)),
        ("loop3d", mt) if is_rdf(mt) => {
            Box::new(move |e: &Entity| graphs::loop3d_graph(e).serialize(&owned))
        }
        ("gsmlb", media_types::XML) => Box::new(source_document),
        _ => return None,
    };
    Some(serializer)
}

fn feature_html(entity: &Entity) -> Result<Bytes, SerializationError> {
    Ok(Bytes::from(html::feature_page(entity)))
}

fn strat_unit_html(entity: &Entity) -> Result<Bytes, SerializationError> {
    Ok(Bytes::from(html::strat_unit_page(entity)))
}

fn to_json<T: serde::Serialize>(value: &T, media_type: &str) -> Result<Bytes, SerializationError> {
    serde_json::to_vec_pretty(value)
        .map(Bytes::from)
        .map_err(|e| SerializationError::encoding(media_type, e))
}

/// The stored upstream GeoSciML document, checked to be well-formed.
fn source_document(entity: &Entity) -> Result<Bytes, SerializationError> {
    let xml = entity
        .source_xml
        .as_deref()
        .ok_or_else(|| SerializationError::MissingSource {
            entity: entity.id.clone(),
            profile: "gsmlb".to_string(),
        })?;

    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(SerializationError::encoding(media_types::XML, e)),
        }
    }

    Ok(Bytes::copy_from_slice(xml.as_bytes()))
}
