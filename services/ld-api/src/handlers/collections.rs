//! Collection metadata handlers.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};
use profile_negotiation::{media_types, ExceptionResponse, Link};
use serde::Serialize;

use crate::config::CollectionDefinition;
use crate::content_negotiation::{exception_response, json_response};
use crate::state::AppState;

/// A collection as listed by the API.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub id: String,
    pub title: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(rename = "resourceKind")]
    pub resource_kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    pub links: Vec<Link>,
}

impl Collection {
    pub fn from_definition(definition: &CollectionDefinition, base_url: &str) -> Self {
        let href = format!("{}/collections/{}", base_url, definition.id);
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            resource_kind: definition.resource_kind.clone(),
            uri: definition.uri.clone(),
            links: vec![
                Link::new(&href, "self")
                    .with_type(media_types::JSON)
                    .with_title(&definition.title),
                Link::new(
                    format!("{}/profiles/{}", base_url, definition.resource_kind),
                    "profiles",
                )
                .with_type(media_types::JSON),
            ],
        }
    }
}

/// Body of the collections listing.
#[derive(Debug, Clone, Serialize)]
pub struct Collections {
    pub links: Vec<Link>,
    pub collections: Vec<Collection>,
}

/// GET /collections - List collections
pub async fn list_collections_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let collections = Collections {
        links: vec![Link::new(format!("{}/collections", state.base_url), "self")
            .with_type(media_types::JSON)],
        collections: state
            .config
            .collections
            .collections
            .iter()
            .map(|c| Collection::from_definition(c, &state.base_url))
            .collect(),
    };
    json_response(&collections)
}

/// GET /collections/:collection_id - Collection metadata
pub async fn get_collection_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(collection_id): Path<String>,
) -> Response {
    match state.config.find_collection(&collection_id) {
        Some(definition) => json_response(&Collection::from_definition(definition, &state.base_url)),
        None => exception_response(&collection_not_found(&collection_id)),
    }
}

pub fn collection_not_found(collection_id: &str) -> ExceptionResponse {
    ExceptionResponse::not_found(format!("Collection '{}' not found", collection_id))
}
