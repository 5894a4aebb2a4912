//! Item handler: negotiates and renders one entity.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::HeaderMap,
    response::Response,
};
use metrics::counter;
use profile_negotiation::{ExceptionResponse, QueryOverrides};
use tracing::{debug, error, instrument};

use crate::content_negotiation::{
    exception_response, negotiation_failure_response, negotiation_request,
    representation_response, serialization_error_response,
};
use crate::handlers::collections::collection_not_found;
use crate::serializers::alternates;
use crate::state::AppState;

/// GET /collections/:collection_id/items/:item_id - Negotiated entity representation
///
/// Negotiation runs before the entity is fetched, so an invalid `_profile`
/// or `_mediatype` is refused even for items that do not exist.
///
/// Repeated negotiation parameters keep their first value.
#[instrument(skip(state, pairs, headers))]
pub async fn get_item_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((collection_id, item_id)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let instance = format!("/collections/{}/items/{}", collection_id, item_id);

    let Some(collection) = state.config.find_collection(&collection_id) else {
        return exception_response(&collection_not_found(&collection_id).with_instance(&instance));
    };
    let resource_kind = collection.resource_kind.as_str();

    let query = QueryOverrides::from_pairs(pairs);
    let request = negotiation_request(&query, &headers);
    let result = match state.engine.negotiate(resource_kind, &request) {
        Ok(result) => result,
        Err(failure) => {
            counter!("ld_negotiation_failures_total", "kind" => failure.kind()).increment(1);
            return negotiation_failure_response(&failure, &instance);
        }
    };

    debug!(
        resource_kind,
        profile = %result.profile.token,
        media_type = %result.media_type,
        profile_resolution = ?result.profile_resolution,
        used_fallback = result.used_fallback,
        "Negotiated representation"
    );
    counter!(
        "ld_requests_total",
        "resource_kind" => resource_kind.to_string(),
        "profile" => result.profile.token.clone(),
        "media_type" => result.media_type.clone()
    )
    .increment(1);
    if result.used_fallback {
        counter!("ld_fallbacks_total").increment(1);
    }

    let entity = match state
        .store
        .fetch_entity(resource_kind, &collection_id, &item_id)
        .await
    {
        Ok(Some(entity)) => entity,
        Ok(None) => {
            return exception_response(
                &ExceptionResponse::not_found(format!(
                    "Item '{}' not found in collection '{}'",
                    item_id, collection_id
                ))
                .with_instance(&instance),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch entity");
            return exception_response(
                &ExceptionResponse::internal_error(format!("Failed to fetch entity: {}", e))
                    .with_instance(&instance),
            );
        }
    };

    let rendered = if result.is_alternates_view() {
        alternates::render(&result, &entity)
    } else {
        state.dispatcher.dispatch(&result, &entity)
    };

    match rendered {
        Ok(rendered) => representation_response(rendered),
        Err(e) => serialization_error_response(&e, &instance),
    }
}
