//! Profile listing handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::Response,
};
use profile_negotiation::ExceptionResponse;

use crate::content_negotiation::{exception_response, json_response};
use crate::serializers::alternates::AlternatesView;
use crate::state::AppState;

/// GET /profiles/:resource_kind - The profiles registered for a resource kind
pub async fn profiles_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(resource_kind): Path<String>,
) -> Response {
    match state.engine.registry().lookup(&resource_kind) {
        Ok(profiles) => {
            let href = format!("{}/profiles/{}", state.base_url, resource_kind);
            json_response(&AlternatesView::new(&href, profiles))
        }
        Err(e) => exception_response(&ExceptionResponse::not_found(e.to_string())),
    }
}
