//! Landing page handler.

use std::sync::Arc;

use axum::{extract::Extension, response::Response};
use profile_negotiation::{media_types, LandingPage, Link};

use crate::content_negotiation::json_response;
use crate::state::AppState;

pub const API_TITLE: &str = "OGC LD API";
pub const API_DESCRIPTION: &str =
    "Geological features, provinces and stratigraphic units with content negotiation by profile";

/// GET / - Landing page
pub async fn landing_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    json_response(&landing_page(&state))
}

pub fn landing_page(state: &AppState) -> LandingPage {
    let mut landing = LandingPage::new(API_TITLE, API_DESCRIPTION, &state.base_url)
        .with_version(env!("CARGO_PKG_VERSION"));
    for kind in state.engine.registry().resource_kinds() {
        landing = landing.with_link(
            Link::new(format!("{}/profiles/{}", state.base_url, kind), "profiles")
                .with_type(media_types::JSON)
                .with_title(format!("Profiles for {}", kind)),
        );
    }
    landing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::entity::CatalogStore;

    #[test]
    fn test_landing_page_links() {
        let state = AppState::new(
            ApiConfig::builtin(),
            Arc::new(CatalogStore::new()),
            "http://localhost:8084",
        )
        .unwrap();
        let landing = landing_page(&state);

        assert_eq!(landing.title, "OGC LD API");
        assert!(landing.links.iter().any(|l| l.rel == "self"));
        assert!(landing
            .links
            .iter()
            .any(|l| l.href == "http://localhost:8084/collections" && l.rel == "data"));
        assert_eq!(landing.links.iter().filter(|l| l.rel == "profiles").count(), 3);
    }
}
