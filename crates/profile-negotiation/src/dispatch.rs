//! Render dispatch.
//!
//! Maps a negotiated (resource kind, profile, media type) triple to the
//! serializer that produces its bytes, and builds the response headers that
//! identify the profile and advertise the alternates.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;

use crate::errors::SerializationError;
use crate::headers;
use crate::negotiation::NegotiationResult;
use crate::registry::ProfileRegistry;
use crate::types::{link_header, Link};

/// Turns an entity into the bytes of one representation.
pub type Serializer<E> = Box<dyn Fn(&E) -> Result<Bytes, SerializationError> + Send + Sync>;

/// `Vary` value: the representation depends on both negotiation headers.
pub const VARY: &str = "Accept, Accept-Profile";

/// Headers describing a negotiated representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Type`: the negotiated media type.
    pub content_type: String,

    /// `Content-Profile`: the chosen profile URI in angle brackets.
    pub content_profile: String,

    /// `Link`: the chosen profile plus one `rel="alternate"` entry per alternate.
    pub link: String,

    /// `Vary`: the negotiation header names.
    pub vary: &'static str,
}

impl ResponseHeaders {
    /// Build the headers for a negotiation result.
    pub fn for_result(result: &NegotiationResult) -> Self {
        let mut links = Vec::with_capacity(result.alternates.len() + 1);
        links.push(Link::new(&result.profile.uri, "profile"));
        links.extend(result.alternates.iter().map(|p| {
            Link::new(&p.uri, "alternate")
                .with_title(&p.label)
                .with_token(&p.token)
        }));

        Self {
            content_type: result.media_type.clone(),
            content_profile: format!("<{}>", result.profile.uri),
            link: link_header(&links),
            vary: VARY,
        }
    }

    /// Header name/value pairs, in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (headers::CONTENT_TYPE, self.content_type.as_str()),
            (headers::CONTENT_PROFILE, self.content_profile.as_str()),
            (headers::LINK, self.link.as_str()),
            (headers::VARY, self.vary),
        ]
        .into_iter()
    }
}

/// A rendered body with its response headers.
#[derive(Debug, Clone)]
pub struct RenderedRepresentation {
    pub body: Bytes,
    pub headers: ResponseHeaders,
}

/// Serializer table keyed by (resource kind, profile token, media type).
pub struct RenderDispatcher<E> {
    serializers: HashMap<(String, String, String), Serializer<E>>,
}

impl<E> Default for RenderDispatcher<E> {
    fn default() -> Self {
        Self {
            serializers: HashMap::new(),
        }
    }
}

impl<E> fmt::Debug for RenderDispatcher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.serializers.keys().collect();
        keys.sort();
        f.debug_struct("RenderDispatcher")
            .field("serializers", &keys)
            .finish()
    }
}

impl<E> RenderDispatcher<E> {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the serializer for one (kind, profile, media type) triple.
    ///
    /// A later registration for the same triple replaces the earlier one.
    pub fn register<F>(
        &mut self,
        resource_kind: &str,
        profile_token: &str,
        media_type: &str,
        serializer: F,
    ) -> &mut Self
    where
        F: Fn(&E) -> Result<Bytes, SerializationError> + Send + Sync + 'static,
    {
        self.serializers.insert(
            key(resource_kind, profile_token, media_type),
            Box::new(serializer),
        );
        self
    }

    /// Whether a serializer is registered for the triple.
    pub fn has_serializer(&self, resource_kind: &str, profile_token: &str, media_type: &str) -> bool {
        self.serializers
            .contains_key(&key(resource_kind, profile_token, media_type))
    }

    /// Number of registered serializers.
    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    /// Whether no serializers are registered.
    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Render `entity` as negotiated.
    pub fn dispatch(
        &self,
        result: &NegotiationResult,
        entity: &E,
    ) -> Result<RenderedRepresentation, SerializationError> {
        let serializer = self
            .serializers
            .get(&key(
                &result.resource_kind,
                &result.profile.token,
                &result.media_type,
            ))
            .ok_or_else(|| SerializationError::Unimplemented {
                profile: result.profile.token.clone(),
                media_type: result.media_type.clone(),
            })?;

        let body = serializer(entity)?;

        Ok(RenderedRepresentation {
            body,
            headers: ResponseHeaders::for_result(result),
        })
    }

    /// Every (kind, profile, media type) the registry declares but no
    /// serializer implements, in registry order.
    pub fn unimplemented_pairs(&self, registry: &ProfileRegistry) -> Vec<(String, String, String)> {
        let mut missing = Vec::new();
        for kind in registry.resource_kinds() {
            let Ok(profiles) = registry.lookup(kind) else {
                continue;
            };
            for profile in profiles {
                for media_type in &profile.media_types {
                    if !self.has_serializer(kind, &profile.token, &media_type.mime_type) {
                        missing.push((
                            kind.to_string(),
                            profile.token.clone(),
                            media_type.mime_type.clone(),
                        ));
                    }
                }
            }
        }
        missing
    }
}

fn key(resource_kind: &str, profile_token: &str, media_type: &str) -> (String, String, String) {
    (
        resource_kind.to_string(),
        profile_token.to_string(),
        media_type.to_string(),
    )
}
