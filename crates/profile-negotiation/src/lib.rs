//! Content negotiation by profile.
//!
//! This crate resolves which representation of a resource to return when the
//! same entity can be viewed through several alternate *profiles* (conceptual
//! views such as an ontology or a legacy schema), each available in several
//! media types. It follows the W3C "Content Negotiation by Profile"
//! convention: clients choose a profile with `_profile` or `Accept-Profile`
//! and a media type with `_mediatype` or `Accept`.
//!
//! # Components
//!
//! - [`ProfileRegistry`]: immutable per-resource-kind table of profiles
//! - [`NegotiationRequest`]: normalized negotiation inputs
//! - [`NegotiationEngine`]: resolves a request into a [`NegotiationResult`]
//! - [`RenderDispatcher`]: calls the serializer for the chosen pair and builds
//!   the response headers
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use profile_negotiation::{
//!     MediaTypeDescriptor, NegotiationEngine, NegotiationRequest, ProfileDescriptor,
//!     ProfileRegistry,
//! };
//!
//! let mut registry = ProfileRegistry::new();
//! registry
//!     .register(
//!         "feature",
//!         vec![ProfileDescriptor::new("geosp", "http://www.opengis.net/ont/geosparql", "GeoSPARQL")
//!             .with_media_type(MediaTypeDescriptor::default_type("text/turtle"))
//!             .with_media_type(MediaTypeDescriptor::new("application/ld+json"))
//!             .as_default()],
//!     )
//!     .unwrap();
//!
//! let engine = NegotiationEngine::new(Arc::new(registry));
//! let request = NegotiationRequest::from_parts(None, None, Some("application/ld+json"), None);
//! let result = engine.negotiate("feature", &request).unwrap();
//! assert_eq!(result.media_type, "application/ld+json");
//! ```

pub mod dispatch;
pub mod errors;
pub mod negotiation;
pub mod profiles;
pub mod registry;
pub mod request;
pub mod responses;
pub mod types;

// Re-export commonly used types
pub use dispatch::{RenderDispatcher, RenderedRepresentation, ResponseHeaders, Serializer};
pub use errors::{ConfigurationError, NegotiationFailure, SerializationError};
pub use negotiation::{
    negotiate_media_type, negotiate_profiles, NegotiationEngine, NegotiationResult, Resolution,
};
pub use profiles::{MediaTypeDescriptor, ProfileDescriptor};
pub use registry::ProfileRegistry;
pub use request::{parse_accept, parse_accept_profile, NegotiationRequest, QualityValue, QueryOverrides};
pub use responses::{ExceptionResponse, LandingPage};
pub use types::Link;

/// Query parameter names understood by the negotiator.
pub mod params {
    /// Explicit profile token.
    pub const PROFILE: &str = "_profile";
    /// Legacy alias for [`PROFILE`].
    pub const VIEW: &str = "_view";
    /// Explicit media type.
    pub const MEDIA_TYPE: &str = "_mediatype";
    /// Legacy alias for [`MEDIA_TYPE`].
    pub const FORMAT: &str = "_format";
}

/// Header names used by content negotiation by profile.
pub mod headers {
    pub const ACCEPT: &str = "Accept";
    pub const ACCEPT_PROFILE: &str = "Accept-Profile";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const CONTENT_PROFILE: &str = "Content-Profile";
    pub const LINK: &str = "Link";
    pub const VARY: &str = "Vary";
}

/// Media types served by the shipped profiles.
pub mod media_types {
    pub const HTML: &str = "text/html";
    pub const JSON: &str = "application/json";
    pub const GEO_JSON: &str = "application/geo+json";
    pub const XML: &str = "application/xml";
    pub const TURTLE: &str = "text/turtle";
    pub const JSON_LD: &str = "application/ld+json";
    pub const N_TRIPLES: &str = "application/n-triples";
    pub const RDF_XML: &str = "application/rdf+xml";

    /// All RDF serializations.
    pub const RDF: &[&str] = &[TURTLE, JSON_LD, N_TRIPLES, RDF_XML];
}

/// The built-in alternates pseudo-profile.
pub mod alternates {
    /// Reserved `_profile` token selecting the alternates view.
    pub const TOKEN: &str = "alt";
    /// Canonical URI of the alternate profiles data model.
    pub const URI: &str = "http://www.w3.org/ns/dx/conneg/altr";
    /// Human label.
    pub const LABEL: &str = "Alternate Profiles";
}
