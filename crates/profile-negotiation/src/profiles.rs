//! Profile and media type descriptors.

use serde::{Deserialize, Serialize};

use crate::alternates;
use crate::media_types;

/// A media type a profile can be rendered in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaTypeDescriptor {
    /// The mime type, e.g. `text/turtle`.
    pub mime_type: String,

    /// Whether this is the profile's default media type.
    #[serde(rename = "default", default)]
    pub is_default_for_profile: bool,
}

impl MediaTypeDescriptor {
    /// Create a non-default media type.
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            is_default_for_profile: false,
        }
    }

    /// Create the profile's default media type.
    pub fn default_type(mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            is_default_for_profile: true,
        }
    }
}

/// An alternate view of a resource kind.
///
/// A profile is identified by a short `token` (used in `_profile=`) and a
/// canonical `uri` (used in `Accept-Profile` and `Content-Profile`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileDescriptor {
    /// Short token, unique within a registry.
    pub token: String,

    /// Canonical URI of the profile.
    pub uri: String,

    /// Human-readable label.
    pub label: String,

    /// Supported media types, in preference order.
    #[serde(default)]
    pub media_types: Vec<MediaTypeDescriptor>,

    /// Whether this is the registry's default profile.
    #[serde(rename = "default", default)]
    pub is_default: bool,
}

impl ProfileDescriptor {
    /// Create a profile with no media types.
    pub fn new(token: impl Into<String>, uri: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            uri: uri.into(),
            label: label.into(),
            media_types: Vec::new(),
            is_default: false,
        }
    }

    /// Add a supported media type (builder pattern).
    pub fn with_media_type(mut self, media_type: MediaTypeDescriptor) -> Self {
        self.media_types.push(media_type);
        self
    }

    /// Add several non-default media types (builder pattern).
    pub fn with_media_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.media_types
            .extend(mime_types.into_iter().map(MediaTypeDescriptor::new));
        self
    }

    /// Mark as the registry default (builder pattern).
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// The alternates pseudo-profile listing every other profile.
    pub fn alternates() -> Self {
        Self::new(alternates::TOKEN, alternates::URI, alternates::LABEL)
            .with_media_type(MediaTypeDescriptor::default_type(media_types::HTML))
            .with_media_type(MediaTypeDescriptor::new(media_types::JSON))
    }

    /// The declared default media type, if any.
    pub fn default_media_type(&self) -> Option<&MediaTypeDescriptor> {
        self.media_types.iter().find(|m| m.is_default_for_profile)
    }

    /// Whether `mime_type` is exactly one of the supported media types.
    pub fn supports(&self, mime_type: &str) -> bool {
        self.media_types.iter().any(|m| m.mime_type == mime_type)
    }

    /// Supported mime types in declaration order.
    pub fn mime_types(&self) -> Vec<String> {
        self.media_types.iter().map(|m| m.mime_type.clone()).collect()
    }

    /// Supported mime types with the default moved to the front.
    ///
    /// Wildcard ranges are matched against this order so that `*/*` and a
    /// matching `type/*` resolve to the default when they can.
    pub fn mime_types_default_first(&self) -> Vec<&str> {
        let mut ordered: Vec<&str> = Vec::with_capacity(self.media_types.len());
        if let Some(default) = self.default_media_type() {
            ordered.push(&default.mime_type);
        }
        for media_type in &self.media_types {
            if !media_type.is_default_for_profile {
                ordered.push(&media_type.mime_type);
            }
        }
        ordered
    }
}
