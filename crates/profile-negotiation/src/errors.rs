//! Negotiation, serialization and configuration error types.

use thiserror::Error;

use crate::responses::ExceptionResponse;

/// Why a request could not be negotiated.
///
/// `InvalidProfile` and `InvalidMediaType` are client mistakes made through
/// explicit query parameters. `Unsatisfiable` means no profiles are
/// registered for the resource kind, which is a deployment error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NegotiationFailure {
    /// `_profile` named a token that is not registered.
    #[error("Invalid profile '{requested}'. Valid profiles: {}", .valid_profile_tokens.join(", "))]
    InvalidProfile {
        requested: String,
        valid_profile_tokens: Vec<String>,
    },

    /// `_mediatype` named a type the resolved profile does not support.
    #[error(
        "Invalid media type '{requested}' for profile '{profile}'. Valid media types: {}",
        .valid_media_types.join(", ")
    )]
    InvalidMediaType {
        requested: String,
        profile: String,
        valid_media_types: Vec<String>,
    },

    /// No profiles are registered for the resource kind.
    #[error("No profiles registered for resource kind '{resource_kind}'")]
    Unsatisfiable { resource_kind: String },
}

impl NegotiationFailure {
    /// Get the HTTP status code for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            NegotiationFailure::InvalidProfile { .. } => 400,
            NegotiationFailure::InvalidMediaType { .. } => 400,
            NegotiationFailure::Unsatisfiable { .. } => 500,
        }
    }

    /// Whether the failure indicates a deployment error rather than a bad request.
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Short machine-readable name, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            NegotiationFailure::InvalidProfile { .. } => "invalid_profile",
            NegotiationFailure::InvalidMediaType { .. } => "invalid_media_type",
            NegotiationFailure::Unsatisfiable { .. } => "unsatisfiable",
        }
    }

    /// Convert to an ExceptionResponse listing the valid alternatives.
    pub fn to_exception(&self) -> ExceptionResponse {
        match self {
            NegotiationFailure::InvalidProfile {
                valid_profile_tokens,
                ..
            } => ExceptionResponse::invalid_parameter(self.to_string())
                .with_valid_values(valid_profile_tokens.clone()),
            NegotiationFailure::InvalidMediaType {
                valid_media_types, ..
            } => ExceptionResponse::invalid_parameter(self.to_string())
                .with_valid_values(valid_media_types.clone()),
            NegotiationFailure::Unsatisfiable { .. } => {
                ExceptionResponse::internal_error(self.to_string())
            }
        }
    }
}

/// Errors raised while rendering a negotiated representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// The pair is declared in the registry but no serializer is registered.
    #[error("No serializer registered for profile '{profile}' and media type '{media_type}'")]
    Unimplemented { profile: String, media_type: String },

    /// The serializer failed to encode the entity.
    #[error("Failed to encode {media_type}: {message}")]
    Encoding { media_type: String, message: String },

    /// A passthrough profile was requested but the entity has no source document.
    #[error("Entity '{entity}' has no source document for profile '{profile}'")]
    MissingSource { entity: String, profile: String },
}

impl SerializationError {
    /// Create an encoding error.
    pub fn encoding(media_type: impl Into<String>, message: impl ToString) -> Self {
        SerializationError::Encoding {
            media_type: media_type.into(),
            message: message.to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SerializationError::Unimplemented { .. } => 500,
            SerializationError::Encoding { .. } => 500,
            SerializationError::MissingSource { .. } => 404,
        }
    }

    /// Convert to an ExceptionResponse.
    pub fn to_exception(&self) -> ExceptionResponse {
        match self {
            SerializationError::MissingSource { .. } => {
                ExceptionResponse::not_found(self.to_string())
            }
            _ => ExceptionResponse::internal_error(self.to_string()),
        }
    }
}

/// Invalid profile registry configuration, detected at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// No profiles are registered for the resource kind.
    #[error("Unknown resource kind: {0}")]
    UnknownResourceKind(String),

    /// The resource kind was registered twice.
    #[error("Resource kind '{0}' is already registered")]
    DuplicateResourceKind(String),

    /// The profile list is empty.
    #[error("Resource kind '{0}' has no profiles")]
    NoProfiles(String),

    /// Two profiles share a token.
    #[error("Resource kind '{kind}' declares profile '{token}' more than once")]
    DuplicateToken { kind: String, token: String },

    /// No profile, or more than one, is marked default.
    #[error("Resource kind '{kind}' must have exactly one default profile, found {count}")]
    DefaultProfileCount { kind: String, count: usize },

    /// A profile declares no media types.
    #[error("Profile '{token}' of resource kind '{kind}' declares no media types")]
    NoMediaTypes { kind: String, token: String },

    /// No media type, or more than one, is marked default for a profile.
    #[error(
        "Profile '{token}' of resource kind '{kind}' must have exactly one default media type, found {count}"
    )]
    DefaultMediaTypeCount {
        kind: String,
        token: String,
        count: usize,
    },
}
