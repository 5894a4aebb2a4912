//! The negotiation engine.
//!
//! Resolves a [`NegotiationRequest`] against the profiles registered for a
//! resource kind. The profile axis is resolved first because the valid media
//! types depend on the chosen profile:
//!
//! | Axis       | 1. query (strict)            | 2. header (lenient)          | 3. fallback        |
//! |------------|------------------------------|------------------------------|--------------------|
//! | profile    | `_profile` / `_view`         | `Accept-Profile` URI match   | registry default   |
//! | media type | `_mediatype` / `_format`     | `Accept` range match         | profile default    |
//!
//! An explicit query value that cannot be honoured is refused with a
//! [`NegotiationFailure`]. Header negotiation never fails: with no usable
//! match it degrades to the default.

use std::sync::Arc;

use crate::alternates;
use crate::errors::NegotiationFailure;
use crate::profiles::ProfileDescriptor;
use crate::registry::ProfileRegistry;
use crate::request::NegotiationRequest;

/// Which input decided an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An explicit query parameter.
    Query,
    /// A negotiation header.
    Header,
    /// The registry or profile default.
    Default,
}

/// The representation chosen for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationResult {
    /// Resource kind the request was negotiated for.
    pub resource_kind: String,

    /// The chosen profile.
    pub profile: ProfileDescriptor,

    /// The chosen media type, one of the profile's supported types.
    pub media_type: String,

    /// True when the media type is the profile default because nothing in
    /// the request selected one.
    pub used_fallback: bool,

    /// How the profile was chosen.
    pub profile_resolution: Resolution,

    /// Every other registered profile, in registration order.
    pub alternates: Vec<ProfileDescriptor>,
}

impl NegotiationResult {
    /// Whether the alternates pseudo-profile was requested.
    pub fn is_alternates_view(&self) -> bool {
        self.profile.token == alternates::TOKEN && self.profile.uri == alternates::URI
    }
}

/// Resolves requests against a shared, immutable registry.
#[derive(Debug, Clone)]
pub struct NegotiationEngine {
    registry: Arc<ProfileRegistry>,
}

impl NegotiationEngine {
    /// Create an engine over a registry.
    pub fn new(registry: Arc<ProfileRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this engine negotiates against.
    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Negotiate a representation of `resource_kind`.
    ///
    /// A resource kind with no registered profiles is `Unsatisfiable`.
    pub fn negotiate(
        &self,
        resource_kind: &str,
        request: &NegotiationRequest,
    ) -> Result<NegotiationResult, NegotiationFailure> {
        let profiles = self.registry.lookup(resource_kind).unwrap_or(&[]);
        negotiate_profiles(resource_kind, profiles, request)
    }
}

/// Negotiate against an explicit, ordered profile list.
pub fn negotiate_profiles(
    resource_kind: &str,
    profiles: &[ProfileDescriptor],
    request: &NegotiationRequest,
) -> Result<NegotiationResult, NegotiationFailure> {
    let unsatisfiable = || NegotiationFailure::Unsatisfiable {
        resource_kind: resource_kind.to_string(),
    };
    if profiles.is_empty() {
        return Err(unsatisfiable());
    }

    let (chosen, profile_resolution) = resolve_profile(profiles, request)?;

    let (profile, alternates) = match chosen {
        Some(index) => (
            profiles[index].clone(),
            profiles
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, p)| p.clone())
                .collect(),
        ),
        None => (ProfileDescriptor::alternates(), profiles.to_vec()),
    };

    let (media_type, used_fallback) =
        negotiate_media_type(&profile, request)?.ok_or_else(unsatisfiable)?;

    Ok(NegotiationResult {
        resource_kind: resource_kind.to_string(),
        profile,
        media_type,
        used_fallback,
        profile_resolution,
        alternates,
    })
}

/// Pick a profile index, or `None` for the alternates pseudo-profile.
fn resolve_profile(
    profiles: &[ProfileDescriptor],
    request: &NegotiationRequest,
) -> Result<(Option<usize>, Resolution), NegotiationFailure> {
    if let Some(token) = request.query_profile_token() {
        if let Some(index) = profiles.iter().position(|p| p.token == token) {
            return Ok((Some(index), Resolution::Query));
        }
        if token == alternates::TOKEN {
            return Ok((None, Resolution::Query));
        }
        return Err(NegotiationFailure::InvalidProfile {
            requested: token.to_string(),
            valid_profile_tokens: profiles.iter().map(|p| p.token.clone()).collect(),
        });
    }

    if let Some(accepted) = request.accept_profile() {
        // Entries are already sorted by descending weight
        for entry in accepted {
            if let Some(index) = profiles.iter().position(|p| p.uri == entry.value) {
                return Ok((Some(index), Resolution::Header));
            }
        }
    }

    let default = profiles.iter().position(|p| p.is_default).unwrap_or(0);
    Ok((Some(default), Resolution::Default))
}

/// Resolve the media type within `profile`.
///
/// Returns the chosen type and whether it came from the fallback, or `None`
/// if the profile declares no media types at all.
pub fn negotiate_media_type(
    profile: &ProfileDescriptor,
    request: &NegotiationRequest,
) -> Result<Option<(String, bool)>, NegotiationFailure> {
    if let Some(requested) = request.query_media_type() {
        return match profile
            .media_types
            .iter()
            .find(|m| m.mime_type.eq_ignore_ascii_case(requested))
        {
            Some(media_type) => Ok(Some((media_type.mime_type.clone(), false))),
            None => Err(NegotiationFailure::InvalidMediaType {
                requested: requested.to_string(),
                profile: profile.token.clone(),
                valid_media_types: profile.mime_types(),
            }),
        };
    }

    if let Some(accepted) = request.accept() {
        let candidates = profile.mime_types_default_first();
        for range in accepted {
            if let Some(matched) = candidates.iter().find(|m| range_matches(&range.value, m)) {
                return Ok(Some((matched.to_string(), false)));
            }
        }
    }

    let fallback = profile
        .default_media_type()
        .or_else(|| profile.media_types.first())
        .map(|m| (m.mime_type.clone(), true));
    Ok(fallback)
}

/// Whether a normalized media range matches a concrete mime type.
fn range_matches(range: &str, mime_type: &str) -> bool {
    if range == "*/*" {
        return true;
    }
    if let Some(type_) = range.strip_suffix("/*") {
        return mime_type
            .split_once('/')
            .map(|(t, _)| t.eq_ignore_ascii_case(type_))
            .unwrap_or(false);
    }
    range.eq_ignore_ascii_case(mime_type)
}
