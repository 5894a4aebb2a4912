//! The alternate profiles view of a resource.

use std::fmt::Write as _;

use bytes::Bytes;
use profile_negotiation::{
    media_types, params, NegotiationResult, ProfileDescriptor, RenderedRepresentation, ResponseHeaders,
    SerializationError,
};
use serde::Serialize;

use super::html;
use crate::entity::Entity;

/// JSON body of the alternates view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlternatesView {
    /// The resource the profiles are alternates of.
    pub uri: String,

    #[serde(rename = "defaultProfile", skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    pub profiles: Vec<ProfileSummary>,
}

/// One profile as listed in the alternates view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProfileSummary {
    pub token: String,
    pub uri: String,
    pub label: String,

    #[serde(rename = "mediaTypes")]
    pub media_types: Vec<String>,

    #[serde(rename = "defaultMediaType", skip_serializing_if = "Option::is_none")]
    pub default_media_type: Option<String>,
}

impl ProfileSummary {
    pub fn from_descriptor(profile: &ProfileDescriptor) -> Self {
        Self {
            token: profile.token.clone(),
            uri: profile.uri.clone(),
            label: profile.label.clone(),
            media_types: profile.mime_types(),
            default_media_type: profile.default_media_type().map(|m| m.mime_type.clone()),
        }
    }
}

impl AlternatesView {
    /// List `profiles` as the alternates of `uri`.
    pub fn new(uri: &str, profiles: &[ProfileDescriptor]) -> Self {
        Self {
            uri: uri.to_string(),
            default_profile: profiles
                .iter()
                .find(|p| p.is_default)
                .map(|p| p.token.clone()),
            profiles: profiles.iter().map(ProfileSummary::from_descriptor).collect(),
        }
    }

    fn to_html(&self, title: &str) -> String {
        let mut body = String::new();
        let _ = writeln!(
            body,
            "  <p>Alternate profiles of <a href=\"{uri}\">{uri}</a></p>",
            uri = html::escape(&self.uri)
        );
        body.push_str(
            "  <table>\n    <tr><th>Token</th><th>Profile</th><th>Media Types</th></tr>\n",
        );
        for profile in &self.profiles {
            let token = html::escape(&profile.token);
            let is_default = self.default_profile.as_deref() == Some(profile.token.as_str());
            let media_types: Vec<String> = profile
                .media_types
                .iter()
                .map(|m| {
                    let query = format!(
                        "?{}={}&{}={}",
                        params::PROFILE,
                        profile.token,
                        params::MEDIA_TYPE,
                        m
                    );
                    let mut cell = format!(
                        "<a href=\"{}\">{}</a>",
                        html::escape(&query),
                        html::escape(m)
                    );
                    if profile.default_media_type.as_deref() == Some(m.as_str()) {
                        cell.push_str(" (default)");
                    }
                    cell
                })
                .collect();
            let _ = writeln!(
                body,
                "    <tr><td><a href=\"?{param}={token}\">{token}</a>{default}</td><td><a href=\"{uri}\">{label}</a></td><td>{media}</td></tr>",
                param = params::PROFILE,
                token = token,
                default = if is_default { " (default)" } else { "" },
                uri = html::escape(&profile.uri),
                label = html::escape(&profile.label),
                media = media_types.join("<br>")
            );
        }
        body.push_str("  </table>\n");
        html::page(&format!("{}: Alternate Profiles", title), &body)
    }
}

/// Render the alternates view for a negotiated alternates request.
pub fn render(
    result: &NegotiationResult,
    entity: &Entity,
) -> Result<RenderedRepresentation, SerializationError> {
    let view = AlternatesView::new(&entity.uri, &result.alternates);
    let body = match result.media_type.as_str() {
        media_types::JSON => serde_json::to_vec_pretty(&view)
            .map_err(|e| SerializationError::encoding(media_types::JSON, e))?,
        media_types::HTML => view.to_html(&entity.title).into_bytes(),
        other => {
            return Err(SerializationError::Unimplemented {
                profile: result.profile.token.clone(),
                media_type: other.to_string(),
            })
        }
    };

    Ok(RenderedRepresentation {
        body: Bytes::from(body),
        headers: ResponseHeaders::for_result(result),
    })
}
