//! Negotiation request parsing.
//!
//! Turns the raw negotiation inputs of an HTTP request (the `_profile`,
//! `_view`, `_mediatype` and `_format` query parameters and the `Accept` and
//! `Accept-Profile` headers) into an immutable [`NegotiationRequest`].
//!
//! Header parsing is lenient: malformed entries are dropped and a header with
//! no usable entries is treated as absent. Query values are only normalized,
//! never validated here, so an unknown token still reaches the engine as an
//! explicit request.

use serde::Deserialize;

/// One entry of a quality-weighted header list such as `Accept`.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityValue {
    /// The normalized value (a media range or a profile URI).
    pub value: String,

    /// The `q` weight in `(0, 1]`.
    pub quality: f32,
}

impl QualityValue {
    pub fn new(value: impl Into<String>, quality: f32) -> Self {
        Self {
            value: value.into(),
            quality,
        }
    }
}

/// Raw negotiation query parameters, as deserialized from the query string.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct QueryOverrides {
    #[serde(rename = "_profile")]
    pub profile: Option<String>,

    /// Legacy alias of `_profile`.
    #[serde(rename = "_view")]
    pub view: Option<String>,

    #[serde(rename = "_mediatype")]
    pub media_type: Option<String>,

    /// Legacy alias of `_mediatype`.
    #[serde(rename = "_format")]
    pub format: Option<String>,
}

impl QueryOverrides {
    /// Build overrides from raw query pairs.
    ///
    /// A repeated parameter keeps its first value; unrelated parameters are
    /// ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                crate::params::PROFILE => &mut query.profile,
                crate::params::VIEW => &mut query.view,
                crate::params::MEDIA_TYPE => &mut query.media_type,
                crate::params::FORMAT => &mut query.format,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }

    /// The explicit profile token, `_profile` taking precedence over `_view`.
    pub fn profile_token(&self) -> Option<String> {
        normalize_token(self.profile.as_deref()).or_else(|| normalize_token(self.view.as_deref()))
    }

    /// The explicit media type, `_mediatype` taking precedence over `_format`.
    pub fn media_type(&self) -> Option<String> {
        normalize_query_media_type(self.media_type.as_deref())
            .or_else(|| normalize_query_media_type(self.format.as_deref()))
    }
}

/// Normalized negotiation inputs for a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NegotiationRequest {
    query_profile_token: Option<String>,
    query_media_type: Option<String>,
    accept_profile: Option<Vec<QualityValue>>,
    accept: Option<Vec<QualityValue>>,
}

impl NegotiationRequest {
    /// Build a request from query overrides and raw header values.
    pub fn new(query: &QueryOverrides, accept: Option<&str>, accept_profile: Option<&str>) -> Self {
        Self {
            query_profile_token: query.profile_token(),
            query_media_type: query.media_type(),
            accept_profile: accept_profile.map(parse_accept_profile).filter(|v| !v.is_empty()),
            accept: accept.map(parse_accept).filter(|v| !v.is_empty()),
        }
    }

    /// Build a request from individual raw values.
    pub fn from_parts(
        query_profile: Option<&str>,
        query_media_type: Option<&str>,
        accept: Option<&str>,
        accept_profile: Option<&str>,
    ) -> Self {
        let query = QueryOverrides {
            profile: query_profile.map(str::to_string),
            media_type: query_media_type.map(str::to_string),
            ..Default::default()
        };
        Self::new(&query, accept, accept_profile)
    }

    /// Explicit profile token from the query string.
    pub fn query_profile_token(&self) -> Option<&str> {
        self.query_profile_token.as_deref()
    }

    /// Explicit media type from the query string.
    pub fn query_media_type(&self) -> Option<&str> {
        self.query_media_type.as_deref()
    }

    /// Parsed `Accept-Profile` entries, highest weight first.
    pub fn accept_profile(&self) -> Option<&[QualityValue]> {
        self.accept_profile.as_deref()
    }

    /// Parsed `Accept` entries, highest weight first.
    pub fn accept(&self) -> Option<&[QualityValue]> {
        self.accept.as_deref()
    }
}

/// Parse an `Accept` header into normalized media ranges.
///
/// Ranges are lower-cased with every parameter except `q` stripped. A bare
/// `*` is read as `*/*`. The result is sorted by descending weight; the sort
/// is stable so equal weights keep header order.
pub fn parse_accept(header: &str) -> Vec<QualityValue> {
    parse_quality_list(header, normalize_media_range)
}

/// Parse an `Accept-Profile` header into profile URIs.
///
/// URIs may be wrapped in angle brackets, which are removed.
pub fn parse_accept_profile(header: &str) -> Vec<QualityValue> {
    parse_quality_list(header, normalize_profile_uri)
}

fn parse_quality_list(header: &str, normalize: fn(&str) -> Option<String>) -> Vec<QualityValue> {
    let mut values: Vec<QualityValue> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let value = normalize(parts.next()?.trim())?;

            let mut quality = 1.0_f32;
            for param in parts {
                let Some((key, raw)) = param.split_once('=') else {
                    continue;
                };
                if key.trim().eq_ignore_ascii_case("q") {
                    quality = raw.trim().parse::<f32>().ok()?;
                }
            }

            // NaN fails the range check as well
            if !(quality > 0.0 && quality <= 1.0) {
                return None;
            }

            Some(QualityValue { value, quality })
        })
        .collect();

    values.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    values
}

fn normalize_media_range(raw: &str) -> Option<String> {
    if raw == "*" {
        return Some("*/*".to_string());
    }

    let (type_, subtype) = raw.split_once('/')?;
    let type_ = type_.trim();
    let subtype = subtype.trim();
    if type_.is_empty()
        || subtype.is_empty()
        || subtype.contains('/')
        || type_.contains(char::is_whitespace)
        || subtype.contains(char::is_whitespace)
    {
        return None;
    }
    if type_ == "*" && subtype != "*" {
        return None;
    }

    Some(format!("{}/{}", type_, subtype).to_ascii_lowercase())
}

fn normalize_profile_uri(raw: &str) -> Option<String> {
    let uri = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(raw)
        .trim();
    if uri.is_empty() {
        None
    } else {
        Some(uri.to_string())
    }
}

fn normalize_token(raw: Option<&str>) -> Option<String> {
    let token = raw?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Form decoding turns the `+` of `application/ld+json` into a space, so
/// spaces are mapped back before lower-casing.
fn normalize_query_media_type(raw: Option<&str>) -> Option<String> {
    let media_type = raw?.trim();
    if media_type.is_empty() {
        None
    } else {
        Some(media_type.replace(' ', "+").to_ascii_lowercase())
    }
}
