//! Hyperlinks shared by JSON bodies and `Link` response headers.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// RFC 8187 `attr-char`: everything else is percent-encoded in `title*`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// A hyperlink to a related resource.
///
/// Links appear in JSON bodies (landing page, collections, alternates view)
/// and are rendered into the HTTP `Link` header for profile advertisement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    /// The URI of the linked resource.
    pub href: String,

    /// The relationship type (e.g., "self", "alternate", "profile").
    pub rel: String,

    /// The media type of the linked resource.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    /// A human-readable title for the link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Profile token, for alternate-profile links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Link {
    /// Create a new link with required fields.
    pub fn new(href: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            type_: None,
            title: None,
            token: None,
        }
    }

    /// Set the media type.
    pub fn with_type(mut self, type_: impl Into<String>) -> Self {
        self.type_ = Some(type_.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the profile token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Render as one RFC 8288 `Link` header entry.
    ///
    /// `<href>; rel="rel"` followed by the optional `type`, `title` and
    /// `token` parameters, each a quoted string. A title that is not
    /// printable ASCII is sent as `title*=UTF-8''<pct-encoded>` instead.
    pub fn to_header_value(&self) -> String {
        let mut value = format!("<{}>; rel=\"{}\"", self.href, quote_escape(&self.rel));
        if let Some(ref type_) = self.type_ {
            value.push_str(&format!("; type=\"{}\"", quote_escape(type_)));
        }
        if let Some(ref title) = self.title {
            if title.bytes().all(|b| b == b' ' || b.is_ascii_graphic()) {
                value.push_str(&format!("; title=\"{}\"", quote_escape(title)));
            } else {
                value.push_str(&format!(
                    "; title*=UTF-8''{}",
                    utf8_percent_encode(title, ATTR_CHAR)
                ));
            }
        }
        if let Some(ref token) = self.token {
            value.push_str(&format!("; token=\"{}\"", quote_escape(token)));
        }
        value
    }
}

/// Join links into a single `Link` header value.
pub fn link_header(links: &[Link]) -> String {
    links
        .iter()
        .map(Link::to_header_value)
        .collect::<Vec<_>>()
        .join(", ")
}

fn quote_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
