//! Response body types.
//!
//! This module contains the landing page and the exception body returned for
//! negotiation and rendering failures.

use serde::{Deserialize, Serialize};

use crate::media_types;
use crate::types::Link;

/// Landing page response for the API root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LandingPage {
    /// Title of the API.
    pub title: String,

    /// Description of the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// API version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Links to related resources.
    pub links: Vec<Link>,
}

impl LandingPage {
    /// Create a new landing page with standard links.
    pub fn new(title: impl Into<String>, description: impl Into<String>, base_url: &str) -> Self {
        let links = vec![
            Link::new(base_url, "self")
                .with_type(media_types::JSON)
                .with_title("This document"),
            Link::new(format!("{}/collections", base_url), "data")
                .with_type(media_types::JSON)
                .with_title("Collections"),
        ];

        Self {
            title: title.into(),
            description: Some(description.into()),
            version: None,
            links,
        }
    }

    /// Set the API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Add a link (builder pattern).
    pub fn with_link(mut self, link: Link) -> Self {
        self.links.push(link);
        self
    }
}

/// Exception response for errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionResponse {
    /// Exception type identifier.
    #[serde(rename = "type")]
    pub type_: String,

    /// Human-readable title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// HTTP status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Detailed error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// URI of the request that caused the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Valid values for the offending parameter.
    #[serde(rename = "validValues", skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<String>>,
}

impl ExceptionResponse {
    /// Create a new exception response.
    pub fn new(type_: impl Into<String>, status: u16, detail: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            title: None,
            status: Some(status),
            detail: Some(detail.into()),
            instance: None,
            valid_values: None,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the instance URI.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set the list of valid values.
    pub fn with_valid_values(mut self, values: Vec<String>) -> Self {
        self.valid_values = Some(values);
        self
    }

    /// Create a 404 Not Found exception.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(
            "http://www.opengis.net/def/exceptions/ogcapi-common-1/1.0/not-found",
            404,
            detail,
        )
        .with_title("Not Found")
    }

    /// Create a 400 Bad Request exception for an invalid parameter value.
    pub fn invalid_parameter(detail: impl Into<String>) -> Self {
        Self::new(
            "http://www.opengis.net/def/exceptions/ogcapi-common-1/1.0/invalid-parameter-value",
            400,
            detail,
        )
        .with_title("Bad Request")
    }

    /// Create a 500 Internal Server Error exception.
    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self::new(
            "http://www.opengis.net/def/exceptions/ogcapi-common-1/1.0/server-error",
            500,
            detail,
        )
        .with_title("Internal Server Error")
    }
}
