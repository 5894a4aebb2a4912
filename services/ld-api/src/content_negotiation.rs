//! HTTP adapters for profile negotiation.
//!
//! Reads the negotiation inputs from an axum request and turns negotiation
//! results and failures into responses.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use profile_negotiation::{
    media_types, ExceptionResponse, NegotiationFailure, NegotiationRequest,
    QueryOverrides, RenderedRepresentation, SerializationError,
};
use tracing::{error, warn};

/// `Accept-Profile` request header.
pub const ACCEPT_PROFILE: HeaderName = HeaderName::from_static("accept-profile");

/// Build the negotiation request from query overrides and request headers.
///
/// Repeated header lines are joined into one list. Lines that are not
/// visible ASCII are ignored.
pub fn negotiation_request(query: &QueryOverrides, request_headers: &HeaderMap) -> NegotiationRequest {
    let accept = joined_header(request_headers, &header::ACCEPT);
    let accept_profile = joined_header(request_headers, &ACCEPT_PROFILE);
    NegotiationRequest::new(query, accept.as_deref(), accept_profile.as_deref())
}

fn joined_header(request_headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    let values: Vec<&str> = request_headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// 200 response carrying a rendered representation and its negotiation headers.
pub fn representation_response(rendered: RenderedRepresentation) -> Response {
    let mut response_headers = HeaderMap::new();
    for (name, value) in rendered.headers.iter() {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(name) => name,
            Err(e) => return header_error(name, e),
        };
        let value = match HeaderValue::from_str(value) {
            Ok(value) => value,
            Err(e) => return header_error(name.as_str(), e),
        };
        response_headers.insert(name, value);
    }

    (StatusCode::OK, response_headers, rendered.body).into_response()
}

fn header_error(name: &str, e: impl std::fmt::Display) -> Response {
    error!(header = name, error = %e, "Invalid response header");
    exception_response(&ExceptionResponse::internal_error(format!(
        "Invalid {} header: {}",
        name, e
    )))
}

/// Response for a request that could not be negotiated.
///
/// Client mistakes are answered with 400 and the valid values; a resource
/// kind with no profiles is a deployment error and is logged.
pub fn negotiation_failure_response(failure: &NegotiationFailure, instance: &str) -> Response {
    if failure.is_server_error() {
        error!(error = %failure, instance, "Negotiation failed");
    } else {
        warn!(error = %failure, instance, "Rejected negotiation request");
    }
    let mut response = exception_response(&failure.to_exception().with_instance(instance));
    response
        .headers_mut()
        .insert(header::VARY, HeaderValue::from_static(profile_negotiation::dispatch::VARY));
    response
}

/// Response for a representation that could not be rendered.
pub fn serialization_error_response(err: &SerializationError, instance: &str) -> Response {
    if err.status_code() >= 500 {
        error!(error = %err, instance, "Rendering failed");
    } else {
        warn!(error = %err, instance, "Representation unavailable");
    }
    exception_response(&err.to_exception().with_instance(instance))
}

/// JSON exception body with the matching status code.
pub fn exception_response(exc: &ExceptionResponse) -> Response {
    let status = exc
        .status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let json = serde_json::to_string(exc).unwrap_or_default();
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(media_types::JSON))],
        json,
    )
        .into_response()
}

/// JSON response for metadata endpoints.
pub fn json_response<T: serde::Serialize>(value: &T) -> Response {
    match serde_json::to_string_pretty(value) {
        Ok(json) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, HeaderValue::from_static(media_types::JSON))],
            json,
        )
            .into_response(),
        Err(e) => exception_response(&ExceptionResponse::internal_error(format!(
            "Failed to serialize response: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use bytes::Bytes;
    use profile_negotiation::{headers, ResponseHeaders};

    #[test]
    fn test_negotiation_request_from_headers() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::ACCEPT, HeaderValue::from_static("text/turtle;q=0.5, text/html"));
        request_headers.insert(
            ACCEPT_PROFILE,
            HeaderValue::from_static("<https://linked.data.gov.au/def/su>"),
        );

        let request = negotiation_request(&QueryOverrides::default(), &request_headers);
        assert_eq!(request.accept().unwrap()[0].value, "text/html");
        assert_eq!(
            request.accept_profile().unwrap()[0].value,
            "https://linked.data.gov.au/def/su"
        );
        assert_eq!(request.query_profile_token(), None);
    }

    #[test]
    fn test_non_ascii_header_is_ignored() {
        let mut request_headers = HeaderMap::new();
        request_headers.insert(header::ACCEPT, HeaderValue::from_bytes(b"text/\xfftml").unwrap());
        let request = negotiation_request(&QueryOverrides::default(), &request_headers);
        assert!(request.accept().is_none());
    }

    #[test]
    fn test_repeated_header_lines_are_joined() {
        let mut request_headers = HeaderMap::new();
        request_headers.append(header::ACCEPT, HeaderValue::from_static("image/png"));
        request_headers.append(header::ACCEPT, HeaderValue::from_bytes(b"text/\xfftml").unwrap());
        request_headers.append(header::ACCEPT, HeaderValue::from_static("text/turtle;q=0.9"));
        request_headers.append(
            ACCEPT_PROFILE,
            HeaderValue::from_static("<http://example.com/unknown>;q=0.2"),
        );
        request_headers.append(
            ACCEPT_PROFILE,
            HeaderValue::from_static("<http://loop3d.org/GSO/ontology/2020/1>"),
        );

        let request = negotiation_request(&QueryOverrides::default(), &request_headers);
        let accept: Vec<&str> = request.accept().unwrap().iter().map(|q| q.value.as_str()).collect();
        assert_eq!(accept, vec!["image/png", "text/turtle"]);
        assert_eq!(
            request.accept_profile().unwrap()[0].value,
            "http://loop3d.org/GSO/ontology/2020/1"
        );
        assert_eq!(request.accept_profile().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_representation_response_headers() {
        let rendered = RenderedRepresentation {
            body: Bytes::from_static(b"<x> <y> <z> ."),
            headers: ResponseHeaders {
                content_type: "text/turtle".to_string(),
                content_profile: "<http://www.opengis.net/ont/geosparql>".to_string(),
                link: "<http://www.opengis.net/ont/geosparql>; rel=\"profile\"".to_string(),
                vary: "Accept, Accept-Profile",
            },
        };

        let response = representation_response(rendered);
        assert_eq!(response.status(), StatusCode::OK);
        for name in [
            headers::CONTENT_TYPE,
            headers::CONTENT_PROFILE,
            headers::LINK,
            headers::VARY,
        ] {
            let name = HeaderName::from_bytes(name.as_bytes()).unwrap();
            assert!(response.headers().contains_key(&name), "{}", name);
        }
        assert_eq!(response.headers()["content-type"], "text/turtle");
        assert_eq!(
            response.headers()["content-profile"],
            "<http://www.opengis.net/ont/geosparql>"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<x> <y> <z> .");
    }

    #[tokio::test]
    async fn test_invalid_profile_response() {
        let failure = NegotiationFailure::InvalidProfile {
            requested: "bogus".to_string(),
            valid_profile_tokens: vec!["su".to_string(), "geosp".to_string()],
        };
        let response = negotiation_failure_response(&failure, "/collections/sus/items/1");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["vary"], "Accept, Accept-Profile");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["status"], 400);
        assert_eq!(value["validValues"], serde_json::json!(["su", "geosp"]));
        assert_eq!(value["instance"], "/collections/sus/items/1");
    }

    #[test]
    fn test_unsatisfiable_is_server_error() {
        let failure = NegotiationFailure::Unsatisfiable {
            resource_kind: "borehole".to_string(),
        };
        let response = negotiation_failure_response(&failure, "/");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_source_is_not_found() {
        let err = SerializationError::MissingSource {
            entity: "1".to_string(),
            profile: "gsmlb".to_string(),
        };
        let response = serialization_error_response(&err, "/collections/sus/items/1");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
