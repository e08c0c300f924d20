//! Generic pass-through proxy endpoint.
//!
//! Forwards a fixed whitelist of request headers plus the raw body to a
//! caller-specified upstream URL and relays the response back verbatim,
//! minus framing headers. No orchestration logic lives here.

use super::compile::HARDWARE_TARGET_HEADER;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// Header naming the upstream URL to forward to.
pub const PROXY_TARGET_HEADER: &str = "x-proxy-to";

/// Request headers relayed to the upstream; everything else is dropped.
pub const FORWARDED_HEADERS: [&str; 5] = [
    "content-type",
    "x-ms-version",
    "x-ms-date",
    "x-ms-blob-type",
    HARDWARE_TARGET_HEADER,
];

/// `GET|POST|PUT /api/proxy`
pub async fn proxy_relay(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let Some(method) = forward_method(&method) else {
        return Err(ApiError::BadRequest(
            "Only GET, POST, and PUT are supported".to_string(),
        ));
    };

    let target = headers
        .get(PROXY_TARGET_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::BadRequest(format!("{PROXY_TARGET_HEADER} header is missing")))?
        .to_string();

    tracing::info!(%method, target = %target, "relaying request upstream");

    let mut request = state.http.request(method, target.as_str());
    for (name, value) in forwardable_headers(&headers) {
        request = request.header(name, value);
    }

    let upstream = request
        .body(body.to_vec())
        .send()
        .await
        .map_err(|err| ApiError::Upstream(format!("fetch from {target} failed: {err}")))?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut relayed = HeaderMap::new();
    for (name, value) in upstream.headers() {
        if is_framing_header(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            relayed.append(name, value);
        }
    }

    let body = upstream
        .bytes()
        .await
        .map_err(|err| ApiError::Upstream(format!("fetch from {target} failed: {err}")))?;

    Ok((status, relayed, body.to_vec()).into_response())
}

/// Only GET, POST, and PUT are of interest; everything else is a caller
/// error on this endpoint.
fn forward_method(method: &Method) -> Option<reqwest::Method> {
    if method == Method::GET {
        Some(reqwest::Method::GET)
    } else if method == Method::POST {
        Some(reqwest::Method::POST)
    } else if method == Method::PUT {
        Some(reqwest::Method::PUT)
    } else {
        None
    }
}

/// The whitelisted request headers present on this request, in relay order.
fn forwardable_headers(headers: &HeaderMap) -> Vec<(&'static str, String)> {
    FORWARDED_HEADERS
        .iter()
        .filter_map(|&name| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(|value| (name, value.to_string()))
        })
        .collect()
}

/// Hop-by-hop framing headers are recomputed by the hosting layer and must
/// not be copied from the upstream response.
fn is_framing_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("content-length") || name.eq_ignore_ascii_case("transfer-encoding")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_covers_the_storage_and_target_headers() {
        assert!(FORWARDED_HEADERS.contains(&"content-type"));
        assert!(FORWARDED_HEADERS.contains(&"x-ms-blob-type"));
        assert!(FORWARDED_HEADERS.contains(&HARDWARE_TARGET_HEADER));
    }

    #[test]
    fn forwardable_headers_filters_to_the_whitelist() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/octet-stream".parse().unwrap());
        headers.insert("x-ms-blob-type", "BlockBlob".parse().unwrap());
        headers.insert("authorization", "Bearer secret".parse().unwrap());
        headers.insert("x-proxy-to", "http://example.test".parse().unwrap());

        let forwarded = forwardable_headers(&headers);
        assert_eq!(
            forwarded,
            vec![
                ("content-type", "application/octet-stream".to_string()),
                ("x-ms-blob-type", "BlockBlob".to_string()),
            ]
        );
    }

    #[test]
    fn framing_headers_are_stripped() {
        assert!(is_framing_header("content-length"));
        assert!(is_framing_header("Transfer-Encoding"));
        assert!(!is_framing_header("content-type"));
        assert!(!is_framing_header("x-upstream-id"));
    }

    #[test]
    fn only_get_post_put_are_forwarded() {
        assert_eq!(forward_method(&Method::GET), Some(reqwest::Method::GET));
        assert_eq!(forward_method(&Method::POST), Some(reqwest::Method::POST));
        assert_eq!(forward_method(&Method::PUT), Some(reqwest::Method::PUT));
        assert_eq!(forward_method(&Method::DELETE), None);
        assert_eq!(forward_method(&Method::PATCH), None);
    }
}
