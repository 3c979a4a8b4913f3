//! Streaming proxy endpoint.
//!
//! GET /stream?url=<share page URL> with optional Range header
//!
//! Resolves the share URL, then relays the upstream file bytes to the
//! caller. The inbound Range header is forwarded unchanged so media
//! players can seek; the upstream body is piped through without being
//! buffered in memory. Closing the inbound connection ends the relay.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::server::app::AppState;
use crate::server::routes::getlink::LinkQuery;

/// Relay a resolved file's bytes to the caller.
pub async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(url) = query.url else {
        return (StatusCode::BAD_REQUEST, "No URL provided").into_response();
    };

    // Resolution failure means no upstream request at all.
    let link = match state.resolver.resolve(&url).await {
        Ok(link) => link,
        Err(e) => {
            warn!(url = %url, error = %e, "stream resolution failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error streaming: {}", e),
            )
                .into_response();
        }
    };

    let mut request = state.http.get(link.as_str());
    if let Some(range) = headers.get(header::RANGE) {
        request = request.header(header::RANGE, range.clone());
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(link = %link, error = %e, "upstream fetch failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error streaming: {}", e),
            )
                .into_response();
        }
    };

    info!(
        link = %link,
        status = %upstream.status(),
        ranged = headers.contains_key(header::RANGE),
        "relaying upstream response"
    );

    relay(upstream)
}

/// Relay upstream status and byte-serving headers verbatim, piping the
/// body through as a stream.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    let accept_ranges = upstream
        .headers()
        .get(header::ACCEPT_RANGES)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("bytes"));
    let content_length = upstream.headers().get(header::CONTENT_LENGTH).cloned();
    let content_range = upstream.headers().get(header::CONTENT_RANGE).cloned();

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::ACCEPT_RANGES, accept_ranges);
    if let Some(length) = content_length {
        headers.insert(header::CONTENT_LENGTH, length);
    }
    if let Some(range) = content_range {
        headers.insert(header::CONTENT_RANGE, range);
    }

    response
}
