// =============================================================================
// Fazenda API - Request Logging Middleware
// =============================================================================

use axum::{
    extract::{ConnectInfo, MatchedPath, Request},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log every request and its outcome, tagging both with a request id.
///
/// A client-supplied `x-request-id` is kept; otherwise a UUID v4 is
/// generated. The id is echoed back on the response. Responses with a
/// status of 400 or above are logged at error level.
pub async fn log_requests(mut request: Request, next: Next) -> Response {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);

    let request_id = request
        .headers()
        .get(&header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && HeaderValue::from_str(v).is_ok())
        .map(str::to_owned)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let header_value = HeaderValue::from_str(&request_id).ok();

    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".into());
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".into());

    if let Some(value) = &header_value {
        request.headers_mut().insert(header.clone(), value.clone());
    }

    tracing::info!(%request_id, %method, %target, %client, "Request");

    let start = Instant::now();
    let mut response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();

    if status >= 400 {
        tracing::error!(%request_id, %method, %target, %client, %route, status, elapsed, "Response");
    } else {
        tracing::info!(%request_id, %method, %target, %client, %route, status, elapsed, "Response");
    }

    if let Some(value) = header_value {
        response.headers_mut().insert(header, value);
    }

    response
}
