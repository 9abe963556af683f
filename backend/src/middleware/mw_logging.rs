//! # Request/Response Logging Middleware
//!
//! One line per request and one per response, tagged with the request id from
//! [`RequestStamp`](super::RequestStamp). Headers are logged at debug level
//! with credentials redacted. Bodies are never logged: `/chat` bodies carry
//! whatever the visitor typed.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::RequestStamp;

const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "x-api-key", "x-auth-token"];

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let client_ip = req
        .headers()
        .get("x-forwarded-for")
        .or_else(|| req.headers().get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        client_ip = ?client_ip,
        "[REQUEST] {} {}",
        method,
        path
    );
    debug!(
        request_id = %request_id,
        headers = ?redacted_headers(&req),
        "[REQUEST HEADERS]"
    );

    let response = next.run(req).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    } else {
        info!(
            request_id = %request_id,
            status = status.as_u16(),
            duration_ms,
            "[RESPONSE] {} {} -> {} ({}ms)",
            method,
            path,
            status.as_u16(),
            duration_ms
        );
    }

    response
}

fn redacted_headers(req: &Request) -> Vec<(String, String)> {
    req.headers()
        .iter()
        .filter_map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                Some((name.to_string(), "***REDACTED***".to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}
