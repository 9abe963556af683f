//! # Request Stamping Middleware
//!
//! Gives every request an id, stored in the request extensions as a
//! [`RequestStamp`] and echoed back in the `X-Request-ID` response header.
//! An id supplied by a proxy in the same header is kept.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::SystemTime;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest incoming id we accept as is
const MAX_FORWARDED_ID_LEN: usize = 64;

#[derive(Clone, Debug)]
pub struct RequestStamp {
    pub id: String,
    pub timestamp: SystemTime,
}

impl RequestStamp {
    fn for_request(req: &Request) -> Self {
        let forwarded = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_FORWARDED_ID_LEN)
            .map(String::from);

        Self {
            id: forwarded.unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: SystemTime::now(),
        }
    }
}

pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::for_request(&req);
    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(stamp): Extension<RequestStamp>| async move { stamp.id }),
            )
            .layer(axum::middleware::from_fn(stamp_req))
    }

    #[tokio::test]
    async fn test_generates_id() {
        let response = app()
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&header).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, header.as_bytes());
    }

    #[tokio::test]
    async fn test_keeps_forwarded_id() {
        let response = app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "edge-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "edge-42");
    }
}
