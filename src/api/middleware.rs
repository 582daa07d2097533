use axum::body::Body;
use axum::http::{HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id shared by the request log, the audit trail and the response header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    /// Caller-supplied `x-request-id` when it is printable and non-blank,
    /// otherwise a fresh UUID v4.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(Self::generate, |s| Self(s.to_string()))
    }

    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    fn stamp(&self, headers: &mut HeaderMap) {
        match HeaderValue::from_str(&self.0) {
            Ok(value) => {
                headers.insert(REQUEST_ID_HEADER, value);
            }
            Err(e) => tracing::warn!(target: "http", correlation_id = %self.0, "Cannot echo request id: {}", e),
        }
    }
}

pub async fn correlation_middleware(mut req: Request<Body>, next: Next) -> Response {
    let correlation_id = CorrelationId::from_headers(req.headers());
    req.extensions_mut().insert(correlation_id.clone());

    let mut response = next.run(req).await;
    correlation_id.stamp(response.headers_mut());
    response
}

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let correlation_id = req
        .extensions()
        .get::<CorrelationId>()
        .map(|id| id.0.clone())
        .unwrap_or_default();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis() as u64;

    if path == "/health" {
        tracing::trace!(target: "http", %correlation_id, %method, %path, status, duration_ms, "health check");
    } else if response.status().is_server_error() {
        tracing::error!(target: "http", %correlation_id, %method, %path, status, duration_ms, "request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(target: "http", %correlation_id, %method, %path, status, duration_ms, "request rejected");
    } else {
        tracing::info!(target: "http", %correlation_id, %method, %path, status, duration_ms, "request");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_request_id_is_reused_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  req-7 "));

        assert_eq!(CorrelationId::from_headers(&headers), CorrelationId("req-7".to_string()));
    }

    #[test]
    fn test_blank_or_missing_request_id_is_generated() {
        let mut headers = HeaderMap::new();
        let generated = CorrelationId::from_headers(&headers);
        assert!(Uuid::parse_str(&generated.0).is_ok());

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        let generated = CorrelationId::from_headers(&headers);
        assert!(Uuid::parse_str(&generated.0).is_ok());
    }

    #[test]
    fn test_stamp_writes_response_header() {
        let mut headers = HeaderMap::new();
        CorrelationId("req-9".to_string()).stamp(&mut headers);

        assert_eq!(headers.get(REQUEST_ID_HEADER).unwrap(), "req-9");
    }
}
