//! Request ID middleware for request tracing and correlation.
//!
//! The id comes from an upstream proxy's `x-request-id` header when it looks
//! sane, otherwise a UUID v4 is generated. It is recorded in the tracing
//! span, tagged on the Sentry scope and echoed in the response.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id we accept as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

/// The id assigned to the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Use the upstream id if it is short printable ASCII, else mint one.
fn choose_request_id(upstream: Option<&str>) -> String {
    upstream
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_UPSTREAM_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned)
}

/// Middleware that ensures every request has a request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = choose_request_id(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok()),
    );

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_reasonable_upstream_id() {
        assert_eq!(choose_request_id(Some("cf-7d3a9e")), "cf-7d3a9e");
    }

    #[test]
    fn test_replaces_missing_or_suspicious_ids() {
        for upstream in [None, Some(""), Some("has space"), Some("é")] {
            let id = choose_request_id(upstream);
            assert!(Uuid::parse_str(&id).is_ok(), "{upstream:?} -> {id}");
        }

        let long = "a".repeat(MAX_UPSTREAM_ID_LEN + 1);
        assert_ne!(choose_request_id(Some(&long)), long);
    }
}
