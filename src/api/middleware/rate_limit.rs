//! Request-admission middleware
//!
//! One instance per route class; attach with
//! `middleware::from_fn_with_state((state, class), rate_limit_middleware)`.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::middleware::session::session_owner;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::rate_limit::RouteClass;
use crate::infrastructure::rate_limit::Admission;

/// Evaluate the request against its route class before the handler runs
///
/// The resolved counting identity is attached as a request extension for
/// downstream consumers. Counter failures deny with 503 rather than letting
/// traffic through an unobservable window.
pub async fn rate_limit_middleware(
    State((state, class)): State<(AppState, RouteClass)>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let owner = session_owner(request.headers());
    let address = client_address(&request);

    let identity = state
        .rate_limiter
        .resolve_identity(class, owner.as_ref(), &address);

    let admission = match state.rate_limiter.check(class, &path, &identity).await {
        Ok(admission) => admission,
        Err(e) => return ApiError::from(e).into_response(),
    };

    if !admission.admitted {
        let mut response = ApiError::too_many_requests(admission.reset_secs).into_response();
        apply_quota_headers(response.headers_mut(), &admission);
        return response;
    }

    let mut request = request;
    request.extensions_mut().insert(identity);

    let mut response = next.run(request).await;
    apply_quota_headers(response.headers_mut(), &admission);
    response
}

/// Resolve the client network address
///
/// CF-Connecting-IP first (set by the edge), then the first X-Forwarded-For
/// entry, then the raw socket address. "unknown" only when none exist, which
/// collapses such requests into one shared allowance.
pub fn client_address(request: &Request<Body>) -> String {
    let headers = request.headers();

    if let Some(ip) = header_str(headers, "cf-connecting-ip") {
        return ip.to_string();
    }

    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn apply_quota_headers(headers: &mut HeaderMap, admission: &Admission) {
    let pairs = [
        ("ratelimit-limit", admission.limit as u64),
        ("ratelimit-remaining", admission.remaining as u64),
        ("ratelimit-reset", admission.reset_secs),
    ];

    for (name, value) in pairs {
        if let Ok(value) = HeaderValue::from_str(&value.to_string()) {
            headers.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_headers(pairs: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri("/api/keys");
        for (name, value) in pairs {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_cf_connecting_ip_wins() {
        let request = request_with_headers(&[
            ("cf-connecting-ip", "203.0.113.7"),
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
        ]);

        assert_eq!(client_address(&request), "203.0.113.7");
    }

    #[test]
    fn test_first_forwarded_entry() {
        let request = request_with_headers(&[("x-forwarded-for", " 198.51.100.4 , 10.0.0.2")]);

        assert_eq!(client_address(&request), "198.51.100.4");
    }

    #[test]
    fn test_socket_address_fallback() {
        let mut request = request_with_headers(&[]);
        let addr: SocketAddr = "192.0.2.9:55012".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(addr));

        assert_eq!(client_address(&request), "192.0.2.9");
    }

    #[test]
    fn test_unknown_when_nothing_available() {
        let request = request_with_headers(&[]);

        assert_eq!(client_address(&request), "unknown");
    }

    #[test]
    fn test_quota_headers() {
        let mut headers = HeaderMap::new();
        apply_quota_headers(
            &mut headers,
            &Admission {
                admitted: true,
                limit: 100,
                remaining: 97,
                reset_secs: 42,
            },
        );

        assert_eq!(headers["ratelimit-limit"], "100");
        assert_eq!(headers["ratelimit-remaining"], "97");
        assert_eq!(headers["ratelimit-reset"], "42");
    }
}
