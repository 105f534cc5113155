//! Request forwarding to the backend.
//!
//! # Responsibilities
//! - Rewrite the request URI and Host header for the upstream
//! - Strip hop-by-hop headers in both directions
//! - Stream request and response bodies
//! - Map transport failures to proxy errors

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Request, Version};
use axum::response::Response;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::observability::metrics;
use crate::proxy::rule::ProxyRule;
use crate::proxy::ProxyError;

/// Headers that describe a single connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any named by `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Shared HTTP client for upstream requests.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl Forwarder {
    pub fn new(connect_timeout: Duration, request_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            request_timeout,
        }
    }

    /// Forward `request` through `rule` and return the upstream response.
    pub async fn forward(&self, rule: &ProxyRule, request: Request<Body>) -> Result<Response, ProxyError> {
        let start = Instant::now();
        let method = request.method().clone();
        let (mut parts, body) = request.into_parts();

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let uri = rule.upstream_uri(path_and_query)?;

        strip_hop_by_hop(&mut parts.headers);
        if rule.change_origin() {
            let host = HeaderValue::from_str(rule.authority().as_str())
                .map_err(|e| ProxyError::InvalidUri(e.to_string()))?;
            parts.headers.insert(header::HOST, host);
        }

        tracing::debug!(
            method = %method,
            upstream = %uri,
            change_origin = rule.change_origin(),
            "Forwarding request"
        );

        parts.uri = uri;
        parts.version = Version::HTTP_11;
        let upstream_req = Request::from_parts(parts, body);

        let result = tokio::time::timeout(self.request_timeout, self.client.request(upstream_req)).await;
        let response = match result {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(prefix = rule.prefix(), error = %e, "Upstream error");
                metrics::record_proxy_request(method.as_str(), 502, rule.prefix(), start);
                return Err(ProxyError::Upstream(e.to_string()));
            }
            Err(_) => {
                tracing::error!(prefix = rule.prefix(), timeout = ?self.request_timeout, "Upstream timed out");
                metrics::record_proxy_request(method.as_str(), 504, rule.prefix(), start);
                return Err(ProxyError::Timeout(self.request_timeout));
            }
        };

        let status = response.status();
        metrics::record_proxy_request(method.as_str(), status.as_u16(), rule.prefix(), start);

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hop_by_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive, x-trace"));
        headers.insert("keep-alive", HeaderValue::from_static("timeout=5"));
        headers.insert("x-trace", HeaderValue::from_static("1"));
        headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-request-id", HeaderValue::from_static("abc"));

        strip_hop_by_hop(&mut headers);

        assert_eq!(headers.len(), 2);
        assert!(headers.contains_key(header::CONTENT_TYPE));
        assert!(headers.contains_key("x-request-id"));
    }
}
