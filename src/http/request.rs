//! Request identification.
//!
//! Every request gets an `x-request-id` (UUID v4) unless the client already
//! sent one. The id is forwarded upstream with the other headers, echoed on
//! the response, and recorded on the request span.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// The request id header, if present and printable.
pub fn request_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_generated_id_is_uuid() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let id = MakeRequestUuid.make_request_id(&req).unwrap();
        let id = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_request_id_lookup() {
        let req = Request::builder()
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(request_id(&req), Some("abc-123"));

        let bare = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(request_id(&bare), None);
    }
}
