//! Responses produced by the server itself rather than by a handler.
//!
//! # Design Decisions
//! - Rejections are plain text with a fixed body per reason
//! - The body type is generic so any wrapped service can be gated

use axum::http::{header, HeaderValue, Response, StatusCode};

use crate::security::DenyReason;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Build the terminal 401 response for a denied request.
pub fn unauthorized<B>(reason: DenyReason) -> Response<B>
where
    B: From<&'static str>,
{
    let mut response = Response::new(B::from(reason.message()));
    *response.status_mut() = StatusCode::UNAUTHORIZED;

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    headers.insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
