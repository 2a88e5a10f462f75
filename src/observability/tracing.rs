//! Request correlation spans.

use ::tracing::Span;
use uuid::Uuid;

/// Span covering every attempt of one logical request.
pub fn request_span(request_id: Uuid, method: &str, url: &str) -> Span {
    ::tracing::info_span!("request", request_id = %request_id, method = %method, url = %url)
}
