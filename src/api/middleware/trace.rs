//! Request tracing middleware.
//!
//! Assigns a v4 UUID to each inbound request and opens a tracing span
//! carrying it, so every log record emitted while handling the request is
//! tagged with the same id. Must be the outermost layer of the router so
//! failures anywhere downstream are still tagged.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub async fn trace_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!(
        "request",
        uuid = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        tracing::debug!("Request started");
        let mut response = next.run(request).await;

        // Hyphenated UUIDs are always valid header values.
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert("x-request-id", value);
        }

        tracing::debug!(status = response.status().as_u16(), "Request completed");
        response
    }
    .instrument(span)
    .await
}
