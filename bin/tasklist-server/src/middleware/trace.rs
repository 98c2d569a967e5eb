//! Per-request tracing.
//!
//! Every request runs inside an `http_request` span keyed by a trace id. The
//! id comes from the caller's `x-trace-id` header when that holds a UUID and
//! is minted otherwise; either way it is echoed on the response.
//!
//! Bodies are only buffered here when debug logging is on. The request read is
//! capped at [`MAX_REQUEST_BODY`], the same cap the JSON extractor enforces.

use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{Instrument, Level, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::ServerError;

pub const X_TRACE_ID: &str = "x-trace-id";

/// Largest request body accepted by any route.
pub const MAX_REQUEST_BODY: usize = 1024 * 1024;

/// JSON bodies up to this size are logged verbatim.
const MAX_LOGGED_BODY: usize = 1024;

pub async fn trace_middleware(mut req: Request, next: Next) -> Response {
    let started = Instant::now();
    let trace_id = trace_id(req.headers());
    let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();
    if let Some(value) = &trace_header {
        req.headers_mut().insert(X_TRACE_ID, value.clone());
    }

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let mut response = match buffer_request(req).await {
            Ok(req) => next.run(req).await,
            Err(err) => err.into_response(),
        };
        if tracing::enabled!(Level::DEBUG) {
            response = buffer_response(response).await;
        }
        if let Some(value) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }
        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        response
    }
    .instrument(span)
    .await
}

fn trace_id(headers: &HeaderMap) -> Uuid {
    headers
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4)
}

/// Pass the request through untouched unless debug logging is on, in which
/// case the body is read (bounded), logged and re-attached.
async fn buffer_request(req: Request) -> Result<Request, ServerError> {
    if !tracing::enabled!(Level::DEBUG) {
        return Ok(req);
    }
    let (parts, body) = req.into_parts();
    let bytes = read_capped(&parts.headers, body, MAX_REQUEST_BODY).await?;
    log_body("request", &parts.headers, &bytes);
    Ok(Request::from_parts(parts, Body::from(bytes)))
}

/// Read at most `limit` bytes. A declared `Content-Length` above the limit is
/// refused before anything is read.
async fn read_capped(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, ServerError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(ServerError::PayloadTooLarge(limit));
    }

    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ServerError::PayloadTooLarge(limit)),
        Err(e) => Err(ServerError::BadRequest(format!("failed to read request body: {e}"))),
    }
}

async fn buffer_response(response: Response) -> Response {
    let (parts, body) = response.into_parts();
    match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            log_body("response", &parts.headers, &bytes);
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(e) => {
            warn!(error = %e, "failed to buffer response body");
            ServerError::Internal(format!("response body: {e}")).into_response()
        }
    }
}

fn log_body(direction: &str, headers: &HeaderMap, bytes: &Bytes) {
    if bytes.is_empty() {
        return;
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    match std::str::from_utf8(bytes) {
        Ok(text) if content_type.starts_with("application/json") && bytes.len() <= MAX_LOGGED_BODY => {
            debug!(direction, body = text, "body");
        }
        _ => debug!(direction, content_type, size = bytes.len(), "body not logged"),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn read_capped_accepts_bodies_within_limit() {
        let bytes = read_capped(&HeaderMap::new(), Body::from("{\"a\":1}"), 16).await.unwrap();
        assert_eq!(&bytes[..], b"{\"a\":1}");
    }

    #[tokio::test]
    async fn read_capped_stops_at_limit() {
        let body = Body::from(vec![b'x'; 17]);
        let err = read_capped(&HeaderMap::new(), body, 16).await.unwrap_err();
        assert!(matches!(err, ServerError::PayloadTooLarge(16)));
    }

    #[tokio::test]
    async fn read_capped_trusts_declared_length() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("4096"));
        let err = read_capped(&headers, Body::from("small"), 16).await.unwrap_err();
        assert!(matches!(err, ServerError::PayloadTooLarge(16)));
    }

    #[test]
    fn trace_id_reuses_caller_uuid_only() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(X_TRACE_ID, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(trace_id(&headers), id);

        headers.insert(X_TRACE_ID, HeaderValue::from_static("not-a-uuid"));
        assert_ne!(trace_id(&headers).to_string(), "not-a-uuid");
    }
}
