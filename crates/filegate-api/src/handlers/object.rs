//! File operation entry point
//!
//! One handler serves the whole `/files/...` surface. Each request walks
//! the same pipeline (route, scope, proxy, respond) and stops at the
//! first failure, so a malformed path never reaches the scoper and a
//! scoping failure never reaches the backend.

use crate::proxy::ProxyOutcome;
use crate::{router, ApiError, AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use filegate_store::OperationKind;
use std::sync::Arc;

/// PUT/GET/DELETE `/files/{folder}/{file}` - proxy one storage operation
pub async fn object_entry(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let (operation, key) = router::route(uri.path(), &method)?;

    let credential = state.scoper.scope(operation)?;

    // Arbitrary MIME types pass through untouched; an omitted type falls
    // back to the backend's binary default.
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM.as_ref());

    let body = match operation {
        OperationKind::Put => Some(body),
        OperationKind::Get | OperationKind::Delete => None,
    };

    let outcome = state
        .proxy
        .execute(operation, &key, &credential, content_type, body)
        .await?;

    tracing::debug!(operation = %operation, key = %key, "proxied storage call");

    Ok(match outcome {
        ProxyOutcome::Stored { content_type } => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, content_type)],
            Body::empty(),
        )
            .into_response(),
        ProxyOutcome::Fetched { content_type, body } => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_LENGTH, body.len().to_string())
            .body(Body::from(body))
            .unwrap(),
        ProxyOutcome::Deleted => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Fallback for paths outside the file API
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such endpoint".to_string())
}
