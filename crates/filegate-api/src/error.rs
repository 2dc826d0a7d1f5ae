//! Error types and HTTP status translation
//!
//! Every component returns a typed failure; this module is the one place
//! those failures become HTTP responses. No failure is ever downgraded to
//! a success status.

use crate::router::RouteError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use filegate_store::{CredentialError, ObjectKey, OperationKind, StoreError};
use thiserror::Error;

/// Failures from the object proxy
#[derive(Error, Debug)]
pub enum ProxyError {
    /// No object at the key (GET/DELETE on absent keys; routine)
    #[error("object not found: {0}")]
    NotFound(ObjectKey),

    /// The backend rejected the credential's scope
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Transient backend failure
    #[error("backend unavailable: {0}")]
    Backend(String),

    /// The backend call exceeded the per-request timeout
    #[error("backend call timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The proxy was invoked with a body where none belongs, or without
    /// one where it is required
    #[error("{operation} invoked with mismatched body")]
    BodyMismatch { operation: OperationKind },
}

impl From<StoreError> for ProxyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => ProxyError::NotFound(key),
            StoreError::AccessDenied(reason) => ProxyError::AccessDenied(reason),
            StoreError::Timeout { seconds } => ProxyError::Timeout { seconds },
            StoreError::Unavailable(msg)
            | StoreError::Connection(msg)
            | StoreError::Http(msg)
            | StoreError::Configuration(msg) => ProxyError::Backend(msg),
        }
    }
}

/// Gateway error type
#[derive(Error, Debug)]
pub enum ApiError {
    /// Path does not match the `/files/{folder}/{file}` grammar
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// Method maps to no storage operation
    #[error("method not supported: {0}")]
    UnsupportedMethod(String),

    /// No object at the requested key
    #[error("object not found: {0}")]
    NotFound(String),

    /// The backend refused the scoped credential
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The credential authority could not issue a token
    #[error("credential authority unavailable: {0}")]
    CredentialUnavailable(String),

    /// Transient backend failure
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Backend call exceeded the per-request deadline
    #[error("backend timed out after {seconds}s")]
    BackendTimeout { seconds: u64 },

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable error code for the response body
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedPath(_) => "MalformedPath",
            Self::UnsupportedMethod(_) => "UnsupportedMethod",
            Self::NotFound(_) => "ObjectNotFound",
            Self::AccessDenied(_) => "AccessDenied",
            Self::CredentialUnavailable(_) => "CredentialUnavailable",
            Self::BackendUnavailable(_) => "BackendUnavailable",
            Self::BackendTimeout { .. } => "BackendTimeout",
            Self::Internal(_) => "InternalError",
        }
    }

    /// HTTP status for this failure kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedPath(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::CredentialUnavailable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::BackendTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<RouteError> for ApiError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::MalformedPath(msg) => ApiError::MalformedPath(msg),
            RouteError::UnsupportedMethod(method) => {
                ApiError::UnsupportedMethod(method.to_string())
            }
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Unavailable(msg) => ApiError::CredentialUnavailable(msg),
        }
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::NotFound(key) => ApiError::NotFound(key.to_string()),
            ProxyError::AccessDenied(reason) => ApiError::AccessDenied(reason),
            ProxyError::Backend(msg) => ApiError::BackendUnavailable(msg),
            ProxyError::Timeout { seconds } => ApiError::BackendTimeout { seconds },
            ProxyError::BodyMismatch { operation } => {
                ApiError::Internal(format!("{} invoked with mismatched body", operation))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // A denial here means the per-operation credential mapping has
        // drifted: the scoper issued something the backend refused.
        if let Self::AccessDenied(ref reason) = self {
            tracing::error!(
                reason = %reason,
                "backend denied a gateway-issued credential; \
                 the least-privilege operation mapping has drifted"
            );
        }

        let request_id = uuid::Uuid::new_v4().to_string();
        let body = serde_json::json!({
            "code": self.code(),
            "message": self.to_string(),
            "requestId": request_id,
        });

        (
            self.status_code(),
            [
                (header::CONTENT_TYPE.as_str(), "application/json"),
                ("x-request-id", request_id.as_str()),
            ],
            body.to_string(),
        )
            .into_response()
    }
}
