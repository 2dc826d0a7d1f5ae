//! Path grammar and method mapping
//!
//! The gateway accepts exactly one path shape: `/files/{folder}/{file}`.
//! Routing is a pure function of the raw request path and method, so it can
//! be checked without a running server and fails before any credential is
//! issued or any backend call is made.

use axum::http::Method;
use filegate_store::{InvalidKey, ObjectKey, OperationKind};
use thiserror::Error;

/// Errors from request routing
#[derive(Error, Debug)]
pub enum RouteError {
    /// Path does not match `/files/{folder}/{file}`
    #[error("malformed path: {0}")]
    MalformedPath(String),

    /// Method has no mapped storage operation
    #[error("unsupported method: {0}")]
    UnsupportedMethod(Method),
}

impl From<InvalidKey> for RouteError {
    fn from(err: InvalidKey) -> Self {
        RouteError::MalformedPath(err.to_string())
    }
}

/// Parse a raw request path and method into an operation kind and object
/// key.
///
/// Pure; no side effects. Each path segment is percent-decoded exactly
/// once, after which the key invariants (non-empty, separator-free) are
/// enforced, so an encoded `%2F` cannot smuggle a third segment in.
pub fn route(path: &str, method: &Method) -> Result<(OperationKind, ObjectKey), RouteError> {
    let operation = match *method {
        Method::PUT => OperationKind::Put,
        Method::GET => OperationKind::Get,
        Method::DELETE => OperationKind::Delete,
        _ => return Err(RouteError::UnsupportedMethod(method.clone())),
    };

    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    let [prefix, folder, file] = segments.as_slice() else {
        return Err(RouteError::MalformedPath(format!(
            "expected /files/{{folder}}/{{file}}, got {}",
            path
        )));
    };

    if *prefix != "files" {
        return Err(RouteError::MalformedPath(format!(
            "unknown prefix {}, expected files",
            prefix
        )));
    }

    let folder = decode_segment(folder)?;
    let file = decode_segment(file)?;
    let key = ObjectKey::new(folder, file)?;

    Ok((operation, key))
}

fn decode_segment(segment: &str) -> Result<String, RouteError> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|_| RouteError::MalformedPath("invalid percent-encoding".to_string()))
}
