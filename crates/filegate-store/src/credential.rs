//! Scoped credentials: one operation kind, one storage resource.
//!
//! Every backend call is authorized by a short-lived HS256 token whose
//! claims name exactly one storage action and exactly one resource. The
//! [`TokenAuthority`] issues and verifies these tokens; store backends call
//! [`TokenAuthority::verify`] before touching any object. A credential that
//! grants more than its single action cannot be minted through this module.

use crate::{Result, StoreError};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Subject recorded in every issued token
const TOKEN_SUBJECT: &str = "filegate-gateway";

/// The three operations the gateway proxies. Fixed set; each maps 1:1 to a
/// backend storage action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Write an object (HTTP PUT)
    Put,
    /// Read an object (HTTP GET)
    Get,
    /// Remove an object (HTTP DELETE)
    Delete,
}

impl OperationKind {
    /// The single backend action this operation kind is entitled to.
    ///
    /// This mapping is the whole authorization policy: widening it widens
    /// what an issued credential can do.
    pub fn action(&self) -> StorageAction {
        match self {
            Self::Put => StorageAction::WriteObject,
            Self::Get => StorageAction::ReadObject,
            Self::Delete => StorageAction::DeleteObject,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Put => "PUT",
            Self::Get => "GET",
            Self::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

/// Backend storage actions a credential can name in its scope claim
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageAction {
    WriteObject,
    ReadObject,
    DeleteObject,
}

impl StorageAction {
    /// The scope string carried in token claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WriteObject => "object:write",
            Self::ReadObject => "object:read",
            Self::DeleteObject => "object:delete",
        }
    }
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims carried by a scoped credential token
#[derive(Debug, Serialize, Deserialize)]
pub struct ScopeClaims {
    /// Issuing component
    pub sub: String,
    /// Exactly one storage action (e.g. `object:read`)
    pub scope: String,
    /// The one storage resource this credential applies to
    pub resource: String,
    /// Expiration time (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Token id; fresh per issuance, so tokens rotate while scope stays fixed
    pub jti: String,
}

/// A credential authorizing exactly one [`OperationKind`] on exactly one
/// storage resource.
///
/// Opaque to holders: the gateway carries it for the duration of a single
/// proxied call and never caches it across unrelated requests.
#[derive(Clone, Debug)]
pub struct ScopedCredential {
    /// The operation this credential was issued for
    pub operation: OperationKind,
    /// The storage resource identity the credential is bound to
    pub resource: String,
    /// Signed token text; the backend is the only consumer
    pub token: String,
}

/// Errors from credential issuance
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The issuing authority could not produce a token
    #[error("credential authority unavailable: {0}")]
    Unavailable(String),
}

/// Issues and verifies scoped credential tokens.
///
/// This is the in-process stand-in for the external credential-issuing
/// authority: the gateway issues through it, and backends that share the
/// signing key (the in-memory store, or a remote deployment configured with
/// the same secret) verify through it. Issuance is deterministic in scope
/// and idempotent: repeated calls for the same operation kind always grant
/// the identical action, while `jti` and `exp` rotate.
pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    resource: String,
    ttl_secs: i64,
}

impl TokenAuthority {
    /// Create an authority for one storage resource with an HS256 secret
    pub fn new(secret: &str, resource: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            resource: resource.into(),
            ttl_secs: ttl_secs as i64,
        }
    }

    /// The storage resource this authority issues for
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Issue a credential for exactly one operation kind.
    ///
    /// Safe under concurrent invocation; holds no mutable state.
    pub fn issue(&self, operation: OperationKind) -> std::result::Result<ScopedCredential, CredentialError> {
        let now = Utc::now().timestamp();
        let claims = ScopeClaims {
            sub: TOKEN_SUBJECT.to_string(),
            scope: operation.action().as_str().to_string(),
            resource: self.resource.clone(),
            exp: now + self.ttl_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Unavailable(e.to_string()))?;

        Ok(ScopedCredential {
            operation,
            resource: self.resource.clone(),
            token,
        })
    }

    /// Verify that a credential grants `required` on this authority's
    /// resource. The token is the source of truth; the struct's tag is
    /// never trusted.
    pub fn verify(&self, credential: &ScopedCredential, required: StorageAction) -> Result<()> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        let claims = decode::<ScopeClaims>(&credential.token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "credential token rejected");
                StoreError::AccessDenied("invalid or expired credential".to_string())
            })?
            .claims;

        if claims.resource != self.resource {
            return Err(StoreError::AccessDenied(format!(
                "credential is bound to resource {}, not {}",
                claims.resource, self.resource
            )));
        }

        if claims.scope != required.as_str() {
            return Err(StoreError::AccessDenied(format!(
                "credential scope {} does not grant {}",
                claims.scope, required
            )));
        }

        Ok(())
    }
}
