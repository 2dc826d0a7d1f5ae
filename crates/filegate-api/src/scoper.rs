//! Credential scoping
//!
//! The scoper is the only component that turns an operation kind into a
//! credential. Its policy is the fixed per-operation action table on
//! [`OperationKind::action`]: a PUT request can only ever obtain a
//! write-object credential, never anything wider. Tokens themselves may
//! rotate between calls; the granted scope never does.

use filegate_store::{CredentialError, OperationKind, ScopedCredential, TokenAuthority};
use std::sync::Arc;

/// Trait for credential scoping at the gateway seam.
///
/// Implementations must be deterministic in scope, idempotent, and safe
/// under concurrent invocation from many simultaneous requests.
pub trait CredentialScoper: Send + Sync {
    /// Produce a credential authorized for exactly `operation` on the one
    /// storage resource this gateway serves.
    fn scope(&self, operation: OperationKind) -> Result<ScopedCredential, CredentialError>;
}

/// Scoper backed by the token authority
pub struct AuthorityScoper {
    authority: Arc<TokenAuthority>,
}

impl AuthorityScoper {
    /// Create a scoper issuing through the given authority
    pub fn new(authority: Arc<TokenAuthority>) -> Self {
        Self { authority }
    }
}

impl CredentialScoper for AuthorityScoper {
    fn scope(&self, operation: OperationKind) -> Result<ScopedCredential, CredentialError> {
        self.authority.issue(operation)
    }
}
