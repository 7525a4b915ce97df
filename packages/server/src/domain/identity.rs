//! Identity gate interface.

use super::{AuthError, Identity};

/// Verifies a bearer credential and resolves the caller's identity and role.
///
/// Only the conversation store's HTTP surface consults the gate; the realtime
/// layer trusts room keys sent by already-authenticated clients.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityGate: Send + Sync {
    fn verify(&self, credential: &str) -> Result<Identity, AuthError>;
}
