//! Identity verification port.

use crate::domain::IdentityClaims;
use crate::error::IdentityError;

/// Verifies an identity token and returns its claims.
///
/// Implementations own signature, expiry and audience checks; any rejection
/// is reported as [`IdentityError::InvalidToken`] carrying the diagnostic.
#[async_trait::async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<IdentityClaims, IdentityError>;
}
