//! Verified identity claims.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attributes extracted from a verified Google ID token.
///
/// Everything except the subject is optional: Google omits `email`,
/// `name` and `picture` when the requested scopes do not cover them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityClaims {
    /// Stable Google account identifier (`sub` claim)
    #[schema(example = "110169484474386276334")]
    pub user_id: String,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    /// Profile picture URL
    pub picture: Option<String>,
    pub email_verified: Option<bool>,
}
