use serde::{Deserialize, Serialize};

/// Decoded, verified token payload.
///
/// Only [`TokenVerifier::verify`](crate::verifier::TokenVerifier::verify)
/// constructs this; downstream code never observes a partially verified
/// claim set. `permissions` stays `Option` so the enforcer can tell an
/// issuer that omitted the field (malformed for this system) apart from an
/// issuer that granted zero permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}
