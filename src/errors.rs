use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// Authorization failure surfaced by any stage of the guard chain.
///
/// Every variant carries a stable machine-readable code and an HTTP status
/// so the route layer can render it without inspecting variants. No stage
/// returns a sentinel claim set on failure; this enum is the only failure
/// channel.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,
    #[error("{0}")]
    MalformedHeader(&'static str),
    #[error("authorization token header has no key id")]
    MissingKeyId,
    #[error("unable to parse authentication token: {0}")]
    UnparseableToken(String),
    #[error("no signing key matches kid {0}")]
    SigningKeyNotFound(String),
    #[error("token expired")]
    TokenExpired,
    #[error("incorrect claims, check the audience and issuer: {0}")]
    InvalidClaims(String),
    #[error("permissions not included in token")]
    MissingPermissions,
    #[error("permission {0} not granted")]
    Unauthorized(String),
    #[error("signing key set fetch failed: {0}")]
    KeyFetchFailed(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Stable wire code for the route layer's error body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader(_) => "malformed_header",
            AuthError::MissingKeyId | AuthError::UnparseableToken(_) => "invalid_header",
            AuthError::SigningKeyNotFound(_) => "signing_key_not_found",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) | AuthError::MissingPermissions => "invalid_claims",
            AuthError::Unauthorized(_) => "unauthorized",
            AuthError::KeyFetchFailed(_) => "key_fetch_failed",
        }
    }

    /// Status the route layer must tag the response with, unaltered.
    ///
    /// Missing key id keeps 401 while an unparseable token is 400; the same
    /// split applies to claim mismatches (401) versus an absent permissions
    /// field (400). Clients use the split to tell re-authentication apart
    /// from permission escalation.
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::MissingKeyId
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            AuthError::UnparseableToken(_)
            | AuthError::SigningKeyNotFound(_)
            | AuthError::MissingPermissions => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AuthError::KeyFetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body for the route layer's generic error-to-response mapping.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            code: self.code(),
            description: self.to_string(),
        }
    }
}

/// Serialized error shape shared by every protected route.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub code: &'static str,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_statuses_are_stable() {
        let cases: Vec<(AuthError, &str, u16)> = vec![
            (AuthError::MissingHeader, "missing_header", 401),
            (
                AuthError::MalformedHeader("token not found"),
                "malformed_header",
                401,
            ),
            (AuthError::MissingKeyId, "invalid_header", 401),
            (
                AuthError::UnparseableToken("bad segment".to_string()),
                "invalid_header",
                400,
            ),
            (
                AuthError::SigningKeyNotFound("k1".to_string()),
                "signing_key_not_found",
                400,
            ),
            (AuthError::TokenExpired, "token_expired", 401),
            (
                AuthError::InvalidClaims("InvalidAudience".to_string()),
                "invalid_claims",
                401,
            ),
            (AuthError::MissingPermissions, "invalid_claims", 400),
            (
                AuthError::Unauthorized("post:drinks".to_string()),
                "unauthorized",
                403,
            ),
            (
                AuthError::KeyFetchFailed("timed out".to_string()),
                "key_fetch_failed",
                500,
            ),
        ];
        for (error, code, status) in cases {
            assert_eq!(error.code(), code);
            assert_eq!(error.status().as_u16(), status);
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn body_shape_matches_route_contract() {
        let body = AuthError::Unauthorized("post:drinks".to_string()).to_body();
        let rendered = serde_json::to_value(&body).expect("serialize");
        assert_eq!(rendered["success"], false);
        assert_eq!(rendered["code"], "unauthorized");
        assert!(rendered["description"]
            .as_str()
            .expect("description")
            .contains("post:drinks"));
    }
}
