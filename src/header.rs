use crate::errors::{AuthError, AuthResult};

/// Extract the bearer token from a raw `Authorization` header value.
///
/// Pure string validation: the scheme must be `Bearer` (case-insensitive)
/// followed by exactly one token segment. A credential containing embedded
/// whitespace is rejected rather than truncated. No network or key-store
/// access happens on any failure path.
pub fn bearer_token(header: Option<&str>) -> AuthResult<&str> {
    let header = header
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingHeader)?;

    let mut parts = header.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::MissingHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader(
            "authorization header must start with Bearer",
        ));
    }
    let token = parts
        .next()
        .ok_or(AuthError::MalformedHeader("bearer token not found"))?;
    if parts.next().is_some() {
        return Err(AuthError::MalformedHeader(
            "authorization header must be a single bearer token",
        ));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_token() {
        assert_eq!(
            bearer_token(Some("Bearer eyJhbGc.abc.sig")).expect("token"),
            "eyJhbGc.abc.sig"
        );
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(bearer_token(Some("bearer tok")).expect("token"), "tok");
        assert_eq!(bearer_token(Some("BEARER tok")).expect("token"), "tok");
    }

    #[test]
    fn missing_or_empty_header() {
        assert!(matches!(bearer_token(None), Err(AuthError::MissingHeader)));
        assert!(matches!(
            bearer_token(Some("")),
            Err(AuthError::MissingHeader)
        ));
        assert!(matches!(
            bearer_token(Some("   ")),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn wrong_scheme() {
        let err = bearer_token(Some("Token abc")).expect_err("wrong scheme");
        assert!(matches!(err, AuthError::MalformedHeader(_)));
        assert_eq!(err.status().as_u16(), 401);
    }

    #[test]
    fn scheme_without_token() {
        let err = bearer_token(Some("Bearer")).expect_err("no token segment");
        assert!(matches!(err, AuthError::MalformedHeader(_)));
        assert_eq!(err.status().as_u16(), 401);
    }

    #[test]
    fn embedded_whitespace_rejected() {
        let err = bearer_token(Some("Bearer abc def")).expect_err("extra segment");
        assert!(matches!(err, AuthError::MalformedHeader(_)));
    }
}
