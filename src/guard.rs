use crate::claims::ClaimSet;
use crate::errors::AuthResult;
use crate::header::bearer_token;
use crate::permissions::check_permission;
use crate::verifier::TokenVerifier;
use std::future::Future;

/// Composed entry point protecting mutating routes: header extraction,
/// token verification, and permission enforcement, failing closed at the
/// first stage that rejects.
///
/// The guard has no side effects of its own beyond the key store's network
/// read, never mutates persisted state, and never logs token contents.
pub struct AuthorizationGuard {
    verifier: TokenVerifier,
}

impl AuthorizationGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Authorize one request against a required permission.
    ///
    /// `authorization` is the raw `Authorization` header value, if any. On
    /// success the verified [`ClaimSet`] is returned for the caller to pass
    /// into the protected operation; on failure the error carries the exact
    /// status the route layer must respond with. A rejected invocation
    /// never proceeds to a later stage: a malformed header is reported
    /// before any key set fetch can happen.
    pub async fn authorize(
        &self,
        required_permission: &str,
        authorization: Option<&str>,
    ) -> AuthResult<ClaimSet> {
        let result = self
            .authorize_inner(required_permission, authorization)
            .await;
        if let Err(err) = &result {
            tracing::debug!(
                code = err.code(),
                status = err.status().as_u16(),
                permission = required_permission,
                "authorization rejected"
            );
        }
        result
    }

    async fn authorize_inner(
        &self,
        required_permission: &str,
        authorization: Option<&str>,
    ) -> AuthResult<ClaimSet> {
        let token = bearer_token(authorization)?;
        let claims = self.verifier.verify(token).await?;
        check_permission(required_permission, &claims)?;
        Ok(claims)
    }

    /// Run `handler` with the verified claim set if and only if
    /// authorization succeeds; otherwise the handler never executes.
    ///
    /// This is the wrapping contract route layers build on: the same
    /// output type as the inner operation, with the authorization context
    /// injected as its argument.
    pub async fn with_authorization<F, Fut, T>(
        &self,
        required_permission: &str,
        authorization: Option<&str>,
        handler: F,
    ) -> AuthResult<T>
    where
        F: FnOnce(ClaimSet) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(required_permission, authorization).await?;
        Ok(handler(claims).await)
    }
}
