use crate::claims::ClaimSet;
use crate::errors::{AuthError, AuthResult};

/// Check that a verified claim set grants the required permission.
///
/// Permissions follow the `action:resource` convention (`post:drinks`,
/// `delete:bookings`) but are compared as opaque strings: exact membership
/// only, no prefix or wildcard matching. A claim set without a permissions
/// field at all is malformed for this system — every protected route
/// requires scoped claims — and is reported separately from a token that
/// simply lacks the requested grant.
pub fn check_permission(required: &str, claims: &ClaimSet) -> AuthResult<()> {
    debug_assert!(
        !required.is_empty(),
        "protected routes must declare a required permission"
    );
    let granted = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::MissingPermissions)?;
    if !granted.iter().any(|permission| permission == required) {
        return Err(AuthError::Unauthorized(required.to_string()));
    }
    Ok(())
}
