//! Bearer-token verification and permission enforcement for Cantina API
//! services.
//!
//! # Purpose
//! Protect mutating routes (drinks, bookings, clients, vehicles) by
//! verifying externally issued JWTs against the issuer's published JWKS and
//! enforcing exact-match permission scopes before a handler runs.
//!
//! # How it fits
//! The route layer hands the guard a required permission and the raw
//! `Authorization` header; the guard either yields a verified [`ClaimSet`]
//! for the handler or a typed [`AuthError`] carrying the HTTP status the
//! route layer must respond with. This crate never issues tokens, never
//! touches persisted state, and never formats HTTP responses.
//!
//! # Key invariants
//! - A [`ClaimSet`] is only observable after signature, audience, issuer,
//!   and expiry checks have all passed.
//! - Accepted signature algorithms come from configuration, never from the
//!   untrusted token header.
//! - Every stage fails closed; a rejected request never reaches a later
//!   stage, and a malformed header never triggers a key-set fetch.
//! - The cached key set is an immutable snapshot swapped atomically on
//!   refresh; concurrent cache misses coalesce into one outbound fetch.
//!
//! # Examples
//! ```rust,no_run
//! use cantina_authz::{AuthConfig, AuthorizationGuard};
//!
//! async fn handle(authorization: Option<&str>) {
//!     let config = AuthConfig::from_env().expect("auth configuration");
//!     let guard = AuthorizationGuard::from_config(&config);
//!     match guard.authorize("post:drinks", authorization).await {
//!         // Run the protected operation with the verified claims.
//!         Ok(claims) => drop(claims),
//!         // The route layer responds with err.status() and err.to_body().
//!         Err(err) => drop(err.to_body()),
//!     }
//! }
//! ```
//!
//! # Common pitfalls
//! - Issuer and audience must match the token issuer's configuration
//!   exactly; a trailing-slash mismatch on the issuer fails every token.
//! - An issuer that omits the `permissions` claim entirely produces a 400,
//!   not a 403; grant-zero-permissions tokens produce 403.

mod claims;
mod config;
mod errors;
mod guard;
mod header;
mod jwks;
mod keystore;
mod permissions;
mod verifier;

pub use claims::ClaimSet;
pub use config::{AuthConfig, ConfigError};
pub use errors::{AuthError, AuthResult, ErrorBody};
pub use guard::AuthorizationGuard;
pub use header::bearer_token;
pub use jwks::{Jwk, Jwks};
pub use keystore::{KeyStore, RemoteKeyStore};
pub use permissions::check_permission;
pub use verifier::TokenVerifier;
