//! Signing key resolution backed by the issuer's published JWKS.
//!
//! The remote store keeps one immutable snapshot of decoded keys and swaps
//! it wholesale on refresh, so concurrent readers never observe a
//! half-updated set. Refreshes are serialized: callers that miss the cache
//! at the same moment wait on a single outbound fetch and all receive its
//! result.
use crate::errors::{AuthError, AuthResult};
use crate::jwks::Jwks;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of verification keys, looked up by `kid`.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Return the key matching `kid`, or fail with
    /// [`AuthError::SigningKeyNotFound`]. A key whose type or usage is not
    /// supported for signature verification is treated as not found.
    async fn signing_key(&self, kid: &str) -> AuthResult<DecodingKey>;
}

/// Fixed in-memory key set, useful for tests and deployments that pin keys.
#[async_trait]
impl KeyStore for HashMap<String, DecodingKey> {
    async fn signing_key(&self, kid: &str) -> AuthResult<DecodingKey> {
        self.get(kid)
            .cloned()
            .ok_or_else(|| AuthError::SigningKeyNotFound(kid.to_string()))
    }
}

type KeySnapshot = Arc<HashMap<String, DecodingKey>>;

struct CachedKeys {
    keys: KeySnapshot,
    expires_at: Instant,
}

/// Key store that fetches the issuer's JWKS document on demand and caches
/// the decoded set for a bounded TTL. A key whose declared algorithm falls
/// outside the accepted list is never installed in the snapshot.
pub struct RemoteKeyStore {
    jwks_url: String,
    client: reqwest::Client,
    algorithms: Vec<Algorithm>,
    ttl: Duration,
    fetch_timeout: Duration,
    snapshot: RwLock<Option<CachedKeys>>,
    refresh: tokio::sync::Mutex<()>,
}

impl RemoteKeyStore {
    pub fn new(
        jwks_url: impl Into<String>,
        algorithms: Vec<Algorithm>,
        ttl: Duration,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            client: reqwest::Client::new(),
            algorithms,
            ttl,
            fetch_timeout,
            snapshot: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    fn fresh_snapshot(&self) -> Option<KeySnapshot> {
        let guard = self.snapshot.read();
        guard.as_ref().and_then(|cached| {
            if cached.expires_at > Instant::now() {
                Some(cached.keys.clone())
            } else {
                None
            }
        })
    }

    /// Refresh the snapshot behind the serialization lock.
    ///
    /// `searched` is the snapshot the caller already looked in, if any.
    /// After acquiring the lock, a snapshot that is fresh and different from
    /// `searched` was installed by a concurrent caller and is returned
    /// without another fetch; this is what coalesces a miss storm into one
    /// outbound request.
    async fn refresh(&self, searched: Option<&KeySnapshot>) -> AuthResult<KeySnapshot> {
        let _serialized = self.refresh.lock().await;

        if let Some(keys) = self.fresh_snapshot() {
            let already_searched = searched.map_or(false, |prev| Arc::ptr_eq(prev, &keys));
            if !already_searched {
                return Ok(keys);
            }
        }

        let jwks = self.fetch().await?;
        let keys: KeySnapshot = Arc::new(decoding_keys(&jwks, &self.algorithms));
        *self.snapshot.write() = Some(CachedKeys {
            keys: keys.clone(),
            expires_at: Instant::now() + self.ttl,
        });
        tracing::debug!(keys = keys.len(), "signing key set refreshed");
        Ok(keys)
    }

    async fn fetch(&self) -> AuthResult<Jwks> {
        // The only blocking I/O in the authorization chain; bounded by the
        // configured timeout and never performed under the snapshot lock.
        let response = self
            .client
            .get(&self.jwks_url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|err| {
                tracing::warn!(error = %err, "signing key set fetch failed");
                AuthError::KeyFetchFailed(err.to_string())
            })?;
        response
            .json::<Jwks>()
            .await
            .map_err(|err| AuthError::KeyFetchFailed(err.to_string()))
    }
}

#[async_trait]
impl KeyStore for RemoteKeyStore {
    async fn signing_key(&self, kid: &str) -> AuthResult<DecodingKey> {
        if let Some(keys) = self.fresh_snapshot() {
            if let Some(key) = keys.get(kid) {
                return Ok(key.clone());
            }
            // The kid may belong to a key rotated in after this snapshot
            // was cached; refresh once before failing.
            let refreshed = self.refresh(Some(&keys)).await?;
            return refreshed
                .get(kid)
                .cloned()
                .ok_or_else(|| AuthError::SigningKeyNotFound(kid.to_string()));
        }
        // A snapshot fetched for this very lookup is authoritative; a miss
        // in it fails without a rotation retry.
        let keys = self.refresh(None).await?;
        keys.get(kid)
            .cloned()
            .ok_or_else(|| AuthError::SigningKeyNotFound(kid.to_string()))
    }
}

fn decoding_keys(jwks: &Jwks, allowed: &[Algorithm]) -> HashMap<String, DecodingKey> {
    let mut keys = HashMap::with_capacity(jwks.keys.len());
    for key in &jwks.keys {
        if !key.is_rsa_signing_key() {
            tracing::debug!(kid = %key.kid, kty = %key.kty, "skipping non-RSA or non-signature key");
            continue;
        }
        if let Some(alg) = key.alg.as_deref() {
            let declared = alg.parse::<Algorithm>();
            if !declared.map_or(false, |alg| allowed.contains(&alg)) {
                tracing::debug!(kid = %key.kid, alg = %alg, "skipping key declaring an unaccepted algorithm");
                continue;
            }
        }
        let (Some(n), Some(e)) = (key.n.as_deref(), key.e.as_deref()) else {
            continue;
        };
        match DecodingKey::from_rsa_components(n, e) {
            Ok(decoded) => {
                keys.insert(key.kid.clone(), decoded);
            }
            Err(err) => {
                tracing::warn!(kid = %key.kid, error = %err, "rejecting key with invalid RSA components");
            }
        }
    }
    keys
}
