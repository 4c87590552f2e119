use crate::guard::AuthorizationGuard;
use crate::keystore::RemoteKeyStore;
use crate::verifier::TokenVerifier;
use jsonwebtoken::Algorithm;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_JWKS_TTL_SECS: u64 = 300;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
// Upper bound on the duration knobs; a value past this is a typo, not a
// policy, and an unbounded TTL would overflow the cache expiry instant.
const MAX_CONFIG_SECS: u64 = 86_400;

/// Configuration failure raised at startup, never per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("unrecognized signature algorithm: {0}")]
    InvalidAlgorithm(String),
    #[error("{0} must list at least one signature algorithm")]
    EmptyAlgorithms(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Verification settings sourced from the environment.
///
/// Required: `AUTH_DOMAIN` (issuer domain), `AUTH_ALGORITHMS`
/// (comma-separated allow-list), `API_AUDIENCE`. Optional:
/// `AUTH_JWKS_TTL_SECS` (default 300), `AUTH_FETCH_TIMEOUT_SECS`
/// (default 10), `AUTH_LEEWAY_SECS` (default 0), each capped at one day.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub issuer_domain: String,
    pub audience: String,
    pub algorithms: Vec<Algorithm>,
    pub jwks_ttl: Duration,
    pub fetch_timeout: Duration,
    pub leeway: u64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. `from_env` delegates here;
    /// tests inject a map instead of mutating process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issuer_domain = require(&lookup, "AUTH_DOMAIN")?;
        let audience = require(&lookup, "API_AUDIENCE")?;
        let algorithms = parse_algorithms(&require(&lookup, "AUTH_ALGORITHMS")?)?;

        let jwks_ttl = Duration::from_secs(parse_secs(
            &lookup,
            "AUTH_JWKS_TTL_SECS",
            DEFAULT_JWKS_TTL_SECS,
        )?);
        let fetch_timeout = Duration::from_secs(parse_secs(
            &lookup,
            "AUTH_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);
        let leeway = parse_secs(&lookup, "AUTH_LEEWAY_SECS", 0)?;

        Ok(Self {
            issuer_domain,
            audience,
            algorithms,
            jwks_ttl,
            fetch_timeout,
            leeway,
        })
    }

    /// Expected `iss` claim for tokens minted by this issuer.
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.issuer_domain.trim_end_matches('/'))
    }

    /// Discovery endpoint publishing the issuer's signing keys.
    pub fn jwks_url(&self) -> String {
        format!(
            "https://{}/.well-known/jwks.json",
            self.issuer_domain.trim_end_matches('/')
        )
    }
}

impl AuthorizationGuard {
    /// Wire up a guard backed by the issuer's remote key set.
    pub fn from_config(config: &AuthConfig) -> Self {
        let key_store = Arc::new(RemoteKeyStore::new(
            config.jwks_url(),
            config.algorithms.clone(),
            config.jwks_ttl,
            config.fetch_timeout,
        ));
        let verifier = TokenVerifier::new(
            config.issuer(),
            config.audience.clone(),
            config.algorithms.clone(),
            key_store,
        )
        .with_leeway(config.leeway);
        AuthorizationGuard::new(verifier)
    }
}

fn require<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parse_algorithms(raw: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let mut algorithms = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let algorithm = name
            .parse::<Algorithm>()
            .map_err(|_| ConfigError::InvalidAlgorithm(name.to_string()))?;
        algorithms.push(algorithm);
    }
    if algorithms.is_empty() {
        return Err(ConfigError::EmptyAlgorithms("AUTH_ALGORITHMS"));
    }
    Ok(algorithms)
}

fn parse_secs<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs <= MAX_CONFIG_SECS)
            .ok_or_else(|| ConfigError::InvalidValue {
                name,
                value: value.to_string(),
            }),
    }
}
