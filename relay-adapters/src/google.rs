//! Google ID token verification.
//!
//! Tokens are RS256 JWTs signed with keys Google publishes as a JWKS. The key
//! set is cached for the `max-age` Google advertises and refetched when a
//! token names a key id the cache does not know.

use std::time::{Duration, Instant};

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use reqwest::{Client, header::CACHE_CONTROL, header::HeaderMap};
use serde::{Deserialize, Deserializer};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use relay_types::{IdentityClaims, IdentityError, IdentityVerifier};

use crate::{AdapterError, GoogleConfig};

/// Google's JWKS endpoint for ID token signing keys.
pub const GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Issuers Google puts in the `iss` claim.
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Key lifetime when the certs response carries no usable `max-age`.
const DEFAULT_KEY_TTL: Duration = Duration::from_secs(3600);

/// Unknown key ids trigger at most one refetch per interval.
const MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
    expires_at: Instant,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        self.expires_at > Instant::now()
    }

    /// Whether an unknown key id may justify fetching the set again.
    fn may_refetch(&self) -> bool {
        !self.is_fresh() || self.fetched_at.elapsed() >= MIN_REFETCH_INTERVAL
    }
}

fn unknown_kid(kid: &str) -> IdentityError {
    invalid(format!("No signing key found for key id {}", kid))
}

/// Verifies Google ID tokens for a single OAuth client id.
pub struct GoogleIdTokenVerifier {
    http: Client,
    certs_url: String,
    client_id: String,
    keys: RwLock<Option<CachedKeys>>,
}

/// Claims Google puts in an ID token, as far as the relay uses them.
#[derive(Debug, Deserialize)]
struct GoogleIdTokenPayload {
    sub: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
    #[serde(default, deserialize_with = "bool_or_string")]
    email_verified: Option<bool>,
}

impl From<GoogleIdTokenPayload> for IdentityClaims {
    fn from(payload: GoogleIdTokenPayload) -> Self {
        IdentityClaims {
            user_id: payload.sub,
            email: payload.email,
            name: payload.name,
            picture: payload.picture,
            email_verified: payload.email_verified,
        }
    }
}

/// Older tokens carry `email_verified` as the string `"true"`.
fn bool_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => Some(b),
        Some(Flag::Text(s)) => Some(s.eq_ignore_ascii_case("true")),
        None => None,
    })
}

fn invalid(err: impl std::fmt::Display) -> IdentityError {
    IdentityError::InvalidToken(err.to_string())
}

/// Reads `max-age` out of a `Cache-Control` header.
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(CACHE_CONTROL)?
        .to_str()
        .ok()?
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.trim().parse().ok())
        .map(Duration::from_secs)
}

impl GoogleIdTokenVerifier {
    /// Creates a verifier for the configured client id.
    pub fn new(config: &GoogleConfig) -> Result<Self, AdapterError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            certs_url: config.certs_url.clone(),
            client_id: config.client_id.clone(),
            keys: RwLock::new(None),
        })
    }

    async fn fetch_keys(&self) -> Result<CachedKeys, IdentityError> {
        debug!("Fetching Google signing keys from {}", self.certs_url);

        let response = self
            .http
            .get(&self.certs_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!("Failed to retrieve Google signing keys: {}", e);
                IdentityError::InvalidToken(format!(
                    "Failed to retrieve verification certificates: {}",
                    e
                ))
            })?;

        let ttl = max_age(response.headers()).unwrap_or(DEFAULT_KEY_TTL);
        let keys = response.json::<JwkSet>().await.map_err(|e| {
            IdentityError::InvalidToken(format!("Failed to parse verification certificates: {}", e))
        })?;

        let fetched_at = Instant::now();
        Ok(CachedKeys {
            keys,
            fetched_at,
            expires_at: fetched_at + ttl,
        })
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        {
            let cache = self.keys.read().await;
            if let Some(cached) = cache.as_ref() {
                if let Some(jwk) = cached.keys.find(kid).filter(|_| cached.is_fresh()) {
                    return DecodingKey::from_jwk(jwk).map_err(invalid);
                }
                if !cached.may_refetch() {
                    debug!(kid, "Unknown key id within refetch interval");
                    return Err(unknown_kid(kid));
                }
            }
        }

        let mut cache = self.keys.write().await;
        // Another request may have refreshed the set while we waited for the lock.
        if let Some(cached) = cache.as_ref().filter(|cached| !cached.may_refetch()) {
            return cached
                .keys
                .find(kid)
                .ok_or_else(|| unknown_kid(kid))
                .and_then(|jwk| DecodingKey::from_jwk(jwk).map_err(invalid));
        }

        let fresh = self.fetch_keys().await?;
        let key = fresh
            .keys
            .find(kid)
            .ok_or_else(|| unknown_kid(kid))
            .and_then(|jwk| DecodingKey::from_jwk(jwk).map_err(invalid));

        *cache = Some(fresh);
        key
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation
    }
}

#[async_trait::async_trait]
impl IdentityVerifier for GoogleIdTokenVerifier {
    #[instrument(skip(self, token))]
    async fn verify(&self, token: &str) -> Result<IdentityClaims, IdentityError> {
        let header = decode_header(token).map_err(invalid)?;
        if header.alg != Algorithm::RS256 {
            return Err(invalid(format!("Unsupported token algorithm {:?}", header.alg)));
        }
        let kid = header
            .kid
            .ok_or_else(|| invalid("Token header has no key id"))?;

        let key = self.decoding_key(&kid).await?;
        let data = decode::<GoogleIdTokenPayload>(token, &key, &self.validation()).map_err(invalid)?;

        debug!(subject = %data.claims.sub, "Google ID token verified");
        Ok(data.claims.into())
    }
}
