//! JWT identity provider.
//!
//! Credentials are HS256-signed JWTs carrying the caller's identity:
//!
//! | Claim      | Type   | Maps to                  |
//! |------------|--------|--------------------------|
//! | `id`       | string | [`Identity::id`]         |
//! | `username` | string | [`Identity::display_name`] |
//! | `email`    | string | [`Identity::contact`]    |
//! | `iat`      | number | issued-at (seconds)      |
//! | `eat`      | number | expires-at (seconds)     |
//!
//! Expiry is carried in `eat` rather than the registered `exp` claim, so
//! jsonwebtoken's own expiry validation is switched off and `eat` is checked
//! against the injected [`Clock`].

use crate::config::CredentialConfig;
use crate::environment::Clock;
use crate::error::{CheckerError, Result};
use crate::providers::IdentityProvider;
use crate::state::Identity;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claims written by [`JwtIdentityProvider::issue`].
#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    id: &'a str,
    username: &'a str,
    email: &'a str,
    iat: i64,
    eat: i64,
}

/// Claims read on resolution. Everything is optional here so a missing claim
/// can be reported by name.
#[derive(Debug, Deserialize)]
struct PresentedClaims {
    id: Option<String>,
    username: Option<String>,
    email: Option<String>,
    eat: Option<f64>,
}

/// Identity provider backed by HS256 JWTs.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    config: CredentialConfig,
    clock: Arc<dyn Clock>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Create a provider.
    ///
    /// # Arguments
    ///
    /// * `config` - Signing key and token lifetime
    /// * `clock` - Time source for `iat`/`eat`
    #[must_use]
    pub fn new(config: CredentialConfig, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(&config.signing_key),
            decoding_key: DecodingKey::from_secret(&config.signing_key),
            validation,
            config,
            clock,
        }
    }

    /// Mint a credential for `identity`, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `CheckerError::ValidationFailed` if the identity id is empty,
    /// or if signing fails.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        if identity.id.is_empty() {
            return Err(CheckerError::ValidationFailed(
                "cannot issue a credential for an empty identity id".to_string(),
            ));
        }

        let now = self.clock.now();
        let claims = IssuedClaims {
            id: &identity.id,
            username: &identity.display_name,
            email: &identity.contact,
            iat: now.timestamp(),
            eat: (now + self.config.token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CheckerError::ValidationFailed(format!("failed to sign credential: {e}")))
    }

    fn verify(&self, credential: &str) -> Result<Identity> {
        let data = decode::<PresentedClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| reject(&format!("invalid credential: {e}")))?;
        let claims = data.claims;

        let Some(eat) = claims.eat else {
            return Err(reject("missing eat claim"));
        };
        #[allow(clippy::cast_precision_loss)]
        let now = self.clock.now().timestamp() as f64;
        if eat < now {
            return Err(reject("credential expired"));
        }

        let id = claims.id.ok_or_else(|| reject("missing id claim"))?;
        if id.is_empty() {
            return Err(reject("empty id claim"));
        }
        let display_name = claims.username.ok_or_else(|| reject("missing username claim"))?;
        let contact = claims.email.ok_or_else(|| reject("missing email claim"))?;

        Ok(Identity {
            id,
            display_name,
            contact,
        })
    }
}

fn reject(reason: &str) -> CheckerError {
    tracing::debug!(reason, "credential rejected");
    CheckerError::Unauthenticated(reason.to_string())
}

impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, credential: &str) -> Result<Identity> {
        self.verify(credential)
    }
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
