use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use super::claims::Claims;
use super::error::AuthError;
use super::keys::SigningKeySet;

/// Access-token verifier for one authority.
///
/// Pure verification: it never fetches keys. The caller hands in the key set
/// that should already contain the token's `kid`.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(issuer: &str, audience: &str, algorithm: Algorithm, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = leeway_seconds;

        Self { validation }
    }

    /// Read the `kid` from the token's unverified header.
    pub fn key_id(token: &str) -> Result<String, AuthError> {
        if token.split('.').count() != 3 {
            return Err(AuthError::MalformedToken);
        }

        let header = jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(error = %e, "unparseable token header");
            AuthError::MalformedToken
        })?;

        header.kid.ok_or(AuthError::InvalidKey)
    }

    /// Verify signature, expiry, audience and issuer, then return the claims.
    pub fn verify_and_decode(
        &self,
        token: &str,
        keys: &SigningKeySet,
    ) -> Result<Claims, AuthError> {
        let kid = Self::key_id(token)?;
        let jwk = keys.get(&kid).ok_or(AuthError::InvalidKey)?;

        let decoding_key = DecodingKey::from_jwk(jwk).map_err(|e| {
            tracing::warn!(kid = %kid, error = %e, "published key cannot be used for verification");
            AuthError::InvalidKey
        })?;

        let data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &self.validation)?;

        Ok(data.claims)
    }
}
