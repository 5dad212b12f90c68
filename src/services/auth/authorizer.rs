use std::future::Future;

use axum::http::HeaderMap;

use super::claims::{Claims, check_permission};
use super::credential::extract_credential;
use super::error::AuthError;
use super::key_cache::KeyCache;
use super::verifier::TokenVerifier;

/// Bearer-token guard for protected operations.
///
/// Stateless per request: each call extracts, verifies and checks on its own.
/// The only shared state is the signing key cache.
#[derive(Debug)]
pub struct Authorizer {
    verifier: TokenVerifier,
    keys: KeyCache,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier, keys: KeyCache) -> Self {
        Self { verifier, keys }
    }

    /// Extract the bearer token and verify it against the current key set.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = extract_credential(headers)?;
        let kid = TokenVerifier::key_id(token)?;
        let keys = self.keys.keys_for(&kid).await?;

        self.verifier.verify_and_decode(token, &keys)
    }

    /// `authenticate`, then require `permission` in the decoded claims.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<Claims, AuthError> {
        let claims = self.authenticate(headers).await?;
        check_permission(permission, &claims)?;

        tracing::debug!(
            sub = claims.subject().unwrap_or("-"),
            permission,
            "request authorized"
        );

        Ok(claims)
    }

    /// Run `operation` with the decoded claims only if the request is
    /// authorized for `permission`. On failure the operation is never called.
    pub async fn guard<T, F, Fut>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(Claims) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(operation(claims).await)
    }
}
