/// Factory: build the `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{
    AuthError, Authorizer, HttpKeySource, KeyCache, KeyCachePolicy, TokenVerifier,
};

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, AuthError> {
    let verifier = TokenVerifier::new(
        config.auth_issuer.as_str(),
        &config.auth_audience,
        config.auth_algorithm,
        config.access_token_leeway_seconds,
    );

    let source = HttpKeySource::new(config.jwks_url.clone(), config.jwks_fetch_timeout)?;
    let keys = KeyCache::new(
        Arc::new(source),
        KeyCachePolicy {
            ttl: config.jwks_cache_ttl,
            min_refresh_interval: config.jwks_min_refresh_interval,
        },
    );

    tracing::info!(
        issuer = %config.auth_issuer,
        audience = %config.auth_audience,
        algorithm = ?config.auth_algorithm,
        "authorizer configured"
    );

    Ok(Arc::new(Authorizer::new(verifier, keys)))
}
