//! Retrieval of the authority's published signing keys.
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use url::Url;

use super::error::AuthError;
use super::keys::SigningKeySet;

/// Where signing keys come from.
///
/// Implementations fail with `KeyFetchError` and never retry on their own.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch_signing_keys(&self) -> Result<SigningKeySet, AuthError>;
}

/// Fetches `/.well-known/jwks.json` over HTTPS with a bounded timeout.
#[derive(Debug, Clone)]
pub struct HttpKeySource {
    client: reqwest::Client,
    jwks_url: Url,
}

impl HttpKeySource {
    pub fn new(jwks_url: Url, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeyFetchError(format!("http client: {e}")))?;

        Ok(Self { client, jwks_url })
    }
}

#[async_trait]
impl KeySource for HttpKeySource {
    async fn fetch_signing_keys(&self) -> Result<SigningKeySet, AuthError> {
        tracing::debug!(url = %self.jwks_url, "fetching signing keys");

        let response = self
            .client
            .get(self.jwks_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AuthError::KeyFetchError(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::KeyFetchError(format!(
                "authority responded with {status}"
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetchError(format!("invalid key set: {e}")))?;

        Ok(SigningKeySet::from_jwk_set(set))
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;

    use super::*;
    use crate::services::auth::test_support as ts;

    async fn serve(router: Router) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        Url::parse(&format!("http://{addr}/.well-known/jwks.json")).expect("url")
    }

    #[tokio::test]
    async fn fetches_published_keys() {
        let router = Router::new().route(
            "/.well-known/jwks.json",
            get(|| async { Json(json!({ "keys": [ts::jwk_a(), ts::jwk_b()] })) }),
        );
        let source = HttpKeySource::new(serve(router).await, Duration::from_secs(2))
            .expect("client");

        let keys = source.fetch_signing_keys().await.expect("keys");
        assert_eq!(keys.len(), 2);
        assert!(keys.contains(ts::KID_A));
        assert!(keys.contains(ts::KID_B));
    }

    #[tokio::test]
    async fn error_status_is_key_fetch_error() {
        let router = Router::new().route(
            "/.well-known/jwks.json",
            get(|| async { StatusCode::BAD_GATEWAY }),
        );
        let source = HttpKeySource::new(serve(router).await, Duration::from_secs(2))
            .expect("client");

        let err = source.fetch_signing_keys().await.expect_err("must fail");
        assert!(matches!(err, AuthError::KeyFetchError(_)));
    }

    #[tokio::test]
    async fn unparseable_body_is_key_fetch_error() {
        let router = Router::new().route("/.well-known/jwks.json", get(|| async { "not json" }));
        let source = HttpKeySource::new(serve(router).await, Duration::from_secs(2))
            .expect("client");

        let err = source.fetch_signing_keys().await.expect_err("must fail");
        assert_eq!(err.code(), "KeyFetchError");
    }

    #[tokio::test]
    async fn slow_authority_times_out() {
        let router = Router::new().route(
            "/.well-known/jwks.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "keys": [] }))
            }),
        );
        let source = HttpKeySource::new(serve(router).await, Duration::from_millis(200))
            .expect("client");

        let err = source.fetch_signing_keys().await.expect_err("must time out");
        assert_eq!(err.code(), "KeyFetchError");
    }
}
