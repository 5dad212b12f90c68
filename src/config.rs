/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, Auth0 domain / audience など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動後は不変
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    // None => in-memory drink store
    pub database_url: Option<String>,
    pub request_timeout: Duration,

    // https://<AUTH0_DOMAIN>/
    pub auth_issuer: Url,
    // https://<AUTH0_DOMAIN>/.well-known/jwks.json
    pub jwks_url: Url,
    pub auth_audience: String,
    pub auth_algorithm: Algorithm,
    pub access_token_leeway_seconds: u64,

    pub jwks_cache_ttl: Duration,
    pub jwks_min_refresh_interval: Duration,
    pub jwks_fetch_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let number = |key: &'static str, default: u64| -> Result<u64, ConfigError> {
            match get(key) {
                Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
                None => Ok(default),
            }
        };

        let port =
            u16::try_from(number("PORT", 3000)?).map_err(|_| ConfigError::Invalid("PORT"))?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let database_url = get("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let request_timeout = Duration::from_secs(number("REQUEST_TIMEOUT_SECONDS", 30)?);
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"));
        }

        let domain = get("AUTH0_DOMAIN")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;

        // Accept both `tenant.auth0.com` and `https://tenant.auth0.com`.
        let base = if domain.contains("://") {
            format!("{}/", domain)
        } else {
            format!("https://{}/", domain)
        };
        let auth_issuer = Url::parse(&base).map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?;
        if auth_issuer.host_str().is_none() {
            return Err(ConfigError::Invalid("AUTH0_DOMAIN"));
        }
        let jwks_url = auth_issuer
            .join(".well-known/jwks.json")
            .map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?;

        let auth_audience = get("API_AUDIENCE")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("API_AUDIENCE"))?;

        let auth_algorithm = match get("AUTH_ALGORITHM") {
            Some(name) => Algorithm::from_str(name.trim())
                .map_err(|_| ConfigError::Invalid("AUTH_ALGORITHM"))?,
            None => Algorithm::RS256,
        };
        if matches!(
            auth_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            // Shared-secret algorithms cannot be verified from a public key set.
            return Err(ConfigError::Invalid("AUTH_ALGORITHM"));
        }

        let access_token_leeway_seconds = number("ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let jwks_cache_ttl = Duration::from_secs(number("JWKS_CACHE_TTL_SECONDS", 600)?);
        let jwks_min_refresh_interval =
            Duration::from_secs(number("JWKS_MIN_REFRESH_SECONDS", 30)?);

        let jwks_fetch_timeout = Duration::from_secs(number("JWKS_FETCH_TIMEOUT_SECONDS", 5)?);
        if jwks_fetch_timeout.is_zero() {
            return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS"));
        }

        Ok(Self {
            addr,
            app_env,
            database_url,
            request_timeout,
            auth_issuer,
            jwks_url,
            auth_audience,
            auth_algorithm,
            access_token_leeway_seconds,
            jwks_cache_ttl,
            jwks_min_refresh_interval,
            jwks_fetch_timeout,
        })
    }
}
