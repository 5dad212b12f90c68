use axum::http::StatusCode;
use thiserror::Error;

/// Failures of the bearer-token guard.
///
/// Every variant has a stable machine-readable code (`code()`), an HTTP status
/// (`status()`) and a human-readable message (`Display`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,
    #[error("authorization header must be 'Bearer <token>'")]
    MalformedHeader,
    #[error("token is not a well-formed signed JWT")]
    MalformedToken,
    #[error("unable to find the appropriate signing key")]
    InvalidKey,
    #[error("token signature could not be verified")]
    InvalidSignature,
    #[error("token expired")]
    TokenExpired,
    #[error("incorrect claims, check the audience and issuer")]
    InvalidClaims,
    #[error("permissions not included in token")]
    ClaimsMalformed,
    #[error("permission not granted")]
    PermissionDenied,
    #[error("signing keys unavailable: {0}")]
    KeyFetchError(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "MissingHeader",
            AuthError::MalformedHeader => "MalformedHeader",
            AuthError::MalformedToken => "MalformedToken",
            AuthError::InvalidKey => "InvalidKey",
            AuthError::InvalidSignature => "InvalidSignature",
            AuthError::TokenExpired => "TokenExpired",
            AuthError::InvalidClaims => "InvalidClaims",
            AuthError::ClaimsMalformed => "ClaimsMalformed",
            AuthError::PermissionDenied => "PermissionDenied",
            AuthError::KeyFetchError(_) => "KeyFetchError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            // The authorizer itself cannot work; the caller is not at fault.
            AuthError::KeyFetchError(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience
            | ErrorKind::InvalidIssuer
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AuthError::MalformedToken,
            ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidKeyFormat => AuthError::InvalidKey,
            // Signature mismatch, unexpected algorithm, crypto backend errors.
            _ => AuthError::InvalidSignature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_permission_denied_is_forbidden() {
        let all = [
            AuthError::MissingHeader,
            AuthError::MalformedHeader,
            AuthError::MalformedToken,
            AuthError::InvalidKey,
            AuthError::InvalidSignature,
            AuthError::TokenExpired,
            AuthError::InvalidClaims,
            AuthError::ClaimsMalformed,
        ];
        for err in all {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED, "{}", err.code());
        }

        assert_eq!(AuthError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert!(
            AuthError::KeyFetchError("timeout".into())
                .status()
                .is_server_error()
        );
    }

    #[test]
    fn jwt_error_kinds_map_to_taxonomy() {
        use jsonwebtoken::errors::{Error, ErrorKind};

        let cases = [
            (ErrorKind::ExpiredSignature, AuthError::TokenExpired),
            (ErrorKind::InvalidAudience, AuthError::InvalidClaims),
            (ErrorKind::InvalidIssuer, AuthError::InvalidClaims),
            (ErrorKind::InvalidSignature, AuthError::InvalidSignature),
            (ErrorKind::InvalidAlgorithm, AuthError::InvalidSignature),
            (ErrorKind::InvalidToken, AuthError::MalformedToken),
        ];
        for (kind, expected) in cases {
            assert_eq!(AuthError::from(Error::from(kind)), expected);
        }
    }
}
