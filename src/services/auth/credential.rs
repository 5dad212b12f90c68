//! Bearer credential extraction from request headers.

use axum::http::{HeaderMap, header};

use super::error::AuthError;

const BEARER_SCHEME: &str = "bearer";

/// Locate the single `Authorization` header and return its raw token part.
///
/// The header must be exactly `<scheme> <token>` with a bearer scheme
/// (compared case-insensitively). The token is returned unparsed.
pub fn extract_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let mut values = headers.get_all(header::AUTHORIZATION).iter();

    let value = values.next().ok_or(AuthError::MissingHeader)?;
    if values.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn missing_header_is_distinct_from_malformed() {
        assert_eq!(
            extract_credential(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        );
        assert_eq!(
            extract_credential(&headers_with("Basic abc123")),
            Err(AuthError::MalformedHeader)
        );
    }

    #[test]
    fn returns_raw_token() {
        let headers = headers_with("Bearer aaa.bbb.ccc");
        assert_eq!(extract_credential(&headers), Ok("aaa.bbb.ccc"));

        let headers = headers_with("bearer opaque");
        assert_eq!(extract_credential(&headers), Ok("opaque"));
    }

    #[test]
    fn rejects_wrong_shapes() {
        for value in ["Bearer", "Bearer ", "Bearer a b", "a.b.c", " Bearer abc", ""] {
            assert_eq!(
                extract_credential(&headers_with(value)),
                Err(AuthError::MalformedHeader),
                "{value:?}"
            );
        }
    }

    #[test]
    fn rejects_repeated_header() {
        let mut headers = headers_with("Bearer one");
        headers.append(header::AUTHORIZATION, HeaderValue::from_static("Bearer two"));
        assert_eq!(
            extract_credential(&headers),
            Err(AuthError::MalformedHeader)
        );
    }
}
