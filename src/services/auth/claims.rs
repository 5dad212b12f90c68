use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::AuthError;

const PERMISSIONS_CLAIM: &str = "permissions";

/// Claims of a token that passed signature and claim validation.
///
/// Read-only: the mapping is exactly what the token carried.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub").and_then(Value::as_str)
    }

    /// Granted permissions, or `None` when the token has no usable
    /// `permissions` array. Duplicates are kept; non-string entries are ignored.
    pub fn permissions(&self) -> Option<impl Iterator<Item = &str>> {
        self.get(PERMISSIONS_CLAIM)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str))
    }
}

/// Check that `claims` grant `required` (exact, case-sensitive match).
///
/// A token without a `permissions` array fails with `ClaimsMalformed`, one
/// whose array lacks the permission fails with `PermissionDenied`.
pub fn check_permission(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let mut granted = claims.permissions().ok_or(AuthError::ClaimsMalformed)?;

    if granted.any(|p| p == required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}
