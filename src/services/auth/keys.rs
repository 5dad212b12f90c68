use std::collections::HashMap;

use jsonwebtoken::jwk::{Jwk, JwkSet};

/// Public verification keys published by the authority, indexed by `kid`.
///
/// Never mutated once built; a refresh replaces the whole set.
#[derive(Debug, Clone, Default)]
pub struct SigningKeySet {
    keys: HashMap<String, Jwk>,
}

impl SigningKeySet {
    /// Index a published JWK set. Keys without a `kid` cannot be selected by a
    /// token header, so they are dropped.
    pub fn from_jwk_set(set: JwkSet) -> Self {
        let mut keys = HashMap::with_capacity(set.keys.len());
        for jwk in set.keys {
            match jwk.common.key_id.clone() {
                Some(kid) => {
                    keys.insert(kid, jwk);
                }
                None => tracing::warn!("JWK missing kid field, skipping"),
            }
        }
        Self { keys }
    }

    pub fn get(&self, kid: &str) -> Option<&Jwk> {
        self.keys.get(kid)
    }

    pub fn contains(&self, kid: &str) -> bool {
        self.keys.contains_key(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
