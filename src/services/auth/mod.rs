pub mod authorizer;
pub mod claims;
pub mod credential;
pub mod error;
pub mod factory;
pub mod key_cache;
pub mod key_source;
pub mod keys;
pub mod permission;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use authorizer::Authorizer;
pub use claims::Claims;
pub use error::AuthError;
pub use factory::build_authorizer;
pub use key_cache::{KeyCache, KeyCachePolicy};
pub use key_source::HttpKeySource;
pub use permission::Permission;
pub use verifier::TokenVerifier;
