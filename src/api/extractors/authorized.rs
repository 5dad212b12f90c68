use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::{Claims, Permission};
use crate::state::AppState;

/// Guard for a protected handler.
///
/// Extracting `Authorized<P>` runs the full chain (credential extraction,
/// verification, permission `P`) and hands the decoded claims to the handler.
/// When any step fails the handler is not called and the request is answered
/// with the auth error envelope.
///
/// ```ignore
/// async fn drinks_detail(auth: Authorized<GetDrinksDetail>) -> ... {
///     let sub = auth.claims.subject();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authorized<P: Permission> {
    pub claims: Claims,
    permission: PhantomData<P>,
}

impl<P: Permission> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let guarded = state
            .auth
            .guard(&parts.headers, P::NAME, |claims| async move {
                Self {
                    claims,
                    permission: PhantomData,
                }
            })
            .await;

        match guarded {
            Ok(authorized) => Ok(authorized),
            Err(err) => {
                tracing::warn!(
                    code = err.code(),
                    permission = P::NAME,
                    path = %parts.uri.path(),
                    "request rejected by authorizer"
                );
                Err(err.into())
            }
        }
    }
}
