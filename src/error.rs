/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error envelope)
 * - AuthError / RepoError を統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

/// `{"success": false, "error": <status>, "message": <text>}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("request timed out")]
    Timeout,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Auth(e) => e.status(),
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (message, description) = match &self {
            // Stable code for clients, human text alongside.
            AppError::Auth(e) => (e.code().to_string(), Some(e.to_string())),
            AppError::NotFound => ("resource not found".to_string(), None),
            AppError::Unprocessable(detail) => {
                ("unprocessable".to_string(), Some(detail.clone()))
            }
            AppError::Conflict(detail) => ("conflict".to_string(), Some(detail.clone())),
            AppError::Timeout => ("request timeout".to_string(), None),
            AppError::Internal => ("internal server error".to_string(), None),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
            description,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => {
                AppError::Conflict("a drink with this title already exists".into())
            }
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
            RepoError::CorruptRecipe { id, source } => {
                tracing::error!(drink_id = id, error = %source, "stored recipe is not valid JSON");
                AppError::Internal
            }
            RepoError::EncodeRecipe(source) => {
                tracing::error!(error = %source, "recipe could not be encoded");
                AppError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn permission_denied_envelope() {
        let (status, body) = render(AuthError::PermissionDenied.into()).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!(403));
        assert_eq!(body["message"], json!("PermissionDenied"));
        assert_eq!(body["description"], json!("permission not granted"));
    }

    #[tokio::test]
    async fn not_found_envelope() {
        let (status, body) = render(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }

    #[tokio::test]
    async fn recipe_encoding_failure_is_internal() {
        let source = serde_json::from_str::<Value>("{").expect_err("invalid json");
        let (status, body) = render(RepoError::EncodeRecipe(source).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], json!("internal server error"));
    }

    #[tokio::test]
    async fn key_fetch_error_is_service_error() {
        let (status, body) = render(AuthError::KeyFetchError("timeout".into()).into()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["message"], json!("KeyFetchError"));
    }
}
