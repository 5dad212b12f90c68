/*
 * Responsibility
 * - URL 構造を定義
 * - GET /drinks は公開、それ以外の /drinks 系は handler の Authorized<P> で保護
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, drinks_detail, list_drinks, update_drink},
    health::health,
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(drinks_detail))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
}
