/*
 * Responsibility
 * - /drinks 系 handler
 * - 必要な permission は Authorized<P> の型で宣言する (handler 側で検証しない)
 * - body / path の不正は AppError (422 / 404) に揃える
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection, rejection::PathRejection},
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::Authorized,
        permissions::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
    },
    error::AppError,
    state::AppState,
};

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(v)| v)
        .map_err(|e| AppError::Unprocessable(e.body_text()))
}

fn drink_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, AppError> {
    // Non-numeric ids do not name any drink.
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkShort::from).collect(),
    )))
}

pub async fn drinks_detail(
    State(state): State<AppState>,
    _auth: Authorized<GetDrinksDetail>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let rows = state.drinks.list().await?;

    Ok(Json(DrinksResponse::new(
        rows.into_iter().map(DrinkLong::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    auth: Authorized<PostDrinks>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let new = body(payload)?
        .validate()
        .map_err(|e| AppError::Unprocessable(e.into()))?;

    let row = state.drinks.create(&new.title, &new.recipe).await?;

    tracing::info!(
        drink_id = row.id,
        sub = auth.claims.subject().unwrap_or("-"),
        "drink created"
    );

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(row)])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    auth: Authorized<PatchDrinks>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    let id = drink_id(path)?;
    let changes = body(payload)?
        .validate()
        .map_err(|e| AppError::Unprocessable(e.into()))?;

    let row = state
        .drinks
        .update(id, changes.title.as_deref(), changes.recipe.as_deref())
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(
        drink_id = row.id,
        sub = auth.claims.subject().unwrap_or("-"),
        "drink updated"
    );

    Ok(Json(DrinksResponse::new(vec![DrinkLong::from(row)])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    auth: Authorized<DeleteDrinks>,
    path: Result<Path<i32>, PathRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = drink_id(path)?;

    if !state.drinks.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(
        drink_id = id,
        sub = auth.claims.subject().unwrap_or("-"),
        "drink deleted"
    );

    Ok(Json(DeleteResponse {
        success: true,
        delete: id,
    }))
}
