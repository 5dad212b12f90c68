/*
 * Responsibility
 * - drinks CRUD
 * - title は UNIQUE (重複は RepoError::Conflict)
 * - recipe は JSON 文字列として保存
 */
use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkRow {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[async_trait]
pub trait DrinkRepo: Send + Sync {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError>;

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError>;

    // Ok(None) when the drink does not exist.
    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<DrinkRow>, RepoError>;

    // Ok(false) when the drink does not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepoError>;
}

#[derive(Debug, sqlx::FromRow)]
struct DrinkRecord {
    id: i32,
    title: String,
    recipe: String,
}

impl TryFrom<DrinkRecord> for DrinkRow {
    type Error = RepoError;

    fn try_from(r: DrinkRecord) -> Result<Self, Self::Error> {
        let recipe = serde_json::from_str(&r.recipe)
            .map_err(|source| RepoError::CorruptRecipe { id: r.id, source })?;
        Ok(Self {
            id: r.id,
            title: r.title,
            recipe,
        })
    }
}

fn recipe_json(recipe: &[Ingredient]) -> Result<String, RepoError> {
    serde_json::to_string(recipe).map_err(RepoError::EncodeRecipe)
}

/// Postgres-backed store (`drinks` table).
#[derive(Debug, Clone)]
pub struct PgDrinkRepo {
    pool: PgPool,
}

impl PgDrinkRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        let records = sqlx::query_as::<_, DrinkRecord>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        records.into_iter().map(DrinkRow::try_from).collect()
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError> {
        let record = sqlx::query_as::<_, DrinkRecord>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(title)
        .bind(recipe_json(recipe)?)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        record.try_into()
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<DrinkRow>, RepoError> {
        let record = sqlx::query_as::<_, DrinkRecord>(
            r#"
            UPDATE drinks
            SET
                title = COALESCE($2, title),
                recipe = COALESCE($3, recipe)
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(recipe.map(recipe_json).transpose()?)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        record.map(DrinkRow::try_from).transpose()
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        let res = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(res.rows_affected() == 1)
    }
}

/// In-process store used when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryDrinkRepo {
    inner: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i32,
    drinks: BTreeMap<i32, DrinkRow>,
}

impl MemoryState {
    fn title_taken(&self, title: &str, except: Option<i32>) -> bool {
        self.drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except)
    }
}

impl MemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    async fn list(&self) -> Result<Vec<DrinkRow>, RepoError> {
        Ok(self.inner.read().await.drinks.values().cloned().collect())
    }

    async fn create(&self, title: &str, recipe: &[Ingredient]) -> Result<DrinkRow, RepoError> {
        let mut state = self.inner.write().await;
        if state.title_taken(title, None) {
            return Err(RepoError::Conflict);
        }

        state.last_id += 1;
        let row = DrinkRow {
            id: state.last_id,
            title: title.to_string(),
            recipe: recipe.to_vec(),
        };
        state.drinks.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        title: Option<&str>,
        recipe: Option<&[Ingredient]>,
    ) -> Result<Option<DrinkRow>, RepoError> {
        let mut state = self.inner.write().await;
        if let Some(title) = title
            && state.title_taken(title, Some(id))
        {
            return Err(RepoError::Conflict);
        }

        let Some(row) = state.drinks.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            row.title = title.to_string();
        }
        if let Some(recipe) = recipe {
            row.recipe = recipe.to_vec();
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, RepoError> {
        Ok(self.inner.write().await.drinks.remove(&id).is_some())
    }
}
