/*
 * Responsibility
 * - Drinks の request/response DTO
 * - short 表現 (公開) は ingredient の name を含めない
 * - long 表現 (get:drinks-detail 以上) は recipe をそのまま返す
 */
use serde::{Deserialize, Serialize};

use crate::repos::{DrinkRow, Ingredient};

/// A recipe may be posted as a single ingredient or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecipeInput {
    Many(Vec<Ingredient>),
    One(Ingredient),
}

impl RecipeInput {
    pub fn into_vec(self) -> Vec<Ingredient> {
        match self {
            RecipeInput::Many(items) => items,
            RecipeInput::One(item) => vec![item],
        }
    }
}

fn validate_recipe(recipe: &[Ingredient]) -> Result<(), &'static str> {
    if recipe.is_empty() {
        return Err("recipe needs at least one ingredient");
    }
    if recipe
        .iter()
        .any(|i| i.name.trim().is_empty() || i.color.trim().is_empty() || i.parts == 0)
    {
        return Err("every ingredient needs a name, a color and at least one part");
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// Validated `POST /drinks` body.
#[derive(Debug)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl CreateDrinkRequest {
    pub fn validate(self) -> Result<NewDrink, &'static str> {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or("title is required")?;
        let recipe = self.recipe.ok_or("recipe is required")?.into_vec();
        validate_recipe(&recipe)?;

        Ok(NewDrink { title, recipe })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<RecipeInput>,
}

/// Validated `PATCH /drinks/{id}` body; at least one field is set.
#[derive(Debug)]
pub struct DrinkChanges {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

impl UpdateDrinkRequest {
    pub fn validate(self) -> Result<DrinkChanges, &'static str> {
        let title = match self.title {
            Some(t) if t.trim().is_empty() => return Err("title cannot be empty"),
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let recipe = self.recipe.map(RecipeInput::into_vec);
        if let Some(recipe) = &recipe {
            validate_recipe(recipe)?;
        }
        if title.is_none() && recipe.is_none() {
            return Err("nothing to update");
        }

        Ok(DrinkChanges { title, recipe })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ShortIngredient {
    pub color: String,
    pub parts: u32,
}

#[derive(Debug, Serialize)]
pub struct DrinkShort {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<ShortIngredient>,
}

impl From<DrinkRow> for DrinkShort {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row
                .recipe
                .into_iter()
                .map(|i| ShortIngredient {
                    color: i.color,
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinkLong {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

impl From<DrinkRow> for DrinkLong {
    fn from(row: DrinkRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            recipe: row.recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DrinksResponse<T> {
    pub success: bool,
    pub drinks: Vec<T>,
}

impl<T> DrinksResponse<T> {
    pub fn new(drinks: Vec<T>) -> Self {
        Self {
            success: true,
            drinks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub delete: i32,
}
