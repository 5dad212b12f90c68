pub mod drink_repo;
pub mod error;

pub use drink_repo::{DrinkRepo, DrinkRow, Ingredient, MemoryDrinkRepo, PgDrinkRepo};
