//! Data models
//!
//! Rust structs representing database entities.

mod material;
mod nutrition;
mod recipe;
mod recipe_ingredient;
mod snapshot;
mod sql;

pub use material::{Material, MaterialCreate, MaterialId, MaterialUpdate};
pub use nutrition::{Nutrient, Nutrition};
pub use recipe::{Recipe, RecipeCreate, RecipeId, RecipeUpdate};
pub use recipe_ingredient::{
    IngredientLine, IngredientSource, RecipeIngredient, RecipeIngredientCreate,
    RecipeIngredientDetail, RecipeIngredientUpdate,
};
pub use snapshot::load_catalog;
