//! Label, cost and comparison tools
//!
//! Each call loads one snapshot of the store and runs the pure calculation over it.

use serde::Serialize;

use crate::db::Database;
use crate::models::{load_catalog, Nutrition, RecipeId};
use crate::nutrition::{
    compare_recipes as compare, per_100, project_cost, resolve_composition, Catalog,
    NutritionLabel, RecipeComparison, REFERENCE_BASIS,
};

/// Response for get_nutrition_label
#[derive(Debug, Serialize)]
pub struct NutritionLabelResponse {
    pub recipe_id: RecipeId,
    pub name: String,
    #[serde(flatten)]
    pub label: NutritionLabel,
    /// Unrounded per-100 g projection the warnings were evaluated on
    pub raw_per_100g: Nutrition,
    pub text: String,
}

/// Response for get_recipe_cost
#[derive(Debug, Serialize)]
pub struct RecipeCostResponse {
    pub recipe_id: RecipeId,
    pub name: String,
    pub yield_grams: f64,
    pub total_cost: f64,
    pub cost_per_100g: f64,
    pub serving_size: f64,
    pub cost_per_serving: Option<f64>,
}

fn snapshot(db: &Database) -> Result<Catalog, String> {
    db.with_conn(load_catalog)
        .map_err(|e| format!("Failed to load recipes: {}", e))
}

/// Build the printable label for a stored recipe
pub fn get_nutrition_label(db: &Database, id: RecipeId) -> Result<Option<NutritionLabelResponse>, String> {
    let catalog = snapshot(db)?;
    let Some(recipe) = catalog.get_recipe(id) else {
        return Ok(None);
    };

    let composition = resolve_composition(recipe, &catalog, &catalog);
    let label = NutritionLabel::build(
        &composition.nutrition,
        recipe.yield_grams,
        recipe.serving_size,
        recipe.serving_name.clone(),
    );

    tracing::debug!(recipe = %id, warnings = label.warnings.len(), "Built nutrition label");

    Ok(Some(NutritionLabelResponse {
        recipe_id: id,
        name: recipe.name.clone(),
        raw_per_100g: per_100(&composition.nutrition, recipe.yield_grams),
        text: label.render_text(),
        label,
    }))
}

/// Total, per-100 g and per-serving cost of a stored recipe
pub fn get_recipe_cost(db: &Database, id: RecipeId) -> Result<Option<RecipeCostResponse>, String> {
    let catalog = snapshot(db)?;
    let Some(recipe) = catalog.get_recipe(id) else {
        return Ok(None);
    };

    let cost = resolve_composition(recipe, &catalog, &catalog).cost;
    let cost_per_serving = (recipe.serving_size > 0.0)
        .then(|| project_cost(cost, recipe.yield_grams, recipe.serving_size));

    Ok(Some(RecipeCostResponse {
        recipe_id: id,
        name: recipe.name.clone(),
        yield_grams: recipe.yield_grams,
        total_cost: cost,
        cost_per_100g: project_cost(cost, recipe.yield_grams, REFERENCE_BASIS),
        serving_size: recipe.serving_size,
        cost_per_serving,
    }))
}

/// Compare two stored recipes (`b - a`, per 100 g)
pub fn compare_recipes(db: &Database, a: RecipeId, b: RecipeId) -> Result<RecipeComparison, String> {
    let catalog = snapshot(db)?;
    let recipe_a = catalog
        .get_recipe(a)
        .ok_or_else(|| format!("Recipe not found with id: {}", a))?;
    let recipe_b = catalog
        .get_recipe(b)
        .ok_or_else(|| format!("Recipe not found with id: {}", b))?;

    Ok(compare(recipe_a, recipe_b, &catalog, &catalog))
}
