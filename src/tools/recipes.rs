//! Recipe MCP Tools
//!
//! Tools for managing recipes and their ingredient lines.

use rusqlite::Connection;
use serde::Serialize;

use crate::db::Database;
use crate::models::{
    IngredientLine, IngredientSource, Material, Recipe, RecipeCreate, RecipeId, RecipeIngredient,
    RecipeIngredientCreate, RecipeIngredientDetail, RecipeIngredientUpdate, RecipeUpdate,
};

/// Response for create_recipe
#[derive(Debug, Serialize)]
pub struct CreateRecipeResponse {
    pub id: RecipeId,
    pub name: String,
    pub ingredient_count: usize,
}

/// Full recipe detail with named ingredient lines
#[derive(Debug, Serialize)]
pub struct RecipeDetail {
    pub id: RecipeId,
    pub name: String,
    pub yield_grams: f64,
    pub serving_size: f64,
    pub serving_name: String,
    pub prep_time_min: i64,
    pub steps: Vec<String>,
    pub tags: Vec<String>,
    pub ingredients: Vec<RecipeIngredientDetail>,
    /// Lines in other recipes that use this one
    pub used_as_sub_recipe: i64,
}

/// Recipe summary for listing
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub yield_grams: f64,
    pub serving_size: f64,
    pub ingredient_count: usize,
    pub tags: Vec<String>,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            yield_grams: recipe.yield_grams,
            serving_size: recipe.serving_size,
            ingredient_count: recipe.ingredients.len(),
            tags: recipe.tags.clone(),
        }
    }
}

/// Response for list_recipes
#[derive(Debug, Serialize)]
pub struct ListRecipesResponse {
    pub recipes: Vec<RecipeSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for successful update
#[derive(Debug, Serialize)]
pub struct RecipeUpdateSuccessResponse {
    pub success: bool,
    pub recipe: RecipeSummary,
}

/// Response for successful delete
#[derive(Debug, Serialize)]
pub struct RecipeDeleteSuccessResponse {
    pub success: bool,
    pub deleted_id: RecipeId,
    /// Lines in other recipes still pointing at the deleted recipe
    pub dangling_references: i64,
}

/// Response for add_recipe_ingredient
#[derive(Debug, Serialize)]
pub struct AddIngredientResponse {
    pub id: i64,
    pub recipe_id: RecipeId,
    pub position: i64,
    #[serde(flatten)]
    pub line: IngredientLine,
}

/// Response for update/remove of an ingredient line
#[derive(Debug, Serialize)]
pub struct IngredientChangeResponse {
    pub success: bool,
    pub id: i64,
}

fn validate_quantity(quantity: f64) -> Result<(), String> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err("quantity cannot be negative".to_string());
    }
    Ok(())
}

fn validate_yield(yield_grams: f64) -> Result<(), String> {
    if !yield_grams.is_finite() || yield_grams <= 0.0 {
        return Err("yield_grams must be greater than 0".to_string());
    }
    Ok(())
}

fn validate_serving_size(serving_size: f64) -> Result<(), String> {
    if !serving_size.is_finite() || serving_size < 0.0 {
        return Err("serving_size cannot be negative".to_string());
    }
    Ok(())
}

/// Check that a line's reference exists right now
fn check_reference(conn: &Connection, source: IngredientSource) -> Result<(), String> {
    let exists = match source {
        IngredientSource::Material(id) => Material::get_by_id(conn, id)
            .map_err(|e| format!("Database error: {}", e))?
            .is_some(),
        IngredientSource::Recipe(id) => Recipe::get_by_id(conn, id)
            .map_err(|e| format!("Database error: {}", e))?
            .is_some(),
    };

    if exists {
        Ok(())
    } else {
        Err(format!("{} not found with id: {}", source.kind(), source.reference_id()))
    }
}

// ============================================================================
// Recipe Tools
// ============================================================================

/// Create a new recipe
pub fn create_recipe(db: &Database, mut data: RecipeCreate) -> Result<CreateRecipeResponse, String> {
    // Validate name
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err("Recipe name cannot be empty".to_string());
    }
    validate_yield(data.yield_grams)?;
    validate_serving_size(data.serving_size)?;
    for line in &data.ingredients {
        validate_quantity(line.quantity)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    for line in &data.ingredients {
        check_reference(&conn, line.source)?;
    }

    let recipe = Recipe::create(&conn, &data)
        .map_err(|e| format!("Failed to create recipe: {}", e))?;

    tracing::info!(id = %recipe.id, name = %recipe.name, "Recipe created");

    Ok(CreateRecipeResponse {
        id: recipe.id,
        name: recipe.name,
        ingredient_count: recipe.ingredients.len(),
    })
}

/// Get a recipe with full details
pub fn get_recipe(db: &Database, id: RecipeId) -> Result<Option<RecipeDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipe = Recipe::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get recipe: {}", e))?;

    match recipe {
        Some(recipe) => {
            let ingredients = RecipeIngredient::get_details_for_recipe(&conn, id)
                .map_err(|e| format!("Failed to get ingredients: {}", e))?;

            let used_as_sub_recipe = Recipe::get_usage_count(&conn, id)
                .map_err(|e| format!("Failed to get usage count: {}", e))?;

            Ok(Some(RecipeDetail {
                id: recipe.id,
                name: recipe.name,
                yield_grams: recipe.yield_grams,
                serving_size: recipe.serving_size,
                serving_name: recipe.serving_name,
                prep_time_min: recipe.prep_time_min,
                steps: recipe.steps,
                tags: recipe.tags,
                ingredients,
                used_as_sub_recipe,
            }))
        }
        None => Ok(None),
    }
}

/// List recipes with an optional name filter
pub fn list_recipes(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListRecipesResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let recipes = Recipe::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list recipes: {}", e))?;

    let total = Recipe::count(&conn)
        .map_err(|e| format!("Failed to count recipes: {}", e))?;

    Ok(ListRecipesResponse {
        recipes: recipes.iter().map(RecipeSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update a recipe's own fields
pub fn update_recipe(
    db: &Database,
    id: RecipeId,
    mut data: RecipeUpdate,
) -> Result<RecipeUpdateSuccessResponse, String> {
    if let Some(ref name) = data.name {
        let name = name.trim();
        if name.is_empty() {
            return Err("Recipe name cannot be empty".to_string());
        }
        data.name = Some(name.to_string());
    }
    if let Some(yield_grams) = data.yield_grams {
        validate_yield(yield_grams)?;
    }
    if let Some(serving_size) = data.serving_size {
        validate_serving_size(serving_size)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Recipe::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update recipe: {}", e))?;

    match updated {
        Some(recipe) => {
            tracing::info!(id = %id, "Recipe updated");
            Ok(RecipeUpdateSuccessResponse {
                success: true,
                recipe: RecipeSummary::from(&recipe),
            })
        }
        None => Err(format!("Recipe not found with id: {}", id)),
    }
}

/// Delete a recipe and its own lines
///
/// Other recipes that use it as a sub-recipe keep their lines, which then resolve to zero.
pub fn delete_recipe(db: &Database, id: RecipeId) -> Result<RecipeDeleteSuccessResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let dangling_references = Recipe::get_usage_count(&conn, id)
        .map_err(|e| format!("Failed to check usage: {}", e))?;

    let deleted = Recipe::delete(&conn, id)
        .map_err(|e| format!("Failed to delete recipe: {}", e))?;
    if !deleted {
        return Err(format!("Recipe not found with id: {}", id));
    }

    if dangling_references > 0 {
        tracing::warn!(id = %id, dangling_references, "Deleted recipe is still used as a sub-recipe");
    } else {
        tracing::info!(id = %id, "Recipe deleted");
    }

    Ok(RecipeDeleteSuccessResponse {
        success: true,
        deleted_id: id,
        dangling_references,
    })
}

// ============================================================================
// Recipe Ingredient Tools
// ============================================================================

/// Append an ingredient line to a recipe
pub fn add_recipe_ingredient(
    db: &Database,
    data: RecipeIngredientCreate,
) -> Result<AddIngredientResponse, String> {
    validate_quantity(data.line.quantity)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Recipe::get_by_id(&conn, data.recipe_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Recipe not found with id: {}", data.recipe_id));
    }
    check_reference(&conn, data.line.source)?;

    if data.line.source == IngredientSource::Recipe(data.recipe_id) {
        tracing::warn!(recipe = %data.recipe_id, "Recipe lists itself as an ingredient; the line will contribute nothing");
    }

    let ingredient = RecipeIngredient::create(&conn, &data)
        .map_err(|e| format!("Failed to add ingredient: {}", e))?;

    Ok(AddIngredientResponse {
        id: ingredient.id,
        recipe_id: ingredient.recipe_id,
        position: ingredient.position,
        line: ingredient.line,
    })
}

/// Change the quantity of an ingredient line
pub fn update_recipe_ingredient(
    db: &Database,
    id: i64,
    data: RecipeIngredientUpdate,
) -> Result<IngredientChangeResponse, String> {
    if let Some(quantity) = data.quantity {
        validate_quantity(quantity)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = RecipeIngredient::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update ingredient: {}", e))?;

    match updated {
        Some(_) => Ok(IngredientChangeResponse { success: true, id }),
        None => Err(format!("Recipe ingredient not found with id: {}", id)),
    }
}

/// Remove an ingredient line
pub fn remove_recipe_ingredient(db: &Database, id: i64) -> Result<IngredientChangeResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = RecipeIngredient::delete(&conn, id)
        .map_err(|e| format!("Failed to remove ingredient: {}", e))?;

    if deleted {
        Ok(IngredientChangeResponse { success: true, id })
    } else {
        Err(format!("Recipe ingredient not found with id: {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaterialCreate, MaterialId};

    fn setup() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("recipes.db")).unwrap();
        (dir, db)
    }

    fn add_flour(db: &Database) -> MaterialId {
        db.with_conn(|conn| {
            Material::create(
                conn,
                &MaterialCreate {
                    name: "Farinha".to_string(),
                    ..Default::default()
                },
            )
        })
        .unwrap()
        .id
    }

    #[test]
    fn test_create_validates_input() {
        let (_dir, db) = setup();
        let zero_yield = RecipeCreate {
            name: "Pao".to_string(),
            yield_grams: 0.0,
            ..Default::default()
        };
        assert!(create_recipe(&db, zero_yield).is_err());

        let missing_ref = RecipeCreate {
            name: "Pao".to_string(),
            yield_grams: 500.0,
            ingredients: vec![IngredientLine::material(MaterialId(77), 100.0)],
            ..Default::default()
        };
        let err = create_recipe(&db, missing_ref).unwrap_err();
        assert!(err.contains("material not found"));
    }

    #[test]
    fn test_ingredient_lifecycle() {
        let (_dir, db) = setup();
        let flour = add_flour(&db);
        let recipe = create_recipe(
            &db,
            RecipeCreate {
                name: "Pao".to_string(),
                yield_grams: 500.0,
                ..Default::default()
            },
        )
        .unwrap();

        let added = add_recipe_ingredient(
            &db,
            RecipeIngredientCreate {
                recipe_id: recipe.id,
                line: IngredientLine::material(flour, 450.0),
            },
        )
        .unwrap();
        assert_eq!(added.position, 1);

        update_recipe_ingredient(&db, added.id, RecipeIngredientUpdate { quantity: Some(400.0) }).unwrap();
        let detail = get_recipe(&db, recipe.id).unwrap().unwrap();
        assert_eq!(detail.ingredients.len(), 1);
        assert_eq!(detail.ingredients[0].line.quantity, 400.0);
        assert_eq!(detail.ingredients[0].name.as_deref(), Some("Farinha"));

        remove_recipe_ingredient(&db, added.id).unwrap();
        assert!(remove_recipe_ingredient(&db, added.id).is_err());
    }

    #[test]
    fn test_delete_reports_dangling_sub_recipe_lines() {
        let (_dir, db) = setup();
        let base = create_recipe(
            &db,
            RecipeCreate {
                name: "Massa".to_string(),
                yield_grams: 300.0,
                ..Default::default()
            },
        )
        .unwrap();
        create_recipe(
            &db,
            RecipeCreate {
                name: "Torta".to_string(),
                yield_grams: 600.0,
                ingredients: vec![IngredientLine::recipe(base.id, 300.0)],
                ..Default::default()
            },
        )
        .unwrap();

        let deleted = delete_recipe(&db, base.id).unwrap();
        assert_eq!(deleted.dangling_references, 1);
        assert!(get_recipe(&db, base.id).unwrap().is_none());
    }
}
