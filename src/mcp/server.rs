//! NutriCalc MCP Server Implementation
//!
//! Implements the MCP server with all NutriCalc tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{
    IngredientLine, IngredientSource, MaterialCreate, MaterialId, MaterialUpdate, Nutrition,
    RecipeCreate, RecipeId, RecipeIngredientCreate, RecipeIngredientUpdate, RecipeUpdate,
};
use crate::nutrition::{MeasureUnit, DEFAULT_SEARCH_LIMIT};
use crate::tools::labels;
use crate::tools::materials;
use crate::tools::recipes;
use crate::tools::status::StatusTracker;

/// NutriCalc MCP Service
#[derive(Clone)]
pub struct NutriCalcService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NutriCalcService>,
}

impl NutriCalcService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))]))
}

fn parse_unit(unit: &str) -> Result<MeasureUnit, McpError> {
    MeasureUnit::from_str(unit).ok_or_else(|| {
        McpError::invalid_params(format!("Invalid unit '{}': expected g, ml or un", unit), None)
    })
}

// ============================================================================
// Material Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddMaterialParams {
    pub name: String,
    /// "g", "ml" or "un"; nutrition and price are per 100 of this unit
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub price_per_100: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub total_sugars: f64,
    #[serde(default)]
    pub added_sugars: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub total_fat: f64,
    #[serde(default)]
    pub saturated_fat: f64,
    #[serde(default)]
    pub trans_fat: f64,
    #[serde(default)]
    pub fiber: f64,
    /// Milligrams per 100 units
    #[serde(default)]
    pub sodium: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_unit() -> String { "g".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListParams {
    /// Optional name fragment
    pub query: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateMaterialParams {
    pub id: i64,
    pub name: Option<String>,
    pub unit: Option<String>,
    pub price_per_100: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub calories: Option<f64>,
    pub carbs: Option<f64>,
    pub total_sugars: Option<f64>,
    pub added_sugars: Option<f64>,
    pub protein: Option<f64>,
    pub total_fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub trans_fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchReferenceFoodsParams {
    pub query: String,
    #[serde(default = "default_reference_limit")]
    pub limit: usize,
}

fn default_reference_limit() -> usize { DEFAULT_SEARCH_LIMIT }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportReferenceFoodParams {
    /// Exact reference table name, e.g. "Farinha de trigo"
    pub name: String,
    #[serde(default)]
    pub price_per_100: f64,
}

// ============================================================================
// Recipe Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IngredientLineParams {
    /// "material" or "recipe"
    #[serde(rename = "type")]
    pub kind: String,
    pub reference_id: i64,
    /// In the material's unit, or grams of the sub-recipe's yield
    pub quantity: f64,
}

impl IngredientLineParams {
    fn to_line(&self) -> Result<IngredientLine, McpError> {
        let source = IngredientSource::from_parts(&self.kind, self.reference_id).ok_or_else(|| {
            McpError::invalid_params(
                format!("Invalid ingredient type '{}': expected material or recipe", self.kind),
                None,
            )
        })?;
        Ok(IngredientLine {
            source,
            quantity: self.quantity,
        })
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRecipeParams {
    pub name: String,
    /// Total grams produced
    pub yield_grams: f64,
    #[serde(default)]
    pub serving_size: f64,
    #[serde(default)]
    pub serving_name: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub prep_time_min: i64,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeParams {
    pub id: i64,
    pub name: Option<String>,
    pub yield_grams: Option<f64>,
    pub serving_size: Option<f64>,
    pub serving_name: Option<String>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub prep_time_min: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecipeIngredientParams {
    pub recipe_id: i64,
    #[serde(flatten)]
    pub line: IngredientLineParams,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateRecipeIngredientParams {
    pub id: i64,
    pub quantity: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareRecipesParams {
    pub recipe_a: i64,
    pub recipe_b: i64,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutriCalcService {
    // --- Status ---

    #[tool(description = "Get the current status of the NutriCalc service including build info, database status, and process information")]
    async fn nutricalc_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get step-by-step instructions for materials, recipes, sub-recipes and nutrition labels. Call this when unsure how to use the NutriCalc tools.")]
    fn recipe_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::RECIPE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(RECIPE_INSTRUCTIONS)]))
    }

    // --- Materials ---

    #[tool(description = "Create a raw material with nutrition and price per 100 of its unit (g, ml or un)")]
    fn add_material(&self, Parameters(p): Parameters<AddMaterialParams>) -> Result<CallToolResult, McpError> {
        let data = MaterialCreate {
            name: p.name,
            unit: parse_unit(&p.unit)?,
            nutrition: Nutrition {
                calories: p.calories, carbs: p.carbs, total_sugars: p.total_sugars,
                added_sugars: p.added_sugars, protein: p.protein, total_fat: p.total_fat,
                saturated_fat: p.saturated_fat, trans_fat: p.trans_fat, fiber: p.fiber,
                sodium: p.sodium,
            },
            price_per_100: p.price_per_100,
            tags: p.tags,
        };
        let result = materials::add_material(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a material with its composition, price and how many recipe lines use it")]
    fn get_material(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = materials::get_material(&self.database, MaterialId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(material) => to_json(&material),
            None => not_found("Material", p.id),
        }
    }

    #[tool(description = "List materials ordered by name, optionally filtered by a name fragment")]
    fn list_materials(&self, Parameters(p): Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        let result = materials::list_materials(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update any field of a material. Labels and costs of recipes using it change on their next calculation.")]
    fn update_material(&self, Parameters(p): Parameters<UpdateMaterialParams>) -> Result<CallToolResult, McpError> {
        let unit = p.unit.as_deref().map(parse_unit).transpose()?;
        let data = MaterialUpdate {
            name: p.name, unit, price_per_100: p.price_per_100, tags: p.tags,
            calories: p.calories, carbs: p.carbs, total_sugars: p.total_sugars,
            added_sugars: p.added_sugars, protein: p.protein, total_fat: p.total_fat,
            saturated_fat: p.saturated_fat, trans_fat: p.trans_fat, fiber: p.fiber,
            sodium: p.sodium,
        };
        let result = materials::update_material(&self.database, MaterialId(p.id), data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a material. Recipe lines that still reference it are kept and contribute nothing.")]
    fn delete_material(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = materials::delete_material(&self.database, MaterialId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Search the built-in TACO table (Brazilian food composition, per 100 g). Every word of the query must appear in the name.")]
    fn search_reference_foods(&self, Parameters(p): Parameters<SearchReferenceFoodsParams>) -> Result<CallToolResult, McpError> {
        let result = materials::search_reference_foods_tool(&p.query, p.limit);
        to_json(&result)
    }

    #[tool(description = "Create a gram-based material from a TACO table entry by exact name")]
    fn import_reference_food(&self, Parameters(p): Parameters<ImportReferenceFoodParams>) -> Result<CallToolResult, McpError> {
        let result = materials::import_reference_food(&self.database, &p.name, p.price_per_100)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Recipes ---

    #[tool(description = "Create a recipe. Ingredient lines are {type: material|recipe, reference_id, quantity}; sub-recipe quantities are grams of that recipe's yield.")]
    fn create_recipe(&self, Parameters(p): Parameters<CreateRecipeParams>) -> Result<CallToolResult, McpError> {
        let ingredients = p
            .ingredients
            .iter()
            .map(IngredientLineParams::to_line)
            .collect::<Result<Vec<_>, _>>()?;
        let data = RecipeCreate {
            name: p.name, yield_grams: p.yield_grams, serving_size: p.serving_size,
            serving_name: p.serving_name, steps: p.steps, tags: p.tags,
            prep_time_min: p.prep_time_min, ingredients,
        };
        let result = recipes::create_recipe(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a recipe with its ingredient lines and the names of the referenced materials and sub-recipes")]
    fn get_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::get_recipe(&self.database, RecipeId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(recipe) => to_json(&recipe),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "List recipes ordered by name, optionally filtered by a name fragment")]
    fn list_recipes(&self, Parameters(p): Parameters<ListParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::list_recipes(&self.database, p.query.as_deref(), p.limit, p.offset)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a recipe's name, yield, serving, steps, tags or preparation time")]
    fn update_recipe(&self, Parameters(p): Parameters<UpdateRecipeParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeUpdate {
            name: p.name, yield_grams: p.yield_grams, serving_size: p.serving_size,
            serving_name: p.serving_name, steps: p.steps, tags: p.tags,
            prep_time_min: p.prep_time_min,
        };
        let result = recipes::update_recipe(&self.database, RecipeId(p.id), data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a recipe and its lines. Other recipes using it as a sub-recipe keep their lines, which contribute nothing.")]
    fn delete_recipe(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::delete_recipe(&self.database, RecipeId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Append an ingredient line (material or sub-recipe) to a recipe")]
    fn add_recipe_ingredient(&self, Parameters(p): Parameters<AddRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientCreate {
            recipe_id: RecipeId(p.recipe_id),
            line: p.line.to_line()?,
        };
        let result = recipes::add_recipe_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Change the quantity of an ingredient line")]
    fn update_recipe_ingredient(&self, Parameters(p): Parameters<UpdateRecipeIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = RecipeIngredientUpdate { quantity: Some(p.quantity) };
        let result = recipes::update_recipe_ingredient(&self.database, p.id, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove an ingredient line from its recipe")]
    fn remove_recipe_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = recipes::remove_recipe_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Labels and Costs ---

    #[tool(description = "Build the ANVISA nutrition label of a recipe: per 100 g and per serving values rounded per IN 75/2020, %VD, and front-of-pack warnings")]
    fn get_nutrition_label(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = labels::get_nutrition_label(&self.database, RecipeId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(label) => to_json(&label),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "Get the total, per 100 g and per serving cost of a recipe, including sub-recipes")]
    fn get_recipe_cost(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = labels::get_recipe_cost(&self.database, RecipeId(p.id)).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(cost) => to_json(&cost),
            None => not_found("Recipe", p.id),
        }
    }

    #[tool(description = "Compare two recipes per 100 g: nutrient and cost differences (recipe_b minus recipe_a)")]
    fn compare_recipes(&self, Parameters(p): Parameters<CompareRecipesParams>) -> Result<CallToolResult, McpError> {
        let result = labels::compare_recipes(&self.database, RecipeId(p.recipe_a), RecipeId(p.recipe_b))
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }
}

#[tool_handler]
impl ServerHandler for NutriCalcService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutricalc".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("NutriCalc".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "NutriCalc - Recipe costing and ANVISA nutrition labels. \
                 IMPORTANT: Call recipe_instructions before building recipes. \
                 Materials: add/get/list/update/delete_material, search_reference_foods, import_reference_food. \
                 Recipes: create/get/list/update/delete_recipe, add/update/remove_recipe_ingredient. \
                 Results: get_nutrition_label, get_recipe_cost, compare_recipes. \
                 Status: nutricalc_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_params_parse() {
        let p: AddRecipeIngredientParams = serde_json::from_str(
            r#"{"recipe_id": 3, "type": "recipe", "reference_id": 9, "quantity": 150}"#,
        )
        .unwrap();
        assert_eq!(p.line.to_line().unwrap(), IngredientLine::recipe(RecipeId(9), 150.0));

        let bad = IngredientLineParams {
            kind: "raw".to_string(),
            reference_id: 1,
            quantity: 1.0,
        };
        assert!(bad.to_line().is_err());
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!(parse_unit("ml").unwrap(), MeasureUnit::Milliliters);
        assert!(parse_unit("cup").is_err());
    }
}
