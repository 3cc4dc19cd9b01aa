//! Recipe model
//!
//! A composite source: an ordered list of ingredient lines producing a yield in grams.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::sql::string_list;
use super::{IngredientLine, RecipeIngredient, RecipeIngredientCreate};
use crate::db::DbResult;

/// Stable identifier of a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl std::fmt::Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recipe with its ingredient lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    /// Total mass produced, in grams
    pub yield_grams: f64,
    pub ingredients: Vec<IngredientLine>,
    /// Serving size in grams (0 when not set)
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
}

/// Data for creating a new recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub name: String,
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
    pub ingredients: Vec<IngredientLine>,
}

/// Data for updating a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub yield_grams: Option<f64>,
    pub serving_size: Option<f64>,
    pub serving_name: Option<String>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub prep_time_min: Option<i64>,
}

impl Recipe {
    /// Build an unsaved snapshot
    pub fn new(
        id: RecipeId,
        name: impl Into<String>,
        yield_grams: f64,
        ingredients: Vec<IngredientLine>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            yield_grams,
            ingredients,
            serving_size: 0.0,
            serving_name: String::new(),
            steps: Vec::new(),
            tags: Vec::new(),
            prep_time_min: 0,
        }
    }

    /// Set serving metadata
    pub fn with_serving(mut self, serving_size: f64, serving_name: impl Into<String>) -> Self {
        self.serving_size = serving_size;
        self.serving_name = serving_name.into();
        self
    }

    /// Create a Recipe from a database row, without its ingredient lines
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            yield_grams: row.get("yield_grams")?,
            ingredients: Vec::new(),
            serving_size: row.get("serving_size")?,
            serving_name: row.get("serving_name")?,
            steps: string_list(row, "steps")?,
            tags: string_list(row, "tags")?,
            prep_time_min: row.get("prep_time_min")?,
        })
    }

    /// Insert a new recipe and its ingredient lines
    pub fn create(conn: &Connection, data: &RecipeCreate) -> DbResult<Self> {
        let tx = conn.unchecked_transaction()?;

        tx.execute(
            r#"
            INSERT INTO recipes (name, yield_grams, serving_size, serving_name, steps, tags, prep_time_min)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.name,
                data.yield_grams,
                data.serving_size,
                data.serving_name,
                serde_json::to_string(&data.steps)?,
                serde_json::to_string(&data.tags)?,
                data.prep_time_min,
            ],
        )?;

        let id = RecipeId(tx.last_insert_rowid());
        for line in &data.ingredients {
            RecipeIngredient::create(
                &tx,
                &RecipeIngredientCreate {
                    recipe_id: id,
                    line: *line,
                },
            )?;
        }

        tx.commit()?;

        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a recipe by ID, with its ingredient lines
    pub fn get_by_id(conn: &Connection, id: RecipeId) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        let mut recipe = match result {
            Ok(recipe) => recipe,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        recipe.ingredients = RecipeIngredient::get_for_recipe(conn, id)?
            .into_iter()
            .map(|i| i.line)
            .collect();

        Ok(Some(recipe))
    }

    /// List recipes, optionally filtered by a name fragment
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let mut recipes = match query {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM recipes WHERE name LIKE ?1 ORDER BY name ASC LIMIT ?2 OFFSET ?3",
                )?;
                let pattern = format!("%{}%", q);
                let rows = stmt.query_map(params![pattern, limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM recipes ORDER BY name ASC LIMIT ?1 OFFSET ?2")?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        for recipe in &mut recipes {
            recipe.ingredients = RecipeIngredient::get_for_recipe(conn, recipe.id)?
                .into_iter()
                .map(|i| i.line)
                .collect();
        }

        Ok(recipes)
    }

    /// Load every recipe with its lines in two queries (for calculation snapshots)
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipes ORDER BY id")?;
        let mut recipes = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients ORDER BY recipe_id, position, id"
        )?;
        let mut lines: HashMap<RecipeId, Vec<IngredientLine>> = HashMap::new();
        for row in stmt.query_map([], RecipeIngredient::from_row)? {
            let ingredient = row?;
            lines.entry(ingredient.recipe_id).or_default().push(ingredient.line);
        }

        for recipe in &mut recipes {
            recipe.ingredients = lines.remove(&recipe.id).unwrap_or_default();
        }

        Ok(recipes)
    }

    /// Update a recipe's own columns (ingredient lines are edited separately)
    pub fn update(conn: &Connection, id: RecipeId, data: &RecipeUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(yield_grams) = data.yield_grams {
            updates.push(format!("yield_grams = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(yield_grams));
        }
        if let Some(serving_size) = data.serving_size {
            updates.push(format!("serving_size = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serving_size));
        }
        if let Some(ref serving_name) = data.serving_name {
            updates.push(format!("serving_name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serving_name.clone()));
        }
        if let Some(ref steps) = data.steps {
            updates.push(format!("steps = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(steps)?));
        }
        if let Some(ref tags) = data.tags {
            updates.push(format!("tags = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(tags)?));
        }
        if let Some(prep) = data.prep_time_min {
            updates.push(format!("prep_time_min = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(prep));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE recipes SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Count recipes
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of ingredient lines in other recipes that use this one
    pub fn get_usage_count(conn: &Connection, id: RecipeId) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE kind = 'recipe' AND reference_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a recipe and its own ingredient lines
    ///
    /// Lines in other recipes that reference it are left dangling and resolve to zero.
    pub fn delete(conn: &Connection, id: RecipeId) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
