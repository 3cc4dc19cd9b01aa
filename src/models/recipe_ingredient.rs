//! Recipe Ingredient model
//!
//! An ingredient line references either a material or another recipe.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::{MaterialId, RecipeId};
use crate::db::DbResult;

/// What an ingredient line points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "reference_id", rename_all = "snake_case")]
pub enum IngredientSource {
    /// Quantity in the material's own unit
    Material(MaterialId),
    /// Quantity in grams of the sub-recipe's yield
    Recipe(RecipeId),
}

impl IngredientSource {
    /// Storage discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            IngredientSource::Material(_) => "material",
            IngredientSource::Recipe(_) => "recipe",
        }
    }

    pub fn reference_id(&self) -> i64 {
        match self {
            IngredientSource::Material(id) => id.0,
            IngredientSource::Recipe(id) => id.0,
        }
    }

    /// Rebuild from the stored discriminator and id
    pub fn from_parts(kind: &str, reference_id: i64) -> Option<Self> {
        match kind {
            "material" => Some(IngredientSource::Material(MaterialId(reference_id))),
            "recipe" => Some(IngredientSource::Recipe(RecipeId(reference_id))),
            _ => None,
        }
    }
}

/// One line of a recipe: a source and how much of it is used
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IngredientLine {
    #[serde(flatten)]
    pub source: IngredientSource,
    pub quantity: f64,
}

impl IngredientLine {
    pub fn material(id: MaterialId, quantity: f64) -> Self {
        Self {
            source: IngredientSource::Material(id),
            quantity,
        }
    }

    pub fn recipe(id: RecipeId, quantity: f64) -> Self {
        Self {
            source: IngredientSource::Recipe(id),
            quantity,
        }
    }
}

/// A stored ingredient line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub id: i64,
    pub recipe_id: RecipeId,
    pub position: i64,
    #[serde(flatten)]
    pub line: IngredientLine,
}

/// Ingredient line with the referenced record's name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientDetail {
    pub id: i64,
    #[serde(flatten)]
    pub line: IngredientLine,
    /// None when the reference no longer exists
    pub name: Option<String>,
    /// Material unit, or "g" for sub-recipes
    pub unit: String,
}

/// Data for adding an ingredient to a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredientCreate {
    pub recipe_id: RecipeId,
    #[serde(flatten)]
    pub line: IngredientLine,
}

/// Data for updating a recipe ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeIngredientUpdate {
    pub quantity: Option<f64>,
}

/// Decode the kind/reference_id pair of a row
fn source_columns(row: &Row) -> rusqlite::Result<IngredientSource> {
    let kind: String = row.get("kind")?;
    let reference_id: i64 = row.get("reference_id")?;
    IngredientSource::from_parts(&kind, reference_id).ok_or_else(|| {
        let idx = row.as_ref().column_index("kind").unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown ingredient kind '{}'", kind).into(),
        )
    })
}

impl RecipeIngredient {
    /// Create from a database row
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            recipe_id: row.get("recipe_id")?,
            position: row.get("position")?,
            line: IngredientLine {
                source: source_columns(row)?,
                quantity: row.get("quantity")?,
            },
        })
    }

    /// Append an ingredient to the end of a recipe
    pub fn create(conn: &Connection, data: &RecipeIngredientCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, kind, reference_id, quantity)
            VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM recipe_ingredients WHERE recipe_id = ?1),
                ?2, ?3, ?4
            )
            "#,
            params![
                data.recipe_id,
                data.line.source.kind(),
                data.line.source.reference_id(),
                data.line.quantity,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recipe_ingredients WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get all ingredients for a recipe, in line order
    pub fn get_for_recipe(conn: &Connection, recipe_id: RecipeId) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM recipe_ingredients WHERE recipe_id = ?1 ORDER BY position, id"
        )?;

        let ingredients = stmt
            .query_map([recipe_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Get ingredients with the referenced names for a recipe
    pub fn get_details_for_recipe(conn: &Connection, recipe_id: RecipeId) -> DbResult<Vec<RecipeIngredientDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT ri.id, ri.kind, ri.reference_id, ri.quantity,
                   CASE ri.kind WHEN 'material' THEN m.name ELSE r.name END AS name,
                   CASE ri.kind WHEN 'material' THEN COALESCE(m.unit, 'g') ELSE 'g' END AS unit
            FROM recipe_ingredients ri
            LEFT JOIN materials m ON ri.kind = 'material' AND m.id = ri.reference_id
            LEFT JOIN recipes r ON ri.kind = 'recipe' AND r.id = ri.reference_id
            WHERE ri.recipe_id = ?1
            ORDER BY ri.position, ri.id
            "#
        )?;

        let details = stmt
            .query_map([recipe_id], |row| {
                Ok(RecipeIngredientDetail {
                    id: row.get("id")?,
                    line: IngredientLine {
                        source: source_columns(row)?,
                        quantity: row.get("quantity")?,
                    },
                    name: row.get("name")?,
                    unit: row.get("unit")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Update an ingredient
    pub fn update(conn: &Connection, id: i64, data: &RecipeIngredientUpdate) -> DbResult<Option<Self>> {
        if let Some(quantity) = data.quantity {
            conn.execute(
                "UPDATE recipe_ingredients SET quantity = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![quantity, id],
            )?;
        }

        Self::get_by_id(conn, id)
    }

    /// Delete an ingredient
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM recipe_ingredients WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_json_shape() {
        let line = IngredientLine::recipe(RecipeId(4), 50.0);
        let json = serde_json::to_value(line).unwrap();
        assert_eq!(json["type"], "recipe");
        assert_eq!(json["reference_id"], 4);
        assert_eq!(json["quantity"], 50.0);

        let parsed: IngredientLine =
            serde_json::from_str(r#"{"type":"material","reference_id":9,"quantity":2}"#).unwrap();
        assert_eq!(parsed, IngredientLine::material(MaterialId(9), 2.0));
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            IngredientSource::from_parts("material", 3),
            Some(IngredientSource::Material(MaterialId(3)))
        );
        assert_eq!(
            IngredientSource::from_parts("recipe", 3),
            Some(IngredientSource::Recipe(RecipeId(3)))
        );
        assert_eq!(IngredientSource::from_parts("raw_material", 3), None);
    }
}
