//! Material model
//!
//! A leaf composition source: nutrition and price per 100 of its declared unit.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::sql::{nutrition_columns, string_list};
use super::{Nutrient, Nutrition};
use crate::db::DbResult;
use crate::nutrition::MeasureUnit;

/// Stable identifier of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub i64);

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A raw material with per-100-unit composition and price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub unit: MeasureUnit,
    /// Composition per 100 units of `unit`
    pub nutrition: Nutrition,
    /// Price per 100 units of `unit`
    pub price_per_100: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Data for creating a new material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialCreate {
    pub name: String,
    #[serde(default)]
    pub unit: MeasureUnit,
    #[serde(default)]
    pub nutrition: Nutrition,
    #[serde(default)]
    pub price_per_100: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Data for updating a material
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialUpdate {
    pub name: Option<String>,
    pub unit: Option<MeasureUnit>,
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

impl MaterialUpdate {
    /// Nutrient columns that carry a new value
    pub fn nutrient_updates(&self) -> Vec<(Nutrient, f64)> {
        let values = [
            self.calories,
            self.carbs,
            self.total_sugars,
            self.added_sugars,
            self.protein,
            self.total_fat,
            self.saturated_fat,
            self.trans_fat,
            self.fiber,
            self.sodium,
        ];
        Nutrient::ALL
            .into_iter()
            .zip(values)
            .filter_map(|(n, v)| v.map(|v| (n, v)))
            .collect()
    }
}

impl Material {
    /// Build an unsaved snapshot
    pub fn new(
        id: MaterialId,
        name: impl Into<String>,
        unit: MeasureUnit,
        nutrition: Nutrition,
        price_per_100: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unit,
            nutrition,
            price_per_100,
            tags: Vec::new(),
        }
    }

    /// Create a Material from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            unit: row.get("unit")?,
            nutrition: nutrition_columns(row)?,
            price_per_100: row.get("price_per_100")?,
            tags: string_list(row, "tags")?,
        })
    }

    /// Insert a new material into the database
    pub fn create(conn: &Connection, data: &MaterialCreate) -> DbResult<Self> {
        let n = &data.nutrition;
        conn.execute(
            r#"
            INSERT INTO materials (
                name, unit, price_per_100,
                calories, carbs, total_sugars, added_sugars, protein,
                total_fat, saturated_fat, trans_fat, fiber, sodium,
                tags
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                data.name,
                data.unit,
                data.price_per_100,
                n.calories,
                n.carbs,
                n.total_sugars,
                n.added_sugars,
                n.protein,
                n.total_fat,
                n.saturated_fat,
                n.trans_fat,
                n.fiber,
                n.sodium,
                serde_json::to_string(&data.tags)?,
            ],
        )?;

        let id = MaterialId(conn.last_insert_rowid());
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a material by ID
    pub fn get_by_id(conn: &Connection, id: MaterialId) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM materials WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(material) => Ok(Some(material)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List materials, optionally filtered by a name fragment
    pub fn list(conn: &Connection, query: Option<&str>, limit: i64, offset: i64) -> DbResult<Vec<Self>> {
        let materials = match query {
            Some(q) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM materials WHERE name LIKE ?1 ORDER BY name ASC LIMIT ?2 OFFSET ?3",
                )?;
                let pattern = format!("%{}%", q);
                let rows = stmt.query_map(params![pattern, limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT * FROM materials ORDER BY name ASC LIMIT ?1 OFFSET ?2")?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(materials)
    }

    /// Load every material (for calculation snapshots)
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM materials ORDER BY id")?;
        let materials = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(materials)
    }

    /// Update a material
    pub fn update(conn: &Connection, id: MaterialId, data: &MaterialUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit));
        }
        if let Some(price) = data.price_per_100 {
            updates.push(format!("price_per_100 = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(price));
        }
        if let Some(ref tags) = data.tags {
            updates.push(format!("tags = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(tags)?));
        }
        for (nutrient, value) in data.nutrient_updates() {
            updates.push(format!("{} = ?{}", nutrient.key(), params_vec.len() + 1));
            params_vec.push(Box::new(value));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE materials SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Count materials
    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM materials", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of ingredient lines that reference this material
    pub fn get_usage_count(conn: &Connection, id: MaterialId) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM recipe_ingredients WHERE kind = 'material' AND reference_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete a material
    ///
    /// Lines that still reference it stay in place and contribute nothing.
    pub fn delete(conn: &Connection, id: MaterialId) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM materials WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn milk() -> MaterialCreate {
        MaterialCreate {
            name: "Leite integral".to_string(),
            unit: MeasureUnit::Milliliters,
            nutrition: Nutrition {
                calories: 60.0,
                carbs: 4.7,
                total_sugars: 4.7,
                protein: 3.2,
                total_fat: 3.3,
                saturated_fat: 2.0,
                trans_fat: 0.1,
                sodium: 52.0,
                ..Nutrition::zero()
            },
            price_per_100: 0.55,
            tags: vec!["laticinio".to_string()],
        }
    }

    #[test]
    fn test_create_and_get() {
        let conn = setup();
        let created = Material::create(&conn, &milk()).unwrap();
        let loaded = Material::get_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(created, loaded);
        assert_eq!(loaded.unit, MeasureUnit::Milliliters);
        assert_eq!(loaded.nutrition.sodium, 52.0);
        assert_eq!(loaded.tags, vec!["laticinio".to_string()]);
    }

    #[test]
    fn test_partial_update_keeps_other_columns() {
        let conn = setup();
        let created = Material::create(&conn, &milk()).unwrap();
        let update = MaterialUpdate {
            sodium: Some(60.0),
            price_per_100: Some(0.65),
            ..Default::default()
        };
        let updated = Material::update(&conn, created.id, &update).unwrap().unwrap();
        assert_eq!(updated.nutrition.sodium, 60.0);
        assert_eq!(updated.price_per_100, 0.65);
        assert_eq!(updated.nutrition.calories, 60.0);
        assert_eq!(updated.name, "Leite integral");
    }

    #[test]
    fn test_list_filters_by_name() {
        let conn = setup();
        Material::create(&conn, &milk()).unwrap();
        Material::create(
            &conn,
            &MaterialCreate {
                name: "Farinha de trigo".to_string(),
                ..Default::default()
            },
        )
        .unwrap();

        let all = Material::list(&conn, None, 50, 0).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Farinha de trigo");

        let filtered = Material::list(&conn, Some("leite"), 50, 0).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(Material::count(&conn).unwrap(), 2);
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let conn = setup();
        assert!(!Material::delete(&conn, MaterialId(99)).unwrap());
    }
}
