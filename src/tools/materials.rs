//! Material MCP Tools
//!
//! Tools for managing raw materials and importing them from the reference table.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Material, MaterialCreate, MaterialId, MaterialUpdate, Nutrient, Nutrition};
use crate::nutrition::{find_reference_food, search_reference_foods, MeasureUnit, ReferenceFood};

/// Response for add_material and import_reference_food
#[derive(Debug, Serialize)]
pub struct AddMaterialResponse {
    pub id: MaterialId,
    pub name: String,
    pub unit: MeasureUnit,
}

/// Summary of a material for list results
#[derive(Debug, Serialize)]
pub struct MaterialSummary {
    pub id: MaterialId,
    pub name: String,
    pub unit: MeasureUnit,
    pub calories: f64,
    pub price_per_100: f64,
    pub tags: Vec<String>,
}

impl From<&Material> for MaterialSummary {
    fn from(material: &Material) -> Self {
        Self {
            id: material.id,
            name: material.name.clone(),
            unit: material.unit,
            calories: material.nutrition.calories,
            price_per_100: material.price_per_100,
            tags: material.tags.clone(),
        }
    }
}

/// Full material detail response
#[derive(Debug, Serialize)]
pub struct MaterialDetail {
    #[serde(flatten)]
    pub material: Material,
    /// Basis the nutrition and price refer to, e.g. "100ml"
    pub basis: String,
    pub usage_count: i64,
}

/// Response for list_materials
#[derive(Debug, Serialize)]
pub struct ListMaterialsResponse {
    pub materials: Vec<MaterialSummary>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for update_material
#[derive(Debug, Serialize)]
pub struct UpdateMaterialResponse {
    pub success: bool,
    pub material: Material,
}

/// Response for delete_material
#[derive(Debug, Serialize)]
pub struct DeleteMaterialResponse {
    pub success: bool,
    pub deleted_id: MaterialId,
    /// Recipe lines still pointing at the deleted material; they now contribute nothing
    pub dangling_references: i64,
}

/// One reference table hit
#[derive(Debug, Serialize)]
pub struct ReferenceFoodSummary {
    pub name: &'static str,
    pub per_100g: Nutrition,
}

impl From<&ReferenceFood> for ReferenceFoodSummary {
    fn from(food: &ReferenceFood) -> Self {
        Self {
            name: food.name,
            per_100g: food.nutrition(),
        }
    }
}

/// Response for search_reference_foods
#[derive(Debug, Serialize)]
pub struct SearchReferenceFoodsResponse {
    pub foods: Vec<ReferenceFoodSummary>,
    pub total: usize,
}

fn validate_nutrition(nutrition: &Nutrition) -> Result<(), String> {
    for nutrient in Nutrient::ALL {
        let value = nutrition.get(nutrient);
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a non-negative number", nutrient.key()));
        }
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price < 0.0 {
        return Err("price_per_100 cannot be negative".to_string());
    }
    Ok(())
}

// ============================================================================
// Material Tools
// ============================================================================

/// Add a new material
pub fn add_material(db: &Database, mut data: MaterialCreate) -> Result<AddMaterialResponse, String> {
    // Validate name
    data.name = data.name.trim().to_string();
    if data.name.is_empty() {
        return Err("Material name cannot be empty".to_string());
    }
    validate_price(data.price_per_100)?;
    validate_nutrition(&data.nutrition)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let material = Material::create(&conn, &data)
        .map_err(|e| format!("Failed to create material: {}", e))?;

    tracing::info!(id = %material.id, name = %material.name, "Material created");

    Ok(AddMaterialResponse {
        id: material.id,
        name: material.name,
        unit: material.unit,
    })
}

/// Get a material by ID with usage information
pub fn get_material(db: &Database, id: MaterialId) -> Result<Option<MaterialDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let material = Material::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get material: {}", e))?;

    match material {
        Some(material) => {
            let usage_count = Material::get_usage_count(&conn, id)
                .map_err(|e| format!("Failed to get usage count: {}", e))?;

            Ok(Some(MaterialDetail {
                basis: material.unit.basis_label(),
                material,
                usage_count,
            }))
        }
        None => Ok(None),
    }
}

/// List materials with an optional name filter
pub fn list_materials(
    db: &Database,
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<ListMaterialsResponse, String> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let materials = Material::list(&conn, query, limit, offset)
        .map_err(|e| format!("Failed to list materials: {}", e))?;

    let total = Material::count(&conn)
        .map_err(|e| format!("Failed to count materials: {}", e))?;

    Ok(ListMaterialsResponse {
        materials: materials.iter().map(MaterialSummary::from).collect(),
        total,
        limit,
        offset,
    })
}

/// Update a material
pub fn update_material(
    db: &Database,
    id: MaterialId,
    mut data: MaterialUpdate,
) -> Result<UpdateMaterialResponse, String> {
    if let Some(ref name) = data.name {
        let name = name.trim();
        if name.is_empty() {
            return Err("Material name cannot be empty".to_string());
        }
        data.name = Some(name.to_string());
    }
    if let Some(price) = data.price_per_100 {
        validate_price(price)?;
    }
    for (nutrient, value) in data.nutrient_updates() {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{} must be a non-negative number", nutrient.key()));
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = Material::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update material: {}", e))?;

    match updated {
        Some(material) => {
            tracing::info!(id = %id, "Material updated");
            Ok(UpdateMaterialResponse {
                success: true,
                material,
            })
        }
        None => Err(format!("Material not found with id: {}", id)),
    }
}

/// Delete a material
///
/// Recipes that use it keep their lines; those lines resolve to zero afterwards.
pub fn delete_material(db: &Database, id: MaterialId) -> Result<DeleteMaterialResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let dangling_references = Material::get_usage_count(&conn, id)
        .map_err(|e| format!("Failed to check usage: {}", e))?;

    let deleted = Material::delete(&conn, id)
        .map_err(|e| format!("Failed to delete material: {}", e))?;
    if !deleted {
        return Err(format!("Material not found with id: {}", id));
    }

    if dangling_references > 0 {
        tracing::warn!(id = %id, dangling_references, "Deleted material is still referenced by recipes");
    } else {
        tracing::info!(id = %id, "Material deleted");
    }

    Ok(DeleteMaterialResponse {
        success: true,
        deleted_id: id,
        dangling_references,
    })
}

// ============================================================================
// Reference Table Tools
// ============================================================================

/// Search the built-in TACO subset
pub fn search_reference_foods_tool(query: &str, limit: usize) -> SearchReferenceFoodsResponse {
    let foods: Vec<ReferenceFoodSummary> = search_reference_foods(query, limit.clamp(1, 50))
        .into_iter()
        .map(ReferenceFoodSummary::from)
        .collect();
    let total = foods.len();

    SearchReferenceFoodsResponse { foods, total }
}

/// Create a gram-based material from a reference table entry
pub fn import_reference_food(
    db: &Database,
    name: &str,
    price_per_100: f64,
) -> Result<AddMaterialResponse, String> {
    let food = find_reference_food(name)
        .ok_or_else(|| format!("Reference food not found: {}", name))?;

    add_material(db, food.to_material(price_per_100))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("materials.db")).unwrap();
        (dir, db)
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let (_dir, db) = setup();
        let blank = MaterialCreate {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(add_material(&db, blank).is_err());

        let negative = MaterialCreate {
            name: "Sal".to_string(),
            nutrition: Nutrition {
                sodium: -1.0,
                ..Nutrition::zero()
            },
            ..Default::default()
        };
        let err = add_material(&db, negative).unwrap_err();
        assert!(err.contains("sodium"));
    }

    #[test]
    fn test_import_and_get() {
        let (_dir, db) = setup();
        let created = import_reference_food(&db, "farinha de trigo", 0.49).unwrap();
        assert_eq!(created.name, "Farinha de trigo");

        let detail = get_material(&db, created.id).unwrap().unwrap();
        assert_eq!(detail.basis, "100g");
        assert_eq!(detail.material.nutrition.calories, 360.0);
        assert_eq!(detail.usage_count, 0);

        assert!(import_reference_food(&db, "pizza", 1.0).is_err());
    }

    #[test]
    fn test_delete_missing_material() {
        let (_dir, db) = setup();
        assert!(delete_material(&db, MaterialId(42)).is_err());
    }

    #[test]
    fn test_search_reference_foods_tool() {
        let response = search_reference_foods_tool("ovo", 8);
        assert_eq!(response.total, 3);
        assert_eq!(response.foods[0].name, "Ovo de galinha inteiro");
    }
}
