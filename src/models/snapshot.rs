//! Calculation snapshots
//!
//! Every label or cost figure is computed against one consistent read of the store.

use rusqlite::Connection;

use super::{Material, Recipe};
use crate::db::DbResult;
use crate::nutrition::Catalog;

/// Load all materials and recipes into an immutable [`Catalog`]
pub fn load_catalog(conn: &Connection) -> DbResult<Catalog> {
    let materials = Material::list_all(conn)?;
    let recipes = Recipe::list_all(conn)?;

    tracing::debug!(
        materials = materials.len(),
        recipes = recipes.len(),
        "Loaded calculation snapshot"
    );

    Ok(Catalog::new(materials, recipes))
}
