//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- MATERIALS
        -- Leaf composition sources, values per 100 units
        -- ============================================
        CREATE TABLE materials (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            unit TEXT NOT NULL CHECK(unit IN ('g', 'ml', 'un')) DEFAULT 'g',
            price_per_100 REAL NOT NULL DEFAULT 0,

            -- Nutritional values (per 100 units)
            calories REAL NOT NULL DEFAULT 0,
            carbs REAL NOT NULL DEFAULT 0,          -- grams
            total_sugars REAL NOT NULL DEFAULT 0,   -- grams
            added_sugars REAL NOT NULL DEFAULT 0,   -- grams
            protein REAL NOT NULL DEFAULT 0,        -- grams
            total_fat REAL NOT NULL DEFAULT 0,      -- grams
            saturated_fat REAL NOT NULL DEFAULT 0,  -- grams
            trans_fat REAL NOT NULL DEFAULT 0,      -- grams
            fiber REAL NOT NULL DEFAULT 0,          -- grams
            sodium REAL NOT NULL DEFAULT 0,         -- milligrams

            tags TEXT NOT NULL DEFAULT '[]',        -- JSON array
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_materials_name ON materials(name);

        -- ============================================
        -- RECIPES
        -- Composite sources; yield is always grams
        -- ============================================
        CREATE TABLE recipes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            yield_grams REAL NOT NULL DEFAULT 0,
            serving_size REAL NOT NULL DEFAULT 0,   -- grams
            serving_name TEXT NOT NULL DEFAULT '',
            steps TEXT NOT NULL DEFAULT '[]',       -- JSON array
            tags TEXT NOT NULL DEFAULT '[]',        -- JSON array
            prep_time_min INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipes_name ON recipes(name);

        -- ============================================
        -- RECIPE INGREDIENTS
        -- reference_id points at materials or recipes depending on kind.
        -- No foreign key on reference_id: dangling references and
        -- cycles are tolerated and resolve to zero.
        -- ============================================
        CREATE TABLE recipe_ingredients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            kind TEXT NOT NULL CHECK(kind IN ('material', 'recipe')),
            reference_id INTEGER NOT NULL,
            quantity REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_recipe_ingredients_recipe ON recipe_ingredients(recipe_id, position);
        CREATE INDEX idx_recipe_ingredients_reference ON recipe_ingredients(kind, reference_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
