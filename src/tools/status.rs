//! NutriCalc Status Tool
//!
//! Provides runtime status information about the NutriCalc service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::{Material, Recipe};

/// Recipe costing and labeling instructions for AI assistants
pub const RECIPE_INSTRUCTIONS: &str = r#"
# NutriCalc Recipe Instructions

This guide explains how to cost recipes and produce nutrition labels with the NutriCalc tools.

## Overview

1. **Materials** - Raw ingredients with nutrition and price per 100 of their unit
2. **Recipes** - Ordered ingredient lines producing a yield in grams
3. **Labels** - ANVISA (RDC 429/2020, IN 75/2020) nutrition tables computed from a recipe

---

## Materials

Every material declares one unit:

| unit | quantity means | nutrition and price stored per |
|------|----------------|--------------------------------|
| `g`  | grams          | 100 g                          |
| `ml` | milliliters    | 100 ml                         |
| `un` | pieces (eggs)  | 100 pieces                     |

Sodium is in **mg**, energy in **kcal**, everything else in **g**.

For common Brazilian ingredients, call `search_reference_foods` (TACO table) and then
`import_reference_food` with the exact name and a price per 100 g.

---

## Recipes

- `yield_grams` is the total mass the recipe produces (after cooking losses).
- `serving_size` (g) and `serving_name` (e.g. "1 fatia") drive the per-serving column.
- Ingredient lines are either:
  - `{"type": "material", "reference_id": 3, "quantity": 200}` - quantity in the material's unit
  - `{"type": "recipe", "reference_id": 7, "quantity": 150}` - grams of another recipe's yield

Sub-recipes are scaled by `quantity / sub_recipe.yield_grams`. A line that points at a
deleted record, or that loops back to a recipe already being resolved, contributes zero.

---

## Labels and Costs

- `get_nutrition_label` returns per 100 g and per serving figures rounded per IN 75/2020,
  %VD from the rounded serving value, and front-of-pack warnings
  (added sugar >= 15 g, saturated fat >= 6 g, sodium >= 600 mg per 100 g, unrounded).
- `get_recipe_cost` returns total, per 100 g and per serving cost.
- `compare_recipes` reports per 100 g differences (b - a) between two recipes.

## Quick Reference

| Task | Tool |
|------|------|
| Add ingredient | `add_material` |
| Import from TACO | `search_reference_foods`, `import_reference_food` |
| Create recipe | `create_recipe` |
| Edit lines | `add_recipe_ingredient`, `update_recipe_ingredient`, `remove_recipe_ingredient` |
| Label | `get_nutrition_label` |
| Cost | `get_recipe_cost` |
"#;

/// Runtime status of the NutriCalc service
#[derive(Debug, Clone, Serialize)]
pub struct NutriCalcStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub material_count: Option<i64>,
    pub recipe_count: Option<i64>,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> NutriCalcStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let material_count = db.with_conn(Material::count).ok();
        let recipe_count = db.with_conn(Recipe::count).ok();

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutriCalcStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            material_count,
            recipe_count,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("status.db");
        let db = Database::open(&path).unwrap();

        let tracker = StatusTracker::new(path);
        let status = tracker.get_status(&db);
        assert_eq!(status.material_count, Some(0));
        assert_eq!(status.recipe_count, Some(0));
        assert_eq!(status.process_id, std::process::id());
        assert!(status.database_size_bytes.is_some());
        assert!(status.started_at <= Utc::now());
    }
}
