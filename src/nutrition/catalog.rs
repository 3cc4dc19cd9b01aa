//! Lookup capabilities consumed by the resolver
//!
//! The resolver never touches storage directly. It asks a [`MaterialLookup`] and a
//! [`RecipeLookup`] for snapshots by identifier, so the same calculation runs over
//! an in-memory map, a loaded database snapshot, or anything else that can answer
//! "give me record N".

use std::collections::HashMap;

use crate::models::{Material, MaterialId, Recipe, RecipeId};

/// Read-only access to materials by identifier
pub trait MaterialLookup {
    fn material(&self, id: MaterialId) -> Option<Material>;
}

/// Read-only access to recipes by identifier
pub trait RecipeLookup {
    fn recipe(&self, id: RecipeId) -> Option<Recipe>;
}

impl MaterialLookup for HashMap<MaterialId, Material> {
    fn material(&self, id: MaterialId) -> Option<Material> {
        self.get(&id).cloned()
    }
}

impl RecipeLookup for HashMap<RecipeId, Recipe> {
    fn recipe(&self, id: RecipeId) -> Option<Recipe> {
        self.get(&id).cloned()
    }
}

/// Immutable snapshot of every material and recipe known at one point in time
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    materials: HashMap<MaterialId, Material>,
    recipes: HashMap<RecipeId, Recipe>,
}

impl Catalog {
    pub fn new(materials: Vec<Material>, recipes: Vec<Recipe>) -> Self {
        Self {
            materials: materials.into_iter().map(|m| (m.id, m)).collect(),
            recipes: recipes.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Borrow a recipe without cloning it
    pub fn get_recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(&id)
    }

    pub fn get_material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }
}

impl MaterialLookup for Catalog {
    fn material(&self, id: MaterialId) -> Option<Material> {
        self.materials.material(id)
    }
}

impl RecipeLookup for Catalog {
    fn recipe(&self, id: RecipeId) -> Option<Recipe> {
        self.recipes.recipe(id)
    }
}
