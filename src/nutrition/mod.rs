//! Nutrition calculation module
//!
//! Resolves recipe compositions over a possibly cyclic ingredient graph and turns
//! the results into label figures.

pub mod catalog;
pub mod compare;
pub mod label;
pub mod projector;
pub mod reference_foods;
pub mod resolver;
pub mod rounding;
pub mod units;
pub mod warnings;

pub use catalog::{Catalog, MaterialLookup, RecipeLookup};
pub use compare::{compare_recipes, ComparedRecipe, Delta, NutrientDelta, RecipeComparison, Trend};
pub use label::{format_value, LabelRow, NutritionLabel};
pub use projector::{per_100, project_cost, project_to_basis, servings_per_package};
pub use reference_foods::{
    find_reference_food, search_reference_foods, ReferenceFood, DEFAULT_SEARCH_LIMIT, TACO_FOODS,
};
pub use resolver::{resolve_composition, resolve_cost, resolve_nutrition, Composition};
pub use rounding::{daily_value, reference_daily_value, round_for_label, round_to_nearest, round_value, DailyValue};
pub use units::{material_factor, recipe_factor, scale_factor, MeasureUnit, REFERENCE_BASIS};
pub use warnings::{evaluate_warnings, FopResult, FopWarning};
