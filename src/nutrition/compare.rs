//! Side-by-side comparison of two recipes

use serde::Serialize;

use super::catalog::{MaterialLookup, RecipeLookup};
use super::projector::{per_100, project_cost};
use super::resolver::resolve_composition;
use super::units::REFERENCE_BASIS;
use crate::models::{Nutrient, Nutrition, Recipe, RecipeId};

/// Direction of `b` relative to `a`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Higher,
    Lower,
    Equal,
}

impl Trend {
    fn of(diff: f64) -> Self {
        if diff > 0.0 {
            Trend::Higher
        } else if diff < 0.0 {
            Trend::Lower
        } else {
            Trend::Equal
        }
    }
}

/// `b - a` for one figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Delta {
    pub a: f64,
    pub b: f64,
    pub diff: f64,
    pub trend: Trend,
}

impl Delta {
    pub fn new(a: f64, b: f64) -> Self {
        let diff = b - a;
        Self {
            a,
            b,
            diff,
            trend: Trend::of(diff),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientDelta {
    pub nutrient: Nutrient,
    pub unit: &'static str,
    #[serde(flatten)]
    pub delta: Delta,
}

/// Summary of one side of the comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedRecipe {
    pub id: RecipeId,
    pub name: String,
    pub yield_grams: f64,
    pub total_cost: f64,
    pub cost_per_100g: f64,
    pub per_100g: Nutrition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeComparison {
    pub a: ComparedRecipe,
    pub b: ComparedRecipe,
    pub total_cost: Delta,
    pub cost_per_100g: Delta,
    /// Per-100 g deltas in label order
    pub nutrients: Vec<NutrientDelta>,
}

fn summarize<M, R>(recipe: &Recipe, materials: &M, recipes: &R) -> ComparedRecipe
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    let composition = resolve_composition(recipe, materials, recipes);
    ComparedRecipe {
        id: recipe.id,
        name: recipe.name.clone(),
        yield_grams: recipe.yield_grams,
        total_cost: composition.cost,
        cost_per_100g: project_cost(composition.cost, recipe.yield_grams, REFERENCE_BASIS),
        per_100g: per_100(&composition.nutrition, recipe.yield_grams),
    }
}

/// Resolve both recipes and report `b - a` on a per-100 g basis
pub fn compare_recipes<M, R>(a: &Recipe, b: &Recipe, materials: &M, recipes: &R) -> RecipeComparison
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    let a = summarize(a, materials, recipes);
    let b = summarize(b, materials, recipes);

    let nutrients = Nutrient::ALL
        .into_iter()
        .map(|nutrient| NutrientDelta {
            nutrient,
            unit: nutrient.unit(),
            delta: Delta::new(a.per_100g.get(nutrient), b.per_100g.get(nutrient)),
        })
        .collect();

    RecipeComparison {
        total_cost: Delta::new(a.total_cost, b.total_cost),
        cost_per_100g: Delta::new(a.cost_per_100g, b.cost_per_100g),
        nutrients,
        a,
        b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IngredientLine, Material, MaterialId};
    use crate::nutrition::{Catalog, MeasureUnit};

    #[test]
    fn test_compare_two_breads() {
        let flour = Material::new(
            MaterialId(1),
            "Farinha",
            MeasureUnit::Grams,
            Nutrition {
                calories: 360.0,
                sodium: 1.0,
                ..Nutrition::zero()
            },
            0.5,
        );
        let salt = Material::new(
            MaterialId(2),
            "Sal",
            MeasureUnit::Grams,
            Nutrition {
                sodium: 38758.0,
                ..Nutrition::zero()
            },
            0.2,
        );
        let plain = Recipe::new(RecipeId(1), "Pao simples", 500.0, vec![IngredientLine::material(MaterialId(1), 500.0)]);
        let salted = Recipe::new(
            RecipeId(2),
            "Pao salgado",
            500.0,
            vec![
                IngredientLine::material(MaterialId(1), 500.0),
                IngredientLine::material(MaterialId(2), 10.0),
            ],
        );
        let catalog = Catalog::new(vec![flour, salt], vec![plain.clone(), salted.clone()]);

        let cmp = compare_recipes(&plain, &salted, &catalog, &catalog);

        assert_eq!(cmp.a.name, "Pao simples");
        assert_eq!(cmp.total_cost.trend, Trend::Higher);
        assert!((cmp.total_cost.diff - 0.02).abs() < 1e-9);

        let energy = &cmp.nutrients[Nutrient::Calories.index()];
        assert_eq!(energy.delta.trend, Trend::Equal);

        let sodium = &cmp.nutrients[Nutrient::Sodium.index()];
        assert_eq!(sodium.delta.trend, Trend::Higher);
        // 3875.8 mg of salt spread over 500 g
        assert!((sodium.delta.diff - 775.16).abs() < 1e-6);
    }

    #[test]
    fn test_reverse_order_flips_trend() {
        assert_eq!(Delta::new(2.0, 1.0).trend, Trend::Lower);
        assert_eq!(Delta::new(1.0, 2.0).trend, Trend::Higher);
        assert_eq!(Delta::new(1.5, 1.5).trend, Trend::Equal);
    }
}
