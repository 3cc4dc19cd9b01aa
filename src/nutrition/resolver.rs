//! Recursive composition resolution
//!
//! Sums the scaled contribution of every ingredient line of a recipe, descending
//! into sub-recipes. The recipe graph is user-edited and may contain cycles or
//! dangling references; both contribute zero instead of failing.

use std::collections::HashSet;

use serde::Serialize;

use super::catalog::{MaterialLookup, RecipeLookup};
use super::units::{material_factor, recipe_factor};
use crate::models::{IngredientLine, IngredientSource, Nutrition, Recipe, RecipeId};

/// Aggregate nutrition and cost for a recipe's full yield
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Composition {
    pub nutrition: Nutrition,
    pub cost: f64,
}

impl Composition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn scale(&self, factor: f64) -> Self {
        Self {
            nutrition: self.nutrition.scale(factor),
            cost: self.cost * factor,
        }
    }
}

impl std::ops::Add for Composition {
    type Output = Composition;

    fn add(self, other: Composition) -> Composition {
        Composition {
            nutrition: self.nutrition + other.nutrition,
            cost: self.cost + other.cost,
        }
    }
}

impl std::iter::Sum for Composition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Composition::zero(), |acc, c| acc + c)
    }
}

/// Resolve the aggregate composition of `recipe`
///
/// The recipe's own id starts on the path, so a line that loops back to it is
/// cut off. Each sub-recipe branch receives its own copy of the path: only
/// ancestors suppress a reference, never siblings.
pub fn resolve_composition<M, R>(recipe: &Recipe, materials: &M, recipes: &R) -> Composition
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    let mut path = HashSet::new();
    path.insert(recipe.id);
    resolve_lines(recipe, materials, recipes, &path)
}

/// Aggregate nutrition only
pub fn resolve_nutrition<M, R>(recipe: &Recipe, materials: &M, recipes: &R) -> Nutrition
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    resolve_composition(recipe, materials, recipes).nutrition
}

/// Aggregate cost only
pub fn resolve_cost<M, R>(recipe: &Recipe, materials: &M, recipes: &R) -> f64
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    resolve_composition(recipe, materials, recipes).cost
}

fn resolve_lines<M, R>(
    recipe: &Recipe,
    materials: &M,
    recipes: &R,
    path: &HashSet<RecipeId>,
) -> Composition
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    recipe
        .ingredients
        .iter()
        .map(|line| resolve_line(recipe.id, line, materials, recipes, path))
        .sum()
}

fn resolve_line<M, R>(
    parent: RecipeId,
    line: &IngredientLine,
    materials: &M,
    recipes: &R,
    path: &HashSet<RecipeId>,
) -> Composition
where
    M: MaterialLookup + ?Sized,
    R: RecipeLookup + ?Sized,
{
    match line.source {
        IngredientSource::Material(id) => match materials.material(id) {
            Some(material) => {
                let factor = material_factor(line.quantity);
                Composition {
                    nutrition: material.nutrition.scale(factor),
                    cost: material.price_per_100 * factor,
                }
            }
            None => {
                tracing::debug!(recipe = %parent, material = %id, "Missing material reference, contributing zero");
                Composition::zero()
            }
        },
        IngredientSource::Recipe(id) => {
            if path.contains(&id) {
                tracing::debug!(recipe = %parent, sub_recipe = %id, "Cyclic recipe reference, contributing zero");
                return Composition::zero();
            }

            let Some(sub) = recipes.recipe(id) else {
                tracing::debug!(recipe = %parent, sub_recipe = %id, "Missing recipe reference, contributing zero");
                return Composition::zero();
            };

            let mut branch = path.clone();
            branch.insert(id);

            let aggregate = resolve_lines(&sub, materials, recipes, &branch);
            aggregate.scale(recipe_factor(line.quantity, sub.yield_grams))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Material, MaterialId};
    use crate::nutrition::{Catalog, MeasureUnit};
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn kcal(id: i64, unit: MeasureUnit, calories: f64) -> Material {
        Material::new(
            MaterialId(id),
            format!("m{}", id),
            unit,
            Nutrition {
                calories,
                ..Nutrition::zero()
            },
            0.0,
        )
    }

    fn priced(id: i64, nutrition: Nutrition, price: f64) -> Material {
        Material::new(MaterialId(id), format!("m{}", id), MeasureUnit::Grams, nutrition, price)
    }

    #[test]
    fn test_grams_material_line() {
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Grams, 10.0)], Vec::new());
        let recipe = Recipe::new(RecipeId(1), "r", 100.0, vec![IngredientLine::material(MaterialId(1), 100.0)]);
        let n = resolve_nutrition(&recipe, &catalog, &catalog);
        assert!(approx(n.calories, 10.0));
    }

    #[test]
    fn test_milliliter_material_line() {
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Milliliters, 64.0)], Vec::new());
        let recipe = Recipe::new(RecipeId(1), "r", 200.0, vec![IngredientLine::material(MaterialId(1), 200.0)]);
        assert!(approx(resolve_nutrition(&recipe, &catalog, &catalog).calories, 128.0));
    }

    #[test]
    fn test_unit_count_material_line() {
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Units, 155.0)], Vec::new());
        let recipe = Recipe::new(RecipeId(1), "r", 100.0, vec![IngredientLine::material(MaterialId(1), 2.0)]);
        assert!(approx(resolve_nutrition(&recipe, &catalog, &catalog).calories, 3.1));
    }

    #[test]
    fn test_sub_recipe_scaled_by_yield() {
        let sub = Recipe::new(RecipeId(2), "sub", 100.0, vec![IngredientLine::material(MaterialId(1), 100.0)]);
        let outer = Recipe::new(RecipeId(1), "outer", 50.0, vec![IngredientLine::recipe(RecipeId(2), 50.0)]);
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Grams, 10.0)], vec![sub, outer.clone()]);

        assert!(approx(resolve_nutrition(&outer, &catalog, &catalog).calories, 5.0));
    }

    #[test]
    fn test_zero_yield_sub_recipe_contributes_nothing() {
        let sub = Recipe::new(RecipeId(2), "sub", 0.0, vec![IngredientLine::material(MaterialId(1), 100.0)]);
        let outer = Recipe::new(RecipeId(1), "outer", 50.0, vec![IngredientLine::recipe(RecipeId(2), 50.0)]);
        let catalog = Catalog::new(vec![priced(1, Nutrition { calories: 10.0, ..Nutrition::zero() }, 2.0)], vec![sub]);

        let c = resolve_composition(&outer, &catalog, &catalog);
        assert!(c.nutrition.is_zero());
        assert_eq!(c.cost, 0.0);
    }

    #[test]
    fn test_cost_accumulates_through_sub_recipes() {
        let flour = priced(1, Nutrition::zero(), 0.5);
        let sugar = priced(2, Nutrition::zero(), 0.6);
        let dough = Recipe::new(RecipeId(10), "massa", 400.0, vec![IngredientLine::material(MaterialId(1), 400.0)]);
        let cake = Recipe::new(
            RecipeId(11),
            "bolo",
            500.0,
            vec![
                IngredientLine::recipe(RecipeId(10), 200.0),
                IngredientLine::material(MaterialId(2), 100.0),
            ],
        );
        let catalog = Catalog::new(vec![flour, sugar], vec![dough, cake.clone()]);

        // dough costs 2.0 for 400 g, half of it is used
        assert!(approx(resolve_cost(&cake, &catalog, &catalog), 1.0 + 0.6));
    }

    #[test]
    fn test_missing_references_contribute_zero() {
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Grams, 10.0)], Vec::new());
        let recipe = Recipe::new(
            RecipeId(1),
            "r",
            100.0,
            vec![
                IngredientLine::material(MaterialId(1), 100.0),
                IngredientLine::material(MaterialId(99), 100.0),
                IngredientLine::recipe(RecipeId(98), 100.0),
            ],
        );
        let c = resolve_composition(&recipe, &catalog, &catalog);
        assert!(approx(c.nutrition.calories, 10.0));
        assert_eq!(c.cost, 0.0);
    }

    #[test]
    fn test_two_recipe_cycle_terminates() {
        let a = Recipe::new(
            RecipeId(1),
            "a",
            100.0,
            vec![
                IngredientLine::material(MaterialId(1), 100.0),
                IngredientLine::recipe(RecipeId(2), 100.0),
            ],
        );
        let b = Recipe::new(
            RecipeId(2),
            "b",
            100.0,
            vec![
                IngredientLine::material(MaterialId(2), 100.0),
                IngredientLine::recipe(RecipeId(1), 100.0),
            ],
        );
        let catalog = Catalog::new(
            vec![kcal(1, MeasureUnit::Grams, 10.0), kcal(2, MeasureUnit::Grams, 20.0)],
            vec![a.clone(), b],
        );

        // A's own material plus B's material; B's line back to A is cut off
        let n = resolve_nutrition(&a, &catalog, &catalog);
        assert!(approx(n.calories, 30.0));
    }

    #[test]
    fn test_self_reference_is_cut_off() {
        let a = Recipe::new(
            RecipeId(1),
            "a",
            100.0,
            vec![
                IngredientLine::material(MaterialId(1), 100.0),
                IngredientLine::recipe(RecipeId(1), 50.0),
            ],
        );
        let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Grams, 10.0)], vec![a.clone()]);
        assert!(approx(resolve_nutrition(&a, &catalog, &catalog).calories, 10.0));
    }

    #[test]
    fn test_siblings_do_not_suppress_each_other() {
        // diamond: top -> left -> base, top -> right -> base
        let base = Recipe::new(RecipeId(4), "base", 100.0, vec![IngredientLine::material(MaterialId(1), 100.0)]);
        let left = Recipe::new(RecipeId(2), "left", 100.0, vec![IngredientLine::recipe(RecipeId(4), 100.0)]);
        let right = Recipe::new(RecipeId(3), "right", 100.0, vec![IngredientLine::recipe(RecipeId(4), 100.0)]);
        let top = Recipe::new(
            RecipeId(1),
            "top",
            200.0,
            vec![
                IngredientLine::recipe(RecipeId(2), 100.0),
                IngredientLine::recipe(RecipeId(3), 100.0),
                IngredientLine::recipe(RecipeId(4), 100.0),
            ],
        );
        let catalog = Catalog::new(
            vec![kcal(1, MeasureUnit::Grams, 10.0)],
            vec![base, left, right, top.clone()],
        );

        assert!(approx(resolve_nutrition(&top, &catalog, &catalog).calories, 30.0));
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let sub = Recipe::new(RecipeId(2), "sub", 300.0, vec![IngredientLine::material(MaterialId(1), 123.4)]);
        let outer = Recipe::new(
            RecipeId(1),
            "outer",
            700.0,
            vec![
                IngredientLine::recipe(RecipeId(2), 77.7),
                IngredientLine::material(MaterialId(1), 3.3),
            ],
        );
        let catalog = Catalog::new(
            vec![priced(1, Nutrition { calories: 333.3, sodium: 41.7, ..Nutrition::zero() }, 1.9)],
            vec![sub, outer.clone()],
        );

        let first = resolve_composition(&outer, &catalog, &catalog);
        let second = resolve_composition(&outer, &catalog, &catalog);
        assert_eq!(first.nutrition.calories.to_bits(), second.nutrition.calories.to_bits());
        assert_eq!(first.cost.to_bits(), second.cost.to_bits());
        assert_eq!(first, second);
    }

    #[test]
    fn test_works_over_plain_maps() {
        use std::collections::HashMap;

        let materials: HashMap<MaterialId, Material> =
            [(MaterialId(1), kcal(1, MeasureUnit::Grams, 10.0))].into_iter().collect();
        let recipes: HashMap<RecipeId, Recipe> = HashMap::new();
        let recipe = Recipe::new(RecipeId(1), "r", 100.0, vec![IngredientLine::material(MaterialId(1), 50.0)]);

        assert!(approx(resolve_nutrition(&recipe, &materials, &recipes).calories, 5.0));
    }

    proptest! {
        #[test]
        fn prop_material_line_is_value_times_quantity_over_100(
            values in prop::collection::vec(0.0f64..1000.0, 10),
            quantity in 0.0f64..5000.0,
        ) {
            let nutrition = Nutrition::from_fn(|n| values[n.index()]);
            let catalog = Catalog::new(vec![priced(1, nutrition, 0.0)], Vec::new());
            let recipe = Recipe::new(RecipeId(1), "r", 100.0, vec![IngredientLine::material(MaterialId(1), quantity)]);

            let resolved = resolve_nutrition(&recipe, &catalog, &catalog);
            for n in crate::models::Nutrient::ALL {
                let expected = values[n.index()] * quantity / 100.0;
                prop_assert!((resolved.get(n) - expected).abs() <= 1e-9 * expected.max(1.0));
            }
        }

        #[test]
        fn prop_sub_recipe_line_is_aggregate_times_quantity_over_yield(
            calories in 0.0f64..1000.0,
            quantity in 0.0f64..1000.0,
            yield_grams in 1.0f64..2000.0,
        ) {
            let sub = Recipe::new(RecipeId(2), "sub", yield_grams, vec![IngredientLine::material(MaterialId(1), 100.0)]);
            let outer = Recipe::new(RecipeId(1), "outer", 100.0, vec![IngredientLine::recipe(RecipeId(2), quantity)]);
            let catalog = Catalog::new(vec![kcal(1, MeasureUnit::Grams, calories)], vec![sub]);

            let resolved = resolve_nutrition(&outer, &catalog, &catalog).calories;
            let expected = calories * quantity / yield_grams;
            prop_assert!((resolved - expected).abs() <= 1e-9 * expected.max(1.0));
        }
    }
}
