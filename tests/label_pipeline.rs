//! End-to-end: store materials and nested recipes, then read labels and costs back.

use nutricalc::db::Database;
use nutricalc::models::{
    IngredientLine, MaterialCreate, MaterialId, Nutrient, Nutrition, RecipeCreate, RecipeId,
    RecipeIngredientCreate,
};
use nutricalc::nutrition::{round_value, FopWarning};
use nutricalc::tools::{labels, materials, recipes};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

struct Bakery {
    _dir: tempfile::TempDir,
    db: Database,
    sugar: MaterialId,
    dough: RecipeId,
    cake: RecipeId,
}

fn material(db: &Database, name: &str, nutrition: Nutrition, price: f64) -> MaterialId {
    materials::add_material(
        db,
        MaterialCreate {
            name: name.to_string(),
            nutrition,
            price_per_100: price,
            ..Default::default()
        },
    )
    .unwrap()
    .id
}

fn bakery() -> Bakery {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open(dir.path().join("bakery.db")).unwrap();

    let flour = material(
        &db,
        "Farinha",
        Nutrition { calories: 360.0, carbs: 75.0, protein: 10.0, ..Nutrition::zero() },
        0.5,
    );
    let sugar = material(
        &db,
        "Acucar",
        Nutrition {
            calories: 400.0,
            carbs: 100.0,
            total_sugars: 100.0,
            added_sugars: 100.0,
            ..Nutrition::zero()
        },
        0.4,
    );
    let butter = material(
        &db,
        "Manteiga",
        Nutrition {
            calories: 726.0,
            total_fat: 82.4,
            saturated_fat: 51.6,
            sodium: 579.0,
            ..Nutrition::zero()
        },
        5.0,
    );

    let dough = recipes::create_recipe(
        &db,
        RecipeCreate {
            name: "Massa base".to_string(),
            yield_grams: 500.0,
            ingredients: vec![
                IngredientLine::material(flour, 300.0),
                IngredientLine::material(sugar, 100.0),
                IngredientLine::material(butter, 100.0),
            ],
            ..Default::default()
        },
    )
    .unwrap()
    .id;

    let cake = recipes::create_recipe(
        &db,
        RecipeCreate {
            name: "Bolo".to_string(),
            yield_grams: 800.0,
            serving_size: 60.0,
            serving_name: "1 fatia".to_string(),
            ingredients: vec![
                IngredientLine::recipe(dough, 400.0),
                IngredientLine::material(sugar, 200.0),
            ],
            ..Default::default()
        },
    )
    .unwrap()
    .id;

    Bakery { _dir: dir, db, sugar, dough, cake }
}

#[test]
fn nested_recipe_label_and_cost() {
    let bakery = bakery();

    let label = labels::get_nutrition_label(&bakery.db, bakery.cake).unwrap().unwrap();
    // 0.8 * 2206 kcal of dough plus 800 kcal of sugar over 800 g
    assert!(approx(label.raw_per_100g.calories, 320.6));
    assert!(approx(label.raw_per_100g.added_sugars, 35.0));

    let calories = label.label.row(Nutrient::Calories).unwrap();
    assert_eq!(calories.per_100g, round_value(Nutrient::Calories, label.raw_per_100g.calories));

    let warnings: Vec<FopWarning> = label.label.warnings.iter().map(|w| w.warning).collect();
    assert_eq!(warnings, vec![FopWarning::HighAddedSugar]);
    assert_eq!(label.label.servings_per_package, Some(13));
    assert!(label.text.contains("ALTO EM ACUCAR ADICIONADO"));
    assert!(label.text.contains("1 fatia"));

    let cost = labels::get_recipe_cost(&bakery.db, bakery.cake).unwrap().unwrap();
    assert!(approx(cost.total_cost, 0.8 * 6.9 + 0.8));
    assert!(approx(cost.cost_per_100g, cost.total_cost / 8.0));
    assert!(approx(cost.cost_per_serving.unwrap(), cost.total_cost * 60.0 / 800.0));
}

#[test]
fn cycle_added_through_tools_still_labels() {
    let bakery = bakery();

    recipes::add_recipe_ingredient(
        &bakery.db,
        RecipeIngredientCreate {
            recipe_id: bakery.dough,
            line: IngredientLine::recipe(bakery.cake, 100.0),
        },
    )
    .unwrap();

    // The cake's view of the dough drops the loop back to the cake
    let cake = labels::get_nutrition_label(&bakery.db, bakery.cake).unwrap().unwrap();
    assert!(approx(cake.raw_per_100g.calories, 320.6));

    // The dough sees 100 g of cake whose own dough line is cut
    let dough = labels::get_nutrition_label(&bakery.db, bakery.dough).unwrap().unwrap();
    assert!(approx(dough.raw_per_100g.calories, (2206.0 + 100.0) / 5.0));
}

#[test]
fn deleted_material_leaves_recipes_computable() {
    let bakery = bakery();

    let deleted = materials::delete_material(&bakery.db, bakery.sugar).unwrap();
    assert_eq!(deleted.dangling_references, 2);

    let label = labels::get_nutrition_label(&bakery.db, bakery.cake).unwrap().unwrap();
    assert_eq!(label.raw_per_100g.added_sugars, 0.0);
    assert!(label.label.warnings.is_empty());

    let comparison = labels::compare_recipes(&bakery.db, bakery.dough, bakery.cake).unwrap();
    assert_eq!(comparison.a.id, bakery.dough);
    assert_eq!(comparison.b.id, bakery.cake);
}
