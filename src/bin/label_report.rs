//! Print the nutrition label and cost summary of a stored recipe
//! Usage: cargo run --bin label_report -- <recipe_id>

use chrono::Local;

use nutricalc::config;
use nutricalc::db::Database;
use nutricalc::models::{load_catalog, RecipeId};
use nutricalc::nutrition::{project_cost, resolve_composition, NutritionLabel, REFERENCE_BASIS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let recipe_id: i64 = std::env::args()
        .nth(1)
        .ok_or("Usage: label_report <recipe_id>")?
        .parse()?;
    let recipe_id = RecipeId(recipe_id);

    let db_path = config::database_path();
    println!("Database path: {}", db_path.display());

    let database = Database::open(&db_path)?;
    let catalog = database.with_conn(load_catalog)?;

    let recipe = catalog
        .get_recipe(recipe_id)
        .ok_or_else(|| format!("Recipe not found with id: {}", recipe_id))?;

    let composition = resolve_composition(recipe, &catalog, &catalog);
    let label = NutritionLabel::build(
        &composition.nutrition,
        recipe.yield_grams,
        recipe.serving_size,
        recipe.serving_name.clone(),
    );

    println!();
    println!("{} (#{})", recipe.name, recipe.id);
    println!("Gerado em {}", Local::now().format("%d/%m/%Y %H:%M"));
    println!();
    print!("{}", label);
    println!();
    println!("Custo total:     R$ {:.2}", composition.cost);
    println!(
        "Custo por 100 g: R$ {:.2}",
        project_cost(composition.cost, recipe.yield_grams, REFERENCE_BASIS)
    );
    if recipe.serving_size > 0.0 {
        println!(
            "Custo por porcao: R$ {:.2}",
            project_cost(composition.cost, recipe.yield_grams, recipe.serving_size)
        );
    }

    Ok(())
}
