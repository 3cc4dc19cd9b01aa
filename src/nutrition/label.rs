//! Printable nutrition label assembly
//!
//! Builds the RDC 429/2020 table for a recipe from its whole-yield aggregate:
//! per-100 g and per-serving columns, each rounded from its own unrounded
//! projection, %DV from the rounded serving value, and the front-of-pack badges.

use std::fmt;

use serde::Serialize;

use super::projector::{per_100, project_to_basis, servings_per_package};
use super::rounding::{daily_value, round_for_label, DailyValue};
use super::warnings::{evaluate_warnings, FopResult};
use crate::models::{Nutrient, Nutrition};

/// One line of the label table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRow {
    pub nutrient: Nutrient,
    pub label: &'static str,
    pub unit: &'static str,
    pub indented: bool,
    pub per_100g: f64,
    pub per_serving: f64,
    pub daily_value: DailyValue,
}

/// Complete label for one recipe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutritionLabel {
    pub yield_grams: f64,
    pub serving_size: f64,
    pub serving_name: String,
    pub servings_per_package: Option<u32>,
    pub rows: Vec<LabelRow>,
    pub warnings: Vec<FopResult>,
}

impl NutritionLabel {
    /// Assemble the label from an aggregate covering `yield_grams` of product
    pub fn build(
        aggregate: &Nutrition,
        yield_grams: f64,
        serving_size: f64,
        serving_name: impl Into<String>,
    ) -> Self {
        let raw_100g = per_100(aggregate, yield_grams);
        let raw_serving = project_to_basis(aggregate, yield_grams, serving_size);

        let rounded_100g = round_for_label(&raw_100g);
        let rounded_serving = round_for_label(&raw_serving);

        let rows = Nutrient::ALL
            .into_iter()
            .map(|nutrient| LabelRow {
                nutrient,
                label: nutrient.label(),
                unit: nutrient.unit(),
                indented: nutrient.is_indented(),
                per_100g: rounded_100g.get(nutrient),
                per_serving: rounded_serving.get(nutrient),
                daily_value: daily_value(nutrient, rounded_serving.get(nutrient)),
            })
            .collect();

        Self {
            yield_grams,
            serving_size,
            serving_name: serving_name.into(),
            servings_per_package: servings_per_package(yield_grams, serving_size),
            rows,
            warnings: evaluate_warnings(&raw_100g),
        }
    }

    pub fn row(&self, nutrient: Nutrient) -> Option<&LabelRow> {
        self.rows.iter().find(|r| r.nutrient == nutrient)
    }

    /// Plain-text rendering of the label
    pub fn render_text(&self) -> String {
        self.to_string()
    }

    fn serving_header(&self) -> String {
        if self.serving_size > 0.0 {
            format!("{}g", self.serving_size)
        } else {
            "Porcao".to_string()
        }
    }
}

/// Label figure: integers for kcal and mg, one decimal for grams
pub fn format_value(value: f64, unit: &str) -> String {
    match unit {
        "mg" | "kcal" => format!("{}", value.round() as i64),
        _ => format!("{:.1}", value),
    }
}

const RULE: &str = "==================================================";

impl fmt::Display for NutritionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for warning in &self.warnings {
            writeln!(f, "[{}]", warning.label)?;
        }
        if !self.warnings.is_empty() {
            writeln!(f)?;
        }

        writeln!(f, "INFORMACAO NUTRICIONAL")?;
        if let Some(servings) = self.servings_per_package {
            writeln!(f, "Porcoes por embalagem: {}", servings)?;
        }
        if self.serving_size > 0.0 {
            if self.serving_name.is_empty() {
                writeln!(f, "Porcao: {}g", self.serving_size)?;
            } else {
                writeln!(f, "Porcao: {}g ({})", self.serving_size, self.serving_name)?;
            }
        }

        writeln!(f, "{}", RULE)?;
        writeln!(f, "{:<24}{:>10}{:>10}{:>6}", "", "100g", self.serving_header(), "%VD*")?;

        for row in &self.rows {
            let name = if row.indented {
                format!("  {}", row.label)
            } else {
                row.label.to_string()
            };
            writeln!(
                f,
                "{:<24}{:>10}{:>10}{:>6}",
                name,
                format!("{} {}", format_value(row.per_100g, row.unit), row.unit),
                format!("{} {}", format_value(row.per_serving, row.unit), row.unit),
                row.daily_value.to_string(),
            )?;
        }

        writeln!(f, "{}", RULE)?;
        writeln!(f, "*Percentual de valores diarios fornecidos pela porcao.")?;
        writeln!(f, "**VD nao estabelecido.")
    }
}
