//! Front-of-pack warnings (IN 75/2020, Art. 18)
//!
//! Thresholds are absolute cutoffs per 100 g of product and are checked against
//! the unrounded per-100 projection, never against label figures.

use serde::Serialize;

use crate::models::{Nutrient, Nutrition};

/// A mandatory "high in" magnifier badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FopWarning {
    HighAddedSugar,
    HighSaturatedFat,
    HighSodium,
}

impl FopWarning {
    /// Evaluation order
    pub const ALL: [FopWarning; 3] = [
        FopWarning::HighAddedSugar,
        FopWarning::HighSaturatedFat,
        FopWarning::HighSodium,
    ];

    pub fn nutrient(&self) -> Nutrient {
        match self {
            FopWarning::HighAddedSugar => Nutrient::AddedSugars,
            FopWarning::HighSaturatedFat => Nutrient::SaturatedFat,
            FopWarning::HighSodium => Nutrient::Sodium,
        }
    }

    /// Inclusive cutoff per 100 g (g, or mg for sodium)
    pub fn threshold(&self) -> f64 {
        match self {
            FopWarning::HighAddedSugar => 15.0,
            FopWarning::HighSaturatedFat => 6.0,
            FopWarning::HighSodium => 600.0,
        }
    }

    /// Badge text
    pub fn label(&self) -> &'static str {
        match self {
            FopWarning::HighAddedSugar => "ALTO EM ACUCAR ADICIONADO",
            FopWarning::HighSaturatedFat => "ALTO EM GORDURA SATURADA",
            FopWarning::HighSodium => "ALTO EM SODIO",
        }
    }
}

/// A triggered warning with the value that triggered it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FopResult {
    pub warning: FopWarning,
    pub label: &'static str,
    pub value_per_100g: f64,
    pub threshold: f64,
}

/// Warnings triggered by an unrounded per-100 g projection, in badge order
pub fn evaluate_warnings(per100: &Nutrition) -> Vec<FopResult> {
    FopWarning::ALL
        .into_iter()
        .filter_map(|warning| {
            let value = per100.get(warning.nutrient());
            (value >= warning.threshold()).then(|| FopResult {
                warning,
                label: warning.label(),
                value_per_100g: value,
                threshold: warning.threshold(),
            })
        })
        .collect()
}
