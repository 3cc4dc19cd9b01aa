//! Unit types and normalization
//!
//! Materials declare nutrition and price per 100 of their own unit; sub-recipes
//! are measured in grams against their total yield. The declared unit is opaque
//! to the calculation: only the magnitude of the quantity matters.

use serde::{Deserialize, Serialize};

/// Basis every material composition is expressed against
pub const REFERENCE_BASIS: f64 = 100.0;

/// Declared physical unit of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MeasureUnit {
    /// Mass in grams
    #[default]
    #[serde(rename = "g")]
    Grams,
    /// Volume in milliliters
    #[serde(rename = "ml")]
    Milliliters,
    /// Discrete count (eggs, slices)
    #[serde(rename = "un")]
    Units,
}

impl MeasureUnit {
    /// Get the canonical unit string for this type
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            MeasureUnit::Grams => "g",
            MeasureUnit::Milliliters => "ml",
            MeasureUnit::Units => "un",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" | "grama" | "gramas" => Some(MeasureUnit::Grams),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(MeasureUnit::Milliliters)
            }
            "un" | "unit" | "units" | "each" | "unidade" | "unidades" => Some(MeasureUnit::Units),
            _ => None,
        }
    }

    /// Label of the per-100 basis, e.g. "100ml"
    pub fn basis_label(&self) -> String {
        format!("{}{}", REFERENCE_BASIS, self.canonical_unit())
    }
}

impl std::fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_unit())
    }
}

/// Dimensionless factor `quantity / basis`
///
/// A zero basis contributes nothing instead of dividing by zero.
pub fn scale_factor(quantity: f64, basis: f64) -> f64 {
    if basis == 0.0 {
        return 0.0;
    }
    quantity / basis
}

/// Factor applied to a material's per-100 composition and price
pub fn material_factor(quantity: f64) -> f64 {
    scale_factor(quantity, REFERENCE_BASIS)
}

/// Factor applied to a sub-recipe's whole-yield aggregate
pub fn recipe_factor(quantity: f64, yield_grams: f64) -> f64 {
    scale_factor(quantity, yield_grams)
}
