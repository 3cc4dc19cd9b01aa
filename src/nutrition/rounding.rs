//! ANVISA IN 75/2020 label rounding
//!
//! Each nutrient is rounded on its own, from its own unrounded value. Per-100
//! and per-serving figures are rounded separately; a rounded per-100 value is
//! never rescaled into a serving.
//!
//! | class       | nutrients                                  | rule                                          |
//! |-------------|--------------------------------------------|-----------------------------------------------|
//! | energy      | calories                                   | `<5` → 0, `5..=50` → 1, `>50` → 5             |
//! | macro grams | carbs, sugars, protein, total fat, fiber   | `<0.5` → 0, else 0.1                          |
//! | minor fat   | saturated fat, trans fat                   | `<0.1` → 0, else 0.1                          |
//! | sodium (mg) | sodium                                     | `<5` → 0, `5..=140` → 1, `>140` → 5           |

use serde::Serialize;

use crate::models::{Nutrient, Nutrition};

/// Round to the nearest multiple of `step`, halves away from zero
pub fn round_to_nearest(value: f64, step: f64) -> f64 {
    if step < 1.0 {
        // Divide by the inverse so 12.34 at 0.1 gives 12.3, not 12.300000000000001
        let inverse = (1.0 / step).round();
        return (value * inverse).round() / inverse;
    }
    (value / step).round() * step
}

/// Rounding class of a nutrient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RoundingRule {
    Energy,
    MacroGrams,
    MinorFat,
    Sodium,
}

impl RoundingRule {
    fn for_nutrient(nutrient: Nutrient) -> Self {
        match nutrient {
            Nutrient::Calories => RoundingRule::Energy,
            Nutrient::SaturatedFat | Nutrient::TransFat => RoundingRule::MinorFat,
            Nutrient::Sodium => RoundingRule::Sodium,
            Nutrient::Carbs
            | Nutrient::TotalSugars
            | Nutrient::AddedSugars
            | Nutrient::Protein
            | Nutrient::TotalFat
            | Nutrient::Fiber => RoundingRule::MacroGrams,
        }
    }

    fn apply(self, value: f64) -> f64 {
        match self {
            RoundingRule::Energy => stepped(value, 5.0, 50.0),
            RoundingRule::Sodium => stepped(value, 5.0, 140.0),
            RoundingRule::MacroGrams => {
                if value < 0.5 {
                    0.0
                } else {
                    round_to_nearest(value, 0.1)
                }
            }
            RoundingRule::MinorFat => {
                if value < 0.1 {
                    0.0
                } else {
                    round_to_nearest(value, 0.1)
                }
            }
        }
    }
}

/// Zero below `floor`, whole units up to `coarse_above`, multiples of 5 beyond
fn stepped(value: f64, floor: f64, coarse_above: f64) -> f64 {
    if value < floor {
        0.0
    } else if value <= coarse_above {
        value.round()
    } else {
        round_to_nearest(value, 5.0)
    }
}

/// Round a single nutrient value for the label
pub fn round_value(nutrient: Nutrient, value: f64) -> f64 {
    RoundingRule::for_nutrient(nutrient).apply(value)
}

/// Round every field of a projection for the label
pub fn round_for_label(vector: &Nutrition) -> Nutrition {
    vector.map(round_value)
}

/// Percentage of the daily reference intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyValue {
    Percent(u32),
    /// No reference intake is defined for this nutrient
    NotEstablished,
}

impl std::fmt::Display for DailyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DailyValue::Percent(p) => write!(f, "{}%", p),
            DailyValue::NotEstablished => f.write_str("**"),
        }
    }
}

/// Reference daily intake (RDC 429/2020, Annex II)
pub fn reference_daily_value(nutrient: Nutrient) -> Option<f64> {
    match nutrient {
        Nutrient::Calories => Some(2000.0),
        Nutrient::Carbs => Some(300.0),
        Nutrient::AddedSugars => Some(50.0),
        Nutrient::Protein => Some(75.0),
        Nutrient::TotalFat => Some(65.0),
        Nutrient::SaturatedFat => Some(22.0),
        Nutrient::Fiber => Some(25.0),
        Nutrient::Sodium => Some(2000.0),
        Nutrient::TotalSugars | Nutrient::TransFat => None,
    }
}

/// %DV of an already rounded per-serving value
pub fn daily_value(nutrient: Nutrient, rounded_serving: f64) -> DailyValue {
    match reference_daily_value(nutrient) {
        Some(reference) => DailyValue::Percent((rounded_serving / reference * 100.0).round() as u32),
        None => DailyValue::NotEstablished,
    }
}
