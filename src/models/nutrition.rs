//! Shared nutrition data structure
//!
//! Used for material composition, recipe aggregates, projections and label figures.

use serde::{Deserialize, Serialize};

/// One of the ten nutrients printed on a nutrition label, in label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Calories,
    Carbs,
    TotalSugars,
    AddedSugars,
    Protein,
    TotalFat,
    SaturatedFat,
    TransFat,
    Fiber,
    Sodium,
}

impl Nutrient {
    /// All nutrients in RDC 429/2020 table order
    pub const ALL: [Nutrient; 10] = [
        Nutrient::Calories,
        Nutrient::Carbs,
        Nutrient::TotalSugars,
        Nutrient::AddedSugars,
        Nutrient::Protein,
        Nutrient::TotalFat,
        Nutrient::SaturatedFat,
        Nutrient::TransFat,
        Nutrient::Fiber,
        Nutrient::Sodium,
    ];

    /// Position in [`Nutrient::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Snake-case key, shared by JSON output and storage columns
    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Carbs => "carbs",
            Nutrient::TotalSugars => "total_sugars",
            Nutrient::AddedSugars => "added_sugars",
            Nutrient::Protein => "protein",
            Nutrient::TotalFat => "total_fat",
            Nutrient::SaturatedFat => "saturated_fat",
            Nutrient::TransFat => "trans_fat",
            Nutrient::Fiber => "fiber",
            Nutrient::Sodium => "sodium",
        }
    }

    /// Label text as printed on the table
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::Calories => "Valor energetico",
            Nutrient::Carbs => "Carboidratos",
            Nutrient::TotalSugars => "Acucares totais",
            Nutrient::AddedSugars => "Acucares adicionados",
            Nutrient::Protein => "Proteinas",
            Nutrient::TotalFat => "Gorduras totais",
            Nutrient::SaturatedFat => "Gorduras saturadas",
            Nutrient::TransFat => "Gorduras trans",
            Nutrient::Fiber => "Fibra alimentar",
            Nutrient::Sodium => "Sodio",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Sodium => "mg",
            _ => "g",
        }
    }

    /// Sub-components are indented under their parent row
    pub fn is_indented(&self) -> bool {
        matches!(
            self,
            Nutrient::TotalSugars
                | Nutrient::AddedSugars
                | Nutrient::SaturatedFat
                | Nutrient::TransFat
        )
    }
}

/// Nutritional composition
///
/// Energy in kcal, sodium in milligrams, everything else in grams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub carbs: f64,
    pub total_sugars: f64,
    pub added_sugars: f64,
    pub protein: f64,
    pub total_fat: f64,
    pub saturated_fat: f64,
    pub trans_fat: f64,
    pub fiber: f64,
    pub sodium: f64,
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build a vector by computing each field independently
    pub fn from_fn<F: FnMut(Nutrient) -> f64>(mut f: F) -> Self {
        Self {
            calories: f(Nutrient::Calories),
            carbs: f(Nutrient::Carbs),
            total_sugars: f(Nutrient::TotalSugars),
            added_sugars: f(Nutrient::AddedSugars),
            protein: f(Nutrient::Protein),
            total_fat: f(Nutrient::TotalFat),
            saturated_fat: f(Nutrient::SaturatedFat),
            trans_fat: f(Nutrient::TransFat),
            fiber: f(Nutrient::Fiber),
            sodium: f(Nutrient::Sodium),
        }
    }

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbs => self.carbs,
            Nutrient::TotalSugars => self.total_sugars,
            Nutrient::AddedSugars => self.added_sugars,
            Nutrient::Protein => self.protein,
            Nutrient::TotalFat => self.total_fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::TransFat => self.trans_fat,
            Nutrient::Fiber => self.fiber,
            Nutrient::Sodium => self.sodium,
        }
    }

    /// Apply `f` to every field, passing the nutrient it belongs to
    pub fn map<F: FnMut(Nutrient, f64) -> f64>(&self, mut f: F) -> Self {
        Self::from_fn(|n| f(n, self.get(n)))
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        self.map(|_, v| v * multiplier)
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        self.map(|n, v| v + other.get(n))
    }

    pub fn is_zero(&self) -> bool {
        Nutrient::ALL.iter().all(|&n| self.get(n) == 0.0)
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Nutrition {
        Nutrition {
            calories: 200.0,
            carbs: 20.0,
            total_sugars: 10.0,
            added_sugars: 5.0,
            protein: 10.0,
            total_fat: 8.0,
            saturated_fat: 2.0,
            trans_fat: 0.0,
            fiber: 3.0,
            sodium: 0.5,
        }
    }

    #[test]
    fn test_get_matches_fields_in_label_order() {
        let n = sample();
        let values: Vec<f64> = Nutrient::ALL.iter().map(|&k| n.get(k)).collect();
        assert_eq!(values, vec![200.0, 20.0, 10.0, 5.0, 10.0, 8.0, 2.0, 0.0, 3.0, 0.5]);
    }

    #[test]
    fn test_sum_of_empty_iterator_is_zero() {
        let total: Nutrition = Vec::<Nutrition>::new().into_iter().sum();
        assert!(total.is_zero());
    }

    #[test]
    fn test_index_and_key_follow_label_order() {
        for (i, n) in Nutrient::ALL.iter().enumerate() {
            assert_eq!(n.index(), i);
            let json = serde_json::to_value(n).unwrap();
            assert_eq!(json, n.key());
        }
    }

    #[test]
    fn test_units() {
        assert_eq!(Nutrient::Calories.unit(), "kcal");
        assert_eq!(Nutrient::Sodium.unit(), "mg");
        assert_eq!(Nutrient::Fiber.unit(), "g");
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["added_sugars"], 5.0);
        assert_eq!(json["sodium"], 0.5);
    }

    proptest! {
        #[test]
        fn prop_scale_is_field_independent(
            values in prop::collection::vec(0.0f64..10_000.0, 10),
            factor in 0.0f64..50.0,
        ) {
            let n = Nutrition::from_fn(|k| values[k.index()]);
            let scaled = n.scale(factor);
            for k in Nutrient::ALL {
                prop_assert_eq!(scaled.get(k), values[k.index()] * factor);
            }
        }

        #[test]
        fn prop_add_is_field_independent(
            a in prop::collection::vec(0.0f64..10_000.0, 10),
            b in prop::collection::vec(0.0f64..10_000.0, 10),
        ) {
            let na = Nutrition::from_fn(|k| a[k.index()]);
            let nb = Nutrition::from_fn(|k| b[k.index()]);
            let sum = na + nb;
            for k in Nutrient::ALL {
                prop_assert_eq!(sum.get(k), a[k.index()] + b[k.index()]);
            }
        }
    }
}
