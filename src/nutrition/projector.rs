//! Per-100 and per-serving projections of whole-yield aggregates

use super::units::{scale_factor, REFERENCE_BASIS};
use crate::models::Nutrition;

/// Rescale a whole-yield aggregate to `target_basis` grams of product
///
/// A zero yield has no meaningful per-gram composition and projects to zero.
pub fn project_to_basis(aggregate: &Nutrition, total_yield: f64, target_basis: f64) -> Nutrition {
    if total_yield == 0.0 {
        return Nutrition::zero();
    }
    aggregate.scale(scale_factor(target_basis, total_yield))
}

/// Composition per 100 g of product
pub fn per_100(aggregate: &Nutrition, total_yield: f64) -> Nutrition {
    project_to_basis(aggregate, total_yield, REFERENCE_BASIS)
}

/// Same projection for a monetary amount
pub fn project_cost(cost: f64, total_yield: f64, target_basis: f64) -> f64 {
    cost * scale_factor(target_basis, total_yield)
}

/// Whole servings in one batch, when both sizes are known
pub fn servings_per_package(yield_grams: f64, serving_size: f64) -> Option<u32> {
    if yield_grams > 0.0 && serving_size > 0.0 {
        Some((yield_grams / serving_size).round() as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_yield_projects_to_zero() {
        let aggregate = Nutrition {
            calories: 900.0,
            sodium: 1200.0,
            ..Nutrition::zero()
        };
        assert!(project_to_basis(&aggregate, 0.0, 100.0).is_zero());
        assert!(per_100(&aggregate, 0.0).is_zero());
        assert_eq!(project_cost(12.0, 0.0, 100.0), 0.0);
    }

    #[test]
    fn test_per_100_and_serving() {
        let aggregate = Nutrition {
            calories: 2000.0,
            protein: 40.0,
            ..Nutrition::zero()
        };
        let per100 = per_100(&aggregate, 500.0);
        assert_eq!(per100.calories, 400.0);
        assert_eq!(per100.protein, 8.0);

        let serving = project_to_basis(&aggregate, 500.0, 50.0);
        assert_eq!(serving.calories, 200.0);
    }

    #[test]
    fn test_cost_projection() {
        assert_eq!(project_cost(20.0, 800.0, 100.0), 2.5);
        assert_eq!(project_cost(20.0, 800.0, 40.0), 1.0);
    }

    #[test]
    fn test_servings_per_package() {
        assert_eq!(servings_per_package(800.0, 60.0), Some(13));
        assert_eq!(servings_per_package(500.0, 50.0), Some(10));
        assert_eq!(servings_per_package(500.0, 0.0), None);
        assert_eq!(servings_per_package(0.0, 50.0), None);
    }

    proptest! {
        #[test]
        fn prop_projecting_to_full_yield_is_identity(
            calories in 0.0f64..10_000.0,
            yield_grams in 1.0f64..5000.0,
        ) {
            let aggregate = Nutrition { calories, ..Nutrition::zero() };
            let projected = project_to_basis(&aggregate, yield_grams, yield_grams);
            prop_assert!((projected.calories - calories).abs() <= 1e-9 * calories.max(1.0));
        }
    }
}
