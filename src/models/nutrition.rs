//! Aggregated nutrition totals
//!
//! Derived, never persisted. Sum of calories and macros over meal records.

use serde::{Deserialize, Serialize};

/// Calorie and macronutrient totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionTotals {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

impl NutritionTotals {
    /// All-zero totals
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein_g: self.protein_g * multiplier,
            carbs_g: self.carbs_g * multiplier,
            fats_g: self.fats_g * multiplier,
        }
    }

    /// Field-wise sum
    pub fn add(&self, other: &NutritionTotals) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein_g: self.protein_g + other.protein_g,
            carbs_g: self.carbs_g + other.carbs_g,
            fats_g: self.fats_g + other.fats_g,
        }
    }
}

impl std::ops::Add for NutritionTotals {
    type Output = NutritionTotals;

    fn add(self, other: NutritionTotals) -> NutritionTotals {
        NutritionTotals::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for NutritionTotals {
    type Output = NutritionTotals;

    fn mul(self, multiplier: f64) -> NutritionTotals {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for NutritionTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutritionTotals::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_sum() {
        let a = NutritionTotals { calories: 100.0, protein_g: 10.0, carbs_g: 5.0, fats_g: 2.0 };
        let b = NutritionTotals { calories: 50.0, protein_g: 1.0, carbs_g: 10.0, fats_g: 1.0 };
        let total: NutritionTotals = vec![a, b].into_iter().sum();
        assert_eq!(total, a + b);
        assert_eq!(total.calories, 150.0);
        assert_eq!(total.fats_g, 3.0);
    }

    #[test]
    fn test_scale() {
        let a = NutritionTotals { calories: 100.0, protein_g: 10.0, carbs_g: 5.0, fats_g: 2.0 };
        let half = a * 0.5;
        assert_eq!(half.calories, 50.0);
        assert_eq!(half.protein_g, 5.0);
    }
}
