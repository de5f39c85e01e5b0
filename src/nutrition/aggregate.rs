//! Aggregation over meal records
//!
//! Totals, goal progress, per-day rollups, and the breakdowns charted in
//! summaries and reports.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Goals, MealRecord, MealType, NutritionTotals};
use super::targets::{compute_auto_calories, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN};

/// Sum calories and macros over a set of meal records
///
/// Empty input yields all-zero totals.
pub fn aggregate_nutrition<'a, I>(meals: I) -> NutritionTotals
where
    I: IntoIterator<Item = &'a MealRecord>,
{
    meals.into_iter().map(MealRecord::nutrition).sum()
}

/// Rounded percentage of each goal reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub calories_pct: u32,
    pub protein_pct: u32,
    pub carbs_pct: u32,
    pub fats_pct: u32,
}

fn percent(value: f64, goal: f64) -> u32 {
    if goal <= 0.0 || !goal.is_finite() || !value.is_finite() {
        return 0;
    }
    (value / goal * 100.0).round().max(0.0) as u32
}

/// Per-field `round(total / goal x 100)`; a zero goal yields 0
pub fn compute_percent_of_goal(totals: &NutritionTotals, goals: &Goals) -> GoalProgress {
    GoalProgress {
        calories_pct: percent(totals.calories, goals.calorie_goal),
        protein_pct: percent(totals.protein_g, goals.protein_goal_g),
        carbs_pct: percent(totals.carbs_g, goals.carbs_goal_g),
        fats_pct: percent(totals.fats_g, goals.fats_goal_g),
    }
}

/// Calories contributed by each macro and their rounded shares
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroBreakdown {
    pub protein_calories: f64,
    pub carbs_calories: f64,
    pub fats_calories: f64,
    /// Sum of the three, i.e. the macro-derived calorie total
    pub total_calories: f64,
    pub protein_pct: u32,
    pub carbs_pct: u32,
    pub fats_pct: u32,
}

pub fn compute_macro_breakdown(totals: &NutritionTotals) -> MacroBreakdown {
    let protein_calories = totals.protein_g * KCAL_PER_G_PROTEIN;
    let carbs_calories = totals.carbs_g * KCAL_PER_G_CARBS;
    let fats_calories = totals.fats_g * KCAL_PER_G_FAT;
    let total_calories = compute_auto_calories(totals.protein_g, totals.carbs_g, totals.fats_g);

    MacroBreakdown {
        protein_calories,
        carbs_calories,
        fats_calories,
        total_calories,
        protein_pct: percent(protein_calories, total_calories),
        carbs_pct: percent(carbs_calories, total_calories),
        fats_pct: percent(fats_calories, total_calories),
    }
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub totals: NutritionTotals,
}

/// Group records by date, ascending. Days without records are omitted.
pub fn daily_totals(meals: &[MealRecord]) -> Vec<DailyTotals> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&MealRecord>> = BTreeMap::new();
    for meal in meals {
        by_date.entry(meal.date).or_default().push(meal);
    }

    by_date
        .into_iter()
        .map(|(date, records)| DailyTotals {
            date,
            meal_count: records.len(),
            totals: aggregate_nutrition(records),
        })
        .collect()
}

/// Mean of per-day totals; zeros when there are no days
pub fn average_daily(days: &[DailyTotals]) -> NutritionTotals {
    if days.is_empty() {
        return NutritionTotals::zero();
    }
    let sum: NutritionTotals = days.iter().map(|d| d.totals).sum();
    sum.scale(1.0 / days.len() as f64)
}

/// Calories eaten at one meal type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealTypeShare {
    pub meal_type: MealType,
    pub meal_count: usize,
    pub calories: f64,
    /// Rounded share of all calories in the input
    pub calories_pct: u32,
}

/// Calorie distribution across breakfast, lunch, dinner, and snacks
///
/// Always returns all four meal types in a fixed order.
pub fn meal_type_distribution(meals: &[MealRecord]) -> Vec<MealTypeShare> {
    let total: f64 = meals.iter().map(|m| m.calories).sum();

    MealType::ALL
        .iter()
        .map(|meal_type| {
            let of_type: Vec<&MealRecord> =
                meals.iter().filter(|m| m.meal_type == *meal_type).collect();
            let calories: f64 = of_type.iter().map(|m| m.calories).sum();
            MealTypeShare {
                meal_type: *meal_type,
                meal_count: of_type.len(),
                calories,
                calories_pct: percent(calories, total),
            }
        })
        .collect()
}

/// A food and how often it was logged
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodFrequency {
    pub food_item: String,
    pub times_logged: usize,
    pub total_calories: f64,
}

/// Most frequently logged foods, ties broken by calories then name
///
/// Food names are grouped case-insensitively; the first spelling seen is kept.
pub fn top_foods(meals: &[MealRecord], limit: usize) -> Vec<FoodFrequency> {
    let mut by_food: HashMap<String, FoodFrequency> = HashMap::new();
    for meal in meals {
        let key = meal.food_item.trim().to_lowercase();
        let entry = by_food.entry(key).or_insert_with(|| FoodFrequency {
            food_item: meal.food_item.trim().to_string(),
            times_logged: 0,
            total_calories: 0.0,
        });
        entry.times_logged += 1;
        entry.total_calories += meal.calories;
    }

    let mut foods: Vec<FoodFrequency> = by_food.into_values().collect();
    foods.sort_by(|a, b| {
        b.times_logged
            .cmp(&a.times_logged)
            .then_with(|| b.total_calories.total_cmp(&a.total_calories))
            .then_with(|| a.food_item.cmp(&b.food_item))
    });
    foods.truncate(limit);
    foods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, date: &str, meal_type: MealType, food: &str, macros: (f64, f64, f64, f64)) -> MealRecord {
        MealRecord {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            meal_type,
            food_item: food.to_string(),
            calories: macros.0,
            protein_g: macros.1,
            carbs_g: macros.2,
            fats_g: macros.3,
            serving_size: None,
            created_at: String::new(),
        }
    }

    fn sample() -> Vec<MealRecord> {
        vec![
            record(1, "2025-03-01", MealType::Breakfast, "Oatmeal", (300.0, 10.0, 54.0, 5.0)),
            record(2, "2025-03-01", MealType::Lunch, "Chicken salad", (450.0, 40.0, 20.0, 22.0)),
            record(3, "2025-03-02", MealType::Dinner, "Pasta", (700.0, 25.0, 110.0, 18.0)),
            record(4, "2025-03-02", MealType::Snack, "oatmeal", (250.0, 8.0, 45.0, 4.0)),
        ]
    }

    #[test]
    fn test_aggregate_empty_is_zero() {
        let empty: Vec<MealRecord> = Vec::new();
        assert_eq!(aggregate_nutrition(&empty), NutritionTotals::zero());
    }

    #[test]
    fn test_aggregate_is_associative_over_concatenation() {
        let meals = sample();
        let (left, right) = meals.split_at(1);
        let whole = aggregate_nutrition(&meals);
        let parts = aggregate_nutrition(left) + aggregate_nutrition(right);
        assert!((whole.calories - parts.calories).abs() < 1e-9);
        assert!((whole.protein_g - parts.protein_g).abs() < 1e-9);
        assert!((whole.carbs_g - parts.carbs_g).abs() < 1e-9);
        assert!((whole.fats_g - parts.fats_g).abs() < 1e-9);
        assert_eq!(whole.calories, 1700.0);
    }

    #[test]
    fn test_aggregate_is_order_independent() {
        let meals = sample();
        let mut reversed = meals.clone();
        reversed.reverse();
        let a = aggregate_nutrition(&meals);
        let b = aggregate_nutrition(&reversed);
        assert!((a.calories - b.calories).abs() < 1e-9);
        assert!((a.fats_g - b.fats_g).abs() < 1e-9);
    }

    #[test]
    fn test_percent_of_goal() {
        let totals = NutritionTotals { calories: 1500.0, protein_g: 75.0, carbs_g: 100.0, fats_g: 70.0 };
        let goals = Goals {
            calorie_goal: 2000.0,
            protein_goal_g: 150.0,
            carbs_goal_g: 0.0,
            fats_goal_g: 65.0,
        };
        let progress = compute_percent_of_goal(&totals, &goals);
        assert_eq!(progress.calories_pct, 75);
        assert_eq!(progress.protein_pct, 50);
        assert_eq!(progress.carbs_pct, 0);
        assert_eq!(progress.fats_pct, 108);
    }

    #[test]
    fn test_percent_of_all_zero_goals() {
        let totals = NutritionTotals { calories: 100.0, protein_g: 1.0, carbs_g: 1.0, fats_g: 1.0 };
        let goals = Goals { calorie_goal: 0.0, protein_goal_g: 0.0, carbs_goal_g: 0.0, fats_goal_g: 0.0 };
        assert_eq!(compute_percent_of_goal(&totals, &goals), GoalProgress::default());
    }

    #[test]
    fn test_macro_breakdown() {
        let totals = NutritionTotals { calories: 0.0, protein_g: 25.0, carbs_g: 50.0, fats_g: 100.0 / 9.0 };
        let breakdown = compute_macro_breakdown(&totals);
        assert_eq!(breakdown.protein_calories, 100.0);
        assert_eq!(breakdown.carbs_calories, 200.0);
        assert!((breakdown.total_calories - 400.0).abs() < 1e-9);
        assert_eq!(breakdown.protein_pct, 25);
        assert_eq!(breakdown.carbs_pct, 50);
        assert_eq!(breakdown.fats_pct, 25);
        assert_eq!(
            breakdown.total_calories,
            compute_auto_calories(totals.protein_g, totals.carbs_g, totals.fats_g)
        );

        assert_eq!(compute_macro_breakdown(&NutritionTotals::zero()), MacroBreakdown::default());
    }

    #[test]
    fn test_daily_totals_and_average() {
        let days = daily_totals(&sample());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(days[0].meal_count, 2);
        assert_eq!(days[0].totals.calories, 750.0);
        assert_eq!(days[1].totals.calories, 950.0);

        let avg = average_daily(&days);
        assert_eq!(avg.calories, 850.0);
        assert_eq!(average_daily(&[]), NutritionTotals::zero());
    }

    #[test]
    fn test_meal_type_distribution() {
        let shares = meal_type_distribution(&sample());
        assert_eq!(shares.len(), 4);
        assert_eq!(shares[0].meal_type, MealType::Breakfast);
        assert_eq!(shares[0].calories, 300.0);
        assert_eq!(shares[2].calories_pct, 41); // 700 / 1700

        let empty = meal_type_distribution(&[]);
        assert!(empty.iter().all(|s| s.calories_pct == 0 && s.meal_count == 0));
    }

    #[test]
    fn test_top_foods_groups_case_insensitively() {
        let foods = top_foods(&sample(), 2);
        assert_eq!(foods.len(), 2);
        assert_eq!(foods[0].food_item, "Oatmeal");
        assert_eq!(foods[0].times_logged, 2);
        assert_eq!(foods[0].total_calories, 550.0);
        assert_eq!(foods[1].food_item, "Pasta");
    }
}
