//! Nutrition summary over a date range

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::db::NutritionStore;
use crate::models::{Goals, MealRecord, NutritionTotals};
use crate::nutrition::{
    aggregate_nutrition, average_daily, compute_linear_trend, compute_macro_breakdown,
    compute_percent_of_goal, compute_streaks, daily_totals, meal_type_distribution, top_foods,
    DailyTotals, FoodFrequency, GoalProgress, MacroBreakdown, MealTypeShare, Streaks, Trend,
};
use crate::validation::{parse_date_range, DateRange};

use super::ToolResult;

/// Days covered when no start date is given
pub const DEFAULT_SUMMARY_DAYS: i64 = 30;
/// Foods listed in a summary
pub const TOP_FOODS_LIMIT: usize = 10;
/// A day is on target when its calories are within this fraction of the goal
pub const ON_TARGET_TOLERANCE: f64 = 0.10;

#[derive(Debug, Serialize)]
pub struct NutritionSummary {
    pub range: DateRange,
    pub days_in_range: i64,
    pub days_logged: usize,
    pub days_on_target: usize,
    pub total_meals: usize,
    pub totals: NutritionTotals,
    /// Mean over days with at least one record
    pub average_daily: NutritionTotals,
    pub goals: Goals,
    pub average_progress: GoalProgress,
    pub macro_breakdown: MacroBreakdown,
    pub meal_types: Vec<MealTypeShare>,
    pub top_foods: Vec<FoodFrequency>,
    pub calorie_trend: Trend,
    pub protein_trend: Trend,
    pub streaks: Streaks,
    pub daily: Vec<DailyTotals>,
}

/// Whether a day's calories land within the tolerance band around the goal
pub fn is_on_target(calories: f64, calorie_goal: f64) -> bool {
    calorie_goal > 0.0 && (calories - calorie_goal).abs() <= calorie_goal * ON_TARGET_TOLERANCE
}

/// Build the summary from records already loaded for `range`
pub fn summarize(
    range: DateRange,
    meals: &[MealRecord],
    goals: Goals,
    activity_dates: &[NaiveDate],
    today: NaiveDate,
) -> NutritionSummary {
    let daily = daily_totals(meals);
    let totals = aggregate_nutrition(meals);
    let average = average_daily(&daily);

    let calories: Vec<f64> = daily.iter().map(|d| d.totals.calories).collect();
    let protein: Vec<f64> = daily.iter().map(|d| d.totals.protein_g).collect();

    NutritionSummary {
        range,
        days_in_range: range.num_days(),
        days_logged: daily.len(),
        days_on_target: daily
            .iter()
            .filter(|d| is_on_target(d.totals.calories, goals.calorie_goal))
            .count(),
        total_meals: meals.len(),
        totals,
        average_daily: average,
        goals,
        average_progress: compute_percent_of_goal(&average, &goals),
        macro_breakdown: compute_macro_breakdown(&totals),
        meal_types: meal_type_distribution(meals),
        top_foods: top_foods(meals, TOP_FOODS_LIMIT),
        calorie_trend: compute_linear_trend(&calories),
        protein_trend: compute_linear_trend(&protein),
        streaks: compute_streaks(activity_dates, today),
        daily,
    }
}

pub fn get_nutrition_summary<S: NutritionStore + ?Sized>(
    store: &S,
    start_date: Option<&str>,
    end_date: Option<&str>,
    today: NaiveDate,
) -> ToolResult<NutritionSummary> {
    let range = parse_date_range(start_date, end_date, today, DEFAULT_SUMMARY_DAYS)?;
    let meals = store.meals_between(range.start, range.end)?;
    let goals = store.goals()?;
    let activity_dates = store.activity_dates()?;
    debug!(%range, meals = meals.len(), "building nutrition summary");

    Ok(summarize(range, &meals, goals, &activity_dates, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::nutrition::TrendDirection;
    use crate::tools::meals::log_meal;
    use crate::validation::MealForm;

    fn log(db: &Database, date: &str, food: &str, calories: f64, protein_g: f64) {
        let form = MealForm {
            date: date.to_string(),
            meal_type: "dinner".to_string(),
            food_item: food.to_string(),
            calories: Some(calories),
            protein_g: Some(protein_g),
            ..Default::default()
        };
        log_meal(db, &form).unwrap();
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_is_on_target() {
        assert!(is_on_target(2000.0, 2000.0));
        assert!(is_on_target(1800.0, 2000.0));
        assert!(is_on_target(2200.0, 2000.0));
        assert!(!is_on_target(2201.0, 2000.0));
        assert!(!is_on_target(0.0, 0.0));
    }

    #[test]
    fn test_empty_summary() {
        let db = Database::in_memory().unwrap();
        let summary = get_nutrition_summary(&db, None, None, today()).unwrap();
        assert_eq!(summary.days_in_range, 30);
        assert_eq!(summary.days_logged, 0);
        assert_eq!(summary.totals, NutritionTotals::zero());
        assert_eq!(summary.calorie_trend.direction, TrendDirection::Stable);
        assert!(summary.top_foods.is_empty());
        assert_eq!(summary.meal_types.len(), 4);
    }

    #[test]
    fn test_summary_over_range() {
        let db = Database::in_memory().unwrap();
        log(&db, "2025-03-07", "Rice", 1800.0, 90.0);
        log(&db, "2025-03-08", "Rice", 2000.0, 100.0);
        log(&db, "2025-03-09", "Pizza", 2400.0, 110.0);
        log(&db, "2025-03-10", "Salad", 1000.0, 60.0);
        log(&db, "2025-03-10", "Steak", 1200.0, 90.0);

        let summary =
            get_nutrition_summary(&db, Some("2025-03-07"), Some("2025-03-10"), today()).unwrap();
        assert_eq!(summary.days_in_range, 4);
        assert_eq!(summary.days_logged, 4);
        assert_eq!(summary.total_meals, 5);
        assert_eq!(summary.totals.calories, 8400.0);
        assert_eq!(summary.average_daily.calories, 2100.0);
        assert_eq!(summary.average_progress.calories_pct, 105);
        // 1800, 2000, and 2200 are within 10% of 2000; 2400 is not
        assert_eq!(summary.days_on_target, 3);
        assert_eq!(summary.calorie_trend.direction, TrendDirection::Increasing);
        assert_eq!(summary.top_foods[0].food_item, "Rice");
        assert_eq!(summary.top_foods[0].times_logged, 2);
        assert_eq!(summary.streaks, Streaks { current: 4, longest: 4 });
        assert_eq!(summary.daily.len(), 4);
    }
}
