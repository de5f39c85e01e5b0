//! Meal tools
//!
//! Logging, listing, and deleting meal records.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::db::NutritionStore;
use crate::models::{MealRecord, NutritionTotals};
use crate::nutrition::{aggregate_nutrition, compute_macro_breakdown, MacroBreakdown};
use crate::validation::{non_negative, parse_date_range, validate_meal, DateRange, MealForm};

use super::{ToolError, ToolResult};

/// Days covered by list_meals when no start date is given
pub const DEFAULT_LIST_DAYS: i64 = 7;

/// Response for log_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: MealRecord,
    /// True when calories were derived from the macros
    pub calories_calculated: bool,
}

/// Response for list_meals
#[derive(Debug, Serialize)]
pub struct ListMealsResponse {
    pub range: DateRange,
    pub meals: Vec<MealRecord>,
    pub count: usize,
    pub totals: NutritionTotals,
}

/// Response for delete_meal
#[derive(Debug, Serialize)]
pub struct DeleteMealResponse {
    pub id: i64,
    pub food_item: String,
    pub deleted: bool,
}

/// Response for calculate_meal_calories
#[derive(Debug, Serialize)]
pub struct MealCaloriesResponse {
    pub calories: f64,
    pub breakdown: MacroBreakdown,
}

pub fn log_meal<S: NutritionStore + ?Sized>(store: &S, form: &MealForm) -> ToolResult<LogMealResponse> {
    let data = validate_meal(form)?;
    let meal = store.add_meal(&data)?;
    info!(
        id = meal.id,
        date = %meal.date,
        meal_type = meal.meal_type.as_str(),
        calories = meal.calories,
        "meal logged"
    );
    Ok(LogMealResponse {
        meal,
        calories_calculated: form.calories.is_none(),
    })
}

pub fn get_meal<S: NutritionStore + ?Sized>(store: &S, id: i64) -> ToolResult<MealRecord> {
    store
        .meal(id)?
        .ok_or_else(|| ToolError::NotFound(format!("Meal record {}", id)))
}

/// Meals within a date range
///
/// Without dates, lists the last week ending `today`.
pub fn list_meals<S: NutritionStore + ?Sized>(
    store: &S,
    start_date: Option<&str>,
    end_date: Option<&str>,
    today: NaiveDate,
) -> ToolResult<ListMealsResponse> {
    let range = parse_date_range(start_date, end_date, today, DEFAULT_LIST_DAYS)?;
    let meals = store.meals_between(range.start, range.end)?;
    Ok(ListMealsResponse {
        range,
        count: meals.len(),
        totals: aggregate_nutrition(&meals),
        meals,
    })
}

pub fn delete_meal<S: NutritionStore + ?Sized>(store: &S, id: i64) -> ToolResult<DeleteMealResponse> {
    let meal = get_meal(store, id)?;
    let deleted = store.delete_meal(id)?;
    info!(id, deleted, "meal deleted");
    Ok(DeleteMealResponse {
        id,
        food_item: meal.food_item,
        deleted,
    })
}

/// Calories implied by macro grams, for previewing an entry before logging
pub fn calculate_meal_calories(
    protein_g: f64,
    carbs_g: f64,
    fats_g: f64,
) -> ToolResult<MealCaloriesResponse> {
    let totals = NutritionTotals {
        calories: 0.0,
        protein_g: non_negative("protein_g", protein_g)?,
        carbs_g: non_negative("carbs_g", carbs_g)?,
        fats_g: non_negative("fats_g", fats_g)?,
    };
    let breakdown = compute_macro_breakdown(&totals);
    Ok(MealCaloriesResponse {
        calories: breakdown.total_calories,
        breakdown,
    })
}
