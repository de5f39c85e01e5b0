//! Daily dashboard

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::NutritionStore;
use crate::models::{Goals, MealRecord, MealType, NutritionTotals};
use crate::nutrition::{
    aggregate_nutrition, compute_percent_of_goal, compute_streaks, GoalProgress, Streaks,
};
use crate::validation::parse_date;

use super::profile::BmiInfo;
use super::ToolResult;

/// Meals organized by type
#[derive(Debug, Default, Serialize)]
pub struct DayMeals {
    pub breakfast: Vec<MealRecord>,
    pub lunch: Vec<MealRecord>,
    pub dinner: Vec<MealRecord>,
    pub snack: Vec<MealRecord>,
}

impl DayMeals {
    fn group(meals: Vec<MealRecord>) -> Self {
        let mut grouped = Self::default();
        for meal in meals {
            let bucket = match meal.meal_type {
                MealType::Breakfast => &mut grouped.breakfast,
                MealType::Lunch => &mut grouped.lunch,
                MealType::Dinner => &mut grouped.dinner,
                MealType::Snack => &mut grouped.snack,
            };
            bucket.push(meal);
        }
        grouped
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub date: NaiveDate,
    pub totals: NutritionTotals,
    pub goals: Goals,
    pub progress: GoalProgress,
    /// Negative once the calorie goal is exceeded
    pub remaining_calories: f64,
    pub meal_count: usize,
    pub meals: DayMeals,
    pub bmi: BmiInfo,
    pub streaks: Streaks,
}

/// Totals and progress for one day (default `today`)
pub fn get_dashboard<S: NutritionStore + ?Sized>(
    store: &S,
    date: Option<&str>,
    today: NaiveDate,
) -> ToolResult<DashboardResponse> {
    let date = match date {
        Some(d) => parse_date("date", d)?,
        None => today,
    };

    let meals = store.meals_between(date, date)?;
    let goals = store.goals()?;
    let profile = store.profile()?;
    let streaks = compute_streaks(&store.activity_dates()?, today);

    let totals = aggregate_nutrition(&meals);
    Ok(DashboardResponse {
        date,
        progress: compute_percent_of_goal(&totals, &goals),
        remaining_calories: goals.calorie_goal - totals.calories,
        meal_count: meals.len(),
        meals: DayMeals::group(meals),
        bmi: BmiInfo::for_profile(&profile),
        totals,
        goals,
        streaks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::tools::meals::{delete_meal, log_meal};
    use crate::validation::MealForm;

    fn form(date: &str, meal_type: &str, calories: f64, protein_g: f64) -> MealForm {
        MealForm {
            date: date.to_string(),
            meal_type: meal_type.to_string(),
            food_item: "Food".to_string(),
            calories: Some(calories),
            protein_g: Some(protein_g),
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_empty_dashboard() {
        let db = Database::in_memory().unwrap();
        let dashboard = get_dashboard(&db, None, today()).unwrap();
        assert_eq!(dashboard.date, today());
        assert_eq!(dashboard.totals, NutritionTotals::zero());
        assert_eq!(dashboard.progress, GoalProgress::default());
        assert_eq!(dashboard.remaining_calories, 2000.0);
        assert_eq!(dashboard.streaks, Streaks::default());
    }

    #[test]
    fn test_log_then_dashboard_then_delete() {
        let db = Database::in_memory().unwrap();
        log_meal(&db, &form("2025-03-09", "dinner", 700.0, 40.0)).unwrap();
        log_meal(&db, &form("2025-03-10", "breakfast", 400.0, 30.0)).unwrap();
        let lunch = log_meal(&db, &form("2025-03-10", "lunch", 600.0, 45.0)).unwrap();

        let dashboard = get_dashboard(&db, Some("2025-03-10"), today()).unwrap();
        assert_eq!(dashboard.meal_count, 2);
        assert_eq!(dashboard.totals.calories, 1000.0);
        assert_eq!(dashboard.progress.calories_pct, 50);
        assert_eq!(dashboard.progress.protein_pct, 50);
        assert_eq!(dashboard.remaining_calories, 1000.0);
        assert_eq!(dashboard.meals.breakfast.len(), 1);
        assert_eq!(dashboard.meals.lunch.len(), 1);
        assert!(dashboard.meals.dinner.is_empty());
        assert_eq!(dashboard.streaks, Streaks { current: 2, longest: 2 });

        delete_meal(&db, lunch.meal.id).unwrap();
        let dashboard = get_dashboard(&db, Some("2025-03-10"), today()).unwrap();
        assert_eq!(dashboard.totals.calories, 400.0);
        assert_eq!(dashboard.progress.calories_pct, 20);
    }

    #[test]
    fn test_dashboard_bad_date() {
        let db = Database::in_memory().unwrap();
        assert!(get_dashboard(&db, Some("yesterday"), today()).is_err());
    }
}
