//! Data models
//!
//! Profile, goals, and meal records, plus the derived nutrition totals.

mod goals;
mod meal_record;
mod nutrition;
mod profile;

pub use goals::{
    Goals, GoalsUpdate, DEFAULT_CALORIE_GOAL, DEFAULT_CARBS_GOAL_G, DEFAULT_FATS_GOAL_G,
    DEFAULT_PROTEIN_GOAL_G,
};
pub use meal_record::{MealRecord, MealRecordCreate, MealType, DATE_FORMAT};
pub use nutrition::NutritionTotals;
pub use profile::{ActivityLevel, Gender, GoalType, Profile, ProfileUpdate};
