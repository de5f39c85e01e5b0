//! Nutrition calculation module
//!
//! Pure functions over profiles, goals, and meal records. Nothing here reads
//! storage or the clock; callers pass everything in.

pub mod aggregate;
pub mod body;
pub mod streaks;
pub mod targets;
pub mod trend;

pub use aggregate::{
    aggregate_nutrition, average_daily, compute_macro_breakdown, compute_percent_of_goal,
    daily_totals, meal_type_distribution, top_foods, DailyTotals, FoodFrequency, GoalProgress,
    MacroBreakdown, MealTypeShare,
};
pub use body::{
    activity_multiplier, classify_bmi, compute_bmi, compute_bmr, compute_tdee, profile_bmi,
    profile_tdee, BmiCategory,
};
pub use streaks::{compute_streaks, Streaks};
pub use targets::{
    compute_auto_calories, compute_daily_calorie_goal, compute_macro_goals, derive_goals,
    goal_calorie_adjustment, macro_ratios, MacroGoals, MacroRatios, KCAL_PER_G_CARBS,
    KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN,
};
pub use trend::{compute_linear_trend, Trend, TrendDirection, TREND_THRESHOLD};
