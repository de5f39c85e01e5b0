//! Input validation
//!
//! Turns loosely typed host input (strings, raw numbers) into typed models.
//! Every failure is a `ValidationError`; nothing is coerced to zero.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    ActivityLevel, Gender, GoalType, GoalsUpdate, MealRecordCreate, MealType, ProfileUpdate,
    DATE_FORMAT,
};
use crate::nutrition::compute_auto_calories;

/// Longest accepted food name
pub const MAX_FOOD_ITEM_LEN: usize = 200;
/// Longest accepted date range, in days
pub const MAX_RANGE_DAYS: i64 = 366 * 5;
/// Oldest accepted age, in years
pub const MAX_AGE_YEARS: u32 = 150;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a whole number of years (got {value})")]
    NotWholeYears { field: &'static str, value: f64 },

    #[error("{field} must be at most {max} (got {value})")]
    TooLarge { field: &'static str, value: f64, max: f64 },

    #[error("unknown meal type '{0}' (expected breakfast, lunch, dinner, or snack)")]
    UnknownMealType(String),

    #[error("unknown gender '{0}' (expected male, female, or other)")]
    UnknownGender(String),

    #[error("unknown activity level '{0}' (expected sedentary, light, moderate, active, or very-active)")]
    UnknownActivityLevel(String),

    #[error("unknown goal '{0}' (expected lose-weight, maintain-weight, gain-weight, build-muscle, or improve-performance)")]
    UnknownGoal(String),

    #[error("food item name must not be empty")]
    EmptyFoodItem,

    #[error("{field} is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("date range of {days} days exceeds the maximum of {max}")]
    RangeTooLong { days: i64, max: i64 },

    #[error("nothing to update")]
    EmptyUpdate,

    #[error("unsupported export version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("unknown import mode '{0}' (expected replace or merge)")]
    UnknownImportMode(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

// ============================================================================
// Primitive parsers
// ============================================================================

pub fn parse_date(field: &'static str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parse a numeric text field. Blank text is an error, not zero.
pub fn parse_number(field: &'static str, value: &str) -> ValidationResult<f64> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        }),
    }
}

pub fn non_negative(field: &'static str, value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::NotANumber {
            field,
            value: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

pub fn positive(field: &'static str, value: f64) -> ValidationResult<f64> {
    let value = non_negative(field, value)?;
    if value == 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

pub fn parse_age(value: f64) -> ValidationResult<u32> {
    let value = positive("age", value)?;
    if value.fract() != 0.0 {
        return Err(ValidationError::NotWholeYears { field: "age", value });
    }
    let max = f64::from(MAX_AGE_YEARS);
    if value > max {
        return Err(ValidationError::TooLarge { field: "age", value, max });
    }
    Ok(value as u32)
}

pub fn parse_meal_type(value: &str) -> ValidationResult<MealType> {
    MealType::from_str(value).ok_or_else(|| ValidationError::UnknownMealType(value.to_string()))
}

pub fn parse_gender(value: &str) -> ValidationResult<Gender> {
    Gender::from_str(value).ok_or_else(|| ValidationError::UnknownGender(value.to_string()))
}

pub fn parse_activity_level(value: &str) -> ValidationResult<ActivityLevel> {
    ActivityLevel::from_str(value)
        .ok_or_else(|| ValidationError::UnknownActivityLevel(value.to_string()))
}

pub fn parse_goal(value: &str) -> ValidationResult<GoalType> {
    GoalType::from_str(value).ok_or_else(|| ValidationError::UnknownGoal(value.to_string()))
}

// ============================================================================
// Date ranges
// ============================================================================

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        if start > end {
            return Err(ValidationError::InvertedRange { start, end });
        }
        let days = (end - start).num_days() + 1;
        if days > MAX_RANGE_DAYS {
            return Err(ValidationError::RangeTooLong {
                days,
                max: MAX_RANGE_DAYS,
            });
        }
        Ok(Self { start, end })
    }

    /// The `days` days ending at `end`, inclusive
    pub fn ending_at(end: NaiveDate, days: i64) -> Self {
        let days = days.max(1);
        Self {
            start: end - Duration::days(days - 1),
            end,
        }
    }

    /// Number of calendar days covered
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the range, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        (0..self.num_days()).map(move |offset| start + Duration::days(offset))
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start.format(DATE_FORMAT), self.end.format(DATE_FORMAT))
    }
}

/// Parse optional start/end strings
///
/// A missing end defaults to `today`; a missing start defaults to
/// `default_days` days ending at the end date.
pub fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
    today: NaiveDate,
    default_days: i64,
) -> ValidationResult<DateRange> {
    let end = match end {
        Some(s) => parse_date("end_date", s)?,
        None => today,
    };
    match start {
        Some(s) => DateRange::new(parse_date("start_date", s)?, end),
        None => Ok(DateRange::ending_at(end, default_days)),
    }
}

// ============================================================================
// Forms
// ============================================================================

/// Raw meal entry as submitted by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealForm {
    pub date: String,
    pub meal_type: String,
    pub food_item: String,
    /// Omitted calories are derived from the macros
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fats_g: Option<f64>,
    pub serving_size: Option<String>,
}

/// Validate a meal form into a record ready to store
///
/// Omitted macros mean zero grams. Omitted calories are computed from the
/// macros with the 4/4/9 rule.
pub fn validate_meal(form: &MealForm) -> ValidationResult<MealRecordCreate> {
    let date = parse_date("date", &form.date)?;
    let meal_type = parse_meal_type(&form.meal_type)?;

    let food_item = form.food_item.trim();
    if food_item.is_empty() {
        return Err(ValidationError::EmptyFoodItem);
    }
    if food_item.chars().count() > MAX_FOOD_ITEM_LEN {
        return Err(ValidationError::TooLong {
            field: "food_item",
            max: MAX_FOOD_ITEM_LEN,
        });
    }

    let protein_g = non_negative("protein_g", form.protein_g.unwrap_or(0.0))?;
    let carbs_g = non_negative("carbs_g", form.carbs_g.unwrap_or(0.0))?;
    let fats_g = non_negative("fats_g", form.fats_g.unwrap_or(0.0))?;
    let calories = match form.calories {
        Some(c) => non_negative("calories", c)?,
        None => compute_auto_calories(protein_g, carbs_g, fats_g),
    };

    let serving_size = form
        .serving_size
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(MealRecordCreate {
        date,
        meal_type,
        food_item: food_item.to_string(),
        calories,
        protein_g,
        carbs_g,
        fats_g,
        serving_size,
    })
}

/// Raw profile edit; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    pub age: Option<f64>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

pub fn validate_profile(form: &ProfileForm) -> ValidationResult<ProfileUpdate> {
    let update = ProfileUpdate {
        age: form.age.map(parse_age).transpose()?,
        gender: form.gender.as_deref().map(parse_gender).transpose()?,
        height_cm: form.height_cm.map(|v| positive("height_cm", v)).transpose()?,
        weight_kg: form.weight_kg.map(|v| positive("weight_kg", v)).transpose()?,
        activity_level: form.activity_level.as_deref().map(parse_activity_level).transpose()?,
        goal: form.goal.as_deref().map(parse_goal).transpose()?,
    };
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    Ok(update)
}

/// Raw goals edit; every field optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GoalsForm {
    pub calorie_goal: Option<f64>,
    pub protein_goal_g: Option<f64>,
    pub carbs_goal_g: Option<f64>,
    pub fats_goal_g: Option<f64>,
}

pub fn validate_goals(form: &GoalsForm) -> ValidationResult<GoalsUpdate> {
    let update = GoalsUpdate {
        calorie_goal: form.calorie_goal.map(|v| non_negative("calorie_goal", v)).transpose()?,
        protein_goal_g: form.protein_goal_g.map(|v| non_negative("protein_goal_g", v)).transpose()?,
        carbs_goal_g: form.carbs_goal_g.map(|v| non_negative("carbs_goal_g", v)).transpose()?,
        fats_goal_g: form.fats_goal_g.map(|v| non_negative("fats_goal_g", v)).transpose()?,
    };
    if update.is_empty() {
        return Err(ValidationError::EmptyUpdate);
    }
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal_form() -> MealForm {
        MealForm {
            date: "2025-03-01".to_string(),
            meal_type: "lunch".to_string(),
            food_item: "  Chicken salad ".to_string(),
            calories: Some(450.0),
            protein_g: Some(40.0),
            carbs_g: Some(20.0),
            fats_g: Some(22.0),
            serving_size: Some("   ".to_string()),
        }
    }

    #[test]
    fn test_validate_meal() {
        let meal = validate_meal(&meal_form()).unwrap();
        assert_eq!(meal.food_item, "Chicken salad");
        assert_eq!(meal.meal_type, MealType::Lunch);
        assert_eq!(meal.calories, 450.0);
        assert_eq!(meal.serving_size, None);
    }

    #[test]
    fn test_validate_meal_auto_calories() {
        let form = MealForm {
            calories: None,
            fats_g: None,
            ..meal_form()
        };
        let meal = validate_meal(&form).unwrap();
        assert_eq!(meal.fats_g, 0.0);
        assert_eq!(meal.calories, 40.0 * 4.0 + 20.0 * 4.0);
    }

    #[test]
    fn test_validate_meal_errors() {
        let form = MealForm { meal_type: "brunch".to_string(), ..meal_form() };
        assert_eq!(
            validate_meal(&form),
            Err(ValidationError::UnknownMealType("brunch".to_string()))
        );

        let form = MealForm { food_item: "   ".to_string(), ..meal_form() };
        assert_eq!(validate_meal(&form), Err(ValidationError::EmptyFoodItem));

        let form = MealForm { protein_g: Some(-1.0), ..meal_form() };
        assert_eq!(
            validate_meal(&form),
            Err(ValidationError::Negative { field: "protein_g", value: -1.0 })
        );

        let form = MealForm { date: "03/01/2025".to_string(), ..meal_form() };
        assert!(matches!(validate_meal(&form), Err(ValidationError::InvalidDate { field: "date", .. })));

        let form = MealForm { calories: Some(f64::NAN), ..meal_form() };
        assert!(matches!(validate_meal(&form), Err(ValidationError::NotANumber { field: "calories", .. })));
    }

    #[test]
    fn test_parse_number_never_falls_back_to_zero() {
        assert_eq!(parse_number("weight_kg", " 72.5 "), Ok(72.5));
        assert!(parse_number("weight_kg", "").is_err());
        assert!(parse_number("weight_kg", "abc").is_err());
        assert!(parse_number("weight_kg", "inf").is_err());
    }

    #[test]
    fn test_validate_profile() {
        let form = ProfileForm {
            age: Some(30.0),
            gender: Some("Female".to_string()),
            activity_level: Some("very-active".to_string()),
            ..Default::default()
        };
        let update = validate_profile(&form).unwrap();
        assert_eq!(update.age, Some(30));
        assert_eq!(update.gender, Some(Gender::Female));
        assert_eq!(update.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(update.height_cm, None);

        let form = ProfileForm { age: Some(30.5), ..Default::default() };
        assert!(matches!(validate_profile(&form), Err(ValidationError::NotWholeYears { .. })));

        let form = ProfileForm { age: Some(500.0), ..Default::default() };
        assert!(matches!(validate_profile(&form), Err(ValidationError::TooLarge { field: "age", .. })));
        let form = ProfileForm { age: Some(150.0), ..Default::default() };
        assert_eq!(validate_profile(&form).unwrap().age, Some(150));

        let form = ProfileForm { height_cm: Some(0.0), ..Default::default() };
        assert!(matches!(validate_profile(&form), Err(ValidationError::NotPositive { field: "height_cm", .. })));

        let form = ProfileForm { goal: Some("shred".to_string()), ..Default::default() };
        assert_eq!(validate_profile(&form), Err(ValidationError::UnknownGoal("shred".to_string())));

        assert_eq!(validate_profile(&ProfileForm::default()), Err(ValidationError::EmptyUpdate));
    }

    #[test]
    fn test_validate_goals() {
        let form = GoalsForm { calorie_goal: Some(0.0), ..Default::default() };
        assert_eq!(validate_goals(&form).unwrap().calorie_goal, Some(0.0));

        let form = GoalsForm { fats_goal_g: Some(-5.0), ..Default::default() };
        assert!(validate_goals(&form).is_err());
        assert_eq!(validate_goals(&GoalsForm::default()), Err(ValidationError::EmptyUpdate));
    }

    #[test]
    fn test_date_ranges() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let range = parse_date_range(None, None, today, 7).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
        assert_eq!(range.end, today);
        assert_eq!(range.num_days(), 7);
        assert_eq!(range.dates().count(), 7);
        assert_eq!(range.to_string(), "2025-03-04 to 2025-03-10");

        let range = parse_date_range(Some("2025-03-01"), Some("2025-03-01"), today, 7).unwrap();
        assert_eq!(range.num_days(), 1);
        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));

        assert!(matches!(
            parse_date_range(Some("2025-03-05"), Some("2025-03-01"), today, 7),
            Err(ValidationError::InvertedRange { .. })
        ));
        assert!(matches!(
            parse_date_range(Some("2000-01-01"), None, today, 7),
            Err(ValidationError::RangeTooLong { .. })
        ));
    }
}
