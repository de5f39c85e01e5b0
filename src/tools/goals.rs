//! Goal tools

use serde::Serialize;
use tracing::info;

use crate::db::NutritionStore;
use crate::models::Goals;
use crate::nutrition::{
    compute_auto_calories, compute_daily_calorie_goal, derive_goals, macro_ratios, MacroRatios,
};
use crate::validation::{validate_goals, GoalsForm};

use super::{ToolError, ToolResult};

#[derive(Debug, Serialize)]
pub struct GoalsResponse {
    pub goals: Goals,
    /// Calories implied by the macro goals (4/4/9)
    pub macro_calories: f64,
}

impl GoalsResponse {
    fn new(goals: Goals) -> Self {
        Self {
            macro_calories: compute_auto_calories(
                goals.protein_goal_g,
                goals.carbs_goal_g,
                goals.fats_goal_g,
            )
            .round(),
            goals,
        }
    }
}

/// Response for auto_set_goals
#[derive(Debug, Serialize)]
pub struct AutoGoalsResponse {
    pub goals: Goals,
    pub goal: &'static str,
    pub ratios: MacroRatios,
    pub previous: Goals,
}

pub fn get_goals<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<GoalsResponse> {
    Ok(GoalsResponse::new(store.goals()?))
}

/// Overwrite the provided goal fields
pub fn set_goals<S: NutritionStore + ?Sized>(store: &S, form: &GoalsForm) -> ToolResult<GoalsResponse> {
    let update = validate_goals(form)?;
    let goals = update.apply_to(&store.goals()?);
    store.save_goals(&goals)?;
    info!(calorie_goal = goals.calorie_goal, "goals updated");
    Ok(GoalsResponse::new(goals))
}

/// Derive and store goals from the profile
///
/// Fails with `Incomplete` when the profile lacks a measurement, and with
/// `GoalsUnavailable` when the measurements yield no positive calorie goal.
pub fn auto_set_goals<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<AutoGoalsResponse> {
    let profile = store.profile()?;
    if !profile.is_complete() {
        return Err(ToolError::Incomplete(profile.missing_fields()));
    }
    let goals = derive_goals(&profile).ok_or_else(|| {
        ToolError::GoalsUnavailable(compute_daily_calorie_goal(&profile).unwrap_or(0))
    })?;
    let previous = store.goals()?;
    store.save_goals(&goals)?;
    info!(calorie_goal = goals.calorie_goal, goal = profile.goal.as_str(), "goals derived from profile");

    Ok(AutoGoalsResponse {
        goals,
        goal: profile.goal.as_str(),
        ratios: macro_ratios(profile.goal),
        previous,
    })
}

pub fn reset_goals<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<GoalsResponse> {
    store.reset_goals()?;
    info!("goals reset to defaults");
    Ok(GoalsResponse::new(store.goals()?))
}
