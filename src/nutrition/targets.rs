//! Calorie and macro targets
//!
//! Derives a daily calorie goal from a profile and splits it into macro grams.

use serde::{Deserialize, Serialize};

use crate::models::{GoalType, Goals, Profile};
use super::body::profile_tdee;

/// Energy per gram of protein (kcal)
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// Energy per gram of carbohydrate (kcal)
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// Energy per gram of fat (kcal)
pub const KCAL_PER_G_FAT: f64 = 9.0;

/// Fraction of total calories assigned to each macro. Sums to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroRatios {
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Macro grams derived from a calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroGoals {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
}

/// Daily calorie adjustment applied on top of TDEE
pub fn goal_calorie_adjustment(goal: GoalType) -> f64 {
    match goal {
        GoalType::LoseWeight => -500.0,
        GoalType::MaintainWeight => 0.0,
        GoalType::GainWeight => 500.0,
        GoalType::BuildMuscle => 300.0,
        GoalType::ImprovePerformance => 0.0,
    }
}

/// Protein/carbs/fats split for a goal
pub fn macro_ratios(goal: GoalType) -> MacroRatios {
    let (protein, carbs, fats) = match goal {
        GoalType::LoseWeight => (0.30, 0.40, 0.30),
        GoalType::MaintainWeight => (0.25, 0.45, 0.30),
        GoalType::GainWeight => (0.25, 0.50, 0.25),
        GoalType::BuildMuscle => (0.35, 0.40, 0.25),
        GoalType::ImprovePerformance => (0.25, 0.55, 0.20),
    };
    MacroRatios { protein, carbs, fats }
}

/// Daily calorie goal: `round(TDEE + goal adjustment)`
///
/// `None` when BMR cannot be computed from the profile. A negative result
/// (only possible with implausible measurements) is clamped to zero.
pub fn compute_daily_calorie_goal(profile: &Profile) -> Option<u32> {
    let tdee = profile_tdee(profile)?;
    let goal = (tdee + goal_calorie_adjustment(profile.goal)).round().max(0.0);
    Some(goal as u32)
}

/// Split a calorie goal into macro grams using the goal's ratios
///
/// Protein and carbs use 4 kcal/g, fats 9 kcal/g. `None` when the calorie goal
/// is zero, negative, or not finite.
pub fn compute_macro_goals(calorie_goal: f64, goal: GoalType) -> Option<MacroGoals> {
    if !calorie_goal.is_finite() || calorie_goal <= 0.0 {
        return None;
    }

    let ratios = macro_ratios(goal);
    Some(MacroGoals {
        protein_g: calorie_goal * ratios.protein / KCAL_PER_G_PROTEIN,
        carbs_g: calorie_goal * ratios.carbs / KCAL_PER_G_CARBS,
        fats_g: calorie_goal * ratios.fats / KCAL_PER_G_FAT,
    })
}

/// Full set of goals derived from a profile
pub fn derive_goals(profile: &Profile) -> Option<Goals> {
    let calorie_goal = f64::from(compute_daily_calorie_goal(profile)?);
    let macros = compute_macro_goals(calorie_goal, profile.goal)?;
    Some(Goals {
        calorie_goal,
        protein_goal_g: macros.protein_g.round(),
        carbs_goal_g: macros.carbs_g.round(),
        fats_goal_g: macros.fats_g.round(),
    })
}

/// Calories implied by macro grams: `protein x 4 + carbs x 4 + fats x 9`
///
/// Shared by meal auto-calculation and the macro breakdown so both agree.
pub fn compute_auto_calories(protein_g: f64, carbs_g: f64, fats_g: f64) -> f64 {
    protein_g * KCAL_PER_G_PROTEIN + carbs_g * KCAL_PER_G_CARBS + fats_g * KCAL_PER_G_FAT
}
