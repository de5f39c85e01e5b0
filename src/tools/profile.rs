//! Profile tools
//!
//! Read and edit the single user profile, with the body metrics derived from it.

use serde::Serialize;
use tracing::info;

use crate::db::NutritionStore;
use crate::models::{Goals, Profile};
use crate::nutrition::{
    classify_bmi, compute_bmr, derive_goals, profile_bmi, profile_tdee, BmiCategory,
};
use crate::validation::{validate_profile, ProfileForm};

use super::ToolResult;

/// BMI value and band
#[derive(Debug, Clone, Serialize)]
pub struct BmiInfo {
    pub bmi: Option<f64>,
    pub category: BmiCategory,
}

impl BmiInfo {
    pub fn for_profile(profile: &Profile) -> Self {
        let bmi = profile_bmi(profile);
        Self {
            bmi: bmi.map(|b| (b * 10.0).round() / 10.0),
            category: classify_bmi(bmi),
        }
    }
}

/// Profile with everything the calculator can derive from it
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub is_complete: bool,
    pub missing_fields: Vec<&'static str>,
    pub bmi: BmiInfo,
    pub bmr: Option<f64>,
    pub tdee: Option<f64>,
    /// Goals `auto_set_goals` would store
    pub suggested_goals: Option<Goals>,
}

impl ProfileResponse {
    pub fn new(profile: Profile) -> Self {
        Self {
            is_complete: profile.is_complete(),
            missing_fields: profile.missing_fields(),
            bmi: BmiInfo::for_profile(&profile),
            bmr: compute_bmr(&profile).map(f64::round),
            tdee: profile_tdee(&profile).map(f64::round),
            suggested_goals: derive_goals(&profile),
            profile,
        }
    }
}

pub fn get_profile<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<ProfileResponse> {
    Ok(ProfileResponse::new(store.profile()?))
}

/// Merge the provided fields into the stored profile
pub fn update_profile<S: NutritionStore + ?Sized>(
    store: &S,
    form: &ProfileForm,
) -> ToolResult<ProfileResponse> {
    let update = validate_profile(form)?;
    let profile = update.apply_to(&store.profile()?);
    store.save_profile(&profile)?;
    info!(complete = profile.is_complete(), "profile updated");
    Ok(ProfileResponse::new(profile))
}

pub fn reset_profile<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<ProfileResponse> {
    store.reset_profile()?;
    info!("profile reset");
    Ok(ProfileResponse::new(store.profile()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{Gender, GoalType};
    use crate::tools::ToolError;

    fn complete_form() -> ProfileForm {
        ProfileForm {
            age: Some(30.0),
            gender: Some("male".to_string()),
            height_cm: Some(180.0),
            weight_kg: Some(80.0),
            activity_level: Some("moderate".to_string()),
            goal: Some("maintain-weight".to_string()),
        }
    }

    #[test]
    fn test_empty_profile_has_nothing_derived() {
        let db = Database::in_memory().unwrap();
        let response = get_profile(&db).unwrap();
        assert!(!response.is_complete);
        assert_eq!(response.missing_fields.len(), 4);
        assert_eq!(response.bmi.bmi, None);
        assert_eq!(response.bmi.category, BmiCategory::Unknown);
        assert!(response.bmr.is_none());
        assert!(response.suggested_goals.is_none());
    }

    #[test]
    fn test_update_profile_derives_metrics() {
        let db = Database::in_memory().unwrap();
        let response = update_profile(&db, &complete_form()).unwrap();
        assert!(response.is_complete);
        assert_eq!(response.bmr, Some(1780.0));
        assert_eq!(response.tdee, Some(2759.0));
        assert_eq!(response.bmi.bmi, Some(24.7));
        assert_eq!(response.bmi.category, BmiCategory::Normal);
        assert_eq!(response.suggested_goals.unwrap().calorie_goal, 2759.0);
    }

    #[test]
    fn test_partial_update_keeps_other_fields() {
        let db = Database::in_memory().unwrap();
        update_profile(&db, &complete_form()).unwrap();

        let form = ProfileForm {
            gender: Some("female".to_string()),
            goal: Some("lose-weight".to_string()),
            ..Default::default()
        };
        let response = update_profile(&db, &form).unwrap();
        assert_eq!(response.profile.gender, Some(Gender::Female));
        assert_eq!(response.profile.goal, GoalType::LoseWeight);
        assert_eq!(response.profile.age, Some(30));
        assert_eq!(response.bmr, Some(1614.0));
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let db = Database::in_memory().unwrap();
        let form = ProfileForm {
            weight_kg: Some(-80.0),
            ..Default::default()
        };
        assert!(matches!(update_profile(&db, &form), Err(ToolError::Validation(_))));
        assert_eq!(get_profile(&db).unwrap().profile, Profile::default());
    }

    #[test]
    fn test_reset_profile() {
        let db = Database::in_memory().unwrap();
        update_profile(&db, &complete_form()).unwrap();
        let response = reset_profile(&db).unwrap();
        assert_eq!(response.profile, Profile::default());
    }
}
