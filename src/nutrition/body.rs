//! Body metrics
//!
//! BMI, BMR, and TDEE from profile measurements.
//!
//! # References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy
//!   expenditure in healthy individuals. *American Journal of Clinical Nutrition*,
//!   51(2), 241-247.
//! - WHO BMI classification for adults.

use serde::Serialize;

use crate::models::{ActivityLevel, Gender, Profile};

/// BMI classification band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
    /// BMI could not be computed
    Unknown,
}

impl BmiCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
            BmiCategory::Unknown => "Unknown",
        }
    }
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Body Mass Index
///
/// Formula: `weight_kg / (height_cm / 100)^2`. Returns `None` when either
/// input is zero, negative, or not finite. Not rounded.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> Option<f64> {
    let height_m = positive(height_cm)? / 100.0;
    let weight_kg = positive(weight_kg)?;
    Some(weight_kg / (height_m * height_m))
}

/// BMI from a profile's optional measurements
pub fn profile_bmi(profile: &Profile) -> Option<f64> {
    compute_bmi(profile.height_cm?, profile.weight_kg?)
}

/// Classify a BMI value
///
/// Lower bounds are inclusive: 18.5 is Normal, 25 is Overweight, 30 is Obese.
pub fn classify_bmi(bmi: Option<f64>) -> BmiCategory {
    match bmi {
        Some(b) if b.is_nan() => BmiCategory::Unknown,
        Some(b) if b < 18.5 => BmiCategory::Underweight,
        Some(b) if b < 25.0 => BmiCategory::Normal,
        Some(b) if b < 30.0 => BmiCategory::Overweight,
        Some(_) => BmiCategory::Obese,
        None => BmiCategory::Unknown,
    }
}

/// Mifflin-St Jeor gender constant
fn gender_offset(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
        Gender::Other => 0.0,
    }
}

/// Basal Metabolic Rate (kcal/day) using Mifflin-St Jeor
///
/// Formula: `10 x weight_kg + 6.25 x height_cm - 5 x age + offset`, where the
/// offset is +5 for men, -161 for women, and 0 otherwise.
///
/// Returns `None` unless age, gender, height, and weight are all present and
/// positive.
pub fn compute_bmr(profile: &Profile) -> Option<f64> {
    let age = profile.age.filter(|a| *a > 0)?;
    let gender = profile.gender?;
    let height_cm = positive(profile.height_cm?)?;
    let weight_kg = positive(profile.weight_kg?)?;

    Some(10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + gender_offset(gender))
}

/// TDEE multiplier for an activity level
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::Light => 1.375,
        ActivityLevel::Moderate => 1.55,
        ActivityLevel::Active => 1.725,
        ActivityLevel::VeryActive => 1.9,
    }
}

/// Total Daily Energy Expenditure: `bmr x activity multiplier`
pub fn compute_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_multiplier(activity_level)
}

/// TDEE straight from a profile, if BMR is available
pub fn profile_tdee(profile: &Profile) -> Option<f64> {
    compute_bmr(profile).map(|bmr| compute_tdee(bmr, profile.activity_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(gender: Gender) -> Profile {
        Profile {
            age: Some(30),
            gender: Some(gender),
            height_cm: Some(180.0),
            weight_kg: Some(80.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_bmi_formula() {
        let bmi = compute_bmi(180.0, 80.0).unwrap();
        assert!((bmi - 80.0 / (1.8 * 1.8)).abs() < 1e-9);

        let bmi = compute_bmi(175.0, 70.0).unwrap();
        assert!((bmi - 22.857).abs() < 0.001);
    }

    #[test]
    fn test_bmi_unavailable() {
        assert_eq!(compute_bmi(0.0, 70.0), None);
        assert_eq!(compute_bmi(175.0, 0.0), None);
        assert_eq!(compute_bmi(-175.0, 70.0), None);
        assert_eq!(compute_bmi(f64::NAN, 70.0), None);
        assert_eq!(profile_bmi(&Profile::default()), None);
    }

    #[test]
    fn test_bmi_boundaries() {
        assert_eq!(classify_bmi(Some(18.49)), BmiCategory::Underweight);
        assert_eq!(classify_bmi(Some(18.5)), BmiCategory::Normal);
        assert_eq!(classify_bmi(Some(24.999)), BmiCategory::Normal);
        assert_eq!(classify_bmi(Some(25.0)), BmiCategory::Overweight);
        assert_eq!(classify_bmi(Some(29.99)), BmiCategory::Overweight);
        assert_eq!(classify_bmi(Some(30.0)), BmiCategory::Obese);
        assert_eq!(classify_bmi(None), BmiCategory::Unknown);
        assert_eq!(classify_bmi(None).as_str(), "Unknown");
    }

    #[test]
    fn test_bmr_male_female_other() {
        assert!((compute_bmr(&profile(Gender::Male)).unwrap() - 1780.0).abs() < 1e-9);
        assert!((compute_bmr(&profile(Gender::Female)).unwrap() - 1614.0).abs() < 1e-9);
        assert!((compute_bmr(&profile(Gender::Other)).unwrap() - 1775.0).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_requires_all_fields() {
        let mut p = profile(Gender::Male);
        p.age = Some(0);
        assert_eq!(compute_bmr(&p), None);

        let mut p = profile(Gender::Male);
        p.gender = None;
        assert_eq!(compute_bmr(&p), None);

        let mut p = profile(Gender::Male);
        p.weight_kg = Some(0.0);
        assert_eq!(compute_bmr(&p), None);
    }

    #[test]
    fn test_tdee_multipliers() {
        assert!((compute_tdee(1000.0, ActivityLevel::Sedentary) - 1200.0).abs() < 1e-9);
        assert!((compute_tdee(1000.0, ActivityLevel::Light) - 1375.0).abs() < 1e-9);
        assert!((compute_tdee(1000.0, ActivityLevel::Moderate) - 1550.0).abs() < 1e-9);
        assert!((compute_tdee(1000.0, ActivityLevel::Active) - 1725.0).abs() < 1e-9);
        assert!((compute_tdee(1000.0, ActivityLevel::VeryActive) - 1900.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_activity_uses_sedentary() {
        let level = ActivityLevel::from_str_lossy("marathoner");
        assert!((compute_tdee(1780.0, level) - 2136.0).abs() < 1e-9);
    }
}
