//! Profile model
//!
//! Body measurements, activity level, and goal used to derive calorie and
//! macro targets. Stored as a single row.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Gender, used for the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// No BMR adjustment
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Activity level for TDEE scaling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    /// Little or no exercise
    #[default]
    Sedentary,
    /// Light exercise 1-3 days/week
    Light,
    /// Moderate exercise 3-5 days/week
    Moderate,
    /// Hard exercise 6-7 days/week
    Active,
    /// Physical job or training twice a day
    VeryActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
            ActivityLevel::VeryActive => "very-active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            "very-active" => Some(ActivityLevel::VeryActive),
            _ => None,
        }
    }

    /// Parse a stored value; unrecognized levels fall back to sedentary
    pub fn from_str_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// What the user is aiming for; drives calorie adjustment and macro split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalType {
    LoseWeight,
    #[default]
    MaintainWeight,
    GainWeight,
    BuildMuscle,
    ImprovePerformance,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::LoseWeight => "lose-weight",
            GoalType::MaintainWeight => "maintain-weight",
            GoalType::GainWeight => "gain-weight",
            GoalType::BuildMuscle => "build-muscle",
            GoalType::ImprovePerformance => "improve-performance",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "lose-weight" => Some(GoalType::LoseWeight),
            "maintain-weight" => Some(GoalType::MaintainWeight),
            "gain-weight" => Some(GoalType::GainWeight),
            "build-muscle" => Some(GoalType::BuildMuscle),
            "improve-performance" => Some(GoalType::ImprovePerformance),
            _ => None,
        }
    }

    /// Parse a stored value; unrecognized goals fall back to maintain-weight
    pub fn from_str_lossy(s: &str) -> Self {
        Self::from_str(s).unwrap_or_default()
    }
}

/// User profile. Measurements are optional until the user fills them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: GoalType,
}

/// Partial profile update; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<GoalType>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }

    /// Apply this update on top of an existing profile
    pub fn apply_to(&self, profile: &Profile) -> Profile {
        Profile {
            age: self.age.or(profile.age),
            gender: self.gender.or(profile.gender),
            height_cm: self.height_cm.or(profile.height_cm),
            weight_kg: self.weight_kg.or(profile.weight_kg),
            activity_level: self.activity_level.unwrap_or(profile.activity_level),
            goal: self.goal.unwrap_or(profile.goal),
        }
    }
}

impl Profile {
    /// True when every field needed for BMR is present
    pub fn is_complete(&self) -> bool {
        self.age.is_some()
            && self.gender.is_some()
            && self.height_cm.is_some()
            && self.weight_kg.is_some()
    }

    /// Names of the measurements still missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.age.is_none() {
            missing.push("age");
        }
        if self.gender.is_none() {
            missing.push("gender");
        }
        if self.height_cm.is_none() {
            missing.push("height_cm");
        }
        if self.weight_kg.is_none() {
            missing.push("weight_kg");
        }
        missing
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;
        let activity_level: String = row.get("activity_level")?;
        let goal: String = row.get("goal")?;
        Ok(Self {
            age: row.get("age")?,
            gender: gender.as_deref().and_then(Gender::from_str),
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            activity_level: ActivityLevel::from_str_lossy(&activity_level),
            goal: GoalType::from_str_lossy(&goal),
        })
    }

    /// Load the stored profile, if one has been saved
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let profile = conn
            .query_row("SELECT * FROM profile WHERE id = 1", [], Self::from_row)
            .optional()?;
        Ok(profile)
    }

    /// Save (upsert) the profile
    pub fn save(conn: &Connection, profile: &Profile) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO profile (id, age, gender, height_cm, weight_kg, activity_level, goal)
            VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                age = excluded.age,
                gender = excluded.gender,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                activity_level = excluded.activity_level,
                goal = excluded.goal,
                updated_at = datetime('now')
            "#,
            params![
                profile.age,
                profile.gender.map(|g| g.as_str()),
                profile.height_cm,
                profile.weight_kg,
                profile.activity_level.as_str(),
                profile.goal.as_str(),
            ],
        )?;
        Ok(())
    }

    /// Remove the stored profile so defaults apply again
    pub fn delete(conn: &Connection) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM profile WHERE id = 1", [])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_level_lossy_default() {
        assert_eq!(ActivityLevel::from_str("very_active"), Some(ActivityLevel::VeryActive));
        assert_eq!(ActivityLevel::from_str("couch"), None);
        assert_eq!(ActivityLevel::from_str_lossy("couch"), ActivityLevel::Sedentary);
    }

    #[test]
    fn test_goal_lossy_default() {
        assert_eq!(GoalType::from_str("Build-Muscle"), Some(GoalType::BuildMuscle));
        assert_eq!(GoalType::from_str_lossy("bulk"), GoalType::MaintainWeight);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&ActivityLevel::VeryActive).unwrap();
        assert_eq!(json, "\"very-active\"");
        let json = serde_json::to_string(&GoalType::ImprovePerformance).unwrap();
        assert_eq!(json, "\"improve-performance\"");
    }

    #[test]
    fn test_update_apply_and_missing_fields() {
        let profile = Profile::default();
        assert_eq!(profile.missing_fields(), vec!["age", "gender", "height_cm", "weight_kg"]);

        let update = ProfileUpdate {
            age: Some(30),
            gender: Some(Gender::Female),
            height_cm: Some(165.0),
            weight_kg: Some(60.0),
            ..Default::default()
        };
        let updated = update.apply_to(&profile);
        assert!(updated.is_complete());
        assert_eq!(updated.activity_level, ActivityLevel::Sedentary);
        assert!(ProfileUpdate::default().is_empty());
    }
}
