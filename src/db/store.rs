//! Storage trait
//!
//! Everything the tools need from persistence. The calculator never sees
//! this; tools load plain values through it and pass them in.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Goals, MealRecord, MealRecordCreate, Profile};
use super::{Database, DbResult};

/// Persistence collaborator for profile, goals, and meal records
pub trait NutritionStore {
    /// Stored profile, or the default profile when none was saved
    fn profile(&self) -> DbResult<Profile>;
    fn save_profile(&self, profile: &Profile) -> DbResult<()>;
    fn reset_profile(&self) -> DbResult<()>;

    /// Stored goals, or the default goals when none were saved
    fn goals(&self) -> DbResult<Goals>;
    fn save_goals(&self, goals: &Goals) -> DbResult<()>;
    fn reset_goals(&self) -> DbResult<()>;

    fn add_meal(&self, data: &MealRecordCreate) -> DbResult<MealRecord>;
    fn meal(&self, id: i64) -> DbResult<Option<MealRecord>>;
    fn delete_meal(&self, id: i64) -> DbResult<bool>;
    /// Records dated within `[start, end]`, oldest first
    fn meals_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<MealRecord>>;
    fn all_meals(&self) -> DbResult<Vec<MealRecord>>;
    /// Distinct dates with at least one record
    fn activity_dates(&self) -> DbResult<Vec<NaiveDate>>;
    fn meal_count(&self) -> DbResult<i64>;

    /// Insert many records atomically; returns how many were inserted
    fn add_meals(&self, meals: &[MealRecordCreate]) -> DbResult<usize>;
    /// Remove profile, goals, and all meal records; returns meals removed
    fn clear_all(&self) -> DbResult<usize>;
    /// Swap all stored data for the given profile, goals, and records in one
    /// transaction; returns how many records were inserted
    fn replace_all(&self, profile: &Profile, goals: &Goals, meals: &[MealRecordCreate]) -> DbResult<usize>;
}

impl NutritionStore for Database {
    fn profile(&self) -> DbResult<Profile> {
        self.with_conn(|conn| Ok(Profile::get(conn)?.unwrap_or_default()))
    }

    fn save_profile(&self, profile: &Profile) -> DbResult<()> {
        debug!(?profile, "saving profile");
        self.with_conn(|conn| Profile::save(conn, profile))
    }

    fn reset_profile(&self) -> DbResult<()> {
        self.with_conn(|conn| Profile::delete(conn).map(|_| ()))
    }

    fn goals(&self) -> DbResult<Goals> {
        self.with_conn(|conn| Ok(Goals::get(conn)?.unwrap_or_default()))
    }

    fn save_goals(&self, goals: &Goals) -> DbResult<()> {
        debug!(?goals, "saving goals");
        self.with_conn(|conn| Goals::save(conn, goals))
    }

    fn reset_goals(&self) -> DbResult<()> {
        self.with_conn(|conn| Goals::delete(conn).map(|_| ()))
    }

    fn add_meal(&self, data: &MealRecordCreate) -> DbResult<MealRecord> {
        self.with_conn(|conn| MealRecord::create(conn, data))
    }

    fn meal(&self, id: i64) -> DbResult<Option<MealRecord>> {
        self.with_conn(|conn| MealRecord::get_by_id(conn, id))
    }

    fn delete_meal(&self, id: i64) -> DbResult<bool> {
        self.with_conn(|conn| MealRecord::delete(conn, id))
    }

    fn meals_between(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<MealRecord>> {
        self.with_conn(|conn| MealRecord::list_by_date_range(conn, start, end))
    }

    fn all_meals(&self) -> DbResult<Vec<MealRecord>> {
        self.with_conn(MealRecord::list_all)
    }

    fn activity_dates(&self) -> DbResult<Vec<NaiveDate>> {
        self.with_conn(MealRecord::activity_dates)
    }

    fn meal_count(&self) -> DbResult<i64> {
        self.with_conn(MealRecord::count)
    }

    fn add_meals(&self, meals: &[MealRecordCreate]) -> DbResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            for meal in meals {
                MealRecord::create(&tx, meal)?;
            }
            tx.commit()?;
            Ok(meals.len())
        })
    }

    fn clear_all(&self) -> DbResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            Profile::delete(&tx)?;
            Goals::delete(&tx)?;
            let removed = MealRecord::delete_all(&tx)?;
            tx.commit()?;
            Ok(removed)
        })
    }

    fn replace_all(&self, profile: &Profile, goals: &Goals, meals: &[MealRecordCreate]) -> DbResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            Profile::delete(&tx)?;
            Goals::delete(&tx)?;
            let removed = MealRecord::delete_all(&tx)?;
            Profile::save(&tx, profile)?;
            Goals::save(&tx, goals)?;
            for meal in meals {
                MealRecord::create(&tx, meal)?;
            }
            tx.commit()?;
            debug!(removed, inserted = meals.len(), "all data replaced");
            Ok(meals.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, GoalType, MealType};

    fn meal(date: &str, food: &str, calories: f64) -> MealRecordCreate {
        MealRecordCreate {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            meal_type: MealType::Lunch,
            food_item: food.to_string(),
            calories,
            protein_g: 10.0,
            carbs_g: 20.0,
            fats_g: 5.0,
            serving_size: Some("1 bowl".to_string()),
        }
    }

    #[test]
    fn test_profile_defaults_and_round_trip() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.profile().unwrap(), Profile::default());

        let profile = Profile {
            age: Some(30),
            gender: Some(Gender::Male),
            height_cm: Some(180.0),
            weight_kg: Some(80.0),
            goal: GoalType::BuildMuscle,
            ..Default::default()
        };
        db.save_profile(&profile).unwrap();
        assert_eq!(db.profile().unwrap(), profile);

        db.reset_profile().unwrap();
        assert_eq!(db.profile().unwrap(), Profile::default());
    }

    #[test]
    fn test_goals_defaults_and_round_trip() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.goals().unwrap(), Goals::default());

        let goals = Goals {
            calorie_goal: 2400.0,
            protein_goal_g: 180.0,
            carbs_goal_g: 240.0,
            fats_goal_g: 80.0,
        };
        db.save_goals(&goals).unwrap();
        assert_eq!(db.goals().unwrap(), goals);

        db.reset_goals().unwrap();
        assert_eq!(db.goals().unwrap(), Goals::default());
    }

    #[test]
    fn test_meals_by_date_range() {
        let db = Database::in_memory().unwrap();
        db.add_meal(&meal("2025-03-01", "Oatmeal", 300.0)).unwrap();
        db.add_meal(&meal("2025-03-02", "Chicken salad", 450.0)).unwrap();
        db.add_meal(&meal("2025-03-05", "Pasta", 700.0)).unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        let meals = db.meals_between(start, end).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].food_item, "Oatmeal");
        assert_eq!(meals[1].serving_size.as_deref(), Some("1 bowl"));

        assert_eq!(db.activity_dates().unwrap().len(), 3);
        assert_eq!(db.meal_count().unwrap(), 3);
    }

    #[test]
    fn test_delete_and_clear() {
        let db = Database::in_memory().unwrap();
        let created = db.add_meal(&meal("2025-03-01", "Toast", 150.0)).unwrap();
        assert!(db.meal(created.id).unwrap().is_some());
        assert!(db.delete_meal(created.id).unwrap());
        assert!(!db.delete_meal(created.id).unwrap());
        assert!(db.meal(created.id).unwrap().is_none());

        let inserted = db
            .add_meals(&[meal("2025-03-01", "A", 1.0), meal("2025-03-02", "B", 2.0)])
            .unwrap();
        assert_eq!(inserted, 2);
        db.save_goals(&Goals { calorie_goal: 1800.0, ..Goals::default() }).unwrap();

        assert_eq!(db.clear_all().unwrap(), 2);
        assert_eq!(db.meal_count().unwrap(), 0);
        assert_eq!(db.goals().unwrap(), Goals::default());
    }

    #[test]
    fn test_replace_all() {
        let db = Database::in_memory().unwrap();
        db.add_meal(&meal("2025-03-01", "Toast", 150.0)).unwrap();

        let profile = Profile { age: Some(52), ..Default::default() };
        let goals = Goals { calorie_goal: 2200.0, ..Goals::default() };
        let inserted = db
            .replace_all(&profile, &goals, &[meal("2025-04-01", "Soup", 300.0), meal("2025-04-02", "Rice", 400.0)])
            .unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(db.meal_count().unwrap(), 2);
        assert_eq!(db.profile().unwrap(), profile);
        assert_eq!(db.goals().unwrap(), goals);
    }

    #[test]
    fn test_replace_all_rolls_back_on_failed_insert() {
        let db = Database::in_memory().unwrap();
        db.add_meal(&meal("2025-03-01", "Toast", 150.0)).unwrap();
        let goals = Goals { calorie_goal: 1800.0, ..Goals::default() };
        db.save_goals(&goals).unwrap();

        // SQLite binds NaN as NULL, which the NOT NULL column rejects
        let result = db.replace_all(
            &Profile::default(),
            &Goals::default(),
            &[meal("2025-04-01", "Soup", 300.0), meal("2025-04-02", "Broken", f64::NAN)],
        );
        assert!(result.is_err());
        assert_eq!(db.meal_count().unwrap(), 1);
        assert_eq!(db.goals().unwrap(), goals);
    }
}
