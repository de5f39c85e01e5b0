//! Meal record model
//!
//! A single logged food with its calories and macros. Records are immutable
//! once created; the only mutation is deletion.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::NutritionTotals;

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Meal type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" | "snacks" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_item: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub serving_size: Option<String>,
    pub created_at: String,
}

/// Validated data for a new meal record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecordCreate {
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub food_item: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fats_g: f64,
    pub serving_size: Option<String>,
}

impl MealRecord {
    /// Calories and macros of this record as totals
    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fats_g: self.fats_g,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let date_str: String = row.get("date")?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
        let meal_type_str: String = row.get("meal_type")?;
        let meal_type = MealType::from_str(&meal_type_str).ok_or_else(|| {
            rusqlite::Error::InvalidColumnType(2, format!("meal_type '{}'", meal_type_str), Type::Text)
        })?;

        Ok(Self {
            id: row.get("id")?,
            date,
            meal_type,
            food_item: row.get("food_item")?,
            calories: row.get("calories")?,
            protein_g: row.get("protein_g")?,
            carbs_g: row.get("carbs_g")?,
            fats_g: row.get("fats_g")?,
            serving_size: row.get("serving_size")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new meal record
    pub fn create(conn: &Connection, data: &MealRecordCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO meal_records (
                date, meal_type, food_item, calories, protein_g, carbs_g, fats_g, serving_size
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.date.format(DATE_FORMAT).to_string(),
                data.meal_type.as_str(),
                data.food_item,
                data.calories,
                data.protein_g,
                data.carbs_g,
                data.fats_g,
                data.serving_size,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a meal record by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_records WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List records with dates in `[start, end]`, oldest first
    pub fn list_by_date_range(
        conn: &Connection,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meal_records WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC, id ASC",
        )?;

        let records = stmt
            .query_map(
                params![
                    start.format(DATE_FORMAT).to_string(),
                    end.format(DATE_FORMAT).to_string(),
                ],
                Self::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// List every record, oldest first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meal_records ORDER BY date ASC, id ASC")?;
        let records = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Distinct dates that have at least one record, ascending
    pub fn activity_dates(conn: &Connection) -> DbResult<Vec<NaiveDate>> {
        let mut stmt = conn.prepare("SELECT DISTINCT date FROM meal_records ORDER BY date ASC")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let dates = raw
            .iter()
            .filter_map(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
            .collect();
        Ok(dates)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM meal_records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a meal record
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM meal_records WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Delete every meal record, returning how many were removed
    pub fn delete_all(conn: &Connection) -> DbResult<usize> {
        let rows = conn.execute("DELETE FROM meal_records", [])?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!(MealType::from_str("Breakfast"), Some(MealType::Breakfast));
        assert_eq!(MealType::from_str(" snack "), Some(MealType::Snack));
        assert_eq!(MealType::from_str("brunch"), None);
        for meal_type in MealType::ALL {
            assert_eq!(MealType::from_str(meal_type.as_str()), Some(meal_type));
        }
    }
}
