//! Daily calorie and macro goals
//!
//! Stored as a single row; falls back to defaults when never set.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

pub const DEFAULT_CALORIE_GOAL: f64 = 2000.0;
pub const DEFAULT_PROTEIN_GOAL_G: f64 = 150.0;
pub const DEFAULT_CARBS_GOAL_G: f64 = 250.0;
pub const DEFAULT_FATS_GOAL_G: f64 = 65.0;

/// Daily targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub calorie_goal: f64,
    pub protein_goal_g: f64,
    pub carbs_goal_g: f64,
    pub fats_goal_g: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            calorie_goal: DEFAULT_CALORIE_GOAL,
            protein_goal_g: DEFAULT_PROTEIN_GOAL_G,
            carbs_goal_g: DEFAULT_CARBS_GOAL_G,
            fats_goal_g: DEFAULT_FATS_GOAL_G,
        }
    }
}

/// Partial goals update
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GoalsUpdate {
    pub calorie_goal: Option<f64>,
    pub protein_goal_g: Option<f64>,
    pub carbs_goal_g: Option<f64>,
    pub fats_goal_g: Option<f64>,
}

impl GoalsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == GoalsUpdate::default()
    }

    pub fn apply_to(&self, goals: &Goals) -> Goals {
        Goals {
            calorie_goal: self.calorie_goal.unwrap_or(goals.calorie_goal),
            protein_goal_g: self.protein_goal_g.unwrap_or(goals.protein_goal_g),
            carbs_goal_g: self.carbs_goal_g.unwrap_or(goals.carbs_goal_g),
            fats_goal_g: self.fats_goal_g.unwrap_or(goals.fats_goal_g),
        }
    }
}

impl Goals {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            calorie_goal: row.get("calorie_goal")?,
            protein_goal_g: row.get("protein_goal_g")?,
            carbs_goal_g: row.get("carbs_goal_g")?,
            fats_goal_g: row.get("fats_goal_g")?,
        })
    }

    /// Load stored goals, if any
    pub fn get(conn: &Connection) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE id = 1")?;

        match stmt.query_row([], Self::from_row) {
            Ok(goals) => Ok(Some(goals)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Save (upsert) goals
    pub fn save(conn: &Connection, goals: &Goals) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO goals (id, calorie_goal, protein_goal_g, carbs_goal_g, fats_goal_g)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                calorie_goal = excluded.calorie_goal,
                protein_goal_g = excluded.protein_goal_g,
                carbs_goal_g = excluded.carbs_goal_g,
                fats_goal_g = excluded.fats_goal_g,
                updated_at = datetime('now')
            "#,
            params![
                goals.calorie_goal,
                goals.protein_goal_g,
                goals.carbs_goal_g,
                goals.fats_goal_g,
            ],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM goals WHERE id = 1", [])?;
        Ok(rows > 0)
    }
}
