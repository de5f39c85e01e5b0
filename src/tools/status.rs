//! Nutrack Status Tool
//!
//! Provides runtime status information and usage instructions.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::warn;

use crate::build_info::BuildInfo;
use crate::db::NutritionStore;

/// Meal logging instructions for AI assistants
pub const USAGE_INSTRUCTIONS: &str = r#"
# Nutrack Usage Instructions

Nutrack logs meals, tracks calorie and macro goals, and summarizes intake
over time. All dates are ISO format: YYYY-MM-DD.

---

## 1. Set Up the Profile

Call `update_profile` with any of:

| Field | Values |
|-------|--------|
| age | whole years, greater than 0 |
| gender | male, female, other |
| height_cm | centimeters, greater than 0 |
| weight_kg | kilograms, greater than 0 |
| activity_level | sedentary, light, moderate, active, very-active |
| goal | lose-weight, maintain-weight, gain-weight, build-muscle, improve-performance |

Fields are merged into the stored profile; omitted fields are left unchanged.
`get_profile` returns BMI, BMR (Mifflin-St Jeor), TDEE, and the goals that
`auto_set_goals` would store.

## 2. Set Goals

- `auto_set_goals` derives goals from a complete profile:
  calorie goal = TDEE + adjustment (lose -500, gain +500, build-muscle +300,
  maintain and improve-performance 0), split into protein/carbs/fats by goal.
- `set_goals` sets any of calorie_goal, protein_goal_g, carbs_goal_g, fats_goal_g.
- `reset_goals` restores 2000 kcal, 150 g protein, 250 g carbs, 65 g fats.

## 3. Log Meals

Call `log_meal` with date, meal_type (breakfast, lunch, dinner, snack),
food_item, and macros in grams. If `calories` is omitted it is computed as
protein x 4 + carbs x 4 + fats x 9. Use `calculate_meal_calories` to preview.

Meal records cannot be edited. To correct one, `delete_meal` and log it again.

## 4. Review

- `get_dashboard` shows one day: totals, percent of each goal, remaining
  calories, meals by type, BMI, and logging streaks.
- `get_nutrition_summary` covers a date range (default last 30 days): daily
  totals, averages, macro split, calories by meal type, most logged foods,
  calorie and protein trends, and days within 10% of the calorie goal.
- `generate_nutrition_report` writes the same summary as a PDF with a chart.

## 5. Data

- `export_data` writes a JSON document with profile, goals, and meals.
- `import_data` loads one, either replacing everything or merging meals.
- `reset_all_data` deletes everything. Confirm with the user first.
"#;

/// Runtime status of the Nutrack service
#[derive(Debug, Clone, Serialize)]
pub struct NutrackStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub meal_count: Option<i64>,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status<S: NutritionStore + ?Sized>(&self, store: &S) -> NutrackStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let meal_count = match store.meal_count() {
            Ok(count) => Some(count),
            Err(e) => {
                warn!(error = %e, "could not count meal records");
                None
            }
        };

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        NutrackStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            meal_count,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
