//! Export, import, and reset of all user data
//!
//! The export document is plain JSON:
//! `{version, exported_at, profile, goals, meals[]}`.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::db::NutritionStore;
use crate::models::{Goals, MealRecord, MealRecordCreate, Profile, DATE_FORMAT};
use crate::validation::{validate_meal, MealForm, ValidationError};

use super::ToolResult;

pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    pub exported_at: String,
    pub profile: Profile,
    pub goals: Goals,
    pub meals: Vec<MealRecord>,
}

/// How imported data combines with what is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Wipe everything, then load the document
    #[default]
    Replace,
    /// Keep stored profile and goals; add meals not already present
    Merge,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Replace => "replace",
            ImportMode::Merge => "merge",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Ok(ImportMode::Replace),
            "merge" => Ok(ImportMode::Merge),
            _ => Err(ValidationError::UnknownImportMode(s.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExportFileResponse {
    pub path: String,
    pub meals_exported: usize,
    pub bytes_written: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub mode: ImportMode,
    pub meals_imported: usize,
    pub meals_skipped: usize,
    pub profile_imported: bool,
    pub goals_imported: bool,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub meals_removed: usize,
    pub profile_reset: bool,
    pub goals_reset: bool,
}

pub fn export_data<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<ExportDocument> {
    Ok(ExportDocument {
        version: EXPORT_VERSION,
        exported_at: Utc::now().to_rfc3339(),
        profile: store.profile()?,
        goals: store.goals()?,
        meals: store.all_meals()?,
    })
}

/// Write the export document as pretty JSON
pub fn export_data_to_file<S: NutritionStore + ?Sized>(
    store: &S,
    path: &Path,
) -> ToolResult<ExportFileResponse> {
    let document = export_data(store)?;
    let json = serde_json::to_string_pretty(&document)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &json)?;
    info!(path = %path.display(), meals = document.meals.len(), "data exported");

    Ok(ExportFileResponse {
        path: path.display().to_string(),
        meals_exported: document.meals.len(),
        bytes_written: json.len(),
    })
}

/// Re-check an exported record before it is stored again
fn to_create(meal: &MealRecord) -> Result<MealRecordCreate, ValidationError> {
    validate_meal(&MealForm {
        date: meal.date.format(DATE_FORMAT).to_string(),
        meal_type: meal.meal_type.as_str().to_string(),
        food_item: meal.food_item.clone(),
        calories: Some(meal.calories),
        protein_g: Some(meal.protein_g),
        carbs_g: Some(meal.carbs_g),
        fats_g: Some(meal.fats_g),
        serving_size: meal.serving_size.clone(),
    })
}

/// Identity used to skip records already present when merging
fn merge_key(meal: &MealRecordCreate) -> (String, &'static str, String, u64) {
    (
        meal.date.format(DATE_FORMAT).to_string(),
        meal.meal_type.as_str(),
        meal.food_item.to_lowercase(),
        meal.calories.to_bits(),
    )
}

/// Load an export document
///
/// Every record is validated before anything is written, and each mode
/// writes in a single storage transaction, so a bad document or a failed
/// insert leaves storage untouched.
pub fn import_data<S: NutritionStore + ?Sized>(
    store: &S,
    document: &ExportDocument,
    mode: ImportMode,
) -> ToolResult<ImportResponse> {
    if document.version != EXPORT_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            found: document.version,
            expected: EXPORT_VERSION,
        }
        .into());
    }

    let incoming = document
        .meals
        .iter()
        .map(to_create)
        .collect::<Result<Vec<_>, _>>()?;

    let response = match mode {
        ImportMode::Replace => {
            let imported = store.replace_all(&document.profile, &document.goals, &incoming)?;
            ImportResponse {
                mode,
                meals_imported: imported,
                meals_skipped: 0,
                profile_imported: true,
                goals_imported: true,
            }
        }
        ImportMode::Merge => {
            let existing = store.all_meals()?;
            let mut seen: HashSet<_> = existing
                .iter()
                .filter_map(|m| to_create(m).ok())
                .map(|m| merge_key(&m))
                .collect();

            let fresh: Vec<MealRecordCreate> = incoming
                .into_iter()
                .filter(|m| seen.insert(merge_key(m)))
                .collect();
            let skipped = document.meals.len() - fresh.len();
            if skipped > 0 {
                warn!(skipped, "skipping meals already present");
            }
            let imported = store.add_meals(&fresh)?;
            ImportResponse {
                mode,
                meals_imported: imported,
                meals_skipped: skipped,
                profile_imported: false,
                goals_imported: false,
            }
        }
    };

    info!(mode = mode.as_str(), imported = response.meals_imported, "data imported");
    Ok(response)
}

pub fn import_data_from_file<S: NutritionStore + ?Sized>(
    store: &S,
    path: &Path,
    mode: ImportMode,
) -> ToolResult<ImportResponse> {
    let json = std::fs::read_to_string(path)?;
    let document: ExportDocument = serde_json::from_str(&json)?;
    import_data(store, &document, mode)
}

/// Remove profile, goals, and every meal record
pub fn reset_all_data<S: NutritionStore + ?Sized>(store: &S) -> ToolResult<ResetResponse> {
    let meals_removed = store.clear_all()?;
    warn!(meals_removed, "all data reset");
    Ok(ResetResponse {
        meals_removed,
        profile_reset: true,
        goals_reset: true,
    })
}
