//! Nutrack MCP Server Implementation
//!
//! Implements the MCP server with all Nutrack tools.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::error;

use crate::db::Database;
use crate::tools::data::ImportMode;
use crate::tools::status::StatusTracker;
use crate::tools::{analytics, dashboard, data, goals, meals, profile, reports, ToolError};
use crate::validation::{GoalsForm, MealForm, ProfileForm};

/// Nutrack MCP Service
#[derive(Clone)]
pub struct NutrackService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<NutrackService>,
}

impl NutrackService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Bad input becomes `invalid_params`; everything else is an internal error
fn to_mcp_error(e: ToolError) -> McpError {
    if e.is_invalid_input() {
        McpError::invalid_params(e.to_string(), None)
    } else {
        error!(error = %e, "tool failed");
        McpError::internal_error(e.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Profile and Goals Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    /// Age in whole years
    pub age: Option<f64>,
    /// male, female, or other
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// sedentary, light, moderate, active, or very-active
    pub activity_level: Option<String>,
    /// lose-weight, maintain-weight, gain-weight, build-muscle, or improve-performance
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetGoalsParams {
    pub calorie_goal: Option<f64>,
    pub protein_goal_g: Option<f64>,
    pub carbs_goal_g: Option<f64>,
    pub fats_goal_g: Option<f64>,
}

// ============================================================================
// Meal Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    /// Date in YYYY-MM-DD format
    pub date: String,
    /// breakfast, lunch, dinner, or snack
    pub meal_type: String,
    pub food_item: String,
    /// Omit to compute from macros (protein x 4 + carbs x 4 + fats x 9)
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fats_g: Option<f64>,
    /// Free text, e.g. "1 cup" or "200 g"
    pub serving_size: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MealIdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateRangeParams {
    /// Start date (YYYY-MM-DD); defaults to a window ending at end_date
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD); defaults to today
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateMealCaloriesParams {
    #[serde(default)]
    pub protein_g: f64,
    #[serde(default)]
    pub carbs_g: f64,
    #[serde(default)]
    pub fats_g: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDashboardParams {
    /// Date in YYYY-MM-DD format; defaults to today
    pub date: Option<String>,
}

// ============================================================================
// Data and Report Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportDataParams {
    /// Write the export to this file; omit to return it inline
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportDataParams {
    /// Path to a JSON file produced by export_data
    pub file_path: String,
    /// replace (default) or merge
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResetAllDataParams {
    /// Must be true; deletes profile, goals, and every meal record
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GenerateReportParams {
    /// Start date (YYYY-MM-DD); defaults to 30 days ending at end_date
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD); defaults to today
    pub end_date: Option<String>,
    /// Output file path for the PDF
    pub output_path: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl NutrackService {
    // --- Status ---

    #[tool(description = "Get the current status of the Nutrack service including build info, database status, and process information")]
    async fn nutrack_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for using Nutrack. Call this when starting a session or when unsure how to use the tools.")]
    fn usage_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::USAGE_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(USAGE_INSTRUCTIONS)]))
    }

    // --- Profile ---

    #[tool(description = "Get the user profile with BMI, BMR, TDEE, and suggested goals")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Update profile fields. Omitted fields are left unchanged.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let form = ProfileForm {
            age: p.age,
            gender: p.gender,
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            activity_level: p.activity_level,
            goal: p.goal,
        };
        let result = profile::update_profile(&self.database, &form).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Clear all profile fields")]
    fn reset_profile(&self) -> Result<CallToolResult, McpError> {
        let result = profile::reset_profile(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Goals ---

    #[tool(description = "Get the daily calorie and macro goals")]
    fn get_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::get_goals(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Set any of the daily calorie and macro goals")]
    fn set_goals(&self, Parameters(p): Parameters<SetGoalsParams>) -> Result<CallToolResult, McpError> {
        let form = GoalsForm {
            calorie_goal: p.calorie_goal,
            protein_goal_g: p.protein_goal_g,
            carbs_goal_g: p.carbs_goal_g,
            fats_goal_g: p.fats_goal_g,
        };
        let result = goals::set_goals(&self.database, &form).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Derive and store goals from the profile (TDEE plus goal adjustment, split by goal macro ratios). Requires age, gender, height, and weight.")]
    fn auto_set_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::auto_set_goals(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Restore default goals (2000 kcal, 150 g protein, 250 g carbs, 65 g fats)")]
    fn reset_goals(&self) -> Result<CallToolResult, McpError> {
        let result = goals::reset_goals(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Meals ---

    #[tool(description = "Log a meal. Calories are computed from macros when omitted.")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let form = MealForm {
            date: p.date,
            meal_type: p.meal_type,
            food_item: p.food_item,
            calories: p.calories,
            protein_g: p.protein_g,
            carbs_g: p.carbs_g,
            fats_g: p.fats_g,
            serving_size: p.serving_size,
        };
        let result = meals::log_meal(&self.database, &form).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Get a meal record by ID")]
    fn get_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::get_meal(&self.database, p.id).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "List meal records in a date range (default: last 7 days) with totals")]
    fn list_meals(&self, Parameters(p): Parameters<DateRangeParams>) -> Result<CallToolResult, McpError> {
        let result = meals::list_meals(&self.database, p.start_date.as_deref(), p.end_date.as_deref(), today())
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete a meal record. Records cannot be edited; delete and log again to correct one.")]
    fn delete_meal(&self, Parameters(p): Parameters<MealIdParams>) -> Result<CallToolResult, McpError> {
        let result = meals::delete_meal(&self.database, p.id).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Calculate calories from macro grams (protein x 4 + carbs x 4 + fats x 9) without logging anything")]
    fn calculate_meal_calories(&self, Parameters(p): Parameters<CalculateMealCaloriesParams>) -> Result<CallToolResult, McpError> {
        let result = meals::calculate_meal_calories(p.protein_g, p.carbs_g, p.fats_g).map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Dashboard and Analytics ---

    #[tool(description = "Get one day's totals, percent of goals, remaining calories, meals by type, BMI, and logging streaks")]
    fn get_dashboard(&self, Parameters(p): Parameters<GetDashboardParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(&self.database, p.date.as_deref(), today()).map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Summarize a date range (default: last 30 days): daily totals, averages, macro split, meal-type distribution, top foods, trends, streaks, and days on target")]
    fn get_nutrition_summary(&self, Parameters(p): Parameters<DateRangeParams>) -> Result<CallToolResult, McpError> {
        let result = analytics::get_nutrition_summary(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            today(),
        )
        .map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate a PDF nutrition report with summary, daily totals table, and calorie trend chart")]
    fn generate_nutrition_report(&self, Parameters(p): Parameters<GenerateReportParams>) -> Result<CallToolResult, McpError> {
        let result = reports::generate_nutrition_report(
            &self.database,
            p.start_date.as_deref(),
            p.end_date.as_deref(),
            &p.output_path,
            today(),
        )
        .map_err(to_mcp_error)?;
        json_result(&result)
    }

    // --- Data ---

    #[tool(description = "Export profile, goals, and all meals as JSON, inline or to a file")]
    fn export_data(&self, Parameters(p): Parameters<ExportDataParams>) -> Result<CallToolResult, McpError> {
        match p.file_path {
            Some(path) => {
                let result = data::export_data_to_file(&self.database, Path::new(&path)).map_err(to_mcp_error)?;
                json_result(&result)
            }
            None => {
                let result = data::export_data(&self.database).map_err(to_mcp_error)?;
                json_result(&result)
            }
        }
    }

    #[tool(description = "Import a JSON file produced by export_data. mode=replace wipes existing data first; mode=merge adds meals not already present.")]
    fn import_data(&self, Parameters(p): Parameters<ImportDataParams>) -> Result<CallToolResult, McpError> {
        let mode = match p.mode.as_deref() {
            Some(m) => ImportMode::parse(m).map_err(|e| to_mcp_error(e.into()))?,
            None => ImportMode::default(),
        };
        let result = data::import_data_from_file(&self.database, Path::new(&p.file_path), mode)
            .map_err(to_mcp_error)?;
        json_result(&result)
    }

    #[tool(description = "Delete profile, goals, and every meal record. Requires confirm=true.")]
    fn reset_all_data(&self, Parameters(p): Parameters<ResetAllDataParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::invalid_params(
                "reset_all_data deletes everything; pass confirm=true to proceed",
                None,
            ));
        }
        let result = data::reset_all_data(&self.database).map_err(to_mcp_error)?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for NutrackService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "nutrack".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Nutrack".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Nutrack - meal logging, calorie and macro goals, and nutrition summaries. \
                 Call usage_instructions first. \
                 Profile: get/update/reset_profile. \
                 Goals: get/set/reset_goals, auto_set_goals (from profile). \
                 Meals: log_meal/get_meal/list_meals/delete_meal, calculate_meal_calories. \
                 Review: get_dashboard, get_nutrition_summary, generate_nutrition_report. \
                 Data: export_data, import_data, reset_all_data (confirm=true)."
                    .into(),
            ),
        }
    }
}
