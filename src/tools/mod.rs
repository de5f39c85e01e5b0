//! Nutrack tools
//!
//! Host-facing operations. Each loads what it needs through a
//! `NutritionStore`, hands plain values to the calculator, and returns a
//! serialisable response.

use thiserror::Error;

use crate::db::DbError;
use crate::validation::ValidationError;

pub mod analytics;
pub mod dashboard;
pub mod data;
pub mod goals;
pub mod meals;
pub mod profile;
pub mod reports;
pub mod status;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Profile is incomplete; missing: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("No positive calorie goal can be derived from this profile (calculated {0} kcal)")]
    GoalsUnavailable(u32),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Report error: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// True when the caller sent bad input rather than the service failing
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ToolError::Validation(_) | ToolError::Incomplete(_) | ToolError::GoalsUnavailable(_)
        )
    }
}

pub type ToolResult<T> = Result<T, ToolError>;
