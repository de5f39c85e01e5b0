//! Runtime configuration from the environment

use std::path::PathBuf;

/// Overrides the database location
pub const DATABASE_PATH_VAR: &str = "NUTRACK_DATABASE_PATH";
/// Directive added to `RUST_LOG` filtering
pub const DEFAULT_LOG_DIRECTIVE: &str = "nutrack=info";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_directive: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            log_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }
}

/// Database path from `NUTRACK_DATABASE_PATH`, else `<project>/data/nutrack.db`
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Binaries live in target/{debug,release}; step back to the project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(root) = path.parent().and_then(|p| p.parent()) {
            path = root.to_path_buf();
        }
    }

    path.push("data");
    path.push("nutrack.db");
    path
}
