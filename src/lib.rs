//! Nutrack Library
//!
//! Nutrition calculations, meal storage, and the MCP tools built on them.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
pub mod validation;
