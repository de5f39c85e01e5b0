//! Database module
//!
//! SQLite connection pool, migrations, and the storage trait the tools use.

pub mod connection;
pub mod migrations;
pub mod store;

pub use connection::{Database, DbError, DbResult};
pub use store::NutritionStore;
