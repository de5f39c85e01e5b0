//! Utility to seed the profile (and optionally goals) from the command line
//!
//! Usage: set_profile age=30 gender=male height_cm=180 weight_kg=80 \
//!        activity_level=moderate goal=lose-weight [--auto-goals]

use nutrack::db::Database;
use nutrack::tools::{goals, profile};
use nutrack::validation::{parse_number, ProfileForm};

fn parse_args(args: &[String]) -> Result<(ProfileForm, bool), Box<dyn std::error::Error>> {
    let mut form = ProfileForm::default();
    let mut auto_goals = false;

    for arg in args {
        if arg == "--auto-goals" {
            auto_goals = true;
            continue;
        }
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{}'", arg))?;
        match key {
            "age" => form.age = Some(parse_number("age", value)?),
            "gender" => form.gender = Some(value.to_string()),
            "height_cm" => form.height_cm = Some(parse_number("height_cm", value)?),
            "weight_kg" => form.weight_kg = Some(parse_number("weight_kg", value)?),
            "activity_level" => form.activity_level = Some(value.to_string()),
            "goal" => form.goal = Some(value.to_string()),
            other => return Err(format!("unknown field '{}'", other).into()),
        }
    }

    Ok((form, auto_goals))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (form, auto_goals) = parse_args(&args)?;

    let db_path = nutrack::config::database_path();
    println!("Database path: {}", db_path.display());
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;
    database.with_conn(|conn| {
        nutrack::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let updated = profile::update_profile(&database, &form)?;
    println!("Profile set:");
    println!("{}", serde_json::to_string_pretty(&updated)?);

    if auto_goals {
        let derived = goals::auto_set_goals(&database)?;
        println!("Goals derived from profile:");
        println!("{}", serde_json::to_string_pretty(&derived)?);
    }

    Ok(())
}
