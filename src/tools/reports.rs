//! Report generation tools
//!
//! Generate a PDF nutrition report with a summary, a per-day table, and a
//! calorie trend chart drawn against the calorie goal.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use printpdf::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::NutritionStore;
use crate::models::{Profile, DATE_FORMAT};
use crate::nutrition::{profile_bmi, DailyTotals, TrendDirection};
use crate::validation::parse_date_range;

use super::analytics::{is_on_target, summarize, NutritionSummary, DEFAULT_SUMMARY_DAYS};
use super::{ToolError, ToolResult};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 60);         // Dark green
const COLOR_ON_TARGET: (u8, u8, u8) = (0, 176, 80);     // Green
const COLOR_UNDER: (u8, u8, u8) = (255, 140, 0);        // Orange
const COLOR_OVER: (u8, u8, u8) = (192, 0, 0);           // Red
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// Letter size, portrait
const PAGE_WIDTH: f32 = 215.9;
const PAGE_HEIGHT: f32 = 279.4;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 20.0;

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub file_path: String,
    pub total_meals: usize,
    pub days_logged: usize,
    pub date_range: String,
    pub message: String,
}

fn day_of_week_abbrev(date: &NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Row color for a day's calories relative to the goal
fn calorie_color(calories: f64, calorie_goal: f64) -> (u8, u8, u8) {
    if calorie_goal <= 0.0 {
        COLOR_BLACK
    } else if is_on_target(calories, calorie_goal) {
        COLOR_ON_TARGET
    } else if calories < calorie_goal {
        COLOR_UNDER
    } else {
        COLOR_OVER
    }
}

fn trend_label(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Increasing => "Increasing",
        TrendDirection::Decreasing => "Decreasing",
        TrendDirection::Stable => "Stable",
    }
}

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Daily calories with the goal line, as PNG bytes
pub fn render_calorie_chart(
    daily: &[DailyTotals],
    calorie_goal: f64,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if daily.is_empty() {
        return Err("No data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let peak = daily
            .iter()
            .map(|d| d.totals.calories)
            .fold(calorie_goal, f64::max);
        let y_max = (peak * 1.15).max(100.0);
        let x_max = daily.len() as i32;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..x_max, 0.0..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(daily.len().min(10))
            .x_label_formatter(&|x| {
                if *x >= 0 && (*x as usize) < daily.len() {
                    daily[*x as usize].date.format("%m/%d").to_string()
                } else {
                    String::new()
                }
            })
            .y_desc("kcal")
            .draw()
            .map_err(|e| e.to_string())?;

        // On-target band around the goal
        if calorie_goal > 0.0 {
            let low = calorie_goal * 0.9;
            let high = calorie_goal * 1.1;
            chart
                .draw_series(std::iter::once(Polygon::new(
                    vec![(0, low), (x_max, low), (x_max, high), (0, high)],
                    RGBColor(0, 176, 80).mix(0.12),
                )))
                .map_err(|e| e.to_string())?;

            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0, calorie_goal), (x_max, calorie_goal)],
                    RGBColor(0, 176, 80).stroke_width(2),
                )))
                .map_err(|e| e.to_string())?
                .label(format!("Goal ({:.0} kcal)", calorie_goal))
                .legend(|(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], RGBColor(0, 176, 80).stroke_width(2))
                });
        }

        let points: Vec<(i32, f64)> = daily
            .iter()
            .enumerate()
            .map(|(i, d)| (i as i32, d.totals.calories))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), BLUE.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Calories")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .draw_series(points.iter().map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())))
            .map_err(|e| e.to_string())?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    // Convert RGB buffer to PNG
    let img = ::image::RgbImage::from_raw(width, height, buffer)
        .ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    ::image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ::image::ImageFormat::Png)
        .map_err(|e| e.to_string())?;

    Ok(png_bytes)
}

// ============================================================================
// PDF Generation Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, Mm(x), Mm(y), font);
}

fn add_line(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    };
    layer.add_line(line);
}

fn profile_line(profile: &Profile) -> String {
    let mut parts = Vec::new();
    if let Some(age) = profile.age {
        parts.push(format!("Age {}", age));
    }
    if let Some(gender) = profile.gender {
        parts.push(gender.as_str().to_string());
    }
    if let Some(height) = profile.height_cm {
        parts.push(format!("{:.0} cm", height));
    }
    if let Some(weight) = profile.weight_kg {
        parts.push(format!("{:.1} kg", weight));
    }
    if let Some(bmi) = profile_bmi(profile) {
        parts.push(format!("BMI {:.1}", bmi));
    }
    parts.push(format!("Goal: {}", profile.goal.as_str()));
    parts.join("  |  ")
}

// ============================================================================
// Report Generation
// ============================================================================

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn write_summary_page(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    summary: &NutritionSummary,
    profile: &Profile,
    today: NaiveDate,
) -> f32 {
    let mut y = PAGE_HEIGHT - 20.0;

    add_text(layer, &fonts.bold, "Nutrition Report", MARGIN_LEFT, y, 18.0, COLOR_TITLE);
    y -= 10.0;

    add_text(layer, &fonts.regular, &profile_line(profile), MARGIN_LEFT, y, 10.0, COLOR_BLACK);
    y -= 6.0;

    add_text(layer, &fonts.regular, &format!("Report Period: {}", summary.range), MARGIN_LEFT, y, 11.0, COLOR_BLACK);
    add_text(
        layer,
        &fonts.regular,
        &format!("Generated: {}", today.format(DATE_FORMAT)),
        120.0,
        y,
        11.0,
        COLOR_BLACK,
    );
    y -= 10.0;

    add_line(layer, MARGIN_LEFT, 200.0, y, COLOR_GRAY, 0.5);
    y -= 8.0;

    add_text(layer, &fonts.bold, "Summary", MARGIN_LEFT, y, 12.0, COLOR_BLACK);
    y -= 7.0;

    let goals = &summary.goals;
    let avg = &summary.average_daily;
    let rows = [
        (
            format!("Days Logged: {} of {}", summary.days_logged, summary.days_in_range),
            format!("Meals Logged: {}", summary.total_meals),
        ),
        (
            format!("Avg Calories: {:.0} / {:.0} kcal", avg.calories, goals.calorie_goal),
            format!("Days On Target: {}", summary.days_on_target),
        ),
        (
            format!("Avg Protein: {:.0} / {:.0} g", avg.protein_g, goals.protein_goal_g),
            format!("Avg Carbs: {:.0} / {:.0} g", avg.carbs_g, goals.carbs_goal_g),
        ),
        (
            format!("Avg Fats: {:.0} / {:.0} g", avg.fats_g, goals.fats_goal_g),
            format!(
                "Macro Split (P/C/F): {}% / {}% / {}%",
                summary.macro_breakdown.protein_pct,
                summary.macro_breakdown.carbs_pct,
                summary.macro_breakdown.fats_pct
            ),
        ),
        (
            format!(
                "Calorie Trend: {} ({:+.1} kcal/day)",
                trend_label(summary.calorie_trend.direction),
                summary.calorie_trend.slope
            ),
            format!(
                "Streak: {} days (longest {})",
                summary.streaks.current, summary.streaks.longest
            ),
        ),
    ];
    for (left, right) in rows.iter() {
        add_text(layer, &fonts.regular, left, MARGIN_LEFT, y, 10.0, COLOR_BLACK);
        add_text(layer, &fonts.regular, right, 100.0, y, 10.0, COLOR_BLACK);
        y -= 6.0;
    }
    y -= 6.0;

    y
}

const TABLE_COLUMNS: [(&str, f32); 8] = [
    ("Date", 24.0),
    ("Day", 14.0),
    ("Meals", 14.0),
    ("Calories", 22.0),
    ("Protein", 20.0),
    ("Carbs", 20.0),
    ("Fats", 20.0),
    ("% Goal", 18.0),
];

fn write_table_header(layer: &PdfLayerReference, fonts: &Fonts, y: f32) {
    let mut col_x = MARGIN_LEFT;
    for (header, width) in TABLE_COLUMNS.iter() {
        add_text(layer, &fonts.bold, header, col_x, y, 9.0, COLOR_BLACK);
        col_x += width;
    }
}

/// Generate a nutrition PDF report for a date range
pub fn generate_nutrition_report<S: NutritionStore + ?Sized>(
    store: &S,
    start_date: Option<&str>,
    end_date: Option<&str>,
    output_path: &str,
    today: NaiveDate,
) -> ToolResult<GenerateReportResponse> {
    let range = parse_date_range(start_date, end_date, today, DEFAULT_SUMMARY_DAYS)?;
    let meals = store.meals_between(range.start, range.end)?;
    if meals.is_empty() {
        return Err(ToolError::NotFound(format!("Meal records for {}", range)));
    }

    let profile = store.profile()?;
    let summary = summarize(range, &meals, store.goals()?, &store.activity_dates()?, today);

    let (doc, page1, layer1) = PdfDocument::new(
        "Nutrition Report",
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ToolError::Report(e.to_string()))?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ToolError::Report(e.to_string()))?,
    };

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = write_summary_page(&layer, &fonts, &summary, &profile, today);

    // Daily table, continued onto extra pages as needed
    add_text(&layer, &fonts.bold, "Daily Totals", MARGIN_LEFT, y, 12.0, COLOR_BLACK);
    y -= 7.0;
    write_table_header(&layer, &fonts, y);
    y -= 5.0;

    let calorie_goal = summary.goals.calorie_goal;
    for day in summary.daily.iter() {
        if y < MARGIN_BOTTOM {
            let (page, page_layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Table Page");
            layer = doc.get_page(page).get_layer(page_layer);
            y = PAGE_HEIGHT - 20.0;
            write_table_header(&layer, &fonts, y);
            y -= 5.0;
        }

        let pct = if calorie_goal > 0.0 {
            format!("{:.0}%", day.totals.calories / calorie_goal * 100.0)
        } else {
            "-".to_string()
        };
        let values = [
            day.date.format(DATE_FORMAT).to_string(),
            day_of_week_abbrev(&day.date).to_string(),
            day.meal_count.to_string(),
            format!("{:.0}", day.totals.calories),
            format!("{:.0} g", day.totals.protein_g),
            format!("{:.0} g", day.totals.carbs_g),
            format!("{:.0} g", day.totals.fats_g),
            pct,
        ];
        let row_color = calorie_color(day.totals.calories, calorie_goal);

        let mut col_x = MARGIN_LEFT;
        for (i, value) in values.iter().enumerate() {
            let color = if i == 3 || i == 7 { row_color } else { COLOR_BLACK };
            add_text(&layer, &fonts.regular, value, col_x, y, 8.0, color);
            col_x += TABLE_COLUMNS[i].1;
        }
        y -= 4.5;
    }

    // ========================================================================
    // Landscape page for the chart
    // ========================================================================
    let (chart_page, chart_layer) = doc.add_page(Mm(PAGE_HEIGHT), Mm(PAGE_WIDTH), "Chart Page");
    let layer2 = doc.get_page(chart_page).get_layer(chart_layer);
    let mut y2 = PAGE_WIDTH - 20.0;

    add_text(&layer2, &fonts.bold, "Calorie Trend", MARGIN_LEFT, y2, 16.0, COLOR_TITLE);
    add_text(&layer2, &fonts.regular, &summary.range.to_string(), 100.0, y2, 11.0, COLOR_BLACK);
    y2 -= 10.0;

    match render_calorie_chart(&summary.daily, calorie_goal, 1000, 400) {
        Ok(png_bytes) => {
            let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes)
                .map_err(|e| ToolError::Report(e.to_string()))?;
            let pdf_image = Image::from_dynamic_image(&dynamic_image);

            // 1000x400 px at 120 DPI is about 212 x 85 mm
            let transform = ImageTransform {
                translate_x: Some(Mm(MARGIN_LEFT)),
                translate_y: Some(Mm(y2 - 90.0)),
                dpi: Some(120.0),
                ..Default::default()
            };

            pdf_image.add_to_layer(layer2.clone(), transform);
            y2 -= 95.0;
        }
        Err(e) => {
            warn!(error = %e, "calorie chart could not be rendered");
            add_text(&layer2, &fonts.regular, &format!("Chart generation error: {}", e), MARGIN_LEFT, y2 - 10.0, 9.0, COLOR_OVER);
            y2 -= 15.0;
        }
    }

    y2 -= 5.0;
    add_text(&layer2, &fonts.bold, "Legend:", MARGIN_LEFT, y2, 10.0, COLOR_BLACK);
    add_text(&layer2, &fonts.regular, "On target (within 10%)", 45.0, y2, 10.0, COLOR_ON_TARGET);
    add_text(&layer2, &fonts.regular, "Under goal", 110.0, y2, 10.0, COLOR_UNDER);
    add_text(&layer2, &fonts.regular, "Over goal", 150.0, y2, 10.0, COLOR_OVER);
    y2 -= 10.0;

    // Meal-type split and most logged foods, side by side
    add_text(&layer2, &fonts.bold, "Calories by Meal", MARGIN_LEFT, y2, 12.0, COLOR_BLACK);
    add_text(&layer2, &fonts.bold, "Most Logged Foods", 120.0, y2, 12.0, COLOR_BLACK);
    y2 -= 6.0;

    let rows = summary.meal_types.len().max(summary.top_foods.len().min(5));
    for i in 0..rows {
        if let Some(share) = summary.meal_types.get(i) {
            add_text(
                &layer2,
                &fonts.regular,
                &format!("{}: {:.0} kcal ({}%)", share.meal_type.as_str(), share.calories, share.calories_pct),
                MARGIN_LEFT,
                y2,
                9.0,
                COLOR_BLACK,
            );
        }
        if let Some(food) = summary.top_foods.get(i).filter(|_| i < 5) {
            add_text(
                &layer2,
                &fonts.regular,
                &format!("{} x{} ({:.0} kcal)", food.food_item, food.times_logged, food.total_calories),
                120.0,
                y2,
                9.0,
                COLOR_BLACK,
            );
        }
        y2 -= 5.0;
    }

    // Save PDF
    let path = Path::new(output_path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| ToolError::Report(e.to_string()))?;

    info!(path = output_path, meals = summary.total_meals, days = summary.days_logged, "nutrition report written");

    Ok(GenerateReportResponse {
        success: true,
        file_path: output_path.to_string(),
        total_meals: summary.total_meals,
        days_logged: summary.days_logged,
        date_range: summary.range.to_string(),
        message: format!(
            "Nutrition report generated with {} meals over {} days",
            summary.total_meals, summary.days_logged
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::tools::meals::log_meal;
    use crate::validation::MealForm;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_calorie_color() {
        assert_eq!(calorie_color(2000.0, 2000.0), COLOR_ON_TARGET);
        assert_eq!(calorie_color(1500.0, 2000.0), COLOR_UNDER);
        assert_eq!(calorie_color(2500.0, 2000.0), COLOR_OVER);
        assert_eq!(calorie_color(2500.0, 0.0), COLOR_BLACK);
    }

    #[test]
    fn test_chart_requires_data() {
        assert!(render_calorie_chart(&[], 2000.0, 200, 100).is_err());
    }

    #[test]
    fn test_report_with_no_meals() {
        let db = Database::in_memory().unwrap();
        let path = std::env::temp_dir().join("nutrack_empty_report.pdf");
        let result = generate_nutrition_report(&db, None, None, path.to_str().unwrap(), today());
        assert!(matches!(result, Err(ToolError::NotFound(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_generate_report() {
        let db = Database::in_memory().unwrap();
        for (date, calories) in [("2025-03-08", 1900.0), ("2025-03-09", 2600.0), ("2025-03-10", 1200.0)] {
            let form = MealForm {
                date: date.to_string(),
                meal_type: "dinner".to_string(),
                food_item: "Curry".to_string(),
                calories: Some(calories),
                protein_g: Some(60.0),
                carbs_g: Some(200.0),
                fats_g: Some(50.0),
                serving_size: None,
            };
            log_meal(&db, &form).unwrap();
        }

        let path = std::env::temp_dir().join(format!("nutrack_report_{}.pdf", std::process::id()));
        let response = generate_nutrition_report(
            &db,
            Some("2025-03-01"),
            Some("2025-03-10"),
            path.to_str().unwrap(),
            today(),
        )
        .unwrap();

        assert!(response.success);
        assert_eq!(response.total_meals, 3);
        assert_eq!(response.days_logged, 3);
        assert_eq!(response.date_range, "2025-03-01 to 2025-03-10");

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(&path);
    }
}
