//! Logging streaks
//!
//! Consecutive calendar days with at least one meal record.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Run ending today, or yesterday if nothing is logged today yet
    pub current: u32,
    pub longest: u32,
}

/// Current and longest streaks
///
/// `today` is passed in so the result depends only on its inputs. Dates after
/// `today` count toward the longest streak but never toward the current one.
pub fn compute_streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    let unique: BTreeSet<NaiveDate> = dates.iter().copied().collect();
    if unique.is_empty() {
        return Streaks::default();
    }

    let yesterday = today - Duration::days(1);
    let anchor = if unique.contains(&today) {
        Some(today)
    } else if unique.contains(&yesterday) {
        Some(yesterday)
    } else {
        None
    };

    let mut current = 0;
    if let Some(mut day) = anchor {
        while unique.contains(&day) {
            current += 1;
            day -= Duration::days(1);
        }
    }

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in &unique {
        run = match previous {
            Some(prev) if *day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    Streaks { current, longest }
}
