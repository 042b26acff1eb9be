//! Completion streaks.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use stride_core::calendar::local_date;
use stride_core::entities::Task;

/// Local calendar dates with at least one recorded completion.
#[must_use]
pub fn completion_dates(tasks: &[Task]) -> BTreeSet<NaiveDate> {
    tasks
        .iter()
        .flat_map(Task::completions)
        .map(local_date)
        .collect()
}

/// Consecutive completion days ending today, or yesterday if nothing has been
/// completed yet today. Any earlier gap yields zero.
#[must_use]
pub fn current_streak(tasks: &[Task], today: NaiveDate) -> u32 {
    let dates = completion_dates(tasks);
    let start = if dates.contains(&today) {
        Some(today)
    } else {
        today.pred_opt().filter(|yesterday| dates.contains(yesterday))
    };

    let mut streak = 0;
    let mut cursor = start;
    while let Some(day) = cursor.filter(|d| dates.contains(d)) {
        streak += 1;
        cursor = day.checked_sub_days(Days::new(1));
    }
    streak
}
