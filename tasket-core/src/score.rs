//! Relevance scoring: urgency/importance quadrant score times a due-date multiplier.
//!
//! The quadrant rule weights importance over urgency, so "important" quadrants
//! always outscore "urgent-only" quadrants of the same magnitude:
//! `combine_relevance(1, 4) == 4.8` while `combine_relevance(4, 1) == 3.8`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Stand-in for `days_until_due` when a task has no due date.
pub const NO_DUE_DATE_DAYS: i64 = 9999;

/// Both quadrant thresholds.
const QUADRANT_THRESHOLD: u8 = 4;

const SECONDS_PER_DAY: i64 = 86_400;

/// Base score in [2.2, 7.0] for urgency, importance in 1..=5.
///
/// Inputs outside 1..=5 must be rejected upstream; the result is unspecified for them.
pub fn combine_relevance(urgency: u8, importance: u8) -> f64 {
    let u = f64::from(urgency);
    let i = f64::from(importance);
    let urgent = urgency >= QUADRANT_THRESHOLD;
    let important = importance >= QUADRANT_THRESHOLD;

    match (urgent, important) {
        (true, true) => 5.0 + u / 5.0 + i / 5.0,
        (false, true) => 4.0 + i / 5.0,
        (true, false) => 3.0 + u / 5.0,
        (false, false) => 2.0 + (u + i) / 10.0,
    }
}

/// Whole days from `now` until `due`, floored (a due date 1 hour ago is -1).
/// Missing due dates yield [`NO_DUE_DATE_DAYS`].
pub fn days_until_due(due: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match due {
        Some(due) => (due - now).num_seconds().div_euclid(SECONDS_PER_DAY),
        None => NO_DUE_DATE_DAYS,
    }
}

/// Multiplier applied to the base score.
pub fn due_date_multiplier(days_until_due: i64) -> f64 {
    match days_until_due {
        // overdue: grows without bound the longer it's overdue
        d if d < 0 => 1.5 + 0.05 * d.unsigned_abs() as f64,
        0 => 1.5,
        1..=6 => 1.25,
        _ => 1.0,
    }
}

/// Derived scoring fields for one task, computed fresh per ranking pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Relevance {
    pub combined_relevance: f64,
    pub has_due_date: bool,
    pub days_until_due: i64,
    pub due_date_multiplier: f64,
    pub relevance_score: f64,
}

impl Relevance {
    pub fn of(task: &Task, now: DateTime<Utc>) -> Self {
        let combined_relevance = combine_relevance(task.urgency, task.importance);
        let days_until_due = days_until_due(task.due_date, now);
        let due_date_multiplier = due_date_multiplier(days_until_due);

        Self {
            combined_relevance,
            has_due_date: task.due_date.is_some(),
            days_until_due,
            due_date_multiplier,
            relevance_score: combined_relevance * due_date_multiplier,
        }
    }
}
