//! Task model: the backlog item the prioritization engine scores and ranks.
//!
//! Only the four scoring attributes (urgency, importance, effort, due date), the
//! identifier, and the completion flag matter to the engine. Everything else is
//! carried for the stores and the CLI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasketError};

pub const MAX_TITLE_LEN: usize = 256;
pub const LEVEL_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
pub const EFFORT_RANGE: std::ops::RangeInclusive<u8> = 1..=3;

/// Core task type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,

    /// 1-5.
    pub urgency: u8,

    /// 1-5.
    pub importance: u8,

    /// 1-3 (low/medium/high cost to complete).
    pub effort: u8,

    /// Optional due date (UTC).
    pub due_date: Option<DateTime<Utc>>,

    pub complete: bool,

    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Task {
    /// Bare task with the lowest valid levels, stamped `now`. Used by tests and
    /// builders; `Task::create` is the validated entry point.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            urgency: 1,
            importance: 1,
            effort: 1,
            due_date: None,
            complete: false,
            created_at: now,
            modified_at: now,
        }
    }

    /// Validate and create a new incomplete task with a fresh v4 id.
    pub fn create(
        title: &str,
        urgency: u8,
        importance: u8,
        effort: u8,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let task = Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.trim().to_string(),
            urgency,
            importance,
            effort,
            due_date,
            complete: false,
            created_at: now,
            modified_at: now,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn with_urgency(mut self, urgency: u8) -> Self {
        self.urgency = urgency;
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_effort(mut self, effort: u8) -> Self {
        self.effort = effort;
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn completed(mut self) -> Self {
        self.complete = true;
        self
    }

    /// Flip the completion flag and touch `modified_at`.
    pub fn set_complete(&mut self, complete: bool, now: DateTime<Utc>) {
        self.complete = complete;
        self.modified_at = now;
    }

    pub fn validate(&self) -> Result<()> {
        validate_title(&self.title)?;
        validate_level("urgency", self.urgency)?;
        validate_level("importance", self.importance)?;
        validate_effort(self.effort)?;
        Ok(())
    }
}

pub fn validate_title(title: &str) -> Result<()> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TasketError::validation("title", "must not be empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LEN {
        return Err(TasketError::validation(
            "title",
            format!("must be at most {MAX_TITLE_LEN} characters, got {len}"),
        ));
    }
    Ok(())
}

pub fn validate_level(field: &str, value: u8) -> Result<()> {
    if !LEVEL_RANGE.contains(&value) {
        return Err(TasketError::validation(
            field,
            format!("must be 1..=5, got {value}"),
        ));
    }
    Ok(())
}

pub fn validate_effort(value: u8) -> Result<()> {
    if !EFFORT_RANGE.contains(&value) {
        return Err(TasketError::validation(
            "effort",
            format!("must be 1..=3, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn create_trims_title_and_stamps_times() {
        let t = Task::create("  write report  ", 3, 4, 2, None, now()).unwrap();
        assert_eq!(t.title, "write report");
        assert_eq!(t.created_at, now());
        assert_eq!(t.modified_at, now());
        assert!(!t.complete);
        assert!(uuid::Uuid::parse_str(&t.id).is_ok());
    }

    #[test]
    fn create_rejects_blank_and_long_titles() {
        assert!(Task::create("   ", 1, 1, 1, None, now()).unwrap_err().is_validation());
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(Task::create(&long, 1, 1, 1, None, now()).is_err());
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(Task::create(&exact, 1, 1, 1, None, now()).is_ok());
    }

    #[test]
    fn create_rejects_out_of_range_levels() {
        assert!(Task::create("a", 0, 1, 1, None, now()).is_err());
        assert!(Task::create("a", 1, 6, 1, None, now()).is_err());
        assert!(Task::create("a", 1, 1, 4, None, now()).is_err());
        assert!(Task::create("a", 5, 5, 3, None, now()).is_ok());
    }

    #[test]
    fn set_complete_touches_modified() {
        let mut t = Task::new("t1", "a");
        let later = now() + chrono::Duration::hours(1);
        t.set_complete(true, later);
        assert!(t.complete);
        assert_eq!(t.modified_at, later);
    }
}
