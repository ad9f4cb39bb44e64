//! Collaborator contracts consumed by the daily selection loop.
//!
//! Persistence lives outside this crate (see `tasket-store`); these traits are
//! the seams. Every state operation takes the calendar date explicitly.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasketError};
use crate::task::Task;

/// Source of task records.
pub trait TaskSource {
    fn load(&self) -> Result<Vec<Task>>;

    fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    /// Effort of the task with `id`, or 0 when no such task exists.
    fn get_effort(&self, id: &str) -> Result<u8> {
        Ok(self.get(id)?.map_or(0, |t| t.effort))
    }
}

impl TaskSource for Vec<Task> {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self.clone())
    }
}

/// The four per-day task ID sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskList {
    Selected,
    Suggested,
    Completed,
    Rejected,
}

impl TaskList {
    pub const ALL: [TaskList; 4] = [
        TaskList::Selected,
        TaskList::Suggested,
        TaskList::Completed,
        TaskList::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::Suggested => "suggested",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskList {
    type Err = TasketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "selected" => Ok(Self::Selected),
            "suggested" => Ok(Self::Suggested),
            "completed" => Ok(Self::Completed),
            "rejected" => Ok(Self::Rejected),
            other => Err(TasketError::validation(
                "list name",
                format!("expected one of selected, suggested, completed, rejected; got '{other}'"),
            )),
        }
    }
}

/// Per-user daily state.
pub trait StateStore {
    fn velocity(&self, date: NaiveDate) -> Result<Option<u8>>;

    /// Set the day's velocity (0..=3). A day's velocity is set at most once.
    fn set_velocity(&mut self, date: NaiveDate, velocity: u8) -> Result<()>;

    fn list(&self, date: NaiveDate, list: TaskList) -> Result<Vec<String>>;

    /// Add `id`; returns false when it was already present.
    fn add_to_list(&mut self, date: NaiveDate, list: TaskList, id: &str) -> Result<bool>;

    /// Remove `id`; returns false when it was not present.
    fn remove_from_list(&mut self, date: NaiveDate, list: TaskList, id: &str) -> Result<bool>;

    fn username(&self) -> Result<Option<String>>;

    fn set_username(&mut self, username: Option<String>) -> Result<()>;
}

pub const MAX_VELOCITY: u8 = 3;

pub fn validate_velocity(velocity: u8) -> Result<()> {
    if velocity > MAX_VELOCITY {
        return Err(TasketError::validation(
            "velocity",
            format!("must be 0..={MAX_VELOCITY}, got {velocity}"),
        ));
    }
    Ok(())
}

/// Parse user input like `" 2 "` into a validated velocity.
pub fn parse_velocity(input: &str) -> Result<u8> {
    let v: u8 = input.trim().parse().map_err(|_| {
        TasketError::validation("velocity", format!("expected a number 0..={MAX_VELOCITY}, got '{}'", input.trim()))
    })?;
    validate_velocity(v)?;
    Ok(v)
}

/// Capacity consumed on `date`: total effort of that day's selected tasks.
pub fn selected_effort<S, T>(tasks: &S, state: &T, date: NaiveDate) -> Result<i32>
where
    S: TaskSource + ?Sized,
    T: StateStore + ?Sized,
{
    let mut total = 0i32;
    for id in state.list(date, TaskList::Selected)? {
        total += i32::from(tasks.get_effort(&id)?);
    }
    Ok(total)
}
