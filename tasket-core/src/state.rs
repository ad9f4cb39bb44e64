//! Daily user state document.
//!
//! One document per user, keyed by calendar date inside each field:
//!
//! ```json
//! {
//!   "username": "lacie",
//!   "last_login": "2026-03-02T15:00:00Z",
//!   "velocity": { "2026-03-02": 2 },
//!   "selected_tasks": { "2026-03-02": ["…"] },
//!   "suggested_tasks": {}, "completed_tasks": {}, "rejected_tasks": {}
//! }
//! ```
//!
//! `UserState` is itself a `StateStore`, which makes it the in-memory store; the
//! file-backed store in `tasket-store` loads and saves it whole.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TasketError};
use crate::store::{StateStore, TaskList, validate_velocity};

type DatedIds = BTreeMap<NaiveDate, Vec<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub velocity: BTreeMap<NaiveDate, u8>,
    #[serde(default)]
    pub selected_tasks: DatedIds,
    #[serde(default)]
    pub suggested_tasks: DatedIds,
    #[serde(default)]
    pub completed_tasks: DatedIds,
    #[serde(default)]
    pub rejected_tasks: DatedIds,
}

impl UserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_login(&mut self, now: DateTime<Utc>) {
        self.last_login = Some(now);
    }

    fn ids(&self, list: TaskList) -> &DatedIds {
        match list {
            TaskList::Selected => &self.selected_tasks,
            TaskList::Suggested => &self.suggested_tasks,
            TaskList::Completed => &self.completed_tasks,
            TaskList::Rejected => &self.rejected_tasks,
        }
    }

    fn ids_mut(&mut self, list: TaskList) -> &mut DatedIds {
        match list {
            TaskList::Selected => &mut self.selected_tasks,
            TaskList::Suggested => &mut self.suggested_tasks,
            TaskList::Completed => &mut self.completed_tasks,
            TaskList::Rejected => &mut self.rejected_tasks,
        }
    }
}

impl StateStore for UserState {
    fn velocity(&self, date: NaiveDate) -> Result<Option<u8>> {
        Ok(self.velocity.get(&date).copied())
    }

    fn set_velocity(&mut self, date: NaiveDate, velocity: u8) -> Result<()> {
        validate_velocity(velocity)?;
        if let Some(existing) = self.velocity.get(&date) {
            return Err(TasketError::validation(
                "velocity",
                format!("already set to {existing} for {date}"),
            ));
        }
        self.velocity.insert(date, velocity);
        Ok(())
    }

    fn list(&self, date: NaiveDate, list: TaskList) -> Result<Vec<String>> {
        Ok(self.ids(list).get(&date).cloned().unwrap_or_default())
    }

    fn add_to_list(&mut self, date: NaiveDate, list: TaskList, id: &str) -> Result<bool> {
        let ids = self.ids_mut(list).entry(date).or_default();
        if ids.iter().any(|x| x == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        Ok(true)
    }

    fn remove_from_list(&mut self, date: NaiveDate, list: TaskList, id: &str) -> Result<bool> {
        let Some(ids) = self.ids_mut(list).get_mut(&date) else {
            return Ok(false);
        };
        let before = ids.len();
        ids.retain(|x| x != id);
        Ok(ids.len() != before)
    }

    fn username(&self) -> Result<Option<String>> {
        Ok(self.username.clone())
    }

    fn set_username(&mut self, username: Option<String>) -> Result<()> {
        self.username = username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(())
    }
}
