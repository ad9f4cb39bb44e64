//! JSON file holding the daily user state document.
//!
//! Every operation reads the whole document and, for mutations, overwrites it.
//! There is no locking: two processes writing the same file race.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use tasket_core::{StateStore, TaskList, UserState, validate_velocity};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document; a missing or empty file is a fresh state.
    pub fn load(&self) -> Result<UserState> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no user state file yet");
                return Ok(UserState::default());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        if s.trim().is_empty() {
            return Ok(UserState::default());
        }
        let state: UserState =
            serde_json::from_str(&s).map_err(|e| StoreError::json(&self.path, e))?;
        for velocity in state.velocity.values() {
            validate_velocity(*velocity)?;
        }
        Ok(state)
    }

    pub fn save(&self, state: &UserState) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        let json = serde_json::to_string_pretty(state).map_err(|e| StoreError::json(&self.path, e))?;
        fs::write(&self.path, json).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// Read, mutate, overwrite.
    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut UserState) -> tasket_core::Result<R>,
    ) -> Result<R> {
        let mut state = self.load()?;
        let out = f(&mut state)?;
        self.save(&state)?;
        Ok(out)
    }

    /// Stamp `last_login`; returns the refreshed document.
    pub fn touch_login(&self, now: DateTime<Utc>) -> Result<UserState> {
        self.update(|s| {
            s.touch_login(now);
            Ok(s.clone())
        })
    }
}

impl StateStore for JsonStateStore {
    fn velocity(&self, date: NaiveDate) -> tasket_core::Result<Option<u8>> {
        Ok(self.load()?.velocity(date)?)
    }

    fn set_velocity(&mut self, date: NaiveDate, velocity: u8) -> tasket_core::Result<()> {
        self.update(|s| s.set_velocity(date, velocity))?;
        tracing::info!(%date, velocity, "velocity recorded");
        Ok(())
    }

    fn list(&self, date: NaiveDate, list: TaskList) -> tasket_core::Result<Vec<String>> {
        Ok(self.load()?.list(date, list)?)
    }

    fn add_to_list(&mut self, date: NaiveDate, list: TaskList, id: &str) -> tasket_core::Result<bool> {
        let added = self.update(|s| s.add_to_list(date, list, id))?;
        tracing::debug!(%date, %list, %id, added, "add to task list");
        Ok(added)
    }

    fn remove_from_list(
        &mut self,
        date: NaiveDate,
        list: TaskList,
        id: &str,
    ) -> tasket_core::Result<bool> {
        let removed = self.update(|s| s.remove_from_list(date, list, id))?;
        tracing::debug!(%date, %list, %id, removed, "remove from task list");
        Ok(removed)
    }

    fn username(&self) -> tasket_core::Result<Option<String>> {
        Ok(self.load()?.username)
    }

    fn set_username(&mut self, username: Option<String>) -> tasket_core::Result<()> {
        Ok(self.update(|s| s.set_username(username))?)
    }
}
