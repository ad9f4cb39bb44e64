use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};
use tasket_core::{SelectionPolicy, today_in};
use tasket_store::{CsvTaskStore, JsonStateStore};

use crate::config::Config;

pub fn tasket_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".tasket"))
}

pub fn ensure_tasket_home() -> Result<PathBuf> {
    let dir = tasket_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Everything a command needs, resolved once at startup.
pub struct Session {
    pub tasks: CsvTaskStore,
    pub state: JsonStateStore,
    pub policy: SelectionPolicy,
    pub tz: Tz,
    pub now: DateTime<Utc>,
    pub today: NaiveDate,
}

impl Session {
    /// `base` is the directory relative storage paths resolve against.
    pub fn open(cfg: &Config, base: &Path, now: DateTime<Utc>) -> Result<Self> {
        let tz = cfg.timezone()?;
        let tasks_path = cfg.tasks_path(base);
        let state_path = cfg.state_path(base);
        tracing::debug!(
            tasks = %tasks_path.display(),
            state = %state_path.display(),
            %tz,
            "opening stores"
        );

        let state = JsonStateStore::new(state_path);
        state
            .touch_login(now)
            .with_context(|| format!("update {}", state.path().display()))?;

        Ok(Self {
            tasks: CsvTaskStore::new(tasks_path, tz),
            state,
            policy: cfg.policy()?,
            tz,
            now,
            today: today_in(tz, now),
        })
    }
}
