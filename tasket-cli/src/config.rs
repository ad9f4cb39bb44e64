use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tasket_core::{InterleaveOptions, SelectionPolicy, parse_timezone};

use crate::state::ensure_tasket_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Relative paths resolve against the config file's directory.
    pub tasks_file: PathBuf,
    pub state_file: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// IANA timezone used for "today" and for due dates typed without an offset.
    pub timezone: String,
    /// Primary tasks between interleaved lower-effort chunks.
    pub stride: usize,
    pub chunk_size: usize,
    /// Suggestions shown per round; 0 shows all of them.
    pub offer_limit: usize,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from("tasks.csv"),
            state_file: PathBuf::from("user-data.json"),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        let policy = SelectionPolicy::default();
        Self {
            timezone: "America/Chicago".to_string(),
            stride: policy.interleave.stride,
            chunk_size: policy.interleave.chunk_size,
            offer_limit: policy.offer_limit.unwrap_or(0),
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        Ok(parse_timezone(&self.schedule.timezone)?)
    }

    pub fn policy(&self) -> Result<SelectionPolicy> {
        let interleave = InterleaveOptions::new(self.schedule.stride, self.schedule.chunk_size)
            .context("invalid [schedule] stride/chunk_size")?;
        Ok(SelectionPolicy {
            interleave,
            offer_limit: (self.schedule.offer_limit > 0).then_some(self.schedule.offer_limit),
        })
    }

    pub fn tasks_path(&self, base: &Path) -> PathBuf {
        base.join(&self.storage.tasks_file)
    }

    pub fn state_path(&self, base: &Path) -> PathBuf {
        base.join(&self.storage.state_file)
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(ensure_tasket_home()?.join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
