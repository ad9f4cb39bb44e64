//! Flat CSV task store.
//!
//! Header:
//! id,complete,title,urgency,importance,effort,due_date,_created,_modified
//!
//! Timestamps are written as RFC 3339 UTC. Naive timestamps from older files
//! (`2025-02-13T10:11:12.123456`) are read in the store's timezone.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tasket_core::{Task, TaskSource, TasketError};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskRecord {
    id: String,
    complete: String,
    title: String,
    urgency: u8,
    importance: u8,
    effort: u8,
    due_date: Option<String>,
    #[serde(rename = "_created")]
    created: String,
    #[serde(rename = "_modified")]
    modified: String,
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            complete: if task.complete { "TRUE" } else { "FALSE" }.to_string(),
            title: task.title.clone(),
            urgency: task.urgency,
            importance: task.importance,
            effort: task.effort,
            due_date: task.due_date.map(|d| d.to_rfc3339()),
            created: task.created_at.to_rfc3339(),
            modified: task.modified_at.to_rfc3339(),
        }
    }

    fn into_task(self, tz: Tz) -> Result<Task> {
        let complete = parse_flag(&self.complete).ok_or_else(|| StoreError::BadField {
            id: self.id.clone(),
            field: "complete",
            value: self.complete.clone(),
        })?;

        let due_date = match self.due_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_timestamp(s, tz).ok_or_else(|| StoreError::BadField {
                id: self.id.clone(),
                field: "due_date",
                value: s.to_string(),
            })?),
        };

        let created_at = parse_timestamp(&self.created, tz).ok_or_else(|| StoreError::BadField {
            id: self.id.clone(),
            field: "_created",
            value: self.created.clone(),
        })?;
        let modified_at = parse_timestamp(&self.modified, tz).unwrap_or(created_at);

        let task = Task {
            id: self.id,
            title: self.title,
            urgency: self.urgency,
            importance: self.importance,
            effort: self.effort,
            due_date,
            complete,
            created_at,
            modified_at,
        };
        task.validate()?;
        Ok(task)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "y" | "yes" => Some(true),
        "false" | "0" | "n" | "no" => Some(false),
        _ => None,
    }
}

fn parse_timestamp(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return tz
                .from_local_datetime(&ndt)
                .earliest()
                .map(|d| d.with_timezone(&Utc));
        }
    }
    tasket_core::parse_due_date(s, tz).ok()
}

#[derive(Debug, Clone)]
pub struct CsvTaskStore {
    path: PathBuf,
    tz: Tz,
}

impl CsvTaskStore {
    pub fn new(path: impl Into<PathBuf>, tz: Tz) -> Self {
        Self {
            path: path.into(),
            tz,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_empty_file(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }

    /// All tasks in file order. A missing file is an empty store.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        if self.is_empty_file()? {
            return Ok(Vec::new());
        }

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| StoreError::csv(&self.path, e))?;

        let mut tasks = Vec::new();
        for result in rdr.deserialize::<TaskRecord>() {
            let record = result.map_err(|e| StoreError::csv(&self.path, e))?;
            tasks.push(record.into_task(self.tz)?);
        }

        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Rewrite the whole file.
    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        self.ensure_parent()?;
        let mut wtr = csv::Writer::from_path(&self.path).map_err(|e| StoreError::csv(&self.path, e))?;
        for t in tasks {
            wtr.serialize(TaskRecord::from_task(t))
                .map_err(|e| StoreError::csv(&self.path, e))?;
        }
        wtr.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// Append one record, writing the header first when the file is new.
    pub fn append(&self, task: &Task) -> Result<()> {
        let needs_header = self.is_empty_file()?;
        self.ensure_parent()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        wtr.serialize(TaskRecord::from_task(task))
            .map_err(|e| StoreError::csv(&self.path, e))?;
        wtr.flush().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }

    /// Validate, create, and append a new task.
    pub fn add(
        &self,
        title: &str,
        urgency: u8,
        importance: u8,
        effort: u8,
        due_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let task = Task::create(title, urgency, importance, effort, due_date, now)?;
        self.append(&task)?;
        tracing::info!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    /// Flip a task's completion flag and touch `modified_at`.
    pub fn set_complete(&self, id: &str, complete: bool, now: DateTime<Utc>) -> Result<Task> {
        let mut tasks = self.read_all()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TasketError::NotFound(id.to_string()))?;
        task.set_complete(complete, now);
        let updated = task.clone();

        self.write_all(&tasks)?;
        tracing::info!(%id, complete, "task completion updated");
        Ok(updated)
    }

    fn ensure_parent(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }
}

impl TaskSource for CsvTaskStore {
    fn load(&self) -> tasket_core::Result<Vec<Task>> {
        Ok(self.read_all()?)
    }
}
