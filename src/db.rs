//! File-backed document store and utility functions for task management.
//!
//! This module provides `FileStore`, a `DocumentStore` persisted as a single
//! JSON file, along with utility functions for tag normalisation, due date
//! parsing and table formatting used by the command layer.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::paths::segments;
use crate::store::{new_document_id, Document, DocumentStore};
use crate::task::Task;

/// On-disk layout: collection path -> document id -> document body.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    collections: BTreeMap<String, BTreeMap<String, Value>>,
}

/// Document store kept in one pretty-printed JSON file.
///
/// Every write reloads the file, applies the change and saves it back, so
/// separate `FileStore`s on the same path see each other's documents.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the store file. A missing file is an empty store.
    async fn load(&self) -> StoreResult<Snapshot> {
        match fs::read_to_string(&self.path).await {
            Ok(buf) => serde_json::from_str(&buf).map_err(|e| StoreError::Corrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Save the store file using atomic write (temp file + rename).
    async fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(snapshot)?;
        fs::write(&tmp, data.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn create(&self, path: &str, payload: Value) -> StoreResult<String> {
        if segments(path).is_none() {
            return Err(StoreError::InvalidPath { path: path.to_string() });
        }
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let id = new_document_id();
        snapshot
            .collections
            .entry(path.to_string())
            .or_default()
            .insert(id.clone(), payload);
        self.save(&snapshot).await?;
        info!(collection = path, id = %id, "document created");
        Ok(id)
    }

    async fn list(&self, path: &str) -> StoreResult<Vec<Document>> {
        if segments(path).is_none() {
            return Err(StoreError::InvalidPath { path: path.to_string() });
        }
        let _guard = self.lock.lock().await;
        let mut snapshot = self.load().await?;
        let docs: Vec<Document> = snapshot
            .collections
            .remove(path)
            .unwrap_or_default()
            .into_iter()
            .map(|(id, data)| Document { id, data })
            .collect();
        debug!(collection = path, count = docs.len(), "documents listed");
        Ok(docs)
    }
}

/// Normalize a tag string by trimming, lowercasing, and replacing spaces with hyphens.
pub fn normalise_tag(s: &str) -> String {
    s.trim().to_lowercase().replace(' ', "-")
}

/// Split comma-separated tag strings and normalize each tag.
pub fn split_and_normalise_tags(inputs: &[String]) -> Vec<String> {
    let mut tags = Vec::new();
    for raw in inputs {
        for part in raw.split(',') {
            let tag = normalise_tag(part);
            if !tag.is_empty() {
                tags.push(tag);
            }
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

/// Time of day a date-only due input resolves to.
fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default()
}

fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse human-readable due input into an instant.
///
/// Supports:
/// - "now"
/// - "today", "tomorrow" (end of that day)
/// - "in 3h", "in 2d", "in 1w"
/// - "YYYY-MM-DD" (end of that day)
/// - "YYYY-MM-DDTHH:MM" or "YYYY-MM-DD HH:MM" (local time)
pub fn parse_due_input(s: &str, now: DateTime<Local>) -> Option<DateTime<Utc>> {
    let s = s.trim().to_lowercase();
    let today = now.date_naive();

    match s.as_str() {
        "now" => return Some(now.with_timezone(&Utc)),
        "today" => return local_to_utc(today.and_time(end_of_day())),
        "tomorrow" => return local_to_utc((today + Duration::days(1)).and_time(end_of_day())),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let unit_at = rest.char_indices().last().map(|(i, _)| i).unwrap_or(0);
        let (amount, unit) = rest.split_at(unit_at);
        if let Ok(n) = amount.trim().parse::<i64>() {
            let delta = match unit {
                "h" => Duration::try_hours(n),
                "d" => Duration::try_days(n),
                "w" => Duration::try_weeks(n),
                _ => None,
            }?;
            return now.checked_add_signed(delta).map(|dt| dt.with_timezone(&Utc));
        }
        return None;
    }

    for fmt in ["%Y-%m-%dt%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return local_to_utc(naive);
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d")
        .ok()
        .and_then(|d| local_to_utc(d.and_time(end_of_day())))
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Format a due instant relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<DateTime<Utc>>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(at) => {
            let delta = at.with_timezone(&Local).date_naive() - today;
            if delta.num_days() == 0 {
                "today".into()
            } else if delta.num_days() == 1 {
                "tomorrow".into()
            } else if delta.num_days() > 1 {
                format!("in {}d", delta.num_days())
            } else {
                format!("{}d late", -delta.num_days())
            }
        }
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task]) {
    println!(
        "{:<10} {:<7} {:<9} {:<10} {:<24} {}",
        "ID", "State", "Pri", "Due", "Repeat", "Title [tags]"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let tags = if t.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", t.tags.join(","))
        };
        let repeat = t
            .repeat_data
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<10} {:<7} {:<9} {:<10} {:<24} {}{}",
            truncate(&t.id, 10),
            t.state.to_string(),
            t.priority.to_string(),
            format_due_relative(t.due_at, today),
            truncate(&repeat, 24),
            t.title,
            tags
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
