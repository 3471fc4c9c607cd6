//! Task, repeat configuration and theme data structures.
//!
//! This module defines the `Task` record a user edits, the `RepeatConfig` sum
//! type describing how a task recurs, and the `Theme` grouping tasks are filed
//! under. The `New*` shapes are what gets written to the store: they never
//! carry an identifier, since the store assigns one.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fields::*;
use crate::store::Document;

/// Reserved theme value meaning "no explicit theme".
pub const INBOX_THEME: &str = "inbox";

/// Length of the window a fresh custom repeat covers.
pub const CUSTOM_RANGE_DAYS: i64 = 7;

/// How a task recurs.
///
/// Interval variants repeat every `interval` units; `Custom` covers a closed
/// date range. No value can hold an interval and a range at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RepeatConfig {
    Day { interval: u32 },
    Week { interval: u32 },
    Month { interval: u32 },
    Year { interval: u32 },
    Custom { from: NaiveDate, to: NaiveDate },
}

impl Default for RepeatConfig {
    fn default() -> Self {
        RepeatConfig::Day { interval: 1 }
    }
}

impl RepeatConfig {
    /// Build an interval config. Returns `None` for `RepeatType::Custom`.
    pub fn every(kind: RepeatType, interval: u32) -> Option<Self> {
        match kind {
            RepeatType::Day => Some(RepeatConfig::Day { interval }),
            RepeatType::Week => Some(RepeatConfig::Week { interval }),
            RepeatType::Month => Some(RepeatConfig::Month { interval }),
            RepeatType::Year => Some(RepeatConfig::Year { interval }),
            RepeatType::Custom => None,
        }
    }

    /// The shape a config takes right after switching to `kind`:
    /// interval 1, or a one-week window starting `today`.
    pub fn fresh(kind: RepeatType, today: NaiveDate) -> Self {
        RepeatConfig::every(kind, 1).unwrap_or(RepeatConfig::Custom {
            from: today,
            to: today + Duration::days(CUSTOM_RANGE_DAYS),
        })
    }

    pub fn repeat_type(&self) -> RepeatType {
        match self {
            RepeatConfig::Day { .. } => RepeatType::Day,
            RepeatConfig::Week { .. } => RepeatType::Week,
            RepeatConfig::Month { .. } => RepeatType::Month,
            RepeatConfig::Year { .. } => RepeatType::Year,
            RepeatConfig::Custom { .. } => RepeatType::Custom,
        }
    }

    pub fn interval(&self) -> Option<u32> {
        match *self {
            RepeatConfig::Day { interval }
            | RepeatConfig::Week { interval }
            | RepeatConfig::Month { interval }
            | RepeatConfig::Year { interval } => Some(interval),
            RepeatConfig::Custom { .. } => None,
        }
    }

    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match *self {
            RepeatConfig::Custom { from, to } => Some((from, to)),
            _ => None,
        }
    }
}

impl fmt::Display for RepeatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.interval(), self.range()) {
            (Some(1), _) => write!(f, "every {}", self.repeat_type()),
            (Some(n), _) => write!(f, "every {} {}s", n, self.repeat_type()),
            (None, Some((from, to))) => write!(f, "{}..{}", from, to),
            (None, None) => write!(f, "-"),
        }
    }
}

/// A task as held in memory while editing or after loading.
///
/// `id` is empty until the task has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub state: TaskState,
    pub repeat: bool,
    pub repeat_data: Option<RepeatConfig>,
    pub due_at: Option<DateTime<Utc>>,
    pub theme: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A task as written to the store: every field except `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default)]
    pub repeat: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_data: Option<RepeatConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,
    pub theme: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// A blank draft filed under `theme`, created at `now`.
    pub fn new_draft(theme: impl Into<String>, now: DateTime<Utc>) -> Self {
        Task {
            id: String::new(),
            title: String::new(),
            content: String::new(),
            priority: Priority::default(),
            state: TaskState::default(),
            repeat: false,
            repeat_data: None,
            due_at: None,
            theme: theme.into(),
            tags: Vec::new(),
            created_at: now,
        }
    }

    pub fn is_inbox(&self) -> bool {
        self.theme == INBOX_THEME
    }
}

impl From<Task> for NewTask {
    fn from(task: Task) -> Self {
        NewTask {
            title: task.title,
            content: task.content,
            priority: task.priority,
            state: task.state,
            repeat: task.repeat,
            repeat_data: task.repeat_data,
            due_at: task.due_at,
            theme: task.theme,
            tags: task.tags,
            created_at: task.created_at,
        }
    }
}

impl NewTask {
    /// Attach the identifier the store assigned.
    pub fn with_id(self, id: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            title: self.title,
            content: self.content,
            priority: self.priority,
            state: self.state,
            repeat: self.repeat,
            repeat_data: self.repeat_data,
            due_at: self.due_at,
            theme: self.theme,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}

impl TryFrom<Document> for Task {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let body: NewTask = serde_json::from_value(doc.data)?;
        Ok(body.with_id(doc.id))
    }
}

/// A user-defined category tasks are grouped under.
///
/// `tasks` is only filled when a theme is loaded together with its tasks and
/// is never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub tasks: Vec<Task>,
}

/// A theme as written to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTheme {
    pub name: String,
}

impl Theme {
    /// The synthetic entry standing for the inbox. Never stored.
    pub fn inbox() -> Self {
        Theme {
            id: INBOX_THEME.to_string(),
            name: "Inbox".to_string(),
            tasks: Vec::new(),
        }
    }
}

impl NewTheme {
    pub fn with_id(self, id: impl Into<String>) -> Theme {
        Theme {
            id: id.into(),
            name: self.name,
            tasks: Vec::new(),
        }
    }
}

impl TryFrom<Document> for Theme {
    type Error = StoreError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let body: NewTheme = serde_json::from_value(doc.data)?;
        Ok(body.with_id(doc.id))
    }
}
