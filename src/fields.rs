//! Enumerations and field types for tasks.
//!
//! This module defines the structured values a task carries: its priority,
//! its completion state and the discriminant of its repeat configuration.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Task completion state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    #[default]
    Undone,
    Done,
}

/// The kind of recurrence a task follows.
///
/// `Day`, `Week`, `Month` and `Year` repeat every N units; `Custom` covers a
/// fixed date range instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    Day,
    Week,
    Month,
    Year,
    Custom,
}

impl RepeatType {
    /// Whether this type repeats on an interval rather than a date range.
    pub fn is_interval(self) -> bool {
        !matches!(self, RepeatType::Custom)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Normal => write!(f, "normal"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskState::Undone => write!(f, "undone"),
            TaskState::Done => write!(f, "done"),
        }
    }
}

impl fmt::Display for RepeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepeatType::Day => write!(f, "day"),
            RepeatType::Week => write!(f, "week"),
            RepeatType::Month => write!(f, "month"),
            RepeatType::Year => write!(f, "year"),
            RepeatType::Custom => write!(f, "custom"),
        }
    }
}
