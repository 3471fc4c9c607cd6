//! Task draft transitions.
//!
//! Every edit to a task draft goes through one of the functions below. Each
//! takes the current draft and returns the next one, so the fields an edit
//! adds or removes are spelled out in the function body. Two rules hold for
//! every draft they produce:
//!
//! - `repeat_data` is present exactly when `repeat` is true;
//! - a repeat config carries either an interval or a date range, never both
//!   (guaranteed by [`RepeatConfig`] itself).
//!
//! [`TaskDraft`] owns one draft for an editing session and applies the
//! transitions to it, keeping the previous draft whenever one is rejected.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::debug;

use crate::error::DraftError;
use crate::fields::{Priority, RepeatType, TaskState};
use crate::task::{RepeatConfig, Task};

/// A plain field edit. Repeat and due date have dedicated transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskField {
    Title(String),
    Content(String),
    Priority(Priority),
    State(TaskState),
    Theme(String),
    Tags(Vec<String>),
}

pub fn set_field(task: &Task, field: TaskField) -> Task {
    let mut next = task.clone();
    match field {
        TaskField::Title(v) => next.title = v,
        TaskField::Content(v) => next.content = v,
        TaskField::Priority(v) => next.priority = v,
        TaskField::State(v) => next.state = v,
        TaskField::Theme(v) => next.theme = v,
        TaskField::Tags(v) => next.tags = v,
    }
    next
}

/// Turn repeating on or off.
///
/// Enabling always installs a fresh `every day` config, discarding whatever
/// was configured before. Disabling drops the config entirely.
pub fn set_repeat(task: &Task, enabled: bool) -> Task {
    Task {
        repeat: enabled,
        repeat_data: enabled.then(RepeatConfig::default),
        ..task.clone()
    }
}

/// Switch the repeat type.
///
/// The new config starts from scratch: interval types get `interval = 1`,
/// `Custom` gets a one-week window starting `today`. This also applies when
/// the type does not change.
pub fn set_repeat_type(task: &Task, kind: RepeatType, today: NaiveDate) -> Result<Task, DraftError> {
    if task.repeat_data.is_none() {
        return Err(DraftError::RepeatDisabled);
    }
    Ok(Task {
        repeat_data: Some(RepeatConfig::fresh(kind, today)),
        ..task.clone()
    })
}

/// Change the interval of an interval repeat, keeping its type.
pub fn set_repeat_interval(task: &Task, interval: u32) -> Result<Task, DraftError> {
    let config = task.repeat_data.ok_or(DraftError::RepeatDisabled)?;
    let kind = config.repeat_type();
    if !kind.is_interval() {
        return Err(DraftError::IntervalOnCustomRange);
    }
    if interval == 0 {
        return Err(DraftError::InvalidInterval);
    }
    Ok(Task {
        repeat_data: RepeatConfig::every(kind, interval),
        ..task.clone()
    })
}

/// Replace the window of a custom repeat. Both ends are inclusive.
pub fn set_repeat_range(task: &Task, from: NaiveDate, to: NaiveDate) -> Result<Task, DraftError> {
    match task.repeat_data {
        None => Err(DraftError::RepeatDisabled),
        Some(RepeatConfig::Custom { .. }) if to < from => Err(DraftError::InvalidRange {
            from: from.to_string(),
            to: to.to_string(),
        }),
        Some(RepeatConfig::Custom { .. }) => Ok(Task {
            repeat_data: Some(RepeatConfig::Custom { from, to }),
            ..task.clone()
        }),
        Some(_) => Err(DraftError::RangeOnIntervalRepeat),
    }
}

/// Flip whether the task has a due date. Turning it on starts at `now`.
pub fn toggle_due_at(task: &Task, now: DateTime<Utc>) -> Task {
    Task {
        due_at: match task.due_at {
            Some(_) => None,
            None => Some(now),
        },
        ..task.clone()
    }
}

pub fn set_due_at_value(task: &Task, at: DateTime<Utc>) -> Task {
    Task {
        due_at: Some(at),
        ..task.clone()
    }
}

/// Source of the current instant for a draft.
pub type Clock = fn() -> DateTime<Utc>;

/// The task being edited in one session.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    task: Task,
    preset_theme: String,
    clock: Clock,
}

impl TaskDraft {
    /// Start a blank draft filed under `theme`.
    pub fn new(theme: impl Into<String>) -> Self {
        Self::with_clock(theme, Utc::now)
    }

    pub fn with_clock(theme: impl Into<String>, clock: Clock) -> Self {
        let preset_theme = theme.into();
        TaskDraft {
            task: Task::new_draft(preset_theme.clone(), clock()),
            preset_theme,
            clock,
        }
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Discard all edits and start over under the theme the draft opened with.
    /// The preset theme is kept on purpose instead of falling back to the inbox.
    pub fn reset(&mut self) {
        self.task = Task::new_draft(self.preset_theme.clone(), (self.clock)());
    }

    fn today(&self) -> NaiveDate {
        (self.clock)().with_timezone(&Local).date_naive()
    }

    fn apply(&mut self, op: &str, next: Result<Task, DraftError>) -> Result<&Task, DraftError> {
        match next {
            Ok(task) => {
                debug!(op, repeat = ?task.repeat_data, due_at = ?task.due_at, "draft updated");
                self.task = task;
                Ok(&self.task)
            }
            Err(e) => {
                debug!(op, error = %e, "draft edit rejected");
                Err(e)
            }
        }
    }

    pub fn set_field(&mut self, field: TaskField) -> &Task {
        self.task = set_field(&self.task, field);
        &self.task
    }

    pub fn set_repeat(&mut self, enabled: bool) -> &Task {
        self.task = set_repeat(&self.task, enabled);
        debug!(enabled, "repeat toggled");
        &self.task
    }

    pub fn set_repeat_type(&mut self, kind: RepeatType) -> Result<&Task, DraftError> {
        let next = set_repeat_type(&self.task, kind, self.today());
        self.apply("set_repeat_type", next)
    }

    pub fn set_repeat_interval(&mut self, interval: u32) -> Result<&Task, DraftError> {
        let next = set_repeat_interval(&self.task, interval);
        self.apply("set_repeat_interval", next)
    }

    pub fn set_repeat_range(&mut self, from: NaiveDate, to: NaiveDate) -> Result<&Task, DraftError> {
        let next = set_repeat_range(&self.task, from, to);
        self.apply("set_repeat_range", next)
    }

    pub fn toggle_due_at(&mut self) -> &Task {
        self.task = toggle_due_at(&self.task, (self.clock)());
        debug!(due_at = ?self.task.due_at, "due date toggled");
        &self.task
    }

    pub fn set_due_at_value(&mut self, at: DateTime<Utc>) -> &Task {
        self.task = set_due_at_value(&self.task, at);
        &self.task
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::task::INBOX_THEME;

    const INTERVAL_TYPES: [RepeatType; 4] =
        [RepeatType::Day, RepeatType::Week, RepeatType::Month, RepeatType::Year];

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn today() -> NaiveDate {
        fixed_now().with_timezone(&Local).date_naive()
    }

    fn draft() -> TaskDraft {
        TaskDraft::with_clock(INBOX_THEME, fixed_now)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Exactly one of interval / range is present while repeating, none otherwise.
    fn assert_shape(task: &Task) {
        match task.repeat_data {
            None => assert!(!task.repeat),
            Some(config) => {
                assert!(task.repeat);
                assert!(config.interval().is_some() != config.range().is_some());
            }
        }
    }

    #[test]
    fn test_set_field_only_touches_that_field() {
        let mut d = draft();
        let before = d.task().clone();
        let task = d.set_field(TaskField::Title("Buy milk".into()));
        assert_eq!(task.title, "Buy milk");
        assert_eq!(Task { title: before.title.clone(), ..task.clone() }, before);

        d.set_field(TaskField::Priority(Priority::Critical));
        d.set_field(TaskField::Tags(vec!["home".into()]));
        d.set_field(TaskField::Theme("t1".into()));
        let task = d.task();
        assert_eq!(task.priority, Priority::Critical);
        assert_eq!(task.tags, vec!["home".to_string()]);
        assert_eq!(task.theme, "t1");
        assert_eq!(task.created_at, fixed_now());
    }

    #[test]
    fn test_enable_repeat_installs_default() {
        let mut d = draft();
        let task = d.set_repeat(true);
        assert!(task.repeat);
        assert_eq!(task.repeat_data, Some(RepeatConfig::Day { interval: 1 }));
    }

    #[test]
    fn test_disable_repeat_removes_config() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_type(RepeatType::Custom).unwrap();
        let task = d.set_repeat(false);
        assert!(!task.repeat);
        assert!(task.repeat_data.is_none());
    }

    #[test]
    fn test_reenabling_repeat_discards_prior_edits() {
        for enabled in [true, false] {
            let mut d = draft();
            d.set_repeat(true);
            d.set_repeat_type(RepeatType::Week).unwrap();
            d.set_repeat_interval(5).unwrap();
            let first = d.set_repeat(enabled).clone();
            let second = d.set_repeat(enabled).clone();
            assert_eq!(first, second);
            if enabled {
                assert_eq!(second.repeat_data, Some(RepeatConfig::default()));
            }
        }
    }

    #[test]
    fn test_switch_to_custom_sets_week_window() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_interval(3).unwrap();
        let task = d.set_repeat_type(RepeatType::Custom).unwrap();
        assert_eq!(
            task.repeat_data,
            Some(RepeatConfig::Custom { from: today(), to: today() + Duration::days(7) })
        );
        assert_shape(task);
    }

    #[test]
    fn test_round_trip_through_custom_resets_interval() {
        for start in INTERVAL_TYPES {
            for end in INTERVAL_TYPES {
                let mut d = draft();
                d.set_repeat(true);
                d.set_repeat_type(start).unwrap();
                d.set_repeat_interval(4).unwrap();
                d.set_repeat_type(RepeatType::Custom).unwrap();
                let task = d.set_repeat_type(end).unwrap();
                assert_eq!(task.repeat_data, RepeatConfig::every(end, 1));
                assert!(task.repeat_data.unwrap().range().is_none());
            }
        }
    }

    #[test]
    fn test_same_type_switch_still_resets() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_interval(9).unwrap();
        let task = d.set_repeat_type(RepeatType::Day).unwrap();
        assert_eq!(task.repeat_data, Some(RepeatConfig::Day { interval: 1 }));
    }

    #[test]
    fn test_repeat_type_without_repeat_is_rejected() {
        let mut d = draft();
        let before = d.task().clone();
        assert_eq!(d.set_repeat_type(RepeatType::Week), Err(DraftError::RepeatDisabled));
        assert_eq!(d.task(), &before);
    }

    #[test]
    fn test_set_interval_keeps_type() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_type(RepeatType::Month).unwrap();
        let task = d.set_repeat_interval(6).unwrap();
        assert_eq!(task.repeat_data, Some(RepeatConfig::Month { interval: 6 }));
    }

    #[test]
    fn test_interval_on_custom_is_rejected() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_type(RepeatType::Custom).unwrap();
        let before = d.task().clone();
        assert_eq!(d.set_repeat_interval(2), Err(DraftError::IntervalOnCustomRange));
        assert_eq!(d.task(), &before);
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut d = draft();
        d.set_repeat(true);
        assert_eq!(d.set_repeat_interval(0), Err(DraftError::InvalidInterval));
        assert_eq!(d.task().repeat_data, Some(RepeatConfig::default()));
    }

    #[test]
    fn test_interval_without_repeat_is_rejected() {
        let mut d = draft();
        assert_eq!(d.set_repeat_interval(2), Err(DraftError::RepeatDisabled));
        assert!(d.task().repeat_data.is_none());
    }

    #[test]
    fn test_set_range_on_custom() {
        let mut d = draft();
        d.set_repeat(true);
        d.set_repeat_type(RepeatType::Custom).unwrap();
        let task = d.set_repeat_range(date(2024, 4, 1), date(2024, 4, 30)).unwrap();
        assert_eq!(
            task.repeat_data,
            Some(RepeatConfig::Custom { from: date(2024, 4, 1), to: date(2024, 4, 30) })
        );

        let single_day = d.set_repeat_range(date(2024, 5, 2), date(2024, 5, 2)).unwrap();
        assert_eq!(single_day.repeat_data.unwrap().range(), Some((date(2024, 5, 2), date(2024, 5, 2))));
    }

    #[test]
    fn test_set_range_rejections() {
        let mut d = draft();
        assert_eq!(
            d.set_repeat_range(date(2024, 4, 1), date(2024, 4, 2)),
            Err(DraftError::RepeatDisabled)
        );

        d.set_repeat(true);
        assert_eq!(
            d.set_repeat_range(date(2024, 4, 1), date(2024, 4, 2)),
            Err(DraftError::RangeOnIntervalRepeat)
        );

        d.set_repeat_type(RepeatType::Custom).unwrap();
        let before = d.task().clone();
        assert!(matches!(
            d.set_repeat_range(date(2024, 4, 2), date(2024, 4, 1)),
            Err(DraftError::InvalidRange { .. })
        ));
        assert_eq!(d.task(), &before);
    }

    #[test]
    fn test_shape_holds_after_any_edit_sequence() {
        let mut d = draft();
        d.set_repeat(true);
        let steps: Vec<Box<dyn Fn(&mut TaskDraft)>> = vec![
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_type(RepeatType::Custom); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_interval(3); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_range(date(2024, 1, 1), date(2024, 1, 9)); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_type(RepeatType::Year); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_interval(7); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_range(date(2024, 2, 1), date(2024, 2, 3)); }),
            Box::new(|d: &mut TaskDraft| { let _ = d.set_repeat_type(RepeatType::Week); }),
        ];
        for (i, step) in steps.iter().enumerate() {
            step(&mut d);
            assert_shape(d.task());
            assert!(d.task().repeat, "step {} dropped repeat", i);
        }
    }

    #[test]
    fn test_toggle_due_at_twice_clears() {
        let mut d = draft();
        assert_eq!(d.toggle_due_at().due_at, Some(fixed_now()));
        assert_eq!(d.toggle_due_at().due_at, None);
        assert_eq!(d.toggle_due_at().due_at, Some(fixed_now()));
        assert_eq!(d.toggle_due_at().due_at, None);
    }

    #[test]
    fn test_due_at_independent_of_repeat() {
        let mut d = draft();
        d.toggle_due_at();
        d.set_repeat(true);
        d.set_repeat(false);
        assert_eq!(d.task().due_at, Some(fixed_now()));
    }

    #[test]
    fn test_set_due_at_value() {
        let mut d = draft();
        d.toggle_due_at();
        let at = fixed_now() + Duration::days(2);
        assert_eq!(d.set_due_at_value(at).due_at, Some(at));
    }

    #[test]
    fn test_reset_keeps_preset_theme() {
        let mut d = TaskDraft::with_clock("t1", fixed_now);
        d.set_field(TaskField::Theme("t2".into()));
        d.set_field(TaskField::Title("x".into()));
        d.set_repeat(true);
        d.reset();
        assert_eq!(d.task(), &Task::new_draft("t1", fixed_now()));
    }

    #[test]
    fn test_pure_transitions_leave_input_untouched() {
        let task = Task::new_draft(INBOX_THEME, fixed_now());
        let repeating = set_repeat(&task, true);
        assert!(task.repeat_data.is_none());
        let custom = set_repeat_type(&repeating, RepeatType::Custom, date(2024, 6, 1)).unwrap();
        assert_eq!(repeating.repeat_data, Some(RepeatConfig::default()));
        assert_eq!(
            custom.repeat_data,
            Some(RepeatConfig::Custom { from: date(2024, 6, 1), to: date(2024, 6, 8) })
        );
    }
}
