//! Handing a finished task draft to the document store.

use tracing::{error, info};

use crate::draft::TaskDraft;
use crate::error::{StoreError, SubmitError};
use crate::paths::tasks_path;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::task::{NewTask, Task};

/// Where a draft goes and what gets written there.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub path: String,
    pub payload: NewTask,
}

/// Resolve the collection for `task` and strip its id.
///
/// Fails with `MissingAccount` when nobody is signed in; the store is never
/// consulted.
pub fn prepare_for_submission(task: &Task, session: &Session) -> Result<Submission, SubmitError> {
    let account = session.account().ok_or(SubmitError::MissingAccount)?;
    Ok(Submission {
        path: tasks_path(account, &task.theme),
        payload: NewTask::from(task.clone()),
    })
}

impl TaskDraft {
    /// Write the draft to the store and return the id it was given.
    ///
    /// On success the draft starts over. On any failure it is kept as is so
    /// the user can retry.
    pub async fn submit(
        &mut self,
        store: &dyn DocumentStore,
        session: &Session,
    ) -> Result<String, SubmitError> {
        let Submission { path, payload } = prepare_for_submission(self.task(), session)?;
        let body = serde_json::to_value(&payload).map_err(StoreError::from)?;

        match store.create(&path, body).await {
            Ok(id) => {
                info!(collection = %path, id = %id, title = %payload.title, "task created");
                self.reset();
                Ok(id)
            }
            Err(e) => {
                error!(collection = %path, error = %e, "failed to create task");
                Err(SubmitError::StoreWriteFailure(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    use crate::draft::TaskField;
    use crate::fields::RepeatType;
    use crate::store::memory::MemoryStore;
    use crate::task::{RepeatConfig, INBOX_THEME};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_inbox_path() {
        let mut task = Task::new_draft(INBOX_THEME, fixed_now());
        task.id = "local-id".into();
        let sub = prepare_for_submission(&task, &Session::signed_in("acct1")).unwrap();
        assert_eq!(sub.path, "accounts/acct1/inbox");

        let value = serde_json::to_value(&sub.payload).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_theme_path() {
        let mut task = Task::new_draft("t1", fixed_now());
        task.id = "local-id".into();
        let sub = prepare_for_submission(&task, &Session::signed_in("acct1")).unwrap();
        assert_eq!(sub.path, "accounts/acct1/themes/t1/tasks");

        let value = serde_json::to_value(&sub.payload).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["theme"], "t1");
    }

    #[test]
    fn test_missing_account() {
        let task = Task::new_draft(INBOX_THEME, fixed_now());
        let err = prepare_for_submission(&task, &Session::anonymous()).unwrap_err();
        assert!(matches!(err, SubmitError::MissingAccount));
    }

    #[tokio::test]
    async fn test_submit_without_account_issues_no_write() {
        let store = MemoryStore::new();
        let mut draft = TaskDraft::with_clock(INBOX_THEME, fixed_now);
        draft.set_field(TaskField::Title("Pay rent".into()));
        let before = draft.task().clone();

        let err = draft.submit(&store, &Session::anonymous()).await.unwrap_err();
        assert!(matches!(err, SubmitError::MissingAccount));
        assert_eq!(draft.task(), &before);
        assert_eq!(store.write_attempts(), 0);
    }

    #[tokio::test]
    async fn test_submit_success_resets_draft() {
        let store = MemoryStore::new();
        let mut draft = TaskDraft::with_clock("t1", fixed_now);
        draft.set_field(TaskField::Title("Stretch".into()));
        draft.set_repeat(true);
        draft.set_repeat_type(RepeatType::Week).unwrap();
        draft.set_repeat_interval(2).unwrap();

        let id = draft.submit(&store, &Session::signed_in("acct1")).await.unwrap();
        assert_eq!(draft.task(), &Task::new_draft("t1", fixed_now()));

        let docs = store.collection("accounts/acct1/themes/t1/tasks");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        let saved = Task::try_from(docs[0].clone()).unwrap();
        assert_eq!(saved.title, "Stretch");
        assert_eq!(saved.repeat_data, Some(RepeatConfig::Week { interval: 2 }));
    }

    #[tokio::test]
    async fn test_store_failure_keeps_draft() {
        let store = MemoryStore::failing();
        let mut draft = TaskDraft::with_clock(INBOX_THEME, fixed_now);
        draft.set_field(TaskField::Title("Renew passport".into()));
        draft.toggle_due_at();
        let before = draft.task().clone();

        let err = draft.submit(&store, &Session::signed_in("acct1")).await.unwrap_err();
        assert!(matches!(err, SubmitError::StoreWriteFailure(_)));
        assert_eq!(draft.task(), &before);
        assert_eq!(store.write_attempts(), 1);

        store.set_failing(false);
        draft.submit(&store, &Session::signed_in("acct1")).await.unwrap();
        assert_eq!(store.collection("accounts/acct1/inbox").len(), 1);
    }
}
