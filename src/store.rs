//! Document store abstraction.
//!
//! Documents live in collections addressed by slash-separated paths such as
//! `accounts/<id>/themes`. The store assigns every document its identifier on
//! creation; payloads handed to it never carry one.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::StoreResult;
use crate::paths::{inbox_path, tasks_path, themes_path};
use crate::session::Account;
use crate::task::{Task, Theme};

/// A stored document: the store-assigned key plus its JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Storage interface for documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Add a document to the collection at `path` and return its new id
    async fn create(&self, path: &str, payload: Value) -> StoreResult<String>;

    /// All documents in the collection at `path`. Order is unspecified
    async fn list(&self, path: &str) -> StoreResult<Vec<Document>>;
}

/// New random document identifier.
pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Themes the account has created. The inbox is not among them.
pub async fn list_themes(store: &dyn DocumentStore, account: &Account) -> StoreResult<Vec<Theme>> {
    let docs = store.list(&themes_path(account)).await?;
    debug!(account = %account.id, count = docs.len(), "loaded themes");
    docs.into_iter().map(Theme::try_from).collect()
}

/// Tasks stored in the collection at `path`.
pub async fn list_tasks(store: &dyn DocumentStore, path: &str) -> StoreResult<Vec<Task>> {
    let docs = store.list(path).await?;
    debug!(path, count = docs.len(), "loaded tasks");
    docs.into_iter().map(Task::try_from).collect()
}

/// Every theme with its tasks filled in, led by the synthetic inbox entry.
pub async fn load_themes_with_tasks(
    store: &dyn DocumentStore,
    account: &Account,
) -> StoreResult<Vec<Theme>> {
    let mut inbox = Theme::inbox();
    inbox.tasks = list_tasks(store, &inbox_path(account)).await?;

    let mut themes = vec![inbox];
    for mut theme in list_themes(store, account).await? {
        theme.tasks = list_tasks(store, &tasks_path(account, &theme.id)).await?;
        themes.push(theme);
    }
    Ok(themes)
}
