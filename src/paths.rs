//! Collection paths inside the document store.
//!
//! Everything an account owns lives under `accounts/<id>`. Tasks without a
//! theme go to the account's `inbox` collection; all other tasks live under
//! `themes/<theme>/tasks`.

use crate::session::Account;
use crate::task::INBOX_THEME;

pub const ACCOUNTS: &str = "accounts";
pub const THEMES: &str = "themes";
pub const TASKS: &str = "tasks";
pub const INBOX: &str = "inbox";

/// `accounts/<id>/themes`
pub fn themes_path(account: &Account) -> String {
    format!("{}/{}/{}", ACCOUNTS, account.id, THEMES)
}

/// `accounts/<id>/inbox`
pub fn inbox_path(account: &Account) -> String {
    format!("{}/{}/{}", ACCOUNTS, account.id, INBOX)
}

/// Collection a task filed under `theme` belongs to.
/// The inbox sentinel never becomes a themes segment.
pub fn tasks_path(account: &Account, theme: &str) -> String {
    if theme == INBOX_THEME {
        inbox_path(account)
    } else {
        format!("{}/{}/{}", themes_path(account), theme, TASKS)
    }
}

/// Split a collection path into its segments, rejecting empty ones.
pub fn segments(path: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.iter().any(|p| p.trim().is_empty()) {
        None
    } else {
        Some(parts)
    }
}
