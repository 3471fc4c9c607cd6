//! Account context for an editing session.
//!
//! The session is built once from configuration and passed explicitly to
//! everything that needs to resolve a storage path.

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
}

/// Identity available to one editing session. `account` is `None` when nobody
/// is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Account>,
}

impl Session {
    pub fn signed_in(account_id: impl Into<String>) -> Self {
        Session {
            account: Some(Account { id: account_id.into() }),
        }
    }

    pub fn anonymous() -> Self {
        Session::default()
    }

    /// Build a session from an optional configured account id.
    /// Blank ids count as signed out.
    pub fn from_config(account_id: Option<&str>) -> Self {
        match account_id.map(str::trim) {
            Some(id) if !id.is_empty() => Session::signed_in(id),
            _ => Session::anonymous(),
        }
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }
}
