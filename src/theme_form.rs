//! Theme creation form.
//!
//! A small form nested in the task editor: a visibility flag plus the name
//! being typed. A successful save collapses the form and clears the name. A
//! failed save leaves both alone so the name can be resubmitted.

use tracing::{error, info};

use crate::error::ThemeFormError;
use crate::paths::themes_path;
use crate::session::Session;
use crate::store::DocumentStore;
use crate::task::{NewTheme, Theme};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeForm {
    pub is_add_theme: bool,
    pub new_theme_name: String,
}

impl ThemeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show or hide the form. The typed name survives.
    pub fn toggle_visibility(&mut self) {
        self.is_add_theme = !self.is_add_theme;
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.new_theme_name = value.into();
    }

    /// Save the typed name as a new theme.
    ///
    /// Returns `Ok(Some(theme))` when it was stored and `Ok(None)` when the
    /// store refused it; that failure is logged here and not passed on.
    pub async fn submit(
        &mut self,
        store: &dyn DocumentStore,
        session: &Session,
    ) -> Result<Option<Theme>, ThemeFormError> {
        if self.new_theme_name.trim().is_empty() {
            return Err(ThemeFormError::EmptyName);
        }
        let account = session.account().ok_or(ThemeFormError::MissingAccount)?;

        let path = themes_path(account);
        let theme = NewTheme {
            name: self.new_theme_name.clone(),
        };
        let body = match serde_json::to_value(&theme) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "failed to encode theme");
                return Ok(None);
            }
        };

        match store.create(&path, body).await {
            Ok(id) => {
                info!(collection = %path, id = %id, name = %theme.name, "theme created");
                self.new_theme_name.clear();
                self.is_add_theme = false;
                Ok(Some(theme.with_id(id)))
            }
            Err(e) => {
                error!(collection = %path, error = %e, "failed to create theme");
                Ok(None)
            }
        }
    }
}
