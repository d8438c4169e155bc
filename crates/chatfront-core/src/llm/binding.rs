//! Session model binding.
//!
//! One variable per user session: the currently selected model. The
//! binding is an explicit context object constructed from the session on
//! every request and written back when it changes -- never process-wide
//! state.

use chatfront_types::error::SelectionError;

use crate::llm::directory::OnlineModels;

/// The model selection carried by one user session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelBinding {
    selected: Option<String>,
}

impl ModelBinding {
    pub fn new(selected: Option<String>) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Reconcile the selection against the live model list.
    ///
    /// If the selection is unset or no longer online, it falls back to
    /// the first online model (or to none when the list is empty).
    /// Idempotent; re-evaluated on every chat view. Returns whether the
    /// selection changed, so the caller knows to persist it back to the
    /// session.
    pub fn reconcile(&mut self, online: &OnlineModels) -> bool {
        let still_valid = self
            .selected
            .as_deref()
            .is_some_and(|m| online.contains(m));
        if still_valid {
            return false;
        }
        let fallback = online.models.first().cloned();
        if fallback == self.selected {
            return false;
        }
        self.selected = fallback;
        true
    }

    /// Explicitly select a model. Accepted only while it is online;
    /// otherwise the selection is left unchanged.
    pub fn select(&mut self, model: &str, online: &OnlineModels) -> Result<(), SelectionError> {
        if !online.contains(model) {
            return Err(SelectionError::InvalidSelection(model.to_string()));
        }
        self.selected = Some(model.to_string());
        Ok(())
    }
}
