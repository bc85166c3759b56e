//! Handler registry: maps handler labels to their named actions

use crate::command::Action;
use std::collections::HashMap;
use tracing::info;

/// Mapping from handler label to the set of actions it exposes.
///
/// Written at setup time (or later, last registration wins) and read-only
/// during dispatch. No shape validation is performed on registration: an
/// empty action map is legal and simply fails lookups later.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, HashMap<String, Action>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the action set for a handler label.
    ///
    /// Replaces any prior entry wholesale, never merges: an action name not
    /// present in the new set no longer resolves.
    pub fn register(&mut self, label: impl Into<String>, actions: HashMap<String, Action>) {
        let label = label.into();
        info!("Registering {} command handler ({} actions)", label, actions.len());
        self.handlers.insert(label, actions);
    }

    /// Look up the action registered under `(label, action)`. Pure lookup.
    pub fn resolve(&self, label: &str, action: &str) -> Option<&Action> {
        self.handlers.get(label).and_then(|actions| actions.get(action))
    }
}
