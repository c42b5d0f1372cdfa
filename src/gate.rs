// src/gate.rs
use std::collections::HashMap;
use parking_lot::RwLock;
use tracing::info;

use crate::error::{ThreatScopeError, ThreatScopeResult};

pub const INITIALS_KEY: &str = "userInitials";
pub const MIN_INITIALS_LEN: usize = 2;

pub const DISCLAIMER: &str = "This tool queries a third-party scanning service about the target you enter. \
Only analyze targets you are authorized to investigate. Results are indicative, not conclusive.";

/// Key/value storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct SessionStore {
    values: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// Whether the entered initials are long enough to unlock the gate
pub fn validate_initials(initials: &str) -> bool {
    initials.trim().chars().count() >= MIN_INITIALS_LEN
}

/// Click-through disclaimer gate
pub struct AccessGate<'a> {
    session: &'a SessionStore,
}

impl<'a> AccessGate<'a> {
    pub fn new(session: &'a SessionStore) -> Self {
        Self { session }
    }

    pub fn is_accepted(&self) -> bool {
        self.session.get(INITIALS_KEY).is_some()
    }

    /// Record acceptance under the entered initials
    pub fn accept(&self, initials: &str) -> ThreatScopeResult<()> {
        if !validate_initials(initials) {
            return Err(ThreatScopeError::ValidationError(
                format!("Initials must be at least {} characters", MIN_INITIALS_LEN)
            ));
        }

        self.session.set(INITIALS_KEY, initials.trim());
        info!("Disclaimer accepted");
        Ok(())
    }
}
