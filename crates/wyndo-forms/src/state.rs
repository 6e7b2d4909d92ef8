//! The submit gate.
//!
//! [`FormState`] replaces the per-page `isValidX` flags: one record holding
//! every field's validity, the user-controlled conditions (such as the terms
//! checkbox) and the server-supplied preconditions. `can_submit` is derived
//! from it on demand and never cached.

use std::collections::BTreeMap;

use crate::field::Validity;

/// Validity of every field plus the boolean side conditions of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    fields: BTreeMap<String, Validity>,
    conditions: BTreeMap<String, bool>,
    preconditions: BTreeMap<String, bool>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, name: impl Into<String>, validity: Validity) {
        self.fields.insert(name.into(), validity);
    }

    pub fn field(&self, name: &str) -> Option<Validity> {
        self.fields.get(name).copied()
    }

    /// Sets a user-controlled condition, e.g. "terms accepted".
    pub fn set_condition(&mut self, name: impl Into<String>, value: bool) {
        self.conditions.insert(name.into(), value);
    }

    pub fn condition(&self, name: &str) -> Option<bool> {
        self.conditions.get(name).copied()
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// Records a precondition supplied once by the server.
    pub fn set_precondition(&mut self, name: impl Into<String>, value: bool) {
        self.preconditions.insert(name.into(), value);
    }

    pub fn precondition(&self, name: &str) -> Option<bool> {
        self.preconditions.get(name).copied()
    }

    /// `true` iff every field is valid and every condition and precondition
    /// holds.
    pub fn can_submit(&self) -> bool {
        self.fields.values().all(|v| v.is_valid())
            && self.conditions.values().all(|&c| c)
            && self.preconditions.values().all(|&c| c)
    }

    /// Names of the fields that currently block submission.
    pub fn invalid_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, v)| !v.is_valid())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
