//! Display effects.
//!
//! The engine never touches the page directly. Every evaluation yields a
//! list of [`Effect`]s which a host applies through a [`Surface`]. Each
//! field names its own error elements through [`ErrorSlot`]s, so nothing
//! depends on the order of elements in the markup.
//!
//! [`PageState`] is an in-memory surface that records the resulting page
//! state; it backs headless hosts and the tests.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::password::StrengthIndicator;
use crate::rules::ReasonCode;

/// CSS class put on an input while it shows an error.
pub const INPUT_ERROR_CLASS: &str = "input__error";

/// CSS class hiding an error element.
pub const HIDDEN_CLASS: &str = "hidden";

/// An error element owned by a field, visible for a set of reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSlot {
    pub id: String,
    pub reasons: Vec<ReasonCode>,
}

impl ErrorSlot {
    pub fn new(id: impl Into<String>, reasons: impl IntoIterator<Item = ReasonCode>) -> Self {
        Self {
            id: id.into(),
            reasons: reasons.into_iter().collect(),
        }
    }

    pub fn shows(&self, reason: ReasonCode) -> bool {
        self.reasons.contains(&reason)
    }
}

/// The two assets of a decorative validity icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconState {
    Valid,
    Invalid,
}

impl IconState {
    pub const fn from_valid(valid: bool) -> Self {
        if valid {
            Self::Valid
        } else {
            Self::Invalid
        }
    }
}

/// A single observable change to the page.
///
/// Serializes as `{"kind": ..., "data": ...}` for hosts that receive
/// effects over a bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Effect {
    /// Replace the input's value (leading-space reset).
    SetValue { field: String, value: String },
    /// Add or remove the error class on the input.
    InputError { field: String, on: bool },
    /// Show or hide one of the field's error elements.
    Slot {
        field: String,
        slot: String,
        visible: bool,
    },
    /// Swap a field's decorative icon.
    Icon { field: String, state: IconState },
    /// Light or dim a password strength checkmark.
    Indicator {
        indicator: StrengthIndicator,
        lit: bool,
    },
    /// Set the submit button's `disabled` attribute.
    SubmitDisabled(bool),
}

/// Something that can apply [`Effect`]s, typically a page binding.
pub trait Surface {
    fn apply(&mut self, effect: &Effect);

    fn apply_all(&mut self, effects: &[Effect]) {
        for effect in effects {
            self.apply(effect);
        }
    }
}

/// The page state produced by applying effects, kept in memory.
///
/// Error elements start hidden and the submit button starts disabled, as
/// they are rendered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub values: BTreeMap<String, String>,
    pub input_errors: BTreeSet<String>,
    pub visible_slots: BTreeSet<(String, String)>,
    pub icons: BTreeMap<String, IconState>,
    pub indicators: BTreeMap<StrengthIndicator, bool>,
    pub submit_disabled: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            input_errors: BTreeSet::new(),
            visible_slots: BTreeSet::new(),
            icons: BTreeMap::new(),
            indicators: BTreeMap::new(),
            submit_disabled: true,
        }
    }
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_input_error(&self, field: &str) -> bool {
        self.input_errors.contains(field)
    }

    pub fn is_slot_visible(&self, field: &str, slot: &str) -> bool {
        self.visible_slots
            .contains(&(field.to_string(), slot.to_string()))
    }

    /// Error elements of `field` that are currently visible.
    pub fn visible_slots_of(&self, field: &str) -> Vec<&str> {
        self.visible_slots
            .iter()
            .filter(|(f, _)| f == field)
            .map(|(_, slot)| slot.as_str())
            .collect()
    }

    pub fn icon(&self, field: &str) -> Option<IconState> {
        self.icons.get(field).copied()
    }

    pub fn is_lit(&self, indicator: StrengthIndicator) -> bool {
        self.indicators.get(&indicator).copied().unwrap_or(false)
    }
}

impl Surface for PageState {
    fn apply(&mut self, effect: &Effect) {
        match effect {
            Effect::SetValue { field, value } => {
                self.values.insert(field.clone(), value.clone());
            }
            Effect::InputError { field, on } => {
                if *on {
                    self.input_errors.insert(field.clone());
                } else {
                    self.input_errors.remove(field);
                }
            }
            Effect::Slot {
                field,
                slot,
                visible,
            } => {
                let key = (field.clone(), slot.clone());
                if *visible {
                    self.visible_slots.insert(key);
                } else {
                    self.visible_slots.remove(&key);
                }
            }
            Effect::Icon { field, state } => {
                self.icons.insert(field.clone(), *state);
            }
            Effect::Indicator { indicator, lit } => {
                self.indicators.insert(*indicator, *lit);
            }
            Effect::SubmitDisabled(disabled) => {
                self.submit_disabled = *disabled;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_shows() {
        let slot = ErrorSlot::new("name-too-long", [ReasonCode::TooLong]);
        assert!(slot.shows(ReasonCode::TooLong));
        assert!(!slot.shows(ReasonCode::Required));
    }

    #[test]
    fn test_page_state_defaults() {
        let page = PageState::new();
        assert!(page.submit_disabled);
        assert!(page.visible_slots.is_empty());
        assert!(!page.is_lit(StrengthIndicator::Upper));
    }

    #[test]
    fn test_apply_effects() {
        let mut page = PageState::new();
        page.apply_all(&[
            Effect::InputError {
                field: "name".into(),
                on: true,
            },
            Effect::Slot {
                field: "name".into(),
                slot: "name-required".into(),
                visible: true,
            },
            Effect::Icon {
                field: "email".into(),
                state: IconState::Invalid,
            },
            Effect::SubmitDisabled(false),
        ]);
        assert!(page.has_input_error("name"));
        assert!(page.is_slot_visible("name", "name-required"));
        assert_eq!(page.visible_slots_of("name"), vec!["name-required"]);
        assert_eq!(page.icon("email"), Some(IconState::Invalid));
        assert!(!page.submit_disabled);

        page.apply(&Effect::InputError {
            field: "name".into(),
            on: false,
        });
        page.apply(&Effect::Slot {
            field: "name".into(),
            slot: "name-required".into(),
            visible: false,
        });
        assert!(!page.has_input_error("name"));
        assert!(page.visible_slots_of("name").is_empty());
    }

    #[test]
    fn test_effect_json() {
        let slot = serde_json::to_value(Effect::Slot {
            field: "email".into(),
            slot: "email-error".into(),
            visible: true,
        })
        .unwrap();
        assert_eq!(
            slot,
            serde_json::json!({
                "kind": "slot",
                "data": {"field": "email", "slot": "email-error", "visible": true}
            })
        );

        let submit = serde_json::to_value(Effect::SubmitDisabled(true)).unwrap();
        assert_eq!(submit, serde_json::json!({"kind": "submit_disabled", "data": true}));

        let indicator = serde_json::to_value(Effect::Indicator {
            indicator: StrengthIndicator::MinLength,
            lit: false,
        })
        .unwrap();
        assert_eq!(indicator["data"]["indicator"], "min_length");
    }

    #[test]
    fn test_set_value_and_indicator() {
        let mut page = PageState::new();
        page.apply(&Effect::SetValue {
            field: "password".into(),
            value: String::new(),
        });
        page.apply(&Effect::Indicator {
            indicator: StrengthIndicator::Digit,
            lit: true,
        });
        assert_eq!(page.values.get("password").map(String::as_str), Some(""));
        assert!(page.is_lit(StrengthIndicator::Digit));
    }
}
