//! # wyndo-forms
//!
//! Client-side form validation for the wyndo storefront. A
//! [`ValidationEngine`] is built from a table of [`FieldSpec`]s; every
//! input event is fed through [`ValidationEngine::update`], which re-runs
//! the affected rules and returns the display [`Effect`]s and the new
//! submit gate.
//!
//! [`presets`] contains the account and retailer forms of the storefront,
//! [`widgets`] and [`variants`] the small stateful page controls that carry
//! no validation semantics.

pub mod display;
pub mod engine;
pub mod field;
pub mod password;
pub mod presets;
pub mod rules;
pub mod state;
pub mod variants;
pub mod widgets;

pub use display::{Effect, ErrorSlot, IconState, PageState, Surface};
pub use engine::{FormBuilder, UpdateOutcome, ValidationEngine};
pub use field::{FieldSpec, KeyDecision, LeadingSpace, Validity};
pub use password::{PasswordPolicy, PasswordStrength, StrengthIndicator};
pub use rules::{FieldContext, FieldRule, ReasonCode, ValidationResult};
pub use state::FormState;
