//! Field declarations.
//!
//! A [`FieldSpec`] is one row of a form's declaration table: the field name,
//! its rule, the fields it depends on, and how it is bound to the page
//! (error slots, icon, keystroke filtering). The engine turns each spec
//! into a live [`Field`] holding the current value and [`Validity`].

use crate::display::ErrorSlot;
use crate::rules::{FieldContext, FieldRule, ReasonCode, ValidationResult};

/// What happens when the value starts with a space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeadingSpace {
    /// Evaluate the value as typed.
    #[default]
    Keep,
    /// Clear the input and mark the field invalid without showing an error.
    Reset,
    /// Keep the value and show it as an error like any other invalid input.
    Reject,
}

/// Whether a key press may insert its character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDecision {
    Accept,
    Block,
}

/// The validity of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(ReasonCode),
}

impl Validity {
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    pub const fn reason(self) -> ReasonCode {
        match self {
            Self::Valid => ReasonCode::Ok,
            Self::Invalid(reason) => reason,
        }
    }
}

impl From<ValidationResult> for Validity {
    fn from(result: ValidationResult) -> Self {
        if result.valid {
            Self::Valid
        } else {
            Self::Invalid(result.reason)
        }
    }
}

/// Declaration of one form field.
///
/// # Examples
///
/// ```
/// use wyndo_forms::field::{FieldSpec, LeadingSpace};
/// use wyndo_forms::rules::LengthRule;
///
/// let spec = FieldSpec::new("name", LengthRule::new(1, 36))
///     .leading_space(LeadingSpace::Reset)
///     .slot("name-required", [wyndo_forms::ReasonCode::Required])
///     .slot("name-too-long", [wyndo_forms::ReasonCode::TooLong]);
/// assert_eq!(spec.name, "name");
/// ```
#[derive(Debug)]
pub struct FieldSpec {
    /// The field name (HTML name attribute).
    pub name: String,
    /// The rule evaluated on every change.
    pub rule: Box<dyn FieldRule>,
    /// Fields whose changes must re-run this field's rule.
    pub depends_on: Vec<String>,
    /// Leading-space handling.
    pub leading_space: LeadingSpace,
    /// Whether the space key is swallowed at keystroke time.
    pub block_spaces: bool,
    /// Error elements owned by this field.
    pub slots: Vec<ErrorSlot>,
    /// Whether the input carries the error class when invalid.
    pub highlight_input: bool,
    /// Whether the field drives a valid/invalid decorative icon.
    pub icon: bool,
    /// Value present when the page loads.
    pub initial_value: String,
    /// Whether the initial value counts as valid before any edit.
    pub initially_valid: bool,
}

impl FieldSpec {
    /// Creates a spec with no dependencies, no slots and an empty,
    /// invalid initial state.
    pub fn new(name: impl Into<String>, rule: impl FieldRule + 'static) -> Self {
        Self {
            name: name.into(),
            rule: Box::new(rule),
            depends_on: Vec::new(),
            leading_space: LeadingSpace::Keep,
            block_spaces: false,
            slots: Vec::new(),
            highlight_input: true,
            icon: false,
            initial_value: String::new(),
            initially_valid: false,
        }
    }

    /// Re-runs this field's rule whenever `field` changes.
    #[must_use]
    pub fn depends_on(mut self, field: impl Into<String>) -> Self {
        self.depends_on.push(field.into());
        self
    }

    #[must_use]
    pub fn leading_space(mut self, policy: LeadingSpace) -> Self {
        self.leading_space = policy;
        self
    }

    #[must_use]
    pub fn block_spaces(mut self) -> Self {
        self.block_spaces = true;
        self
    }

    /// Binds an error element that is visible while the field fails with
    /// one of `reasons`.
    #[must_use]
    pub fn slot(
        mut self,
        id: impl Into<String>,
        reasons: impl IntoIterator<Item = ReasonCode>,
    ) -> Self {
        self.slots.push(ErrorSlot::new(id, reasons));
        self
    }

    #[must_use]
    pub fn without_input_highlight(mut self) -> Self {
        self.highlight_input = false;
        self
    }

    #[must_use]
    pub fn with_icon(mut self) -> Self {
        self.icon = true;
        self
    }

    /// Pre-fills the field, e.g. from the account being edited.
    #[must_use]
    pub fn initial(mut self, value: impl Into<String>) -> Self {
        self.initial_value = value.into();
        self
    }

    #[must_use]
    pub fn initially_valid(mut self) -> Self {
        self.initially_valid = true;
        self
    }
}

/// A live field: its declaration plus current value and validity.
#[derive(Debug)]
pub struct Field {
    pub(crate) spec: FieldSpec,
    pub(crate) value: String,
    pub(crate) validity: Validity,
}

impl Field {
    pub(crate) fn new(spec: FieldSpec) -> Self {
        let validity = if spec.initially_valid {
            Validity::Valid
        } else {
            Validity::Invalid(ReasonCode::Required)
        };
        Self {
            value: spec.initial_value.clone(),
            spec,
            validity,
        }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn validity(&self) -> Validity {
        self.validity
    }

    pub const fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Decides whether `key` may be inserted into this field.
    pub fn key_press(&self, key: char) -> KeyDecision {
        if self.spec.block_spaces && key == ' ' {
            KeyDecision::Block
        } else {
            KeyDecision::Accept
        }
    }

    pub(crate) fn evaluate(&self, context: &FieldContext<'_>) -> ValidationResult {
        self.spec.rule.evaluate(&self.value, context)
    }
}
