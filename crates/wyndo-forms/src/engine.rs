//! The validation engine.
//!
//! A [`ValidationEngine`] owns the fields of one form. Every input event is
//! passed to [`ValidationEngine::update`], which:
//!
//! 1. applies the field's leading-space policy,
//! 2. runs the field's rule against the current values of all fields,
//! 3. re-runs the rules of every field that depends on it (transitively,
//!    each field at most once),
//! 4. refreshes the password strength panel when one is bound,
//! 5. recomputes the submit gate.
//!
//! Dependencies are declared per field, so a confirmation field that
//! depends on its password is re-checked when the password changes, and is
//! checked against the password when edited itself.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use tracing::debug;
use wyndo_core::logging::form_span;
use wyndo_core::{WyndoError, WyndoResult};

use crate::display::{Effect, IconState};
use crate::field::{Field, FieldSpec, KeyDecision, LeadingSpace, Validity};
use crate::password::{PasswordPolicy, PasswordStrength};
use crate::rules::{FieldContext, ReasonCode, ValidationResult};
use crate::state::FormState;

/// Password/confirmation pair driving the strength checkmarks.
#[derive(Debug, Clone)]
struct StrengthBinding {
    password: String,
    confirmation: String,
    policy: PasswordPolicy,
}

/// What an update changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    /// The value the edited field holds after the update. Differs from the
    /// submitted value when a leading space caused a reset.
    pub value: String,
    /// Results of every rule that ran, the edited field first.
    pub results: Vec<(String, ValidationResult)>,
    /// Effects to apply to the page, in order.
    pub effects: Vec<Effect>,
    /// Whether the submit button is enabled afterwards.
    pub can_submit: bool,
}

impl UpdateOutcome {
    /// The result computed for `field` during this update, if its rule ran.
    pub fn result(&self, field: &str) -> Option<ValidationResult> {
        self.results
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, result)| *result)
    }
}

/// A form's fields, their validity and the submit gate.
#[derive(Debug)]
pub struct ValidationEngine {
    name: String,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
    dependents: HashMap<String, Vec<usize>>,
    state: FormState,
    strength: Option<StrengthBinding>,
}

impl ValidationEngine {
    /// Creates an engine with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            index: HashMap::new(),
            dependents: HashMap::new(),
            state: FormState::new(),
            strength: None,
        }
    }

    /// Starts a declarative form definition.
    pub fn builder(name: impl Into<String>) -> FormBuilder {
        FormBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a field. Every field it depends on must already be registered;
    /// use [`FormBuilder`] for mutually dependent fields.
    pub fn register(&mut self, spec: FieldSpec) -> WyndoResult<()> {
        for dependency in &spec.depends_on {
            if !self.index.contains_key(dependency) && *dependency != spec.name {
                return Err(WyndoError::UnknownDependency {
                    field: spec.name.clone(),
                    depends_on: dependency.clone(),
                });
            }
        }
        let idx = self.insert(spec)?;
        self.link(idx)
    }

    /// Adds a boolean condition the user controls, such as a terms checkbox.
    pub fn register_condition(&mut self, name: impl Into<String>, initial: bool) {
        self.state.set_condition(name, initial);
    }

    /// Records a precondition supplied by the server when the page loads.
    /// It cannot be changed afterwards through [`set_condition`](Self::set_condition).
    pub fn set_precondition(&mut self, name: impl Into<String>, value: bool) {
        self.state.set_precondition(name, value);
    }

    /// Binds the strength checkmarks to a password/confirmation pair.
    pub fn bind_strength(
        &mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
        policy: PasswordPolicy,
    ) -> WyndoResult<()> {
        let password = password.into();
        let confirmation = confirmation.into();
        self.index_of(&password)?;
        self.index_of(&confirmation)?;
        self.strength = Some(StrengthBinding {
            password,
            confirmation,
            policy,
        });
        Ok(())
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Handles a new value for `field`.
    pub fn update(&mut self, field: &str, value: impl Into<String>) -> WyndoResult<UpdateOutcome> {
        let _span = form_span(&self.name).entered();
        let idx = self.index_of(field)?;
        let mut value = value.into();
        let mut effects = Vec::new();
        let mut results = Vec::new();

        let leading_space = value.starts_with(' ');
        let policy = self.fields[idx].spec.leading_space;

        let result = if leading_space && policy == LeadingSpace::Reset {
            value.clear();
            self.fields[idx].value.clear();
            let result = ValidationResult::fail(ReasonCode::LeadingSpace);
            self.record(idx, result);
            effects.push(Effect::SetValue {
                field: field.to_string(),
                value: String::new(),
            });
            result
        } else {
            self.fields[idx].value.clone_from(&value);
            let result = if leading_space && policy == LeadingSpace::Reject {
                ValidationResult::fail(ReasonCode::LeadingSpace)
            } else {
                self.evaluate(idx)
            };
            self.record(idx, result);
            self.push_display(idx, &mut effects);
            result
        };
        debug!(field, reason = %result.reason, "field evaluated");
        results.push((field.to_string(), result));
        self.push_icon(idx, &mut effects);

        for dep in self.propagation_order(idx) {
            let result = self.evaluate(dep);
            self.record(dep, result);
            let dep_field = &self.fields[dep];
            debug!(field = dep_field.name(), reason = %result.reason, "dependent re-evaluated");
            results.push((dep_field.name().to_string(), result));
            if !dep_field.value.is_empty() {
                self.push_display(dep, &mut effects);
                self.push_icon(dep, &mut effects);
            }
        }

        if self
            .strength
            .as_ref()
            .is_some_and(|s| s.password == field || s.confirmation == field)
        {
            self.push_strength(&mut effects);
        }

        let can_submit = self.state.can_submit();
        effects.push(Effect::SubmitDisabled(!can_submit));
        debug!(can_submit, "submit gate recomputed");

        Ok(UpdateOutcome {
            value,
            results,
            effects,
            can_submit,
        })
    }

    /// Handles a change of a registered condition.
    pub fn set_condition(&mut self, name: &str, value: bool) -> WyndoResult<UpdateOutcome> {
        if !self.state.has_condition(name) {
            return Err(WyndoError::UnknownField(name.to_string()));
        }
        self.state.set_condition(name, value);
        let can_submit = self.state.can_submit();
        Ok(UpdateOutcome {
            value: value.to_string(),
            results: Vec::new(),
            effects: vec![Effect::SubmitDisabled(!can_submit)],
            can_submit,
        })
    }

    /// Decides whether a key press may insert its character into `field`.
    pub fn key_press(&self, field: &str, key: char) -> WyndoResult<KeyDecision> {
        let idx = self.index_of(field)?;
        Ok(self.fields[idx].key_press(key))
    }

    /// Effects bringing a freshly rendered page in line with the engine:
    /// the submit button state and the strength checkmarks.
    pub fn initial_effects(&self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.strength.is_some() {
            self.push_strength(&mut effects);
        }
        effects.push(Effect::SubmitDisabled(!self.can_submit()));
        effects
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    pub const fn state(&self) -> &FormState {
        &self.state
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.index.get(name).map(|&idx| &self.fields[idx])
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).map(Field::value)
    }

    pub fn validity(&self, name: &str) -> Option<Validity> {
        self.field(name).map(Field::validity)
    }

    /// The strength bits of the bound password pair.
    pub fn strength(&self) -> Option<PasswordStrength> {
        self.strength.as_ref().map(|binding| {
            PasswordStrength::evaluate(
                &binding.policy,
                self.value(&binding.password).unwrap_or(""),
                self.value(&binding.confirmation).unwrap_or(""),
            )
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn index_of(&self, name: &str) -> WyndoResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| WyndoError::UnknownField(name.to_string()))
    }

    fn insert(&mut self, spec: FieldSpec) -> WyndoResult<usize> {
        if self.index.contains_key(&spec.name) {
            return Err(WyndoError::DuplicateField(spec.name));
        }
        let field = Field::new(spec);
        let idx = self.fields.len();
        self.state.set_field(field.name(), field.validity());
        self.index.insert(field.name().to_string(), idx);
        self.fields.push(field);
        Ok(idx)
    }

    fn link(&mut self, idx: usize) -> WyndoResult<()> {
        let field = &self.fields[idx];
        for dependency in &field.spec.depends_on {
            if !self.index.contains_key(dependency) {
                return Err(WyndoError::UnknownDependency {
                    field: field.name().to_string(),
                    depends_on: dependency.clone(),
                });
            }
            self.dependents
                .entry(dependency.clone())
                .or_default()
                .push(idx);
        }
        Ok(())
    }

    fn evaluate(&self, idx: usize) -> ValidationResult {
        let context = FieldContext::new(self.fields.iter().map(|f| (f.name(), f.value())));
        self.fields[idx].evaluate(&context)
    }

    fn record(&mut self, idx: usize, result: ValidationResult) {
        let field = &mut self.fields[idx];
        field.validity = result.into();
        self.state.set_field(field.spec.name.clone(), field.validity);
    }

    /// Fields to re-run after `origin` changed, breadth-first.
    fn propagation_order(&self, origin: usize) -> Vec<usize> {
        let mut visited = HashSet::from([origin]);
        let mut queue = VecDeque::from([origin]);
        let mut order = Vec::new();
        while let Some(idx) = queue.pop_front() {
            let Some(dependents) = self.dependents.get(self.fields[idx].name()) else {
                continue;
            };
            for &dep in dependents {
                if visited.insert(dep) {
                    order.push(dep);
                    queue.push_back(dep);
                }
            }
        }
        order
    }

    fn push_display(&self, idx: usize, effects: &mut Vec<Effect>) {
        let field = &self.fields[idx];
        let reason = field.validity.reason();
        let shown = !reason.is_silent();
        if field.spec.highlight_input {
            effects.push(Effect::InputError {
                field: field.name().to_string(),
                on: shown,
            });
        }
        // At most one slot per reason is expected, so at most one is shown.
        for slot in &field.spec.slots {
            effects.push(Effect::Slot {
                field: field.name().to_string(),
                slot: slot.id.clone(),
                visible: shown && slot.shows(reason),
            });
        }
    }

    fn push_icon(&self, idx: usize, effects: &mut Vec<Effect>) {
        let field = &self.fields[idx];
        if field.spec.icon {
            effects.push(Effect::Icon {
                field: field.name().to_string(),
                state: IconState::from_valid(field.validity.is_valid()),
            });
        }
    }

    fn push_strength(&self, effects: &mut Vec<Effect>) {
        if let Some(strength) = self.strength() {
            effects.extend(
                strength
                    .indicators()
                    .into_iter()
                    .map(|(indicator, lit)| Effect::Indicator { indicator, lit }),
            );
        }
    }
}

/// Declarative form definition: the field table, conditions and
/// preconditions of one form.
///
/// # Examples
///
/// ```
/// use wyndo_forms::engine::ValidationEngine;
/// use wyndo_forms::field::FieldSpec;
/// use wyndo_forms::password::PasswordPolicy;
/// use wyndo_forms::rules::{ConfirmationRule, PasswordRule};
///
/// let mut engine = ValidationEngine::builder("password_reset")
///     .field(FieldSpec::new("new_password1", PasswordRule::default()))
///     .field(
///         FieldSpec::new("new_password2", ConfirmationRule::new("new_password1", PasswordPolicy::default()))
///             .depends_on("new_password1"),
///     )
///     .build()
///     .unwrap();
///
/// engine.update("new_password1", "Passw0rd").unwrap();
/// let outcome = engine.update("new_password2", "Passw0rd").unwrap();
/// assert!(outcome.can_submit);
/// ```
#[derive(Debug)]
pub struct FormBuilder {
    name: String,
    fields: Vec<FieldSpec>,
    conditions: Vec<(String, bool)>,
    preconditions: Vec<(String, bool)>,
    strength: Option<(String, String, PasswordPolicy)>,
}

impl FormBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            conditions: Vec::new(),
            preconditions: Vec::new(),
            strength: None,
        }
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn condition(mut self, name: impl Into<String>, initial: bool) -> Self {
        self.conditions.push((name.into(), initial));
        self
    }

    #[must_use]
    pub fn precondition(mut self, name: impl Into<String>, value: bool) -> Self {
        self.preconditions.push((name.into(), value));
        self
    }

    #[must_use]
    pub fn strength(
        mut self,
        password: impl Into<String>,
        confirmation: impl Into<String>,
        policy: PasswordPolicy,
    ) -> Self {
        self.strength = Some((password.into(), confirmation.into(), policy));
        self
    }

    /// Builds the engine. Dependencies may point at fields declared later
    /// in the table, including mutual dependencies.
    pub fn build(self) -> WyndoResult<ValidationEngine> {
        let mut engine = ValidationEngine::new(self.name);
        let mut indices = Vec::with_capacity(self.fields.len());
        for spec in self.fields {
            indices.push(engine.insert(spec)?);
        }
        for idx in indices {
            engine.link(idx)?;
        }
        for (name, initial) in self.conditions {
            engine.register_condition(name, initial);
        }
        for (name, value) in self.preconditions {
            engine.set_precondition(name, value);
        }
        if let Some((password, confirmation, policy)) = self.strength {
            engine.bind_strength(password, confirmation, policy)?;
        }
        Ok(engine)
    }
}
