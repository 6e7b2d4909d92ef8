//! Field rules.
//!
//! A rule is a pure function from a field's value (and the values of the
//! other fields in the form) to a [`ValidationResult`]. Rules never fail;
//! an invalid value is reported through the [`ReasonCode`].

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::password::{PasswordPolicy, PasswordStrength};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9\-]*[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$")
        .expect("valid regex")
});

/// Why a field is (in)valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// The value satisfies its rule.
    Ok,
    /// The value is empty or shorter than the minimum.
    Required,
    /// The value is longer than the maximum.
    TooLong,
    /// The value started with a space.
    LeadingSpace,
    /// The value is not an email address.
    InvalidEmail,
    /// The password misses one of the strength conditions.
    WeakPassword,
    /// The password and its confirmation differ.
    Mismatch,
    /// The confirmation matches, but the password itself is not accepted.
    WeakMatch,
    /// No option is selected.
    NotSelected,
    /// No file is selected.
    MissingFile,
    /// The selected file's extension is not allowed.
    UnsupportedExtension,
}

impl ReasonCode {
    /// Short machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Required => "required",
            Self::TooLong => "too_long",
            Self::LeadingSpace => "leading_space",
            Self::InvalidEmail => "invalid_email",
            Self::WeakPassword => "weak_password",
            Self::Mismatch => "mismatch",
            Self::WeakMatch => "weak_match",
            Self::NotSelected => "not_selected",
            Self::MissingFile => "missing_file",
            Self::UnsupportedExtension => "unsupported_extension",
        }
    }

    /// Reasons for which no error is shown on the field itself.
    pub const fn is_silent(self) -> bool {
        matches!(self, Self::Ok | Self::WeakMatch)
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The verdict of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub reason: ReasonCode,
}

impl ValidationResult {
    /// A passing result.
    pub const fn ok() -> Self {
        Self {
            valid: true,
            reason: ReasonCode::Ok,
        }
    }

    /// A failing result with the given reason.
    pub const fn fail(reason: ReasonCode) -> Self {
        Self {
            valid: false,
            reason,
        }
    }
}

/// Read-only view of the current values of every field in a form.
#[derive(Debug, Default, Clone)]
pub struct FieldContext<'a> {
    values: HashMap<&'a str, &'a str>,
}

impl<'a> FieldContext<'a> {
    /// Builds a context from `(name, value)` pairs.
    pub fn new(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// The value of `field`, if it exists.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        self.values.get(field).copied()
    }

    /// The value of `field`, or the empty string if it does not exist.
    pub fn value_of(&self, field: &str) -> &'a str {
        self.get(field).unwrap_or("")
    }
}

/// A validation rule for one field.
pub trait FieldRule: fmt::Debug + Send + Sync {
    /// Evaluates `value` with the other fields' values available in `context`.
    fn evaluate(&self, value: &str, context: &FieldContext<'_>) -> ValidationResult;
}

/// A rule backed by a plain function, for one-off checks that do not
/// deserve their own type.
pub struct FnRule<F> {
    name: &'static str,
    check: F,
}

impl<F> FnRule<F>
where
    F: Fn(&str, &FieldContext<'_>) -> ValidationResult + Send + Sync,
{
    pub const fn new(name: &'static str, check: F) -> Self {
        Self { name, check }
    }
}

impl<F> fmt::Debug for FnRule<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRule").field("name", &self.name).finish()
    }
}

impl<F> FieldRule for FnRule<F>
where
    F: Fn(&str, &FieldContext<'_>) -> ValidationResult + Send + Sync,
{
    fn evaluate(&self, value: &str, context: &FieldContext<'_>) -> ValidationResult {
        (self.check)(value, context)
    }
}

// ── Text ─────────────────────────────────────────────────────────────

/// Character-count bounds, inclusive on both sides.
///
/// Used for names (`1..=36`) and retailer descriptions (`1..=300`), both
/// measured on the trimmed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
    /// Count the value without surrounding whitespace.
    pub trimmed: bool,
}

impl LengthRule {
    pub const fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            trimmed: false,
        }
    }

    /// Bounds applied to the value with surrounding whitespace removed.
    pub const fn trimmed(min: usize, max: usize) -> Self {
        Self {
            min,
            max,
            trimmed: true,
        }
    }
}

impl FieldRule for LengthRule {
    fn evaluate(&self, value: &str, _context: &FieldContext<'_>) -> ValidationResult {
        let counted = if self.trimmed { value.trim() } else { value };
        let length = counted.chars().count();
        if length < self.min {
            ValidationResult::fail(ReasonCode::Required)
        } else if length > self.max {
            ValidationResult::fail(ReasonCode::TooLong)
        } else {
            ValidationResult::ok()
        }
    }
}

/// An email address: `local@domain` where the domain contains a dot and ends
/// in an alphabetic label of at least two letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailRule;

impl EmailRule {
    pub fn is_email(value: &str) -> bool {
        EMAIL_RE.is_match(value)
    }
}

impl FieldRule for EmailRule {
    fn evaluate(&self, value: &str, _context: &FieldContext<'_>) -> ValidationResult {
        if Self::is_email(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::fail(ReasonCode::InvalidEmail)
        }
    }
}

// ── Passwords ────────────────────────────────────────────────────────

/// A password that must satisfy a [`PasswordPolicy`].
///
/// When `confirmation` names another field, the password is only valid once
/// that field holds the same value. With `optional` set, an empty password
/// paired with an empty confirmation is valid, which is how a profile form
/// leaves the password unchanged.
#[derive(Debug, Clone, Default)]
pub struct PasswordRule {
    pub policy: PasswordPolicy,
    pub confirmation: Option<String>,
    pub optional: bool,
}

impl PasswordRule {
    pub fn new(policy: PasswordPolicy) -> Self {
        Self {
            policy,
            confirmation: None,
            optional: false,
        }
    }

    /// Requires the password to equal the value of `field`.
    #[must_use]
    pub fn confirmed_by(mut self, field: impl Into<String>) -> Self {
        self.confirmation = Some(field.into());
        self
    }

    /// Accepts an empty password (and empty confirmation).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl FieldRule for PasswordRule {
    fn evaluate(&self, value: &str, context: &FieldContext<'_>) -> ValidationResult {
        let confirmation = self
            .confirmation
            .as_deref()
            .map_or(value, |field| context.value_of(field));

        if self.optional && value.is_empty() && confirmation.is_empty() {
            return ValidationResult::ok();
        }

        let strength = PasswordStrength::evaluate(&self.policy, value, confirmation);
        if !strength.is_strong() {
            ValidationResult::fail(ReasonCode::WeakPassword)
        } else if !strength.matches_confirmation {
            ValidationResult::fail(ReasonCode::Mismatch)
        } else {
            ValidationResult::ok()
        }
    }
}

/// A confirmation field that must repeat an accepted password.
#[derive(Debug, Clone)]
pub struct ConfirmationRule {
    pub password_field: String,
    pub policy: PasswordPolicy,
    pub optional: bool,
}

impl ConfirmationRule {
    pub fn new(password_field: impl Into<String>, policy: PasswordPolicy) -> Self {
        Self {
            password_field: password_field.into(),
            policy,
            optional: false,
        }
    }

    /// Accepts an empty confirmation while the password is empty too.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

impl FieldRule for ConfirmationRule {
    fn evaluate(&self, value: &str, context: &FieldContext<'_>) -> ValidationResult {
        let password = context.value_of(&self.password_field);

        if value.is_empty() {
            return if self.optional && password.is_empty() {
                ValidationResult::ok()
            } else {
                ValidationResult::fail(ReasonCode::Required)
            };
        }

        if value != password {
            ValidationResult::fail(ReasonCode::Mismatch)
        } else if !self.policy.accepts(password) {
            ValidationResult::fail(ReasonCode::WeakMatch)
        } else {
            ValidationResult::ok()
        }
    }
}

// ── Retailer onboarding ──────────────────────────────────────────────

/// A select box whose placeholder option has an empty value.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionRule;

impl FieldRule for SelectionRule {
    fn evaluate(&self, value: &str, _context: &FieldContext<'_>) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::fail(ReasonCode::NotSelected)
        } else {
            ValidationResult::ok()
        }
    }
}

/// A file input; the value is the selected file's name.
#[derive(Debug, Clone)]
pub struct ImageRule {
    extensions: Vec<String>,
}

impl ImageRule {
    /// Creates a rule accepting the given extensions (without the dot).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn accepts(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(stem, ext)| {
                !stem.is_empty() && self.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

impl Default for ImageRule {
    fn default() -> Self {
        Self::new(["gif", "jpeg", "jpg", "png"])
    }
}

impl FieldRule for ImageRule {
    fn evaluate(&self, value: &str, _context: &FieldContext<'_>) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::fail(ReasonCode::MissingFile)
        } else if self.accepts(value) {
            ValidationResult::ok()
        } else {
            ValidationResult::fail(ReasonCode::UnsupportedExtension)
        }
    }
}
