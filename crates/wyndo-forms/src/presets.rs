//! The storefront's account and retailer forms as declaration tables.
//!
//! Each function returns a ready [`ValidationEngine`]. Field names are the
//! HTML `name` attributes of the rendered forms; slot ids are the ids of
//! their error elements.

use wyndo_core::{FormSettings, WyndoResult};

use crate::engine::ValidationEngine;
use crate::field::{FieldSpec, LeadingSpace};
use crate::password::PasswordPolicy;
use crate::rules::{
    ConfirmationRule, EmailRule, ImageRule, LengthRule, PasswordRule, ReasonCode, SelectionRule,
};

/// Name of the terms-and-conditions checkbox condition.
pub const TERMS: &str = "terms_conditions";

/// Name of the server-supplied "signup may continue" precondition.
pub const CONTINUE: &str = "continue";

/// Interprets the hidden `continue` input rendered by the server. Only the
/// literal `False` blocks the form.
pub fn continuation_allowed(raw: &str) -> bool {
    raw != "False"
}

fn password_policy(settings: &FormSettings) -> PasswordPolicy {
    PasswordPolicy::new(settings.password_min_length)
}

fn name_field(name: &str, settings: &FormSettings) -> FieldSpec {
    FieldSpec::new(name, LengthRule::trimmed(1, settings.name_max_length))
        .leading_space(LeadingSpace::Reset)
        .slot(format!("{name}-required"), [ReasonCode::Required])
        .slot(format!("{name}-too-long"), [ReasonCode::TooLong])
}

fn email_field() -> FieldSpec {
    FieldSpec::new("email", EmailRule).slot("email-error", [ReasonCode::InvalidEmail])
}

fn password_field(name: &str, policy: PasswordPolicy) -> FieldSpec {
    FieldSpec::new(name, PasswordRule::new(policy))
        .leading_space(LeadingSpace::Reset)
        .block_spaces()
        .slot(format!("{name}-error"), [ReasonCode::WeakPassword])
}

fn confirmation_field(name: &str, password: &str, policy: PasswordPolicy) -> FieldSpec {
    FieldSpec::new(name, ConfirmationRule::new(password, policy))
        .depends_on(password)
        .leading_space(LeadingSpace::Reset)
        .block_spaces()
        .slot(
            format!("{name}-error"),
            [ReasonCode::Required, ReasonCode::Mismatch],
        )
}

/// Shopper signup: names, email, password pair and the terms checkbox.
pub fn signup(settings: &FormSettings) -> WyndoResult<ValidationEngine> {
    let policy = password_policy(settings);
    ValidationEngine::builder("signup")
        .field(name_field("name", settings))
        .field(name_field("last_name", settings))
        .field(email_field().with_icon().block_spaces())
        .field(password_field("password", policy))
        .field(confirmation_field("confirm_password", "password", policy))
        .condition(TERMS, false)
        .build()
}

/// Login: email and password.
pub fn login(settings: &FormSettings) -> WyndoResult<ValidationEngine> {
    ValidationEngine::builder("login")
        .field(email_field())
        .field(password_field("password", password_policy(settings)))
        .build()
}

/// Forgot password: email only.
pub fn forgot_password() -> WyndoResult<ValidationEngine> {
    ValidationEngine::builder("forgot_password")
        .field(email_field())
        .build()
}

/// Password reset: new password and its confirmation.
///
/// A confirmation that matches a password which is not yet accepted keeps
/// the form blocked without showing the mismatch error.
pub fn password_reset(settings: &FormSettings) -> WyndoResult<ValidationEngine> {
    let policy = password_policy(settings);
    ValidationEngine::builder("password_reset")
        .field(password_field("new_password1", policy))
        .field(confirmation_field("new_password2", "new_password1", policy))
        .build()
}

/// Profile edit, pre-filled with the account's names.
///
/// Every field starts valid. The password pair is optional: leaving both
/// empty keeps the current password. Otherwise the password must be strong
/// and confirmed, which the strength checkmarks report condition by
/// condition.
pub fn edit_profile(
    settings: &FormSettings,
    first_name: &str,
    last_name: &str,
) -> WyndoResult<ValidationEngine> {
    let policy = password_policy(settings);
    ValidationEngine::builder("edit_profile")
        .field(
            name_field("first_name", settings)
                .initial(first_name)
                .initially_valid(),
        )
        .field(
            name_field("last_name", settings)
                .initial(last_name)
                .initially_valid(),
        )
        .field(
            FieldSpec::new(
                "password",
                PasswordRule::new(policy)
                    .confirmed_by("confirm_password")
                    .optional(),
            )
            .depends_on("confirm_password")
            .leading_space(LeadingSpace::Reset)
            .block_spaces()
            .without_input_highlight()
            .initially_valid(),
        )
        .field(
            FieldSpec::new(
                "confirm_password",
                ConfirmationRule::new("password", policy).optional(),
            )
            .depends_on("password")
            .leading_space(LeadingSpace::Reset)
            .block_spaces()
            .without_input_highlight()
            .initially_valid(),
        )
        .strength("password", "confirm_password", policy)
        .build()
}

/// Retailer onboarding.
///
/// `can_continue` is the raw value of the hidden `continue` input.
pub fn retailer_signup(settings: &FormSettings, can_continue: &str) -> WyndoResult<ValidationEngine> {
    ValidationEngine::builder("retailer_signup")
        .field(name_field("name", settings))
        .field(email_field().with_icon().block_spaces())
        .field(password_field("password", password_policy(settings)))
        .field(
            FieldSpec::new(
                "description",
                LengthRule::trimmed(1, settings.description_max_length),
            )
            .leading_space(LeadingSpace::Reset)
            .slot("description-required", [ReasonCode::Required])
            .slot("description-too-long", [ReasonCode::TooLong]),
        )
        .field(
            FieldSpec::new("category", SelectionRule)
                .slot("category-placeholder", [ReasonCode::NotSelected]),
        )
        .field(
            FieldSpec::new("image", ImageRule::new(&settings.image_extensions)).slot(
                "formats",
                [ReasonCode::MissingFile, ReasonCode::UnsupportedExtension],
            ),
        )
        .condition(TERMS, false)
        .precondition(CONTINUE, continuation_allowed(can_continue))
        .build()
}
