//! Password strength evaluation.
//!
//! A password is accepted when it is long enough and contains at least one
//! Unicode uppercase letter, one Unicode lowercase letter and one Unicode
//! decimal digit. Symbols are never required. Each condition is tracked
//! separately so that the page can light one checkmark per condition.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static UPPERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}").expect("valid regex"));
static LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Ll}").expect("valid regex"));
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Nd}").expect("valid regex"));

/// The acceptance policy for passwords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum number of characters.
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    /// Creates a policy with the given minimum length.
    pub const fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    /// Returns `true` if `password` satisfies every strength condition.
    ///
    /// ```
    /// use wyndo_forms::password::PasswordPolicy;
    ///
    /// let policy = PasswordPolicy::default();
    /// assert!(policy.accepts("Secret123"));
    /// assert!(!policy.accepts("secret123"));
    /// ```
    pub fn accepts(&self, password: &str) -> bool {
        PasswordStrength::evaluate(self, password, password).is_strong()
    }
}

/// One checkmark of the strength panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthIndicator {
    /// The password has the minimum length.
    MinLength,
    /// The password contains an uppercase letter.
    Upper,
    /// The password contains a lowercase letter.
    Lower,
    /// The password contains a digit.
    Digit,
    /// The password and its confirmation are equal.
    Match,
}

impl StrengthIndicator {
    /// All indicators in panel order.
    pub const ALL: [Self; 5] = [
        Self::MinLength,
        Self::Upper,
        Self::Lower,
        Self::Digit,
        Self::Match,
    ];

    /// CSS selector of the checkmark element.
    pub const fn selector(self) -> &'static str {
        match self {
            Self::MinLength => ".check-min",
            Self::Upper => ".check-upper",
            Self::Lower => ".check-lower",
            Self::Digit => ".check-number",
            Self::Match => ".check-match",
        }
    }

    /// Classes carried by the checkmark in the given state.
    pub const fn classes(lit: bool) -> &'static [&'static str] {
        if lit {
            &["material-icons", "text-w-primary"]
        } else {
            &["material-icons-outlined"]
        }
    }
}

/// The five independent strength bits of a password/confirmation pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub has_min_length: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_digit: bool,
    pub matches_confirmation: bool,
}

impl PasswordStrength {
    /// Evaluates `password` against `policy` and compares it with `confirmation`.
    pub fn evaluate(policy: &PasswordPolicy, password: &str, confirmation: &str) -> Self {
        Self {
            has_min_length: password.chars().count() >= policy.min_length,
            has_upper: UPPERCASE.is_match(password),
            has_lower: LOWERCASE.is_match(password),
            has_digit: DIGIT.is_match(password),
            matches_confirmation: password == confirmation,
        }
    }

    /// `true` when the length and character-class conditions hold. The
    /// confirmation bit is not considered.
    pub const fn is_strong(&self) -> bool {
        self.has_min_length && self.has_upper && self.has_lower && self.has_digit
    }

    /// `true` when all five bits are set.
    pub const fn is_valid(&self) -> bool {
        self.is_strong() && self.matches_confirmation
    }

    /// Whether the given indicator is lit.
    ///
    /// The match checkmark only lights for a strong password, so an empty
    /// pair never shows a green match.
    pub const fn is_lit(&self, indicator: StrengthIndicator) -> bool {
        match indicator {
            StrengthIndicator::MinLength => self.has_min_length,
            StrengthIndicator::Upper => self.has_upper,
            StrengthIndicator::Lower => self.has_lower,
            StrengthIndicator::Digit => self.has_digit,
            StrengthIndicator::Match => self.is_valid(),
        }
    }

    /// The state of every indicator in panel order.
    pub fn indicators(&self) -> [(StrengthIndicator, bool); 5] {
        StrengthIndicator::ALL.map(|indicator| (indicator, self.is_lit(indicator)))
    }
}
