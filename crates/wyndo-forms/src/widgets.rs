//! Small stateful page controls without validation semantics.

use wyndo_core::{WyndoError, WyndoResult};

/// The `type` attribute of a password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Password,
    Text,
}

impl InputType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::Text => "text",
        }
    }
}

/// The eye icon next to a password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EyeIcon {
    /// The password is visible.
    Show,
    /// The password is masked.
    Hide,
}

/// Masked/plain toggle of a password input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordVisibility {
    masked: bool,
}

impl Default for PasswordVisibility {
    fn default() -> Self {
        Self { masked: true }
    }
}

impl PasswordVisibility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) -> InputType {
        self.masked = !self.masked;
        self.input_type()
    }

    pub const fn input_type(&self) -> InputType {
        if self.masked {
            InputType::Password
        } else {
            InputType::Text
        }
    }

    pub const fn icon(&self) -> EyeIcon {
        if self.masked {
            EyeIcon::Hide
        } else {
            EyeIcon::Show
        }
    }
}

/// An open/closed panel (drawer, alert, accordion).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collapsible {
    open: bool,
}

impl Collapsible {
    pub const fn new(open: bool) -> Self {
        Self { open }
    }

    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub const fn is_open(&self) -> bool {
        self.open
    }
}

/// The plus/minus pair around a quantity input bounded by its `max`
/// attribute. The quantity never drops below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantityStepper {
    value: u32,
    max: u32,
}

impl QuantityStepper {
    /// Creates a stepper, clamping `value` into `1..=max`.
    pub fn new(value: u32, max: u32) -> Self {
        let max = max.max(1);
        Self {
            value: value.clamp(1, max),
            max,
        }
    }

    /// Builds a stepper from the input's `value` and `max` attributes.
    pub fn from_attributes(value: &str, max: &str) -> WyndoResult<Self> {
        Ok(Self::new(parse_attr("value", value)?, parse_attr("max", max)?))
    }

    pub fn increment(&mut self) -> u32 {
        if self.value < self.max {
            self.value += 1;
        }
        self.value
    }

    pub fn decrement(&mut self) -> u32 {
        if self.value > 1 {
            self.value -= 1;
        }
        self.value
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn plus_disabled(&self) -> bool {
        self.value >= self.max
    }

    pub const fn minus_disabled(&self) -> bool {
        self.value <= 1
    }
}

fn parse_attr(name: &str, raw: &str) -> WyndoResult<u32> {
    raw.trim().parse().map_err(|_| {
        WyndoError::ConfigurationError(format!("invalid `{name}` attribute: {raw:?}"))
    })
}
