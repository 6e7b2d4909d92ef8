//! # wyndo-core
//!
//! Core types shared by the wyndo storefront crates.
//! This crate has no dependency on the other wyndo crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Endpoint and form-limit configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{WyndoError, WyndoResult};
pub use settings::{FormSettings, Settings};
