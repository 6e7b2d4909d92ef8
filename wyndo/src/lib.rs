//! # wyndo
//!
//! The storefront interaction layer of the wyndo marketplace.
//!
//! This is the meta-crate re-exporting the sub-crates. Depend on `wyndo` to
//! get everything, or on the individual crates for finer-grained control.
//!
//! ```rust,no_run
//! use wyndo::core::{logging, settings_loader};
//! use wyndo::forms::{presets, PageState, Surface};
//!
//! let settings = settings_loader::from_env();
//! logging::setup_logging(&settings);
//!
//! let mut signup = presets::signup(&settings.forms).unwrap();
//! let mut page = PageState::new();
//! page.apply_all(&signup.initial_effects());
//! page.apply_all(&signup.update("name", "Anna").unwrap().effects);
//! ```

/// Error type, settings and logging.
pub use wyndo_core as core;

/// Validation engine, form presets and page widgets.
#[cfg(feature = "forms")]
pub use wyndo_forms as forms;

/// Wishlist and inventory HTTP clients.
#[cfg(feature = "client")]
pub use wyndo_client as client;

pub use wyndo_core::{Settings, WyndoError, WyndoResult};

/// Third-party crates used at the public boundary, re-exported for hosts.
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
