//! # wyndo-client
//!
//! The storefront's calls to the backend: the wishlist toggle behind the
//! heart buttons and the admin's variant image deletion.
//!
//! Both clients report page-level side effects through small traits in
//! [`navigation`] so that they run the same way under a browser binding,
//! a headless host or a test.

pub mod inventory;
pub mod navigation;
pub mod wishlist;

pub use inventory::{DeleteOutcome, InventoryClient};
pub use navigation::{AlertLog, Alerter, Location, Navigator};
pub use wishlist::{HeartIcon, ToggleOutcome, WishlistClient, WishlistItem, WishlistKind};

use wyndo_core::WyndoError;

/// Converts a transport failure into the crate-wide error type.
pub(crate) fn http_error(err: &reqwest::Error) -> WyndoError {
    WyndoError::Http(err.to_string())
}
