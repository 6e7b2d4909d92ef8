//! Page-level side effects of the HTTP clients.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Moves the browser to another URL.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Shows a blocking message to the user.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The current page address, as seen by a headless host.
#[derive(Debug, Default)]
pub struct Location {
    href: Mutex<String>,
}

impl Location {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: Mutex::new(href.into()),
        }
    }

    pub fn href(&self) -> String {
        lock(&self.href).clone()
    }
}

impl Navigator for Location {
    fn navigate(&self, url: &str) {
        tracing::info!(url, "navigating");
        *lock(&self.href) = url.to_string();
    }
}

/// Records alerts instead of displaying them.
#[derive(Debug, Default)]
pub struct AlertLog {
    messages: Mutex<Vec<String>>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts shown so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        lock(&self.messages).clone()
    }
}

impl Alerter for AlertLog {
    fn alert(&self, message: &str) {
        tracing::warn!(message, "alert shown");
        lock(&self.messages).push(message.to_string());
    }
}
