//! Settings for the wyndo storefront crates.
//!
//! [`Settings`] holds the endpoint layout used by the HTTP operations and the
//! [`FormSettings`] limits used by the validation rules. Defaults match the
//! values the storefront templates are built around.

use serde::{Deserialize, Serialize};

/// Limits applied by the form validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSettings {
    /// Maximum length (characters) of first and last names.
    pub name_max_length: usize,
    /// Maximum length (characters) of a retailer description.
    pub description_max_length: usize,
    /// Minimum length (characters) of a password.
    pub password_min_length: usize,
    /// Accepted image file extensions, compared case-insensitively.
    pub image_extensions: Vec<String>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            name_max_length: 36,
            description_max_length: 300,
            password_min_length: 8,
            image_extensions: ["gif", "jpeg", "jpg", "png"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use wyndo_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.login_url, "/login/");
/// assert_eq!(settings.forms.name_max_length, 36);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Endpoints ────────────────────────────────────────────────────

    /// Origin the HTTP operations are sent to (e.g. `https://shop.example`).
    pub base_url: String,
    /// Where the shopper is sent when the server answers 403.
    pub login_url: String,
    /// Path of the wishlist toggle endpoint.
    pub wishlist_path: String,
    /// Path prefix of the admin image deletion endpoint. The image id and a
    /// trailing slash are appended.
    pub delete_image_path: String,

    // ── Forms ────────────────────────────────────────────────────────

    /// Validation limits.
    pub forms: FormSettings,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            base_url: "http://127.0.0.1:8000".to_string(),
            login_url: "/login/".to_string(),
            wishlist_path: "/api/toggle-wishlist/".to_string(),
            delete_image_path: "/inventory/delete_image/".to_string(),
            forms: FormSettings::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Joins `path` onto [`base_url`](Self::base_url) with exactly one slash
    /// between them.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Full URL of the wishlist toggle endpoint.
    pub fn wishlist_url(&self) -> String {
        self.endpoint(&self.wishlist_path)
    }

    /// Full URL for deleting the image with the given id.
    pub fn delete_image_url(&self, image_id: &str) -> String {
        let prefix = self.delete_image_path.trim_end_matches('/');
        self.endpoint(&format!("{prefix}/{image_id}/"))
    }
}
