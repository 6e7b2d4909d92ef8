//! The wishlist heart toggle.
//!
//! Clicking a heart posts `{ "id": .., "type": "product" | "retailer" }` to
//! the toggle endpoint. The server flips the membership and answers
//! `{ "added": bool }`, which decides whether the heart is filled.
//! Anonymous users get a 403 and are sent to the login page. Any other
//! failure is logged and leaves the heart untouched.
//!
//! Clicks on the same item may overlap. Each request takes a ticket from a
//! client-wide counter, recorded as the item's latest. A response is only
//! applied while its ticket is still the latest, so the heart always shows
//! the answer to the most recent click. Applying the latest response clears
//! the item's entry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wyndo_core::{Settings, WyndoError, WyndoResult};

use crate::http_error;
use crate::navigation::Navigator;

/// What a wishlist entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishlistKind {
    Product,
    Retailer,
}

/// The request body of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: WishlistKind,
}

impl WishlistItem {
    pub const fn product(id: u64) -> Self {
        Self {
            id,
            kind: WishlistKind::Product,
        }
    }

    pub const fn retailer(id: u64) -> Self {
        Self {
            id,
            kind: WishlistKind::Retailer,
        }
    }
}

/// The heart icon of one wishlist button. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct HeartIcon {
    filled: Arc<AtomicBool>,
}

impl HeartIcon {
    /// CSS class carried by the icon while the item is in the wishlist.
    pub const FILLED_CLASS: &'static str = "fill-white";

    pub fn new(filled: bool) -> Self {
        Self {
            filled: Arc::new(AtomicBool::new(filled)),
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled.load(Ordering::SeqCst)
    }

    fn set_filled(&self, filled: bool) {
        self.filled.store(filled, Ordering::SeqCst);
    }
}

/// How a toggle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The item is now in the wishlist.
    Added,
    /// The item was removed from the wishlist.
    Removed,
    /// The user is anonymous; the page moved to the login URL.
    LoginRequired,
    /// A later click on the same item was made before this one finished;
    /// its response was discarded.
    Superseded,
    /// The request failed. Nothing changed.
    Failed,
}

#[derive(Debug, Deserialize)]
struct ToggleResponse {
    added: bool,
}

enum Reply {
    Toggled(bool),
    Forbidden,
}

/// Client for the wishlist toggle endpoint.
pub struct WishlistClient {
    http: reqwest::Client,
    url: String,
    login_url: String,
    navigator: Arc<dyn Navigator>,
    next_ticket: AtomicU64,
    latest: Mutex<HashMap<WishlistItem, u64>>,
}

impl std::fmt::Debug for WishlistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistClient")
            .field("url", &self.url)
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

impl WishlistClient {
    pub fn new(settings: &Settings, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings, navigator)
    }

    /// Creates a client sharing an existing connection pool.
    pub fn with_http_client(
        http: reqwest::Client,
        settings: &Settings,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            http,
            url: settings.wishlist_url(),
            login_url: settings.login_url.clone(),
            navigator,
            next_ticket: AtomicU64::new(1),
            latest: Mutex::new(HashMap::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Toggles `item` and updates `heart` with the server's answer.
    ///
    /// Never fails: problems are logged and reported as
    /// [`ToggleOutcome::Failed`].
    pub async fn toggle(&self, item: WishlistItem, heart: &HeartIcon) -> ToggleOutcome {
        let ticket = self.issue_ticket(item);
        let reply = self.send(item).await;

        if !self.settle(item, ticket) {
            debug!(id = item.id, kind = ?item.kind, ticket, "stale wishlist response discarded");
            return ToggleOutcome::Superseded;
        }

        match reply {
            Ok(Reply::Toggled(added)) => {
                heart.set_filled(added);
                info!(id = item.id, kind = ?item.kind, added, "wishlist toggled");
                if added {
                    ToggleOutcome::Added
                } else {
                    ToggleOutcome::Removed
                }
            }
            Ok(Reply::Forbidden) => {
                self.navigator.navigate(&self.login_url);
                ToggleOutcome::LoginRequired
            }
            Err(err) => {
                warn!(id = item.id, kind = ?item.kind, error = %err, "wishlist toggle failed");
                ToggleOutcome::Failed
            }
        }
    }

    async fn send(&self, item: WishlistItem) -> WyndoResult<Reply> {
        let response = self
            .http
            .post(&self.url)
            .json(&item)
            .send()
            .await
            .map_err(|e| http_error(&e))?;

        match response.status() {
            StatusCode::FORBIDDEN => Ok(Reply::Forbidden),
            StatusCode::OK => {
                let body = response.bytes().await.map_err(|e| http_error(&e))?;
                let parsed: ToggleResponse = serde_json::from_slice(&body)?;
                Ok(Reply::Toggled(parsed.added))
            }
            status => Err(WyndoError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            }),
        }
    }

    fn latest(&self) -> MutexGuard<'_, HashMap<WishlistItem, u64>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue_ticket(&self, item: WishlistItem) -> u64 {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.latest().insert(item, ticket);
        ticket
    }

    /// Returns whether `ticket` is the item's latest, clearing the entry if
    /// so. Tickets are never reused, so a stale one cannot match a later
    /// entry.
    fn settle(&self, item: WishlistItem, ticket: u64) -> bool {
        let mut latest = self.latest();
        if latest.get(&item) == Some(&ticket) {
            latest.remove(&item);
            true
        } else {
            false
        }
    }

    /// Number of items with a toggle still in flight.
    pub fn pending_items(&self) -> usize {
        self.latest().len()
    }
}
