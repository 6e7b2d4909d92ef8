//! Admin variant image deletion.

use std::sync::Arc;

use tracing::{debug, info, warn};
use wyndo_core::{Settings, WyndoError, WyndoResult};
use wyndo_forms::variants::VariantTable;

use crate::http_error;
use crate::navigation::Alerter;

/// Message alerted when the server refuses or cannot be reached.
pub const DELETE_FAILED_MESSAGE: &str = "Could not delete the image.";

/// How a deletion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server deleted the image and the table was updated.
    Deleted,
    /// The deletion failed and the user was alerted.
    Failed,
}

/// Client for the admin inventory endpoints.
pub struct InventoryClient {
    http: reqwest::Client,
    settings: Settings,
    alerter: Arc<dyn Alerter>,
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.settings.base_url)
            .finish_non_exhaustive()
    }
}

impl InventoryClient {
    pub fn new(settings: &Settings, alerter: Arc<dyn Alerter>) -> Self {
        Self::with_http_client(reqwest::Client::new(), settings, alerter)
    }

    /// Creates a client sharing an existing connection pool.
    pub fn with_http_client(
        http: reqwest::Client,
        settings: &Settings,
        alerter: Arc<dyn Alerter>,
    ) -> Self {
        Self {
            http,
            settings: settings.clone(),
            alerter,
        }
    }

    /// Deletes the image on the server, then drops its link from `table`
    /// and renumbers the links left in its row.
    ///
    /// On failure the table is left as it was and the user is alerted.
    pub async fn delete_image(&self, table: &mut VariantTable, image_id: &str) -> DeleteOutcome {
        match self.send_delete(image_id).await {
            Ok(()) => {
                if table.remove_image(image_id) {
                    info!(image_id, title = table.title(), "variant image deleted");
                } else {
                    debug!(image_id, "deleted image had no link in the table");
                }
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(image_id, error = %err, "variant image deletion failed");
                self.alerter.alert(DELETE_FAILED_MESSAGE);
                DeleteOutcome::Failed
            }
        }
    }

    async fn send_delete(&self, image_id: &str) -> WyndoResult<()> {
        let url = self.settings.delete_image_url(image_id);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| http_error(&e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WyndoError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            })
        }
    }
}
