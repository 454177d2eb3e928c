//! The shared discovery/list/close contract across browser families.

use crate::chromium::ChromiumDriver;
use crate::family::BrowserFamily;
use crate::firefox::FirefoxDriver;
use crate::tab::BrowserTab;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Timeout for endpoint discovery and tab listing.
pub(crate) const LIST_TIMEOUT: Duration = Duration::from_secs(3);

/// Timeout for a single tab-close request.
pub(crate) const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// A failed attempt to close one tab. Failures are isolated per tab: one
/// never aborts the remaining tabs of the family.
#[derive(Debug, Error)]
pub enum CloseTabError {
    /// The endpoint answered with a non-success status, typically because
    /// the tab id no longer exists (the user already closed it).
    #[error("close endpoint returned {status}")]
    Status { status: reqwest::StatusCode },
    /// The request never completed (connection refused, timeout).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// One browser family's remote-debugging capability.
///
/// Chrome and Edge share the Chromium implementation; Firefox diverges
/// enough to carry its own, flagged as reduced-reliability.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    fn family(&self) -> BrowserFamily;

    /// Whether a successful close response actually guarantees the tab is
    /// gone. False for Firefox: its closures are counted as attempted, not
    /// verified.
    fn reliable_close(&self) -> bool;

    /// Find the first responding debugging endpoint for this family.
    ///
    /// Absence means "not running with debugging enabled" and is never an
    /// error. A candidate that refuses the connection or answers with a
    /// non-success status is skipped in favor of the next one.
    async fn locate(&self) -> Option<u16>;

    /// List live tabs from the endpoint at `port`.
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint stops responding between
    /// discovery and listing, or serves a malformed tab list.
    async fn list_tabs_at(&self, port: u16) -> Result<Vec<BrowserTab>>;

    /// Close one tab via the endpoint it was discovered on.
    ///
    /// # Errors
    ///
    /// Returns [`CloseTabError`] when the endpoint rejects the close or the
    /// request does not complete.
    async fn close_tab(&self, tab: &BrowserTab) -> Result<(), CloseTabError>;

    /// Locate the endpoint and list its tabs. Empty when the family is not
    /// running with debugging enabled.
    async fn list_tabs(&self) -> Vec<BrowserTab> {
        let Some(port) = self.locate().await else {
            return Vec::new();
        };
        match self.list_tabs_at(port).await {
            Ok(tabs) => tabs,
            Err(e) => {
                log::warn!(
                    "{} endpoint on port {port} failed to list tabs: {e}",
                    self.family()
                );
                Vec::new()
            }
        }
    }
}

/// Probe one candidate port: a short-timeout GET of the tab-list path that
/// answers with a success status marks the candidate active.
pub(crate) async fn probe_port(client: &Client, port: u16) -> bool {
    let url = format!("http://localhost:{port}/json/list");
    match client.get(&url).timeout(LIST_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Fetch and deserialize the raw tab list from `port`.
pub(crate) async fn fetch_tab_list<T: serde::de::DeserializeOwned>(
    client: &Client,
    port: u16,
) -> Result<Vec<T>> {
    let url = format!("http://localhost:{port}/json/list");
    let response = client.get(&url).timeout(LIST_TIMEOUT).send().await?;
    anyhow::ensure!(
        response.status().is_success(),
        "tab list endpoint on port {port} returned {}",
        response.status()
    );
    Ok(response.json().await?)
}

/// The default driver set covering every supported family.
#[must_use]
pub fn default_drivers() -> Vec<Box<dyn BrowserDriver>> {
    vec![
        Box::new(ChromiumDriver::chrome()),
        Box::new(ChromiumDriver::edge()),
        Box::new(FirefoxDriver::new()),
    ]
}
