//! Firefox remote-debugging driver.
//!
//! Firefox's protocol differs structurally from the DevTools one: targets
//! are identified by actor, there is no reliable active-tab signal, and
//! there is no close operation with Chromium semantics. Tabs are still
//! listed; closure is best-effort and the driver reports itself as
//! reduced-reliability rather than pretending otherwise.

use crate::driver::{fetch_tab_list, probe_port, BrowserDriver, CloseTabError};
use crate::family::BrowserFamily;
use crate::tab::{BrowserTab, FirefoxTabDescriptor};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

pub struct FirefoxDriver {
    ports: Vec<u16>,
    client: Client,
}

impl FirefoxDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ports: BrowserFamily::Firefox.candidate_ports().to_vec(),
            client: Client::new(),
        }
    }

    /// Driver probing an explicit port list instead of the built-in
    /// candidates. Intended for tests running against local fixtures.
    #[must_use]
    pub fn with_ports(ports: Vec<u16>) -> Self {
        Self {
            ports,
            client: Client::new(),
        }
    }
}

impl Default for FirefoxDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserDriver for FirefoxDriver {
    fn family(&self) -> BrowserFamily {
        BrowserFamily::Firefox
    }

    fn reliable_close(&self) -> bool {
        false
    }

    async fn locate(&self) -> Option<u16> {
        for &port in &self.ports {
            if probe_port(&self.client, port).await {
                log::debug!("firefox debugging endpoint active on port {port}");
                return Some(port);
            }
        }
        None
    }

    async fn list_tabs_at(&self, port: u16) -> Result<Vec<BrowserTab>> {
        let descriptors: Vec<FirefoxTabDescriptor> = fetch_tab_list(&self.client, port).await?;
        Ok(descriptors
            .into_iter()
            .map(|descriptor| BrowserTab {
                id: descriptor.actor,
                title: descriptor.title,
                url: descriptor.url,
                is_active: false,
                browser_family: BrowserFamily::Firefox,
                endpoint_port: port,
            })
            .collect())
    }

    async fn close_tab(&self, tab: &BrowserTab) -> Result<(), CloseTabError> {
        // No close operation with Chromium semantics exists here; the
        // attempt is recorded and the caller sees `reliable_close() ==
        // false` for this family.
        log::debug!(
            "best-effort close of firefox tab '{}' (actor {})",
            tab.title,
            tab.id
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests;
