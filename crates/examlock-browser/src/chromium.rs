//! Chromium DevTools driver, shared by Chrome and Edge.
//!
//! Speaks the DevTools HTTP endpoints: `/json/list` for discovery and
//! inventory, `/json/close/<id>` for closure (success is HTTP 200).

use crate::driver::{fetch_tab_list, probe_port, BrowserDriver, CloseTabError, CLOSE_TIMEOUT};
use crate::family::BrowserFamily;
use crate::tab::{BrowserTab, ChromiumTabDescriptor};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

pub struct ChromiumDriver {
    family: BrowserFamily,
    ports: Vec<u16>,
    client: Client,
}

impl ChromiumDriver {
    #[must_use]
    pub fn chrome() -> Self {
        Self::for_family(BrowserFamily::Chrome)
    }

    #[must_use]
    pub fn edge() -> Self {
        Self::for_family(BrowserFamily::Edge)
    }

    fn for_family(family: BrowserFamily) -> Self {
        Self {
            family,
            ports: family.candidate_ports().to_vec(),
            client: Client::new(),
        }
    }

    /// Driver probing an explicit port list instead of the built-in
    /// candidates. Intended for tests running against local fixtures.
    #[must_use]
    pub fn with_ports(family: BrowserFamily, ports: Vec<u16>) -> Self {
        Self {
            family,
            ports,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    fn family(&self) -> BrowserFamily {
        self.family
    }

    fn reliable_close(&self) -> bool {
        true
    }

    async fn locate(&self) -> Option<u16> {
        for &port in &self.ports {
            if probe_port(&self.client, port).await {
                log::debug!("{} debugging endpoint active on port {port}", self.family);
                return Some(port);
            }
        }
        None
    }

    async fn list_tabs_at(&self, port: u16) -> Result<Vec<BrowserTab>> {
        let descriptors: Vec<ChromiumTabDescriptor> = fetch_tab_list(&self.client, port).await?;
        // Background targets (service workers, extensions) are not tabs.
        Ok(descriptors
            .into_iter()
            .filter(|descriptor| descriptor.kind == "page")
            .map(|descriptor| BrowserTab {
                id: descriptor.id,
                title: descriptor.title,
                url: descriptor.url,
                is_active: descriptor.active,
                browser_family: self.family,
                endpoint_port: port,
            })
            .collect())
    }

    async fn close_tab(&self, tab: &BrowserTab) -> Result<(), CloseTabError> {
        let url = format!(
            "http://localhost:{}/json/close/{}",
            tab.endpoint_port, tab.id
        );
        let response = self.client.get(&url).timeout(CLOSE_TIMEOUT).send().await?;
        if response.status().is_success() {
            log::debug!("closed {} tab '{}'", self.family, tab.title);
            Ok(())
        } else {
            Err(CloseTabError::Status {
                status: response.status(),
            })
        }
    }
}
