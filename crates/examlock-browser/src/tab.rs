use crate::family::BrowserFamily;
use serde::{Deserialize, Serialize};

/// A live browser tab as reported by a remote-debugging endpoint.
///
/// The snapshot is invalidated the instant the tab closes; anything acting
/// on it must tolerate "already gone".
#[derive(Debug, Clone, Serialize)]
pub struct BrowserTab {
    /// Opaque, browser-assigned target identifier.
    pub id: String,
    pub title: String,
    pub url: String,
    /// Always false for Firefox, whose protocol exposes no reliable
    /// active-tab signal.
    pub is_active: bool,
    pub browser_family: BrowserFamily,
    /// Debugging port the tab was discovered on.
    pub endpoint_port: u16,
}

/// Raw target descriptor served by a Chromium `/json/list` endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ChromiumTabDescriptor {
    #[serde(default)]
    pub id: String,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Distinguishes pages from service workers, extensions, and other
    /// background targets.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub active: bool,
}

/// Raw target descriptor from the Firefox remote-debugging protocol, which
/// identifies targets by actor rather than id.
#[derive(Debug, Deserialize)]
pub(crate) struct FirefoxTabDescriptor {
    #[serde(default)]
    pub actor: String,
    #[serde(default = "untitled")]
    pub title: String,
    #[serde(default)]
    pub url: String,
}

fn untitled() -> String {
    String::from("Untitled")
}
