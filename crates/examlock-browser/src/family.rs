use serde::{Deserialize, Serialize};
use std::fmt;

/// Browser families with a usable remote-debugging endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Edge,
}

impl BrowserFamily {
    /// Candidate debugging ports for this family, probed strictly in order.
    /// The sets are fixed; pointing a browser at one of them is the setup
    /// layer's job.
    #[must_use]
    pub fn candidate_ports(self) -> &'static [u16] {
        match self {
            BrowserFamily::Chrome => &[9222, 9223, 9224],
            BrowserFamily::Edge => &[9225, 9226, 9227],
            BrowserFamily::Firefox => &[9228, 9229, 9230],
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Edge => "edge",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
