//! Browser remote-debugging plumbing: endpoint discovery, tab inventory,
//! and tab closure for Chrome, Edge, and Firefox.

pub mod chromium;
pub mod driver;
pub mod family;
pub mod firefox;
pub mod tab;

pub use chromium::ChromiumDriver;
pub use driver::{default_drivers, BrowserDriver, CloseTabError};
pub use family::BrowserFamily;
pub use firefox::FirefoxDriver;
pub use tab::BrowserTab;

#[cfg(test)]
pub(crate) mod testutil;
