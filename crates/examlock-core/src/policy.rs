//! The protection policy pinning one exam domain as inviolable.

use anyhow::{Context, Result};
use std::sync::RwLock;
use url::Url;

/// Extract the authority (`host[:port]`) component a tab is compared by.
/// Both sides of the comparison go through this, so host normalization and
/// default-port elision apply identically to the pinned domain and the tab.
fn authority(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Holds the currently pinned exam domain.
///
/// Unset means nothing is protected: the policy fails open toward closing
/// tabs rather than protecting falsely. The predicate takes a read lock
/// only, so concurrent closure passes can share one policy.
#[derive(Debug, Default)]
pub struct ProtectionPolicy {
    protected_domain: RwLock<Option<String>>,
}

impl ProtectionPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the authority of `exam_url` as the protected domain. Only the
    /// authority is stored, so any tab sharing it is protected regardless
    /// of path or query.
    ///
    /// # Errors
    ///
    /// Returns an error when `exam_url` carries no extractable authority;
    /// the previously pinned domain is left untouched in that case.
    pub fn set_protected_domain(&self, exam_url: &str) -> Result<()> {
        let domain = authority(exam_url)
            .with_context(|| format!("no authority in exam URL '{exam_url}'"))?;
        log::info!("protected exam domain set to {domain}");
        *self.protected_domain.write().unwrap() = Some(domain);
        Ok(())
    }

    /// The currently pinned domain, if any.
    #[must_use]
    pub fn protected_domain(&self) -> Option<String> {
        self.protected_domain.read().unwrap().clone()
    }

    /// Whether `tab_url` shares the protected authority. Exact equality
    /// only: no subdomain or prefix matching.
    #[must_use]
    pub fn is_protected(&self, tab_url: &str) -> bool {
        let guard = self.protected_domain.read().unwrap();
        let Some(domain) = guard.as_deref() else {
            return false;
        };
        authority(tab_url).is_some_and(|tab_authority| tab_authority == domain)
    }
}

#[cfg(test)]
mod tests;
