//! Itemized result payloads produced by the termination engine.
//!
//! Every invocation produces these fresh; they are never merged with a
//! prior invocation's results.

use crate::inventory::ProcessRecord;
use chrono::{DateTime, Utc};
use examlock_browser::BrowserFamily;
use serde::{Deserialize, Serialize};

/// How a process ended up dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KillMethod {
    /// The cooperative terminate signal was enough.
    Graceful,
    /// The process survived the grace period and was killed outright.
    Forced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KilledProcess {
    pub pid: u32,
    pub name: String,
    pub method: KillMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillFailure {
    pub pid: u32,
    pub name: String,
    pub error: String,
}

/// Outcome of one AI-application kill pass. A pid appears in at most one
/// of the three buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminationOutcome {
    pub killed: Vec<KilledProcess>,
    pub failed: Vec<KillFailure>,
    /// Processes that vanished between enumeration and the first signal.
    pub not_found: Vec<String>,
}

impl TerminationOutcome {
    /// True when no kill attempt failed outright.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Closure accounting for one browser family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FamilyClosure {
    pub closed: usize,
    pub preserved: usize,
    pub errors: Vec<String>,
    /// False when closures for this family are best-effort only (Firefox):
    /// `closed` then counts attempts, not verified closures.
    pub reliable: bool,
}

impl Default for FamilyClosure {
    fn default() -> Self {
        Self {
            closed: 0,
            preserved: 0,
            errors: Vec::new(),
            reliable: true,
        }
    }
}

/// Per-family and aggregate closure accounting for one pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabClosureOutcome {
    pub chrome: FamilyClosure,
    pub firefox: FamilyClosure,
    pub edge: FamilyClosure,
    pub total_closed: usize,
    pub total_preserved: usize,
}

impl TabClosureOutcome {
    pub(crate) fn family_mut(&mut self, family: BrowserFamily) -> &mut FamilyClosure {
        match family {
            BrowserFamily::Chrome => &mut self.chrome,
            BrowserFamily::Firefox => &mut self.firefox,
            BrowserFamily::Edge => &mut self.edge,
        }
    }

    pub(crate) fn recompute_totals(&mut self) {
        self.total_closed = self.chrome.closed + self.firefox.closed + self.edge.closed;
        self.total_preserved =
            self.chrome.preserved + self.firefox.preserved + self.edge.preserved;
    }

    /// Total error entries across every family.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.chrome.errors.len() + self.firefox.errors.len() + self.edge.errors.len()
    }
}

/// Combined result of a full kill-and-close workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillAllOutcome {
    pub ai_applications: TerminationOutcome,
    pub browser_tabs: TabClosureOutcome,
    /// True iff the kill pass had zero failures and every family reported
    /// zero closure errors.
    pub success: bool,
    pub timestamp: DateTime<Utc>,
}

/// One tab as a closure pass would treat it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabPreview {
    pub id: String,
    pub title: String,
    pub url: String,
    pub will_be_preserved: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowserTabsPreview {
    pub chrome: Vec<TabPreview>,
    pub firefox: Vec<TabPreview>,
    pub edge: Vec<TabPreview>,
}

impl BrowserTabsPreview {
    pub(crate) fn family_mut(&mut self, family: BrowserFamily) -> &mut Vec<TabPreview> {
        match family {
            BrowserFamily::Chrome => &mut self.chrome,
            BrowserFamily::Firefox => &mut self.firefox,
            BrowserFamily::Edge => &mut self.edge,
        }
    }
}

/// Dry-run projection of `kill_all_targeted`: what would be killed and
/// which tabs would survive, with no mutating call issued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerminationPreview {
    pub ai_applications: Vec<ProcessRecord>,
    pub browser_tabs: BrowserTabsPreview,
}

/// Open-tab counts per family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabSummary {
    pub chrome: usize,
    pub firefox: usize,
    pub edge: usize,
    pub total_tabs: usize,
}

impl TabSummary {
    pub(crate) fn record(&mut self, family: BrowserFamily, count: usize) {
        match family {
            BrowserFamily::Chrome => self.chrome = count,
            BrowserFamily::Firefox => self.firefox = count,
            BrowserFamily::Edge => self.edge = count,
        }
        self.total_tabs = self.chrome + self.firefox + self.edge;
    }
}
