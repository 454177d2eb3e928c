//! The termination engine: kills AI-assistant processes with escalation
//! and closes unprotected browser tabs, with a shared-logic dry-run.

use crate::classifier::AiAppClassifier;
use crate::inventory::{ProcessInventory, ProcessRecord};
use crate::outcome::{
    BrowserTabsPreview, KillAllOutcome, KillFailure, KillMethod, KilledProcess, TabClosureOutcome,
    TabPreview, TabSummary, TerminationOutcome, TerminationPreview,
};
use crate::policy::ProtectionPolicy;
use anyhow::Result;
use chrono::Utc;
use examlock_browser::{default_drivers, BrowserDriver, BrowserTab, CloseTabError};
use std::time::Duration;
use tokio::sync::Mutex;

/// How long a process gets to honor the terminate signal before the kill
/// escalates.
const GRACE_TIMEOUT: Duration = Duration::from_secs(3);

const GRACE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Pause between the kill phase and the tab pass, letting the OS process
/// table catch up.
const SETTLE_DELAY: Duration = Duration::from_secs(1);

enum KillAttempt {
    Killed(KillMethod),
    Vanished,
    Failed(String),
}

/// Orchestrates process inventory, classifier, protection policy, and
/// browser drivers into the kill/close workflow.
///
/// All operations are synchronous request/response from the caller's view;
/// none spawns background work. Termination workflows are serialized
/// through an internal mutex, so overlapping invocations from a concurrent
/// caller queue up instead of racing each other's snapshots.
pub struct TerminationEngine {
    inventory: ProcessInventory,
    classifier: AiAppClassifier,
    policy: ProtectionPolicy,
    drivers: Vec<Box<dyn BrowserDriver>>,
    workflow: Mutex<()>,
    grace_timeout: Duration,
    settle_delay: Duration,
}

impl TerminationEngine {
    /// Engine over the default inventory, built-in classifier tables, an
    /// unset protection policy, and the full driver set.
    ///
    /// # Errors
    ///
    /// Fails only when the OS exposes no process inspection at all.
    pub fn new() -> Result<Self> {
        Ok(Self::with_parts(
            ProcessInventory::new()?,
            AiAppClassifier::default(),
            ProtectionPolicy::new(),
            default_drivers(),
        ))
    }

    /// Engine over caller-supplied parts. This is the seam the dashboard
    /// layer and the tests construct through.
    #[must_use]
    pub fn with_parts(
        inventory: ProcessInventory,
        classifier: AiAppClassifier,
        policy: ProtectionPolicy,
        drivers: Vec<Box<dyn BrowserDriver>>,
    ) -> Self {
        Self {
            inventory,
            classifier,
            policy,
            drivers,
            workflow: Mutex::new(()),
            grace_timeout: GRACE_TIMEOUT,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the escalation grace period and the kill-to-close settle
    /// delay.
    #[must_use]
    pub fn with_timeouts(mut self, grace_timeout: Duration, settle_delay: Duration) -> Self {
        self.grace_timeout = grace_timeout;
        self.settle_delay = settle_delay;
        self
    }

    /// Pin the exam domain that every closure pass must preserve.
    ///
    /// # Errors
    ///
    /// Returns an error when `exam_url` carries no extractable authority.
    pub fn set_protected_domain(&self, exam_url: &str) -> Result<()> {
        self.policy.set_protected_domain(exam_url)
    }

    #[must_use]
    pub fn protected_domain(&self) -> Option<String> {
        self.policy.protected_domain()
    }

    #[must_use]
    pub fn is_ai_application(&self, name: &str) -> bool {
        self.classifier.is_ai_application(name)
    }

    /// Snapshot of every visible process. Ordering is unspecified.
    #[must_use]
    pub fn list_processes(&self) -> Vec<ProcessRecord> {
        self.inventory.list_processes()
    }

    /// The processes a kill pass would target right now.
    #[must_use]
    pub fn ai_processes(&self) -> Vec<ProcessRecord> {
        self.inventory
            .list_processes()
            .into_iter()
            .filter(|record| self.classifier.is_ai_application(&record.name))
            .collect()
    }

    /// True when a Chromium-family browser is running with remote
    /// debugging enabled.
    #[must_use]
    pub fn browser_debugging_enabled(&self) -> bool {
        self.inventory.browser_debugging_enabled()
    }

    /// Terminate every running AI-assistant application, escalating from
    /// the cooperative signal to an unconditional kill per process.
    pub async fn kill_ai_applications(&self) -> TerminationOutcome {
        let _workflow = self.workflow.lock().await;
        self.kill_ai_locked().await
    }

    /// Close browser tabs across every family. With `preserve_protected`,
    /// tabs on the pinned exam domain are skipped and counted as
    /// preserved.
    pub async fn close_browser_tabs(&self, preserve_protected: bool) -> TabClosureOutcome {
        let _workflow = self.workflow.lock().await;
        self.close_tabs_locked(preserve_protected).await
    }

    /// The full workflow: optionally pin `exam_url`, kill AI applications,
    /// let the process table settle, then close unprotected tabs.
    ///
    /// # Errors
    ///
    /// Returns an error only when `exam_url` carries no extractable
    /// authority; every in-workflow failure is itemized in the outcome
    /// instead.
    pub async fn kill_all_targeted(&self, exam_url: Option<&str>) -> Result<KillAllOutcome> {
        if let Some(url) = exam_url {
            self.policy.set_protected_domain(url)?;
        }

        let _workflow = self.workflow.lock().await;
        let ai_applications = self.kill_ai_locked().await;
        tokio::time::sleep(self.settle_delay).await;
        let browser_tabs = self.close_tabs_locked(true).await;

        let success = ai_applications.is_clean() && browser_tabs.error_count() == 0;
        Ok(KillAllOutcome {
            ai_applications,
            browser_tabs,
            success,
            timestamp: Utc::now(),
        })
    }

    /// Dry-run projection of [`kill_all_targeted`](Self::kill_all_targeted).
    ///
    /// Runs the enumeration and classification halves of both phases with
    /// no mutating call, marking each tab with whether a real pass would
    /// preserve it. The classification and protection predicates are the
    /// very ones the real pass uses, so preview and execution cannot
    /// diverge.
    pub async fn get_termination_preview(&self) -> TerminationPreview {
        let ai_applications = self.ai_processes();

        let mut browser_tabs = BrowserTabsPreview::default();
        for driver in &self.drivers {
            let tabs = driver.list_tabs().await;
            *browser_tabs.family_mut(driver.family()) = tabs
                .into_iter()
                .map(|tab| TabPreview {
                    will_be_preserved: self.policy.is_protected(&tab.url),
                    id: tab.id,
                    title: tab.title,
                    url: tab.url,
                })
                .collect();
        }

        TerminationPreview {
            ai_applications,
            browser_tabs,
        }
    }

    /// Open-tab counts per family.
    pub async fn tab_summary(&self) -> TabSummary {
        let mut summary = TabSummary::default();
        for driver in &self.drivers {
            let tabs = driver.list_tabs().await;
            summary.record(driver.family(), tabs.len());
        }
        summary
    }

    async fn kill_ai_locked(&self) -> TerminationOutcome {
        let mut outcome = TerminationOutcome::default();
        let targets: Vec<ProcessRecord> = self
            .inventory
            .list_processes()
            .into_iter()
            .filter(|record| self.classifier.is_ai_application(&record.name))
            .collect();

        for target in targets {
            match self.kill_one(target.pid).await {
                KillAttempt::Killed(method) => {
                    log::info!(
                        "terminated {} (pid {}, {method:?})",
                        target.name,
                        target.pid
                    );
                    outcome.killed.push(KilledProcess {
                        pid: target.pid,
                        name: target.name,
                        method,
                    });
                }
                KillAttempt::Vanished => {
                    outcome
                        .not_found
                        .push(format!("{} (pid {})", target.name, target.pid));
                }
                KillAttempt::Failed(error) => {
                    log::warn!("failed to kill {} (pid {}): {error}", target.name, target.pid);
                    outcome.failed.push(KillFailure {
                        pid: target.pid,
                        name: target.name,
                        error,
                    });
                }
            }
        }

        log::info!("AI applications killed: {}", outcome.killed.len());
        outcome
    }

    /// Escalating kill of one process. A process that is already gone by
    /// the first signal vanished before the attempt; one that disappears
    /// later achieved the goal and counts as killed.
    async fn kill_one(&self, pid: u32) -> KillAttempt {
        match self.inventory.terminate_graceful(pid) {
            None => return KillAttempt::Vanished,
            Some(sent) => {
                if sent && self.wait_for_exit(pid).await {
                    return KillAttempt::Killed(KillMethod::Graceful);
                }
            }
        }

        match self.inventory.kill_forced(pid) {
            // Gone by now: the terminate signal landed late.
            None => KillAttempt::Killed(KillMethod::Forced),
            Some(true) => KillAttempt::Killed(KillMethod::Forced),
            Some(false) => {
                if self.inventory.is_exited(pid) {
                    KillAttempt::Killed(KillMethod::Forced)
                } else {
                    KillAttempt::Failed(String::from("kill signal could not be delivered"))
                }
            }
        }
    }

    async fn wait_for_exit(&self, pid: u32) -> bool {
        let deadline = tokio::time::Instant::now() + self.grace_timeout;
        loop {
            if self.inventory.is_exited(pid) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(GRACE_POLL_INTERVAL).await;
        }
    }

    async fn close_tabs_locked(&self, preserve_protected: bool) -> TabClosureOutcome {
        let mut outcome = TabClosureOutcome::default();

        // Families are independent: a failure in one never aborts the
        // others.
        for driver in &self.drivers {
            let family = driver.family();
            outcome.family_mut(family).reliable = driver.reliable_close();

            let Some(port) = driver.locate().await else {
                log::debug!("{family} is not running with debugging enabled");
                continue;
            };
            let tabs = match driver.list_tabs_at(port).await {
                Ok(tabs) => tabs,
                Err(e) => {
                    outcome
                        .family_mut(family)
                        .errors
                        .push(format!("failed to list {family} tabs: {e}"));
                    continue;
                }
            };

            for tab in tabs {
                if preserve_protected && self.policy.is_protected(&tab.url) {
                    outcome.family_mut(family).preserved += 1;
                    continue;
                }
                match driver.close_tab(&tab).await {
                    Ok(()) => outcome.family_mut(family).closed += 1,
                    Err(e) => outcome
                        .family_mut(family)
                        .errors
                        .push(close_error(&tab, &e)),
                }
            }
        }

        outcome.recompute_totals();
        log::info!(
            "browser tabs closed: {}, preserved: {}",
            outcome.total_closed,
            outcome.total_preserved
        );
        outcome
    }
}

fn close_error(tab: &BrowserTab, error: &CloseTabError) -> String {
    if tab.title.is_empty() {
        format!("error closing tab {}: {error}", tab.id)
    } else {
        format!("failed to close tab '{}': {error}", tab.title)
    }
}
