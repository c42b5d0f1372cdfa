// src/orchestrator.rs
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use chrono::Local;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{Config, OverlapPolicy};
use crate::display::{DisplayPort, Region};
use crate::error::ThreatScopeError;
use crate::history::{History, HistoryEntry};
use crate::render::ResultRenderer;
use crate::scan::{DeepScanResult, ScanApi, ScanCategory, ScanResult};

pub const VALIDATION_MESSAGE: &str = "Please enter a target to analyze";
pub const PRIMARY_FAILURE_MESSAGE: &str = "Failed to analyze target. Please try again later.";
pub const FAILURE_MESSAGE: &str = "Analysis failed";

/// Where the orchestrator is within one display cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Validating,
    Loading,
    Success,
    Failed,
}

/// How an analyze action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Both scans succeeded and every region was rendered
    Completed,
    /// Empty target; only the primary region shows the validation message
    Rejected,
    /// A scan request failed; result regions show the failure message
    Failed,
    /// A newer action took over before this one finished
    Superseded,
    /// Another cycle was in flight and the overlap policy is `ignore`
    Busy,
}

impl CycleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CycleOutcome::Completed)
    }
}

/// Scan categories and policies for one orchestrator
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub primary_scan_type: ScanCategory,
    pub deep_scan_types: Vec<ScanCategory>,
    pub overlap_policy: OverlapPolicy,
    pub history_limit: usize,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            primary_scan_type: config.api.primary_scan_type,
            deep_scan_types: config.api.deep_scan_types.clone(),
            overlap_policy: config.orchestrator.overlap_policy,
            history_limit: config.history.max_entries,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Runs validate -> load -> (success | fail) for each analyze action
pub struct ScanOrchestrator<A, D> {
    api: Arc<A>,
    display: Arc<D>,
    renderer: ResultRenderer,
    settings: OrchestratorSettings,
    history: Mutex<History>,
    state: Mutex<CycleState>,
    generation: AtomicU64,
    busy: AtomicBool,
}

/// Clears the busy flag when the cycle holding it ends
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A, D> ScanOrchestrator<A, D>
where
    A: ScanApi,
    D: DisplayPort,
{
    pub fn new(api: Arc<A>, display: Arc<D>, settings: OrchestratorSettings) -> Self {
        let history = History::new(settings.history_limit);
        Self {
            api,
            display,
            renderer: ResultRenderer::new(),
            settings,
            history: Mutex::new(history),
            state: Mutex::new(CycleState::Idle),
            generation: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> CycleState {
        *self.state.lock()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().entries().cloned().collect()
    }

    pub fn display(&self) -> &Arc<D> {
        &self.display
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Handle one analyze action
    pub async fn analyze(&self, target: &str) -> CycleOutcome {
        // A rejected action must not claim the overlap guard
        let target = target.trim();
        if target.is_empty() {
            debug!("Analyze action rejected: {}", ThreatScopeError::ValidationError(VALIDATION_MESSAGE.to_string()));
            self.display.set_error(Region::Osint, VALIDATION_MESSAGE);
            return CycleOutcome::Rejected;
        }

        let _busy = match self.settings.overlap_policy {
            OverlapPolicy::Ignore => match BusyGuard::acquire(&self.busy) {
                Some(guard) => Some(guard),
                None => {
                    warn!("Ignoring analyze action for {}: a cycle is already running", target);
                    return CycleOutcome::Busy;
                }
            },
            OverlapPolicy::Supersede => None,
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let cycle_id = Uuid::new_v4();

        self.transition(generation, CycleState::Validating);

        info!("Cycle {} analyzing {}", cycle_id, target);
        for region in Region::RESULTS {
            self.display.set_loading(region);
        }
        self.transition(generation, CycleState::Loading);

        let scans = self.run_scans(target).await;

        if !self.is_current(generation) {
            warn!("Cycle {} for {} superseded by a newer analyze action", cycle_id, target);
            return CycleOutcome::Superseded;
        }

        match scans {
            Ok((scan, deep)) => {
                self.render_success(target, &scan, &deep);
                info!("Cycle {} completed for {}", cycle_id, target);
                self.transition(generation, CycleState::Success);
                self.transition(generation, CycleState::Idle);
                CycleOutcome::Completed
            }
            Err(e) => {
                error!("Cycle {} failed for {}: {}", cycle_id, target, e);
                self.display.set_error(Region::Osint, PRIMARY_FAILURE_MESSAGE);
                self.display.set_error(Region::Geo, FAILURE_MESSAGE);
                self.display.set_error(Region::Sigint, FAILURE_MESSAGE);
                self.transition(generation, CycleState::Failed);
                self.transition(generation, CycleState::Idle);
                CycleOutcome::Failed
            }
        }
    }

    /// Primary scan, then the deep scan; a failed primary scan skips the deep scan
    async fn run_scans(&self, target: &str) -> Result<(ScanResult, DeepScanResult), ThreatScopeError> {
        let scan = self.api.scan_primary(target, self.settings.primary_scan_type).await?;
        let deep = self.api.scan_deep(target, &self.settings.deep_scan_types).await?;
        Ok((scan, deep))
    }

    fn render_success(&self, target: &str, scan: &ScanResult, deep: &DeepScanResult) {
        self.display.set_content(Region::Osint, self.renderer.render_scan(scan));

        let deep_markup = match self.renderer.render_deep_scan(deep) {
            Ok(markup) => markup,
            Err(e) => {
                warn!("Deep scan for {} could not be rendered: {}", target, e);
                self.renderer.render_missing_results()
            }
        };
        self.display.set_content(Region::Geo, deep_markup);

        self.display.set_content(Region::Sigint, self.renderer.render_summary(scan, deep));

        let history_markup = {
            let mut history = self.history.lock();
            if let Some(evicted) = history.push(HistoryEntry::new(target, Local::now())) {
                debug!("History full, dropped {}", evicted.target);
            }
            self.renderer.render_history(history.entries())
        };
        self.display.set_content(Region::History, history_markup);
        self.display.scroll_to_latest(Region::History);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::Acquire) == generation
    }

    fn transition(&self, generation: u64, next: CycleState) {
        if !self.is_current(generation) {
            return;
        }
        let mut state = self.state.lock();
        debug!("Orchestrator state {:?} -> {:?}", *state, next);
        *state = next;
    }
}
