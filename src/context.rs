// src/context.rs
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::display::PageDisplay;
use crate::error::{ThreatScopeResult, ThreatScopeError};
use crate::gate::SessionStore;
use crate::orchestrator::{OrchestratorSettings, ScanOrchestrator};
use crate::scan::ScanClient;

pub const PAGE_TITLE: &str = "ThreatScope";

pub type LiveOrchestrator = ScanOrchestrator<ScanClient, PageDisplay>;

/// Application context containing all shared resources
pub struct Context {
    pub config: Config,
    pub display: Arc<PageDisplay>,
    pub orchestrator: Arc<LiveOrchestrator>,
    pub session: SessionStore,
}

impl Context {
    /// Wire the scan client, display and orchestrator from configuration
    pub fn new(config: Config) -> ThreatScopeResult<Self> {
        config.validate()?;

        let client = Arc::new(ScanClient::from_config(&config.api)?);
        debug!("Scan API base URL: {}", client.base_url());

        let display = Arc::new(PageDisplay::new(PAGE_TITLE));
        let orchestrator = Arc::new(ScanOrchestrator::new(
            client,
            display.clone(),
            OrchestratorSettings::from_config(&config),
        ));

        Ok(Self {
            config,
            display,
            orchestrator,
            session: SessionStore::new(),
        })
    }

    /// Make sure the page can be written to `output_path`
    pub async fn prepare_output(&self, output_path: &Path) -> ThreatScopeResult<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await
                    .map_err(|e| ThreatScopeError::FileError {
                        path: parent.to_path_buf(),
                        message: format!("Failed to create directory: {}", e),
                    })?;
            }
        }
        Ok(())
    }
}
