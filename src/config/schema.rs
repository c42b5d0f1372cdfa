use serde::{Serialize, Deserialize};
use std::path::PathBuf;

use crate::scan::ScanCategory;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub history: HistoryConfig,
    pub orchestrator: OrchestratorConfig,
    pub gate: GateConfig,
    pub output: OutputConfig,
}

/// Remote scanning API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub primary_scan_type: ScanCategory,
    pub deep_scan_types: Vec<ScanCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    pub overlap_policy: OverlapPolicy,
}

/// What a new analyze action does while a previous cycle is still in flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// The newer cycle wins; the older one stops writing to the display
    #[default]
    Supersede,
    /// Actions are dropped until the running cycle finishes
    Ignore,
}

/// Disclaimer gate shown by the interactive shell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub page_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:5000/api".to_string(),
                timeout_seconds: 30,
                user_agent: None,
                primary_scan_type: ScanCategory::Threat,
                deep_scan_types: ScanCategory::ALL.to_vec(),
            },
            history: HistoryConfig {
                max_entries: 50,
            },
            orchestrator: OrchestratorConfig {
                overlap_policy: OverlapPolicy::Supersede,
            },
            gate: GateConfig {
                enabled: true,
            },
            output: OutputConfig {
                page_path: PathBuf::from("threatscope-report.html"),
            },
        }
    }
}
