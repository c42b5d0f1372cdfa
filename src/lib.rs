pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod events;
pub mod gate;
pub mod history;
pub mod orchestrator;
pub mod render;
pub mod scan;
pub mod utils;

// Re-export main types for easier access
pub use crate::cli::App;
pub use crate::config::Config;
pub use crate::context::Context;
pub use crate::display::{DisplayPort, PageDisplay, Region};
pub use crate::error::{ThreatScopeError, ThreatScopeResult};
pub use crate::orchestrator::{CycleOutcome, CycleState, ScanOrchestrator};
pub use crate::render::ResultRenderer;
pub use crate::scan::{DeepScanResult, ScanApi, ScanCategory, ScanClient, ScanResult};
