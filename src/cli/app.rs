use tracing::{info, warn};

use crate::config::Config;
use crate::error::ThreatScopeResult;

use super::commands::{self, Args, Commands};

/// The main application struct
pub struct App {
    args: Args,
}

impl App {
    /// Create a new application instance
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Load configuration, applying command line overrides
    pub fn load_config(&self) -> ThreatScopeResult<Config> {
        let mut config = Config::load(self.args.config.as_deref())?;

        if let Some(base_url) = &self.args.base_url {
            info!("Using API base URL from command line: {}", base_url);
            config.api.base_url = base_url.clone();
            config.validate()?;
        }

        Ok(config)
    }

    /// Run the application. Returns `false` when the command did not succeed.
    pub async fn run(&self) -> ThreatScopeResult<bool> {
        info!("Starting ThreatScope v{}", env!("CARGO_PKG_VERSION"));

        if self.args.verbose {
            info!("Verbose mode enabled");
        }

        // init must work even when the current configuration is broken
        if let Some(command @ Commands::Init { .. }) = &self.args.command {
            return commands::execute_command(command, Config::default()).await;
        }

        let config = self.load_config()?;

        match &self.args.command {
            Some(command) => commands::execute_command(command, config).await,
            None => {
                warn!("No command specified, starting interactive shell");
                commands::execute_command(&Commands::Shell { output: None }, config).await
            }
        }
    }
}
