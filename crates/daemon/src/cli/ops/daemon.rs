use clap::Args;

use calypso_daemon::state::AppState;
use calypso_daemon::{spawn_service, DaemonConfig, StartError};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] calypso_daemon::state::StateError),

    #[error("invalid log level: {0}")]
    LogLevel(String),

    #[error("daemon failed: {0}")]
    Failed(#[from] StartError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.calypso)
        let state = AppState::load(ctx.config_path.clone())?;
        let authority_secret = state.load_key()?;

        let log_level = state
            .config
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| DaemonError::LogLevel(state.config.log_level.clone()))?;

        let config = DaemonConfig {
            authority_secret: Some(authority_secret),
            protocol: state.config.protocol(),
            api_port: self.api_port.unwrap_or(state.config.api_port),
            sqlite_path: Some(state.db_path),
            log_level,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
