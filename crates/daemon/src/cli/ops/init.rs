use clap::Args;

use calypso_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the API server
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Accept records without a sealed reader key, and skip the check on read
    #[arg(long)]
    pub no_bind_reader_identity: bool,

    /// Hand the stored ciphertext back with each read
    #[arg(long)]
    pub return_ciphertext: bool,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = StateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            api_port: self.api_port.unwrap_or(defaults.api_port),
            bind_reader_identity: !self.no_bind_reader_identity,
            return_ciphertext: self.return_ciphertext,
            ..defaults
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;
        let authority = state.load_key()?.public();

        Ok(format!(
            "Initialized calypso directory at {}\nauthority: {}",
            state.calypso_dir.display(),
            authority
        ))
    }
}
