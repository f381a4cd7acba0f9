use clap::Args;
use url::Url;

use shardnote::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Note store URL of your home shard
    #[arg(long)]
    pub home_url: Option<Url>,

    /// Default log level
    #[arg(long, default_value = "info")]
    pub default_log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            home_note_store_url: self.home_url.clone(),
            log_level: self.default_log_level.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let home_url = match &state.config.home_note_store_url {
            Some(url) => url.to_string(),
            None => "not set (pass --home-url to linked commands)".to_string(),
        };

        Ok(format!(
            "Initialized shardnote directory at: {}\n\
             - Config: {}\n\
             - Home note store: {}\n\
             - Log level: {}",
            state.app_dir.display(),
            state.config_path.display(),
            home_url,
            state.config.log_level
        ))
    }
}
