use std::{path::PathBuf, time::Duration};

use tracing::{debug, info};

use crate::{
    catalog::DEFAULT_ENDPOINT, cli::Cli, error::AppError, storage::get_global_data_dir,
    validation::validate_endpoint,
};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Runtime settings resolved from flags and environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// GraphQL endpoint of the catalog
    pub endpoint: String,
    /// Directory holding `storage.json`
    pub data_dir: PathBuf,
    pub timeout: Duration,
    /// Session lives in memory only
    pub ephemeral: bool,
}

impl Config {
    /// Resolves settings from parsed arguments. Environment values arrive through `clap`.
    pub fn from_cli(cli: &Cli) -> Result<Self, AppError> {
        let endpoint = match &cli.endpoint {
            Some(endpoint) => endpoint.trim().to_string(),
            None => {
                debug!("endpoint not set, using default: {DEFAULT_ENDPOINT}");
                DEFAULT_ENDPOINT.to_string()
            }
        };
        validate_endpoint(&endpoint)?;

        let data_dir = match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => get_global_data_dir()?,
        };

        if cli.timeout_secs == 0 {
            return Err(AppError::Config("timeout must be at least 1 second".to_string()));
        }

        let config = Self {
            endpoint,
            data_dir,
            timeout: Duration::from_secs(cli.timeout_secs),
            ephemeral: cli.ephemeral,
        };
        info!(endpoint = %config.endpoint, data_dir = %config.data_dir.display(), ephemeral = config.ephemeral, "configuration loaded");
        Ok(config)
    }
}
