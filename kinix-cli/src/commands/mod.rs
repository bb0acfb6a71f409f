//! Command handlers -- one module per subcommand

pub mod config;
pub mod rules;
pub mod scan;

use std::path::Path;

use kinix_core::config::KinixConfig;
use tracing::debug;

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Load the effective configuration.
///
/// An explicitly given path must exist. When the default `kinix.toml` is
/// absent, built-in defaults plus `KINIX_*` environment overrides are used.
pub async fn load_config(path: &Path) -> Result<KinixConfig, CliError> {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        debug!("no kinix.toml in working directory, using defaults");
        let mut config = KinixConfig::default();
        config.apply_env_overrides();
        config.validate()?;
        return Ok(config);
    }

    Ok(KinixConfig::load(path).await?)
}

/// Human-readable source label for reports.
pub fn config_source(path: &Path) -> String {
    if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
        "(built-in defaults)".to_owned()
    } else {
        path.display().to_string()
    }
}
