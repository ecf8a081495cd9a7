//! Config lookup, provider registry setup, and `paceline validate`.

use std::path::{Path, PathBuf};

use paceline_recon::{ProviderRegistry, ReconConfig};

use crate::CliError;

const CONFIG_FILE: &str = "paceline.toml";

/// `<config dir>/paceline/paceline.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("paceline").join(CONFIG_FILE))
}

/// Explicit path must exist. Without one, the default location is used when
/// present; otherwise built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ReconConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => {
                log::debug!("no config file; using defaults");
                return Ok(ReconConfig::default());
            }
        },
    };
    read_config(&path)
}

fn read_config(path: &Path) -> Result<ReconConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        CliError::usage(format!("cannot read config {}: {e}", path.display()))
            .with_hint("pass --config FILE or set PACELINE_CONFIG")
    })?;
    let config = ReconConfig::from_toml(&text)?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

/// Registry from the dump directories, checked against the config.
pub fn open_sources(fixtures: &[PathBuf], config: &ReconConfig) -> Result<ProviderRegistry, CliError> {
    let registry = paceline_sources::open_registry(fixtures)?;
    config.validate_against(&registry)?;
    Ok(registry)
}

pub fn cmd_validate(config_path: PathBuf, fixtures: Vec<PathBuf>) -> Result<(), CliError> {
    let config = read_config(&config_path)?;
    if !fixtures.is_empty() {
        open_sources(&fixtures, &config)?;
    }

    let disabled = config.providers.values().filter(|p| !p.enabled).count();
    eprintln!(
        "valid: load_policy {}, {} provider section(s) ({} disabled), search limit {}",
        config.load_policy,
        config.providers.len(),
        disabled,
        match config.default_max_search_results {
            0 => "unlimited".to_string(),
            n => n.to_string(),
        },
    );
    Ok(())
}
