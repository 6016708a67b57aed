//! Configuration loading from `~/.peerlink/config.toml` with defaults.

use peerlink_types::config::PeerLinkConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load configuration from a TOML file, with defaults.
///
/// A missing, unreadable, or unparsable file yields the defaults; the
/// failure is logged, never returned.
pub fn load_config(path: Option<&Path>) -> PeerLinkConfig {
    let config_path = path
        .map(|p| p.to_path_buf())
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        info!(
            path = %config_path.display(),
            "Config file not found, using defaults"
        );
        return PeerLinkConfig::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<PeerLinkConfig>(&contents) {
            Ok(config) => {
                info!(path = %config_path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %config_path.display(),
                    "Failed to parse config, using defaults"
                );
                PeerLinkConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to read config file, using defaults"
            );
            PeerLinkConfig::default()
        }
    }
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    peerlink_home().join("config.toml")
}

/// Get the default PeerLink home directory.
pub fn peerlink_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".peerlink")
}
