//! Configuration types for directory and client roles.
//!
//! Every field has a default so a partial (or absent) `config.toml` still
//! yields a runnable setup.

use crate::account::Account;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeerLinkConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory role settings.
    pub directory: DirectoryConfig,
    /// Client role settings.
    pub client: ClientConfig,
}

impl Default for PeerLinkConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            directory: DirectoryConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

/// Settings for a directory instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Address the directory listens on.
    pub listen_addr: String,
    /// Accounts seeded into the user registry at boot.
    pub accounts: Vec<Account>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            accounts: vec![Account::new("alice", "pass"), Account::new("bob", "pass")],
        }
    }
}

/// Settings for a client instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Address of the front surface used by the local application.
    pub api_listen: String,
    /// Address on which inbound peer messages are accepted.
    pub p2p_listen: String,
    /// Where the directory can be reached.
    pub directory_addr: String,
    /// Address announced to the directory when a registration omits one.
    /// Falls back to the bound peer address.
    pub advertise_addr: Option<String>,
    /// Deadline applied to each outbound directory or peer call.
    pub call_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_listen: "127.0.0.1:3001".to_string(),
            p2p_listen: "0.0.0.0:4000".to_string(),
            directory_addr: "127.0.0.1:3000".to_string(),
            advertise_addr: None,
            call_timeout_secs: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PeerLinkConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.directory.accounts.len(), 2);
        assert_eq!(config.client.call_timeout_secs, 10);
        assert!(config.client.advertise_addr.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: PeerLinkConfig = toml::from_str(
            r#"
            [client]
            directory_addr = "dir.local:3000"
            advertise_addr = "me.local:4000"
            "#,
        )
        .unwrap();
        assert_eq!(config.client.directory_addr, "dir.local:3000");
        assert_eq!(config.client.advertise_addr.as_deref(), Some("me.local:4000"));
        assert_eq!(config.client.p2p_listen, "0.0.0.0:4000");
        assert_eq!(config.directory.listen_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_accounts_from_toml() {
        let config: PeerLinkConfig = toml::from_str(
            r#"
            [[directory.accounts]]
            login = "carol"
            password = "pw3"
            "#,
        )
        .unwrap();
        assert_eq!(config.directory.accounts, vec![Account::new("carol", "pw3")]);
    }
}
