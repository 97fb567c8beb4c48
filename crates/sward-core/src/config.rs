//! Routing configuration.
//!
//! Channel and chaincode names are resolved exactly once, at process
//! start, from defaults, an optional TOML file, and environment
//! overrides — never re-read per request. The gateway deadline fields
//! parameterize the *external* gateway client; they are configuration
//! data only and nothing in the core ever waits on them.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment override for the channel name.
pub const CHANNEL_NAME_ENV: &str = "CHANNEL_NAME";

/// Environment override for the contracts/jobs chaincode name.
pub const CHAINCODE_NAME_ENV: &str = "CHAINCODE_NAME";

/// Environment override for the customer chaincode name.
pub const CUSTOMER_CHAINCODE_NAME_ENV: &str = "CUSTOMER_CHAINCODE_NAME";

/// Environment override for the mower chaincode name.
pub const MOWER_CHAINCODE_NAME_ENV: &str = "MOWER_CHAINCODE_NAME";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A resolved value is unusable.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Gateway deadline budget, one terminal outcome per external request.
///
/// Defaults match the reference gateway client: evaluate 5s, endorse
/// 15s, submit 5s, commit status 60s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDeadlines {
    /// Budget for read-only evaluation calls, in seconds.
    #[serde(default = "default_evaluate_secs")]
    pub evaluate_secs: u64,

    /// Budget for collecting endorsements, in seconds.
    #[serde(default = "default_endorse_secs")]
    pub endorse_secs: u64,

    /// Budget for handing off to ordering, in seconds.
    #[serde(default = "default_submit_secs")]
    pub submit_secs: u64,

    /// Budget for awaiting commit status, in seconds.
    #[serde(default = "default_commit_status_secs")]
    pub commit_status_secs: u64,
}

impl Default for GatewayDeadlines {
    fn default() -> Self {
        Self {
            evaluate_secs: default_evaluate_secs(),
            endorse_secs: default_endorse_secs(),
            submit_secs: default_submit_secs(),
            commit_status_secs: default_commit_status_secs(),
        }
    }
}

impl GatewayDeadlines {
    /// Deadline for awaiting commit status.
    #[must_use]
    pub const fn commit_status(&self) -> Duration {
        Duration::from_secs(self.commit_status_secs)
    }

    /// Deadline for read-only evaluation calls.
    #[must_use]
    pub const fn evaluate(&self) -> Duration {
        Duration::from_secs(self.evaluate_secs)
    }

    /// Deadline for collecting endorsements.
    #[must_use]
    pub const fn endorse(&self) -> Duration {
        Duration::from_secs(self.endorse_secs)
    }

    /// Deadline for the ordering hand-off.
    #[must_use]
    pub const fn submit(&self) -> Duration {
        Duration::from_secs(self.submit_secs)
    }
}

/// Names routing a request to the right channel and chaincode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Ledger channel carrying all three chaincodes.
    #[serde(default = "default_channel")]
    pub channel: String,

    /// Chaincode serving general contracts and jobs.
    #[serde(default = "default_contracts_chaincode")]
    pub contracts_chaincode: String,

    /// Chaincode serving customer records.
    #[serde(default = "default_customer_chaincode")]
    pub customer_chaincode: String,

    /// Chaincode serving mower SLA evaluation.
    #[serde(default = "default_mower_chaincode")]
    pub mower_chaincode: String,

    /// Gateway deadline budget.
    #[serde(default)]
    pub deadlines: GatewayDeadlines,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            contracts_chaincode: default_contracts_chaincode(),
            customer_chaincode: default_customer_chaincode(),
            mower_chaincode: default_mower_chaincode(),
            deadlines: GatewayDeadlines::default(),
        }
    }
}

impl RoutingConfig {
    /// Resolves configuration from defaults plus environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an override resolves to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(channel) = std::env::var(CHANNEL_NAME_ENV) {
            config.channel = channel;
        }
        if let Ok(name) = std::env::var(CHAINCODE_NAME_ENV) {
            config.contracts_chaincode = name;
        }
        if let Ok(name) = std::env::var(CUSTOMER_CHAINCODE_NAME_ENV) {
            config.customer_chaincode = name;
        }
        if let Ok(name) = std::env::var(MOWER_CHAINCODE_NAME_ENV) {
            config.mower_chaincode = name;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or a value is unusable.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serializes configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (what, value) in [
            ("channel", &self.channel),
            ("contracts chaincode", &self.contracts_chaincode),
            ("customer chaincode", &self.customer_chaincode),
            ("mower chaincode", &self.mower_chaincode),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "{what} name must not be empty"
                )));
            }
        }
        Ok(())
    }
}

fn default_channel() -> String {
    "mychannel".to_owned()
}

fn default_contracts_chaincode() -> String {
    "gc".to_owned()
}

fn default_customer_chaincode() -> String {
    "customer".to_owned()
}

fn default_mower_chaincode() -> String {
    "mower".to_owned()
}

const fn default_evaluate_secs() -> u64 {
    5
}

const fn default_endorse_secs() -> u64 {
    15
}

const fn default_submit_secs() -> u64 {
    5
}

const fn default_commit_status_secs() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_deployment() {
        let config = RoutingConfig::default();
        assert_eq!(config.channel, "mychannel");
        assert_eq!(config.contracts_chaincode, "gc");
        assert_eq!(config.customer_chaincode, "customer");
        assert_eq!(config.mower_chaincode, "mower");
        assert_eq!(config.deadlines.endorse(), Duration::from_secs(15));
        assert_eq!(config.deadlines.commit_status(), Duration::from_secs(60));
    }

    #[test]
    fn toml_overrides_only_named_fields() {
        let config = RoutingConfig::from_toml(
            r#"
            channel = "customer"

            [deadlines]
            commit_status_secs = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.channel, "customer");
        assert_eq!(config.contracts_chaincode, "gc");
        assert_eq!(config.deadlines.commit_status(), Duration::from_secs(90));
        assert_eq!(config.deadlines.submit(), Duration::from_secs(5));
    }

    #[test]
    fn empty_names_are_rejected() {
        let result = RoutingConfig::from_toml(r#"channel = "  ""#);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn toml_round_trip() {
        let config = RoutingConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(RoutingConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn environment_overrides_apply_once_at_resolution() {
        // Serialized with the other env-touching assertions by virtue of
        // being the only test that sets these variables.
        std::env::set_var(CHANNEL_NAME_ENV, "side-channel");
        std::env::set_var(CHAINCODE_NAME_ENV, "jobs-v2");

        let config = RoutingConfig::from_env().unwrap();
        assert_eq!(config.channel, "side-channel");
        assert_eq!(config.contracts_chaincode, "jobs-v2");
        assert_eq!(config.customer_chaincode, "customer");

        std::env::remove_var(CHANNEL_NAME_ENV);
        std::env::remove_var(CHAINCODE_NAME_ENV);

        // Later mutations of the environment do not affect a resolved
        // configuration value.
        assert_eq!(config.channel, "side-channel");
    }
}
