//! Receiver configuration.
//!
//! Loaded from YAML or JSON chosen by file extension. Every key is optional
//! and falls back to the firmware defaults.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use trackside_errors::ConfigError;
use trackside_telemetry_frame::LayoutPolicy;
use trackside_telemetry_schema::SchemaVersion;
use tracing::debug;

/// UDP port the controller firmware sends to.
pub const DEFAULT_UDP_PORT: u16 = 19132;
/// Largest datagram accepted by default.
pub const DEFAULT_MAX_DATAGRAM: usize = 2048;
/// Receive timeout used to notice shutdown on an idle socket.
pub const DEFAULT_RECV_TIMEOUT_MS: u64 = 250;
/// Presentation refresh cadence.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 100;

/// Complete receiver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Field set to decode into
    pub schema: SchemaVersion,
    /// How frame layouts are recognized: auto, padded, packed or minimal
    #[serde(with = "layout_policy")]
    pub frame_layout: LayoutPolicy,
    /// Datagram producer settings
    pub udp: UdpConfig,
    /// Presentation refresh cadence in milliseconds
    pub refresh_interval_ms: u64,
}

/// Datagram producer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UdpConfig {
    /// Local address to bind
    pub bind: SocketAddr,
    /// Largest accepted datagram; longer ones are dropped and counted
    pub max_datagram: usize,
    /// Receive timeout in milliseconds
    pub recv_timeout_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            schema: SchemaVersion::default(),
            frame_layout: LayoutPolicy::Auto,
            udp: UdpConfig::default(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl Default for UdpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_UDP_PORT)),
            max_datagram: DEFAULT_MAX_DATAGRAM,
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
        }
    }
}

impl UdpConfig {
    /// Receive timeout as a duration.
    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

/// File formats accepted by [`IngestConfig::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Format implied by a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] for other extensions.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl IngestConfig {
    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read, has an unknown extension, does
    /// not parse, or contains invalid values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::parse(&content, format).map_err(|e| match e {
            ConfigError::Parse { reason, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;
        debug!(path = %path.display(), schema = %config.schema, "Loaded receiver config");
        Ok(config)
    }

    /// Parse and validate configuration text.
    ///
    /// # Errors
    ///
    /// Fails on syntax errors, unknown keys, or invalid values.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let parsed: Result<Self, String> = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|reason| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.udp.max_datagram == 0 {
            return Err(ConfigError::invalid("udp.max_datagram", "must be greater than zero"));
        }
        if self.udp.recv_timeout_ms == 0 {
            return Err(ConfigError::invalid("udp.recv_timeout_ms", "must be greater than zero"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::invalid("refresh_interval_ms", "must be greater than zero"));
        }
        Ok(())
    }

    /// Render as YAML.
    ///
    /// # Errors
    ///
    /// Only fails if serialization itself fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse {
            path: "<generated>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Presentation cadence as a duration.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }
}

mod layout_policy {
    use serde::{Deserialize, Deserializer, Serializer};
    use trackside_telemetry_frame::LayoutPolicy;

    pub(super) fn serialize<S: Serializer>(policy: &LayoutPolicy, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(policy)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<LayoutPolicy, D::Error> {
        let text = String::deserialize(d)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
