//! Configuration for autonomixd

use autonomix_registry::RegistryConfig;
use autonomix_types::Principal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Registry construction
    #[serde(default)]
    pub registry: RegistrySection,

    /// Off-chain metadata resolution
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Requests per minute per client address and path; 0 disables limiting
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_min: u32,

    /// Directory holding `metadata/` and `images/` to serve and resolve locally
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: true,
            request_timeout_secs: default_request_timeout(),
            max_body_size: default_max_body_size(),
            rate_limit_per_min: default_rate_limit(),
            static_dir: None,
        }
    }
}

/// Registry construction parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Principal granted the admin role at startup
    #[serde(default)]
    pub admin: Option<Principal>,

    /// Registry options
    #[serde(default)]
    pub options: RegistryConfig,
}

/// Metadata resolver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Gateway prefix substituted for `ipfs://`
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,

    /// How long resolved documents and images stay cached
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_ms: u64,

    /// Largest metadata document fetched and parsed
    #[serde(default = "default_max_metadata_bytes")]
    pub max_metadata_bytes: usize,

    /// Largest image inlined as a data URI
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: usize,

    /// Per-request fetch timeout
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            ipfs_gateway: default_ipfs_gateway(),
            cache_ttl_ms: default_cache_ttl(),
            max_metadata_bytes: default_max_metadata_bytes(),
            max_image_bytes: default_max_image_bytes(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_rate_limit() -> u32 {
    60
}

fn default_ipfs_gateway() -> String {
    "https://ipfs.io/ipfs/".to_string()
}

fn default_cache_ttl() -> u64 {
    60_000
}

fn default_max_metadata_bytes() -> usize {
    256 * 1024
}

fn default_max_image_bytes() -> usize {
    1_048_576
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then an optional file, then
    /// `AUTONOMIX_`-prefixed environment variables (`__` separates sections,
    /// e.g. `AUTONOMIX_REGISTRY__ADMIN`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("AUTONOMIX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DaemonConfig::default();
        assert_eq!(config.server.listen_addr.port(), 8080);
        assert!(config.registry.admin.is_none());
        assert_eq!(config.server.rate_limit_per_min, 60);
    }

    #[test]
    fn test_resolver_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.ipfs_gateway, "https://ipfs.io/ipfs/");
        assert_eq!(config.cache_ttl_ms, 60_000);
        assert_eq!(config.max_metadata_bytes, 262_144);
        assert_eq!(config.max_image_bytes, 1_048_576);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("autonomixd.toml");
        std::fs::write(
            &path,
            r#"
[server]
listen_addr = "0.0.0.0:9090"

[registry]
admin = "0x00000000000000000000000000000000000000a1"

[registry.options]
symbol = "AGX"
validate_metadata_on_register = true
"#,
        )
        .unwrap();

        let config = DaemonConfig::load(path.to_str()).unwrap();
        assert_eq!(config.server.listen_addr.port(), 9090);
        assert_eq!(
            config.registry.admin.unwrap().to_string(),
            "0x00000000000000000000000000000000000000a1"
        );
        assert_eq!(config.registry.options.symbol, "AGX");
        assert!(config.registry.options.validate_metadata_on_register);
        assert_eq!(config.registry.options.name, "AutonomiX Agent");
    }
}
