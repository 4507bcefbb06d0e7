//! Configuration loading and resolution
//!
//! Values resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The payment processor secret has no default: startup fails without it
//! rather than deferring the failure to the first checkout request.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5780";
pub const DEFAULT_PUBLIC_ORIGIN: &str = "http://localhost:5780";
pub const DEFAULT_CURRENCY: &str = "usd";

/// Runtime configuration for the storefront service
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Origin used for checkout redirect URLs when the request carries none
    pub public_origin: String,
    /// ISO currency code passed to the payment processor
    pub currency: String,
    /// Payment processor secret key (required)
    pub stripe_secret_key: String,
    /// Seed the catalog at startup instead of on first request
    pub seed_on_startup: bool,
}

/// Configuration overrides from the command line, passed down by the binary
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_addr: Option<String>,
    pub public_origin: Option<String>,
    pub currency: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub seed_on_startup: Option<bool>,
    pub config_file: Option<PathBuf>,
}

/// Values parsed from the optional TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind_addr: Option<String>,
    public_origin: Option<String>,
    currency: Option<String>,
    stripe_secret_key: Option<String>,
    seed_on_startup: Option<bool>,
}

impl Config {
    /// Resolve the full configuration from all layers
    pub fn load(overrides: Overrides) -> Result<Self> {
        let file = match overrides.config_file.clone().or_else(default_config_file) {
            Some(path) => read_config_file(&path)?,
            None => FileConfig::default(),
        };

        let stripe_secret_key = overrides
            .stripe_secret_key
            .or_else(|| env_string("STRIPE_SECRET_KEY"))
            .or(file.stripe_secret_key)
            .ok_or_else(|| {
                Error::Config("missing payment processor secret: set STRIPE_SECRET_KEY".to_string())
            })?;

        Ok(Config {
            bind_addr: overrides
                .bind_addr
                .or_else(|| env_string("CEAZY_BIND_ADDR"))
                .or(file.bind_addr)
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            public_origin: overrides
                .public_origin
                .or_else(|| env_string("CEAZY_PUBLIC_ORIGIN"))
                .or(file.public_origin)
                .unwrap_or_else(|| DEFAULT_PUBLIC_ORIGIN.to_string()),
            currency: overrides
                .currency
                .or_else(|| env_string("CEAZY_CURRENCY"))
                .or(file.currency)
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            stripe_secret_key,
            seed_on_startup: overrides
                .seed_on_startup
                .or_else(|| env_string("CEAZY_SEED_ON_STARTUP").as_deref().and_then(parse_bool))
                .or(file.seed_on_startup)
                .unwrap_or(true),
        })
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Default configuration file location.
///
/// Tries the user config dir first (~/.config/ceazy/config.toml on Linux),
/// then the system-wide /etc/ceazy/config.toml.
fn default_config_file() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("ceazy").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    let system = PathBuf::from("/etc/ceazy/config.toml");
    system.exists().then_some(system)
}

fn read_config_file(path: &Path) -> Result<FileConfig> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;

    fn clear_env() {
        for name in [
            "STRIPE_SECRET_KEY",
            "CEAZY_BIND_ADDR",
            "CEAZY_PUBLIC_ORIGIN",
            "CEAZY_CURRENCY",
            "CEAZY_SEED_ON_STARTUP",
        ] {
            std::env::remove_var(name);
        }
    }

    fn temp_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn missing_secret_fails_at_load() {
        clear_env();
        // point at an explicit (empty) file so a developer's real
        // ~/.config/ceazy/config.toml cannot leak into the test
        let file = temp_config("");
        let result = Config::load(Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Overrides::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    #[serial]
    fn secret_resolves_from_environment() {
        clear_env();
        std::env::set_var("STRIPE_SECRET_KEY", "sk_test_env");

        let file = temp_config("");
        let config = Config::load(Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Overrides::default()
        })
        .unwrap();

        assert_eq!(config.stripe_secret_key, "sk_test_env");
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.currency, DEFAULT_CURRENCY);
        assert!(config.seed_on_startup);
        clear_env();
    }

    #[test]
    #[serial]
    fn cli_override_beats_environment_and_file() {
        clear_env();
        std::env::set_var("STRIPE_SECRET_KEY", "sk_test_env");
        let file = temp_config("bind_addr = \"127.0.0.1:9000\"\ncurrency = \"eur\"\n");

        let config = Config::load(Overrides {
            bind_addr: Some("127.0.0.1:8080".to_string()),
            config_file: Some(file.path().to_path_buf()),
            ..Overrides::default()
        })
        .unwrap();

        // CLI wins over the file, the file wins over the default
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.currency, "eur");
        clear_env();
    }

    #[test]
    #[serial]
    fn file_layer_supplies_secret_and_flags() {
        clear_env();
        let file = temp_config(
            "stripe_secret_key = \"sk_test_file\"\nseed_on_startup = false\n",
        );

        let config = Config::load(Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Overrides::default()
        })
        .unwrap();

        assert_eq!(config.stripe_secret_key, "sk_test_file");
        assert!(!config.seed_on_startup);
    }

    #[test]
    #[serial]
    fn malformed_file_is_a_config_error() {
        clear_env();
        let file = temp_config("not valid toml [");
        let result = Config::load(Overrides {
            config_file: Some(file.path().to_path_buf()),
            ..Overrides::default()
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
