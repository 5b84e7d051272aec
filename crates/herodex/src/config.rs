//! Configuration management for the Herodex CLI.
//!
//! Configuration is loaded from (in order of precedence):
//! 1. Command-line arguments
//! 2. Environment variables (HERODEX_*)
//! 3. The `PORT` environment variable, for hosts that inject one
//! 4. Config file (~/.config/herodex/config.toml)
//! 5. Default values

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Hero snapshot file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Server host.
    #[serde(default = "default_host")]
    pub server_host: String,

    /// Server port.
    #[serde(default = "default_port")]
    pub server_port: u16,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("data").join("heroes.json")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    herodex_server::DEFAULT_PORT
}

fn default_cors() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            server_host: default_host(),
            server_port: default_port(),
            cors: default_cors(),
        }
    }
}

impl Config {
    /// Loads configuration from all sources.
    ///
    /// Reports warnings for configuration errors but falls back to defaults.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        match Self::load_from(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\x1b[33mWarning:\x1b[0m Configuration error, using defaults");
                eprintln!("  Config file: {}", config_path.display());
                eprintln!("  Error: {}", e);
                eprintln!();
                eprintln!("  To fix, edit or delete the config file:");
                eprintln!("    rm {}", config_path.display());
                eprintln!();
                Config::default()
            }
        }
    }

    /// Loads configuration using `config_path` as the config file.
    pub fn load_from(config_path: &Path) -> Result<Self, figment::Error> {
        Self::figment(config_path).extract()
    }

    /// The layered configuration sources, lowest precedence first.
    pub fn figment(config_path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::raw().only(&["PORT"]).map(|_| "server_port".into()))
            .merge(Env::prefixed("HERODEX_"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Returns the path to the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("herodex")
    }

    /// Writes this configuration to `path` as TOML, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        std::fs::write(path, toml_str)
    }
}

/// Prints the current configuration and its sources.
pub fn show_config() {
    let config = Config::load();
    let config_path = Config::config_path();

    println!("Herodex Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    if config_path.exists() {
        println!("Status: Found\n");
    } else {
        println!("Status: Not found (using defaults)\n");
    }

    println!("Current settings:");
    println!("  data_file: {}", config.data_file.display());
    println!("  server_host: {}", config.server_host);
    println!("  server_port: {}", config.server_port);
    println!("  cors: {}", config.cors);

    println!("\nEnvironment variables:");
    println!("  HERODEX_DATA_FILE");
    println!("  HERODEX_SERVER_HOST");
    println!("  HERODEX_SERVER_PORT (PORT is also honoured)");
    println!("  HERODEX_CORS");
}
