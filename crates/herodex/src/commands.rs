//! CLI command implementations.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};
use herodex_core::HeroStore;
use herodex_server::{Server, ServerConfig};

use crate::config::Config;

/// Options for `serve` after command-line overrides are applied.
#[derive(Debug, Clone)]
pub struct ServeOptions {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Hero snapshot file.
    pub data_file: PathBuf,
    /// Whether CORS is enabled.
    pub cors: bool,
}

impl ServeOptions {
    /// Starts from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.server_host.clone(),
            port: config.server_port,
            data_file: config.data_file.clone(),
            cors: config.cors,
        }
    }

    fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .wrap_err_with(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

/// Start the API server.
pub async fn serve(options: ServeOptions) -> Result<()> {
    let addr = options.addr()?;

    tracing::info!(data_file = %options.data_file.display(), "Loading heroes");
    let store = load_store(&options.data_file).await?;

    let config = ServerConfig::builder()
        .addr(addr)
        .cors(options.cors)
        .build();

    eprintln!("\n\x1b[32m✓\x1b[0m Server listening on http://{}", addr);
    eprintln!("  Press Ctrl+C to stop\n");

    Server::new(config, store).run().await?;

    eprintln!("\x1b[32m✓\x1b[0m Server stopped");
    Ok(())
}

/// Load a snapshot and report what it contains.
pub async fn check(data_file: &Path) -> Result<()> {
    let store = load_store(data_file).await?;
    let heroes = store.snapshot().await;

    println!("Snapshot: {}", data_file.display());
    println!("Heroes:   {}", heroes.len());

    let mut by_attack_type: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_primary_attr: BTreeMap<String, usize> = BTreeMap::new();
    for hero in &heroes {
        *by_attack_type.entry(hero.attack_type.to_lowercase()).or_default() += 1;
        *by_primary_attr.entry(hero.primary_attr.to_lowercase()).or_default() += 1;
    }

    println!("\nBy attack type:");
    for (attack_type, count) in &by_attack_type {
        println!("  {:<10} {}", attack_type, count);
    }
    println!("\nBy primary attribute:");
    for (attr, count) in &by_primary_attr {
        println!("  {:<10} {}", attr, count);
    }

    let duplicates = store.duplicate_ids().await;
    if !duplicates.is_empty() {
        bail!("duplicate hero ids in {}: {:?}", data_file.display(), duplicates);
    }

    println!("\n\x1b[32m✓\x1b[0m Snapshot is valid");
    Ok(())
}

/// Write the effective configuration to the config file.
pub fn config_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::config_path();
    if path.exists() && !force {
        return Err(eyre!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }

    config
        .save_to(&path)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    println!("Config saved to: {}", path.display());
    Ok(())
}

/// Display version information.
pub fn version() {
    println!("herodex {}", env!("CARGO_PKG_VERSION"));
}

async fn load_store(data_file: &Path) -> Result<HeroStore> {
    HeroStore::open(data_file)
        .await
        .wrap_err_with(|| format!("failed to load heroes from {}", data_file.display()))
}
