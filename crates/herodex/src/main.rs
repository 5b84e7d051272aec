//! # Herodex CLI
//!
//! Serves a JSON-file hero catalogue over HTTP.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod config;
mod logging;

#[derive(Parser)]
#[command(name = "herodex")]
#[command(version)]
#[command(about = "Hero catalogue with a JSON-file backed HTTP API", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Hero snapshot file
        #[arg(short, long)]
        data_file: Option<PathBuf>,

        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },

    /// Validate a hero snapshot file
    Check {
        /// Hero snapshot file
        #[arg(short, long)]
        data_file: Option<PathBuf>,
    },

    /// Display version info
    Version,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(&logging::LogConfig::new(&cli.log_level).with_json(cli.json_logs));

    let cfg = config::Config::load();

    match cli.command {
        Commands::Serve {
            host,
            port,
            data_file,
            no_cors,
        } => {
            let mut options = commands::ServeOptions::from_config(&cfg);
            if let Some(host) = host {
                options.host = host;
            }
            if let Some(port) = port {
                options.port = port;
            }
            if let Some(data_file) = data_file {
                options.data_file = data_file;
            }
            if no_cors {
                options.cors = false;
            }
            commands::serve(options).await?;
        }

        Commands::Check { data_file } => {
            let data_file = data_file.unwrap_or(cfg.data_file);
            commands::check(&data_file).await?;
        }

        Commands::Version => {
            commands::version();
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                config::show_config();
            }
            ConfigAction::Path => {
                println!("{}", config::Config::config_path().display());
            }
            ConfigAction::Init { force } => {
                commands::config_init(&cfg, force)?;
            }
        },
    }

    Ok(())
}
