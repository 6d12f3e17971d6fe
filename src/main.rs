//! gembridge - secret-injecting relay for the Google Generative Language API
//!
//! A small proxy that keeps the upstream API key server-side: clients POST
//! `{type, payload}` envelopes and receive the upstream JSON unchanged.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gembridge::config::{Config, KeySource};
use gembridge::relay::{run_server, GenerationKind};

#[derive(Parser)]
#[command(name = "gembridge")]
#[command(about = "Secret-injecting relay for the Google Generative Language API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay server
    Serve {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,

        /// Override listen address
        #[arg(short, long)]
        listen: Option<String>,
    },

    /// Validate configuration file and report the credential source
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },

    /// Show the request type to upstream endpoint table
    Endpoints {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gembridge={},tower_http=info", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, listen } => {
            // Config-file-less deployments are fine: defaults plus the
            // GEMINI_API_KEY environment variable cover the whole surface.
            let from_file = std::path::Path::new(&config).exists();
            let (mut cfg, key_source) = if from_file {
                Config::load(&config)?
            } else {
                Config::from_env()?
            };

            init_tracing(&cfg.logging.level);

            if from_file {
                tracing::info!(config = %config, "Loaded configuration");
            } else {
                tracing::warn!(config = %config, "Config file not found - using defaults");
            }

            if let Some(addr) = listen {
                tracing::info!(listen = %addr, "Override listen address");
                cfg.server.listen = addr;
            }

            match key_source {
                KeySource::None => tracing::warn!(
                    "No upstream API key configured - relay requests will fail until one is provided"
                ),
                source => tracing::info!(key_source = %source, "Resolved upstream API key"),
            }

            run_server(cfg).await
        }

        Commands::Check { config } => {
            init_tracing("info");
            let (cfg, key_source) = Config::load(&config)?;
            println!("Configuration OK");
            println!("  listen:   {}", cfg.server.listen);
            println!("  upstream: {}", cfg.upstream.base_url);
            println!("  api key:  {}", key_source);
            Ok(())
        }

        Commands::Endpoints { config } => {
            init_tracing("info");
            let (cfg, _) = if std::path::Path::new(&config).exists() {
                Config::load(&config)?
            } else {
                Config::from_env()?
            };
            for kind in GenerationKind::ALL {
                println!("{:<6} {}", kind.as_str(), kind.upstream_url(&cfg.upstream));
            }
            Ok(())
        }
    }
}
