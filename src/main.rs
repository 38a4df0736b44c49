//! Gateway binary
//!
//! Configuration precedence, lowest first: defaults, `--config` YAML file,
//! `PORT` / `BACKEND_URL` environment variables, command-line flags.

use anyhow::Result;
use clap::Parser;
use gateway::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "this-gateway", version, about)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<String>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Base URL of the users/companies REST service
    #[arg(long)]
    backend_url: Option<String>,
}

impl Cli {
    fn load_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_yaml_file(path)?,
            None => GatewayConfig::default(),
        }
        .with_env_overrides()?;

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.backend_url {
            config.backend.base_url = url.clone();
        }

        Ok(config.validated()?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().load_config()?;
    tracing::info!(backend = %config.backend_url(), "proxying REST backend");

    GatewayBuilder::new().with_config(config).serve().await
}
