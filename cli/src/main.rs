//! cepfetch CLI - resolve a postal code by racing public providers.
//!
//! ```text
//! main() -> load config -> AddressService -> execute(cep) -> print
//!                                  ^
//!                      Ctrl-C cancels the parent token
//! ```
//!
//! Logs go to stderr (filter with `RUST_LOG`, default `warn`) so stdout only
//! ever carries the address.

mod output;

use anyhow::{Context, Result};
use cepfetch_config::CepfetchConfig;
use cepfetch_core::{AddressService, CancellationToken};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_CEP: &str = "01001000";

/// Resolve a Brazilian postal code (CEP) by racing ViaCEP and BrasilAPI.
#[derive(Parser, Debug)]
#[command(name = "cepfetch", version, about)]
struct Args {
    /// Postal code to resolve
    #[arg(default_value = DEFAULT_CEP)]
    cep: String,

    /// Override the lookup timeout, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout_ms: Option<u64>,

    /// Print the address as JSON
    #[arg(long)]
    json: bool,

    /// Config file to read instead of ~/.cepfetch/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(env_filter)
        .init();
}

/// An explicit `--config` must exist; the default path is optional.
fn load_config(path: Option<&PathBuf>) -> Result<CepfetchConfig> {
    match path {
        Some(path) => CepfetchConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(CepfetchConfig::load()
            .context("loading config")?
            .unwrap_or_default()),
    }
}

/// Cancel `token` on Ctrl-C so an interactive user never waits out the deadline.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("Interrupted; cancelling lookup");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    let mut service = AddressService::new(&config).context("building lookup service")?;
    if let Some(timeout_ms) = args.timeout_ms {
        service
            .set_timeout(Duration::from_millis(timeout_ms))
            .context("applying --timeout-ms")?;
    }

    let parent = CancellationToken::new();
    cancel_on_ctrl_c(parent.clone());
    let service = service.with_parent(parent);

    let address = service.execute(args.cep.as_str()).await?;
    println!("{}", output::render(&address, args.json)?);
    Ok(())
}
