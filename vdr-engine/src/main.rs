//! vdr - Vehicle Data Resolution command line
//!
//! Thin front end over the engine for operators and scripts: decodes VINs and walks the
//! make → model → trim catalog, printing JSON to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, EnvFilter};
use vdr_common::config::{default_config_path, load_toml_config};
use vdr_engine::{EngineConfig, PickerItems, PickerKind, VehicleResolver};

#[derive(Debug, Parser)]
#[command(name = "vdr", version, about = "Resolve vehicles by VIN or catalog selection")]
struct Cli {
    /// Config file (default: $VDR_CONFIG or <config dir>/vdr/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Force catalog queries to bypass every cache
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a 17-character VIN
    Decode { vin: String },
    /// List catalog makers
    Makers,
    /// List models for a maker
    Models {
        #[arg(long)]
        maker: String,
        #[arg(long)]
        year: Option<u16>,
    },
    /// List trims for a maker and model
    Trims {
        #[arg(long)]
        maker: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: Option<u16>,
    },
    /// List model years offered for a maker
    Years {
        #[arg(long)]
        maker: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up before the config file is read so loader warnings are visible.
    // RUST_LOG wins; otherwise the config file level replaces the "info" default below.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let level_from_env = env_filter.is_some();
    let (filter_layer, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new("info")));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("vdr {}", env!("CARGO_PKG_VERSION"));

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path()?,
    };
    info!("Config: {}", config_path.display());
    let toml_config = load_toml_config(&config_path)?;

    if !level_from_env {
        match EnvFilter::try_new(&toml_config.logging.level) {
            Ok(filter) => filter_handle
                .reload(filter)
                .context("Failed to apply configured log level")?,
            Err(e) => warn!(
                level = %toml_config.logging.level,
                error = %e,
                "Ignoring invalid log level in config file"
            ),
        }
    }

    let engine_config = EngineConfig::resolve(&toml_config);
    let mut resolver =
        VehicleResolver::from_config(&engine_config).context("Failed to build resolver")?;
    // One-shot commands never present the maker list after choosing a maker
    resolver.coordinator_mut().set_prefetch_makers(false);

    match cli.command {
        Command::Decode { vin } => match resolver.decode_vin(&vin).await {
            Ok(descriptor) => print_json(&descriptor),
            Err(e) if e.offers_manual_entry() => {
                anyhow::bail!("{} (try manual entry: `vdr makers`)", e)
            }
            Err(e) if e.is_retryable() => {
                anyhow::bail!("{} (registry unavailable, retry later)", e)
            }
            Err(e) => Err(e.into()),
        },
        Command::Makers => {
            let items = open(&mut resolver, PickerKind::Maker, cli.refresh).await?;
            print_json(&items.labels())
        }
        Command::Models { maker, year } => {
            let coordinator = resolver.coordinator_mut();
            coordinator.set_year(year);
            coordinator.set_maker(maker).await;
            let items = open(&mut resolver, PickerKind::Model, cli.refresh).await?;
            print_json(&items.labels())
        }
        Command::Trims { maker, model, year } => {
            let coordinator = resolver.coordinator_mut();
            coordinator.set_year(year);
            coordinator.set_maker(maker).await;
            coordinator.set_model(model)?;
            match open(&mut resolver, PickerKind::Trim, cli.refresh).await? {
                PickerItems::Trims(rows) => print_json(&rows),
                other => print_json(&other.labels()),
            }
        }
        Command::Years { maker } => {
            let years = resolver.list_years(&maker).await;
            print_json(&years)
        }
    }
}

async fn open(
    resolver: &mut VehicleResolver,
    kind: PickerKind,
    refresh: bool,
) -> Result<PickerItems> {
    let coordinator = resolver.coordinator_mut();
    let items = if refresh {
        coordinator.refresh_picker(kind).await?
    } else {
        coordinator.open_picker(kind).await?
    };
    Ok(items)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
