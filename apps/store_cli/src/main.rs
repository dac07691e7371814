use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use catalog_client::HttpCatalogSource;
use clap::Parser;
use store_core::{CatalogFetchOrchestrator, Input, StoreViewComposer, VerticalNavigation};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

use config::{load_settings, parse_vertical_navigation, CliOverrides};
use console::{render, ConsoleBack, ConsoleOpener, ConsoleRegistry};

/// Loads the store catalog and replays gamepad inputs against the store view.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "store.toml")]
    config: PathBuf,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    columns: Option<usize>,
    /// `as_shipped` or `row_aligned`.
    #[arg(long, value_parser = parse_vertical_navigation)]
    vertical_navigation: Option<VerticalNavigation>,
    /// Logical inputs applied once the catalog settles, e.g. `down,right,confirm`.
    #[arg(long, value_delimiter = ',')]
    inputs: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    settings.apply_overrides(CliOverrides {
        base_url: args.base_url,
        columns: args.columns,
        vertical_navigation: args.vertical_navigation,
    });
    settings.validate()?;

    let inputs = args
        .inputs
        .iter()
        .map(|raw| raw.parse::<Input>())
        .collect::<Result<Vec<_>, _>>()
        .context("invalid --inputs")?;

    let source = HttpCatalogSource::new(&settings.base_url, settings.fetch_timeout())
        .context("failed to set up catalog source")?;
    info!(base_url = %source.base_url(), "catalog source ready");

    let orchestrator = Arc::new(CatalogFetchOrchestrator::new(Arc::new(source)));
    let back = Arc::new(ConsoleBack::default());
    let mut composer = StoreViewComposer::new(
        orchestrator,
        ConsoleRegistry,
        Arc::new(ConsoleOpener),
        back.clone(),
        settings.composer_options(),
    )?;

    composer.mount();
    print!("{}", render(&composer.view()));
    composer.wait_for_load().await?;
    print!("{}", render(&composer.view()));

    for input in inputs {
        let outcome = composer.handle_input(input)?;
        println!("{input:?} -> {outcome:?}");
        // Confirm on the error view starts a retry.
        composer.wait_for_load().await?;
        if back.requested() {
            break;
        }
    }

    print!("{}", render(&composer.view()));
    composer.unmount();
    Ok(())
}
