use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::provider::aliyun::AliyunCli;
use crate::provider::aliyun::config::load_cli_config;
use crate::provider::SystemResolver;
use crate::region_cache::RegionCache;
use crate::router::Router;

mod app;
mod cli;
mod commands;
mod config;
mod finder;
mod model;
mod nav;
mod pages;
mod provider;
mod region_cache;
mod router;
mod search;
mod theme;
mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting lazyaliyun");

    let _args = cli::Args::parse();

    let config = Arc::new(config::load()?);
    let keys = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let theme = theme::theme_from_name(&config.theme.name);

    let profiles = load_cli_config()?;
    let profile = profiles
        .current_profile()
        .ok_or_else(|| eyre!("No current profile in the aliyun CLI configuration; run `aliyun configure`"))?;
    info!(profile = %profile.name, region = profile.region(), "Using profile");
    let api = Arc::new(AliyunCli::new(
        config.aliyun.binary.clone(),
        profile.name.clone(),
        profile.region(),
    ));

    let router = Router::new(
        api,
        Arc::new(SystemResolver),
        profiles,
        config,
        keys,
        RegionCache::open(),
    );
    App::new(router, theme).run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = dirs::data_local_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("lazyaliyun").join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "lazyaliyun.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
