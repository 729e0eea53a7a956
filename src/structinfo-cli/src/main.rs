mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use structinfo::Inspector;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "structinfo=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    tracing::debug!(?config, "loaded configuration");

    let inspector = Inspector::new(config.directory(), config.options);
    let mut stdout = std::io::stdout().lock();
    commands::report(&inspector, cli.selector().as_deref(), &mut stdout)
}
