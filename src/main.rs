use std::{path::Path, process::ExitCode};

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod builder;
mod config;
mod error;
mod fingerprint;
mod index_patcher;
mod markdown;
mod models;
mod site_writer;
mod templates;

use builder::build_site;
use config::SiteConfig;
use error::BuildError;

async fn run() -> Result<(), BuildError> {
    let config = SiteConfig::embedded()?;
    info!(posts = config.posts.len(), "loaded site table");

    let report = build_site(Path::new("."), &config).await?;
    info!(pages = report.pages.len(), version = %report.version, "Done!");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("build failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
