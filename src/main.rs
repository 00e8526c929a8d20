use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use gallery_core::{Session, config::Config, transport::HttpFetcher};
use tracing::error;

#[derive(Parser)]
struct Opts {
    #[clap(short, long, env = "GALLERY_CONFIG")]
    config: PathBuf,
    /// Page name from the `pages` table of the config.
    #[clap(short, long)]
    page: String,
    /// Only show items of these types. Repeatable.
    #[clap(short = 't', long = "type")]
    types: Vec<String>,
}

async fn run(opts: Opts) -> anyhow::Result<()> {
    let config = tokio::fs::read_to_string(&opts.config)
        .await
        .with_context(|| "read config")?;
    let config: Config = serde_yaml::from_str(&config)
        .with_context(|| format!("parse config from {}", opts.config.display()))?;
    let page = config
        .pages
        .get(&opts.page)
        .ok_or_else(|| anyhow!("unknown page: {}", opts.page))?;
    let session = Session::new(&config, HttpFetcher::new());
    session.prefetch().await;
    let gallery = session.gallery(page, &opts.types).await;
    println!(
        "{}",
        serde_json::to_string_pretty(&gallery).with_context(|| "serialize gallery")?
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = run(opts).await {
        error!(?e, "critical error");
    }
}
