//! Offline batch embedding tool.
//!
//! Walks the program collection and computes an embedding for every
//! document that does not have one yet.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wayfare_embeddings::CohereClient;
use wayfare_pipeline::{BatchEmbedder, PacingConfig};
use wayfare_store::JsonProgramStore;

#[derive(Parser)]
#[command(name = "wayfare-embed", about = "Embed all unembedded programs in the store")]
struct Args {
    /// Path of the program collection file.
    #[arg(long, default_value = "data/programs.json")]
    store: PathBuf,

    /// Delay before each embedding request, in milliseconds.
    #[arg(long, default_value_t = 300)]
    delay_ms: u64,

    /// Cooldown after a rate-limit response, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    cooldown_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let api_key =
        std::env::var("COHERE_API_KEY").context("COHERE_API_KEY must be set (no fallback key)")?;

    let store = Arc::new(JsonProgramStore::open(&args.store).await?);
    let client = Arc::new(CohereClient::new(api_key));
    let pacing = PacingConfig::default()
        .with_inter_call_delay(Duration::from_millis(args.delay_ms))
        .with_rate_limit_cooldown(Duration::from_millis(args.cooldown_ms));

    let summary = BatchEmbedder::new(store, client)
        .with_pacing(pacing)
        .run()
        .await?;

    println!(
        "{} embedded, {} already embedded, {} failed",
        summary.embedded(),
        summary.already_embedded(),
        summary.failed()
    );

    if !summary.is_complete() {
        anyhow::bail!("{} document(s) failed; rerun to retry them", summary.failed());
    }
    Ok(())
}
