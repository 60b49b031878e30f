//! One-shot seed tool: upload a JSON batch of program records.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wayfare_pipeline::loader;
use wayfare_store::JsonProgramStore;

#[derive(Parser)]
#[command(name = "wayfare-seed", about = "Insert a JSON batch of programs into the store")]
struct Args {
    /// Path of the program collection file.
    #[arg(long, default_value = "data/programs.json")]
    store: PathBuf,

    /// JSON file holding an array of {title, description} records.
    input: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let store = JsonProgramStore::open(&args.store).await?;
    let count = loader::load_programs_from_file(&store, &args.input).await?;
    println!("Uploaded {count} program(s)");
    Ok(())
}
