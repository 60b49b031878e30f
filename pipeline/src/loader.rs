//! One-shot ingestion loader.
//!
//! Inserts a static batch of raw program records into the store. No
//! embedding is involved; the batch pipeline picks the records up later.

use std::path::Path;

use tokio::fs;
use tracing::info;

use wayfare_store::{NewProgram, ProgramStore};

use crate::error::Result;

/// Insert the given records into the store, in order.
///
/// Returns the number of records inserted.
pub async fn load_programs(store: &dyn ProgramStore, programs: Vec<NewProgram>) -> Result<usize> {
    let total = programs.len();
    for program in programs {
        let inserted = store.insert(program).await?;
        info!("Uploaded: {}", inserted.title);
    }
    info!("All {total} program(s) uploaded");
    Ok(total)
}

/// Read a JSON array of `{title, description}` records and insert them.
pub async fn load_programs_from_file(
    store: &dyn ProgramStore,
    path: impl AsRef<Path>,
) -> Result<usize> {
    let content = fs::read_to_string(path.as_ref()).await?;
    let programs: Vec<NewProgram> = serde_json::from_str(&content)?;
    load_programs(store, programs).await
}
