use std::path::Path;

use pricescan_core::{load_block_signatures, BlockSignatures};

/// Built-in signatures, or the validated file at `path` when one is given.
pub(crate) fn block_signatures(path: Option<&Path>) -> anyhow::Result<BlockSignatures> {
    match path {
        Some(path) => {
            let signatures = load_block_signatures(path)?;
            tracing::info!(path = %path.display(), "loaded block signatures");
            Ok(signatures)
        }
        None => Ok(BlockSignatures::default()),
    }
}

pub(crate) fn run_signatures(path: Option<&Path>) -> anyhow::Result<()> {
    let signatures = block_signatures(path)?;
    if path.is_none() {
        tracing::info!("no signature file configured, showing built-in defaults");
    }
    println!("{}", serde_json::to_string_pretty(&signatures)?);
    Ok(())
}
