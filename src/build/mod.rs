//! The `build-index` subcommand: raw membership table in, persisted
//! cluster index out.

use crate::index::builder::build_index;
use crate::index::codec::write_index;
use crate::stream;
use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct BuildIndexCommand {
    /// Gzip-compressed membership table: one row per cluster member,
    /// columns [identifier, cluster id, taxon, @-joined function tags]
    #[arg(long)]
    pub cluster_info: PathBuf,

    /// Output path for the gzip-compressed cluster index
    #[arg(short, long)]
    pub output: PathBuf,

    /// Process at most this many input lines (sampling/debug runs)
    #[arg(long)]
    pub truncate: Option<u64>,
}

/// Run the index build stage.
///
/// Reads the whole membership table, groups and deduplicates it per
/// cluster, and persists the records in cluster-id order. Any I/O or
/// malformed-row failure aborts the run; there is no partial output
/// contract, so an interrupted run's output file must be discarded.
pub fn run(cmd: BuildIndexCommand) -> Result<()> {
    info!("building cluster index from {}", cmd.cluster_info.display());

    let reader = stream::open_progress_reader(&cmd.cluster_info)?;
    let index = build_index(reader, cmd.truncate).with_context(|| {
        format!(
            "failed to read membership table {}",
            cmd.cluster_info.display()
        )
    })?;
    info!("indexed {} clusters", index.len());

    let mut writer = stream::create_writer(&cmd.output)?;
    write_index(&mut writer, &index)
        .with_context(|| format!("failed to write index to {}", cmd.output.display()))?;
    writer
        .finish()
        .context("failed to finalize compressed index")?;
    info!("wrote cluster index to {}", cmd.output.display());

    Ok(())
}
