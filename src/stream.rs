//! Gzip stream plumbing shared by both stages.

use crate::progress;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use indicatif::ProgressBarIter;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a gzip-compressed input file for line-oriented reading.
pub fn open_reader(path: &Path) -> Result<BufReader<GzDecoder<File>>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    Ok(BufReader::new(GzDecoder::new(file)))
}

/// Open a gzip-compressed input file with a byte progress bar over the
/// compressed stream.
pub fn open_progress_reader(
    path: &Path,
) -> Result<BufReader<GzDecoder<ProgressBarIter<File>>>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("failed to stat {}", path.display()))?
        .len();
    let pb = progress::byte_progress_bar(len);
    Ok(BufReader::new(GzDecoder::new(pb.wrap_read(file))))
}

/// Create a gzip-compressed output file. The caller must call
/// `finish()` on the returned encoder to flush the gzip trailer.
pub fn create_writer(path: &Path) -> Result<GzEncoder<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(GzEncoder::new(file, Compression::default()))
}
