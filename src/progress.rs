//! Progress reporting for long streaming passes.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a byte-denominated progress bar sized to a compressed input
/// file.
///
/// The bar tracks compressed bytes consumed, so it reflects real
/// progress through the on-disk file even though the stages see
/// decompressed lines. Purely cosmetic; it never affects output.
pub fn byte_progress_bar(total_bytes: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
            )
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    pb
}
