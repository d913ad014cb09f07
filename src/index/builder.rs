//! First pipeline stage: fold the raw membership table into one
//! record per distinct cluster id.

use super::{ClusterIndex, ClusterRecord};
use crate::error::{Error, Result};
use std::io::BufRead;
use tracing::debug;

/// Required column count of the membership table:
/// `[identifier, cluster_id, taxon, function_tags]`.
const MEMBERSHIP_FIELDS: usize = 4;

/// Read the tab-delimited membership table and group it by cluster id
/// (column 1), accumulating identifiers (column 0), taxa (column 2),
/// and `@`-joined function tags (column 3).
///
/// Returns sealed records: every list sorted and duplicate-free.
///
/// A row with fewer than four fields aborts the whole run; there is no
/// best-effort parsing. `truncate` caps the number of input lines
/// consumed. The cap is checked before a line is applied, so a
/// truncated run contains the full contribution of exactly `truncate`
/// lines and no partially-applied record.
pub fn build_index<R: BufRead>(reader: R, truncate: Option<u64>) -> Result<ClusterIndex> {
    let mut index = ClusterIndex::new();
    let mut lines_read: u64 = 0;

    for line in reader.lines() {
        if truncate.is_some_and(|cap| lines_read >= cap) {
            debug!("membership read truncated after {lines_read} lines");
            break;
        }
        let line = line?;
        lines_read += 1;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MEMBERSHIP_FIELDS {
            return Err(Error::MalformedRow {
                line: lines_read,
                expected: MEMBERSHIP_FIELDS,
                found: fields.len(),
            });
        }

        let record: &mut ClusterRecord = index.entry(fields[1].to_string()).or_default();
        record.pids.push(fields[0].to_string());
        record.taxa.push(fields[2].to_string());
        for tag in fields[3].split('@') {
            record.functions.push(tag.to_string());
        }
    }

    debug!(
        "accumulated {} clusters from {} membership lines",
        index.len(),
        lines_read
    );

    for record in index.values_mut() {
        record.seal();
    }

    Ok(index)
}
