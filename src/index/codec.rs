//! Persisted index format.
//!
//! The index is stored as a gzip stream of `<cluster_id>\t<JSON>\n`
//! lines in ascending cluster-id order. The line framing makes every
//! record self-delimiting, so the loader can stream-decode and treat
//! end-of-stream as a normal terminal condition rather than needing a
//! length prefix or trailer.

use super::{ClusterIndex, ClusterRecord};
use crate::error::{Error, Result};
use std::io::{BufRead, Write};
use tracing::debug;

/// Serialize every record, one line per cluster, in ascending
/// lexicographic cluster-id order.
pub fn write_index<W: Write>(mut writer: W, index: &ClusterIndex) -> Result<()> {
    let mut ids: Vec<&String> = index.keys().collect();
    ids.sort_unstable();

    for id in ids {
        let body = serde_json::to_string(&index[id])?;
        writeln!(writer, "{id}\t{body}")?;
    }
    Ok(())
}

/// Decode a persisted index stream back into a [`ClusterIndex`].
///
/// End-of-stream is the normal stop condition. A record that cannot be
/// split on its tab or whose JSON body fails to parse is a corrupt
/// stream and aborts the load. `limit` caps the number of records
/// decoded, skipping the remainder without error; it exists for
/// test and debug runs.
pub fn read_index<R: BufRead>(reader: R, limit: Option<u64>) -> Result<ClusterIndex> {
    let mut index = ClusterIndex::new();
    let mut records_read: u64 = 0;

    for line in reader.lines() {
        if limit.is_some_and(|cap| records_read >= cap) {
            debug!("index load capped at {records_read} records");
            break;
        }
        let line = line?;
        records_read += 1;

        let (id, body) = line.split_once('\t').ok_or_else(|| Error::CorruptIndex {
            record: records_read,
            reason: "missing tab between cluster id and record body".to_string(),
        })?;
        let record: ClusterRecord =
            serde_json::from_str(body).map_err(|e| Error::CorruptIndex {
                record: records_read,
                reason: e.to_string(),
            })?;
        index.insert(id.to_string(), record);
    }

    debug!("loaded {} cluster records", index.len());
    Ok(index)
}
