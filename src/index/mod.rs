//! The in-memory cluster index: one record per cluster id, holding the
//! deduplicated identifier, taxon, and function lists for that cluster.

pub mod builder;
pub mod codec;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from cluster id to its record.
///
/// Built once by the index stage, fully resident for the lifetime of
/// the expansion stage, and read-only after construction.
pub type ClusterIndex = HashMap<String, ClusterRecord>;

/// Membership data for one cluster.
///
/// While a record is being accumulated the lists may contain
/// duplicates; [`ClusterRecord::seal`] sorts and deduplicates them.
/// Persisted records are always sealed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRecord {
    /// Protein identifiers belonging to the cluster.
    pub pids: Vec<String>,
    /// Taxonomic labels seen across the cluster's members.
    pub taxa: Vec<String>,
    /// Function tags, split out of the @-joined source field.
    pub functions: Vec<String>,
}

impl ClusterRecord {
    /// Sort and deduplicate all three lists.
    pub fn seal(&mut self) {
        dedup_sorted(&mut self.pids);
        dedup_sorted(&mut self.taxa);
        dedup_sorted(&mut self.functions);
    }
}

/// Sort `values` lexicographically and drop adjacent duplicates,
/// leaving exactly the distinct values of the input, each once.
///
/// Lists of length 0 or 1 are already in canonical form and are
/// returned untouched.
pub fn dedup_sorted(values: &mut Vec<String>) {
    if values.len() <= 1 {
        return;
    }
    values.sort_unstable();
    values.dedup();
}
