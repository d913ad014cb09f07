//! # Unirex
//!
//! Expand protein annotation rows to the union of the identifier,
//! taxon, and function values held by every member of their clusters.
//!
//! ## Usage
//!
//! ```bash
//! unirex build-index --cluster-info clusterinfo.dat.gz --output clusterinfo.idx.gz
//! unirex expand --index clusterinfo.idx.gz --input uniref.tab.gz --output uniref-expanded.tsv.gz
//! ```
//!
//! ## Modules
//!
//! - `build` - The `build-index` subcommand wiring
//! - `error` - Structured failure classes for the data plane
//! - `expand` - The `expand` subcommand and the per-row union logic
//! - `index` - Cluster records, the grouping/dedup pass, and the persisted format
//! - `progress` - Byte-denominated progress bars over compressed inputs
//! - `stream` - Gzip reader/writer plumbing
pub mod build;
pub mod error;
pub mod expand;
pub mod index;
pub mod progress;
pub mod stream;
