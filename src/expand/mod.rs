//! The `expand` subcommand: stream the annotation table and widen each
//! row's identifier, function, and taxon fields to the union of the
//! values held by every cluster the row references.

use crate::error::Error;
use crate::index::{codec, ClusterIndex};
use crate::stream;
use anyhow::{Context, Result};
use clap::Args;
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

/// Minimum column count of the annotation table.
const ANNOTATION_FIELDS: usize = 10;
/// Column holding the `;`-delimited cluster references.
const CLUSTER_REF_COLUMN: usize = 4;
/// Column holding the row's own `;`-delimited taxon names.
const TAXON_COLUMN: usize = 9;

/// Header line written before any data row.
pub const OUTPUT_HEADER: &str = "Cluster ID\tPIDS\tFunc\tTax";

#[derive(Debug, Args)]
pub struct ExpandCommand {
    /// Persisted cluster index produced by `build-index`
    #[arg(long)]
    pub index: PathBuf,

    /// Gzip-compressed annotation table; the first line is a header
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output path for the gzip-compressed expanded table
    #[arg(short, long)]
    pub output: PathBuf,

    /// Emit at most this many data rows (sampling/debug runs)
    #[arg(long)]
    pub truncate: Option<u64>,

    /// Load at most this many index records (debug runs)
    #[arg(long)]
    pub index_truncate: Option<u64>,
}

/// Run the expansion stage.
///
/// Loads the whole cluster index into memory, then streams the
/// annotation table one row at a time, writing each expanded row
/// before the next is read. The index is read-only from here on.
pub fn run(cmd: ExpandCommand) -> Result<()> {
    info!("loading cluster index from {}", cmd.index.display());
    let index_reader = stream::open_reader(&cmd.index)?;
    let index = codec::read_index(index_reader, cmd.index_truncate)
        .with_context(|| format!("failed to load index {}", cmd.index.display()))?;
    info!("cluster index resident: {} records", index.len());

    let reader = stream::open_progress_reader(&cmd.input)?;
    let mut writer = stream::create_writer(&cmd.output)?;
    expand_rows(&index, reader, &mut writer, cmd.truncate)
        .with_context(|| format!("failed to expand {}", cmd.input.display()))?;
    writer
        .finish()
        .context("failed to finalize expanded table")?;
    info!("wrote expanded table to {}", cmd.output.display());

    Ok(())
}

/// Stream annotation rows from `reader`, expand each against `index`,
/// and write the expanded table to `writer`.
///
/// The first input line is the table's own header and is skipped. The
/// output header is written unconditionally, even when the input has
/// no data rows. `truncate` caps the number of data rows emitted;
/// rows that are emitted are identical to an untruncated run's.
pub fn expand_rows<R: BufRead, W: Write>(
    index: &ClusterIndex,
    reader: R,
    mut writer: W,
    truncate: Option<u64>,
) -> Result<()> {
    writeln!(writer, "{OUTPUT_HEADER}")?;

    let mut lines = reader.lines();
    if lines.next().transpose()?.is_none() {
        // Empty input: header only.
        return Ok(());
    }

    let mut rows_written: u64 = 0;
    let mut unresolved: u64 = 0;

    for line in lines {
        if truncate.is_some_and(|cap| rows_written >= cap) {
            debug!("expansion truncated after {rows_written} rows");
            break;
        }
        let line = line?;
        let expanded = expand_row(index, &line, rows_written + 1, &mut unresolved)?;
        writer.write_all(expanded.as_bytes())?;
        writer.write_all(b"\n")?;
        rows_written += 1;
    }

    info!("expanded {rows_written} rows, {unresolved} unresolved cluster references");
    Ok(())
}

/// Expand one data row.
///
/// The row's own taxon names are always included, even when none of
/// its cluster references resolve. A reference absent from the index
/// is an expected condition: it is skipped and counted in
/// `unresolved`, never an error. `line_no` is the 1-based data-row
/// number used in malformed-row diagnostics.
fn expand_row(
    index: &ClusterIndex,
    line: &str,
    line_no: u64,
    unresolved: &mut u64,
) -> std::result::Result<String, Error> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < ANNOTATION_FIELDS {
        return Err(Error::MalformedRow {
            line: line_no,
            expected: ANNOTATION_FIELDS,
            found: fields.len(),
        });
    }

    let own_taxa = split_list(fields[TAXON_COLUMN]);
    let references = split_list(fields[CLUSTER_REF_COLUMN]);

    let mut pids: HashSet<&str> = HashSet::new();
    let mut functions: HashSet<&str> = HashSet::new();
    let mut taxa: HashSet<&str> = own_taxa.iter().map(String::as_str).collect();

    for reference in &references {
        match index.get(reference.as_str()) {
            Some(record) => {
                pids.extend(record.pids.iter().map(String::as_str));
                taxa.extend(record.taxa.iter().map(String::as_str));
                functions.extend(record.functions.iter().map(String::as_str));
            }
            None => *unresolved += 1,
        }
    }

    Ok(format!(
        "{}\t{}\t{}\t{}",
        fields[0],
        join_sorted(pids, ";"),
        join_sorted(functions, "@"),
        join_sorted(taxa, ";"),
    ))
}

/// Strip spaces from a delimited field and split it on `;`.
fn split_list(field: &str) -> Vec<String> {
    field
        .replace(' ', "")
        .split(';')
        .map(str::to_string)
        .collect()
}

/// Sort the accumulated set and join it with `sep`.
///
/// The accumulator is an unordered set, so this sort is what makes two
/// runs over the same input byte-for-byte identical.
fn join_sorted(values: HashSet<&str>, sep: &str) -> String {
    let mut values: Vec<&str> = values.into_iter().collect();
    values.sort_unstable();
    values.join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ClusterRecord;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample_index() -> ClusterIndex {
        let mut index = ClusterIndex::new();
        index.insert(
            "A".to_string(),
            ClusterRecord {
                pids: strings(&["p1"]),
                taxa: strings(&["t1"]),
                functions: strings(&["f1"]),
            },
        );
        index.insert(
            "B".to_string(),
            ClusterRecord {
                pids: strings(&["p2"]),
                taxa: strings(&["t2"]),
                functions: strings(&["f1"]),
            },
        );
        index
    }

    /// Build a 10-column annotation row with the given id, cluster
    /// reference field, and taxon field.
    fn row(id: &str, refs: &str, taxa: &str) -> String {
        let mut fields = vec!["x"; ANNOTATION_FIELDS];
        fields[0] = id;
        fields[CLUSTER_REF_COLUMN] = refs;
        fields[TAXON_COLUMN] = taxa;
        fields.join("\t")
    }

    fn table(rows: &[String]) -> String {
        let mut text = String::from("header line\n");
        for r in rows {
            text.push_str(r);
            text.push('\n');
        }
        text
    }

    #[test]
    fn unions_across_referenced_clusters() {
        let index = sample_index();
        let mut unresolved = 0;
        let line = expand_row(&index, &row("r1", "A;B", "t3"), 1, &mut unresolved).unwrap();
        assert_eq!(line, "r1\tp1;p2\tf1\tt1;t2;t3");
        assert_eq!(unresolved, 0);
    }

    #[test]
    fn unresolved_references_keep_own_taxa() {
        let index = sample_index();
        let mut unresolved = 0;
        let line = expand_row(&index, &row("r1", "X;Y", "t9;t0;t9"), 1, &mut unresolved).unwrap();
        assert_eq!(line, "r1\t\t\tt0;t9");
        assert_eq!(unresolved, 2);
    }

    #[test]
    fn strips_spaces_before_splitting() {
        let index = sample_index();
        let mut unresolved = 0;
        let line = expand_row(&index, &row("r1", "A; B", "t3; t4"), 1, &mut unresolved).unwrap();
        assert_eq!(line, "r1\tp1;p2\tf1\tt1;t2;t3;t4");
    }

    #[test]
    fn short_row_aborts_the_run() {
        let index = sample_index();
        let mut unresolved = 0;
        let err = expand_row(&index, "a\tb\tc", 3, &mut unresolved).unwrap_err();
        match err {
            Error::MalformedRow { line, found, .. } => {
                assert_eq!(line, 3);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn output_is_deterministic_across_runs() {
        let index = sample_index();
        let input = table(&[row("r1", "A;B", "t3"), row("r2", "B", "t4")]);

        let mut first = Vec::new();
        expand_rows(&index, input.as_bytes(), &mut first, None).unwrap();
        let mut second = Vec::new();
        expand_rows(&index, input.as_bytes(), &mut second, None).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn header_is_written_for_empty_input() {
        let index = ClusterIndex::new();

        // No lines at all.
        let mut out = Vec::new();
        expand_rows(&index, &b""[..], &mut out, None).unwrap();
        assert_eq!(out, b"Cluster ID\tPIDS\tFunc\tTax\n");

        // Header line only, no data rows.
        let mut out = Vec::new();
        expand_rows(&index, &b"header line\n"[..], &mut out, None).unwrap();
        assert_eq!(out, b"Cluster ID\tPIDS\tFunc\tTax\n");
    }

    #[test]
    fn truncation_emits_exactly_n_rows() {
        let index = sample_index();
        let rows = [
            row("r1", "A", "t3"),
            row("r2", "B", "t4"),
            row("r3", "A;B", "t5"),
        ];
        let input = table(&rows);

        let mut full = Vec::new();
        expand_rows(&index, input.as_bytes(), &mut full, None).unwrap();
        let mut capped = Vec::new();
        expand_rows(&index, input.as_bytes(), &mut capped, Some(2)).unwrap();

        let full_lines: Vec<&str> = std::str::from_utf8(&full).unwrap().lines().collect();
        let capped_lines: Vec<&str> = std::str::from_utf8(&capped).unwrap().lines().collect();
        assert_eq!(capped_lines.len(), 3); // header + 2 data rows
        assert_eq!(capped_lines[..], full_lines[..3]);
    }
}
