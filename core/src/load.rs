//! Edge-list loader.
//!
//! The text format is a list of records separated by commas (canonically
//! `", "`), optionally spread over several lines. A record is two one-character
//! node names followed by a decimal latency: `AB5` is the edge A -> B with
//! latency 5.

use std::fs;
use std::path::Path;

use crate::error::{LoadError, Result};
use crate::graph::{EdgeRecord, Graph, Latency};

/// Parse edge-list text into records, in input order.
///
/// Blank lines and empty tokens (e.g. a trailing comma) are skipped. The first
/// malformed record aborts the parse.
pub fn parse_edge_list(input: &str) -> Result<Vec<EdgeRecord>> {
    let mut records = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        for token in line.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            records.push(parse_record(token, idx + 1)?);
        }
    }
    Ok(records)
}

fn parse_record(record: &str, line: usize) -> Result<EdgeRecord> {
    let mut chars = record.chars();
    let (Some(from), Some(to)) = (chars.next(), chars.next()) else {
        return Err(malformed(record, line));
    };
    let latency = chars.as_str();
    if latency.is_empty() {
        return Err(malformed(record, line));
    }

    let latency = latency.parse::<Latency>().map_err(|source| LoadError::InvalidLatency {
        line,
        record: record.to_string(),
        source,
    })?;

    Ok(EdgeRecord {
        from: from.to_string(),
        to: to.to_string(),
        latency,
    })
}

fn malformed(record: &str, line: usize) -> LoadError {
    LoadError::MalformedRecord {
        line,
        record: record.to_string(),
    }
}

impl Graph {
    /// Build a graph from edge-list text. Later duplicates of a (from, to)
    /// pair overwrite earlier ones.
    pub fn from_edge_list(input: &str) -> Result<Self> {
        let records = parse_edge_list(input)?;
        let mut graph = Graph::with_capacity(records.len());
        let record_count = records.len();
        graph.load_edges(records);

        tracing::debug!(
            records = record_count,
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "parsed edge list"
        );
        Ok(graph)
    }
}

/// Read and parse an edge-list file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<Graph> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = input.len(), "read edge list");
    Graph::from_edge_list(&input)
}
