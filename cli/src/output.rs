use std::io::{self, Write};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Printed in place of a latency when no valid trace exists.
pub const NO_SUCH_TRACE: &str = "NO SUCH TRACE";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `description: value` lines
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

/// One answered query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    pub query: String,
    /// Latency or walk count; `None` when no valid trace exists.
    pub result: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    /// Walk enumeration stopped at the step limit; `result` is a lower bound.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

impl QueryResult {
    pub fn new(query: impl Into<String>, result: Option<u64>) -> Self {
        Self {
            query: query.into(),
            result,
            path: None,
            truncated: false,
        }
    }

    pub fn with_path(mut self, path: Option<Vec<String>>) -> Self {
        self.path = path;
        self
    }

    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    fn human(&self) -> String {
        let mut line = match self.result {
            Some(value) => format!("{}: {}", self.query, value),
            None => format!("{}: {}", self.query, NO_SUCH_TRACE),
        };
        if let Some(path) = &self.path {
            line.push_str(&format!(" ({})", path.join(" -> ")));
        }
        if self.truncated {
            line.push_str(" [truncated at step limit]");
        }
        line
    }
}

/// Summary of the loaded graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub source: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub source_nodes: usize,
    pub memory_bytes: usize,
    pub load_time_ms: f64,
}

impl GraphStats {
    fn human(&self) -> String {
        format!(
            "source: {}\nnodes: {}\nedges: {}\nsource nodes: {}\nmemory: ~{} bytes\nload time: {:.2}ms",
            self.source,
            self.node_count,
            self.edge_count,
            self.source_nodes,
            self.memory_bytes,
            self.load_time_ms
        )
    }
}

pub fn render_results(results: &[QueryResult], format: OutputFormat) -> serde_json::Result<String> {
    let lines = match format {
        OutputFormat::Human => results.iter().map(QueryResult::human).collect::<Vec<_>>(),
        OutputFormat::Json => results
            .iter()
            .map(serde_json::to_string)
            .collect::<serde_json::Result<Vec<_>>>()?,
    };
    Ok(lines.join("\n"))
}

pub fn render_stats(stats: &GraphStats, format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Human => Ok(stats.human()),
        OutputFormat::Json => serde_json::to_string(stats),
    }
}

/// Write rendered output to stdout with a trailing newline.
pub fn emit(rendered: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{}", rendered)?;
    out.flush()
}
