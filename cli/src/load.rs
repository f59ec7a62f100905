use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use latency_trace_core::Graph;

use crate::output::GraphStats;

/// A loaded graph and where it came from.
pub struct GraphState {
    pub graph: Graph,
    pub source: PathBuf,
    pub load_time_ms: f64,
}

impl GraphState {
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            source: self.source.display().to_string(),
            node_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            source_nodes: self
                .graph
                .nodes_iter()
                .filter(|&(id, _)| self.graph.is_source(id))
                .count(),
            memory_bytes: self.graph.memory_usage(),
            load_time_ms: self.load_time_ms,
        }
    }
}

/// Load the edge-list file at `path`. Nothing is returned unless every record parsed.
pub fn load(path: &Path) -> anyhow::Result<GraphState> {
    let start = Instant::now();

    let graph = latency_trace_core::load_graph(path)
        .with_context(|| format!("could not load graph from {}", path.display()))?;

    let load_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        load_time_ms,
        "graph loaded"
    );

    Ok(GraphState {
        graph,
        source: path.to_path_buf(),
        load_time_ms,
    })
}
