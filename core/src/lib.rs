//! latency-trace-core: In-memory service latency graph and query engine.
//!
//! A pure Rust library that holds a directed graph of service calls weighted
//! by latency, and answers trace queries against it: total latency along a
//! trace, bounded walk counts (by hops or by latency), and the shortest trace
//! between two services, including the cheapest cycle back to a service.
//!
//! Graphs are built once (usually by [`load_graph`] from an edge-list file)
//! and are read-only afterwards; [`TracingEngine`] borrows one and can be
//! shared freely.

mod engine;
mod error;
mod graph;
mod load;
mod traversal;

pub use engine::{to_sentinel, TracingEngine, NO_SUCH_TRACE};
pub use error::{LoadError, Result};
pub use graph::{Edge, EdgeRecord, Graph, Latency, NodeId};
pub use load::{load_graph, parse_edge_list};
pub use traversal::{
    count_walks, shortest_trace, trace_latency, ShortestTrace, TraceNode, WalkBound, WalkCount,
};
