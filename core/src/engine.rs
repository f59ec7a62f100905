//! Name-based query surface over a loaded [`Graph`].
//!
//! The `find_*` methods keep the integer conventions of the tracing service
//! they replace: latencies come back as `i64` with [`NO_SUCH_TRACE`] (−1) when
//! no valid trace exists, and walk counts come back as plain counts. The
//! `Option`-returning methods are the same queries without the sentinel.

use crate::graph::{Graph, Latency, NodeId};
use crate::traversal::{self, ShortestTrace, WalkBound, WalkCount};

/// Sentinel returned by the latency queries when no valid trace exists.
pub const NO_SUCH_TRACE: i64 = -1;

/// Convert an optional latency to the public integer form.
pub fn to_sentinel(latency: Option<Latency>) -> i64 {
    match latency {
        Some(l) => i64::try_from(l).unwrap_or(i64::MAX),
        None => NO_SUCH_TRACE,
    }
}

/// Stateless query engine borrowing an immutable graph.
///
/// Every query is a pure function of the graph and its arguments, so one
/// engine (or many) can serve any number of queries, from any thread.
#[derive(Debug, Clone, Copy)]
pub struct TracingEngine<'g> {
    graph: &'g Graph,
    step_limit: Option<u64>,
}

impl<'g> TracingEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            step_limit: None,
        }
    }

    /// Cap the walk frames a single counting query may expand. `None` removes the cap.
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn step_limit(&self) -> Option<u64> {
        self.step_limit
    }

    /// Total latency along `trace` (a sum, despite the name), or −1.
    pub fn find_average_latency<S: AsRef<str>>(&self, trace: &[S]) -> i64 {
        to_sentinel(self.trace_latency(trace))
    }

    /// Total latency along `trace`; None for unknown nodes, missing edges, or
    /// fewer than two nodes.
    pub fn trace_latency<S: AsRef<str>>(&self, trace: &[S]) -> Option<Latency> {
        let ids = trace
            .iter()
            .map(|name| self.graph.resolve(name.as_ref()))
            .collect::<Option<Vec<NodeId>>>()?;
        traversal::trace_latency(self.graph, &ids)
    }

    /// Walks from `start` to `end` with 1..=`max_hops` hops.
    pub fn find_trace_path_by_maximum_hops(&self, start: &str, end: &str, max_hops: u32) -> u64 {
        self.walks(start, end, WalkBound::MaxHops(max_hops)).matches
    }

    /// Walks from `start` to `end` with exactly `fixed_hops` hops.
    pub fn find_trace_path_by_fixed_hops(&self, start: &str, end: &str, fixed_hops: u32) -> u64 {
        self.walks(start, end, WalkBound::FixedHops(fixed_hops)).matches
    }

    /// Walks from `start` to `end` whose accumulated latency stays below
    /// `max_latency`. Every pass through `end` along a walk counts.
    pub fn find_trace_path_by_max_latency(
        &self,
        start: &str,
        end: &str,
        max_latency: Latency,
    ) -> u64 {
        self.walks(start, end, WalkBound::MaxLatency(max_latency)).matches
    }

    /// Minimum trace latency from `start` to `end`, or −1. With
    /// `start == end` this is the cheapest cycle through `start`.
    pub fn find_shortest_trace(&self, start: &str, end: &str) -> i64 {
        to_sentinel(self.shortest_trace(start, end).map(|t| t.latency))
    }

    /// Minimum-latency trace with its path.
    pub fn shortest_trace(&self, start: &str, end: &str) -> Option<ShortestTrace> {
        let start = self.graph.resolve(start)?;
        let end = self.graph.resolve(end)?;
        traversal::shortest_trace(self.graph, start, end)
    }

    /// Names along a node path. Unknown IDs are skipped.
    pub fn path_names(&self, path: &[NodeId]) -> Vec<&'g str> {
        path.iter().filter_map(|&id| self.graph.name(id)).collect()
    }

    /// Full walk-count result for `bound`, including step accounting.
    ///
    /// Unknown node names yield zero matches. Logs a warning when the step
    /// limit truncated the enumeration.
    pub fn walks(&self, start: &str, end: &str, bound: WalkBound) -> WalkCount {
        let (Some(start_id), Some(end_id)) = (self.graph.resolve(start), self.graph.resolve(end))
        else {
            return WalkCount::default();
        };

        let result = traversal::count_walks(self.graph, start_id, end_id, bound, self.step_limit);
        if result.truncated {
            tracing::warn!(
                start,
                end,
                ?bound,
                steps = result.steps,
                matches = result.matches,
                "walk enumeration hit the step limit; count is a lower bound"
            );
        } else {
            tracing::trace!(
                start,
                end,
                ?bound,
                steps = result.steps,
                matches = result.matches,
                "walks counted"
            );
        }
        result
    }
}
