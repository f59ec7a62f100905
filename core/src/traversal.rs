use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{Graph, Latency, NodeId};

/// Outcome of a bounded walk enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WalkCount {
    /// Walks that ended on the target and satisfied the bound.
    pub matches: u64,
    /// Walk frames expanded.
    pub steps: u64,
    /// True if the step limit stopped the enumeration early. `matches` is
    /// then a lower bound.
    pub truncated: bool,
}

/// How a walk enumeration bounds its walks and decides what counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkBound {
    /// Count every arrival at the target with 1..=n hops.
    MaxHops(u32),
    /// Count only arrivals at the target with exactly n hops.
    FixedHops(u32),
    /// Count every arrival at the target while accumulated latency stays below n.
    MaxLatency(Latency),
}

impl WalkBound {
    /// Whether a walk in this state may still be counted or extended.
    fn admits(self, hops: u32, latency: Latency) -> bool {
        match self {
            WalkBound::MaxHops(max) | WalkBound::FixedHops(max) => hops <= max,
            WalkBound::MaxLatency(max) => latency < max,
        }
    }

    fn counts(self, hops: u32) -> bool {
        match self {
            WalkBound::FixedHops(fixed) => hops == fixed,
            WalkBound::MaxHops(_) | WalkBound::MaxLatency(_) => true,
        }
    }
}

/// Priority-queue entry of the shortest-trace search.
///
/// Ordered so that `BinaryHeap` pops the lowest accumulated latency first.
/// Ties break on node ID to keep pop order deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceNode {
    pub node: NodeId,
    pub latency: Latency,
    /// Whether reaching the target in this state completes a trace. Always
    /// true between distinct endpoints; a cycle search only accepts once the
    /// trace has crossed a positive-latency edge.
    pub accepting: bool,
}

impl TraceNode {
    fn state(&self) -> (NodeId, bool) {
        (self.node, self.accepting)
    }
}

impl Ord for TraceNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .latency
            .cmp(&self.latency)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.accepting.cmp(&self.accepting))
    }
}

impl PartialOrd for TraceNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Minimum-latency trace between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestTrace {
    pub latency: Latency,
    /// Nodes from start to end inclusive. For a cycle, start appears at both ends.
    pub path: Vec<NodeId>,
}

/// Total latency along consecutive edges of `trace`.
///
/// Returns None if the trace has fewer than two nodes or any consecutive
/// pair has no edge. Sums saturate rather than wrap.
pub fn trace_latency(graph: &Graph, trace: &[NodeId]) -> Option<Latency> {
    if trace.len() < 2 {
        return None;
    }
    trace.windows(2).try_fold(0 as Latency, |total, pair| {
        graph
            .latency(pair[0], pair[1])
            .map(|l| total.saturating_add(l))
    })
}

/// Count walks from `start` to `end` under `bound`.
///
/// Walks may revisit nodes and edges. A walk that reaches `end` is counted and
/// then keeps extending, so one branch can match several times. Start itself
/// only counts after at least one hop.
///
/// The number of frames grows as `d^h` for out-degree `d` and bound `h` on
/// cyclic graphs, and a zero-latency cycle under `MaxLatency` never stops on
/// its own. `step_limit` caps the frames expanded; when it is hit the
/// enumeration stops and the result is marked truncated.
pub fn count_walks(
    graph: &Graph,
    start: NodeId,
    end: NodeId,
    bound: WalkBound,
    step_limit: Option<u64>,
) -> WalkCount {
    let mut result = WalkCount::default();
    // (node, hops, accumulated latency)
    let mut stack: Vec<(NodeId, u32, Latency)> = vec![(start, 0, 0)];

    while let Some((current, hops, latency)) = stack.pop() {
        if !bound.admits(hops, latency) {
            continue;
        }
        if step_limit.is_some_and(|limit| result.steps >= limit) {
            result.truncated = true;
            break;
        }
        result.steps += 1;

        if current == end && hops > 0 && bound.counts(hops) {
            result.matches += 1;
        }

        let Some(next_hops) = hops.checked_add(1) else {
            continue;
        };
        for edge in graph.neighbors_out(current) {
            stack.push((edge.target, next_hops, latency.saturating_add(edge.latency)));
        }
    }

    result
}

/// Minimum-latency trace from `start` to `end` (Dijkstra over non-negative latencies).
///
/// Both endpoints must have outgoing edges, otherwise None. When
/// `start == end` the search looks for the cheapest cycle with positive
/// latency: the frontier is seeded with the direct neighbors of `start`
/// instead of `start` at latency zero, and a pop of `start` only counts once
/// the cycle has crossed a positive-latency edge. Search states are
/// `(node, accepting)` pairs, so a zero-latency loop back to `start` never
/// shadows a costlier cycle through the same nodes. Returns None when the
/// frontier empties without reaching `end`.
pub fn shortest_trace(graph: &Graph, start: NodeId, end: NodeId) -> Option<ShortestTrace> {
    if !graph.is_source(start) || !graph.is_source(end) {
        return None;
    }

    // best known latency and predecessor per search state; absent = unreached
    let mut best: HashMap<(NodeId, bool), Latency> = HashMap::new();
    let mut parent: HashMap<(NodeId, bool), (NodeId, bool)> = HashMap::new();
    let mut frontier: BinaryHeap<TraceNode> = BinaryHeap::new();

    if start == end {
        // returning here at zero latency is the same as not having left
        best.insert((start, false), 0);
        for edge in graph.neighbors_out(start) {
            let seed = TraceNode {
                node: edge.target,
                latency: edge.latency,
                accepting: edge.latency > 0,
            };
            if best.get(&seed.state()).is_some_and(|&b| b <= seed.latency) {
                continue;
            }
            best.insert(seed.state(), seed.latency);
            parent.insert(seed.state(), (start, false));
            frontier.push(seed);
        }
    } else {
        best.insert((start, true), 0);
        frontier.push(TraceNode {
            node: start,
            latency: 0,
            accepting: true,
        });
    }

    while let Some(current) = frontier.pop() {
        if best.get(&current.state()).is_some_and(|&b| current.latency > b) {
            continue;
        }
        if current.node == end && current.accepting {
            return Some(ShortestTrace {
                latency: current.latency,
                path: reconstruct_trace(&parent, start, current.state()),
            });
        }

        for edge in graph.neighbors_out(current.node) {
            let next = TraceNode {
                node: edge.target,
                latency: current.latency.saturating_add(edge.latency),
                accepting: current.accepting || edge.latency > 0,
            };
            let improves = best.get(&next.state()).map_or(true, |&b| next.latency < b);
            if improves {
                best.insert(next.state(), next.latency);
                parent.insert(next.state(), current.state());
                frontier.push(next);
            }
        }
    }

    None
}

/// Walk parent pointers from the `end` state back to `start`. Takes at least
/// one step, so a cycle path begins and ends on `start`.
fn reconstruct_trace(
    parent: &HashMap<(NodeId, bool), (NodeId, bool)>,
    start: NodeId,
    end: (NodeId, bool),
) -> Vec<NodeId> {
    let mut path = vec![end.0];
    let mut current = end;

    while let Some(&prev) = parent.get(&current) {
        path.push(prev.0);
        if prev.0 == start {
            break;
        }
        current = prev;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, Graph};

    fn sample() -> Graph {
        let mut g = Graph::new();
        g.load_edges(
            [
                ("A", "B", 5),
                ("B", "C", 4),
                ("C", "D", 8),
                ("D", "C", 8),
                ("D", "E", 6),
                ("A", "D", 5),
                ("C", "E", 2),
                ("E", "B", 3),
                ("A", "E", 7),
            ]
            .into_iter()
            .map(|(f, t, l)| EdgeRecord::new(f, t, l)),
        );
        g
    }

    fn id(g: &Graph, name: &str) -> NodeId {
        g.resolve(name).unwrap()
    }

    fn ids(g: &Graph, names: &[&str]) -> Vec<NodeId> {
        names.iter().map(|n| id(g, n)).collect()
    }

    fn names(g: &Graph, path: &[NodeId]) -> Vec<String> {
        path.iter().map(|&n| g.name(n).unwrap().to_string()).collect()
    }

    fn make_cycle(n: u32, latency: Latency) -> Graph {
        let mut g = Graph::new();
        for i in 0..n {
            g.add_edge(&format!("n{i}"), &format!("n{}", (i + 1) % n), latency);
        }
        g
    }

    // --- Trace latency ---

    #[test]
    fn test_trace_latency_sample() {
        let g = sample();
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "B", "C"])), Some(9));
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "D"])), Some(5));
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "D", "C"])), Some(13));
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "E", "B", "C", "D"])), Some(22));
    }

    #[test]
    fn test_trace_latency_missing_edge() {
        let g = sample();
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "E", "D"])), None);
    }

    #[test]
    fn test_trace_latency_too_short() {
        let g = sample();
        assert_eq!(trace_latency(&g, &[]), None);
        assert_eq!(trace_latency(&g, &ids(&g, &["A"])), None);
    }

    #[test]
    fn test_trace_latency_self_loop() {
        let mut g = Graph::new();
        g.add_edge("A", "A", 4);
        assert_eq!(trace_latency(&g, &ids(&g, &["A", "A", "A"])), Some(8));
    }

    #[test]
    fn test_trace_latency_saturates() {
        let mut g = Graph::new();
        g.add_edge("A", "B", Latency::MAX);
        g.add_edge("B", "A", 1);
        assert_eq!(
            trace_latency(&g, &ids(&g, &["A", "B", "A"])),
            Some(Latency::MAX)
        );
    }

    // --- Walk counting ---

    #[test]
    fn test_max_hops_sample() {
        let g = sample();
        let c = id(&g, "C");
        let result = count_walks(&g, c, c, WalkBound::MaxHops(3), None);
        assert_eq!(result.matches, 2);
        assert!(!result.truncated);
    }

    #[test]
    fn test_fixed_hops_sample() {
        let g = sample();
        let result = count_walks(&g, id(&g, "A"), id(&g, "C"), WalkBound::FixedHops(4), None);
        assert_eq!(result.matches, 3);
    }

    #[test]
    fn test_max_latency_sample() {
        let g = sample();
        let c = id(&g, "C");
        let result = count_walks(&g, c, c, WalkBound::MaxLatency(30), None);
        assert_eq!(result.matches, 7);
    }

    #[test]
    fn test_zero_bounds_count_nothing() {
        let g = sample();
        let c = id(&g, "C");
        assert_eq!(count_walks(&g, c, c, WalkBound::MaxHops(0), None).matches, 0);
        assert_eq!(count_walks(&g, c, c, WalkBound::FixedHops(0), None).matches, 0);
        assert_eq!(count_walks(&g, c, c, WalkBound::MaxLatency(0), None).matches, 0);
        // MaxLatency(0) rejects even the start frame
        assert_eq!(count_walks(&g, c, c, WalkBound::MaxLatency(0), None).steps, 0);
    }

    #[test]
    fn test_walks_from_sink() {
        let mut g = sample();
        g.add_edge("X", "Y", 1);
        let (y, a) = (id(&g, "Y"), id(&g, "A"));
        let result = count_walks(&g, y, a, WalkBound::MaxHops(10), None);
        assert_eq!(result.matches, 0);
        assert_eq!(result.steps, 1);
    }

    #[test]
    fn test_walks_continue_past_target() {
        // A self-loop on the target is counted on every pass.
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "B", 1);
        let (a, b) = (id(&g, "A"), id(&g, "B"));
        assert_eq!(count_walks(&g, a, b, WalkBound::MaxHops(3), None).matches, 3);
        assert_eq!(count_walks(&g, a, b, WalkBound::FixedHops(3), None).matches, 1);
        // latencies 1, 2, 3 are below 4
        assert_eq!(count_walks(&g, a, b, WalkBound::MaxLatency(4), None).matches, 3);
    }

    #[test]
    fn test_cycle_walk_counts() {
        let g = make_cycle(4, 1);
        let n0 = id(&g, "n0");
        assert_eq!(count_walks(&g, n0, n0, WalkBound::MaxHops(3), None).matches, 0);
        assert_eq!(count_walks(&g, n0, n0, WalkBound::MaxHops(4), None).matches, 1);
        assert_eq!(count_walks(&g, n0, n0, WalkBound::MaxHops(12), None).matches, 3);
        assert_eq!(count_walks(&g, n0, n0, WalkBound::FixedHops(8), None).matches, 1);
        assert_eq!(count_walks(&g, n0, n0, WalkBound::MaxLatency(9), None).matches, 2);
    }

    #[test]
    fn test_step_limit_truncates() {
        let g = make_cycle(3, 0);
        let n0 = id(&g, "n0");
        // zero-latency cycle would never terminate without a limit
        let result = count_walks(&g, n0, n0, WalkBound::MaxLatency(1), Some(100));
        assert!(result.truncated);
        assert_eq!(result.steps, 100);
        // hops 3, 6, ..., 99 land back on n0
        assert_eq!(result.matches, 33);
    }

    #[test]
    fn test_step_limit_not_hit() {
        let g = sample();
        let c = id(&g, "C");
        let unlimited = count_walks(&g, c, c, WalkBound::MaxLatency(30), None);
        let limited = count_walks(&g, c, c, WalkBound::MaxLatency(30), Some(unlimited.steps));
        assert!(!limited.truncated);
        assert_eq!(limited, unlimited);
    }

    // --- Shortest trace ---

    #[test]
    fn test_shortest_sample() {
        let g = sample();
        let trace = shortest_trace(&g, id(&g, "A"), id(&g, "C")).unwrap();
        assert_eq!(trace.latency, 9);
        assert_eq!(names(&g, &trace.path), ["A", "B", "C"]);
    }

    #[test]
    fn test_shortest_cycle_sample() {
        let g = sample();
        let b = id(&g, "B");
        let trace = shortest_trace(&g, b, b).unwrap();
        assert_eq!(trace.latency, 9);
        assert_eq!(names(&g, &trace.path), ["B", "C", "E", "B"]);
    }

    #[test]
    fn test_shortest_self_loop() {
        let mut g = Graph::new();
        g.add_edge("A", "A", 3);
        g.add_edge("A", "B", 1);
        g.add_edge("B", "A", 1);
        let a = id(&g, "A");
        let trace = shortest_trace(&g, a, a).unwrap();
        assert_eq!(trace.latency, 2);
        assert_eq!(names(&g, &trace.path), ["A", "B", "A"]);

        let mut g = Graph::new();
        g.add_edge("A", "A", 3);
        let a = id(&g, "A");
        let trace = shortest_trace(&g, a, a).unwrap();
        assert_eq!(trace.latency, 3);
        assert_eq!(names(&g, &trace.path), ["A", "A"]);
    }

    #[test]
    fn test_shortest_no_cycle() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 1);
        let a = id(&g, "A");
        assert!(shortest_trace(&g, a, a).is_none());
    }

    #[test]
    fn test_shortest_unreachable() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        g.add_edge("C", "D", 1);
        assert!(shortest_trace(&g, id(&g, "A"), id(&g, "C")).is_none());
    }

    #[test]
    fn test_shortest_requires_source_endpoints() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        // B is reachable but has no outgoing edges
        assert!(shortest_trace(&g, id(&g, "A"), id(&g, "B")).is_none());
        assert!(shortest_trace(&g, id(&g, "B"), id(&g, "A")).is_none());
        assert!(shortest_trace(&g, 999, id(&g, "A")).is_none());
    }

    #[test]
    fn test_shortest_prefers_cheaper_longer_route() {
        let mut g = Graph::new();
        g.add_edge("A", "D", 10);
        g.add_edge("A", "B", 1);
        g.add_edge("B", "C", 1);
        g.add_edge("C", "D", 1);
        g.add_edge("D", "A", 1);
        let trace = shortest_trace(&g, id(&g, "A"), id(&g, "D")).unwrap();
        assert_eq!(trace.latency, 3);
        assert_eq!(names(&g, &trace.path), ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_shortest_zero_latency_cycle() {
        // the only way back costs nothing, which is no trace at all
        let mut g = Graph::new();
        g.add_edge("A", "B", 0);
        g.add_edge("B", "A", 0);
        let a = id(&g, "A");
        assert!(shortest_trace(&g, a, a).is_none());

        // a costlier cycle shares nodes with the free one
        g.add_edge("B", "C", 1);
        g.add_edge("C", "A", 1);
        let trace = shortest_trace(&g, a, a).unwrap();
        assert_eq!(trace.latency, 2);
        assert_eq!(names(&g, &trace.path), ["A", "B", "C", "A"]);
    }

    #[test]
    fn test_shortest_cycle_positive_edge_after_free_return() {
        // B is first reached for free, the positive cycle reaches it later at 1
        let mut g = Graph::new();
        g.add_edge("A", "B", 0);
        g.add_edge("B", "A", 0);
        g.add_edge("A", "X", 1);
        g.add_edge("X", "B", 0);
        let a = id(&g, "A");
        let trace = shortest_trace(&g, a, a).unwrap();
        assert_eq!(trace.latency, 1);
        assert_eq!(names(&g, &trace.path), ["A", "X", "B", "A"]);
        assert_eq!(trace_latency(&g, &trace.path), Some(1));
    }

    #[test]
    fn test_shortest_zero_latency_between_distinct_nodes() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 0);
        g.add_edge("B", "A", 0);
        let trace = shortest_trace(&g, id(&g, "A"), id(&g, "B")).unwrap();
        assert_eq!(trace.latency, 0);
        assert_eq!(names(&g, &trace.path), ["A", "B"]);
    }

    #[test]
    fn test_trace_node_ordering() {
        let mut heap = BinaryHeap::new();
        for (node, latency) in [(1, 7), (2, 3), (3, 5)] {
            heap.push(TraceNode {
                node,
                latency,
                accepting: true,
            });
        }
        let order: Vec<Latency> = std::iter::from_fn(|| heap.pop()).map(|t| t.latency).collect();
        assert_eq!(order, [3, 5, 7]);
    }

    // --- Graph store ---

    #[test]
    fn test_graph_counts() {
        let g = sample();
        assert_eq!(g.node_count(), 5);
        assert_eq!(g.edge_count(), 9);
        assert!(g.memory_usage() > 0);
    }

    #[test]
    fn test_duplicate_edge_last_write_wins() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 5);
        g.add_edge("A", "C", 1);
        g.add_edge("A", "B", 2);
        assert_eq!(g.edge_count(), 2);
        let edges: Vec<(&str, Latency)> = g.edges_from("A").collect();
        assert_eq!(edges, [("B", 2), ("C", 1)]);
    }

    #[test]
    fn test_has_node_sources_only() {
        let mut g = Graph::new();
        g.add_edge("A", "B", 1);
        assert!(g.has_node("A"));
        assert!(!g.has_node("B"));
        assert!(!g.has_node("Z"));
        assert!(g.resolve("B").is_some());
        assert_eq!(g.edges_from("B").count(), 0);
        assert_eq!(g.edges_from("Z").count(), 0);
    }

    #[test]
    fn test_name_roundtrip() {
        let g = sample();
        for (node, name) in g.nodes_iter() {
            assert_eq!(g.resolve(name), Some(node));
        }
        assert_eq!(g.name(999), None);
    }
}
