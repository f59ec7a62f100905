use std::collections::HashMap;

/// Interned node identifier. Assigned in order of first appearance.
pub type NodeId = u32;

/// Call latency carried by an edge. Unsigned, so negative weights cannot occur.
pub type Latency = u64;

/// A directed edge in the adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub target: NodeId,
    pub latency: Latency,
}

/// Owned edge as produced by the edge-list parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub latency: Latency,
}

impl EdgeRecord {
    pub fn new(from: impl Into<String>, to: impl Into<String>, latency: Latency) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            latency,
        }
    }
}

/// In-memory latency graph: outgoing adjacency lists + node name interning.
///
/// Each source keeps at most one edge per target. Re-adding an existing
/// (from, to) pair overwrites its latency in place, so neighbor order stays
/// the order in which each pair was first inserted.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    outgoing: HashMap<NodeId, Vec<Edge>>,
    names: Vec<String>,
    name_index: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(node_count),
            names: Vec::with_capacity(node_count),
            name_index: HashMap::with_capacity(node_count),
        }
    }

    /// Intern a node name, returning its compact ID.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.name_index.get(name) {
            return id;
        }
        let id = self.names.len() as NodeId;
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), id);
        id
    }

    /// Look up the ID of a node name seen as either endpoint of an edge.
    pub fn resolve(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    /// Resolve a NodeId back to its name. Returns None for unknown IDs.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(id as usize).map(|s| s.as_str())
    }

    /// Add a directed edge by name, overwriting any existing latency for the pair.
    pub fn add_edge(&mut self, from: &str, to: &str, latency: Latency) {
        let from = self.intern(from);
        let to = self.intern(to);
        self.add_edge_ids(from, to, latency);
    }

    /// Add a directed edge between already-interned nodes.
    pub fn add_edge_ids(&mut self, from: NodeId, to: NodeId, latency: Latency) {
        let edges = self.outgoing.entry(from).or_default();
        match edges.iter_mut().find(|e| e.target == to) {
            Some(existing) => existing.latency = latency,
            None => edges.push(Edge { target: to, latency }),
        }
    }

    /// Bulk load parsed records in order.
    pub fn load_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        for record in edges {
            self.add_edge(&record.from, &record.to, record.latency);
        }
    }

    /// True iff the node has at least one outgoing edge.
    pub fn has_node(&self, name: &str) -> bool {
        self.resolve(name).is_some_and(|id| self.is_source(id))
    }

    pub fn is_source(&self, id: NodeId) -> bool {
        self.outgoing.get(&id).is_some_and(|v| !v.is_empty())
    }

    /// Outgoing edges of a node; empty when it has none.
    pub fn neighbors_out(&self, id: NodeId) -> &[Edge] {
        self.outgoing.get(&id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Outgoing (neighbor name, latency) pairs of a node by name.
    pub fn edges_from<'a>(&'a self, name: &str) -> impl Iterator<Item = (&'a str, Latency)> + 'a {
        let edges = self
            .resolve(name)
            .map(|id| self.neighbors_out(id))
            .unwrap_or(&[]);
        edges
            .iter()
            .filter_map(move |e| self.name(e.target).map(|n| (n, e.latency)))
    }

    /// Latency of the direct edge `from -> to`, if present.
    pub fn latency(&self, from: NodeId, to: NodeId) -> Option<Latency> {
        self.neighbors_out(from)
            .iter()
            .find(|e| e.target == to)
            .map(|e| e.latency)
    }

    /// Iterate all interned nodes with their names.
    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (i as NodeId, n.as_str()))
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(|v| v.len()).sum()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let names_mem: usize = self
            .names
            .iter()
            .map(|n| 2 * (n.len() + size_of::<String>()) + size_of::<NodeId>() + 16)
            .sum();
        let edges_mem: usize = self
            .outgoing
            .values()
            .map(|v| v.capacity() * size_of::<Edge>() + size_of::<Vec<Edge>>() + size_of::<NodeId>())
            .sum();

        names_mem + edges_mem
    }
}
