//! Simple undirected graph over dense vertex ids.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use linkage_core::errors::GraphError;

/// Undirected graph backed by a petgraph `UnGraph`, with vertex `i`
/// stored at node index `i`. No parallel edges, no self loops.
#[derive(Debug, Clone, Default)]
pub struct UndirectedGraph {
    graph: UnGraph<(), ()>,
}

impl UndirectedGraph {
    pub fn new(vertices: usize) -> Self {
        let mut graph = UnGraph::with_capacity(vertices, 0);
        for _ in 0..vertices {
            graph.add_node(());
        }
        Self { graph }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Insert the edge `{a, b}`. Returns `false` if it already existed.
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<bool, GraphError> {
        let vertices = self.vertex_count();
        for vertex in [a, b] {
            if vertex >= vertices {
                return Err(GraphError::VertexOutOfRange { vertex, vertices });
            }
        }
        if a == b {
            return Err(GraphError::SelfLoop { vertex: a });
        }
        let (a, b) = (NodeIndex::new(a), NodeIndex::new(b));
        if self.graph.find_edge(a, b).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(a, b, ());
        Ok(true)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        let vertices = self.vertex_count();
        a < vertices
            && b < vertices
            && self
                .graph
                .contains_edge(NodeIndex::new(a), NodeIndex::new(b))
    }

    pub fn degree(&self, v: usize) -> usize {
        self.neighbors(v).count()
    }

    /// Neighbors of `v`, in no particular order.
    pub fn neighbors(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        (v < self.vertex_count())
            .then(|| self.graph.neighbors(NodeIndex::new(v)))
            .into_iter()
            .flatten()
            .map(|n| n.index())
    }

    /// Every edge once, as `(a, b)` in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }
}
