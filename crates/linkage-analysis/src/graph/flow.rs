//! Undirected flow networks and minimum s-t cuts.

use std::collections::VecDeque;

use linkage_core::constants::FLOW_EPSILON;
use linkage_core::errors::GraphError;

#[derive(Debug, Clone, Copy)]
struct Arc {
    to: usize,
    capacity: f64,
}

/// Capacitated undirected graph.
///
/// Each undirected edge is stored as two paired arcs `2k` and `2k + 1`,
/// both with the full capacity, so `arc ^ 1` is always the reverse arc.
#[derive(Debug, Clone, Default)]
pub struct FlowNetwork {
    arcs: Vec<Arc>,
    outgoing: Vec<Vec<usize>>,
}

impl FlowNetwork {
    pub fn new(vertices: usize) -> Self {
        Self {
            arcs: Vec::new(),
            outgoing: vec![Vec::new(); vertices],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arcs.len() / 2
    }

    /// Add an undirected edge. Parallel edges add up.
    pub fn add_edge(&mut self, u: usize, v: usize, capacity: f64) -> Result<(), GraphError> {
        let vertices = self.vertex_count();
        for vertex in [u, v] {
            if vertex >= vertices {
                return Err(GraphError::VertexOutOfRange { vertex, vertices });
            }
        }
        if u == v {
            return Err(GraphError::SelfLoop { vertex: u });
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(GraphError::InvalidCapacity {
                from: u,
                to: v,
                capacity,
            });
        }
        let forward = self.arcs.len();
        self.arcs.push(Arc { to: v, capacity });
        self.arcs.push(Arc { to: u, capacity });
        self.outgoing[u].push(forward);
        self.outgoing[v].push(forward + 1);
        Ok(())
    }

    fn check_terminals(&self, source: usize, sink: usize) -> Result<(), GraphError> {
        let vertices = self.vertex_count();
        for vertex in [source, sink] {
            if vertex >= vertices {
                return Err(GraphError::VertexOutOfRange { vertex, vertices });
            }
        }
        if source == sink {
            return Err(GraphError::DegenerateCut { vertex: source });
        }
        Ok(())
    }
}

/// A minimum s-t cut: its capacity and the vertices on the source side.
#[derive(Debug, Clone, PartialEq)]
pub struct MinCut {
    pub value: f64,
    pub source_side: Vec<bool>,
}

/// Anything that can compute a minimum s-t cut of a [`FlowNetwork`].
pub trait MinCutSolver: Send + Sync {
    fn min_cut(
        &self,
        network: &FlowNetwork,
        source: usize,
        sink: usize,
    ) -> Result<MinCut, GraphError>;
}

/// Shortest augmenting paths by BFS. O(V E^2).
#[derive(Debug, Clone, Copy, Default)]
pub struct EdmondsKarp;

impl MinCutSolver for EdmondsKarp {
    fn min_cut(
        &self,
        network: &FlowNetwork,
        source: usize,
        sink: usize,
    ) -> Result<MinCut, GraphError> {
        network.check_terminals(source, sink)?;
        let n = network.vertex_count();
        let arcs = &network.arcs;
        let mut flow = vec![0.0f64; arcs.len()];
        let residual = |flow: &[f64], e: usize| arcs[e].capacity - flow[e];

        let mut value = 0.0;
        let mut via = vec![usize::MAX; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        loop {
            visited.iter_mut().for_each(|v| *v = false);
            visited[source] = true;
            queue.clear();
            queue.push_back(source);
            while let Some(u) = queue.pop_front() {
                if u == sink {
                    break;
                }
                for &e in &network.outgoing[u] {
                    let to = arcs[e].to;
                    if !visited[to] && residual(&flow, e) > FLOW_EPSILON {
                        visited[to] = true;
                        via[to] = e;
                        queue.push_back(to);
                    }
                }
            }
            if !visited[sink] {
                break;
            }

            let mut bottleneck = f64::INFINITY;
            let mut v = sink;
            while v != source {
                let e = via[v];
                bottleneck = bottleneck.min(residual(&flow, e));
                v = arcs[e ^ 1].to;
            }
            let mut v = sink;
            while v != source {
                let e = via[v];
                flow[e] += bottleneck;
                flow[e ^ 1] -= bottleneck;
                v = arcs[e ^ 1].to;
            }
            value += bottleneck;
        }

        // The last search stopped short of the sink; what it reached is the source side.
        Ok(MinCut {
            value,
            source_side: visited,
        })
    }
}
