//! Gomory-Hu cut trees by Gusfield's algorithm.
//!
//! Gusfield's construction needs n - 1 minimum cut computations on the
//! original network and no graph contraction. The tree is rooted at
//! vertex 0; every other vertex `v` hangs off `parent(v)` through an edge
//! whose weight is the minimum `v`-`parent(v)` cut. The minimum cut
//! between any two vertices is the lightest edge on their tree path, and
//! removing a tree edge splits the vertices along a minimum cut.

use linkage_core::errors::GraphError;

use super::flow::{FlowNetwork, MinCutSolver};

#[derive(Debug, Clone)]
pub struct GomoryHuTree {
    parent: Vec<usize>,
    weight: Vec<f64>,
}

impl GomoryHuTree {
    pub fn build(network: &FlowNetwork, solver: &dyn MinCutSolver) -> Result<Self, GraphError> {
        let n = network.vertex_count();
        let mut parent = vec![0usize; n];
        let mut weight = vec![0.0f64; n];

        for s in 1..n {
            let t = parent[s];
            let cut = solver.min_cut(network, s, t)?;
            weight[s] = cut.value;
            for v in 0..n {
                if v != s && cut.source_side[v] && parent[v] == t {
                    parent[v] = s;
                }
            }
            // Keep a real cut tree: s takes t's place when t's parent fell on s's side.
            if t != 0 && cut.source_side[parent[t]] {
                parent[s] = parent[t];
                parent[t] = s;
                weight[s] = weight[t];
                weight[t] = cut.value;
            }
        }

        Ok(Self { parent, weight })
    }

    pub fn vertex_count(&self) -> usize {
        self.parent.len()
    }

    /// Parent of `v`; the root is its own parent.
    pub fn parent(&self, v: usize) -> usize {
        self.parent[v]
    }

    /// Tree edges as `(child, parent, min cut value)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (1..self.parent.len()).map(|v| (v, self.parent[v], self.weight[v]))
    }

    /// Minimum cut between `u` and `v`: the lightest edge on their tree
    /// path. `None` when `u == v` or either is out of range.
    pub fn min_cut_between(&self, u: usize, v: usize) -> Option<f64> {
        let n = self.parent.len();
        if u == v || u >= n || v >= n {
            return None;
        }
        // Lightest edge from each vertex up to every ancestor of u.
        let mut best_from_u = vec![None; n];
        let mut x = u;
        let mut lightest = f64::INFINITY;
        best_from_u[x] = Some(lightest);
        while x != 0 {
            lightest = lightest.min(self.weight[x]);
            x = self.parent[x];
            best_from_u[x] = Some(lightest);
        }

        let mut y = v;
        let mut lightest_v = f64::INFINITY;
        loop {
            if let Some(from_u) = best_from_u[y] {
                return Some(from_u.min(lightest_v));
            }
            lightest_v = lightest_v.min(self.weight[y]);
            y = self.parent[y];
        }
    }
}
