//! Connected components by union-find.

use petgraph::unionfind::UnionFind;

use super::undirected::UndirectedGraph;

/// Component labelling of an [`UndirectedGraph`].
///
/// Components are numbered in order of their smallest vertex.
#[derive(Debug, Clone)]
pub struct ConnectedComponents {
    component: Vec<usize>,
    sizes: Vec<usize>,
}

impl ConnectedComponents {
    pub fn new(graph: &UndirectedGraph) -> Self {
        let n = graph.vertex_count();
        let mut union = UnionFind::<usize>::new(n);
        for (a, b) in graph.edges() {
            union.union(a, b);
        }
        let roots = union.into_labeling();

        // Scanning ascending meets every component first at its smallest vertex.
        let mut label = vec![usize::MAX; n];
        let mut component = Vec::with_capacity(n);
        let mut sizes = Vec::new();
        for root in roots {
            if label[root] == usize::MAX {
                label[root] = sizes.len();
                sizes.push(0);
            }
            let id = label[root];
            sizes[id] += 1;
            component.push(id);
        }

        Self { component, sizes }
    }

    /// Number of components, isolated vertices included.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn component_of(&self, v: usize) -> usize {
        self.component[v]
    }

    pub fn size_of(&self, component: usize) -> usize {
        self.sizes[component]
    }

    /// Members of every component, each ascending.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut out: Vec<Vec<usize>> = self.sizes.iter().map(|&s| Vec::with_capacity(s)).collect();
        for (v, &c) in self.component.iter().enumerate() {
            out[c].push(v);
        }
        out
    }
}
