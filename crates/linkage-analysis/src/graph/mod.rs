//! Graph utilities shared by the clustering algorithms.

pub mod components;
pub mod flow;
pub mod gomory_hu;
pub mod undirected;

pub use components::ConnectedComponents;
pub use flow::{EdmondsKarp, FlowNetwork, MinCut, MinCutSolver};
pub use gomory_hu::GomoryHuTree;
pub use undirected::UndirectedGraph;
