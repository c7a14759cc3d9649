use gloss_protocol::ParsedToken;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use petgraph::Direction;

/// Head -> dependent graph over the tokens of one sentence.
pub struct DependencyGraph {
    graph: DiGraph<usize, ()>,
    nodes: Vec<NodeIndex>,
}

impl DependencyGraph {
    /// Heads must already be range-checked by the caller.
    pub fn new(tokens: &[ParsedToken]) -> Self {
        let mut graph = DiGraph::with_capacity(tokens.len(), tokens.len());
        let nodes: Vec<NodeIndex> = (0..tokens.len()).map(|i| graph.add_node(i)).collect();
        for (i, token) in tokens.iter().enumerate() {
            if token.head != i {
                graph.add_edge(nodes[token.head], nodes[i], ());
            }
        }
        Self { graph, nodes }
    }

    /// Direct dependents of `index`, in token order.
    pub fn children(&self, index: usize) -> Vec<usize> {
        let mut children: Vec<usize> = self
            .graph
            .neighbors_directed(self.nodes[index], Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        children.sort_unstable();
        children
    }

    /// Leftmost and rightmost token index reachable from `index` (inclusive).
    pub fn subtree_extent(&self, index: usize) -> (usize, usize) {
        let mut left = index;
        let mut right = index;
        let mut dfs = Dfs::new(&self.graph, self.nodes[index]);
        while let Some(node) = dfs.next(&self.graph) {
            let i = self.graph[node];
            left = left.min(i);
            right = right.max(i);
        }
        (left, right)
    }
}
