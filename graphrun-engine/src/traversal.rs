//! Derived traversals over a projected subgraph.
//!
//! The subgraph is mirrored into a `petgraph::DiGraph` whose nodes carry
//! node names and whose edges carry the flat-table edge index. Every
//! traversal is a pure function of the projection.

use graphrun_ir::{EdgeIdx, Graph, Id, RunConfig};
use graphrun_utils::{Error, RunResult};
use petgraph::Direction::{Incoming, Outgoing};
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, EdgeRef};
use std::collections::{HashMap, HashSet};

/// A graph-algorithm view of a projected subgraph.
pub struct GraphView {
    graph: DiGraph<Id, EdgeIdx>,
    indices: HashMap<Id, NodeIndex>,
}

impl GraphView {
    /// Mirror the projection. Nodes are added in the graph's insertion
    /// order, so derived orders are stable across identical submissions.
    pub fn new(source: &Graph) -> Self {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();
        for id in source.node_ids() {
            indices.insert(id, graph.add_node(id));
        }
        for (idx, edge) in source.edges() {
            graph.add_edge(indices[&edge.src], indices[&edge.dst], idx);
        }
        Self { graph, indices }
    }

    /// Topological order of the projection.
    pub fn toposort(&self) -> RunResult<Vec<Id>> {
        algo::toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
            .map_err(|cycle| Error::cycle(self.graph[cycle.node_id()]))
    }

    /// Kahn-style level order: repeatedly drain the zero-in-degree frontier.
    pub fn level_order(&self) -> Vec<Vec<Id>> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|ix| (ix, self.graph.edges_directed(ix, Incoming).count()))
            .collect();
        let mut frontier: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|ix| in_degree[ix] == 0)
            .collect();
        let mut levels = Vec::new();
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &ix in &frontier {
                for edge in self.graph.edges_directed(ix, Outgoing) {
                    let target = edge.target();
                    let remaining = in_degree.get_mut(&target).unwrap();
                    *remaining -= 1;
                    if *remaining == 0 {
                        next.push(target);
                    }
                }
            }
            levels
                .push(frontier.iter().map(|&ix| self.graph[ix]).collect());
            frontier = next;
        }
        levels
    }

    /// Nodes reachable from any root whose out-degree is zero.
    pub fn leaves(&self, roots: &[Id]) -> Vec<Id> {
        let mut reached: HashSet<NodeIndex> = HashSet::new();
        for root in roots {
            let Some(&start) = self.indices.get(root) else {
                continue;
            };
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(ix) = bfs.next(&self.graph) {
                reached.insert(ix);
            }
        }
        self.graph
            .node_indices()
            .filter(|ix| {
                reached.contains(ix)
                    && self.graph.edges_directed(*ix, Outgoing).next().is_none()
            })
            .map(|ix| self.graph[ix])
            .collect()
    }

    /// Weakly connected components in depth-first visit order.
    pub fn islands(&self) -> Vec<Vec<Id>> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut islands = Vec::new();
        for start in self.graph.node_indices() {
            if visited.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            visited.insert(start);
            while let Some(ix) = stack.pop() {
                component.push(self.graph[ix]);
                for neighbor in self.graph.neighbors_undirected(ix) {
                    if visited.insert(neighbor) {
                        stack.push(neighbor);
                    }
                }
            }
            islands.push(component);
        }
        islands
    }
}

/// The traversal bundle published alongside each run.
#[derive(Debug, Clone)]
pub struct Traversals {
    pub topo_order: Vec<Id>,
    pub level_order: Vec<Vec<Id>>,
    pub leaves: Vec<Id>,
    pub islands: Vec<Vec<Id>>,
}

impl Traversals {
    /// Compute every traversal for a resolved subgraph.
    pub fn compute(graph: &Graph, config: &RunConfig) -> RunResult<Self> {
        let view = GraphView::new(graph);
        let roots: Vec<Id> = config
            .roots()
            .filter(|root| graph.find_node(root).is_some())
            .collect();
        Ok(Self {
            topo_order: view.toposort()?,
            level_order: view.level_order(),
            leaves: view.leaves(&roots),
            islands: view.islands(),
        })
    }
}
