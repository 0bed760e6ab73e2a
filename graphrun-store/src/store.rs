//! The canonical graph store.
//!
//! Holds the one process-wide mutable graph behind a reader/writer lock.
//! CRUD takes the write lock; a run takes a read snapshot, so every run is
//! serializable against the CRUD stream and never observes a half-applied
//! mutation. Cascade maintenance (edge insertion appending to endpoint path
//! lists, node deletion removing incident edges) lives in the graph itself;
//! the store's job is the locking discipline.

use graphrun_ir::{Edge, EdgeIdx, Graph, Node, NodePatch};
use graphrun_utils::{Id, RunResult};
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct GraphStore {
    graph: RwLock<Graph>,
}

impl GraphStore {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph: RwLock::new(graph),
        }
    }

    /// Clone the canonical graph under the read lock. Runs operate on the
    /// snapshot; the canonical graph is never mutated by a run.
    pub fn snapshot(&self) -> Graph {
        self.graph.read().clone()
    }

    /// Insert a node and return the stored copy.
    pub fn add_node(&self, node: Node) -> RunResult<Node> {
        let mut graph = self.graph.write();
        let name = node.name();
        graph.add_node(node)?;
        Ok(graph.node(&name)?.clone())
    }

    /// Apply a partial update to a stored node and return the new state.
    pub fn update_node(&self, name: &Id, patch: NodePatch) -> RunResult<Node> {
        let mut graph = self.graph.write();
        let node = graph.node_mut(name)?;
        if let Some(data_in) = patch.data_in {
            node.data_in = data_in;
        }
        if let Some(data_out) = patch.data_out {
            node.data_out = data_out;
        }
        if let Some(mapping) = patch.mapping {
            node.mapping = mapping;
        }
        Ok(node.clone())
    }

    /// Delete a node, cascading to its incident edges.
    pub fn delete_node(&self, name: &Id) -> RunResult<()> {
        let removed = self.graph.write().remove_node(name)?;
        log::debug!("deleted node `{}'", removed.name());
        Ok(())
    }

    /// Insert an edge and return its assigned index.
    pub fn add_edge(&self, edge: Edge) -> RunResult<EdgeIdx> {
        self.graph.write().add_edge(edge)
    }

    /// Replace an edge's key map and return the new state.
    pub fn update_edge(
        &self,
        idx: EdgeIdx,
        key_map: linked_hash_map::LinkedHashMap<Id, Id>,
    ) -> RunResult<Edge> {
        let mut graph = self.graph.write();
        let edge = graph.edge_mut(idx)?;
        edge.key_map = key_map;
        Ok(edge.clone())
    }

    /// Delete an edge, unlinking it from both endpoints.
    pub fn delete_edge(&self, idx: EdgeIdx) -> RunResult<()> {
        self.graph.write().remove_edge(idx)?;
        Ok(())
    }
}
