//! The run registry: immutable run records plus a per-node output index.
//!
//! A commit assembles the full record and every index entry before taking
//! the write lock, so a submission is all-or-nothing: concurrent readers
//! observe either none of it or all of it, never a partial commit.

use crate::StoreError;
use graphrun_engine::ResolvedRun;
use graphrun_ir::{Id, PortValues, RunConfig};
use graphrun_utils::{Error, RunResult};
use linked_hash_map::LinkedHashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of a committed run.
pub type RunId = Uuid;

/// Immutable commit of a single run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunRecord {
    pub run_id: RunId,
    /// The submitted configuration.
    pub config: RunConfig,
    /// The resolved subgraph, serialized.
    pub resolved_nodes: serde_json::Value,
    /// Per-node outputs in topological order.
    pub topo_outputs: LinkedHashMap<Id, PortValues>,
    pub level_order: Vec<Vec<Id>>,
    /// Outputs of the leaves reachable from the run's roots.
    pub leaf_outputs: LinkedHashMap<Id, PortValues>,
}

impl RunRecord {
    /// Topological order of the resolved subgraph.
    pub fn topo_order(&self) -> Vec<Id> {
        self.topo_outputs.keys().copied().collect()
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    /// Records in commit order.
    runs: LinkedHashMap<RunId, RunRecord>,
    /// node -> run -> data_out at that run.
    node_outputs: HashMap<Id, HashMap<RunId, PortValues>>,
}

#[derive(Debug, Default)]
pub struct RunRegistry {
    inner: RwLock<RegistryInner>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved run under a fresh run identifier.
    pub fn commit(
        &self,
        config: &RunConfig,
        run: &ResolvedRun,
    ) -> RunResult<RunId> {
        let run_id = Uuid::new_v4();
        let resolved_nodes = serde_json::to_value(&run.graph)
            .map_err(StoreError::Serde)?;

        let outputs_of = |id: &Id| -> PortValues {
            run.graph
                .find_node(id)
                .map(|n| n.data_out.clone())
                .unwrap_or_default()
        };
        let topo_outputs: LinkedHashMap<Id, PortValues> = run
            .traversals
            .topo_order
            .iter()
            .map(|id| (*id, outputs_of(id)))
            .collect();
        let leaf_outputs: LinkedHashMap<Id, PortValues> = run
            .traversals
            .leaves
            .iter()
            .map(|id| (*id, outputs_of(id)))
            .collect();
        let index_entries: Vec<(Id, PortValues)> = run
            .graph
            .nodes()
            .map(|n| (n.name(), n.data_out.clone()))
            .collect();

        let record = RunRecord {
            run_id,
            config: config.clone(),
            resolved_nodes,
            topo_outputs,
            level_order: run.traversals.level_order.clone(),
            leaf_outputs,
        };

        // Everything fallible is done; install under one write lock.
        let mut inner = self.inner.write();
        if inner.runs.contains_key(&run_id) {
            return Err(StoreError::DuplicateRun(run_id).into());
        }
        inner.runs.insert(run_id, record);
        for (node, data_out) in index_entries {
            inner
                .node_outputs
                .entry(node)
                .or_default()
                .insert(run_id, data_out);
        }
        log::info!(
            "committed run {run_id} ({} nodes)",
            run.graph.len()
        );
        Ok(run_id)
    }

    /// Fetch the full record of a committed run.
    pub fn record(&self, run_id: RunId) -> RunResult<RunRecord> {
        self.inner
            .read()
            .runs
            .get(&run_id)
            .cloned()
            .ok_or_else(|| Error::undefined(Id::new(run_id), "run"))
    }

    /// A node's `data_out` at a committed run.
    pub fn node_value(&self, node: Id, run_id: RunId) -> RunResult<PortValues> {
        let inner = self.inner.read();
        let runs = inner
            .node_outputs
            .get(&node)
            .ok_or_else(|| Error::undefined(node, "node"))?;
        runs.get(&run_id)
            .cloned()
            .ok_or_else(|| Error::undefined(Id::new(run_id), "run"))
    }

    /// Number of committed runs.
    pub fn len(&self) -> usize {
        self.inner.read().runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().runs.is_empty()
    }
}
