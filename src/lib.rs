//! Transport-agnostic request surface over the graph store and run engine.
//!
//! [`GraphService`] exposes the operations a transport would mount: graph
//! CRUD, run submission, and lookups against committed runs. The service
//! owns the canonical graph store and the run registry and threads them
//! through every operation; nothing here is process-global.

use graphrun_engine::{GraphView, execute, project};
use graphrun_ir::{Edge, EdgeIdx, Graph, Id, Node, NodePatch, PortValues, RunConfig};
use graphrun_store::{GraphStore, RunId, RunRegistry};
use graphrun_utils::RunResult;
use itertools::Itertools;
use linked_hash_map::LinkedHashMap;

pub use graphrun_engine::EngineConfig;
pub use graphrun_utils::{Error, ErrorKind};

/// Summary returned for a committed run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub topo_order: Vec<Id>,
    pub level_order: Vec<Vec<Id>>,
    pub leaf_outputs: LinkedHashMap<Id, PortValues>,
    pub islands: Vec<Vec<Id>>,
}

/// Traversals stored for a run, as returned by [`GraphService::get_graph`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunTraversals {
    pub topo_order: Vec<Id>,
    pub level_order: Vec<Vec<Id>>,
    pub leaf_outputs: LinkedHashMap<Id, PortValues>,
}

/// The engine's request surface.
#[derive(Debug, Default)]
pub struct GraphService {
    store: GraphStore,
    registry: RunRegistry,
    engine: EngineConfig,
}

impl GraphService {
    pub fn new(graph: Graph) -> Self {
        Self::with_engine(graph, EngineConfig::default())
    }

    pub fn with_engine(graph: Graph, engine: EngineConfig) -> Self {
        Self {
            store: GraphStore::new(graph),
            registry: RunRegistry::new(),
            engine,
        }
    }

    /// The subgraph a run configuration would project.
    pub fn fetch_graph(&self, config: &RunConfig) -> RunResult<Graph> {
        project(&self.store.snapshot(), config)
    }

    pub fn add_node(&self, node: Node) -> RunResult<Node> {
        self.store.add_node(node)
    }

    pub fn update_node(&self, name: &Id, patch: NodePatch) -> RunResult<Node> {
        self.store.update_node(name, patch)
    }

    pub fn delete_node(&self, name: &Id) -> RunResult<()> {
        self.store.delete_node(name)
    }

    pub fn add_edge(&self, edge: Edge) -> RunResult<EdgeIdx> {
        self.store.add_edge(edge)
    }

    pub fn update_edge(
        &self,
        idx: EdgeIdx,
        key_map: LinkedHashMap<Id, Id>,
    ) -> RunResult<Edge> {
        self.store.update_edge(idx, key_map)
    }

    pub fn delete_edge(&self, idx: EdgeIdx) -> RunResult<()> {
        self.store.delete_edge(idx)
    }

    /// Validate, execute, and commit a run. On any validation failure the
    /// structured diagnostic is returned and no record becomes visible.
    pub fn run_config(&self, config: &RunConfig) -> RunResult<RunSummary> {
        let snapshot = self.store.snapshot();
        let run = execute(&snapshot, config, self.engine)?;
        let run_id = self.registry.commit(config, &run)?;
        let record = self.registry.record(run_id)?;
        log::info!(
            "run {run_id}: {}",
            record.topo_order().iter().join(" -> ")
        );
        Ok(RunSummary {
            run_id,
            topo_order: record.topo_order(),
            level_order: record.level_order,
            leaf_outputs: record.leaf_outputs,
            islands: run.traversals.islands,
        })
    }

    /// Weakly connected components of the projection. Computed live; no run
    /// is committed.
    pub fn fetch_islands(&self, config: &RunConfig) -> RunResult<Vec<Vec<Id>>> {
        let projected = project(&self.store.snapshot(), config)?;
        Ok(GraphView::new(&projected).islands())
    }

    /// Stored traversals of a committed run.
    pub fn get_graph(&self, run_id: RunId) -> RunResult<RunTraversals> {
        let record = self.registry.record(run_id)?;
        Ok(RunTraversals {
            topo_order: record.topo_order(),
            level_order: record.level_order,
            leaf_outputs: record.leaf_outputs,
        })
    }

    /// A node's `data_out` at a committed run.
    pub fn node_value(&self, node: Id, run_id: RunId) -> RunResult<PortValues> {
        self.registry.node_value(node, run_id)
    }
}
