//! Subgraph projection under a run configuration's enable/disable sets.

use graphrun_ir::{Graph, RunConfig};
use graphrun_utils::{Error, RunResult};

/// Project the induced subgraph for a run.
///
/// A non-empty `enable_list` restricts the node set to its members; a
/// non-empty `disable_list` then removes its members. An edge is retained
/// iff both endpoints are retained. A projection with no nodes is an error.
///
/// Projection clones the canonical graph: mutations made by a run are
/// visible only within that run's scope and never reach the persistent
/// store.
pub fn project(graph: &Graph, config: &RunConfig) -> RunResult<Graph> {
    let mut projected = graph.clone();
    if !config.enable_list.is_empty() {
        projected.retain_nodes(|n| config.enable_list.contains(&n.name()));
    }
    if !config.disable_list.is_empty() {
        projected.retain_nodes(|n| !config.disable_list.contains(&n.name()));
    }
    if projected.is_empty() {
        return Err(Error::empty_subgraph());
    }
    log::debug!(
        "projected {}/{} nodes, {}/{} edges",
        projected.len(),
        graph.len(),
        projected.edge_count(),
        graph.edge_count()
    );
    Ok(projected)
}
