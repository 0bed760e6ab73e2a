//! The run-time engine: projection, validation, propagation, traversals.
//!
//! A run is a request-scoped synchronous pipeline over a snapshot of the
//! canonical graph. The engine never mutates the snapshot's source; all
//! writes land in the run's own projected copy.

mod project;
mod propagate;
mod traversal;
mod validate;

pub use project::project;
pub use propagate::propagate;
pub use traversal::{GraphView, Traversals};
pub use validate::validate;

use graphrun_ir::{Graph, RunConfig};
use graphrun_utils::{Error, RunResult};

/// Tunable engine policy knobs.
#[derive(Debug, Default, Clone, Copy)]
pub struct EngineConfig {
    /// Refuse runs whose projected subgraph has more than one weakly
    /// connected component.
    pub require_connected: bool,
}

/// A completed, not yet committed run: the resolved subgraph and its
/// derived traversals.
#[derive(Debug, Clone)]
pub struct ResolvedRun {
    pub graph: Graph,
    pub traversals: Traversals,
}

/// Execute the full pipeline for one submission:
/// project → validate → propagate → traverse.
pub fn execute(
    graph: &Graph,
    config: &RunConfig,
    engine: EngineConfig,
) -> RunResult<ResolvedRun> {
    let mut projected = project(graph, config)?;
    validate(&projected, config)?;
    propagate(&mut projected, config)?;
    let traversals = Traversals::compute(&projected, config)?;
    if engine.require_connected && traversals.islands.len() > 1 {
        return Err(Error::disconnected(traversals.islands.len()));
    }
    Ok(ResolvedRun {
        graph: projected,
        traversals,
    })
}
