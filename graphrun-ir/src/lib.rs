//! In-memory representation for graphrun data-flow graphs.
//!
//! Nodes expose typed input and output ports; edges wire one node's output
//! ports to another node's input ports. Nodes refer to incident edges by
//! index into the graph's flat edge table, matching the persisted layout.

mod config;
mod graph;
mod serializers;
mod structure;
mod value;

pub use config::{PortValues, RunConfig};
pub use graph::Graph;
pub use graphrun_utils::{GetName, Id};
pub use structure::{Edge, EdgeIdx, Node, NodePatch};
pub use value::{Value, ValueType};
