//! Run configuration: which nodes participate and what the roots receive.

use crate::Value;
use graphrun_utils::Id;
use linked_hash_map::LinkedHashMap;
use std::collections::HashSet;

/// Per-node port assignments.
pub type PortValues = LinkedHashMap<Id, Value>;

/// A single run submission.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RunConfig {
    /// Identifies the roots and seeds their inputs. Seeding replaces the
    /// root's `data_in` wholesale before overrides are merged.
    #[serde(default)]
    pub root_inputs: LinkedHashMap<Id, PortValues>,
    /// Overrides merged into specific input ports after projection; ports
    /// not mentioned are unchanged. Applies only to projected nodes.
    #[serde(default)]
    pub data_overwrites: LinkedHashMap<Id, PortValues>,
    /// When non-empty, the projected node set.
    #[serde(default)]
    pub enable_list: HashSet<Id>,
    /// When non-empty (and `enable_list` is empty), the excluded node set.
    #[serde(default)]
    pub disable_list: HashSet<Id>,
}

impl RunConfig {
    /// Root node names in declaration order.
    pub fn roots(&self) -> impl Iterator<Item = Id> + '_ {
        self.root_inputs.keys().copied()
    }
}
