//! Building-proximity relation used for the travel-gap constraint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::errors::SchedulerError;

/// The `nearby` relation over building addresses, declared as a set of
/// address groups and closed reflexively, symmetrically, and transitively.
///
/// Representing the relation as a partition of addresses into disjoint
/// groups makes the closure automatic: two addresses are `nearby` exactly
/// when they fall in the same declared group. An address may belong to at
/// most one group; a second, conflicting group membership would make the
/// closure ambiguous and is rejected as [`SchedulerError::CyclicNearbyGroup`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingProximity {
    groups: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl BuildingProximity {
    /// Build the relation from its declared address groups.
    ///
    /// # Errors
    /// Returns [`SchedulerError::CyclicNearbyGroup`] if an address appears in
    /// more than one declared group.
    pub fn new(groups: Vec<Vec<String>>) -> Result<Self, SchedulerError> {
        let mut index = HashMap::new();
        for (group_idx, group) in groups.iter().enumerate() {
            for address in group {
                if index.insert(address.clone(), group_idx).is_some() {
                    return Err(SchedulerError::CyclicNearbyGroup(address.clone()));
                }
            }
        }
        Ok(Self { groups, index })
    }

    /// An empty relation: every address is only ever nearby to itself.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Whether `a` and `b` are nearby: identical addresses always are;
    /// otherwise they must share a declared group.
    #[must_use]
    pub fn nearby(&self, a: &str, b: &str) -> bool {
        if a == b {
            return true;
        }
        match (self.index.get(a), self.index.get(b)) {
            (Some(ga), Some(gb)) => ga == gb,
            _ => false,
        }
    }

    /// The declared groups backing this relation.
    #[must_use]
    pub fn groups(&self) -> &[Vec<String>] {
        &self.groups
    }
}
